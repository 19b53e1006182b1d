// ==========================================
// 每日库存模拟 - 日期 × 料号 矩阵
// ==========================================
// 存储: 按料号分列，每列为覆盖整个日期轴的稠密数组
// 约束: 每列长度 == 日期轴长度；无活动料号以全零列存在
// 约束: 列操作（删除/改名/合并）消费旧矩阵、返回新矩阵
// ==========================================

use crate::domain::horizon::SimulationHorizon;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ==========================================
// PartIndex - 料号下标表（保持首次出现顺序）
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartIndex {
    parts: Vec<String>,
    positions: HashMap<String, usize>,
}

impl PartIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// 由料号序列构造，重复料号只保留首次出现
    pub fn from_parts<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut index = Self::new();
        for part in parts {
            index.insert(part.as_ref());
        }
        index
    }

    /// 插入料号；已存在时返回 false
    pub fn insert(&mut self, part_no: &str) -> bool {
        if self.positions.contains_key(part_no) {
            return false;
        }
        self.positions.insert(part_no.to_string(), self.parts.len());
        self.parts.push(part_no.to_string());
        true
    }

    pub fn position(&self, part_no: &str) -> Option<usize> {
        self.positions.get(part_no).copied()
    }

    pub fn contains(&self, part_no: &str) -> bool {
        self.positions.contains_key(part_no)
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.parts
    }
}

// ==========================================
// DailyQuantities - 每日入库/出库汇总
// ==========================================
// 形状与 PartIndex × 日期轴一致，缺省值为 0
#[derive(Debug, Clone, PartialEq)]
pub struct DailyQuantities {
    horizon: SimulationHorizon,
    columns: Vec<Vec<f64>>,
}

impl DailyQuantities {
    pub fn zeros(horizon: SimulationHorizon, part_count: usize) -> Self {
        Self {
            horizon,
            columns: vec![vec![0.0; horizon.len()]; part_count],
        }
    }

    pub fn horizon(&self) -> SimulationHorizon {
        self.horizon
    }

    pub fn part_count(&self) -> usize {
        self.columns.len()
    }

    /// 同一 (日期, 料号) 的多条记录累加，不覆盖
    pub fn add(&mut self, date_idx: usize, part_idx: usize, qty: f64) {
        if let Some(cell) = self
            .columns
            .get_mut(part_idx)
            .and_then(|column| column.get_mut(date_idx))
        {
            *cell += qty;
        }
    }

    pub fn get(&self, date_idx: usize, part_idx: usize) -> f64 {
        self.columns
            .get(part_idx)
            .and_then(|column| column.get(date_idx))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn column(&self, part_idx: usize) -> Option<&[f64]> {
        self.columns.get(part_idx).map(Vec::as_slice)
    }

    /// 全部单元格合计
    pub fn total(&self) -> f64 {
        self.columns.iter().flatten().sum()
    }
}

// ==========================================
// PartColumn - 单个料号的库存序列
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartColumn {
    pub part_no: String,
    pub balances: Vec<f64>,
}

// ==========================================
// BalanceMatrix - 库存余额矩阵
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct BalanceMatrix {
    horizon: SimulationHorizon,
    columns: Vec<PartColumn>,
    lookup: HashMap<String, usize>,
}

impl BalanceMatrix {
    /// 由列构造矩阵
    ///
    /// 列长度必须等于日期轴长度，重复料号只保留第一列。
    pub fn from_columns(horizon: SimulationHorizon, columns: Vec<PartColumn>) -> Self {
        let mut kept: Vec<PartColumn> = Vec::with_capacity(columns.len());
        let mut lookup = HashMap::with_capacity(columns.len());
        for column in columns {
            debug_assert_eq!(column.balances.len(), horizon.len());
            if lookup.contains_key(&column.part_no) {
                continue;
            }
            lookup.insert(column.part_no.clone(), kept.len());
            kept.push(column);
        }
        Self {
            horizon,
            columns: kept,
            lookup,
        }
    }

    pub fn horizon(&self) -> SimulationHorizon {
        self.horizon
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        self.horizon.dates()
    }

    pub fn part_count(&self) -> usize {
        self.columns.len()
    }

    pub fn part_numbers(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.part_no.as_str())
    }

    pub fn columns(&self) -> &[PartColumn] {
        &self.columns
    }

    pub fn contains_part(&self, part_no: &str) -> bool {
        self.lookup.contains_key(part_no)
    }

    pub fn column(&self, part_no: &str) -> Option<&[f64]> {
        self.lookup
            .get(part_no)
            .map(|&idx| self.columns[idx].balances.as_slice())
    }

    /// 查询 (日期, 料号) 的库存余额
    pub fn balance(&self, date: NaiveDate, part_no: &str) -> Option<f64> {
        let date_idx = self.horizon.index_of(date)?;
        self.column(part_no).map(|balances| balances[date_idx])
    }

    // ===== 列变换（消费旧矩阵，返回新矩阵）=====

    /// 删除列；列不存在时原样返回
    pub fn without_column(self, part_no: &str) -> Self {
        if !self.contains_part(part_no) {
            return self;
        }
        let horizon = self.horizon;
        let columns = self
            .columns
            .into_iter()
            .filter(|c| c.part_no != part_no)
            .collect();
        Self::from_columns(horizon, columns)
    }

    /// 列改名，保持列位置；源列不存在或目标列已存在时原样返回
    pub fn with_column_renamed(self, from: &str, to: &str) -> Self {
        if !self.contains_part(from) || self.contains_part(to) {
            return self;
        }
        let horizon = self.horizon;
        let columns = self
            .columns
            .into_iter()
            .map(|mut c| {
                if c.part_no == from {
                    c.part_no = to.to_string();
                }
                c
            })
            .collect();
        Self::from_columns(horizon, columns)
    }

    /// 将源列逐日加到目标列并删除源列；任一列不存在时原样返回
    pub fn with_column_added_into(self, source: &str, target: &str) -> Self {
        if source == target {
            return self;
        }
        let addend = match self.column(source) {
            Some(balances) if self.contains_part(target) => balances.to_vec(),
            _ => return self,
        };
        let horizon = self.horizon;
        let columns = self
            .columns
            .into_iter()
            .filter(|c| c.part_no != source)
            .map(|mut c| {
                if c.part_no == target {
                    for (cell, add) in c.balances.iter_mut().zip(&addend) {
                        *cell += add;
                    }
                }
                c
            })
            .collect();
        Self::from_columns(horizon, columns)
    }

    /// 以源列的序列新建目标列（追加到末尾）并删除源列
    ///
    /// 源列不存在或目标列已存在时原样返回。
    pub fn with_column_moved_to_end(self, source: &str, target: &str) -> Self {
        if source == target || self.contains_part(target) {
            return self;
        }
        let seed = match self.column(source) {
            Some(balances) => balances.to_vec(),
            None => return self,
        };
        let horizon = self.horizon;
        let mut columns: Vec<PartColumn> = self
            .columns
            .into_iter()
            .filter(|c| c.part_no != source)
            .collect();
        columns.push(PartColumn {
            part_no: target.to_string(),
            balances: seed,
        });
        Self::from_columns(horizon, columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn horizon() -> SimulationHorizon {
        SimulationHorizon::starting_at(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap())
    }

    fn constant(part_no: &str, value: f64) -> PartColumn {
        PartColumn {
            part_no: part_no.to_string(),
            balances: vec![value; horizon().len()],
        }
    }

    #[test]
    fn test_part_index_keeps_first_appearance() {
        let index = PartIndex::from_parts(["B", "A", "B", "C"]);
        assert_eq!(index.as_slice(), &["B", "A", "C"]);
        assert_eq!(index.position("C"), Some(2));
        assert!(!index.contains("D"));
    }

    #[test]
    fn test_daily_quantities_accumulate() {
        let mut quantities = DailyQuantities::zeros(horizon(), 2);
        quantities.add(3, 1, 5.0);
        quantities.add(3, 1, 2.0);
        quantities.add(999, 0, 1.0);

        assert_eq!(quantities.get(3, 1), 7.0);
        assert_eq!(quantities.get(3, 0), 0.0);
        assert_eq!(quantities.total(), 7.0);
    }

    #[test]
    fn test_rename_keeps_position() {
        let matrix = BalanceMatrix::from_columns(
            horizon(),
            vec![constant("A", 1.0), constant("F", 2.0), constant("C", 3.0)],
        );
        let renamed = matrix.with_column_renamed("F", "M");
        let parts: Vec<&str> = renamed.part_numbers().collect();
        assert_eq!(parts, vec!["A", "M", "C"]);
        assert_eq!(renamed.column("M").unwrap()[0], 2.0);
    }

    #[test]
    fn test_add_into_removes_source() {
        let matrix =
            BalanceMatrix::from_columns(horizon(), vec![constant("M", 1.0), constant("F", 2.5)]);
        let merged = matrix.with_column_added_into("F", "M");
        assert!(!merged.contains_part("F"));
        assert!(merged.column("M").unwrap().iter().all(|v| *v == 3.5));
    }

    #[test]
    fn test_move_to_end_appends() {
        let matrix =
            BalanceMatrix::from_columns(horizon(), vec![constant("A", 1.0), constant("B", 2.0)]);
        let moved = matrix.with_column_moved_to_end("A", "Z");
        let parts: Vec<&str> = moved.part_numbers().collect();
        assert_eq!(parts, vec!["B", "Z"]);
    }

    #[test]
    fn test_operations_on_missing_columns_are_noops() {
        let matrix = BalanceMatrix::from_columns(horizon(), vec![constant("A", 1.0)]);
        let unchanged = matrix
            .clone()
            .without_column("X")
            .with_column_renamed("X", "Y")
            .with_column_added_into("X", "A")
            .with_column_moved_to_end("X", "Y");
        assert_eq!(unchanged, matrix);
    }
}
