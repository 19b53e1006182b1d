// ==========================================
// 每日库存模拟 - 报表结构
// ==========================================
// 形态: 一行一个料号，首列机型，其后每日一列
// 说明: 仅承载数据，不含任何样式信息
// ==========================================

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// 料号列表头
pub const PART_NO_HEADER: &str = "Part_No";

/// 机型列表头
pub const MODEL_HEADER: &str = "Model";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub part_no: String,
    pub model: Option<String>,
    pub balances: Vec<f64>, // 与 InventoryReport::dates 一一对应
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryReport {
    pub run_id: String,
    pub generated_at: NaiveDateTime,
    pub dates: Vec<NaiveDate>,
    pub rows: Vec<ReportRow>,
}

impl InventoryReport {
    pub fn row(&self, part_no: &str) -> Option<&ReportRow> {
        self.rows.iter().find(|r| r.part_no == part_no)
    }

    /// 指定料号在指定日期的余额
    pub fn balance(&self, part_no: &str, date: NaiveDate) -> Option<f64> {
        let date_idx = self.dates.iter().position(|d| *d == date)?;
        self.row(part_no).and_then(|r| r.balances.get(date_idx).copied())
    }

    /// 余额为负的单元格数量
    pub fn negative_cell_count(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|r| r.balances.iter())
            .filter(|v| **v < 0.0)
            .count()
    }
}
