// ==========================================
// 每日库存模拟 - 库存余额矩阵构建器
// ==========================================
// 职责: 期初库存 + 逐日入库/出库 → 稠密 日期 × 料号 余额矩阵
// 推演公式:
//   balance(start, p) = 期初(p) + inbound(start, p) - outbound(start, p)
//   balance(d, p)     = balance(d-1, p) + inbound(d, p) - outbound(d, p)
// 红线: 日期轴严格升序逐日推演，不可跳日、不可乱序
// 说明: 不同料号之间互不依赖，按列独立推演
// ==========================================

use crate::domain::horizon::SimulationHorizon;
use crate::domain::matrix::{BalanceMatrix, DailyQuantities, PartColumn, PartIndex};
use crate::domain::source::{ProductRecord, RawQuantity};
use crate::domain::types::SourceTable;
use tracing::{debug, info, warn};

// ==========================================
// BalanceMatrixBuilder
// ==========================================
#[derive(Debug, Default)]
pub struct BalanceMatrixBuilder;

impl BalanceMatrixBuilder {
    pub fn new() -> Self {
        Self
    }

    /// 已知料号：产品主数据中非空料号，按首次出现顺序去重
    pub fn known_parts(&self, products: &[ProductRecord]) -> PartIndex {
        PartIndex::from_parts(products.iter().filter_map(ProductRecord::normalized_part_no))
    }

    /// 期初库存（与 parts 下标对齐）
    ///
    /// # 规则
    /// - 期初数量缺失（NULL / NaN）的记录不参与取值
    /// - 同一料号有多条记录时，取第一条有值的记录（空白文本也算有值）
    /// - 取到的值非数值 → 按 0 处理并告警
    /// - 无记录 → 0
    pub fn starting_quantities(&self, parts: &PartIndex, products: &[ProductRecord]) -> Vec<f64> {
        let mut starting = vec![0.0; parts.len()];
        let mut resolved = vec![false; parts.len()];

        for record in products {
            let Some(part_no) = record.normalized_part_no() else {
                continue;
            };
            let Some(idx) = parts.position(part_no) else {
                continue;
            };
            if resolved[idx] || !has_starting_value(&record.month_end_inventory) {
                continue;
            }

            resolved[idx] = true;
            starting[idx] = match record.month_end_inventory.as_number() {
                Some(qty) => qty,
                None => {
                    warn!(
                        table = %SourceTable::ProductInfo,
                        part_no = %part_no,
                        value = ?record.month_end_inventory,
                        "期初库存非数值，按 0 处理"
                    );
                    0.0
                }
            };
        }

        starting
    }

    /// 构建余额矩阵
    pub fn build(
        &self,
        parts: &PartIndex,
        starting: &[f64],
        inbound: &DailyQuantities,
        outbound: &DailyQuantities,
    ) -> BalanceMatrix {
        let horizon = inbound.horizon();
        debug_assert_eq!(horizon, outbound.horizon());
        debug_assert_eq!(starting.len(), parts.len());

        let columns: Vec<PartColumn> = parts
            .iter()
            .enumerate()
            .map(|(part_idx, part_no)| PartColumn {
                part_no: part_no.to_string(),
                balances: roll_forward(
                    horizon,
                    starting.get(part_idx).copied().unwrap_or(0.0),
                    inbound.column(part_idx).unwrap_or(&[]),
                    outbound.column(part_idx).unwrap_or(&[]),
                ),
            })
            .collect();

        let stocked_on_first_day = columns
            .iter()
            .filter(|c| c.balances.first().is_some_and(|v| *v > 0.0))
            .count();

        info!(
            parts = columns.len(),
            dates = horizon.len(),
            start = %horizon.start(),
            end = %horizon.end(),
            stocked_on_first_day,
            "库存余额矩阵构建完成"
        );

        BalanceMatrix::from_columns(horizon, columns)
    }

    /// 一步完成：已知料号 → 期初库存 → 余额矩阵
    pub fn build_from_products(
        &self,
        products: &[ProductRecord],
        inbound: &DailyQuantities,
        outbound: &DailyQuantities,
    ) -> BalanceMatrix {
        let parts = self.known_parts(products);
        let starting = self.starting_quantities(&parts, products);
        debug!(parts = parts.len(), "期初库存已就绪");
        self.build(&parts, &starting, inbound, outbound)
    }
}

fn has_starting_value(quantity: &RawQuantity) -> bool {
    match quantity {
        RawQuantity::Absent => false,
        RawQuantity::Number(v) => !v.is_nan(),
        RawQuantity::Text(_) => true,
    }
}

/// 单个料号的逐日推演
fn roll_forward(
    horizon: SimulationHorizon,
    opening: f64,
    inbound: &[f64],
    outbound: &[f64],
) -> Vec<f64> {
    let mut balances = Vec::with_capacity(horizon.len());
    let mut previous = opening;
    for date_idx in 0..horizon.len() {
        let day_in = inbound.get(date_idx).copied().unwrap_or(0.0);
        let day_out = outbound.get(date_idx).copied().unwrap_or(0.0);
        let balance = previous + day_in - day_out;
        balances.push(balance);
        previous = balance;
    }
    balances
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn horizon() -> SimulationHorizon {
        SimulationHorizon::starting_at(NaiveDate::from_ymd_opt(2026, 5, 1).unwrap())
    }

    #[test]
    fn test_known_parts_deduplicated_in_order() {
        let products = vec![
            ProductRecord::new("B", 1.0, None),
            ProductRecord::new("A", 1.0, None),
            ProductRecord::new("B", 2.0, None),
            ProductRecord {
                part_no: None,
                ..ProductRecord::new("", 0.0, None)
            },
        ];
        let parts = BalanceMatrixBuilder::new().known_parts(&products);
        assert_eq!(parts.as_slice(), &["B", "A"]);
    }

    #[test]
    fn test_starting_quantity_first_record_wins() {
        let products = vec![
            ProductRecord::new("A", 10.0, None),
            ProductRecord::new("A", 99.0, None),
        ];
        let builder = BalanceMatrixBuilder::new();
        let parts = builder.known_parts(&products);
        assert_eq!(builder.starting_quantities(&parts, &products), vec![10.0]);
    }

    #[test]
    fn test_starting_quantity_skips_missing_values() {
        let products = vec![
            ProductRecord {
                month_end_inventory: RawQuantity::Absent,
                ..ProductRecord::new("A", 0.0, None)
            },
            ProductRecord::new("A", 7.0, None),
        ];
        let builder = BalanceMatrixBuilder::new();
        let parts = builder.known_parts(&products);
        assert_eq!(builder.starting_quantities(&parts, &products), vec![7.0]);
    }

    #[test]
    fn test_non_numeric_starting_quantity_is_zero() {
        let products = vec![
            ProductRecord {
                month_end_inventory: RawQuantity::Text("N/A".to_string()),
                ..ProductRecord::new("A", 0.0, None)
            },
            ProductRecord::new("A", 7.0, None),
        ];
        let builder = BalanceMatrixBuilder::new();
        let parts = builder.known_parts(&products);
        assert_eq!(builder.starting_quantities(&parts, &products), vec![0.0]);
    }

    #[test]
    fn test_blank_text_starting_quantity_pins_first_record() {
        let products = vec![
            ProductRecord {
                month_end_inventory: RawQuantity::Text("   ".to_string()),
                ..ProductRecord::new("A", 0.0, None)
            },
            ProductRecord::new("A", 9.0, None),
            ProductRecord {
                month_end_inventory: RawQuantity::Number(f64::NAN),
                ..ProductRecord::new("B", 0.0, None)
            },
            ProductRecord::new("B", 4.0, None),
        ];
        let builder = BalanceMatrixBuilder::new();
        let parts = builder.known_parts(&products);
        assert_eq!(builder.starting_quantities(&parts, &products), vec![0.0, 4.0]);
    }

    #[test]
    fn test_first_day_applies_flows_on_top_of_opening() {
        let parts = PartIndex::from_parts(["A"]);
        let mut inbound = DailyQuantities::zeros(horizon(), 1);
        let mut outbound = DailyQuantities::zeros(horizon(), 1);
        inbound.add(0, 0, 4.0);
        outbound.add(0, 0, 1.0);

        let matrix = BalanceMatrixBuilder::new().build(&parts, &[10.0], &inbound, &outbound);
        assert_eq!(matrix.column("A").unwrap()[0], 13.0);
        assert!(matrix.column("A").unwrap().iter().all(|v| *v == 13.0));
    }

    #[test]
    fn test_idle_part_is_explicit_zero_column() {
        let parts = PartIndex::from_parts(["IDLE"]);
        let inbound = DailyQuantities::zeros(horizon(), 1);
        let outbound = DailyQuantities::zeros(horizon(), 1);

        let matrix = BalanceMatrixBuilder::new().build(&parts, &[0.0], &inbound, &outbound);
        let column = matrix.column("IDLE").unwrap();
        assert_eq!(column.len(), 181);
        assert!(column.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_roll_forward_identity() {
        let parts = PartIndex::from_parts(["A", "B"]);
        let mut inbound = DailyQuantities::zeros(horizon(), 2);
        let mut outbound = DailyQuantities::zeros(horizon(), 2);
        for d in (0..181).step_by(7) {
            inbound.add(d, 0, (d % 5) as f64 + 1.0);
            outbound.add(d + 1, 1, 2.0);
        }
        outbound.add(90, 0, 30.0);

        let matrix = BalanceMatrixBuilder::new().build(&parts, &[5.0, 50.0], &inbound, &outbound);
        for (part_idx, part_no) in ["A", "B"].iter().enumerate() {
            let column = matrix.column(part_no).unwrap();
            for d in 1..181 {
                let expected = column[d - 1] + inbound.get(d, part_idx) - outbound.get(d, part_idx);
                assert_eq!(column[d], expected, "part={} day={}", part_no, d);
            }
        }
    }
}
