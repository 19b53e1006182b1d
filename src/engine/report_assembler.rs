// ==========================================
// 每日库存模拟 - 报表组装器
// ==========================================
// 职责: 余额矩阵转置（料号为行、日期为列）并附加机型
// 红线: 不做任何数值运算
// ==========================================

use crate::domain::matrix::BalanceMatrix;
use crate::domain::report::{InventoryReport, ReportRow};
use crate::domain::source::ProductRecord;
use chrono::NaiveDateTime;
use std::collections::HashMap;
use tracing::info;

#[derive(Debug, Default)]
pub struct ReportAssembler;

impl ReportAssembler {
    pub fn new() -> Self {
        Self
    }

    /// 料号 → 机型
    ///
    /// 同一料号出现多次时以最后一条记录为准；机型为空白的记录同样参与覆盖。
    pub fn model_lookup(&self, products: &[ProductRecord]) -> HashMap<String, Option<String>> {
        products
            .iter()
            .filter_map(|record| {
                record.normalized_part_no().map(|part_no| {
                    let model = record
                        .model
                        .as_deref()
                        .map(str::trim)
                        .filter(|m| !m.is_empty())
                        .map(str::to_string);
                    (part_no.to_string(), model)
                })
            })
            .collect()
    }

    pub fn assemble(
        &self,
        matrix: &BalanceMatrix,
        products: &[ProductRecord],
        run_id: &str,
        generated_at: NaiveDateTime,
    ) -> InventoryReport {
        let models = self.model_lookup(products);

        let rows: Vec<ReportRow> = matrix
            .columns()
            .iter()
            .map(|column| ReportRow {
                part_no: column.part_no.clone(),
                model: models.get(&column.part_no).cloned().flatten(),
                balances: column.balances.clone(),
            })
            .collect();

        let without_model = rows.iter().filter(|r| r.model.is_none()).count();
        info!(rows = rows.len(), without_model, "报表组装完成");

        InventoryReport {
            run_id: run_id.to_string(),
            generated_at,
            dates: matrix.dates().collect(),
            rows,
        }
    }
}
