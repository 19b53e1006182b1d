// ==========================================
// 每日库存模拟 - 领域类型定义
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// 不构成需求的订单状态（精确匹配）
pub const EXCLUDED_ORDER_STATUSES: [&str; 4] =
    ["quotation", "cancel", "confirming", "double cancel"];

// ==========================================
// 源数据表 (Source Table)
// ==========================================
// 用于错误与日志中标注记录来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceTable {
    FactoryShipment, // 工厂出货
    OrderInfo,       // 订单
    ProductInfo,     // 产品主数据
}

impl fmt::Display for SourceTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceTable::FactoryShipment => write!(f, "factory_shipment"),
            SourceTable::OrderInfo => write!(f, "order_info"),
            SourceTable::ProductInfo => write!(f, "product_info"),
        }
    }
}

// ==========================================
// 报表格式 (Report Format)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Xlsx,
    Csv,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Xlsx => "xlsx",
            ReportFormat::Csv => "csv",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "xlsx" => Ok(ReportFormat::Xlsx),
            "csv" => Ok(ReportFormat::Csv),
            other => Err(format!("未知报表格式: {}", other)),
        }
    }
}
