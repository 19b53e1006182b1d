// ==========================================
// 每日库存模拟 - 领域模型层
// ==========================================
// 职责: 定义源数据记录、模拟窗口、余额矩阵、别名规则、报表结构
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod alias;
pub mod horizon;
pub mod matrix;
pub mod report;
pub mod source;
pub mod types;

// 重导出核心类型
pub use alias::{AliasRule, AliasRuleSet, ManyToOneGroup, OneToOneRule};
pub use horizon::{SimulationHorizon, HORIZON_DAYS};
pub use matrix::{BalanceMatrix, DailyQuantities, PartColumn, PartIndex};
pub use report::{InventoryReport, ReportRow, MODEL_HEADER, PART_NO_HEADER};
pub use source::{OrderRecord, ProductRecord, RawQuantity, ShipmentRecord, SourceSnapshot};
pub use types::{ReportFormat, SourceTable, EXCLUDED_ORDER_STATUSES};
