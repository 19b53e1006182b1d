// ==========================================
// 每日库存模拟 - 核心库
// ==========================================
// 技术栈: Rust + SQLite + Excel
// 系统定位: 半年滚动库存推演，按料号对照表合并后输出日报
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 源数据访问
pub mod repository;

// 引擎层 - 推演规则
pub mod engine;

// 导入层 - 料号对照表
pub mod importer;

// 导出层 - 报表文件
pub mod exporter;

// 配置层 - 运行配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 顶层错误
pub mod error;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    AliasRule, AliasRuleSet, BalanceMatrix, InventoryReport, OrderRecord, ProductRecord,
    ReportFormat, ReportRow, ShipmentRecord, SimulationHorizon, SourceSnapshot,
};

// 引擎
pub use engine::{
    AliasResolver, BalanceMatrixBuilder, InventorySimulation, ReportAssembler, SimulationOutcome,
    TimeSeriesNormalizer,
};

// 数据接口
pub use exporter::{CsvReportExporter, ReportSink, XlsxReportExporter};
pub use importer::{AliasMappingProvider, MappingFileLoader};
pub use repository::{SourceDataProvider, SqliteSourceRepository};

pub use config::SimulationConfig;
pub use error::{SimulationError, SimulationResult};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "每日库存模拟";
