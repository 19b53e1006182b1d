// ==========================================
// 每日库存模拟 - 引擎层
// ==========================================
// 职责: 归一化、逐日推演、别名解析、报表组装
// 红线: Engine 不拼 SQL、不读写文件
// ==========================================

pub mod alias_resolver;
pub mod balance;
pub mod error;
pub mod normalizer;
pub mod orchestrator;
pub mod report_assembler;

// 重导出核心引擎
pub use alias_resolver::{AliasResolver, ResolutionSummary};
pub use balance::BalanceMatrixBuilder;
pub use error::{EngineError, EngineResult};
pub use normalizer::{
    parse_source_date, NormalizationStats, NormalizedSeries, SeriesStats, TimeSeriesNormalizer,
};
pub use orchestrator::{InventorySimulation, SimulationOutcome, SimulationRun};
pub use report_assembler::ReportAssembler;
