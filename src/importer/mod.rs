// ==========================================
// 每日库存模拟 - 导入层
// ==========================================
// 职责: 读取外部料号对照表,生成别名规则
// 支持: Excel 工作簿 / CSV 目录
// ==========================================

pub mod error;
pub mod file_parser;
pub mod mapping_loader;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, ExcelParser, ParsedTable};
pub use mapping_loader::{AliasMappingProvider, MappingFileLoader};
