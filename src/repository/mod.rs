// ==========================================
// 每日库存模拟 - 数据仓储层
// ==========================================
// 职责: 读取源数据表,屏蔽数据库细节
// 红线: Repository 不含业务逻辑
// 约束: 资源在单次运行内获取并释放
// ==========================================

pub mod error;
pub mod source_provider;
pub mod source_repo;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use source_provider::{InMemorySourceProvider, SourceDataProvider};
pub use source_repo::SqliteSourceRepository;
