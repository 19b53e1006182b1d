// ==========================================
// 每日库存模拟 - 仓储层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 仓储层任何错误都意味着源数据不可用，整次运行中止
// ==========================================

use thiserror::Error;

/// 仓储层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== 数据库错误 =====
    #[error("数据库连接失败 ({path}): {message}")]
    DatabaseConnectionError { path: String, message: String },

    #[error("数据库锁获取失败: {0}")]
    LockError(String),

    #[error("源数据表不存在: {0}")]
    TableMissing(String),

    #[error("数据库查询失败: {0}")]
    DatabaseQueryError(String),
}

// 实现 From<rusqlite::Error>
impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) if msg.contains("no such table") => {
                RepositoryError::TableMissing(msg)
            }
            rusqlite::Error::SqliteFailure(_, Some(msg)) => {
                RepositoryError::DatabaseQueryError(msg)
            }
            _ => RepositoryError::DatabaseQueryError(err.to_string()),
        }
    }
}

/// Result 类型别名
pub type RepositoryResult<T> = Result<T, RepositoryError>;
