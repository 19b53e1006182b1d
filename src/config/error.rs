// ==========================================
// 每日库存模拟 - 配置层错误类型
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置库访问失败: {0}")]
    DatabaseError(String),

    #[error("数据库锁获取失败: {0}")]
    LockError(String),

    #[error("配置项取值无效 ({key} = {value:?}): {message}")]
    InvalidValue {
        key: String,
        value: String,
        message: String,
    },
}

impl From<rusqlite::Error> for ConfigError {
    fn from(err: rusqlite::Error) -> Self {
        ConfigError::DatabaseError(err.to_string())
    }
}

/// Result 类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
