// ==========================================
// 每日库存模拟 - 配置层
// ==========================================
// 职责: 运行配置加载，支持 config_kv 与环境变量覆写
// 存储: config_kv 表（可选）
// ==========================================

pub mod config_manager;
pub mod error;
pub mod simulation_config;

// 重导出核心配置类型
pub use config_manager::{config_keys, ConfigManager};
pub use error::{ConfigError, ConfigResult};
pub use simulation_config::{default_data_dir, env_keys, SimulationConfig};
