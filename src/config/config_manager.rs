// ==========================================
// 每日库存模拟 - 配置管理器
// ==========================================
// 职责: 读取源数据库中的 config_kv 覆写项
// 存储: config_kv 表 (key-value + scope)，仅读取 scope_id='global'
// 说明: 表不存在视为无覆写
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::simulation_config::SimulationConfig;
use crate::db::{configure_sqlite_connection, open_source_connection, table_exists};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use tracing::warn;

const CONFIG_TABLE: &str = "config_kv";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 以只读方式打开配置所在的数据库
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> ConfigResult<Self> {
        let conn = open_source_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ConfigResult<Self> {
        {
            let conn_guard = conn
                .lock()
                .map_err(|e| ConfigError::LockError(e.to_string()))?;
            configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 读取 global scope 的配置值
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在或 config_kv 表不存在
    pub fn get_global_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| ConfigError::LockError(e.to_string()))?;

        if !table_exists(&conn, CONFIG_TABLE)? {
            return Ok(None);
        }

        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// global scope 全部配置（按键排序）
    pub fn get_config_snapshot(&self) -> ConfigResult<BTreeMap<String, String>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| ConfigError::LockError(e.to_string()))?;

        if !table_exists(&conn, CONFIG_TABLE)? {
            return Ok(BTreeMap::new());
        }

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global'")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut snapshot = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            snapshot.insert(key, value);
        }
        Ok(snapshot)
    }

    /// 将 config_kv 中的已知键写入配置，返回生效的项数
    pub fn apply_overrides(&self, config: &mut SimulationConfig) -> ConfigResult<usize> {
        let mut applied = 0;
        for (key, value) in self.get_config_snapshot()? {
            if config.set_value(&key, &value)? {
                applied += 1;
            } else {
                warn!(config_key = %key, "未知配置项，已忽略");
            }
        }
        Ok(applied)
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 路径
    pub const MAPPING_FILE_PATH: &str = "mapping_file_path";
    pub const REPORT_OUTPUT_DIR: &str = "report_output_dir";
    pub const LOG_DIR: &str = "log_dir";

    // 报表
    pub const REPORT_FORMAT: &str = "report_format"; // xlsx | csv
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::ReportFormat;

    fn manager_with(sql: &str) -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(sql).unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    const SCHEMA: &str =
        "CREATE TABLE config_kv (scope_id TEXT NOT NULL, key TEXT NOT NULL, value TEXT NOT NULL);";

    #[test]
    fn test_missing_table_means_no_overrides() {
        let manager = manager_with("CREATE TABLE other (x INTEGER);");
        assert_eq!(manager.get_global_config_value(config_keys::LOG_DIR).unwrap(), None);

        let mut config = SimulationConfig::default();
        assert_eq!(manager.apply_overrides(&mut config).unwrap(), 0);
        assert_eq!(config, SimulationConfig::default());
    }

    #[test]
    fn test_global_scope_only() {
        let manager = manager_with(&format!(
            "{SCHEMA}
             INSERT INTO config_kv VALUES ('global', 'report_format', 'csv');
             INSERT INTO config_kv VALUES ('user', 'log_dir', '/ignored');"
        ));

        assert_eq!(
            manager.get_global_config_value(config_keys::REPORT_FORMAT).unwrap(),
            Some("csv".to_string())
        );
        assert_eq!(manager.get_global_config_value(config_keys::LOG_DIR).unwrap(), None);
    }

    #[test]
    fn test_apply_overrides() {
        let manager = manager_with(&format!(
            "{SCHEMA}
             INSERT INTO config_kv VALUES ('global', 'report_format', 'csv');
             INSERT INTO config_kv VALUES ('global', 'excluded_order_statuses', '[\"cancel\"]');
             INSERT INTO config_kv VALUES ('global', 'legacy_key', '1');"
        ));

        let mut config = SimulationConfig::default();
        assert_eq!(manager.apply_overrides(&mut config).unwrap(), 1);
        assert_eq!(config.report_format, ReportFormat::Csv);
        assert_eq!(
            config,
            SimulationConfig {
                report_format: ReportFormat::Csv,
                ..SimulationConfig::default()
            }
        );
    }

    #[test]
    fn test_invalid_override_is_error() {
        let manager = manager_with(&format!(
            "{SCHEMA}
             INSERT INTO config_kv VALUES ('global', 'report_format', 'pdf');"
        ));
        let mut config = SimulationConfig::default();
        assert!(matches!(
            manager.apply_overrides(&mut config),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
