// ==========================================
// 每日库存模拟 - 运行配置
// ==========================================
// 优先级（高 → 低）: 环境变量 > config_kv 表 > 默认值
// 说明: 模拟窗口长度固定，不提供配置项
// ==========================================

use crate::config::config_manager::{config_keys, ConfigManager};
use crate::config::error::{ConfigError, ConfigResult};
use crate::domain::types::ReportFormat;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 环境变量名
pub mod env_keys {
    pub const DB_PATH: &str = "INVENTORY_SIM_DB_PATH";
    pub const MAPPING_FILE: &str = "INVENTORY_SIM_MAPPING_FILE";
    pub const REPORT_DIR: &str = "INVENTORY_SIM_REPORT_DIR";
    pub const LOG_DIR: &str = "INVENTORY_SIM_LOG_DIR";
    pub const AS_OF: &str = "INVENTORY_SIM_AS_OF";
}

/// 应用数据目录名
const APP_DIR_NAME: &str = "inventory-simulate";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub source_db_path: String,
    pub mapping_file_path: PathBuf,
    pub report_output_dir: PathBuf,
    pub log_dir: PathBuf,
    pub report_format: ReportFormat,
    pub as_of_date: Option<NaiveDate>, // None → 取运行当天
}

/// 默认数据目录: <系统数据目录>/inventory-simulate，取不到时退回当前目录
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from("."))
}

impl Default for SimulationConfig {
    fn default() -> Self {
        let data_dir = default_data_dir();
        Self {
            source_db_path: data_dir.join("source.db").to_string_lossy().into_owned(),
            mapping_file_path: data_dir.join("part_mapping.xlsx"),
            report_output_dir: data_dir.join("reports"),
            log_dir: data_dir.join("logs"),
            report_format: ReportFormat::default(),
            as_of_date: None,
        }
    }
}

impl SimulationConfig {
    /// 从进程环境加载
    pub fn load() -> ConfigResult<Self> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// 加载配置
    ///
    /// # 参数
    /// - env: 环境变量读取函数（测试时可替换）
    ///
    /// # 流程
    /// 1. 默认值
    /// 2. 源库路径（环境变量可覆盖，用于定位 config_kv）
    /// 3. 源库存在时读取 config_kv 覆写
    /// 4. 其余环境变量覆写
    pub fn load_with<F>(env: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(db_path) = non_blank(env(env_keys::DB_PATH)) {
            config.source_db_path = db_path;
        }

        if Path::new(&config.source_db_path).is_file() {
            let manager = ConfigManager::new(&config.source_db_path)?;
            let applied = manager.apply_overrides(&mut config)?;
            debug!(applied, "config_kv 覆写已应用");
        }

        config.apply_env(env)?;

        info!(
            source_db = %config.source_db_path,
            mapping_file = %config.mapping_file_path.display(),
            report_dir = %config.report_output_dir.display(),
            report_format = %config.report_format,
            as_of = ?config.as_of_date,
            "运行配置加载完成"
        );
        Ok(config)
    }

    /// 应用环境变量覆写（不含源库路径）
    pub fn apply_env<F>(&mut self, env: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = non_blank(env(env_keys::MAPPING_FILE)) {
            self.mapping_file_path = PathBuf::from(path);
        }
        if let Some(path) = non_blank(env(env_keys::REPORT_DIR)) {
            self.report_output_dir = PathBuf::from(path);
        }
        if let Some(path) = non_blank(env(env_keys::LOG_DIR)) {
            self.log_dir = PathBuf::from(path);
        }
        if let Some(raw) = non_blank(env(env_keys::AS_OF)) {
            self.as_of_date = Some(parse_as_of(env_keys::AS_OF, &raw)?);
        }
        Ok(())
    }

    /// 设置单个配置项（config_kv 键名）
    pub fn set_value(&mut self, key: &str, value: &str) -> ConfigResult<bool> {
        match key {
            config_keys::MAPPING_FILE_PATH => self.mapping_file_path = PathBuf::from(value),
            config_keys::REPORT_OUTPUT_DIR => self.report_output_dir = PathBuf::from(value),
            config_keys::LOG_DIR => self.log_dir = PathBuf::from(value),
            config_keys::REPORT_FORMAT => {
                self.report_format = value.parse().map_err(|message| ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: value.to_string(),
                    message,
                })?;
            }
            _ => return Ok(false),
        }
        Ok(true)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_as_of(key: &str, raw: &str) -> ConfigResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| ConfigError::InvalidValue {
        key: key.to_string(),
        value: raw.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = SimulationConfig::default();
        assert_eq!(config.report_format, ReportFormat::Xlsx);
        assert!(config.as_of_date.is_none());
    }

    #[test]
    fn test_env_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let missing_db = dir.path().join("absent.db");
        let config = SimulationConfig::load_with(env_from(&[
            (env_keys::DB_PATH, missing_db.to_str().unwrap()),
            (env_keys::REPORT_DIR, "/tmp/reports"),
            (env_keys::AS_OF, "2026-10-16"),
            (env_keys::LOG_DIR, "   "),
        ]))
        .unwrap();

        assert_eq!(config.source_db_path, missing_db.to_str().unwrap());
        assert_eq!(config.report_output_dir, PathBuf::from("/tmp/reports"));
        assert_eq!(config.as_of_date, NaiveDate::from_ymd_opt(2026, 10, 16));
        assert_eq!(config.log_dir, SimulationConfig::default().log_dir);
    }

    #[test]
    fn test_invalid_as_of() {
        let mut config = SimulationConfig::default();
        let err = config
            .apply_env(env_from(&[(env_keys::AS_OF, "16/10/2026")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_set_value() {
        let mut config = SimulationConfig::default();
        assert!(config.set_value(config_keys::REPORT_FORMAT, "csv").unwrap());
        assert!(!config.set_value("unknown_key", "x").unwrap());
        // 订单排除状态固定，不接受覆写
        assert!(!config
            .set_value("excluded_order_statuses", r#"["cancel"]"#)
            .unwrap());

        assert_eq!(config.report_format, ReportFormat::Csv);
        assert!(config.set_value(config_keys::REPORT_FORMAT, "pdf").is_err());
    }
}
