// ==========================================
// 每日库存模拟 - 顶层错误类型
// ==========================================
// 各层错误映射到统一分类；任何一类都中止整次运行，不输出部分结果
// ==========================================

use crate::config::ConfigError;
use crate::engine::error::EngineError;
use crate::exporter::error::ExportError;
use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimulationError {
    #[error("源数据不可用: {0}")]
    SourceUnavailable(#[from] RepositoryError),

    #[error("源数据记录格式错误: {0}")]
    MalformedRecord(#[from] EngineError),

    #[error("料号对照表不可用: {0}")]
    MappingUnavailable(#[from] ImportError),

    #[error("报表导出失败: {0}")]
    ExportFailure(#[from] ExportError),

    #[error("配置错误: {0}")]
    Configuration(#[from] ConfigError),
}

/// Result 类型别名
pub type SimulationResult<T> = Result<T, SimulationError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;

    #[test]
    fn test_invalid_config_maps_to_configuration() {
        let mut config = SimulationConfig::default();
        let err = config
            .set_value("report_format", "pdf")
            .map_err(SimulationError::from)
            .unwrap_err();
        assert!(matches!(err, SimulationError::Configuration(_)));
        assert!(err.to_string().starts_with("配置错误"));
    }
}
