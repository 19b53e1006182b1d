// ==========================================
// 每日库存模拟 - 导出模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("输出目录不可用 ({path}): {message}")]
    OutputDirUnavailable { path: String, message: String },

    #[error("报表写入失败 ({path}): {message}")]
    WriteFailed { path: String, message: String },

    #[error("Excel 生成失败: {0}")]
    XlsxError(String),

    #[error("CSV 生成失败: {0}")]
    CsvError(String),

    #[error("报表为空: {0}")]
    EmptyReport(String),
}

// 实现 From<rust_xlsxwriter::XlsxError>
impl From<rust_xlsxwriter::XlsxError> for ExportError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        ExportError::XlsxError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ExportError {
    fn from(err: csv::Error) -> Self {
        ExportError::CsvError(err.to_string())
    }
}

/// Result 类型别名
pub type ExportResult<T> = Result<T, ExportError>;
