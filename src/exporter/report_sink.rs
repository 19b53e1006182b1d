// ==========================================
// 每日库存模拟 - 报表输出接口
// ==========================================
// 职责: 文件命名、落盘；样式由具体实现决定
// 红线: 要么完整写出报表，要么不留下任何报表文件
// ==========================================

use crate::domain::report::InventoryReport;
use crate::domain::types::ReportFormat;
use crate::exporter::error::{ExportError, ExportResult};
use chrono::NaiveDateTime;
use std::fs;
use std::path::{Path, PathBuf};

/// 报表文件名前缀
pub const REPORT_FILE_PREFIX: &str = "Daily_Inventory_Simulate";

// ==========================================
// ReportSink Trait
// ==========================================
// 实现者: XlsxReportExporter / CsvReportExporter
pub trait ReportSink {
    /// 写出报表并返回文件路径
    fn export(&self, report: &InventoryReport) -> ExportResult<PathBuf>;
}

/// 报表文件名: Daily_Inventory_Simulate_YYYY-MM-DD_HH-MM.<ext>
pub fn report_file_name(generated_at: NaiveDateTime, format: ReportFormat) -> String {
    format!(
        "{}_{}.{}",
        REPORT_FILE_PREFIX,
        generated_at.format("%Y-%m-%d_%H-%M"),
        format.extension()
    )
}

/// 确保输出目录存在
pub fn ensure_output_dir(dir: &Path) -> ExportResult<()> {
    fs::create_dir_all(dir).map_err(|e| ExportError::OutputDirUnavailable {
        path: dir.display().to_string(),
        message: e.to_string(),
    })
}

/// 先写临时文件再改名，避免留下半截文件
pub fn write_atomically(path: &Path, bytes: &[u8]) -> ExportResult<()> {
    let mut tmp_name = path.as_os_str().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    let write_failed = |e: std::io::Error| ExportError::WriteFailed {
        path: path.display().to_string(),
        message: e.to_string(),
    };

    fs::write(&tmp_path, bytes).map_err(write_failed)?;
    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(write_failed(e));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_report_file_name() {
        let generated_at = NaiveDate::from_ymd_opt(2026, 10, 16)
            .unwrap()
            .and_hms_opt(7, 5, 59)
            .unwrap();
        assert_eq!(
            report_file_name(generated_at, ReportFormat::Xlsx),
            "Daily_Inventory_Simulate_2026-10-16_07-05.xlsx"
        );
    }

    #[test]
    fn test_write_atomically_leaves_no_tmp() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("report.csv");
        write_atomically(&target, b"a,b\n").unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"a,b\n");
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_write_into_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("missing").join("report.csv");
        let err = write_atomically(&target, b"x").unwrap_err();
        assert!(matches!(err, ExportError::WriteFailed { .. }));
        assert!(!target.exists());
    }
}
