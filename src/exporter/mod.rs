// ==========================================
// 每日库存模拟 - 导出层
// ==========================================
// 职责: 将 InventoryReport 写为带样式的 Excel 或 CSV
// ==========================================

pub mod csv_exporter;
pub mod error;
pub mod report_sink;
pub mod xlsx_exporter;

pub use csv_exporter::CsvReportExporter;
pub use error::{ExportError, ExportResult};
pub use report_sink::{report_file_name, ReportSink, REPORT_FILE_PREFIX};
pub use xlsx_exporter::XlsxReportExporter;

use crate::domain::types::ReportFormat;
use std::path::Path;

/// 按格式构造报表输出端
pub fn sink_for_format<P: AsRef<Path>>(format: ReportFormat, output_dir: P) -> Box<dyn ReportSink> {
    match format {
        ReportFormat::Xlsx => Box::new(XlsxReportExporter::new(output_dir)),
        ReportFormat::Csv => Box::new(CsvReportExporter::new(output_dir)),
    }
}
