// ==========================================
// 每日库存模拟 - CSV 报表导出
// ==========================================
// 无样式；表头 Part_No, Model, 其后 YYYY-MM-DD
// 数值保留原始精度，空机型写空串
// ==========================================

use crate::domain::report::{InventoryReport, MODEL_HEADER, PART_NO_HEADER};
use crate::domain::types::ReportFormat;
use crate::exporter::error::{ExportError, ExportResult};
use crate::exporter::report_sink::{
    ensure_output_dir, report_file_name, write_atomically, ReportSink,
};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone)]
pub struct CsvReportExporter {
    output_dir: PathBuf,
}

impl CsvReportExporter {
    pub fn new<P: AsRef<Path>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    pub fn render_to_bytes(&self, report: &InventoryReport) -> ExportResult<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());

        let mut header = vec![PART_NO_HEADER.to_string(), MODEL_HEADER.to_string()];
        header.extend(report.dates.iter().map(|d| d.format("%Y-%m-%d").to_string()));
        writer.write_record(&header)?;

        for row in &report.rows {
            let mut record = Vec::with_capacity(row.balances.len() + 2);
            record.push(row.part_no.clone());
            record.push(row.model.clone().unwrap_or_default());
            record.extend(row.balances.iter().map(|v| v.to_string()));
            writer.write_record(&record)?;
        }

        writer
            .into_inner()
            .map_err(|e| ExportError::CsvError(e.to_string()))
    }
}

impl ReportSink for CsvReportExporter {
    fn export(&self, report: &InventoryReport) -> ExportResult<PathBuf> {
        if report.dates.is_empty() {
            return Err(ExportError::EmptyReport("日期轴为空".to_string()));
        }

        let bytes = self.render_to_bytes(report)?;
        ensure_output_dir(&self.output_dir)?;
        let path = self
            .output_dir
            .join(report_file_name(report.generated_at, ReportFormat::Csv));
        write_atomically(&path, &bytes)?;

        info!(path = %path.display(), rows = report.rows.len(), "CSV 报表导出成功");
        Ok(path)
    }
}
