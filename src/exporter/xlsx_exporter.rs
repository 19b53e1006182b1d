// ==========================================
// 每日库存模拟 - Excel 报表导出
// ==========================================
// 版式:
// - A 列料号, B 列机型, C 列起每日一列
// - 表头: 白色粗体, 底色 #4F81BD, 居中, 细边框, 冻结首行
// - 数据: 细边框, 偶数行浅灰底 #EAEAEA, 数值右对齐 "#,##0"
// - 负数红字, 月末列粗体, 负数且月末 → 红色粗体
// - 列宽 = 最长显示文本 + 2
// ==========================================

use crate::domain::report::{InventoryReport, MODEL_HEADER, PART_NO_HEADER};
use crate::domain::types::ReportFormat;
use crate::exporter::error::{ExportError, ExportResult};
use crate::exporter::report_sink::{
    ensure_output_dir, report_file_name, write_atomically, ReportSink,
};
use chrono::{Datelike, NaiveDate};
use rust_xlsxwriter::{
    Color, ExcelDateTime, Format, FormatAlign, FormatBorder, Workbook, Worksheet,
};
use std::path::{Path, PathBuf};
use tracing::info;

/// 工作表名
pub const SHEET_NAME: &str = "Inventory";

/// 首个日期列（0 起）
const FIRST_DATE_COL: u16 = 2;

const HEADER_FILL: u32 = 0x4F81BD;
const STRIPE_FILL: u32 = 0xEAEAEA;
const NEGATIVE_FONT: u32 = 0xFF0000;
const NUMBER_FORMAT: &str = "#,##0";
const DATE_FORMAT: &str = "yyyy-mm-dd";

/// 日期是否为当月最后一天
pub fn is_month_end(date: NaiveDate) -> bool {
    date.succ_opt().map_or(true, |next| next.month() != date.month())
}

/// 按 "#,##0" 渲染数值（用于估算列宽）
pub fn format_thousands(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{}", rounded.abs() as i64);
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0.0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

// ==========================================
// 单元格格式集合
// ==========================================
struct CellFormats {
    text: Format,
    number: Format,
    negative: Format,
    month_end: Format,
    negative_month_end: Format,
}

impl CellFormats {
    fn new(striped: bool) -> Self {
        let base = |f: Format| {
            let f = f.set_border(FormatBorder::Thin);
            if striped {
                f.set_background_color(Color::RGB(STRIPE_FILL))
            } else {
                f
            }
        };
        let number = || {
            base(Format::new())
                .set_align(FormatAlign::Right)
                .set_align(FormatAlign::VerticalCenter)
                .set_num_format(NUMBER_FORMAT)
        };

        Self {
            text: base(Format::new())
                .set_align(FormatAlign::Left)
                .set_align(FormatAlign::VerticalCenter),
            number: number(),
            negative: number().set_font_color(Color::RGB(NEGATIVE_FONT)),
            month_end: number().set_bold(),
            negative_month_end: number()
                .set_font_color(Color::RGB(NEGATIVE_FONT))
                .set_bold(),
        }
    }

    fn for_value(&self, value: f64, month_end: bool) -> &Format {
        match (value < 0.0, month_end) {
            (true, true) => &self.negative_month_end,
            (true, false) => &self.negative,
            (false, true) => &self.month_end,
            (false, false) => &self.number,
        }
    }
}

fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_font_color(Color::White)
        .set_background_color(Color::RGB(HEADER_FILL))
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_border(FormatBorder::Thin)
}

// ==========================================
// XlsxReportExporter
// ==========================================
#[derive(Debug, Clone)]
pub struct XlsxReportExporter {
    output_dir: PathBuf,
}

impl XlsxReportExporter {
    pub fn new<P: AsRef<Path>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    /// 生成工作簿字节
    pub fn render_to_bytes(&self, report: &InventoryReport) -> ExportResult<Vec<u8>> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name(SHEET_NAME)?;

        self.write_header(sheet, report)?;
        self.write_rows(sheet, report)?;
        self.fit_columns(sheet, report)?;
        sheet.set_freeze_panes(1, 0)?;

        Ok(workbook.save_to_buffer()?)
    }

    fn write_header(&self, sheet: &mut Worksheet, report: &InventoryReport) -> ExportResult<()> {
        let header = header_format();
        let date_header = header_format().set_num_format(DATE_FORMAT);

        sheet.write_string_with_format(0, 0, PART_NO_HEADER, &header)?;
        sheet.write_string_with_format(0, 1, MODEL_HEADER, &header)?;

        for (idx, date) in report.dates.iter().enumerate() {
            let col = FIRST_DATE_COL + idx as u16;
            let excel_date =
                ExcelDateTime::from_ymd(date.year() as u16, date.month() as u8, date.day() as u8)?;
            sheet.write_datetime_with_format(0, col, &excel_date, &date_header)?;
        }
        Ok(())
    }

    fn write_rows(&self, sheet: &mut Worksheet, report: &InventoryReport) -> ExportResult<()> {
        let plain = CellFormats::new(false);
        let striped = CellFormats::new(true);
        let month_ends: Vec<bool> = report.dates.iter().map(|d| is_month_end(*d)).collect();

        for (idx, row) in report.rows.iter().enumerate() {
            let sheet_row = idx as u32 + 1;
            // 工作表第 2、4、6… 行（1 起）加底色
            let formats = if sheet_row % 2 == 1 { &striped } else { &plain };

            sheet.write_string_with_format(sheet_row, 0, &row.part_no, &formats.text)?;
            match row.model.as_deref() {
                Some(model) => sheet.write_string_with_format(sheet_row, 1, model, &formats.text)?,
                None => sheet.write_blank(sheet_row, 1, &formats.text)?,
            };

            for (date_idx, value) in row.balances.iter().enumerate() {
                let col = FIRST_DATE_COL + date_idx as u16;
                let month_end = month_ends.get(date_idx).copied().unwrap_or(false);
                sheet.write_number_with_format(
                    sheet_row,
                    col,
                    *value,
                    formats.for_value(*value, month_end),
                )?;
            }
        }
        Ok(())
    }

    fn fit_columns(&self, sheet: &mut Worksheet, report: &InventoryReport) -> ExportResult<()> {
        let part_width = report
            .rows
            .iter()
            .map(|r| r.part_no.chars().count())
            .chain(std::iter::once(PART_NO_HEADER.len()))
            .max()
            .unwrap_or(0);
        let model_width = report
            .rows
            .iter()
            .filter_map(|r| r.model.as_ref().map(|m| m.chars().count()))
            .chain(std::iter::once(MODEL_HEADER.len()))
            .max()
            .unwrap_or(0);

        sheet.set_column_width(0, (part_width + 2) as f64)?;
        sheet.set_column_width(1, (model_width + 2) as f64)?;

        for date_idx in 0..report.dates.len() {
            let widest = report
                .rows
                .iter()
                .filter_map(|r| r.balances.get(date_idx))
                .map(|v| format_thousands(*v).len())
                .chain(std::iter::once(DATE_FORMAT.len()))
                .max()
                .unwrap_or(0);
            sheet.set_column_width(FIRST_DATE_COL + date_idx as u16, (widest + 2) as f64)?;
        }
        Ok(())
    }
}

impl ReportSink for XlsxReportExporter {
    fn export(&self, report: &InventoryReport) -> ExportResult<PathBuf> {
        if report.dates.is_empty() {
            return Err(ExportError::EmptyReport("日期轴为空".to_string()));
        }

        let bytes = self.render_to_bytes(report)?;
        ensure_output_dir(&self.output_dir)?;
        let path = self
            .output_dir
            .join(report_file_name(report.generated_at, ReportFormat::Xlsx));
        write_atomically(&path, &bytes)?;

        info!(
            path = %path.display(),
            rows = report.rows.len(),
            bytes = bytes.len(),
            "Excel 报表导出成功"
        );
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_is_month_end() {
        assert!(is_month_end(date(2026, 1, 31)));
        assert!(is_month_end(date(2028, 2, 29)));
        assert!(!is_month_end(date(2028, 2, 28)));
        assert!(is_month_end(date(2026, 12, 31)));
        assert!(!is_month_end(date(2026, 12, 30)));
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0.0), "0");
        assert_eq!(format_thousands(999.4), "999");
        assert_eq!(format_thousands(1234.0), "1,234");
        assert_eq!(format_thousands(-1234567.0), "-1,234,567");
    }

    #[test]
    fn test_for_value_selects_format() {
        let formats = CellFormats::new(false);
        assert!(std::ptr::eq(formats.for_value(-1.0, true), &formats.negative_month_end));
        assert!(std::ptr::eq(formats.for_value(-1.0, false), &formats.negative));
        assert!(std::ptr::eq(formats.for_value(1.0, true), &formats.month_end));
        assert!(std::ptr::eq(formats.for_value(0.0, false), &formats.number));
    }
}
