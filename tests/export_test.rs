// ==========================================
// 报表导出集成测试
// ==========================================
// 测试目标: Excel 报表可被重新读取，内容与报表结构一致
// ==========================================

use calamine::{open_workbook_auto, Data, Reader};
use chrono::NaiveDate;
use inventory_simulate::domain::{InventoryReport, ReportRow};
use inventory_simulate::exporter::{ReportSink, XlsxReportExporter};
use std::fs;

fn sample_report() -> InventoryReport {
    let start = NaiveDate::from_ymd_opt(2026, 10, 30).unwrap();
    let dates: Vec<NaiveDate> = (0..3).map(|i| start + chrono::Duration::days(i)).collect();
    InventoryReport {
        run_id: "test-run".to_string(),
        generated_at: start.and_hms_opt(9, 15, 0).unwrap(),
        dates,
        rows: vec![
            ReportRow {
                part_no: "X".to_string(),
                model: Some("MX-100".to_string()),
                balances: vec![10.0, 1234.0, -5.0],
            },
            ReportRow {
                part_no: "LONG-PART-0001".to_string(),
                model: None,
                balances: vec![0.0, 0.0, 0.0],
            },
        ],
    }
}

fn number_at(range: &calamine::Range<Data>, row: u32, col: u32) -> Option<f64> {
    match range.get_value((row, col)) {
        Some(Data::Float(v)) => Some(*v),
        Some(Data::Int(v)) => Some(*v as f64),
        _ => None,
    }
}

#[test]
fn test_xlsx_export_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let exporter = XlsxReportExporter::new(dir.path());
    let path = exporter.export(&sample_report()).expect("Failed to export report");

    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        "Daily_Inventory_Simulate_2026-10-30_09-15.xlsx"
    );

    let mut workbook = open_workbook_auto(&path).expect("Failed to reopen workbook");
    let sheet_names = workbook.sheet_names().to_vec();
    assert_eq!(sheet_names, vec!["Inventory".to_string()]);

    let range = workbook.worksheet_range("Inventory").unwrap();
    assert_eq!(range.get_size(), (3, 5));

    assert_eq!(range.get_value((0, 0)).map(|c| c.to_string()), Some("Part_No".to_string()));
    assert_eq!(range.get_value((0, 1)).map(|c| c.to_string()), Some("Model".to_string()));
    assert_eq!(range.get_value((1, 0)).map(|c| c.to_string()), Some("X".to_string()));
    assert_eq!(range.get_value((1, 1)).map(|c| c.to_string()), Some("MX-100".to_string()));
    assert_eq!(
        range.get_value((2, 0)).map(|c| c.to_string()),
        Some("LONG-PART-0001".to_string())
    );

    assert_eq!(number_at(&range, 1, 2), Some(10.0));
    assert_eq!(number_at(&range, 1, 3), Some(1234.0));
    assert_eq!(number_at(&range, 1, 4), Some(-5.0));
    assert_eq!(number_at(&range, 2, 4), Some(0.0));
}

#[test]
fn test_xlsx_export_leaves_single_file() {
    let dir = tempfile::tempdir().unwrap();
    let out_dir = dir.path().join("nested").join("reports");
    XlsxReportExporter::new(&out_dir)
        .export(&sample_report())
        .expect("Failed to export report");

    let names: Vec<String> = fs::read_dir(&out_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names.len(), 1);
    assert!(names[0].ends_with(".xlsx"));
}

#[test]
fn test_render_without_rows() {
    let mut report = sample_report();
    report.rows.clear();
    let bytes = XlsxReportExporter::new(".")
        .render_to_bytes(&report)
        .expect("Header-only workbook should render");
    assert!(!bytes.is_empty());
}
