// ==========================================
// 每日库存模拟 - 表格文件解析器
// ==========================================
// 支持: Excel (.xlsx/.xls) 指定工作表 / CSV (.csv)
// 输出: 表头 + 行（表头 → 去空白的单元格文本）
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook_auto, Reader};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

// ==========================================
// ParsedTable - 解析后的表格
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ParsedTable {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<HashMap<String, String>>,
}

impl ParsedTable {
    /// 校验必需列存在
    pub fn require_columns(&self, columns: &[&str]) -> ImportResult<()> {
        for column in columns {
            if !self.headers.iter().any(|h| h == column) {
                return Err(ImportError::ColumnMissing {
                    table: self.name.clone(),
                    column: column.to_string(),
                });
            }
        }
        Ok(())
    }

    /// 读取单元格；空白视为缺失
    pub fn cell<'a>(row: &'a HashMap<String, String>, column: &str) -> Option<&'a str> {
        row.get(column).map(String::as_str).filter(|v| !v.is_empty())
    }
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl CsvParser {
    pub fn parse(&self, file_path: &Path) -> ImportResult<ParsedTable> {
        let path = file_path;

        // 检查文件存在
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        // 检查扩展名
        if let Some(ext) = path.extension() {
            if ext != "csv" {
                return Err(ImportError::UnsupportedFormat(
                    ext.to_string_lossy().to_string(),
                ));
            }
        }

        let file = File::open(path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        // 读取表头（去除 UTF-8 BOM）
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            let row_map: HashMap<String, String> = headers
                .iter()
                .zip(record.iter())
                .map(|(h, v)| (h.clone(), v.trim().to_string()))
                .collect();

            // 跳过完全空白的行
            if row_map.values().all(|v| v.is_empty()) {
                continue;
            }
            rows.push(row_map);
        }

        Ok(ParsedTable {
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default(),
            headers,
            rows,
        })
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl ExcelParser {
    /// 读取指定工作表（第一行为表头）
    pub fn parse_sheet(&self, file_path: &Path, sheet_name: &str) -> ImportResult<ParsedTable> {
        let path = file_path;

        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        if ext != "xlsx" && ext != "xls" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let mut workbook = open_workbook_auto(path)?;

        if !workbook.sheet_names().iter().any(|n| n == sheet_name) {
            return Err(ImportError::SheetMissing(sheet_name.to_string()));
        }

        let range = workbook.worksheet_range(sheet_name)?;

        // 提取表头（第一行）；空表视为无表头
        let mut rows_iter = range.rows();
        let headers: Vec<String> = match rows_iter.next() {
            Some(header_row) => header_row
                .iter()
                .map(|cell| cell.to_string().trim().to_string())
                .collect(),
            None => Vec::new(),
        };

        let mut rows = Vec::new();
        for data_row in rows_iter {
            let row_map: HashMap<String, String> = headers
                .iter()
                .zip(data_row.iter())
                .map(|(h, cell)| (h.clone(), cell.to_string().trim().to_string()))
                .collect();

            if row_map.values().all(|v| v.is_empty()) {
                continue;
            }
            rows.push(row_map);
        }

        Ok(ParsedTable {
            name: sheet_name.to_string(),
            headers,
            rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_csv_parser_valid_file() {
        let mut temp_file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(temp_file, "\u{feff}Free_Part_No,Main_Part_No").unwrap();
        writeln!(temp_file, " F-1 ,M-1").unwrap();
        writeln!(temp_file, "F-2,M-2").unwrap();

        let table = CsvParser.parse(temp_file.path()).unwrap();

        assert_eq!(table.headers, vec!["Free_Part_No", "Main_Part_No"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].get("Free_Part_No"), Some(&"F-1".to_string()));
        assert!(table.require_columns(&["Main_Part_No"]).is_ok());
        assert!(table.require_columns(&["Alias_Part_No"]).is_err());
    }

    #[test]
    fn test_csv_parser_skip_empty_rows() {
        let mut temp_file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(temp_file, "Excluded_Part_No").unwrap();
        writeln!(temp_file, "Z-1").unwrap();
        writeln!(temp_file, "  ").unwrap();
        writeln!(temp_file, "Z-2").unwrap();

        let table = CsvParser.parse(temp_file.path()).unwrap();
        assert_eq!(table.rows.len(), 2);
    }

    #[test]
    fn test_csv_parser_file_not_found() {
        let result = CsvParser.parse(Path::new("non_existent.csv"));
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }

    #[test]
    fn test_excel_parser_rejects_other_extensions() {
        let temp_file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        let result = ExcelParser.parse_sheet(temp_file.path(), "Exclude");
        assert!(matches!(result, Err(ImportError::UnsupportedFormat(_))));
    }
}
