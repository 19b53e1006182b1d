// ==========================================
// 每日库存模拟 - 料号对照表加载器
// ==========================================
// 输入形式:
// 1) Excel 工作簿，包含三个工作表:
//    - Exclude   : Excluded_Part_No
//    - OneToOne  : Free_Part_No, Main_Part_No
//    - ManyToOne : Main_Part_No, Alias_Part_No
// 2) 目录，包含 exclude.csv / one_to_one.csv / many_to_one.csv（表头同上）
// 说明: 空白单元格所在的规则行被跳过；缺表/缺列视为错误
// ==========================================

use crate::domain::alias::{AliasRule, AliasRuleSet};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::{CsvParser, ExcelParser, ParsedTable};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const EXCLUDE_SHEET: &str = "Exclude";
pub const ONE_TO_ONE_SHEET: &str = "OneToOne";
pub const MANY_TO_ONE_SHEET: &str = "ManyToOne";

pub const EXCLUDE_CSV: &str = "exclude.csv";
pub const ONE_TO_ONE_CSV: &str = "one_to_one.csv";
pub const MANY_TO_ONE_CSV: &str = "many_to_one.csv";

pub const EXCLUDED_PART_COLUMN: &str = "Excluded_Part_No";
pub const FREE_PART_COLUMN: &str = "Free_Part_No";
pub const MAIN_PART_COLUMN: &str = "Main_Part_No";
pub const ALIAS_PART_COLUMN: &str = "Alias_Part_No";

// ==========================================
// AliasMappingProvider Trait
// ==========================================
// 实现者: MappingFileLoader（文件）/ AliasRuleSet（内存）
pub trait AliasMappingProvider {
    /// 每次运行加载一次
    fn load_rules(&self) -> ImportResult<AliasRuleSet>;
}

impl AliasMappingProvider for AliasRuleSet {
    fn load_rules(&self) -> ImportResult<AliasRuleSet> {
        Ok(self.clone())
    }
}

// ==========================================
// MappingFileLoader
// ==========================================
pub struct MappingFileLoader {
    path: PathBuf,
}

impl MappingFileLoader {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 读取三张规则表（排除 / 一对一 / 多对一）
    fn read_tables(&self) -> ImportResult<(ParsedTable, ParsedTable, ParsedTable)> {
        let path = self.path.as_path();
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        if path.is_dir() {
            let parser = CsvParser;
            return Ok((
                parser.parse(&path.join(EXCLUDE_CSV))?,
                parser.parse(&path.join(ONE_TO_ONE_CSV))?,
                parser.parse(&path.join(MANY_TO_ONE_CSV))?,
            ));
        }

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        match ext.as_str() {
            "xlsx" | "xls" => {
                let parser = ExcelParser;
                Ok((
                    parser.parse_sheet(path, EXCLUDE_SHEET)?,
                    parser.parse_sheet(path, ONE_TO_ONE_SHEET)?,
                    parser.parse_sheet(path, MANY_TO_ONE_SHEET)?,
                ))
            }
            _ => Err(ImportError::UnsupportedFormat(ext)),
        }
    }
}

impl AliasMappingProvider for MappingFileLoader {
    fn load_rules(&self) -> ImportResult<AliasRuleSet> {
        let (exclude, one_to_one, many_to_one) = self.read_tables()?;
        let rules = rules_from_tables(&exclude, &one_to_one, &many_to_one)?;

        info!(
            path = %self.path.display(),
            exclusions = rules.exclusions().len(),
            one_to_one = rules.one_to_one_rules().len(),
            many_to_one_groups = rules.many_to_one_groups().len(),
            "料号对照表加载完成"
        );
        Ok(rules)
    }
}

/// 三张规则表 → 规则集合
pub fn rules_from_tables(
    exclude: &ParsedTable,
    one_to_one: &ParsedTable,
    many_to_one: &ParsedTable,
) -> ImportResult<AliasRuleSet> {
    exclude.require_columns(&[EXCLUDED_PART_COLUMN])?;
    one_to_one.require_columns(&[FREE_PART_COLUMN, MAIN_PART_COLUMN])?;
    many_to_one.require_columns(&[MAIN_PART_COLUMN, ALIAS_PART_COLUMN])?;

    let mut rules = Vec::new();
    let mut blank_rows = 0usize;

    for row in &exclude.rows {
        match ParsedTable::cell(row, EXCLUDED_PART_COLUMN) {
            Some(part_no) => rules.push(AliasRule::Exclude {
                part_no: part_no.to_string(),
            }),
            None => blank_rows += 1,
        }
    }

    for row in &one_to_one.rows {
        match (
            ParsedTable::cell(row, FREE_PART_COLUMN),
            ParsedTable::cell(row, MAIN_PART_COLUMN),
        ) {
            (Some(free), Some(main)) => rules.push(AliasRule::OneToOne {
                free_part_no: free.to_string(),
                main_part_no: main.to_string(),
            }),
            _ => blank_rows += 1,
        }
    }

    for row in &many_to_one.rows {
        match (
            ParsedTable::cell(row, MAIN_PART_COLUMN),
            ParsedTable::cell(row, ALIAS_PART_COLUMN),
        ) {
            (Some(main), Some(alias)) => rules.push(AliasRule::ManyToOne {
                main_part_no: main.to_string(),
                alias_part_no: alias.to_string(),
            }),
            _ => blank_rows += 1,
        }
    }

    if blank_rows > 0 {
        debug!(blank_rows, "跳过含空白料号的规则行");
    }

    Ok(AliasRuleSet::from_rules(rules))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn table(name: &str, headers: &[&str], rows: &[&[&str]]) -> ParsedTable {
        ParsedTable {
            name: name.to_string(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: rows
                .iter()
                .map(|cells| {
                    headers
                        .iter()
                        .zip(cells.iter())
                        .map(|(h, c)| (h.to_string(), c.to_string()))
                        .collect::<HashMap<String, String>>()
                })
                .collect(),
        }
    }

    #[test]
    fn test_rules_from_tables() {
        let exclude = table(EXCLUDE_SHEET, &[EXCLUDED_PART_COLUMN], &[&["Z"], &[""]]);
        let one = table(
            ONE_TO_ONE_SHEET,
            &[FREE_PART_COLUMN, MAIN_PART_COLUMN],
            &[&["F", "M"], &["F2", ""]],
        );
        let many = table(
            MANY_TO_ONE_SHEET,
            &[MAIN_PART_COLUMN, ALIAS_PART_COLUMN],
            &[&["M", "A1"], &["M", "A2"]],
        );

        let rules = rules_from_tables(&exclude, &one, &many).unwrap();
        assert_eq!(rules.exclusions(), &["Z".to_string()]);
        assert_eq!(rules.one_to_one_rules().len(), 1);
        assert_eq!(rules.many_to_one_groups()[0].alias_part_nos, vec!["A1", "A2"]);
    }

    #[test]
    fn test_missing_column_is_error() {
        let exclude = table(EXCLUDE_SHEET, &["Part_No"], &[]);
        let one = table(ONE_TO_ONE_SHEET, &[FREE_PART_COLUMN, MAIN_PART_COLUMN], &[]);
        let many = table(MANY_TO_ONE_SHEET, &[MAIN_PART_COLUMN, ALIAS_PART_COLUMN], &[]);

        let err = rules_from_tables(&exclude, &one, &many).unwrap_err();
        assert!(matches!(err, ImportError::ColumnMissing { .. }));
    }

    #[test]
    fn test_unsupported_mapping_file() {
        let temp_file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        let err = MappingFileLoader::new(temp_file.path()).load_rules().unwrap_err();
        assert!(matches!(err, ImportError::UnsupportedFormat(_)));
    }
}
