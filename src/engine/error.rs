// ==========================================
// 每日库存模拟 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 聚合键（日期/数量）无法解析时整次运行中止，
//       避免错位数据静默污染逐日推演
// ==========================================

use crate::domain::types::SourceTable;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("日期无法解析 ({table} 第 {row} 行, 字段 {field}): {value:?}")]
    MalformedDate {
        table: SourceTable,
        row: usize,
        field: &'static str,
        value: String,
    },

    #[error("数量无法解析 ({table} 第 {row} 行, 字段 {field}): {value:?}")]
    MalformedQuantity {
        table: SourceTable,
        row: usize,
        field: &'static str,
        value: String,
    },
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
