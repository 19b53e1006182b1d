// ==========================================
// 每日库存模拟 - 时间序列归一化器
// ==========================================
// 职责: 将出货/订单原始记录对齐到日历日期，按 (日期, 料号) 汇总
// 输入: 模拟窗口 + 已知料号 + 原始出货记录 + 原始订单记录
// 输出: 入库表 inbound[日期][料号] + 出库表 outbound[日期][料号]
// ==========================================
// 过滤规则:
// - 时间部分一律截断为日期
// - 订单状态属于排除集合、或日期早于窗口起点 → 丢弃
// - 料号不在已知料号中 → 静默丢弃
// - 日期晚于窗口终点 → 丢弃
// - 日期缺失 → 丢弃；日期非空但无法解析 → 中止
// ==========================================

use crate::domain::horizon::SimulationHorizon;
use crate::domain::matrix::{DailyQuantities, PartIndex};
use crate::domain::source::{OrderRecord, RawQuantity, ShipmentRecord};
use crate::domain::types::{SourceTable, EXCLUDED_ORDER_STATUSES};
use crate::engine::error::{EngineError, EngineResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;
use tracing::{debug, info};

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d"];

const DATETIME_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M",
];

/// 解析源数据中的日期文本，时间部分截断
///
/// 空白文本返回 None；无法识别的格式同样返回 None，由调用方区分。
pub fn parse_source_date(raw: &str) -> Option<NaiveDate> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, fmt) {
            return Some(date);
        }
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(dt.date());
        }
    }

    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|dt| dt.naive_local().date())
}

// ==========================================
// 归一化统计
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeriesStats {
    pub kept: usize,
    pub dropped_by_status: usize,
    pub dropped_before_start: usize,
    pub dropped_after_end: usize,
    pub dropped_unknown_part: usize,
    pub dropped_missing_date: usize,
}

impl SeriesStats {
    pub fn dropped(&self) -> usize {
        self.dropped_by_status
            + self.dropped_before_start
            + self.dropped_after_end
            + self.dropped_unknown_part
            + self.dropped_missing_date
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NormalizationStats {
    pub shipments: SeriesStats,
    pub orders: SeriesStats,
}

/// 归一化结果
#[derive(Debug, Clone)]
pub struct NormalizedSeries {
    pub inbound: DailyQuantities,
    pub outbound: DailyQuantities,
    pub stats: NormalizationStats,
}

// ==========================================
// TimeSeriesNormalizer
// ==========================================
#[derive(Debug, Default)]
pub struct TimeSeriesNormalizer;

impl TimeSeriesNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// 订单状态是否属于固定排除集合（精确匹配，区分大小写）
    pub fn is_excluded_status(&self, status: Option<&str>) -> bool {
        status.is_some_and(|s| EXCLUDED_ORDER_STATUSES.contains(&s))
    }

    /// 生成窗口内的入库/出库汇总表
    pub fn normalize(
        &self,
        horizon: SimulationHorizon,
        parts: &PartIndex,
        shipments: &[ShipmentRecord],
        orders: &[OrderRecord],
    ) -> EngineResult<NormalizedSeries> {
        let (inbound, shipment_stats) = self.aggregate_shipments(horizon, parts, shipments)?;
        let (outbound, order_stats) = self.aggregate_orders(horizon, parts, orders)?;

        let stats = NormalizationStats {
            shipments: shipment_stats,
            orders: order_stats,
        };

        info!(
            shipments_kept = stats.shipments.kept,
            shipments_dropped = stats.shipments.dropped(),
            orders_kept = stats.orders.kept,
            orders_dropped = stats.orders.dropped(),
            orders_excluded_status = stats.orders.dropped_by_status,
            inbound_total = inbound.total(),
            outbound_total = outbound.total(),
            "时间序列归一化完成"
        );

        Ok(NormalizedSeries {
            inbound,
            outbound,
            stats,
        })
    }

    fn aggregate_shipments(
        &self,
        horizon: SimulationHorizon,
        parts: &PartIndex,
        shipments: &[ShipmentRecord],
    ) -> EngineResult<(DailyQuantities, SeriesStats)> {
        let mut table = DailyQuantities::zeros(horizon, parts.len());
        let mut stats = SeriesStats::default();

        for (idx, record) in shipments.iter().enumerate() {
            let row = idx + 1;
            let date = resolve_date(
                record.eta.as_deref(),
                SourceTable::FactoryShipment,
                row,
                "eta_fltc",
            )?;

            let part_idx = match parts.position(record.part_no.trim()) {
                Some(p) => p,
                None => {
                    stats.dropped_unknown_part += 1;
                    continue;
                }
            };

            let date = match date {
                Some(d) => d,
                None => {
                    stats.dropped_missing_date += 1;
                    continue;
                }
            };

            let date_idx = match horizon.index_of(date) {
                Some(i) => i,
                None if date < horizon.start() => {
                    stats.dropped_before_start += 1;
                    continue;
                }
                None => {
                    stats.dropped_after_end += 1;
                    continue;
                }
            };

            let qty = resolve_quantity(&record.qty, SourceTable::FactoryShipment, row, "qty")?;
            table.add(date_idx, part_idx, qty);
            stats.kept += 1;
        }

        debug!(
            kept = stats.kept,
            unknown_part = stats.dropped_unknown_part,
            missing_date = stats.dropped_missing_date,
            before_start = stats.dropped_before_start,
            after_end = stats.dropped_after_end,
            "出货记录汇总"
        );

        Ok((table, stats))
    }

    fn aggregate_orders(
        &self,
        horizon: SimulationHorizon,
        parts: &PartIndex,
        orders: &[OrderRecord],
    ) -> EngineResult<(DailyQuantities, SeriesStats)> {
        let mut table = DailyQuantities::zeros(horizon, parts.len());
        let mut stats = SeriesStats::default();

        for (idx, record) in orders.iter().enumerate() {
            let row = idx + 1;
            let date = resolve_date(
                record.shipment_date.as_deref(),
                SourceTable::OrderInfo,
                row,
                "shipment_date",
            )?;

            if self.is_excluded_status(record.quotation_status.as_deref()) {
                stats.dropped_by_status += 1;
                continue;
            }

            let date = match date {
                Some(d) => d,
                None => {
                    stats.dropped_missing_date += 1;
                    continue;
                }
            };

            if date < horizon.start() {
                stats.dropped_before_start += 1;
                continue;
            }

            let part_idx = match parts.position(record.product_name.trim()) {
                Some(p) => p,
                None => {
                    stats.dropped_unknown_part += 1;
                    continue;
                }
            };

            let date_idx = match horizon.index_of(date) {
                Some(i) => i,
                None => {
                    stats.dropped_after_end += 1;
                    continue;
                }
            };

            let qty = resolve_quantity(&record.quantity, SourceTable::OrderInfo, row, "quantity")?;
            table.add(date_idx, part_idx, qty);
            stats.kept += 1;
        }

        debug!(
            kept = stats.kept,
            excluded_status = stats.dropped_by_status,
            unknown_part = stats.dropped_unknown_part,
            missing_date = stats.dropped_missing_date,
            before_start = stats.dropped_before_start,
            after_end = stats.dropped_after_end,
            "订单记录汇总"
        );

        Ok((table, stats))
    }
}

/// 缺失/空白 → Ok(None)；非空且无法解析 → MalformedDate
fn resolve_date(
    raw: Option<&str>,
    table: SourceTable,
    row: usize,
    field: &'static str,
) -> EngineResult<Option<NaiveDate>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(text) => parse_source_date(text)
            .map(Some)
            .ok_or_else(|| EngineError::MalformedDate {
                table,
                row,
                field,
                value: text.to_string(),
            }),
    }
}

/// 缺失数量按 0 计；非数值文本 → MalformedQuantity
fn resolve_quantity(
    raw: &RawQuantity,
    table: SourceTable,
    row: usize,
    field: &'static str,
) -> EngineResult<f64> {
    if raw.is_absent() {
        return Ok(0.0);
    }
    raw.as_number().ok_or_else(|| EngineError::MalformedQuantity {
        table,
        row,
        field,
        value: match raw {
            RawQuantity::Text(s) => s.clone(),
            other => format!("{:?}", other),
        },
    })
}
