// ==========================================
// 每日库存模拟 - 模拟窗口
// ==========================================
// 窗口起点: 运行当月 1 日
// 窗口终点: 起点 + 180 天（含）
// 粒度: 日（不可配置）
// ==========================================

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// 窗口跨度（天），终点包含在内，因此日期轴共 181 个日期
pub const HORIZON_DAYS: i64 = 180;

// ==========================================
// SimulationHorizon - 模拟窗口
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SimulationHorizon {
    start: NaiveDate,
    end: NaiveDate,
}

impl SimulationHorizon {
    /// 以指定日期为起点构造窗口
    pub fn starting_at(start: NaiveDate) -> Self {
        Self {
            start,
            end: start + Duration::days(HORIZON_DAYS),
        }
    }

    /// 按运行日期构造窗口（起点为运行当月 1 日）
    ///
    /// # 示例
    /// ```
    /// use chrono::NaiveDate;
    /// use inventory_simulate::domain::SimulationHorizon;
    ///
    /// let run_date = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
    /// let horizon = SimulationHorizon::for_run_date(run_date);
    /// assert_eq!(horizon.start(), NaiveDate::from_ymd_opt(2026, 10, 1).unwrap());
    /// assert_eq!(horizon.len(), 181);
    /// ```
    pub fn for_run_date(run_date: NaiveDate) -> Self {
        let start = run_date.with_day(1).unwrap_or(run_date);
        Self::starting_at(start)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// 日期轴长度
    pub fn len(&self) -> usize {
        (self.end - self.start).num_days() as usize + 1
    }

    /// 窗口至少包含起点，永不为空
    pub fn is_empty(&self) -> bool {
        false
    }

    /// 日期是否落在窗口内（两端包含）
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// 日期在日期轴上的下标
    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        if self.contains(date) {
            Some((date - self.start).num_days() as usize)
        } else {
            None
        }
    }

    /// 下标对应的日期
    pub fn date_at(&self, index: usize) -> Option<NaiveDate> {
        if index < self.len() {
            Some(self.start + Duration::days(index as i64))
        } else {
            None
        }
    }

    /// 按升序遍历日期轴（连续、无缺口）
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        self.start.iter_days().take(self.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_start_is_first_day_of_month() {
        let horizon = SimulationHorizon::for_run_date(date(2026, 2, 27));
        assert_eq!(horizon.start(), date(2026, 2, 1));
        assert_eq!(horizon.end(), date(2026, 7, 31));
    }

    #[test]
    fn test_axis_has_181_contiguous_dates() {
        let horizon = SimulationHorizon::for_run_date(date(2024, 12, 31));
        let dates: Vec<NaiveDate> = horizon.dates().collect();

        assert_eq!(dates.len(), 181);
        assert_eq!(dates[0], horizon.start());
        assert_eq!(*dates.last().unwrap(), horizon.end());
        for pair in dates.windows(2) {
            assert_eq!(pair[1] - pair[0], Duration::days(1));
        }
    }

    #[test]
    fn test_index_of_bounds() {
        let horizon = SimulationHorizon::starting_at(date(2026, 1, 1));
        assert_eq!(horizon.index_of(date(2026, 1, 1)), Some(0));
        assert_eq!(horizon.index_of(horizon.end()), Some(180));
        assert_eq!(horizon.index_of(date(2025, 12, 31)), None);
        assert_eq!(horizon.index_of(horizon.end() + Duration::days(1)), None);
        assert_eq!(horizon.date_at(2), Some(date(2026, 1, 3)));
        assert_eq!(horizon.date_at(181), None);
    }
}
