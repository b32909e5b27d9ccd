//! Time-frame filtering and pagination of the trade log.

use crate::domain::account::TradeLogEntry;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use strum::{AsRefStr, Display, EnumIter, EnumString};

pub const PAGE_SIZES: [usize; 4] = [5, 10, 25, 50];
pub const DEFAULT_PAGE_SIZE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter, AsRefStr)]
pub enum TimeFrame {
    #[default]
    #[strum(serialize = "24h")]
    Day,
    #[strum(serialize = "7d")]
    Week,
    #[strum(serialize = "30d")]
    Month,
    #[strum(serialize = "All")]
    All,
    #[strum(serialize = "Custom")]
    Custom,
}

impl TimeFrame {
    /// Length of a rolling window, `None` for unbounded frames.
    pub fn window(self) -> Option<Duration> {
        match self {
            TimeFrame::Day => Some(Duration::hours(24)),
            TimeFrame::Week => Some(Duration::days(7)),
            TimeFrame::Month => Some(Duration::days(30)),
            TimeFrame::All | TimeFrame::Custom => None,
        }
    }

    /// Frames offered as quick-filter buttons.
    pub fn quick_filters() -> [TimeFrame; 4] {
        [TimeFrame::Day, TimeFrame::Week, TimeFrame::Month, TimeFrame::All]
    }
}

/// Active time filter. Picking both custom dates switches to [`TimeFrame::Custom`];
/// picking a quick filter clears them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradeLogFilter {
    pub frame: TimeFrame,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl Default for TradeLogFilter {
    fn default() -> Self {
        Self { frame: TimeFrame::Day, start: None, end: None }
    }
}

impl TradeLogFilter {
    pub fn select(self, frame: TimeFrame) -> Self {
        Self { frame, start: None, end: None }
    }

    pub fn with_range(self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        let frame = if start.is_some() && end.is_some() { TimeFrame::Custom } else { self.frame };
        Self { frame, start, end }
    }

    /// Midnight at the start of `day` in `tz`, as UTC.
    fn day_start(day: NaiveDate, tz: Tz) -> Option<DateTime<Utc>> {
        tz.from_local_datetime(&day.and_hms_opt(0, 0, 0)?).earliest().map(|t| t.with_timezone(&Utc))
    }

    /// Custom ranges cover whole days in `tz`, both ends inclusive.
    pub fn matches(&self, entry: &TradeLogEntry, now: DateTime<Utc>, tz: Tz) -> bool {
        if self.frame == TimeFrame::All {
            return true;
        }
        let Some(at) = entry.timestamp.value() else {
            return false;
        };
        match (self.frame, self.start, self.end) {
            (TimeFrame::Custom, Some(start), Some(end)) => {
                let from = Self::day_start(start, tz);
                let until = end.succ_opt().and_then(|next| Self::day_start(next, tz));
                match (from, until) {
                    (Some(from), Some(until)) => at >= from && at < until,
                    _ => false,
                }
            }
            (frame, _, _) => match frame.window() {
                Some(window) => now - at <= window,
                None => true,
            },
        }
    }

    pub fn apply(&self, entries: &[TradeLogEntry], now: DateTime<Utc>, tz: Tz) -> Vec<TradeLogEntry> {
        entries.iter().filter(|entry| self.matches(entry, now, tz)).cloned().collect()
    }
}

/// 1-based page cursor over a filtered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self { page: 1, per_page: DEFAULT_PAGE_SIZE }
    }
}

impl Pagination {
    /// Never less than one, so an empty list still shows "Page 1 of 1".
    pub fn total_pages(&self, total: usize) -> usize {
        total.div_ceil(self.per_page.max(1)).max(1)
    }

    pub fn clamped(self, total: usize) -> Self {
        Self { page: self.page.clamp(1, self.total_pages(total)), ..self }
    }

    pub fn next(self, total: usize) -> Self {
        Self { page: self.page + 1, ..self }.clamped(total)
    }

    pub fn previous(self, total: usize) -> Self {
        Self { page: self.page.saturating_sub(1), ..self }.clamped(total)
    }

    /// Changing the page size returns to the first page.
    pub fn with_per_page(self, per_page: usize) -> Self {
        Self { page: 1, per_page: per_page.max(1) }
    }
}

/// One rendered page of the trade log.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeLogPage {
    pub rows: Vec<TradeLogEntry>,
    pub page: usize,
    pub total_pages: usize,
    pub total: usize,
}

impl TradeLogPage {
    pub fn showing(&self) -> usize {
        self.rows.len()
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// `Showing 5 of 12 entries`
    pub fn summary(&self) -> String {
        format!("Showing {} of {} entries", self.showing(), self.total)
    }
}

pub fn paginate(
    entries: &[TradeLogEntry],
    filter: &TradeLogFilter,
    pagination: Pagination,
    now: DateTime<Utc>,
    tz: Tz,
) -> TradeLogPage {
    let filtered = filter.apply(entries, now, tz);
    let total = filtered.len();
    let pagination = pagination.clamped(total);
    let rows = filtered
        .into_iter()
        .skip((pagination.page - 1) * pagination.per_page)
        .take(pagination.per_page)
        .collect();
    TradeLogPage { rows, page: pagination.page, total_pages: pagination.total_pages(total), total }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_is_at_least_one() {
        let pagination = Pagination::default();
        assert_eq!(pagination.total_pages(0), 1);
        assert_eq!(pagination.total_pages(5), 1);
        assert_eq!(pagination.total_pages(6), 2);
    }

    #[test]
    fn navigation_is_clamped() {
        let pagination = Pagination::default();
        assert_eq!(pagination.previous(12).page, 1);
        assert_eq!(pagination.next(12).next(12).next(12).page, 3);
        assert_eq!(Pagination { page: 3, per_page: 5 }.with_per_page(10).page, 1);
    }

    #[test]
    fn both_dates_switch_to_custom() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 12);
        let filter = TradeLogFilter::default().with_range(day, None);
        assert_eq!(filter.frame, TimeFrame::Day);
        let filter = filter.with_range(day, day);
        assert_eq!(filter.frame, TimeFrame::Custom);
        assert_eq!(filter.select(TimeFrame::Week), TradeLogFilter { frame: TimeFrame::Week, start: None, end: None });
    }

    #[test]
    fn frame_labels() {
        assert_eq!(TimeFrame::Day.to_string(), "24h");
        assert_eq!(TimeFrame::All.to_string(), "All");
    }
}
