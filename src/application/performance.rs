//! Performance cards and the portfolio value area chart.

use super::sync::SyncState;
use super::view_models::RenderState;
use crate::domain::account::EquitySnapshot;
use crate::formatting::format_axis_thousands;
use chrono_tz::Tz;
use strum::{AsRefStr, Display, EnumIter, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter, AsRefStr)]
pub enum PerformanceWindow {
    #[default]
    #[strum(serialize = "24h")]
    Day,
    #[strum(serialize = "7d")]
    Week,
    #[strum(serialize = "30d")]
    Month,
    #[strum(serialize = "All Time")]
    AllTime,
}

impl PerformanceWindow {
    pub const ALL: [PerformanceWindow; 4] =
        [PerformanceWindow::Day, PerformanceWindow::Week, PerformanceWindow::Month, PerformanceWindow::AllTime];

    /// Selecting All Time collapses the grid to the single All Time card.
    pub fn visible_cards(selected: PerformanceWindow) -> Vec<PerformanceWindow> {
        match selected {
            PerformanceWindow::AllTime => vec![PerformanceWindow::AllTime],
            _ => Self::ALL.to_vec(),
        }
    }
}

/// Profit over one window, absolute and as a fraction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PnlFigure {
    pub value: f64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfitAndLoss {
    pub day: PnlFigure,
    pub week: PnlFigure,
    pub month: PnlFigure,
    pub all_time: PnlFigure,
}

impl ProfitAndLoss {
    pub fn get(&self, window: PerformanceWindow) -> PnlFigure {
        match window {
            PerformanceWindow::Day => self.day,
            PerformanceWindow::Week => self.week,
            PerformanceWindow::Month => self.month,
            PerformanceWindow::AllTime => self.all_time,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

impl ChartPoint {
    pub fn new(label: &str, value: f64) -> Self {
        Self { label: label.to_string(), value }
    }
}

/// History followed by the live equity reading as the newest point. A live
/// reading with the same label as the last history point replaces it.
pub fn chart_series(history: &[ChartPoint], latest: Option<&EquitySnapshot>, tz: Tz) -> Vec<ChartPoint> {
    let mut series = history.to_vec();
    let live = latest.and_then(|snapshot| {
        let at = snapshot.created_at.value()?;
        snapshot
            .equity
            .is_finite()
            .then(|| ChartPoint::new(&at.with_timezone(&tz).format("%Y-%m-%d").to_string(), snapshot.equity))
    });
    if let Some(point) = live {
        if series.last().is_some_and(|last| last.label == point.label) {
            series.pop();
        }
        series.push(point);
    }
    series
}

pub const EQUITY_FAILURE: &str = "Failed to load equity";

/// Render state of the portfolio chart. The history still renders when the
/// equity feed has no row yet; a loading or failed feed does not.
pub fn chart_state(
    state: &SyncState<EquitySnapshot>,
    history: &[ChartPoint],
    tz: Tz,
) -> RenderState<Vec<ChartPoint>> {
    let series = match RenderState::from_sync(state, EQUITY_FAILURE) {
        RenderState::Loading => return RenderState::Loading,
        RenderState::Error(message) => return RenderState::Error(message),
        RenderState::Empty => chart_series(history, None, tz),
        RenderState::Populated(latest) => chart_series(history, Some(&latest), tz),
    };
    if series.is_empty() { RenderState::Empty } else { RenderState::Populated(series) }
}

/// Pixel-space geometry of the area chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartGeometry {
    /// SVG path of the value line.
    pub line: String,
    /// Closed SVG path of the filled area under the line.
    pub area: String,
    /// Y-axis ticks: pixel y and label, top to bottom.
    pub y_ticks: Vec<(f64, String)>,
    /// X-axis labels: pixel x and label.
    pub x_labels: Vec<(f64, String)>,
}

const Y_TICKS: usize = 4;

impl ChartGeometry {
    pub fn layout(points: &[ChartPoint], width: f64, height: f64) -> Option<Self> {
        let finite: Vec<&ChartPoint> = points.iter().filter(|point| point.value.is_finite()).collect();
        if finite.is_empty() {
            return None;
        }
        let min = finite.iter().map(|p| p.value).fold(f64::INFINITY, f64::min);
        let max = finite.iter().map(|p| p.value).fold(f64::NEG_INFINITY, f64::max);
        let (low, high) = if (max - min).abs() < f64::EPSILON { (min - 1.0, max + 1.0) } else { (min, max) };
        let padding = (high - low) * 0.1;
        let (low, high) = (low - padding, high + padding);

        let step = if finite.len() > 1 { width / (finite.len() - 1) as f64 } else { 0.0 };
        let x_of = |index: usize| if finite.len() > 1 { index as f64 * step } else { width / 2.0 };
        let y_of = |value: f64| height - (value - low) / (high - low) * height;

        let coords: Vec<(f64, f64)> =
            finite.iter().enumerate().map(|(index, point)| (x_of(index), y_of(point.value))).collect();

        let line = coords
            .iter()
            .enumerate()
            .map(|(index, (x, y))| format!("{}{:.1},{:.1}", if index == 0 { "M" } else { "L" }, x, y))
            .collect::<Vec<_>>()
            .join(" ");
        let (first_x, _) = coords[0];
        let (last_x, _) = coords[coords.len() - 1];
        let area = format!("{} L{:.1},{:.1} L{:.1},{:.1} Z", line, last_x, height, first_x, height);

        let y_ticks = (0..Y_TICKS)
            .map(|tick| {
                let value = high - (high - low) * tick as f64 / (Y_TICKS - 1) as f64;
                (y_of(value), format_axis_thousands(value))
            })
            .collect();
        let x_labels =
            finite.iter().enumerate().map(|(index, point)| (x_of(index), point.label.clone())).collect();

        Some(Self { line, area, y_ticks, x_labels })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::Timestamp;
    use crate::domain::errors::SyncError;

    fn history() -> Vec<ChartPoint> {
        vec![ChartPoint::new("2024-03-01", 150000.0), ChartPoint::new("2024-03-07", 155000.0)]
    }

    #[test]
    fn live_equity_becomes_latest_point() {
        let live = EquitySnapshot { equity: 160040.25, cash: None, created_at: Timestamp::parse("2024-03-14T15:00:00Z") };
        let series = chart_series(&history(), Some(&live), Tz::UTC);
        assert_eq!(series.len(), 3);
        assert_eq!(series[2], ChartPoint::new("2024-03-14", 160040.25));
    }

    #[test]
    fn invalid_live_reading_is_ignored() {
        let live = EquitySnapshot { equity: f64::NAN, cash: None, created_at: Timestamp::parse("2024-03-14T15:00:00Z") };
        assert_eq!(chart_series(&history(), Some(&live), Tz::UTC), history());
    }

    #[test]
    fn failed_equity_feed_hides_the_chart() {
        let state = SyncState { data: None, loading: false, error: Some(SyncError::Network("offline".into())) };
        assert_eq!(chart_state(&state, &history(), Tz::UTC), RenderState::Error("Failed to load equity".into()));
        assert_eq!(chart_state(&SyncState::pending(), &history(), Tz::UTC), RenderState::Loading);
    }

    #[test]
    fn equity_feed_without_rows_still_charts_history() {
        let state = SyncState { data: None, loading: false, error: None };
        assert_eq!(chart_state(&state, &history(), Tz::UTC), RenderState::Populated(history()));
        assert_eq!(chart_state(&state, &[], Tz::UTC), RenderState::Empty);
    }

    #[test]
    fn loaded_equity_is_appended_to_history() {
        let live = EquitySnapshot { equity: 160040.25, cash: None, created_at: Timestamp::parse("2024-03-14T15:00:00Z") };
        let state = SyncState { data: Some(live), loading: false, error: None };
        match chart_state(&state, &history(), Tz::UTC) {
            RenderState::Populated(series) => assert_eq!(series.len(), 3),
            other => panic!("unexpected state {other:?}"),
        }
    }

    #[test]
    fn all_time_selection_collapses_cards() {
        assert_eq!(PerformanceWindow::visible_cards(PerformanceWindow::AllTime), vec![PerformanceWindow::AllTime]);
        assert_eq!(PerformanceWindow::visible_cards(PerformanceWindow::Week).len(), 4);
    }

    #[test]
    fn geometry_spans_the_canvas() {
        let geometry = ChartGeometry::layout(&history(), 400.0, 200.0).unwrap();
        assert!(geometry.line.starts_with("M0.0,"));
        assert!(geometry.line.contains("L400.0,"));
        assert!(geometry.area.ends_with("Z"));
        assert_eq!(geometry.y_ticks.len(), 4);
        assert_eq!(geometry.x_labels[1].1, "2024-03-07");
        assert!(ChartGeometry::layout(&[], 400.0, 200.0).is_none());
    }
}
