//! Market open/closed display, from either the broker clock feed or the
//! local wall clock. A dashboard uses exactly one [`MarketClockMode`].

use super::sync::SyncState;
use super::view_models::{StatusColor, StatusIndicator};
use crate::domain::account::{ClockStatus, MarketHoursService, Timestamp};
use crate::time_utils::format_countdown;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Refresh period of the countdown under [`MarketClockMode::Server`].
pub const SERVER_TICK_MS: u32 = 1_000;
/// Recompute period under [`MarketClockMode::Local`].
pub const LOCAL_TICK_MS: u32 = 60_000;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, AsRefStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum MarketClockMode {
    /// Open state and next transition come from the `clock_snapshot` feed.
    #[default]
    Server,
    /// Open state computed from New York wall-clock time.
    Local,
}

/// What the header's market widget shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClockDisplay {
    Loading,
    Error,
    Unknown,
    Known { is_open: bool, countdown: String },
}

impl ClockDisplay {
    fn known(is_open: bool, next_transition: Timestamp, now: DateTime<Utc>) -> Self {
        ClockDisplay::Known { is_open, countdown: format_countdown(next_transition, now) }
    }

    /// Derives the widget from the broker clock feed; only the countdown
    /// depends on `now`.
    pub fn from_server(state: &SyncState<ClockStatus>, now: DateTime<Utc>) -> Self {
        if state.loading {
            return ClockDisplay::Loading;
        }
        if state.error.is_some() {
            return ClockDisplay::Error;
        }
        match &state.data {
            Some(clock) => Self::known(clock.is_open, clock.next_transition(), now),
            None => ClockDisplay::Unknown,
        }
    }

    /// Derives the widget from New York wall-clock time alone.
    pub fn from_local(service: &MarketHoursService, now: DateTime<Utc>) -> Self {
        let session = service.session(now);
        Self::known(session.is_open, Timestamp::new(session.next_transition()), now)
    }

    pub fn indicator(&self) -> StatusIndicator {
        match self {
            ClockDisplay::Loading => {
                StatusIndicator::new(StatusColor::Yellow, "Loading", "Fetching market status...").pulsing(true)
            }
            ClockDisplay::Error => {
                StatusIndicator::new(StatusColor::Red, "Error", "Failed to fetch market status")
            }
            ClockDisplay::Unknown => {
                StatusIndicator::new(StatusColor::Yellow, "Unknown", "Market status unavailable")
            }
            ClockDisplay::Known { is_open: true, .. } => {
                StatusIndicator::new(StatusColor::Green, "Market Open", "").pulsing(true)
            }
            ClockDisplay::Known { is_open: false, .. } => {
                StatusIndicator::new(StatusColor::Red, "Market Closed", "")
            }
        }
    }

    /// `Closes in 1h 2m 3s` / `Opens in ...`, only when the state is known.
    pub fn caption(&self) -> Option<String> {
        match self {
            ClockDisplay::Known { is_open, countdown } => {
                Some(format!("{} in {}", if *is_open { "Closes" } else { "Opens" }, countdown))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 13, 15, 45, 0).unwrap()
    }

    #[test]
    fn server_clock_counts_down_to_close_when_open() {
        let state = SyncState {
            data: Some(ClockStatus {
                is_open: true,
                next_open: Timestamp::parse("2024-03-14T13:30:00Z"),
                next_close: Timestamp::parse("2024-03-13T20:00:00Z"),
                created_at: Timestamp::parse("2024-03-13T15:44:00Z"),
            }),
            loading: false,
            error: None,
        };
        let display = ClockDisplay::from_server(&state, now());
        assert_eq!(display.caption().as_deref(), Some("Closes in 4h 15m 0s"));
        assert_eq!(display.indicator().label, "Market Open");
    }

    #[test]
    fn server_clock_without_rows_is_unknown() {
        let state: SyncState<ClockStatus> = SyncState { data: None, loading: false, error: None };
        assert_eq!(ClockDisplay::from_server(&state, now()), ClockDisplay::Unknown);
        assert_eq!(ClockDisplay::Unknown.caption(), None);
    }

    #[test]
    fn local_clock_uses_new_york_session() {
        let display = ClockDisplay::from_local(&MarketHoursService::new(), now());
        assert_eq!(display.caption().as_deref(), Some("Closes in 4h 15m 0s"));
    }

    #[test]
    fn mode_parses_from_config_names() {
        assert_eq!("LOCAL".parse::<MarketClockMode>().unwrap(), MarketClockMode::Local);
        assert_eq!(MarketClockMode::default().to_string(), "server");
    }
}
