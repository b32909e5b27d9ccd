//! Render-state derivation and per-container view models.

use super::sync::SyncState;
use crate::domain::account::{
    AccountBalance, AccountStatus, ClockStatus, EquitySnapshot, Position, Timestamp, TradeLogEntry,
};
use strum::{AsRefStr, Display, EnumString};

/// Whether loaded data has anything to show.
pub trait ViewData {
    fn is_blank(&self) -> bool {
        false
    }
}

impl<T> ViewData for Vec<T> {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

impl ViewData for AccountBalance {}
impl ViewData for EquitySnapshot {}
impl ViewData for ClockStatus {}
impl ViewData for AccountStatus {}
impl ViewData for Position {}
impl ViewData for TradeLogEntry {}

/// The four mutually exclusive states a container renders.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderState<T> {
    Loading,
    Error(String),
    Empty,
    Populated(T),
}

impl<T: Clone + ViewData> RenderState<T> {
    /// `failure` is the fixed inline message shown for any sync error.
    pub fn from_sync(state: &SyncState<T>, failure: &str) -> Self {
        if state.loading {
            return RenderState::Loading;
        }
        if state.error.is_some() {
            return RenderState::Error(failure.to_string());
        }
        match &state.data {
            Some(data) if !data.is_blank() => RenderState::Populated(data.clone()),
            _ => RenderState::Empty,
        }
    }
}

impl<T> RenderState<T> {
    pub fn map<U>(self, project: impl FnOnce(T) -> U) -> RenderState<U> {
        match self {
            RenderState::Loading => RenderState::Loading,
            RenderState::Error(message) => RenderState::Error(message),
            RenderState::Empty => RenderState::Empty,
            RenderState::Populated(data) => RenderState::Populated(project(data)),
        }
    }

    pub fn is_populated(&self) -> bool {
        matches!(self, RenderState::Populated(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum StatusColor {
    Green,
    Red,
    Yellow,
    Blue,
}

impl StatusColor {
    pub fn dot_class(self) -> &'static str {
        match self {
            StatusColor::Green => "bg-emerald-400",
            StatusColor::Red => "bg-red-500",
            StatusColor::Yellow => "bg-yellow-400",
            StatusColor::Blue => "bg-blue-400",
        }
    }
}

/// Coloured dot, label and info text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusIndicator {
    pub color: StatusColor,
    pub label: String,
    /// `caption\nvalue` renders as a caption line above the value.
    pub info: String,
    pub pulse: bool,
}

impl StatusIndicator {
    pub fn new(color: StatusColor, label: &str, info: &str) -> Self {
        Self { color, label: label.to_string(), info: info.to_string(), pulse: false }
    }

    pub fn pulsing(mut self, pulse: bool) -> Self {
        self.pulse = pulse;
        self
    }

    /// Splits `info` into an optional caption and the value.
    pub fn info_parts(&self) -> (Option<&str>, &str) {
        match self.info.split_once('\n') {
            Some((caption, value)) => (Some(caption), value),
            None => (None, self.info.as_str()),
        }
    }
}

fn flag(ok: bool, ok_color: StatusColor, bad_color: StatusColor, label: &str, ok_text: &str, bad_text: &str) -> StatusIndicator {
    if ok {
        StatusIndicator::new(ok_color, label, ok_text)
    } else {
        StatusIndicator::new(bad_color, label, bad_text)
    }
}

/// Two columns of indicators derived from the latest account status row.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemStatusModel {
    pub account: Vec<StatusIndicator>,
    pub trading: Vec<StatusIndicator>,
    pub last_updated: Timestamp,
}

impl From<&AccountStatus> for SystemStatusModel {
    fn from(status: &AccountStatus) -> Self {
        use StatusColor::{Green, Red, Yellow};
        Self {
            account: vec![
                flag(status.status.is_active(), Green, Red, "Account", "Active", "Inactive"),
                flag(!status.account_blocked, Green, Red, "Account Block", "No", "Yes"),
                flag(!status.trade_suspended_by_user, Green, Yellow, "User Suspended", "No", "Yes"),
            ],
            trading: vec![
                flag(!status.trading_blocked, Green, Red, "Trading", "Allowed", "Blocked"),
                flag(!status.transfers_blocked, Green, Red, "Transfers", "Allowed", "Blocked"),
                flag(status.shorting_enabled, Green, Yellow, "Shorting", "Enabled", "Disabled"),
            ],
            last_updated: status.created_at,
        }
    }
}

/// Operating state of the trading bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "UPPERCASE")]
pub enum BotState {
    Active,
    Paused,
    Error,
    Maintenance,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BotStatus {
    pub state: BotState,
    pub last_active: Timestamp,
    pub message: String,
}

impl BotStatus {
    pub fn indicator(&self) -> StatusIndicator {
        let (color, label) = match self.state {
            BotState::Active => (StatusColor::Green, "Online"),
            BotState::Paused => (StatusColor::Yellow, "Paused"),
            BotState::Maintenance => (StatusColor::Blue, "Maintenance"),
            BotState::Error => (StatusColor::Red, "Error"),
        };
        StatusIndicator::new(color, label, &self.message).pulsing(self.state == BotState::Active)
    }
}
