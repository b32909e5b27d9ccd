pub use super::value_objects::{AccountState, Symbol, Timestamp, TradeSide};
use super::value_objects::{lenient_f64, lenient_opt_f64};
use serde::{Deserialize, Serialize};

/// Domain entity - cash / portfolio value snapshot (`overview_snapshot`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountBalance {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub cash: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub portfolio_value: f64,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub equity: Option<f64>,
    pub created_at: Timestamp,
}

/// Domain entity - equity snapshot (`account_snapshot`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquitySnapshot {
    #[serde(deserialize_with = "lenient_f64")]
    pub equity: f64,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub cash: Option<f64>,
    pub created_at: Timestamp,
}

/// Domain entity - one open position within a snapshot generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub symbol: Symbol,
    #[serde(deserialize_with = "lenient_f64")]
    pub qty: f64,
    /// Total cost of the position, not per share.
    #[serde(deserialize_with = "lenient_f64")]
    pub cost_basis: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub current_price: f64,
    /// Unrealised P&L as a fraction of cost.
    #[serde(deserialize_with = "lenient_f64")]
    pub unrealized_plpc: f64,
    pub created_at: Timestamp,
}

impl Position {
    /// Average entry price per share. NaN for a zero quantity.
    pub fn average_entry_price(&self) -> f64 {
        if self.qty == 0.0 { f64::NAN } else { self.cost_basis / self.qty }
    }

    pub fn market_value(&self) -> f64 {
        self.current_price * self.qty
    }
}

/// Domain entity - exchange trading clock as reported by the broker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClockStatus {
    pub is_open: bool,
    pub next_open: Timestamp,
    pub next_close: Timestamp,
    pub created_at: Timestamp,
}

impl ClockStatus {
    /// The instant the open/closed state flips next.
    pub fn next_transition(&self) -> Timestamp {
        if self.is_open { self.next_close } else { self.next_open }
    }
}

/// Domain entity - account status and restriction flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountStatus {
    pub status: AccountState,
    #[serde(default)]
    pub trading_blocked: bool,
    #[serde(default)]
    pub transfers_blocked: bool,
    #[serde(default)]
    pub account_blocked: bool,
    #[serde(default)]
    pub trade_suspended_by_user: bool,
    #[serde(default)]
    pub shorting_enabled: bool,
    pub created_at: Timestamp,
}

/// Domain entity - append-only trade audit record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeLogEntry {
    pub timestamp: Timestamp,
    #[serde(alias = "type")]
    pub side: TradeSide,
    pub symbol: Symbol,
    #[serde(deserialize_with = "lenient_f64")]
    pub shares: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub price: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub total: f64,
    #[serde(default)]
    pub note: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn position_decodes_numeric_strings() {
        let position: Position = serde_json::from_value(json!({
            "symbol": "nvda",
            "qty": "25",
            "cost_basis": "22261.25",
            "current_price": 919.13,
            "unrealized_plpc": "0.0322",
            "created_at": "2024-03-13T15:45:00+00:00"
        }))
        .unwrap();

        assert_eq!(position.symbol.value(), "NVDA");
        assert!((position.average_entry_price() - 890.45).abs() < 1e-9);
        assert!((position.market_value() - 22978.25).abs() < 1e-6);
    }

    #[test]
    fn clock_next_transition_follows_open_flag() {
        let clock = ClockStatus {
            is_open: true,
            next_open: Timestamp::from_millis(2_000),
            next_close: Timestamp::from_millis(1_000),
            created_at: Timestamp::from_millis(0),
        };
        assert_eq!(clock.next_transition(), Timestamp::from_millis(1_000));
    }

    #[test]
    fn trade_entry_accepts_legacy_type_column() {
        let entry: TradeLogEntry = serde_json::from_value(json!({
            "timestamp": "2024-03-12T10:15:00Z",
            "type": "SELL",
            "symbol": "AMD",
            "shares": 150,
            "price": 205.67,
            "total": 30850.5
        }))
        .unwrap();
        assert_eq!(entry.side, TradeSide::Sell);
        assert!(entry.note.is_empty());
    }

    #[test]
    fn status_flags_default_to_false() {
        let status: AccountStatus = serde_json::from_value(json!({
            "status": "ACTIVE",
            "trading_blocked": true,
            "created_at": "2024-03-13T15:58:23Z"
        }))
        .unwrap();
        assert!(status.status.is_active());
        assert!(status.trading_blocked);
        assert!(!status.shorting_enabled);
    }
}
