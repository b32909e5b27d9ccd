//! The six entity feeds, each a [`TableSpec`] over one snapshot table.

use super::sync::{Reconcile, TableSpec, decode_all, decode_latest, decode_row};
use crate::domain::account::{
    AccountBalance, AccountStatus, ChangeKind, ClockStatus, EquitySnapshot, OrderBy, Position,
    SelectQuery, TradeLogEntry,
};

const INSERTS: &[ChangeKind] = &[ChangeKind::Insert];
const ALL_CHANGES: &[ChangeKind] = &[ChangeKind::Insert, ChangeKind::Update, ChangeKind::Delete];

fn latest_row(table: &'static str, columns: &'static str) -> SelectQuery {
    SelectQuery { table, columns, order: Some(OrderBy::desc("created_at")), limit: Some(1) }
}

/// Cash and portfolio value (`overview_snapshot`).
pub fn account_balance() -> TableSpec<AccountBalance> {
    TableSpec {
        name: "balance",
        query: latest_row("overview_snapshot", "*"),
        events: INSERTS,
        decode_rows: decode_latest::<AccountBalance>,
        reconcile: Reconcile::Replace(decode_row::<AccountBalance>),
    }
}

/// Latest account equity (`account_snapshot`).
pub fn equity() -> TableSpec<EquitySnapshot> {
    TableSpec {
        name: "equity",
        query: latest_row("account_snapshot", "equity, cash, created_at"),
        events: INSERTS,
        decode_rows: decode_latest::<EquitySnapshot>,
        reconcile: Reconcile::Replace(decode_row::<EquitySnapshot>),
    }
}

/// Every open position. Any change refetches the set.
pub fn positions() -> TableSpec<Vec<Position>> {
    TableSpec {
        name: "positions",
        query: SelectQuery {
            table: "positions_snapshot",
            columns: "symbol, qty, cost_basis, current_price, unrealized_plpc, created_at",
            order: None,
            limit: None,
        },
        events: ALL_CHANGES,
        decode_rows: decode_all::<Position>,
        reconcile: Reconcile::Refetch,
    }
}

/// Broker trading clock (`clock_snapshot`).
pub fn trading_clock() -> TableSpec<ClockStatus> {
    TableSpec {
        name: "clock",
        query: latest_row("clock_snapshot", "is_open, next_open, next_close, created_at"),
        events: INSERTS,
        decode_rows: decode_latest::<ClockStatus>,
        reconcile: Reconcile::Replace(decode_row::<ClockStatus>),
    }
}

/// Account status and restriction flags (`account_snapshot`).
pub fn account_status() -> TableSpec<AccountStatus> {
    TableSpec {
        name: "status",
        query: latest_row(
            "account_snapshot",
            "status, trading_blocked, transfers_blocked, account_blocked, \
             trade_suspended_by_user, shorting_enabled, created_at",
        ),
        events: INSERTS,
        decode_rows: decode_latest::<AccountStatus>,
        reconcile: Reconcile::Replace(decode_row::<AccountStatus>),
    }
}

/// Trade audit log, newest first. Inserts refetch the list.
pub fn trade_log() -> TableSpec<Vec<TradeLogEntry>> {
    TableSpec {
        name: "trade_log",
        query: SelectQuery {
            table: "trade_log",
            columns: "timestamp, side, symbol, shares, price, total, note",
            order: Some(OrderBy::desc("timestamp")),
            limit: None,
        },
        events: INSERTS,
        decode_rows: decode_all::<TradeLogEntry>,
        reconcile: Reconcile::Refetch,
    }
}
