//! Reactive bindings: each hook mounts one feed for the calling component's
//! lifetime and exposes its state as a signal.

use crate::application::feeds;
use crate::application::sync::{LiveQuery, SyncState, TableSpec};
use crate::domain::account::{
    AccountBalance, AccountStatus, ClockStatus, EquitySnapshot, Position, SnapshotSource, TradeLogEntry,
};
use crate::domain::errors::SyncError;
use crate::domain::logging::LogComponent;
use crate::log_warn;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use futures::task::LocalSpawn;
use leptos::*;
use std::rc::Rc;
use std::time::Duration;

const COMPONENT: LogComponent = LogComponent::Presentation("Hooks");

/// Data source and executor shared by every feed of one dashboard.
#[derive(Clone)]
pub struct SourceContext {
    pub source: Rc<dyn SnapshotSource>,
    pub spawner: Rc<dyn LocalSpawn>,
}

/// Time zone used for every rendered timestamp.
#[derive(Debug, Clone, Copy)]
pub struct DisplayZone(pub Tz);

pub fn use_display_zone() -> Tz {
    use_context::<DisplayZone>().map(|zone| zone.0).unwrap_or(Tz::UTC)
}

/// Mounts `spec` as a live query owned by the current component.
pub fn use_live_query<D: Clone + 'static>(spec: TableSpec<D>) -> ReadSignal<SyncState<D>> {
    let Some(context) = use_context::<SourceContext>() else {
        log_warn!(COMPONENT, "{}: no data source in context", spec.name);
        let (state, _) = create_signal(SyncState {
            data: None,
            loading: false,
            error: Some(SyncError::Subscription("no data source configured".into())),
        });
        return state;
    };

    let (state, set_state) = create_signal(SyncState::pending());
    let query = LiveQuery::start(context.source, context.spawner, spec, move |next: &SyncState<D>| {
        set_state.set(next.clone())
    });
    on_cleanup(move || drop(query));
    state
}

pub fn use_account_balance() -> ReadSignal<SyncState<AccountBalance>> {
    use_live_query(feeds::account_balance())
}

pub fn use_equity() -> ReadSignal<SyncState<EquitySnapshot>> {
    use_live_query(feeds::equity())
}

pub fn use_positions() -> ReadSignal<SyncState<Vec<Position>>> {
    use_live_query(feeds::positions())
}

pub fn use_trading_clock() -> ReadSignal<SyncState<ClockStatus>> {
    use_live_query(feeds::trading_clock())
}

pub fn use_account_status() -> ReadSignal<SyncState<AccountStatus>> {
    use_live_query(feeds::account_status())
}

pub fn use_trade_log() -> ReadSignal<SyncState<Vec<TradeLogEntry>>> {
    use_live_query(feeds::trade_log())
}

/// Wall clock refreshed every `period_ms` while the component is mounted.
pub fn use_now(period_ms: u32) -> ReadSignal<DateTime<Utc>> {
    let (now, set_now) = create_signal(Utc::now());
    match set_interval_with_handle(
        move || set_now.set(Utc::now()),
        Duration::from_millis(u64::from(period_ms)),
    ) {
        Ok(handle) => on_cleanup(move || handle.clear()),
        Err(e) => {
            log_warn!(COMPONENT, "clock ticker unavailable: {:?}", e);
        }
    }
    now
}
