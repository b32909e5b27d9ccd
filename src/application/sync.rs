//! Fetch-then-subscribe-then-reconcile primitive shared by every feed.
//!
//! A [`LiveQuery`] issues one point query, registers a push listener on the
//! same table at the same time, and folds both into a [`SyncState`]. Dropping
//! the query revokes its [`Liveness`] token and releases the subscription;
//! results that arrive afterwards are discarded.

use crate::domain::account::{ChangeEvent, ChangeFilter, ChangeKind, SelectQuery, SnapshotSource, Subscription};
use crate::domain::errors::{SyncError, SyncResult};
use crate::domain::logging::LogComponent;
use crate::{log_debug, log_info, log_warn};
use futures::task::{LocalSpawn, LocalSpawnExt};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

const COMPONENT: LogComponent = LogComponent::Application("Sync");

/// Local mirror of one remote entity.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncState<D> {
    pub data: Option<D>,
    pub loading: bool,
    pub error: Option<SyncError>,
}

impl<D> SyncState<D> {
    /// State before the first fetch resolves.
    pub fn pending() -> Self {
        Self { data: None, loading: true, error: None }
    }
}

impl<D> Default for SyncState<D> {
    fn default() -> Self {
        Self::pending()
    }
}

/// How a matching push event is folded into local state.
pub enum Reconcile<D> {
    /// Decode the pushed row and replace the data wholesale.
    Replace(fn(Value) -> SyncResult<D>),
    /// Re-run the point query to recompute the whole set.
    Refetch,
}

impl<D> Clone for Reconcile<D> {
    fn clone(&self) -> Self {
        match self {
            Reconcile::Replace(decode) => Reconcile::Replace(*decode),
            Reconcile::Refetch => Reconcile::Refetch,
        }
    }
}

/// Static description of one feed: what to query, what to listen to, how to decode.
pub struct TableSpec<D> {
    /// Short feed name used in log lines.
    pub name: &'static str,
    pub query: SelectQuery,
    pub events: &'static [ChangeKind],
    pub decode_rows: fn(Vec<Value>) -> SyncResult<Option<D>>,
    pub reconcile: Reconcile<D>,
}

impl<D> Clone for TableSpec<D> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            query: self.query.clone(),
            events: self.events,
            decode_rows: self.decode_rows,
            reconcile: self.reconcile.clone(),
        }
    }
}

impl<D> TableSpec<D> {
    pub fn change_filter(&self) -> ChangeFilter {
        ChangeFilter::new(self.query.table, self.events)
    }
}

/// Decodes the first row, if any. Used by latest-row feeds.
pub fn decode_latest<T: DeserializeOwned>(rows: Vec<Value>) -> SyncResult<Option<T>> {
    rows.into_iter().next().map(decode_row).transpose()
}

/// Decodes every row. An empty result is an empty collection, not an error.
pub fn decode_all<T: DeserializeOwned>(rows: Vec<Value>) -> SyncResult<Option<Vec<T>>> {
    rows.into_iter().map(decode_row).collect::<SyncResult<Vec<T>>>().map(Some)
}

pub fn decode_row<T: DeserializeOwned>(row: Value) -> SyncResult<T> {
    Ok(serde_json::from_value(row)?)
}

/// Shared flag telling continuations whether their owner still exists.
#[derive(Debug, Clone)]
pub struct Liveness(Rc<Cell<bool>>);

impl Liveness {
    pub fn new() -> Self {
        Self(Rc::new(Cell::new(true)))
    }

    pub fn is_alive(&self) -> bool {
        self.0.get()
    }

    pub fn revoke(&self) {
        self.0.set(false);
    }
}

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}

type ChangeCallback<D> = Box<dyn Fn(&SyncState<D>)>;

struct FeedCore<D: 'static> {
    spec: TableSpec<D>,
    source: Rc<dyn SnapshotSource>,
    spawner: Rc<dyn LocalSpawn>,
    liveness: Liveness,
    state: RefCell<SyncState<D>>,
    on_change: ChangeCallback<D>,
}

impl<D: Clone + 'static> FeedCore<D> {
    fn update(&self, mutate: impl FnOnce(&mut SyncState<D>)) {
        mutate(&mut self.state.borrow_mut());
        let snapshot = self.state.borrow().clone();
        (self.on_change)(&snapshot);
    }

    fn fetch(core: &Rc<Self>) {
        let request = core.source.fetch_rows(&core.spec.query);
        let task_core = Rc::clone(core);
        let spawned = core.spawner.spawn_local(async move {
            let outcome = request.await;
            task_core.apply_fetch(outcome);
        });
        if let Err(error) = spawned {
            core.apply_fetch(Err(error.into()));
        }
    }

    fn apply_fetch(&self, outcome: SyncResult<Vec<Value>>) {
        if !self.liveness.is_alive() {
            log_debug!(COMPONENT, "{}: late fetch result dropped", self.spec.name);
            return;
        }
        match outcome.and_then(self.spec.decode_rows) {
            Ok(data) => {
                log_debug!(COMPONENT, "{}: fetch resolved (has data: {})", self.spec.name, data.is_some());
                self.update(|state| {
                    state.data = data;
                    state.error = None;
                    state.loading = false;
                });
            }
            Err(error) => {
                log_warn!(COMPONENT, "{}: fetch failed: {}", self.spec.name, error);
                self.update(|state| {
                    state.data = None;
                    state.error = Some(error);
                    state.loading = false;
                });
            }
        }
    }

    fn apply_event(core: &Rc<Self>, event: ChangeEvent) {
        if !core.liveness.is_alive() {
            log_debug!(COMPONENT, "{}: push after teardown ignored", core.spec.name);
            return;
        }
        match &core.spec.reconcile {
            Reconcile::Replace(decode) => match decode(event.record) {
                Ok(row) => {
                    log_debug!(COMPONENT, "{}: {} applied", core.spec.name, event.kind);
                    core.update(|state| {
                        state.data = Some(row);
                        state.error = None;
                        state.loading = false;
                    });
                }
                Err(error) => {
                    log_warn!(COMPONENT, "{}: pushed row skipped: {}", core.spec.name, error);
                }
            },
            Reconcile::Refetch => {
                log_debug!(COMPONENT, "{}: {} received, refetching", core.spec.name, event.kind);
                Self::fetch(core);
            }
        }
    }
}

/// Live mirror of one table. Stops delivering updates once dropped.
pub struct LiveQuery<D: Clone + 'static> {
    core: Rc<FeedCore<D>>,
    subscription: Option<Subscription>,
}

impl<D: Clone + 'static> LiveQuery<D> {
    /// Starts the initial fetch and the push subscription together.
    pub fn start(
        source: Rc<dyn SnapshotSource>,
        spawner: Rc<dyn LocalSpawn>,
        spec: TableSpec<D>,
        on_change: impl Fn(&SyncState<D>) + 'static,
    ) -> Self {
        log_info!(COMPONENT, "▶️ {}: starting feed on {}", spec.name, spec.query.table);
        let filter = spec.change_filter();
        let core = Rc::new(FeedCore {
            spec,
            source,
            spawner,
            liveness: Liveness::new(),
            state: RefCell::new(SyncState::pending()),
            on_change: Box::new(on_change),
        });

        FeedCore::fetch(&core);

        let listener_core = Rc::clone(&core);
        let subscription = core
            .source
            .subscribe(filter, Rc::new(move |event| FeedCore::apply_event(&listener_core, event)));

        Self { core, subscription: Some(subscription) }
    }

    pub fn state(&self) -> SyncState<D> {
        self.core.state.borrow().clone()
    }
}

impl<D: Clone + 'static> Drop for LiveQuery<D> {
    fn drop(&mut self) {
        self.core.liveness.revoke();
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
        log_info!(COMPONENT, "⏹️ {}: feed stopped", self.core.spec.name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn latest_decoder_treats_no_rows_as_absent() {
        let decoded: Option<serde_json::Map<String, Value>> = decode_latest(Vec::new()).unwrap();
        assert!(decoded.is_none());
    }

    #[test]
    fn collection_decoder_treats_no_rows_as_empty() {
        let decoded: Option<Vec<Value>> = decode_all(Vec::new()).unwrap();
        assert_eq!(decoded, Some(Vec::new()));
    }

    #[test]
    fn decode_failure_is_reported() {
        #[derive(Debug, Clone, serde::Deserialize)]
        #[allow(dead_code)]
        struct Row {
            is_open: bool,
        }
        let error = decode_latest::<Row>(vec![json!({ "is_open": "maybe" })]).unwrap_err();
        assert!(matches!(error, SyncError::Decode(_)));
    }

    #[test]
    fn liveness_is_shared_between_clones() {
        let token = Liveness::new();
        let observer = token.clone();
        token.revoke();
        assert!(!observer.is_alive());
    }
}
