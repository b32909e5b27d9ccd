use crate::domain::errors::SyncResult;
use futures::future::LocalBoxFuture;
use serde_json::Value;
use std::rc::Rc;
use strum::{AsRefStr, Display, EnumString};

/// Sort key for a point query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: &'static str,
    pub descending: bool,
}

impl OrderBy {
    pub const fn desc(column: &'static str) -> Self {
        Self { column, descending: true }
    }
}

/// Point query against one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectQuery {
    pub table: &'static str,
    pub columns: &'static str,
    pub order: Option<OrderBy>,
    pub limit: Option<usize>,
}

/// Kind of row change carried by the push stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// Table plus the change kinds a listener wants to hear about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeFilter {
    pub schema: &'static str,
    pub table: &'static str,
    pub kinds: Vec<ChangeKind>,
}

impl ChangeFilter {
    pub fn new(table: &'static str, kinds: &[ChangeKind]) -> Self {
        Self { schema: "public", table, kinds: kinds.to_vec() }
    }

    pub fn matches(&self, event: &ChangeEvent) -> bool {
        event.table == self.table && event.schema == self.schema && self.kinds.contains(&event.kind)
    }

    /// Wire name of the event filter: `*` when several kinds are wanted.
    pub fn event_name(&self) -> String {
        match self.kinds.as_slice() {
            [single] => single.to_string(),
            _ => "*".to_string(),
        }
    }
}

/// One row change pushed by the remote store.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEvent {
    pub schema: String,
    pub table: String,
    pub kind: ChangeKind,
    /// New row contents; `Value::Null` for deletes.
    pub record: Value,
    pub old_record: Value,
}

/// Releases a push registration when dropped.
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self { release: Some(Box::new(release)) }
    }

    pub fn unsubscribe(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("active", &self.release.is_some()).finish()
    }
}

pub type ChangeListener = Rc<dyn Fn(ChangeEvent)>;

/// Read side of the remote snapshot store.
pub trait SnapshotSource {
    /// Run one point query and return the raw rows.
    fn fetch_rows(&self, query: &SelectQuery) -> LocalBoxFuture<'static, SyncResult<Vec<Value>>>;

    /// Register `listener` for changes matching `filter` until the returned
    /// guard is dropped.
    fn subscribe(&self, filter: ChangeFilter, listener: ChangeListener) -> Subscription;
}
