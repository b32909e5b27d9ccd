use super::realtime_client::RealtimeClient;
use super::rest_client::SupabaseRestClient;
use crate::config::DashboardConfig;
use crate::domain::account::{ChangeFilter, ChangeListener, SelectQuery, SnapshotSource, Subscription};
use crate::domain::errors::SyncResult;
use futures::future::{FutureExt, LocalBoxFuture};
use futures::task::LocalSpawn;
use serde_json::Value;
use std::rc::Rc;

/// The one connection to the hosted database: PostgREST for point queries,
/// a shared Realtime socket for change streams. Built once at start and
/// handed to feeds as `Rc<dyn SnapshotSource>`.
#[derive(Clone)]
pub struct SupabaseHandle {
    rest: SupabaseRestClient,
    realtime: RealtimeClient,
}

impl SupabaseHandle {
    pub fn connect(config: &DashboardConfig, spawner: Rc<dyn LocalSpawn>) -> Self {
        Self { rest: SupabaseRestClient::new(config), realtime: RealtimeClient::new(config, spawner) }
    }

    pub fn into_source(self) -> Rc<dyn SnapshotSource> {
        Rc::new(self)
    }
}

impl SnapshotSource for SupabaseHandle {
    fn fetch_rows(&self, query: &SelectQuery) -> LocalBoxFuture<'static, SyncResult<Vec<Value>>> {
        let rest = self.rest.clone();
        let query = query.clone();
        async move { rest.select(&query).await }.boxed_local()
    }

    fn subscribe(&self, filter: ChangeFilter, listener: ChangeListener) -> Subscription {
        self.realtime.subscribe(filter, listener)
    }
}
