//! Wire shapes of the Supabase Realtime (Phoenix v1 JSON) and PostgREST APIs.

use crate::domain::account::{ChangeEvent, ChangeFilter, ChangeKind};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

pub const PHOENIX_TOPIC: &str = "phoenix";
pub const EVENT_JOIN: &str = "phx_join";
pub const EVENT_LEAVE: &str = "phx_leave";
pub const EVENT_REPLY: &str = "phx_reply";
pub const EVENT_ERROR: &str = "phx_error";
pub const EVENT_CLOSE: &str = "phx_close";
pub const EVENT_HEARTBEAT: &str = "heartbeat";
pub const EVENT_POSTGRES_CHANGES: &str = "postgres_changes";
pub const EVENT_SYSTEM: &str = "system";

/// One Phoenix channel frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhoenixMessage {
    pub topic: String,
    pub event: String,
    #[serde(default)]
    pub payload: Value,
    #[serde(rename = "ref", default)]
    pub reference: Option<String>,
}

impl PhoenixMessage {
    pub fn new(topic: &str, event: &str, payload: Value, reference: u64) -> Self {
        Self {
            topic: topic.to_string(),
            event: event.to_string(),
            payload,
            reference: Some(reference.to_string()),
        }
    }

    pub fn heartbeat(reference: u64) -> Self {
        Self::new(PHOENIX_TOPIC, EVENT_HEARTBEAT, json!({}), reference)
    }

    pub fn join(topic: &str, filter: &ChangeFilter, access_token: &str, reference: u64) -> Self {
        Self::new(topic, EVENT_JOIN, join_payload(filter, access_token), reference)
    }

    pub fn leave(topic: &str, reference: u64) -> Self {
        Self::new(topic, EVENT_LEAVE, json!({}), reference)
    }

    pub fn to_text(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// `phx_join` payload registering one `postgres_changes` listener.
pub fn join_payload(filter: &ChangeFilter, access_token: &str) -> Value {
    json!({
        "config": {
            "broadcast": { "ack": false, "self": false },
            "presence": { "key": "" },
            "postgres_changes": [{
                "event": filter.event_name(),
                "schema": filter.schema,
                "table": filter.table,
            }],
            "private": false,
        },
        "access_token": access_token,
    })
}

/// `phx_reply` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ReplyPayload {
    pub status: String,
    #[serde(default)]
    pub response: Value,
}

impl ReplyPayload {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// Row change as carried in `payload.data` of a `postgres_changes` frame.
#[derive(Debug, Clone, Deserialize)]
pub struct PostgresChangeData {
    #[serde(rename = "type")]
    pub kind: String,
    pub schema: String,
    pub table: String,
    #[serde(default)]
    pub record: Value,
    #[serde(default)]
    pub old_record: Value,
    #[serde(default)]
    pub commit_timestamp: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostgresChangePayload {
    pub data: PostgresChangeData,
    #[serde(default)]
    pub ids: Vec<u64>,
}

impl PostgresChangePayload {
    /// `None` for change types this client does not model (e.g. `TRUNCATE`).
    pub fn into_change_event(self) -> Option<ChangeEvent> {
        let kind = self.data.kind.parse::<ChangeKind>().ok()?;
        Some(ChangeEvent {
            schema: self.data.schema,
            table: self.data.table,
            kind,
            record: self.data.record,
            old_record: self.data.old_record,
        })
    }
}

/// PostgREST error body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostgrestError {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub hint: Option<String>,
}
