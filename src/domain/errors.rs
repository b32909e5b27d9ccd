//! Error types shared by every layer.
//!
//! Feeds never let a [`SyncError`] escape: it is stored in the feed state and
//! rendered inline by the owning container.

use derive_more::{Display, From};
use wasm_bindgen::JsValue;

/// Failure while reading from, or listening to, the remote source.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum SyncError {
    /// Request never produced a response (offline, DNS, CORS, socket closed).
    #[display(fmt = "Network error: {}", _0)]
    Network(String),
    /// The remote answered with a non-success status.
    #[display(fmt = "Query failed ({}): {}", status, message)]
    Query { status: u16, message: String },
    /// The payload did not match the expected row shape.
    #[display(fmt = "Decode error: {}", _0)]
    Decode(String),
    #[display(fmt = "Subscription error: {}", _0)]
    Subscription(String),
    /// The executor refused the task.
    #[display(fmt = "Spawn error: {}", _0)]
    Spawn(String),
}

impl std::error::Error for SyncError {}

impl From<serde_json::Error> for SyncError {
    fn from(error: serde_json::Error) -> Self {
        SyncError::Decode(error.to_string())
    }
}

impl From<futures::task::SpawnError> for SyncError {
    fn from(error: futures::task::SpawnError) -> Self {
        SyncError::Spawn(error.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ConfigError {
    #[display(fmt = "Missing configuration value: {}", _0)]
    Missing(&'static str),
    #[display(fmt = "Invalid configuration value for {}: {}", field, reason)]
    Invalid { field: &'static str, reason: String },
    #[display(fmt = "Unreadable configuration: {}", _0)]
    Unreadable(String),
}

impl std::error::Error for ConfigError {}

/// Root error for the wasm entry points.
#[derive(Debug, Clone, PartialEq, Eq, Display, From)]
pub enum AppError {
    #[display(fmt = "Sync Error: {}", _0)]
    Sync(SyncError),
    #[display(fmt = "Config Error: {}", _0)]
    Config(ConfigError),
}

impl std::error::Error for AppError {}

impl From<AppError> for JsValue {
    fn from(error: AppError) -> Self {
        JsValue::from_str(&error.to_string())
    }
}

pub type SyncResult<T> = Result<T, SyncError>;
