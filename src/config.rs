//! Dashboard configuration, supplied once at start.

use crate::application::market_clock::MarketClockMode;
use crate::domain::errors::ConfigError;
use crate::domain::logging::LogLevel;
use gloo::utils::format::JsValueSerdeExt;
use serde::{Deserialize, Serialize};
use wasm_bindgen::JsValue;

const DEFAULT_HEARTBEAT_SECS: u32 = 30;
const DEFAULT_MAX_BACKOFF_SECS: u32 = 32;

fn default_heartbeat_secs() -> u32 {
    DEFAULT_HEARTBEAT_SECS
}

fn default_max_backoff_secs() -> u32 {
    DEFAULT_MAX_BACKOFF_SECS
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Remote endpoint, credential and display options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(alias = "supabaseUrl")]
    pub supabase_url: String,
    #[serde(alias = "anonKey")]
    pub anon_key: String,
    #[serde(default, alias = "marketClock")]
    pub market_clock: MarketClockMode,
    #[serde(default = "default_heartbeat_secs", alias = "heartbeatSecs")]
    pub heartbeat_secs: u32,
    #[serde(default = "default_max_backoff_secs", alias = "maxBackoffSecs")]
    pub max_backoff_secs: u32,
    #[serde(default = "default_log_level", alias = "logLevel")]
    pub log_level: String,
}

impl DashboardConfig {
    pub fn new(supabase_url: &str, anon_key: &str) -> Self {
        Self {
            supabase_url: supabase_url.to_string(),
            anon_key: anon_key.to_string(),
            market_clock: MarketClockMode::default(),
            heartbeat_secs: DEFAULT_HEARTBEAT_SECS,
            max_backoff_secs: DEFAULT_MAX_BACKOFF_SECS,
            log_level: default_log_level(),
        }
    }

    /// Reads `SUPABASE_URL` / `SUPABASE_ANON_KEY` captured at build time.
    pub fn from_build_env() -> Result<Self, ConfigError> {
        let url = option_env!("SUPABASE_URL").ok_or(ConfigError::Missing("SUPABASE_URL"))?;
        let key = option_env!("SUPABASE_ANON_KEY").ok_or(ConfigError::Missing("SUPABASE_ANON_KEY"))?;
        Self::new(url, key).validated()
    }

    /// Parses a JSON config document.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(raw).map_err(|e| ConfigError::Unreadable(e.to_string()))?;
        config.validated()
    }

    /// Checks every field and normalises the URL (no trailing slash).
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        let url = self.supabase_url.trim().trim_end_matches('/').to_string();
        if url.is_empty() {
            return Err(ConfigError::Missing("supabase_url"));
        }
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(ConfigError::Invalid {
                field: "supabase_url",
                reason: format!("expected an http(s) URL, got {url}"),
            });
        }
        if self.anon_key.trim().is_empty() {
            return Err(ConfigError::Missing("anon_key"));
        }
        if self.heartbeat_secs == 0 {
            return Err(ConfigError::Invalid { field: "heartbeat_secs", reason: "must be positive".into() });
        }
        if self.max_backoff_secs == 0 {
            return Err(ConfigError::Invalid { field: "max_backoff_secs", reason: "must be positive".into() });
        }
        if LogLevel::from_name(&self.log_level).is_none() {
            return Err(ConfigError::Invalid {
                field: "log_level",
                reason: format!("unknown level {}", self.log_level),
            });
        }
        self.supabase_url = url;
        self.anon_key = self.anon_key.trim().to_string();
        Ok(self)
    }

    pub fn log_level(&self) -> LogLevel {
        LogLevel::from_name(&self.log_level).unwrap_or(LogLevel::Info)
    }

    /// PostgREST root: `{url}/rest/v1`.
    pub fn rest_url(&self) -> String {
        format!("{}/rest/v1", self.supabase_url)
    }

    /// Realtime socket endpoint with the key and protocol version attached.
    pub fn realtime_url(&self) -> String {
        let socket_base = if let Some(host) = self.supabase_url.strip_prefix("https://") {
            format!("wss://{host}")
        } else if let Some(host) = self.supabase_url.strip_prefix("http://") {
            format!("ws://{host}")
        } else {
            self.supabase_url.clone()
        };
        format!("{}/realtime/v1/websocket?apikey={}&vsn=1.0.0", socket_base, self.anon_key)
    }

    /// Reads a plain JS object such as `{ supabaseUrl, anonKey, marketClock }`.
    pub fn from_js(value: &JsValue) -> Result<Self, ConfigError> {
        let config: Self = value.into_serde().map_err(|e| ConfigError::Unreadable(e.to_string()))?;
        config.validated()
    }
}
