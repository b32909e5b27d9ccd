use super::dto::PostgrestError;
use crate::config::DashboardConfig;
use crate::domain::account::SelectQuery;
use crate::domain::errors::{SyncError, SyncResult};
use crate::domain::logging::{LogComponent, get_logger};
use gloo_net::http::Request;
use serde_json::Value;

/// Point queries against PostgREST (`/rest/v1`).
#[derive(Debug, Clone)]
pub struct SupabaseRestClient {
    base_url: String,
    anon_key: String,
}

impl SupabaseRestClient {
    pub fn new(config: &DashboardConfig) -> Self {
        Self { base_url: config.rest_url(), anon_key: config.anon_key.clone() }
    }

    /// `{base}/{table}?select=..&order=col.desc&limit=n`
    pub fn select_url(&self, query: &SelectQuery) -> String {
        let columns: String = query.columns.chars().filter(|c| !c.is_whitespace()).collect();
        let mut url = format!("{}/{}?select={}", self.base_url, query.table, columns);
        if let Some(order) = &query.order {
            let direction = if order.descending { "desc" } else { "asc" };
            url.push_str(&format!("&order={}.{}", order.column, direction));
        }
        if let Some(limit) = query.limit {
            url.push_str(&format!("&limit={limit}"));
        }
        url
    }

    pub async fn select(&self, query: &SelectQuery) -> SyncResult<Vec<Value>> {
        let url = self.select_url(query);
        get_logger().debug(LogComponent::Infrastructure("SupabaseREST"), &format!("📥 GET {url}"));

        let response = Request::get(&url)
            .header("apikey", &self.anon_key)
            .header("Authorization", &format!("Bearer {}", self.anon_key))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| SyncError::Network(e.to_string()))?;

        if !response.ok() {
            let status = response.status();
            let body: PostgrestError = response.json().await.unwrap_or_default();
            let message = if body.message.is_empty() {
                response.status_text()
            } else {
                body.message
            };
            get_logger().warn(
                LogComponent::Infrastructure("SupabaseREST"),
                &format!("❌ {} answered {}: {}", query.table, status, message),
            );
            return Err(SyncError::Query { status, message });
        }

        let rows: Vec<Value> = response.json().await.map_err(|e| SyncError::Decode(e.to_string()))?;
        get_logger().debug(
            LogComponent::Infrastructure("SupabaseREST"),
            &format!("✅ {} returned {} rows", query.table, rows.len()),
        );
        Ok(rows)
    }
}
