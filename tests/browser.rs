#![cfg(target_arch = "wasm32")]

use chrono_tz::Tz;
use futures::channel::oneshot;
use futures::future::{self, FutureExt, LocalBoxFuture};
use futures::task::{LocalSpawn, LocalSpawnExt};
use gloo_timers::future::TimeoutFuture;
use leptos::*;
use serde_json::{Value, json};
use std::rc::Rc;
use warren_dashboard::application::market_clock::MarketClockMode;
use warren_dashboard::config::DashboardConfig;
use warren_dashboard::domain::account::{ChangeFilter, ChangeListener, SelectQuery, SnapshotSource, Subscription};
use warren_dashboard::domain::errors::{SyncError, SyncResult};
use warren_dashboard::infrastructure::services::BrowserSpawner;
use warren_dashboard::presentation::containers::{Overview, Performance};
use warren_dashboard::presentation::hooks::{DisplayZone, SourceContext};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn js_object(value: serde_json::Value) -> JsValue {
    js_sys::JSON::parse(&value.to_string()).unwrap()
}

#[wasm_bindgen_test]
fn config_reads_a_camel_case_js_object() {
    let config = DashboardConfig::from_js(&js_object(json!({
        "supabaseUrl": "https://demo.supabase.co/",
        "anonKey": "anon",
        "marketClock": "local"
    })))
    .unwrap();
    assert_eq!(config.supabase_url, "https://demo.supabase.co");
    assert_eq!(config.market_clock, MarketClockMode::Local);
}

#[wasm_bindgen_test]
fn config_without_a_key_is_rejected() {
    let result = DashboardConfig::from_js(&js_object(json!({ "supabaseUrl": "https://demo.supabase.co" })));
    assert!(result.is_err());
}

#[wasm_bindgen_test(async)]
async fn browser_spawner_runs_local_futures() {
    let (sender, receiver) = oneshot::channel();
    BrowserSpawner
        .spawn_local(async move {
            let _ = sender.send(42);
        })
        .unwrap();
    assert_eq!(receiver.await.unwrap(), 42);
}

/// Answers every fetch at once: `rows` for the overview table, a network
/// failure for everything else.
struct CannedSource {
    rows: Vec<Value>,
}

impl SnapshotSource for CannedSource {
    fn fetch_rows(&self, query: &SelectQuery) -> LocalBoxFuture<'static, SyncResult<Vec<Value>>> {
        let outcome = match query.table {
            "overview_snapshot" => Ok(self.rows.clone()),
            _ => Err(SyncError::Network("offline".into())),
        };
        future::ready(outcome).boxed_local()
    }

    fn subscribe(&self, _filter: ChangeFilter, _listener: ChangeListener) -> Subscription {
        Subscription::new(|| ())
    }
}

async fn render(rows: Vec<Value>, container: impl FnOnce() -> View + 'static) -> web_sys::HtmlElement {
    let host: web_sys::HtmlElement = document().create_element("div").unwrap().unchecked_into();
    document().body().unwrap().append_child(&host).unwrap();
    let source: Rc<dyn SnapshotSource> = Rc::new(CannedSource { rows });
    let spawner: Rc<dyn LocalSpawn> = Rc::new(BrowserSpawner);
    mount_to(host.clone(), move || {
        provide_context(SourceContext { source, spawner });
        provide_context(DisplayZone(Tz::UTC));
        container()
    });
    TimeoutFuture::new(0).await;
    host
}

#[wasm_bindgen_test]
async fn overview_renders_both_balances() {
    let host = render(
        vec![json!({ "cash": "1234.5", "portfolio_value": 98765.43, "created_at": "2024-03-13T15:45:00Z" })],
        || view! { <Overview/> }.into_view(),
    )
    .await;
    let text = host.inner_text();
    assert!(text.contains("$1,234.50"), "{text}");
    assert!(text.contains("$98,765.43"), "{text}");
    assert_eq!(text.matches("As of 3/13/2024, 3:45:00 PM").count(), 2, "{text}");
    assert!(text.contains("Account balances are only updated during market hours."));
}

#[wasm_bindgen_test]
async fn failed_equity_feed_replaces_the_chart_with_a_notice() {
    let host = render(Vec::new(), || view! { <Performance/> }.into_view()).await;
    let html = host.inner_html();
    assert!(html.contains("Failed to load equity"), "{html}");
    assert!(!html.contains("<svg"), "{html}");
}
