use wasm_bindgen::prelude::*;

use crate::config::DashboardConfig;
use crate::domain::errors::AppError;
use crate::domain::logging::{LogComponent, get_logger};
use crate::infrastructure::services::{BrowserSpawner, BrowserTimeProvider, ConsoleLogger, browser_time_zone};
use crate::infrastructure::supabase::SupabaseHandle;
use crate::presentation::Dashboard;
use futures::task::LocalSpawn;
use leptos::*;
use std::rc::Rc;

pub mod application;
pub mod config;
pub mod domain;
pub mod formatting;
pub mod infrastructure;
pub mod presentation;
pub mod time_utils;

/// Module start: panic hook and the browser clock for log timestamps.
#[wasm_bindgen(start)]
pub fn initialize() {
    console_error_panic_hook::set_once();
    domain::logging::init_time_provider(Box::new(BrowserTimeProvider::new()));
}

/// Mounts the dashboard with a config object such as
/// `{ supabaseUrl, anonKey, marketClock: "server" | "local" }`.
#[wasm_bindgen]
pub fn mount_dashboard(config: JsValue) -> Result<(), JsValue> {
    let config = DashboardConfig::from_js(&config).map_err(AppError::from)?;
    mount(config);
    Ok(())
}

/// Mounts the dashboard with `SUPABASE_URL` / `SUPABASE_ANON_KEY` baked in at build time.
#[wasm_bindgen]
pub fn mount_from_env() -> Result<(), JsValue> {
    let config = DashboardConfig::from_build_env().map_err(AppError::from)?;
    mount(config);
    Ok(())
}

fn mount(config: DashboardConfig) {
    domain::logging::init_logger(Box::new(ConsoleLogger::new(config.log_level())));
    get_logger().info(
        LogComponent::Presentation("Initialize"),
        &format!("🚀 Dashboard configured for {}", config.supabase_url),
    );

    let spawner: Rc<dyn LocalSpawn> = Rc::new(BrowserSpawner);
    let source = SupabaseHandle::connect(&config, Rc::clone(&spawner)).into_source();
    let zone = browser_time_zone();
    mount_to_body(move || view! { <Dashboard config=config source=source spawner=spawner zone=zone/> });
}
