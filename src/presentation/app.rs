use super::containers::{Header, Holdings, Overview, Performance, SystemStatus, TradeLog};
use super::hooks::{DisplayZone, SourceContext};
use super::mock_data;
use crate::config::DashboardConfig;
use crate::domain::account::SnapshotSource;
use crate::domain::logging::{LogComponent, get_logger};
use chrono_tz::Tz;
use futures::task::LocalSpawn;
use leptos::*;
use std::rc::Rc;

/// Root page: wires the data source into context and lays out every panel.
#[component]
pub fn Dashboard(
    config: DashboardConfig,
    source: Rc<dyn SnapshotSource>,
    spawner: Rc<dyn LocalSpawn>,
    zone: Tz,
) -> impl IntoView {
    provide_context(SourceContext { source, spawner });
    provide_context(DisplayZone(zone));
    get_logger().info(
        LogComponent::Presentation("Dashboard"),
        &format!("🖥️ Mounting dashboard ({} clock, {})", config.market_clock, zone.name()),
    );

    view! {
        <style>
            {r#"
            .dashboard {
                font-family: -apple-system, BlinkMacSystemFont, 'Inter', sans-serif;
                background: #18181b;
                min-height: 100vh;
                padding: 24px;
                color: white;
            }

            .dashboard-inner { max-width: 1600px; margin: 0 auto; display: flex; flex-direction: column; gap: 24px; }
            .dashboard-grid { display: grid; gap: 24px; grid-template-columns: repeat(12, minmax(0, 1fr)); }
            .span-6 { grid-column: span 6; display: flex; flex-direction: column; gap: 24px; }
            .span-12 { grid-column: span 12; }
            @media (max-width: 1024px) { .span-6 { grid-column: span 12; } }

            .panel { background: rgba(39, 39, 42, 0.5); border-radius: 8px; padding: 24px; }
            .panel-header { margin-bottom: 16px; }
            .panel-footer { margin-top: 16px; border-top: 1px solid rgba(255, 255, 255, 0.05); padding-top: 16px; }
            .panel-tall { height: 669px; }

            .grid { display: grid; gap: 24px; }
            .grid-2 { grid-template-columns: repeat(2, minmax(0, 1fr)); }
            .grid-3 { grid-template-columns: repeat(3, minmax(0, 1fr)); }
            .grid-4 { grid-template-columns: repeat(4, minmax(0, 1fr)); gap: 16px; }
            .stack { display: flex; flex-direction: column; gap: 8px; }
            .stack-tight { display: flex; flex-direction: column; gap: 2px; }
            .align-end { align-items: flex-end; }
            .row { display: flex; align-items: center; gap: 8px; }
            .row-between { display: flex; align-items: center; justify-content: space-between; gap: 8px; }

            .text { margin: 0; }
            .text-tiny { font-size: 12px; }
            .text-small { font-size: 14px; }
            .text-body { font-size: 16px; }
            .text-large { font-size: 18px; }
            .color-default { color: rgba(255, 255, 255, 0.9); }
            .color-subtle { color: rgba(255, 255, 255, 0.4); }
            .color-muted { color: rgba(255, 255, 255, 0.6); }
            .color-primary { color: white; }
            .uppercase { text-transform: uppercase; letter-spacing: 0.05em; }
            .italic { font-style: italic; }
            .mono { font-family: 'SF Mono', 'Courier New', monospace; }
            .title { font-weight: 600; color: #34d399; }
            .faded { opacity: 0.6; }

            .number { font-variant-numeric: tabular-nums; }
            .number-small { font-size: 14px; }
            .number-medium { font-size: 16px; }
            .number-large { font-size: 24px; font-weight: 600; }
            .tone-positive { color: #34d399; }
            .tone-negative { color: #ef4444; }
            .tone-neutral { color: inherit; }

            .status { display: flex; align-items: flex-start; gap: 8px; }
            .status-dot { width: 8px; height: 8px; border-radius: 9999px; margin-top: 6px; flex-shrink: 0; }
            .status-dot.pulse { animation: pulse 2s infinite; }
            .status-text { display: flex; gap: 6px; align-items: baseline; flex-wrap: wrap; font-size: 14px; }
            .status-label { font-weight: 500; }
            .status-caption, .status-info { color: rgba(255, 255, 255, 0.6); }
            .bg-emerald-400 { background: #34d399; }
            .bg-red-500 { background: #ef4444; }
            .bg-yellow-400 { background: #facc15; }
            .bg-blue-400 { background: #60a5fa; }
            @keyframes pulse { 50% { opacity: 0.4; } }

            .skeleton { display: flex; flex-direction: column; gap: 12px; }
            .skeleton-block { height: 32px; border-radius: 6px; background: rgba(255, 255, 255, 0.05); animation: pulse 2s infinite; }

            .notice { border-radius: 8px; padding: 16px; }
            .notice-error { color: #ef4444; background: rgba(239, 68, 68, 0.1); border: 1px solid rgba(239, 68, 68, 0.2); }
            .notice-warning { color: #eab308; background: rgba(234, 179, 8, 0.1); border: 1px solid rgba(234, 179, 8, 0.2); }

            .header { display: flex; align-items: center; justify-content: space-between; }
            .brand { display: flex; align-items: center; gap: 8px; color: #34d399; }
            .brand-logo { width: 36px; height: 36px; }
            .brand-name { font-family: monospace; font-weight: 600; text-transform: uppercase; letter-spacing: 0.25em; }
            .bot-status { padding-left: 8px; }

            .table-scroll { overflow: auto; }
            .panel-tall .table-scroll { max-height: 580px; }
            .table { width: 100%; border-collapse: collapse; }
            .table th, .table td { padding: 12px 16px; text-align: left; }
            .table thead { position: sticky; top: 0; background: rgba(39, 39, 42, 0.9); }
            .table tbody tr { border-bottom: 1px solid rgba(255, 255, 255, 0.05); }
            .table tbody tr:hover { background: rgba(255, 255, 255, 0.05); }
            .sort-button { display: flex; gap: 4px; background: none; border: none; color: inherit; cursor: pointer; padding: 0; }

            .filter-buttons { display: flex; gap: 4px; }
            .filter-range { display: flex; align-items: center; gap: 6px; }
            .date-filter { display: flex; align-items: center; gap: 12px; flex-wrap: wrap; }
            .filter-button, .page-button {
                background: rgba(255, 255, 255, 0.05);
                color: rgba(255, 255, 255, 0.6);
                border: none;
                border-radius: 4px;
                padding: 4px 10px;
                font-size: 12px;
                cursor: pointer;
            }
            .filter-button.active { background: rgba(52, 211, 153, 0.2); color: #34d399; }
            .page-button:disabled { opacity: 0.5; cursor: default; }
            input[type="date"], .page-size {
                background: rgba(255, 255, 255, 0.05);
                color: rgba(255, 255, 255, 0.6);
                border: none;
                border-radius: 4px;
                padding: 4px 8px;
                font-size: 12px;
            }

            .pnl-card {
                text-align: left;
                background: rgba(255, 255, 255, 0.05);
                border: none;
                border-radius: 8px;
                padding: 16px;
                color: inherit;
                cursor: pointer;
                display: flex;
                flex-direction: column;
                gap: 12px;
            }
            .pnl-card.active { background: rgba(52, 211, 153, 0.2); }
            .chart { width: 100%; height: 260px; }
            .axis-label { fill: rgba(255, 255, 255, 0.4); font-size: 11px; }
            "#}
        </style>
        <main class="dashboard">
            <div class="dashboard-inner">
                <Header bot=mock_data::bot_status() mode=config.market_clock/>
                <div class="dashboard-grid">
                    <div class="span-6">
                        <Overview/>
                        <SystemStatus/>
                        <Performance/>
                    </div>
                    <div class="span-6">
                        <Holdings/>
                    </div>
                    <div class="span-12">
                        <TradeLog/>
                    </div>
                </div>
            </div>
        </main>
    }
}
