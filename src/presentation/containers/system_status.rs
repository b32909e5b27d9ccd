use crate::application::view_models::{RenderState, StatusIndicator, SystemStatusModel};
use crate::presentation::components::{Notice, NoticeKind, Panel, Skeleton, Status, Text, TextColor, TextSize};
use crate::presentation::hooks::{use_account_status, use_display_zone};
use crate::time_utils::format_locale_timestamp;
use leptos::*;

fn indicator_column(title: &'static str, indicators: Vec<StatusIndicator>) -> impl IntoView {
    view! {
        <div class="stack">
            <Text size=TextSize::Tiny color=TextColor::Muted class="uppercase">{title}</Text>
            <div class="status-list">
                {indicators.into_iter().map(|indicator| view! { <Status indicator=indicator/> }).collect_view()}
            </div>
        </div>
    }
}

/// Account and trading flags from the latest account status snapshot.
#[component]
pub fn SystemStatus() -> impl IntoView {
    let status = use_account_status();
    let zone = use_display_zone();

    move || {
        let state = RenderState::from_sync(&status.get(), "Failed to load system status")
            .map(|status| SystemStatusModel::from(&status));
        match state {
            RenderState::Loading => view! { <Panel><Skeleton blocks=3/></Panel> }.into_view(),
            RenderState::Error(message) => {
                view! { <Panel><Notice kind=NoticeKind::Error message=message/></Panel> }.into_view()
            }
            RenderState::Empty => {
                view! { <Panel><Notice kind=NoticeKind::Warning message="No status data available"/></Panel> }
                    .into_view()
            }
            RenderState::Populated(model) => {
                let last_updated = model.last_updated;
                let footer = move || {
                    view! {
                        <Text size=TextSize::Tiny color=TextColor::Muted class="italic">
                            {format!("Last updated: {}", format_locale_timestamp(last_updated, zone))}
                        </Text>
                    }
                };
                let account = indicator_column("Account Status", model.account);
                let trading = indicator_column("Trading Status", model.trading);
                view! {
                    <Panel grid=true columns=2 footer=footer>
                        {account}
                        {trading}
                    </Panel>
                }
                .into_view()
            }
        }
    }
}
