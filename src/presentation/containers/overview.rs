use crate::application::view_models::RenderState;
use crate::formatting::NumberFormat;
use crate::presentation::components::{
    Notice, NoticeKind, Number, NumberSize, Panel, Skeleton, Text, TextColor, TextSize,
};
use crate::presentation::hooks::{use_account_balance, use_display_zone};
use crate::time_utils::format_locale_timestamp;
use leptos::*;

fn market_hours_note() -> impl IntoView {
    view! {
        <Text size=TextSize::Tiny color=TextColor::Muted class="italic">
            "Account balances are only updated during market hours."
        </Text>
    }
}

fn balance_column(title: &'static str, value: f64, as_of: String) -> impl IntoView {
    view! {
        <div class="stack">
            <Text size=TextSize::Tiny color=TextColor::Muted class="uppercase">{title}</Text>
            <Number value=value format=NumberFormat::Currency size=NumberSize::Large/>
            <Text size=TextSize::Tiny color=TextColor::Subtle>{as_of}</Text>
        </div>
    }
}

/// Cash and portfolio value from the latest balance snapshot.
#[component]
pub fn Overview() -> impl IntoView {
    let balance = use_account_balance();
    let zone = use_display_zone();

    move || match RenderState::from_sync(&balance.get(), "Failed to load account balance") {
        RenderState::Loading => view! { <Panel><Skeleton blocks=2/></Panel> }.into_view(),
        RenderState::Error(message) => {
            view! { <Panel><Notice kind=NoticeKind::Error message=message/></Panel> }.into_view()
        }
        RenderState::Empty => {
            view! { <Panel><Notice kind=NoticeKind::Warning message="No balance data available"/></Panel> }
                .into_view()
        }
        RenderState::Populated(balance) => {
            let as_of = format!("As of {}", format_locale_timestamp(balance.created_at, zone));
            let cash = balance_column("Cash", balance.cash, as_of.clone());
            let portfolio = balance_column("Portfolio", balance.portfolio_value, as_of);
            view! {
                <Panel grid=true columns=2 footer=market_hours_note>
                    {cash}
                    {portfolio}
                </Panel>
            }
            .into_view()
        }
    }
}
