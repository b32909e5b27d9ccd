use crate::application::market_clock::{ClockDisplay, LOCAL_TICK_MS, MarketClockMode, SERVER_TICK_MS};
use crate::application::view_models::BotStatus;
use crate::domain::account::MarketHoursService;
use crate::presentation::components::{Status, Text, TextColor, TextSize};
use crate::presentation::hooks::{use_display_zone, use_now, use_trading_clock};
use crate::time_utils::format_time_of_day;
use leptos::*;

const LOGO_PATH: &str = "M8.25 3v1.5M4.5 8.25H3m18 0h-1.5M4.5 12H3m18 0h-1.5m-15 3.75H3m18 0h-1.5M8.25 19.5V21M12 3v1.5m0 15V21m3.75-18v1.5m0 15V21m-9-1.5h10.5a2.25 2.25 0 002.25-2.25V6.75a2.25 2.25 0 00-2.25-2.25H6.75A2.25 2.25 0 004.5 6.75v10.5a2.25 2.25 0 002.25 2.25zm.75-12h9v9h-9v-9z";

/// Brand, bot status and market clock.
#[component]
pub fn Header(bot: BotStatus, mode: MarketClockMode) -> impl IntoView {
    let zone = use_display_zone();
    let last_active = format!("Last active {}", format_time_of_day(bot.last_active, zone));

    view! {
        <header class="header">
            <div class="stack">
                <div class="brand">
                    <svg viewBox="0 0 24 24" class="brand-logo" fill="none" stroke="currentColor" stroke-width="2">
                        <path stroke-linecap="round" stroke-linejoin="round" d=LOGO_PATH/>
                    </svg>
                    <Text size=TextSize::Large class="brand-name">"Warren"</Text>
                </div>
                <div class="bot-status">
                    <Status indicator=bot.indicator()/>
                    <Text size=TextSize::Tiny color=TextColor::Subtle>{last_active}</Text>
                </div>
            </div>
            <div class="market-clock">
                {match mode {
                    MarketClockMode::Server => view! { <ServerMarketClock/> }.into_view(),
                    MarketClockMode::Local => view! { <LocalMarketClock/> }.into_view(),
                }}
            </div>
        </header>
    }
}

/// Open/closed state from the broker clock feed; the countdown ticks locally.
#[component]
fn ServerMarketClock() -> impl IntoView {
    let clock = use_trading_clock();
    let now = use_now(SERVER_TICK_MS);
    let display = Signal::derive(move || ClockDisplay::from_server(&clock.get(), now.get()));
    view! { <MarketClockView display=display/> }
}

/// Open/closed state from New York wall-clock time alone.
#[component]
fn LocalMarketClock() -> impl IntoView {
    let service = MarketHoursService::new();
    let now = use_now(LOCAL_TICK_MS);
    let display = Signal::derive(move || ClockDisplay::from_local(&service, now.get()));
    view! { <MarketClockView display=display/> }
}

#[component]
fn MarketClockView(display: Signal<ClockDisplay>) -> impl IntoView {
    view! {
        <div class="stack align-end">
            <Status indicator=Signal::derive(move || display.get().indicator())/>
            {move || {
                display
                    .get()
                    .caption()
                    .map(|caption| view! { <Text size=TextSize::Tiny color=TextColor::Subtle>{caption}</Text> })
            }}
        </div>
    }
}
