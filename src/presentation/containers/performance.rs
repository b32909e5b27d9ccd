use crate::application::performance::{ChartGeometry, ChartPoint, PerformanceWindow, chart_state};
use crate::application::view_models::RenderState;
use crate::formatting::NumberFormat;
use crate::presentation::components::{Notice, NoticeKind, Number, NumberSize, Panel, Skeleton, Text, TextColor, TextSize};
use crate::presentation::hooks::{use_display_zone, use_equity};
use crate::presentation::mock_data;
use leptos::*;

const CHART_WIDTH: f64 = 600.0;
const CHART_HEIGHT: f64 = 220.0;
const AXIS_GUTTER: f64 = 56.0;
const LABEL_BAND: f64 = 24.0;

/// P&L cards and the portfolio value chart.
#[component]
pub fn Performance() -> impl IntoView {
    let selected = create_rw_signal(PerformanceWindow::default());
    let pnl = mock_data::profit_and_loss();

    let header = move || {
        let window_buttons = PerformanceWindow::ALL
            .into_iter()
            .map(|window| {
                let class = move || if selected.get() == window { "filter-button active" } else { "filter-button" };
                view! { <button class=class on:click=move |_| selected.set(window)>{window.to_string()}</button> }
            })
            .collect_view();
        view! {
            <div class="row-between">
                <Text size=TextSize::Large class="title">"Performance"</Text>
                <div class="filter-buttons">{window_buttons}</div>
            </div>
        }
    };

    let cards = move || {
        PerformanceWindow::visible_cards(selected.get())
            .into_iter()
            .map(|window| {
                let figure = pnl.get(window);
                let class = if selected.get() == window { "pnl-card active" } else { "pnl-card" };
                view! {
                    <button class=class on:click=move |_| selected.set(window)>
                        <Text size=TextSize::Tiny color=TextColor::Muted>{window.to_string()}</Text>
                        <Number value=figure.value format=NumberFormat::Currency size=NumberSize::Large/>
                        <div class="faded">
                            <Number value=figure.percentage format=NumberFormat::Percent/>
                        </div>
                    </button>
                }
            })
            .collect_view()
    };

    view! {
        <Panel header=header>
            <div class="stack">
                <div class="grid grid-4">{cards}</div>
                <PortfolioChart/>
            </div>
        </Panel>
    }
}

/// Area chart of portfolio value, with the live equity reading as the newest point.
#[component]
fn PortfolioChart() -> impl IntoView {
    let equity = use_equity();
    let zone = use_display_zone();
    let history = mock_data::portfolio_history();

    move || match equity.with(|state| chart_state(state, &history, zone)) {
        RenderState::Loading => view! { <Skeleton blocks=3/> }.into_view(),
        RenderState::Error(message) => view! { <Notice kind=NoticeKind::Error message=message/> }.into_view(),
        RenderState::Empty => no_chart_data(),
        RenderState::Populated(series) => chart_view(&series),
    }
}

fn no_chart_data() -> View {
    view! { <Text size=TextSize::Small color=TextColor::Subtle>"No chart data"</Text> }.into_view()
}

fn chart_view(series: &[ChartPoint]) -> View {
    let Some(geometry) = ChartGeometry::layout(series, CHART_WIDTH, CHART_HEIGHT) else {
        return no_chart_data();
    };

    let view_box = format!("{} 0 {} {}", -AXIS_GUTTER, CHART_WIDTH + AXIS_GUTTER, CHART_HEIGHT + LABEL_BAND);
    let y_ticks = geometry
        .y_ticks
        .into_iter()
        .map(|(y, label)| {
            view! { <text class="axis-label" x="-8" y=y text-anchor="end" dominant-baseline="middle">{label}</text> }
        })
        .collect_view();
    let x_labels = geometry
        .x_labels
        .into_iter()
        .map(|(x, label)| {
            view! { <text class="axis-label" x=x y={CHART_HEIGHT + 16.0} text-anchor="middle">{label}</text> }
        })
        .collect_view();

    view! {
        <svg class="chart" viewBox=view_box preserveAspectRatio="none">
            <defs>
                <linearGradient id="equity-fill" x1="0" y1="0" x2="0" y2="1">
                    <stop offset="5%" stop-color="#34d399" stop-opacity="0.3"/>
                    <stop offset="95%" stop-color="#34d399" stop-opacity="0"/>
                </linearGradient>
            </defs>
            <path d=geometry.area fill="url(#equity-fill)"/>
            <path d=geometry.line fill="none" stroke="#34d399" stroke-width="2"/>
            {y_ticks}
            {x_labels}
        </svg>
    }
    .into_view()
}
