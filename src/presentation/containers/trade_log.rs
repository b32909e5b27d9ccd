use crate::application::trade_log::{PAGE_SIZES, Pagination, TradeLogFilter, TradeLogPage, paginate};
use crate::application::view_models::RenderState;
use crate::domain::account::{TradeLogEntry, TradeSide};
use crate::formatting::{NumberFormat, format_number};
use crate::presentation::components::{
    DateRangeFilter, Notice, NoticeKind, Number, NumberSize, Panel, Skeleton, Text, TextColor, TextSize,
};
use crate::presentation::hooks::{use_display_zone, use_now, use_trade_log};
use crate::time_utils::format_trade_timestamp;
use chrono_tz::Tz;
use leptos::*;

const WINDOW_TICK_MS: u32 = 60_000;
const HEADINGS: [&str; 7] = ["Time", "Type", "Symbol", "Shares", "Price", "Total", "Note"];

fn side_class(side: TradeSide) -> &'static str {
    match side {
        TradeSide::Buy => "tone-positive",
        TradeSide::Sell => "tone-negative",
    }
}

fn trade_row(entry: TradeLogEntry, zone: Tz) -> impl IntoView {
    view! {
        <tr>
            <td><Text inline=true color=TextColor::Muted>{format_trade_timestamp(entry.timestamp, zone)}</Text></td>
            <td><Text inline=true class=side_class(entry.side)>{entry.side.to_string()}</Text></td>
            <td><Text inline=true class="mono">{entry.symbol.to_string()}</Text></td>
            <td><Text inline=true>{format_number(entry.shares)}</Text></td>
            <td><Number value=entry.price format=NumberFormat::Currency size=NumberSize::Small/></td>
            <td><Number value=entry.total format=NumberFormat::Currency size=NumberSize::Small/></td>
            <td><Text inline=true color=TextColor::Subtle>{entry.note}</Text></td>
        </tr>
    }
}

/// Filterable, paginated history of executed trades.
#[component]
pub fn TradeLog() -> impl IntoView {
    let trades = use_trade_log();
    let zone = use_display_zone();
    let now = use_now(WINDOW_TICK_MS);
    let filter = create_rw_signal(TradeLogFilter::default());
    let pagination = create_rw_signal(Pagination::default());

    // A new filter starts from the first page.
    create_effect(move |_| {
        filter.with(|_| ());
        pagination.update(|current| current.page = 1);
    });

    let page = create_memo(move |_| {
        trades.with(|state| {
            let entries = state.data.as_deref().unwrap_or_default();
            paginate(entries, &filter.get(), pagination.get(), now.get(), zone)
        })
    });
    let total = move || page.with(|page| page.total);

    let table = move || {
        let TradeLogPage { rows, .. } = page.get();
        view! {
            <table class="table">
                <thead>
                    <tr>
                        {HEADINGS
                            .into_iter()
                            .map(|heading| view! {
                                <th><Text size=TextSize::Tiny color=TextColor::Muted inline=true class="uppercase">{heading}</Text></th>
                            })
                            .collect_view()}
                    </tr>
                </thead>
                <tbody>{rows.into_iter().map(|entry| trade_row(entry, zone)).collect_view()}</tbody>
            </table>
        }
    };

    let on_per_page = move |ev: ev::Event| {
        if let Ok(per_page) = event_target_value(&ev).parse::<usize>() {
            pagination.update(|current| *current = current.with_per_page(per_page));
        }
    };

    let controls = move || view! {
        <div class="row-between">
            <div class="row">
                <Text size=TextSize::Tiny color=TextColor::Muted>{move || page.with(TradeLogPage::summary)}</Text>
                <select class="page-size" on:change=on_per_page>
                    {PAGE_SIZES
                        .into_iter()
                        .map(|size| view! {
                            <option value=size prop:selected=move || pagination.get().per_page == size>
                                {format!("{size} per page")}
                            </option>
                        })
                        .collect_view()}
                </select>
            </div>
            <div class="row">
                <button
                    class="page-button"
                    disabled=move || !page.with(TradeLogPage::has_previous)
                    on:click=move |_| pagination.update(|current| *current = current.previous(total()))
                >
                    "‹"
                </button>
                <Text size=TextSize::Tiny color=TextColor::Muted>
                    {move || page.with(|page| format!("Page {} of {}", page.page, page.total_pages))}
                </Text>
                <button
                    class="page-button"
                    disabled=move || !page.with(TradeLogPage::has_next)
                    on:click=move |_| pagination.update(|current| *current = current.next(total()))
                >
                    "›"
                </button>
            </div>
        </div>
    };

    let body = move || match RenderState::from_sync(&trades.get(), "Failed to load trade log") {
        RenderState::Loading => view! { <Skeleton blocks=5/> }.into_view(),
        RenderState::Error(message) => view! { <Notice kind=NoticeKind::Error message=message/> }.into_view(),
        RenderState::Empty => view! { <Notice kind=NoticeKind::Warning message="No trades recorded"/> }.into_view(),
        RenderState::Populated(_) => table().into_view(),
    };

    let header = move || {
        view! {
            <div class="row-between">
                <Text size=TextSize::Large class="title">"Trading Log"</Text>
                <DateRangeFilter filter=filter/>
            </div>
        }
    };

    view! {
        <Panel header=header footer=controls>
            <div class="table-scroll">{body}</div>
        </Panel>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buys_and_sells_are_tinted_apart() {
        assert_eq!(side_class(TradeSide::Buy), "tone-positive");
        assert_eq!(side_class(TradeSide::Sell), "tone-negative");
    }
}
