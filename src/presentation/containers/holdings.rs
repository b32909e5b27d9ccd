use crate::application::view_models::RenderState;
use crate::domain::account::{HoldingSort, HoldingSortField, SortDirection, holdings_from_positions};
use crate::formatting::{NumberFormat, format_number};
use crate::presentation::components::{
    Notice, NoticeKind, Number, NumberSize, Panel, Skeleton, Text, TextColor, TextSize,
};
use crate::presentation::hooks::{use_now, use_positions};
use crate::time_utils::format_elapsed;
use leptos::*;

const ELAPSED_TICK_MS: u32 = 60_000;

const COLUMNS: [(HoldingSortField, &str); 6] = [
    (HoldingSortField::Symbol, "Symbol"),
    (HoldingSortField::Shares, "Shares"),
    (HoldingSortField::Entry, "Entry"),
    (HoldingSortField::Current, "Current"),
    (HoldingSortField::Pnl, "P&L"),
    (HoldingSortField::HeldSince, "Held For"),
];

fn sort_marker(sort: HoldingSort, field: HoldingSortField) -> &'static str {
    match (sort.field == field, sort.direction) {
        (false, _) => "",
        (true, SortDirection::Ascending) => " ▲",
        (true, SortDirection::Descending) => " ▼",
    }
}

/// Sortable table of open positions.
#[component]
pub fn Holdings() -> impl IntoView {
    let positions = use_positions();
    let now = use_now(ELAPSED_TICK_MS);
    let sort = create_rw_signal(HoldingSort::default());

    let header = move || {
        COLUMNS
            .into_iter()
            .map(|(field, title)| {
                view! {
                    <th>
                        <button class="sort-button" on:click=move |_| sort.update(|current| *current = current.toggled(field))>
                            <Text size=TextSize::Tiny color=TextColor::Muted inline=true class="uppercase">{title}</Text>
                            <span class="sort-marker">{move || sort_marker(sort.get(), field)}</span>
                        </button>
                    </th>
                }
            })
            .collect_view()
    };

    let body = move || match RenderState::from_sync(&positions.get(), "Failed to load positions") {
        RenderState::Loading => view! { <Skeleton blocks=4/> }.into_view(),
        RenderState::Error(message) => view! { <Notice kind=NoticeKind::Error message=message/> }.into_view(),
        RenderState::Empty => view! { <Notice kind=NoticeKind::Warning message="No active positions"/> }.into_view(),
        RenderState::Populated(positions) => {
            let rows = holdings_from_positions(&positions, sort.get())
                .into_iter()
                .map(|holding| {
                    view! {
                        <tr>
                            <td><Text inline=true class="mono">{holding.symbol.to_string()}</Text></td>
                            <td><Text inline=true>{format_number(holding.shares)}</Text></td>
                            <td><Number value=holding.entry_price format=NumberFormat::Currency size=NumberSize::Small/></td>
                            <td><Number value=holding.current_price format=NumberFormat::Currency size=NumberSize::Small/></td>
                            <td>
                                <div class="stack-tight">
                                    <Number value=holding.pnl format=NumberFormat::Currency size=NumberSize::Small/>
                                    <Number value=holding.pnl_percent format=NumberFormat::Percent size=NumberSize::Small/>
                                </div>
                            </td>
                            <td>
                                <Text inline=true color=TextColor::Muted>
                                    {move || format_elapsed(holding.held_since, now.get())}
                                </Text>
                            </td>
                        </tr>
                    }
                })
                .collect_view();
            view! {
                <table class="table">
                    <thead><tr>{header()}</tr></thead>
                    <tbody>{rows}</tbody>
                </table>
            }
            .into_view()
        }
    };

    let title = || view! { <Text size=TextSize::Large class="title">"Current Holdings"</Text> };

    view! {
        <Panel class="panel-tall" header=title>
            <div class="table-scroll">{body}</div>
        </Panel>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_active_column_carries_a_marker() {
        let sort = HoldingSort::default();
        assert_eq!(sort_marker(sort, HoldingSortField::HeldSince), " ▼");
        assert_eq!(sort_marker(sort, HoldingSortField::Symbol), "");
        let sort = sort.toggled(HoldingSortField::Symbol);
        assert_eq!(sort_marker(sort, HoldingSortField::Symbol), " ▲");
    }
}
