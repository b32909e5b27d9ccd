use crate::application::trade_log::{TimeFrame, TradeLogFilter};
use chrono::NaiveDate;
use leptos::*;

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

fn date_value(date: Option<NaiveDate>) -> String {
    date.map(|date| date.format("%Y-%m-%d").to_string()).unwrap_or_default()
}

/// Quick time-frame buttons plus a custom start/end date pair.
#[component]
pub fn DateRangeFilter(filter: RwSignal<TradeLogFilter>) -> impl IntoView {
    let buttons = TimeFrame::quick_filters()
        .into_iter()
        .map(|frame| {
            let class = move || {
                if filter.get().frame == frame { "filter-button active" } else { "filter-button" }
            };
            view! {
                <button class=class on:click=move |_| filter.update(|current| *current = current.select(frame))>
                    {frame.to_string()}
                </button>
            }
        })
        .collect_view();

    let on_start = move |ev: ev::Event| {
        let start = parse_date(&event_target_value(&ev));
        filter.update(|current| *current = current.with_range(start, current.end));
    };
    let on_end = move |ev: ev::Event| {
        let end = parse_date(&event_target_value(&ev));
        filter.update(|current| *current = current.with_range(current.start, end));
    };

    view! {
        <div class="date-filter">
            <div class="filter-buttons">{buttons}</div>
            <div class="filter-range">
                <input type="date" prop:value=move || date_value(filter.get().start) on:change=on_start/>
                <span class="color-subtle">"to"</span>
                <input type="date" prop:value=move || date_value(filter.get().end) on:change=on_end/>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_inputs_use_iso_dates() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9);
        assert_eq!(parse_date("2024-03-09"), date);
        assert_eq!(parse_date(""), None);
        assert_eq!(date_value(date), "2024-03-09");
        assert_eq!(date_value(None), "");
    }
}
