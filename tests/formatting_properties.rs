use chrono::{Duration, TimeZone, Utc};
use quickcheck::TestResult;
use quickcheck_macros::quickcheck;
use warren_dashboard::domain::account::Timestamp;
use warren_dashboard::formatting::{format_currency, format_percent};
use warren_dashboard::time_utils::{format_countdown, format_elapsed};

fn fraction_digits(rendered: &str) -> Option<usize> {
    rendered.rsplit_once('.').map(|(_, fraction)| fraction.len())
}

#[quickcheck]
fn negative_currency_is_prefixed_not_wrapped(value: f64) -> TestResult {
    if !value.is_finite() {
        return TestResult::discard();
    }
    let positive = format_currency(value.abs());
    let negative = format_currency(-value.abs());
    TestResult::from_bool(
        positive.starts_with('$')
            && negative == format!("-{positive}")
            && !negative.contains('(')
            && fraction_digits(&positive) == Some(2),
    )
}

#[quickcheck]
fn percent_scales_the_fraction_with_one_decimal(value: f64) -> TestResult {
    if !value.is_finite() || value.abs() > 1e12 {
        return TestResult::discard();
    }
    let rendered = format_percent(value);
    let Some(body) = rendered.strip_suffix('%') else {
        return TestResult::failed();
    };
    let digits = body.trim_start_matches('-').replace(',', "");
    TestResult::from_bool(digits == format!("{:.1}", (value * 100.0).abs()) && fraction_digits(body) == Some(1))
}

#[quickcheck]
fn countdown_to_the_past_is_clamped(seconds_ago: u32) -> bool {
    let now = Utc.with_ymd_and_hms(2024, 3, 13, 19, 45, 0).unwrap();
    let target = Timestamp::new(now - Duration::seconds(i64::from(seconds_ago)));
    format_countdown(target, now) == "0h 0m 0s"
}

#[test]
fn percent_rounds_to_one_decimal() {
    assert_eq!(format_percent(0.0746), "7.5%");
}

#[test]
fn elapsed_reads_hours_then_days() {
    let now = Utc.with_ymd_and_hms(2024, 3, 13, 19, 45, 0).unwrap();
    assert_eq!(format_elapsed(Timestamp::new(now - Duration::hours(3)), now), "3h");
    assert_eq!(format_elapsed(Timestamp::new(now - Duration::hours(30)), now), "1d 6h");
}
