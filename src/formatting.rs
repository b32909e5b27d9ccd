//! Numeric display formatting (en-US, USD).
//!
//! Every function is total: NaN and infinities come out as degraded strings
//! (`$NaN`, `∞%`) instead of failing.

use strum::{Display, EnumString};

/// Colour class of a rendered number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Tone {
    Positive,
    Negative,
    Neutral,
}

impl Tone {
    pub fn of(value: f64) -> Self {
        if value > 0.0 {
            Tone::Positive
        } else if value < 0.0 {
            Tone::Negative
        } else {
            Tone::Neutral
        }
    }
}

/// Display style of a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum NumberFormat {
    #[default]
    Number,
    Currency,
    Percent,
}

impl NumberFormat {
    pub fn format(self, value: f64) -> String {
        match self {
            NumberFormat::Number => format_number(value),
            NumberFormat::Currency => format_currency(value),
            NumberFormat::Percent => format_percent(value),
        }
    }

    /// Currency and percent values are coloured by sign; plain numbers never are.
    pub fn tone(self, value: f64) -> Tone {
        match self {
            NumberFormat::Number => Tone::Neutral,
            NumberFormat::Currency | NumberFormat::Percent => Tone::of(value),
        }
    }
}

/// Inserts `,` every three digits of an unsigned integer string.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (len - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Fixed-point rendering of a finite, non-negative magnitude with grouping.
fn grouped_fixed(magnitude: f64, decimals: usize) -> String {
    let fixed = format!("{:.*}", decimals, magnitude);
    match fixed.split_once('.') {
        Some((whole, fraction)) => format!("{}.{}", group_thousands(whole), fraction),
        None => group_thousands(&fixed),
    }
}

fn sign(value: f64) -> &'static str {
    if value.is_sign_negative() { "-" } else { "" }
}

/// `$1,234.57`, `-$12.30`. Always two decimals.
pub fn format_currency(value: f64) -> String {
    if value.is_nan() {
        return "$NaN".to_string();
    }
    if value.is_infinite() {
        return format!("{}$∞", sign(value));
    }
    format!("{}${}", sign(value), grouped_fixed(value.abs(), 2))
}

/// Fraction to percent with one decimal: `0.0746` -> `7.5%`.
pub fn format_percent(value: f64) -> String {
    if value.is_nan() {
        return "NaN%".to_string();
    }
    if value.is_infinite() {
        return format!("{}∞%", sign(value));
    }
    format!("{}{}%", sign(value), grouped_fixed((value * 100.0).abs(), 1))
}

/// Grouped number with at most two fraction digits: `1,234.5`, `25`.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return format!("{}∞", sign(value));
    }
    let fixed = grouped_fixed(value.abs(), 2);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    // "-0" is not shown for values that round to zero.
    if trimmed == "0" { "0".to_string() } else { format!("{}{}", sign(value), trimmed) }
}

/// Y-axis label in thousands: `150000` -> `$150k`.
pub fn format_axis_thousands(value: f64) -> String {
    format!("${:.0}k", value / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_groups_and_rounds() {
        assert_eq!(format_currency(1234.567), "$1,234.57");
        assert_eq!(format_currency(100000.0), "$100,000.00");
        assert_eq!(format_currency(0.5), "$0.50");
        assert_eq!(format_currency(-12.3), "-$12.30");
        assert_eq!(format_currency(f64::NAN), "$NaN");
    }

    #[test]
    fn percent_takes_a_fraction() {
        assert_eq!(format_percent(0.0746), "7.5%");
        assert_eq!(format_percent(0.05), "5.0%");
        assert_eq!(format_percent(-0.0322), "-3.2%");
        assert_eq!(format_percent(12.5), "1,250.0%");
    }

    #[test]
    fn number_trims_trailing_zeros() {
        assert_eq!(format_number(25.0), "25");
        assert_eq!(format_number(1234.5), "1,234.5");
        assert_eq!(format_number(0.126), "0.13");
        assert_eq!(format_number(-0.001), "0");
    }

    #[test]
    fn tones_follow_sign_for_money_only() {
        assert_eq!(NumberFormat::Currency.tone(-1.0), Tone::Negative);
        assert_eq!(NumberFormat::Percent.tone(0.2), Tone::Positive);
        assert_eq!(NumberFormat::Number.tone(-1.0), Tone::Neutral);
        assert_eq!(NumberFormat::Currency.tone(0.0), Tone::Neutral);
    }

    #[test]
    fn axis_labels_are_in_thousands() {
        assert_eq!(format_axis_thousands(150000.0), "$150k");
        assert_eq!(format_axis_thousands(160040.25), "$160k");
    }

    #[test]
    fn grouping_handles_short_and_long_runs() {
        assert_eq!(group_thousands("1"), "1");
        assert_eq!(group_thousands("1000"), "1,000");
        assert_eq!(group_thousands("1234567"), "1,234,567");
    }
}
