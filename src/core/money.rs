// src/core/money.rs
//! Currency and area text: parse scraped strings into fixed-point
//! [`Decimal`]s and render them thousands-grouped.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

use super::sanitize::{numeric_only, strip_thousands};

/// "$1,234.56" → 1234.56. Everything except digits and '.' is dropped first;
/// stray label dots ("Est. $412,000") are trimmed off the ends.
pub fn parse_currency(raw: &str) -> Option<Decimal> {
    let digits = numeric_only(raw);
    let digits = digits.trim_matches('.');
    if digits.is_empty() { return None; }
    Decimal::from_str(digits).ok()
}

/// "1,500" → 1500. Anything else left after dropping separators is a failure.
pub fn parse_integer(raw: &str) -> Option<i64> {
    let cleaned = strip_thousands(raw.trim());
    if cleaned.is_empty() { return None; }
    cleaned.parse::<i64>().ok()
}

/// 45000 → "$45,000"; 1234.5 → "$1,234.50". Cents are shown only when present.
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let abs = rounded.abs();

    let whole = abs.trunc();
    let cents = ((abs - whole) * Decimal::ONE_HUNDRED).trunc();

    let mut out = s!();
    if negative { out.push('-'); }
    out.push('$');
    out.push_str(&group_digits(&whole.to_string()));
    if !cents.is_zero() {
        out.push_str(&format!(".{:0>2}", cents.to_string()));
    }
    out
}

/// 1500 → "1,500". Area figures carry no symbol.
pub fn format_area(area: i64) -> String {
    let digits = group_digits(&area.unsigned_abs().to_string());
    if area < 0 { join!("-", &digits) } else { digits }
}

/// 0.80 → "80%"; 0.825 → "82.5%".
pub fn format_percent(fraction: Decimal) -> String {
    let pct = (fraction * Decimal::ONE_HUNDRED).normalize();
    format!("{pct}%")
}

fn group_digits(digits: &str) -> String {
    let n = digits.len();
    let mut out = String::with_capacity(n + n / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (n - i) % 3 == 0 { out.push(','); }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal { Decimal::from_str(s).unwrap() }

    #[test]
    fn parses_rendered_currency_exactly() {
        assert_eq!(parse_currency("$1,234.56"), Some(d("1234.56")));
        assert_eq!(parse_currency("Est. $412,000"), Some(d("412000")));
        assert_eq!(parse_currency("$0.10"), Some(d("0.10")));
    }

    #[test]
    fn currency_rejects_non_numbers() {
        assert_eq!(parse_currency(""), None);
        assert_eq!(parse_currency("N/A"), None);
        assert_eq!(parse_currency("1.2.3"), None);
    }

    #[test]
    fn render_then_parse_is_lossless() {
        for s in ["1234.56", "45000", "0.01", "999999999.99", "1000000"] {
            let v = d(s);
            assert_eq!(parse_currency(&format_currency(v)), Some(v), "{s}");
        }
    }

    #[test]
    fn integers_strip_separators() {
        assert_eq!(parse_integer("1,500"), Some(1500));
        assert_eq!(parse_integer(" 1925 "), Some(1925));
        assert_eq!(parse_integer("12 days"), None);
        assert_eq!(parse_integer(""), None);
    }

    #[test]
    fn currency_rendering() {
        assert_eq!(format_currency(Decimal::from(45_000)), "$45,000");
        assert_eq!(format_currency(d("1234.5")), "$1,234.50");
        assert_eq!(format_currency(Decimal::ZERO), "$0");
        assert_eq!(format_currency(d("999")), "$999");
        assert_eq!(format_currency(d("-2500")), "-$2,500");
    }

    #[test]
    fn area_and_percent() {
        assert_eq!(format_area(1500), "1,500");
        assert_eq!(format_area(950), "950");
        assert_eq!(format_area(1_234_567), "1,234,567");
        assert_eq!(format_percent(d("0.80")), "80%");
        assert_eq!(format_percent(d("0.825")), "82.5%");
    }
}
