//! Display formatting for prices, large figures and percentages.
//!
//! Values are formatted in a fixed `en-US` style (comma thousands separator,
//! dot decimal point) with the currency symbol of the selected currency.

const NOT_AVAILABLE: &str = "N/A";

/// Inserts `,` every three digits of an unsigned integer string.
fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Formats `value` with at most `max_decimals` fraction digits, trimming
/// trailing zeros but keeping at least `min_decimals`.
fn format_fixed(value: f64, min_decimals: usize, max_decimals: usize) -> String {
    let formatted = format!("{:.*}", max_decimals, value.abs());
    let (int_part, frac_part) = formatted
        .split_once('.')
        .unwrap_or((formatted.as_str(), ""));

    let mut frac = frac_part.trim_end_matches('0').to_string();
    while frac.len() < min_decimals {
        frac.push('0');
    }

    let mut out = group_thousands(int_part);
    if !frac.is_empty() {
        out.push('.');
        out.push_str(&frac);
    }
    out
}

/// Price with currency symbol, e.g. `$67,012.35` or `€0.004512`.
///
/// Sub-unit prices keep up to six fraction digits, everything else two.
/// The sub-unit test is on the magnitude, so `-1500.0` gets two digits.
pub fn format_price(value: Option<f64>, symbol: &str) -> String {
    let Some(value) = value.filter(|v| v.is_finite()) else {
        return NOT_AVAILABLE.to_string();
    };

    let max_decimals = if value.abs() < 1.0 { 6 } else { 2 };
    let body = format_fixed(value, 2, max_decimals);

    if value < 0.0 && body.chars().any(|c| c.is_ascii_digit() && c != '0') {
        format!("-{}{}", symbol, body)
    } else {
        format!("{}{}", symbol, body)
    }
}

/// Compact market-cap/volume figure, e.g. `$1.32T`, `$845.10M`.
/// Zero and missing values render as `N/A`.
pub fn format_big_number(value: Option<f64>, symbol: &str) -> String {
    match value {
        None => NOT_AVAILABLE.to_string(),
        Some(v) if v == 0.0 || !v.is_finite() => NOT_AVAILABLE.to_string(),
        Some(v) if v >= 1e12 => format!("{}{:.2}T", symbol, v / 1e12),
        Some(v) if v >= 1e9 => format!("{}{:.2}B", symbol, v / 1e9),
        Some(v) if v >= 1e6 => format!("{}{:.2}M", symbol, v / 1e6),
        Some(v) => format!("{}{:.2}", symbol, v),
    }
}

/// Signed percentage with two decimals, e.g. `+2.41%`.
pub fn format_percent(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => {
            let sign = if v >= 0.0 { "+" } else { "" };
            format!("{}{:.2}%", sign, v)
        }
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Circulating supply in millions, e.g. `19.7M`.
pub fn format_supply(value: Option<f64>) -> String {
    match value {
        Some(v) if v != 0.0 && v.is_finite() => format!("{:.1}M", v / 1e6),
        _ => NOT_AVAILABLE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("0"), "0");
        assert_eq!(group_thousands("999"), "999");
        assert_eq!(group_thousands("1000"), "1,000");
        assert_eq!(group_thousands("1234567"), "1,234,567");
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(Some(67012.346), "$"), "$67,012.35");
        assert_eq!(format_price(Some(1.0), "€"), "€1.00");
        assert_eq!(format_price(Some(0.5), "£"), "£0.50");
        assert_eq!(format_price(Some(0.00451234), "¥"), "¥0.004512");
        assert_eq!(format_price(Some(0.0), "$"), "$0.00");
        assert_eq!(format_price(None, "$"), "N/A");
    }

    #[test]
    fn test_format_price_negative() {
        assert_eq!(format_price(Some(-1500.0), "$"), "-$1,500.00");
        assert_eq!(format_price(Some(-0.25), "$"), "-$0.25");
        assert_eq!(format_price(Some(-1500.123456), "$"), "-$1,500.12");
        assert_eq!(format_price(Some(-0.001234), "$"), "-$0.001234");
    }

    #[test]
    fn test_format_big_number() {
        assert_eq!(format_big_number(Some(1.32e12), "$"), "$1.32T");
        assert_eq!(format_big_number(Some(2.5e9), "€"), "€2.50B");
        assert_eq!(format_big_number(Some(845.1e6), "$"), "$845.10M");
        assert_eq!(format_big_number(Some(1234.5), "$"), "$1234.50");
        assert_eq!(format_big_number(Some(0.0), "$"), "N/A");
        assert_eq!(format_big_number(None, "$"), "N/A");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(Some(2.414)), "+2.41%");
        assert_eq!(format_percent(Some(0.0)), "+0.00%");
        assert_eq!(format_percent(Some(-3.5)), "-3.50%");
        assert_eq!(format_percent(None), "N/A");
    }

    #[test]
    fn test_format_supply() {
        assert_eq!(format_supply(Some(19_700_000.0)), "19.7M");
        assert_eq!(format_supply(None), "N/A");
    }
}
