//! Numeric normalization for locale-formatted spreadsheet cells

use std::str::FromStr;

/// Characters stripped before parsing: thousands separators and yen glyphs
const NOISE_CHARS: [char; 3] = [',', '¥', '￥'];

/// Convert a raw cell into a number
///
/// Blank cells, unparsable text and non-finite results all map to `None`.
/// A genuine `0` stays `Some(0.0)`.
pub fn normalize_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let cleaned: String = trimmed.chars().filter(|c| !NOISE_CHARS.contains(c)).collect();
    cleaned
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Exact integer parse used for `year` / `month` cells
pub fn parse_integer<T: FromStr>(raw: &str) -> Option<T> {
    raw.trim().parse::<T>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_and_thousands_separators() {
        assert_eq!(normalize_number("¥1,234,567"), Some(1_234_567.0));
        assert_eq!(normalize_number("￥ 2,000"), Some(2_000.0));
        assert_eq!(normalize_number("  12.5 "), Some(12.5));
    }

    #[test]
    fn test_blank_and_garbage_are_none() {
        assert_eq!(normalize_number(""), None);
        assert_eq!(normalize_number("   "), None);
        assert_eq!(normalize_number("abc"), None);
        assert_eq!(normalize_number("12%"), None);
    }

    #[test]
    fn test_non_finite_is_none() {
        assert_eq!(normalize_number("inf"), None);
        assert_eq!(normalize_number("NaN"), None);
        assert_eq!(normalize_number("1e400"), None);
    }

    #[test]
    fn test_zero_is_kept() {
        assert_eq!(normalize_number("0"), Some(0.0));
        assert_eq!(normalize_number("-3"), Some(-3.0));
    }

    #[test]
    fn test_parse_integer_is_exact() {
        assert_eq!(parse_integer::<i32>(" 2025 "), Some(2025));
        assert_eq!(parse_integer::<u32>("4.0"), None);
        assert_eq!(parse_integer::<u32>(""), None);
        assert_eq!(parse_integer::<u32>("-1"), None);
    }
}
