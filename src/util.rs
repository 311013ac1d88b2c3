// Parsing and formatting helpers.
//
// Every "dirty" cell value goes through `parse_count` so the rest of the
// code only sees typed, finite, non-negative quantities.
use num_format::{Locale, ToFormattedString};

/// Coerce a cell into a count.
///
/// - Trims whitespace; empty cells are `None`.
/// - Rejects values that contain alphabetic characters (`x`, `NaN`, `inf`).
/// - Strips thousands separators like `","` before parsing.
/// - Rejects negative or non-finite results.
pub fn parse_count(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_alphabetic()) {
        return None;
    }
    let v = s.replace(',', "").parse::<f64>().ok()?;
    if v.is_finite() && v >= 0.0 {
        // normalise -0.0
        Some(v.abs())
    } else {
        None
    }
}

/// `part / whole * 100`, or `None` when `whole` is zero or the result is
/// not a finite number (overflowing rates are treated as undefined).
pub fn percent_of(part: f64, whole: f64) -> Option<f64> {
    if whole == 0.0 || !whole.is_finite() {
        return None;
    }
    let p = part / whole * 100.0;
    p.is_finite().then_some(p)
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Fixed decimals with locale-aware thousands separators (`1,234,567.89`).
    // Grouping works on the digit string so no magnitude is truncated.
    let neg = n.is_sign_negative() && n != 0.0;
    let s = format!("{:.*}", decimals, n.abs());
    let (int_part, frac_part) = match s.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (s.as_str(), None),
    };
    let mut res = group_digits(int_part, Locale::en.separator());
    if let Some(frac) = frac_part {
        res.push('.');
        res.push_str(frac);
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

fn group_digits(digits: &str, separator: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3 * separator.len());
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(c);
    }
    out
}

/// Counts are shown without decimals, e.g. `12,500`.
pub fn format_count(n: f64) -> String {
    format_number(n, 0)
}

/// Percentages are shown with two decimals and no grouping, e.g. `66.67%`.
pub fn format_percent(p: f64) -> String {
    format!("{:.2}%", p)
}

pub fn format_rate(rate: Option<f64>) -> String {
    rate.map(format_percent).unwrap_or_else(|| "n/a".to_string())
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_count_accepts_plain_and_grouped_numbers() {
        assert_eq!(parse_count(Some("42")), Some(42.0));
        assert_eq!(parse_count(Some(" 1,250 ")), Some(1250.0));
        assert_eq!(parse_count(Some("3.5")), Some(3.5));
        assert_eq!(parse_count(Some("0")), Some(0.0));
    }

    #[test]
    fn parse_count_rejects_text_negative_and_blank() {
        for bad in ["x", "12 pcs", "NaN", "inf", "-3", "", "   ", "1.2.3"] {
            assert_eq!(parse_count(Some(bad)), None, "{bad:?} should not parse");
        }
        assert_eq!(parse_count(None), None);
    }

    #[test]
    fn percent_of_zero_whole_is_none() {
        assert_eq!(percent_of(5.0, 0.0), None);
        assert_eq!(percent_of(0.0, 0.0), None);
        assert_eq!(percent_of(5.0, 50.0), Some(10.0));
    }

    #[test]
    fn percent_of_overflow_is_none() {
        assert_eq!(percent_of(1e307, 0.001), None);
        assert_eq!(percent_of(5.0, f64::INFINITY), None);
        assert_eq!(format_rate(percent_of(1e307, 0.001)), "n/a");
    }

    #[test]
    fn formats_counts_beyond_i64_range() {
        assert_eq!(format_count(1e19), "10,000,000,000,000,000,000");
        // nearest f64 to 12345678901234567890
        assert_eq!(format_count(12345678901234567890.0), "12,345,678,901,234,567,168");
        assert_eq!(format_count(999.0), "999");
        assert_eq!(format_count(1000.0), "1,000");
        assert_eq!(format_number(-1234.5, 1), "-1,234.5");
        assert!(format_count(1e300).starts_with("1,000,000,"));
    }

    #[test]
    fn formats_counts_with_thousands_separators() {
        assert_eq!(format_count(1234567.0), "1,234,567");
        assert_eq!(format_count(12.0), "12");
        assert_eq!(format_number(1234.5, 2), "1,234.50");
        assert_eq!(format_int(9855usize), "9,855");
    }

    #[test]
    fn formats_percentages_and_undefined_rates() {
        assert_eq!(format_percent(66.666_666), "66.67%");
        assert_eq!(format_rate(Some(10.0)), "10.00%");
        assert_eq!(format_rate(None), "n/a");
    }
}
