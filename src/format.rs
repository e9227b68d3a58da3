//! Currency and percentage formatting for dashboard display

/// Group the integer part of a whole number with commas: 1234567 -> "1,234,567"
pub fn group_thousands(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Whole-dollar currency: 432825.4 -> "$432,825"
pub fn format_currency(amount: f64) -> String {
    let grouped = group_thousands(amount);
    match grouped.strip_prefix('-') {
        Some(rest) => format!("-${}", rest),
        None => format!("${}", grouped),
    }
}

/// Compact amount used on KPI cards, without the currency sign.
///
/// Millions keep one decimal with a trailing ".0" dropped ("4.4M", "3M"),
/// thousands are rounded ("432K"), smaller amounts are grouped whole numbers.
pub fn format_compact(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let abs = amount.abs();
    let body = if abs >= 1_000_000.0 {
        let millions = format!("{:.1}", abs / 1_000_000.0);
        format!("{}M", millions.strip_suffix(".0").unwrap_or(&millions))
    } else if abs >= 1_000.0 {
        format!("{:.0}K", abs / 1_000.0)
    } else {
        group_thousands(abs)
    };
    format!("{}{}", sign, body)
}

/// Compact currency: 432825.0 -> "$433K"
pub fn format_compact_currency(amount: f64) -> String {
    let compact = format_compact(amount);
    match compact.strip_prefix('-') {
        Some(rest) => format!("-${}", rest),
        None => format!("${}", compact),
    }
}

/// Fraction as a percentage: (0.0995, 2) -> "9.95%"
pub fn format_percent(fraction: f64, decimals: usize) -> String {
    format!("{:.*}%", decimals, fraction * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0.0), "0");
        assert_eq!(group_thousands(999.0), "999");
        assert_eq!(group_thousands(1_000.0), "1,000");
        assert_eq!(group_thousands(2_984_392.0), "2,984,392");
        assert_eq!(group_thousands(-1_234_567.4), "-1,234,567");
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(432_825.0), "$432,825");
        assert_eq!(format_currency(1_412_730.0), "$1,412,730");
        assert_eq!(format_currency(-225_000.0), "-$225,000");
    }

    #[test]
    fn test_format_compact() {
        assert_eq!(format_compact(4_350_000.0), "4.3M");
        assert_eq!(format_compact(3_000_000.0), "3M");
        assert_eq!(format_compact(2_295_686.0), "2.3M");
        assert_eq!(format_compact(432_825.0), "433K");
        assert_eq!(format_compact(1_000.0), "1K");
        assert_eq!(format_compact(750.0), "750");
        assert_eq!(format_compact(-1_500_000.0), "-1.5M");
        assert_eq!(format_compact_currency(165_825.0), "$166K");
        assert_eq!(format_compact_currency(0.0), "$0");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(0.0995, 2), "9.95%");
        assert_eq!(format_percent(0.125, 1), "12.5%");
        assert_eq!(format_percent(0.0, 2), "0.00%");
    }
}
