//! Raw value normalization.

use std::str::FromStr;

use rust_decimal::Decimal;

/// Normalize a captured value for the stat `name`.
///
/// Returns the cleaned value and whether it is a percentage, or `None` for a
/// degenerate capture with no digits.
///
/// - Whitespace is removed ("24.2 %" becomes "24.2%").
/// - Plain numbers lose their thousands separators.
/// - Percentages take the first comma as the decimal separator. For stats
///   whose name contains one of `shift_families`, a value above 100 with no
///   decimal point gets one inserted ("242%" becomes "24.2%").
pub fn normalize_value<S: AsRef<str>>(
    name: &str,
    raw: &str,
    shift_families: &[S],
) -> Option<(String, bool)> {
    let value: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if !value.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    let is_percentage = value.ends_with('%');
    if !is_percentage {
        return Some((value.replace(',', ""), false));
    }

    let number = value.trim_end_matches('%').replacen(',', ".", 1).replace(',', "");
    if number.contains('.') || !shifts(name, shift_families) {
        return Some((format!("{}%", number), true));
    }

    match Decimal::from_str(&number) {
        Ok(n) if n > Decimal::ONE_HUNDRED => {
            let mut shifted = n / Decimal::TEN;
            shifted.rescale(1);
            Some((format!("{}%", shifted), true))
        }
        _ => Some((format!("{}%", number), true)),
    }
}

fn shifts<S: AsRef<str>>(name: &str, families: &[S]) -> bool {
    families.iter().any(|f| name.contains(f.as_ref()))
}
