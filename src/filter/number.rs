//! Text-level number, unit and duration normalization used by the triple filters.

use std::sync::LazyLock;

use regex::Regex;

static RE_PARENTHETICAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(.*?\)").unwrap());

/// Parse a localized number and render it canonically.
///
/// Every `thousands` separator is removed. If `decimal` occurs, its last occurrence
/// becomes the decimal point and earlier occurrences are dropped (some sources use the
/// same character for both roles). Integral results are rendered without a fraction.
///
/// Returns `None` when the remaining text is not a number.
pub fn parse_localized_number(value: &str, thousands: &str, decimal: &str) -> Option<String> {
    let mut text = value.trim().to_string();
    if !thousands.is_empty() {
        text = text.replace(thousands, "");
    }

    if !decimal.is_empty() && text.contains(decimal) {
        let parts: Vec<&str> = text.split(decimal).collect();
        let (last, head) = parts.split_last()?;
        text = format!("{}.{}", head.concat(), last);
    }

    let parsed: f64 = text.parse().ok()?;
    Some(format_number(parsed))
}

/// Render a float the way a human would write it: `3` rather than `3.0`.
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// Parse `A:B` into `A * 60 + B`.
pub fn parse_duration(value: &str) -> Option<i64> {
    let mut parts = value.trim().split(':');
    let major: i64 = parts.next()?.trim().parse().ok()?;
    let minor: i64 = parts.next()?.trim().parse().ok()?;
    Some(major * 60 + minor)
}

/// Strip a trailing ` <unit>` suffix, compared case-insensitively.
pub fn remove_unit<'a>(value: &'a str, unit: &str) -> &'a str {
    let suffix = format!(" {}", unit.to_lowercase());
    if value.to_lowercase().ends_with(&suffix) {
        // Lowercasing can change byte lengths for some scripts; only cut on a boundary.
        let cut = value.len().saturating_sub(suffix.len());
        if value.is_char_boundary(cut) {
            return &value[..cut];
        }
    }
    value
}

/// Remove every parenthesized annotation, e.g. `"12 km (approx.)"` becomes `"12 km"`.
///
/// Values without both parentheses are returned unchanged (not even trimmed).
pub fn strip_parentheticals(value: &str) -> String {
    if !(value.contains('(') && value.contains(')')) {
        return value.to_string();
    }
    RE_PARENTHETICAL.replace_all(value, "").trim().to_string()
}
