//! Display formatting for money and counts.
//!
//! Two currency renderings exist: an abbreviated one for dense summary
//! cells (tiered B/M/K units) and a complete one for card metrics where the
//! whole figure matters. Both are total functions of their single input:
//! any value, including a missing one, formats without panicking.

use crate::types::{Count, Money};

/// Abbreviated currency: "$ 2.600B", "$ 28.600M", "$ 1.5K", "$ 500".
/// `None` (a missing or unparseable source cell) renders as the zero case.
pub fn format_currency(value: Option<f64>) -> String {
    let value = match value {
        Some(v) if v.is_finite() => v,
        _ => 0.0,
    };

    if value >= 1_000_000_000.0 {
        format!("$ {}B", format_scaled(value / 1_000_000_000.0, 3))
    } else if value >= 1_000_000.0 {
        format!("$ {}M", format_scaled(value / 1_000_000.0, 3))
    } else if value >= 1_000.0 {
        format!("$ {}K", format_scaled(value / 1_000.0, 1))
    } else {
        format!("$ {}", format_scaled(value, 0))
    }
}

/// Complete currency: the full grouped integer, no abbreviation
/// ("$ 1,234,567").
pub fn format_currency_full(value: Money) -> String {
    format!("$ {}", group_thousands(value))
}

/// Grouped integer count ("12,847").
pub fn format_count(value: Count) -> String {
    group_thousands(value)
}

/// Utilization percentage with one decimal ("63.4%").
pub fn format_pct(pct: f64) -> String {
    format!("{pct:.1}%")
}

/// Fixed-decimal rendering with grouped thousands in the integer part.
fn format_scaled(value: f64, decimals: usize) -> String {
    let rendered = format!("{value:.decimals$}");
    let (int_part, frac_part) = match rendered.split_once('.') {
        Some((i, f)) => (i.to_string(), Some(f.to_string())),
        None => (rendered, None),
    };
    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", int_part.as_str()),
    };
    let grouped = group_digit_str(digits);
    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

fn group_thousands(value: u64) -> String {
    group_digit_str(&value.to_string())
}

/// Insert a comma every three digits, right to left.
fn group_digit_str(digits: &str) -> String {
    let bytes = digits.as_bytes();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 && (bytes.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(*b as char);
    }
    out
}
