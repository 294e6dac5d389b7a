//! Number formatting for dashboard cards.
//!
//! Pure helpers so card text can be asserted in unit tests without a
//! rendering layer.

#[cfg(test)]
#[path = "formatters_test.rs"]
mod formatters_test;

const NUMBER_FORMATS: [(f64, &str); 3] = [(1e9, "b"), (1e6, "m"), (1e3, "k")];

/// Rendered when a crash free rate is not a number.
pub const NOT_A_NUMBER: &str = "\u{2015}";

/// Crash free rates above this keep [`CRASH_FREE_DECIMAL_PLACES`] decimals;
/// anything lower is shown as a whole percent.
pub const CRASH_FREE_DECIMAL_THRESHOLD: f64 = 95.0;
pub const CRASH_FREE_DECIMAL_PLACES: i32 = 3;

/// Round `value` to `places` decimals, halves rounding up.
///
/// Shifts through the decimal exponent rather than multiplying, so values
/// like `1.005` round to `1.01` instead of falling victim to binary
/// representation error.
#[must_use]
pub fn round_to(value: f64, places: i32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(places);
    let shifted = format!("{value}e{places}")
        .parse::<f64>()
        .unwrap_or(value * factor);
    let rounded = (shifted + 0.5).floor();
    format!("{rounded}e{}", -places)
        .parse::<f64>()
        .unwrap_or(rounded / factor)
}

/// Abbreviate large counts: `1.2k`, `15k`, `3m`, `2b`.
///
/// One decimal is kept below ten units of a suffix unless the value is an
/// exact multiple of it. Values below a thousand are printed in full.
#[must_use]
pub fn format_abbreviated_number(value: f64) -> String {
    for (unit, suffix) in NUMBER_FORMATS {
        let short = (value / unit).floor();
        if short <= 0.0 {
            continue;
        }
        let remainder = value % unit;
        if short / 10.0 > 1.0 || remainder == 0.0 {
            return format!("{short}{suffix}");
        }
        return format!("{}{suffix}", round_to(value / unit, 1));
    }
    format_grouped(value)
}

/// Crash free percentage for display: `<1%` for tiny non-zero rates, three
/// decimals above 95%, whole numbers otherwise.
#[must_use]
pub fn display_crash_free_percent(percent: f64) -> String {
    if percent.is_nan() {
        return NOT_A_NUMBER.to_owned();
    }
    if percent > 0.0 && percent < 1.0 {
        return "<1%".to_owned();
    }
    let places = if percent > CRASH_FREE_DECIMAL_THRESHOLD {
        CRASH_FREE_DECIMAL_PLACES
    } else {
        0
    };
    format!("{}%", format_grouped(round_to(percent, places)))
}

/// Thousands-grouped decimal with at most three fraction digits.
fn format_grouped(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let rendered = round_to(value.abs(), 3).to_string();
    let (int_part, frac_part) = rendered.split_once('.').unwrap_or((rendered.as_str(), ""));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && (int_part != "0" || !frac_part.is_empty()) { "-" } else { "" };
    if frac_part.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac_part}")
    }
}
