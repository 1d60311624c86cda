use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{CURRENCY_EUR, CURRENCY_GBP, CURRENCY_INR, CURRENCY_USD};

// First run of digits, commas and periods that contains at least one digit
static PRICE_RUN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\d.,]*\d[\d.,]*").expect("Invalid price regex")
});

/// Convert raw price text of unknown format into a number.
///
/// Only the first numeric run is considered. Commas are treated as thousands
/// separators and the first period as the decimal point, so European
/// `1.234,56` is not understood; callers pre-normalize such text.
pub fn normalize_price(raw: &str) -> Option<f64> {
    let run = PRICE_RUN_REGEX.find(raw)?.as_str();
    let digits: String = run
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    parse_float_prefix(&digits)
}

/// Longest `digits[.digits]` prefix, ignoring anything after a second period.
fn parse_float_prefix(text: &str) -> Option<f64> {
    let mut end = 0;
    let mut seen_dot = false;

    for (i, c) in text.char_indices() {
        match c {
            '0'..='9' => end = i + 1,
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
    }

    if end == 0 {
        return None;
    }

    let number = &text[..end];
    let parsed = if number.starts_with('.') {
        format!("0{}", number).parse::<f64>()
    } else {
        number.parse::<f64>()
    };

    parsed.ok().filter(|value| value.is_finite())
}

/// Format a price for display in notifications and logs.
pub fn format_price(price: f64, currency: &str) -> String {
    let fixed = format!("{:.2}", price.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let grouped = if currency == CURRENCY_INR {
        group_indian(whole)
    } else {
        group_thousands(whole)
    };
    let sign = if price < 0.0 { "-" } else { "" };

    match currency_symbol(currency) {
        Some(symbol) => format!("{}{}{}.{}", sign, symbol, grouped, fraction),
        None => format!("{}{} {}.{}", sign, currency, grouped, fraction),
    }
}

fn currency_symbol(currency: &str) -> Option<&'static str> {
    match currency {
        CURRENCY_USD => Some("$"),
        CURRENCY_INR => Some("₹"),
        CURRENCY_EUR => Some("€"),
        CURRENCY_GBP => Some("£"),
        _ => None,
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

// en-IN grouping: last three digits, then pairs (1,23,456)
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut out = String::new();
    for (i, c) in head.chars().enumerate() {
        if i > 0 && (head.len() - i) % 2 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out.push(',');
    out.push_str(tail);
    out
}
