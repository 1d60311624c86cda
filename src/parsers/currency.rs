use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{CURRENCY_EUR, CURRENCY_GBP, CURRENCY_INR, CURRENCY_USD};

static RUPEE_ABBREVIATION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:rs\.?|inr)\s*\d").expect("Invalid rupee regex")
});

/// Currency named by a symbol or code inside a price string.
pub fn currency_from_symbol(text: &str) -> Option<&'static str> {
    if text.contains('₹') || RUPEE_ABBREVIATION_REGEX.is_match(text) {
        Some(CURRENCY_INR)
    } else if text.contains('€') || text.contains("EUR") {
        Some(CURRENCY_EUR)
    } else if text.contains('£') || text.contains("GBP") {
        Some(CURRENCY_GBP)
    } else if text.contains('$') || text.contains("USD") {
        Some(CURRENCY_USD)
    } else {
        None
    }
}

/// Currency implied by a country-code top-level domain.
pub fn currency_from_hostname(hostname: &str) -> Option<&'static str> {
    let host = hostname.trim_end_matches('.').to_ascii_lowercase();
    let tld = host.rsplit('.').next()?;

    match tld {
        "in" => Some(CURRENCY_INR),
        "uk" => Some(CURRENCY_GBP),
        "de" | "fr" | "it" | "es" | "nl" | "ie" | "at" | "be" => Some(CURRENCY_EUR),
        _ => None,
    }
}

/// Currency glyphs found anywhere in free page text. Dollar signs are too
/// common in unrelated markup to count here.
pub fn currency_from_page_text(text: &str) -> Option<&'static str> {
    if text.contains('₹') {
        Some(CURRENCY_INR)
    } else if text.contains('€') {
        Some(CURRENCY_EUR)
    } else if text.contains('£') {
        Some(CURRENCY_GBP)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_detection() {
        assert_eq!(currency_from_symbol("₹1,299"), Some("INR"));
        assert_eq!(currency_from_symbol("Rs. 450"), Some("INR"));
        assert_eq!(currency_from_symbol("12,99 €"), Some("EUR"));
        assert_eq!(currency_from_symbol("£30"), Some("GBP"));
        assert_eq!(currency_from_symbol("US $19.99"), Some("USD"));
        assert_eq!(currency_from_symbol("19.99"), None);
        // "Rs" inside a word is not a rupee marker
        assert_eq!(currency_from_symbol("Colors 3"), None);
    }

    #[test]
    fn hostname_detection() {
        assert_eq!(currency_from_hostname("www.amazon.in"), Some("INR"));
        assert_eq!(currency_from_hostname("www.amazon.co.uk"), Some("GBP"));
        assert_eq!(currency_from_hostname("www.amazon.de"), Some("EUR"));
        assert_eq!(currency_from_hostname("www.amazon.com"), None);
        assert_eq!(currency_from_hostname("www.amazon.com.in"), Some("INR"));
        assert_eq!(currency_from_hostname("intranet.example.int"), None);
    }

    #[test]
    fn page_text_ignores_dollar_signs() {
        assert_eq!(currency_from_page_text("Only $5 shipping"), None);
        assert_eq!(currency_from_page_text("Save £5 today"), Some("GBP"));
    }
}
