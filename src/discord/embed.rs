use chrono::Local;
use serde_json::{json, Value};

use crate::models::ExtractedProduct;
use crate::parsers::{clean_text, format_price};
use crate::storage::PriceDrop;

const EMOJI_PRICE: &str = "💰";
const EMOJI_WAS: &str = "🏷️";
const EMOJI_ALERT: &str = "🔔";
const EMOJI_SAVINGS: &str = "📉";

const COLOR_DROP: u32 = 0x2E8B57;
const COLOR_TRACKING: u32 = 0x4682B4;
const COLOR_SUMMARY: u32 = 0xDAA520;

const MAX_TITLE_CHARS: usize = 250;

pub fn price_drop_embed(drop: &PriceDrop) -> Value {
    let mut fields = vec![
        json!({
            "name": format!("{} Price:", EMOJI_PRICE),
            "value": format!("**{}**", format_price(drop.new_price, &drop.currency)),
            "inline": true
        }),
        json!({
            "name": format!("{} Was:", EMOJI_WAS),
            "value": format!("~~{}~~", format_price(drop.old_price, &drop.currency)),
            "inline": true
        }),
        json!({
            "name": format!("{} Savings:", EMOJI_SAVINGS),
            "value": format!("**{}**", format_price(drop.savings(), &drop.currency)),
            "inline": true
        }),
    ];

    if let Some(alert) = drop.alert_price {
        fields.push(json!({
            "name": format!("{} Alert:", EMOJI_ALERT),
            "value": format!("**{}**", format_price(alert, &drop.currency)),
            "inline": false
        }));
    }

    build_embed(
        "Price Drop Alert!",
        &drop.title,
        &drop.product_url,
        drop.image_url.as_deref(),
        &drop.store,
        COLOR_DROP,
        Some(&drop.message),
        fields,
    )
}

/// Follows the first drop of a cycle when more products dropped too.
pub fn drop_summary_embed(others: &[PriceDrop]) -> Value {
    let lines: Vec<String> = others
        .iter()
        .map(|drop| {
            format!(
                "[{}]({}) {} at {}",
                embed_title(&drop.title),
                drop.product_url,
                format_price(drop.new_price, &drop.currency),
                drop.store
            )
        })
        .collect();

    json!({
        "author": { "name": "Multiple Price Drops" },
        "title": format!("{} more products have price drops", others.len()),
        "description": lines.join("\n"),
        "color": COLOR_SUMMARY,
        "footer": {
            "text": format!("Detected: {}", Local::now().format("%Y-%m-%d %H:%M:%S"))
        }
    })
}

/// Announces a product seen for the first time.
pub fn tracking_embed(product: &ExtractedProduct) -> Value {
    let mut fields = Vec::new();

    if let Some(price) = product.current_price {
        fields.push(json!({
            "name": format!("{} Price:", EMOJI_PRICE),
            "value": format!("**{}**", format_price(price, &product.currency)),
            "inline": true
        }));
    }

    if let Some(original) = product.original_price {
        fields.push(json!({
            "name": format!("{} Was:", EMOJI_WAS),
            "value": format!("~~{}~~", format_price(original, &product.currency)),
            "inline": true
        }));
    }

    build_embed(
        "Now Tracking",
        &product.title,
        &product.product_url,
        product.image_url.as_deref(),
        &product.store,
        COLOR_TRACKING,
        None,
        fields,
    )
}

#[allow(clippy::too_many_arguments)]
fn build_embed(
    heading: &str,
    title: &str,
    url: &str,
    image_url: Option<&str>,
    store: &str,
    color: u32,
    description: Option<&str>,
    fields: Vec<Value>,
) -> Value {
    let mut embed = json!({
        "author": { "name": heading },
        "title": embed_title(title),
        "url": url,
        "color": color,
        "fields": fields,
        "footer": {
            "text": format!("{} - Detected: {}", store, Local::now().format("%Y-%m-%d %H:%M:%S"))
        }
    });

    if let Some(image_url) = image_url {
        embed["image"] = json!({ "url": image_url });
    }
    if let Some(description) = description {
        embed["description"] = json!(description);
    }

    embed
}

fn embed_title(title: &str) -> String {
    let title = clean_text(title);

    if title.is_empty() {
        return "Unknown Product".to_string();
    }

    if title.chars().count() > MAX_TITLE_CHARS {
        let truncated: String = title.chars().take(MAX_TITLE_CHARS).collect();
        format!("{}...", truncated)
    } else {
        title
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn drop() -> PriceDrop {
        PriceDrop {
            title: "Noise  Cancelling   Headphones".to_string(),
            store: "Bestbuy".to_string(),
            product_url: "https://www.bestbuy.com/site/headphones/123.p".to_string(),
            image_url: Some("https://pisces.bbystatic.com/image.jpg".to_string()),
            currency: "USD".to_string(),
            old_price: 349.99,
            new_price: 279.99,
            alert_price: Some(300.0),
            message: "Price for Noise Cancelling Headphones dropped to $279.99! (Your alert was set at $300.00)"
                .to_string(),
        }
    }

    #[test]
    fn drop_embed_lists_prices_and_alert() {
        let embed = price_drop_embed(&drop());

        assert_eq!(embed["author"]["name"], "Price Drop Alert!");
        assert_eq!(embed["title"], "Noise Cancelling Headphones");
        assert_eq!(embed["url"], "https://www.bestbuy.com/site/headphones/123.p");
        assert_eq!(embed["image"]["url"], "https://pisces.bbystatic.com/image.jpg");
        assert_eq!(embed["color"], COLOR_DROP);

        let values: Vec<&str> = embed["fields"]
            .as_array()
            .unwrap()
            .iter()
            .map(|field| field["value"].as_str().unwrap())
            .collect();
        assert_eq!(values, vec!["**$279.99**", "~~$349.99~~", "**$70.00**", "**$300.00**"]);
        assert!(embed["footer"]["text"].as_str().unwrap().starts_with("Bestbuy - Detected: "));
    }

    #[test]
    fn tracking_embed_skips_missing_fields() {
        let product = ExtractedProduct {
            title: String::new(),
            current_price: Some(1499.0),
            original_price: None,
            image_url: None,
            currency: "INR".to_string(),
            store: "Flipkart".to_string(),
            product_url: "https://www.flipkart.com/p/itm1".to_string(),
        };

        let embed = tracking_embed(&product);
        assert_eq!(embed["title"], "Unknown Product");
        assert_eq!(embed["fields"].as_array().unwrap().len(), 1);
        assert_eq!(embed["fields"][0]["value"], "**₹1,499.00**");
        assert!(embed.get("image").is_none());
        assert!(embed.get("description").is_none());
    }

    #[test]
    fn summary_lists_the_remaining_drops() {
        let mut other = drop();
        other.title = "Desk Lamp".to_string();
        other.product_url = "https://www.target.com/p/lamp".to_string();
        other.store = "Target".to_string();
        other.new_price = 19.5;

        let embed = drop_summary_embed(&[drop(), other]);
        assert_eq!(embed["author"]["name"], "Multiple Price Drops");
        assert_eq!(embed["title"], "2 more products have price drops");
        assert_eq!(
            embed["description"],
            "[Noise Cancelling Headphones](https://www.bestbuy.com/site/headphones/123.p) $279.99 at Bestbuy\n\
             [Desk Lamp](https://www.target.com/p/lamp) $19.50 at Target"
        );
    }

    #[test]
    fn long_titles_are_truncated() {
        let title = "a".repeat(300);
        assert_eq!(embed_title(&title).chars().count(), MAX_TITLE_CHARS + 3);
    }
}
