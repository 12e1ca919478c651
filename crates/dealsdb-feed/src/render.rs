//! Display model for deal cards.

use dealsdb_core::{Catalog, Deal};
use rust_decimal::Decimal;

/// Maximum description preview length, in characters.
const DESCRIPTION_PREVIEW_CHARS: usize = 150;

/// How a rendered page combines with what is already shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Clear prior output first.
    Replace,
    /// Add after prior output, preserving order.
    Append,
}

/// A labelled price line, e.g. `Now only: 79.99 €`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceTag {
    pub label: Option<String>,
    pub amount: String,
}

/// Everything a listing card shows for one deal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DealCard {
    pub hash_id: String,
    pub title: String,
    /// `Shop: <name>`.
    pub store: String,
    pub image: Option<String>,
    /// Alt text, or the placeholder caption when there is no image.
    pub image_alt: String,
    pub category: Option<String>,
    /// Current price; absent when the deal has no price at all.
    pub now: Option<PriceTag>,
    /// Crossed-out list price, only for discounted deals.
    pub before: Option<PriceTag>,
    /// `-N%`.
    pub discount_badge: Option<String>,
    /// Outbound link; `None` renders a disabled button.
    pub deal_href: Option<String>,
    pub cta: String,
    pub details_href: String,
    pub details_label: String,
    pub description: Option<String>,
}

impl DealCard {
    /// Builds the card for `deal` with texts from `catalog`.
    ///
    /// Never fails: missing fields fall back to placeholder texts.
    #[must_use]
    pub fn build(deal: &Deal, catalog: &Catalog) -> Self {
        let title = non_blank(deal.title.as_deref())
            .unwrap_or_else(|| catalog.text("card.untitled", "Product"))
            .to_string();

        let store_name = deal
            .store_label()
            .unwrap_or_else(|| catalog.text("card.unknownStore", "Unknown"));
        let store = format!("{} {store_name}", catalog.text("card.shop", "Shop:"));

        let image = non_blank(deal.image.as_deref()).map(str::to_string);
        let image_alt = if image.is_some() {
            title.clone()
        } else {
            catalog.text("card.noImage", "No image").to_string()
        };

        let currency = deal.currency.as_deref();
        let (now, before) = if deal.is_discounted() {
            (
                deal.sale_price.map(|p| PriceTag {
                    label: Some(catalog.text("price.now", "Now only:").to_string()),
                    amount: format_price(p, currency),
                }),
                deal.price.map(|p| PriceTag {
                    label: Some(catalog.text("price.before", "Before:").to_string()),
                    amount: format_price(p, currency),
                }),
            )
        } else {
            (
                deal.effective_price().map(|p| PriceTag {
                    label: None,
                    amount: format_price(p, currency),
                }),
                None,
            )
        };

        let description = if catalog.is_german() {
            non_blank(deal.description.as_deref())
        } else {
            non_blank(deal.description_english.as_deref())
                .or_else(|| non_blank(deal.description.as_deref()))
        }
        .map(|raw| truncate(&strip_html(raw), DESCRIPTION_PREVIEW_CHARS))
        .filter(|text| !text.is_empty());

        Self {
            hash_id: deal.hash_id.clone(),
            title,
            store,
            image,
            image_alt,
            category: non_blank(deal.category.as_deref()).map(str::to_string),
            now,
            before,
            discount_badge: deal.discount_percent().map(|p| format!("-{p}%")),
            deal_href: deal.deal_href().map(str::to_string),
            cta: catalog.text("card.cta", "Go to deal").to_string(),
            details_href: deal.details_href(),
            details_label: catalog.text("button.dealDetails", "Details").to_string(),
            description,
        }
    }
}

/// Formats an amount as `"<amount with 2 decimals> <symbol>"`.
///
/// EUR, USD and GBP use their symbols, other codes are shown as is, and a
/// missing currency means euros.
#[must_use]
pub fn format_price(amount: Decimal, currency: Option<&str>) -> String {
    let symbol = match currency.map(str::trim).filter(|c| !c.is_empty()) {
        None => "€".to_string(),
        Some(code) => match code.to_ascii_uppercase().as_str() {
            "EUR" => "€".to_string(),
            "USD" => "$".to_string(),
            "GBP" => "£".to_string(),
            other => other.to_string(),
        },
    };
    format!("{:.2} {symbol}", amount.round_dp(2))
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Removes markup tags, decodes common entities and collapses whitespace.
fn strip_html(raw: &str) -> String {
    let mut text = String::with_capacity(raw.len());
    let mut in_tag = false;
    for c in raw.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => {
                in_tag = false;
                text.push(' ');
            }
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }

    let decoded = text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}…", text[..cut].trim_end()),
        None => text.to_string(),
    }
}
