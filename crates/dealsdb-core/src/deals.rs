use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A published deal as listed on the deals page.
///
/// Every display field is optional; the backend regularly returns rows with
/// missing descriptions, images or links and the listing must still render.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Deal {
    /// Stable content hash used for the details page link.
    pub hash_id: String,
    #[serde(default)]
    pub title: Option<String>,
    /// List price.
    #[serde(default)]
    pub price: Option<Decimal>,
    /// Discounted price, if the deal is on sale.
    #[serde(default)]
    pub sale_price: Option<Decimal>,
    /// ISO 4217 currency code, e.g. `"EUR"`.
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub affiliate_link: Option<String>,
    /// German description; may contain HTML.
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub description_english: Option<String>,
    #[serde(default)]
    pub store_id: Option<Uuid>,
    #[serde(default, rename = "ai_category")]
    pub category: Option<String>,
    /// Resolved store display name; filled in by the result source.
    #[serde(default)]
    pub store_name: Option<String>,
}

impl Deal {
    /// The price the deal currently sells for: sale price when set, else list price.
    #[must_use]
    pub fn effective_price(&self) -> Option<Decimal> {
        self.sale_price.or(self.price)
    }

    /// Returns `true` when a sale price undercuts the list price.
    #[must_use]
    pub fn is_discounted(&self) -> bool {
        matches!((self.price, self.sale_price), (Some(p), Some(s)) if p > s)
    }

    /// Whole-percent discount, rounded half away from zero.
    ///
    /// `None` unless discounted, or when the prices are too extreme to divide.
    #[must_use]
    pub fn discount_percent(&self) -> Option<u32> {
        let (Some(price), Some(sale)) = (self.price, self.sale_price) else {
            return None;
        };
        if price <= sale || price.is_zero() {
            return None;
        }
        price
            .checked_sub(sale)?
            .checked_div(price)?
            .checked_mul(Decimal::ONE_HUNDRED)?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_u32()
            .filter(|p| *p > 0)
    }

    /// Outbound shop link: affiliate link first, plain link second.
    #[must_use]
    pub fn deal_href(&self) -> Option<&str> {
        non_blank(self.affiliate_link.as_deref()).or_else(|| non_blank(self.link.as_deref()))
    }

    /// Link to the on-site details page.
    #[must_use]
    pub fn details_href(&self) -> String {
        let id: String =
            percent_encoding::utf8_percent_encode(&self.hash_id, percent_encoding::NON_ALPHANUMERIC)
                .collect();
        format!("product.html?id={id}")
    }

    /// Store display name, falling back to the brand.
    #[must_use]
    pub fn store_label(&self) -> Option<&str> {
        non_blank(self.store_name.as_deref()).or_else(|| non_blank(self.brand.as_deref()))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// One page of deals plus the exact number of matches across all pages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageResult {
    pub items: Vec<Deal>,
    pub total_count: u64,
}

impl PageResult {
    #[must_use]
    pub fn new(items: Vec<Deal>, total_count: u64) -> Self {
        Self { items, total_count }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
