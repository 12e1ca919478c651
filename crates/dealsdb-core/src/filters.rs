//! Listing filter state and the URL context it is seeded from.
//!
//! `FilterState` is plain data: setters never trigger fetches. Callers ask
//! the feed controller for a refresh after mutating it.

use std::collections::BTreeSet;

use percent_encoding::percent_decode_str;
use rust_decimal::Decimal;
use uuid::Uuid;

/// Upper bound of the price slider.
pub const DEFAULT_PRICE_CEILING: Decimal = Decimal::from_parts(3000, 0, 0, false, 0);

/// A store pinned from an external link.
///
/// Links carry either the store's UUID (older links) or its display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreKey {
    Id(Uuid),
    Name(String),
}

impl StoreKey {
    /// Classifies a raw `store` URL parameter.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        Some(match Uuid::parse_str(raw) {
            Ok(id) => StoreKey::Id(id),
            Err(_) => StoreKey::Name(raw.to_string()),
        })
    }
}

impl std::fmt::Display for StoreKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreKey::Id(id) => write!(f, "{id}"),
            StoreKey::Name(name) => f.write_str(name),
        }
    }
}

/// Filter values supplied by the page URL on load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlContext {
    pub search: Option<String>,
    pub category: Option<String>,
    pub store: Option<String>,
}

impl UrlContext {
    /// Parses a URL query string (with or without the leading `?`).
    ///
    /// Values are percent-decoded with `+` read as a space. Unknown keys are
    /// ignored; empty values are treated as absent; the first occurrence of a
    /// key wins.
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        let mut ctx = Self::default();
        let query = query.strip_prefix('?').unwrap_or(query);

        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let value = decode_component(value);
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            let slot = match decode_component(key).as_str() {
                "search" => &mut ctx.search,
                "category" => &mut ctx.category,
                "store" => &mut ctx.store,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.to_string());
            }
        }

        ctx
    }
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    min_price: Decimal,
    max_price: Decimal,
    price_ceiling: Decimal,
    selected_categories: BTreeSet<String>,
    search_term: String,
    pinned_category: Option<String>,
    pinned_store: Option<StoreKey>,
}

impl Default for FilterState {
    fn default() -> Self {
        Self::new(DEFAULT_PRICE_CEILING)
    }
}

impl FilterState {
    /// Default filters with the given price ceiling (negative ceilings clamp to zero).
    #[must_use]
    pub fn new(price_ceiling: Decimal) -> Self {
        let price_ceiling = price_ceiling.max(Decimal::ZERO);
        Self {
            min_price: Decimal::ZERO,
            max_price: price_ceiling,
            price_ceiling,
            selected_categories: BTreeSet::new(),
            search_term: String::new(),
            pinned_category: None,
            pinned_store: None,
        }
    }

    /// Builds the initial filters for a page load.
    ///
    /// A pinned category is also pre-selected, matching the checked box the
    /// listing shows for it.
    #[must_use]
    pub fn from_url(ctx: &UrlContext, price_ceiling: Decimal) -> Self {
        let mut state = Self::new(price_ceiling);
        if let Some(search) = &ctx.search {
            state.set_search_term(search);
        }
        if let Some(category) = ctx.category.as_deref().map(str::trim) {
            if !category.is_empty() {
                state.pinned_category = Some(category.to_string());
                state.selected_categories.insert(category.to_string());
            }
        }
        state.pinned_store = ctx.store.as_deref().and_then(StoreKey::parse);
        state
    }

    #[must_use]
    pub fn min_price(&self) -> Decimal {
        self.min_price
    }

    #[must_use]
    pub fn max_price(&self) -> Decimal {
        self.max_price
    }

    #[must_use]
    pub fn price_ceiling(&self) -> Decimal {
        self.price_ceiling
    }

    /// Selected categories in sorted order.
    pub fn selected_categories(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.selected_categories.iter().map(String::as_str)
    }

    #[must_use]
    pub fn is_category_selected(&self, name: &str) -> bool {
        self.selected_categories.contains(name)
    }

    #[must_use]
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    #[must_use]
    pub fn pinned_category(&self) -> Option<&str> {
        self.pinned_category.as_deref()
    }

    #[must_use]
    pub fn pinned_store(&self) -> Option<&StoreKey> {
        self.pinned_store.as_ref()
    }

    /// Sets the price window, clamping both ends to `[0, ceiling]` and
    /// swapping them when given in the wrong order.
    pub fn set_price_range(&mut self, min: Decimal, max: Decimal) {
        let clamp = |v: Decimal| v.max(Decimal::ZERO).min(self.price_ceiling);
        let (lo, hi) = (clamp(min), clamp(max));
        if lo > hi {
            self.min_price = hi;
            self.max_price = lo;
        } else {
            self.min_price = lo;
            self.max_price = hi;
        }
    }

    /// Adds the category if absent, removes it otherwise. Returns whether it
    /// is selected afterwards.
    pub fn toggle_category(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        if self.selected_categories.remove(name) {
            false
        } else {
            self.selected_categories.insert(name.to_string());
            true
        }
    }

    pub fn set_search_term(&mut self, text: &str) {
        text.trim().clone_into(&mut self.search_term);
    }

    /// Restores the defaults. URL pins are dropped too.
    pub fn reset(&mut self) {
        *self = Self::new(self.price_ceiling);
    }

    /// Returns `true` when the price window differs from `[0, ceiling]`.
    #[must_use]
    pub fn has_price_filter(&self) -> bool {
        !self.min_price.is_zero() || self.max_price != self.price_ceiling
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(v: i64) -> Decimal {
        Decimal::from(v)
    }

    #[test]
    fn set_price_range_swaps_reversed_bounds() {
        let mut f = FilterState::default();
        f.set_price_range(dec(500), dec(100));
        assert_eq!(f.min_price(), dec(100));
        assert_eq!(f.max_price(), dec(500));
    }

    #[test]
    fn set_price_range_clamps_to_ceiling_and_zero() {
        let mut f = FilterState::default();
        f.set_price_range(dec(-20), dec(10_000));
        assert_eq!(f.min_price(), Decimal::ZERO);
        assert_eq!(f.max_price(), DEFAULT_PRICE_CEILING);
        assert!(!f.has_price_filter());
    }

    #[test]
    fn min_never_exceeds_max_for_any_input_order() {
        let inputs = [(0, 0), (3000, 0), (-5, -10), (4000, 3500), (250, 249), (1, 2999)];
        for (a, b) in inputs {
            let mut f = FilterState::default();
            f.set_price_range(dec(a), dec(b));
            assert!(
                f.min_price() <= f.max_price(),
                "min > max after set_price_range({a}, {b})"
            );
        }
    }

    #[test]
    fn toggle_category_adds_then_removes() {
        let mut f = FilterState::default();
        assert!(f.toggle_category("Fashion"));
        assert!(f.is_category_selected("Fashion"));
        assert!(!f.toggle_category("Fashion"));
        assert_eq!(f.selected_categories().len(), 0);
    }

    #[test]
    fn selection_order_does_not_affect_equality() {
        let mut a = FilterState::default();
        a.toggle_category("Sport");
        a.toggle_category("Beauty");
        let mut b = FilterState::default();
        b.toggle_category("Beauty");
        b.toggle_category("Sport");
        assert_eq!(a, b);
    }

    #[test]
    fn search_term_is_trimmed() {
        let mut f = FilterState::default();
        f.set_search_term("   running shoes \t");
        assert_eq!(f.search_term(), "running shoes");
    }

    #[test]
    fn reset_is_idempotent_and_drops_pins() {
        let ctx = UrlContext::from_query("?search=tv&category=Gaming&store=Acme");
        let mut f = FilterState::from_url(&ctx, DEFAULT_PRICE_CEILING);
        f.set_price_range(dec(10), dec(20));

        f.reset();
        let once = f.clone();
        f.reset();

        assert_eq!(f, once);
        assert_eq!(f, FilterState::default());
        assert!(f.pinned_category().is_none());
        assert!(f.pinned_store().is_none());
    }

    #[test]
    fn url_context_decodes_values() {
        let ctx = UrlContext::from_query("search=noise+cancelling%20headphones&category=Home%20%26%20Garden&utm=x");
        assert_eq!(ctx.search.as_deref(), Some("noise cancelling headphones"));
        assert_eq!(ctx.category.as_deref(), Some("Home & Garden"));
        assert!(ctx.store.is_none());
    }

    #[test]
    fn url_context_ignores_empty_values() {
        let ctx = UrlContext::from_query("?search=&category=%20&store");
        assert_eq!(ctx, UrlContext::default());
    }

    #[test]
    fn from_url_pins_and_preselects_category() {
        let ctx = UrlContext::from_query("category=Gaming");
        let f = FilterState::from_url(&ctx, DEFAULT_PRICE_CEILING);
        assert_eq!(f.pinned_category(), Some("Gaming"));
        assert!(f.is_category_selected("Gaming"));
    }

    #[test]
    fn store_key_distinguishes_uuid_and_name() {
        let id = "6f1c2d3e-4a5b-4c6d-8e7f-90a1b2c3d4e5";
        assert_eq!(
            StoreKey::parse(id),
            Some(StoreKey::Id(Uuid::parse_str(id).unwrap()))
        );
        assert_eq!(
            StoreKey::parse(" MediaMarkt "),
            Some(StoreKey::Name("MediaMarkt".to_string()))
        );
        assert_eq!(StoreKey::parse("  "), None);
    }
}
