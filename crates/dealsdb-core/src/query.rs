//! Typed request descriptors for the result source.
//!
//! [`build`] turns a [`FilterState`] snapshot into a [`PageRequest`]: a page
//! window plus a conjunction of [`Predicate`]s. Sources translate the
//! predicates into their own wire format; [`Predicate::matches`] evaluates
//! them in memory.

use std::collections::BTreeSet;

use rust_decimal::Decimal;

use crate::deals::Deal;
use crate::filters::{FilterState, StoreKey};

/// Number of deals per listing page.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Deal columns that predicates can refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Description,
    Category,
    Price,
    SalePrice,
}

impl Field {
    /// Backend column name.
    #[must_use]
    pub fn column(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Description => "description",
            Field::Category => "ai_category",
            Field::Price => "price",
            Field::SalePrice => "sale_price",
        }
    }

    fn text<'a>(self, deal: &'a Deal) -> Option<&'a str> {
        match self {
            Field::Title => deal.title.as_deref(),
            Field::Description => deal.description.as_deref(),
            Field::Category => deal.category.as_deref(),
            Field::Price | Field::SalePrice => None,
        }
    }

    fn number(self, deal: &Deal) -> Option<Decimal> {
        match self {
            Field::Price => deal.price,
            Field::SalePrice => deal.sale_price,
            Field::Title | Field::Description | Field::Category => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Inclusive numeric range.
    Range {
        field: Field,
        min: Decimal,
        max: Decimal,
    },
    /// Value is one of `values`.
    InSet { field: Field, values: Vec<String> },
    /// Exact match.
    Equals { field: Field, value: String },
    /// Case-insensitive substring match.
    Contains { field: Field, needle: String },
    /// Deal belongs to the given store. Sources resolve names themselves.
    Store(StoreKey),
    /// At least one of the inner predicates holds.
    AnyOf(Vec<Predicate>),
}

impl Predicate {
    /// Evaluates the predicate against a deal.
    ///
    /// Missing fields never match. A `Store(Name)` predicate compares against
    /// the deal's resolved store name, ignoring case.
    #[must_use]
    pub fn matches(&self, deal: &Deal) -> bool {
        match self {
            Predicate::Range { field, min, max } => field
                .number(deal)
                .is_some_and(|v| *min <= v && v <= *max),
            Predicate::InSet { field, values } => field
                .text(deal)
                .is_some_and(|v| values.iter().any(|candidate| candidate == v)),
            Predicate::Equals { field, value } => field.text(deal) == Some(value.as_str()),
            Predicate::Contains { field, needle } => {
                let needle = needle.to_lowercase();
                field
                    .text(deal)
                    .is_some_and(|v| v.to_lowercase().contains(&needle))
            }
            Predicate::Store(StoreKey::Id(id)) => deal.store_id == Some(*id),
            Predicate::Store(StoreKey::Name(name)) => deal
                .store_name
                .as_deref()
                .is_some_and(|n| n.eq_ignore_ascii_case(name)),
            Predicate::AnyOf(inner) => inner.iter().any(|p| p.matches(deal)),
        }
    }
}

/// One fetch: a page window over the deals matching every predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Issue order tag; `0` until the controller assigns one.
    pub seq: u64,
    /// 1-based page number.
    pub page_index: u32,
    pub page_size: u32,
    /// Filter snapshot the predicates were derived from.
    pub filters: FilterState,
    /// Conjunction of constraints.
    pub predicates: Vec<Predicate>,
}

impl PageRequest {
    /// Number of rows to skip.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page_index.saturating_sub(1)) * u64::from(self.page_size)
    }

    /// Returns the request tagged with `seq`.
    #[must_use]
    pub fn with_seq(mut self, seq: u64) -> Self {
        self.seq = seq;
        self
    }

    /// Evaluates all predicates against a deal.
    #[must_use]
    pub fn matches(&self, deal: &Deal) -> bool {
        self.predicates.iter().all(|p| p.matches(deal))
    }
}

/// Builds the request for `page_index` under the given filters.
///
/// Predicates, in order:
/// 1. price window on the sale price OR the list price (always present);
/// 2. category set, with the pinned category folded in, when the user selected any;
/// 3. pinned category as an exact match;
/// 4. search term against title, description and category;
/// 5. pinned store.
#[must_use]
pub fn build(filters: &FilterState, page_index: u32, page_size: u32) -> PageRequest {
    let mut predicates = vec![Predicate::AnyOf(vec![
        Predicate::Range {
            field: Field::SalePrice,
            min: filters.min_price(),
            max: filters.max_price(),
        },
        Predicate::Range {
            field: Field::Price,
            min: filters.min_price(),
            max: filters.max_price(),
        },
    ])];

    if filters.selected_categories().next().is_some() {
        let mut values: BTreeSet<&str> = filters.selected_categories().collect();
        if let Some(pinned) = filters.pinned_category() {
            values.insert(pinned);
        }
        predicates.push(Predicate::InSet {
            field: Field::Category,
            values: values.into_iter().map(str::to_owned).collect(),
        });
    }

    if let Some(pinned) = filters.pinned_category() {
        predicates.push(Predicate::Equals {
            field: Field::Category,
            value: pinned.to_owned(),
        });
    }

    let term = filters.search_term();
    if !term.is_empty() {
        predicates.push(Predicate::AnyOf(
            [Field::Title, Field::Description, Field::Category]
                .into_iter()
                .map(|field| Predicate::Contains {
                    field,
                    needle: term.to_owned(),
                })
                .collect(),
        ));
    }

    if let Some(store) = filters.pinned_store() {
        predicates.push(Predicate::Store(store.clone()));
    }

    PageRequest {
        seq: 0,
        page_index: page_index.max(1),
        page_size: page_size.max(1),
        filters: filters.clone(),
        predicates,
    }
}

#[cfg(test)]
#[path = "query_test.rs"]
mod tests;
