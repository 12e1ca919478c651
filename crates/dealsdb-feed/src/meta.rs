//! One-line result summary shown above the listing.

use dealsdb_core::{Catalog, FilterState};

const SEPARATOR: &str = " • ";

/// Categories listed by name before collapsing the rest into `(+N)`.
const SHOWN_CATEGORIES: usize = 3;

/// Summary with built-in English labels.
#[must_use]
pub fn summarize(total: u64, filters: &FilterState) -> String {
    summarize_with(total, filters, &Catalog::default(), None)
}

/// Builds `"<total> Results • Categories: a, b, c (+N) • Store: <label>"`.
///
/// The category part appears only when categories are selected, the store
/// part only when a store is pinned. `store_label` is the pinned store's
/// display name when known; otherwise the pin itself is shown.
#[must_use]
pub fn summarize_with(
    total: u64,
    filters: &FilterState,
    catalog: &Catalog,
    store_label: Option<&str>,
) -> String {
    let mut parts = vec![format!(
        "{total} {}",
        catalog.text("results.count", "Results")
    )];

    let selected = filters.selected_categories();
    let hidden = selected.len().saturating_sub(SHOWN_CATEGORIES);
    let shown: Vec<&str> = selected.take(SHOWN_CATEGORIES).collect();
    if !shown.is_empty() {
        let mut part = format!(
            "{}: {}",
            catalog.text("results.categories", "Categories"),
            shown.join(", ")
        );
        if hidden > 0 {
            part.push_str(&format!(" (+{hidden})"));
        }
        parts.push(part);
    }

    if let Some(pin) = filters.pinned_store() {
        let label = store_label.map_or_else(|| pin.to_string(), str::to_string);
        parts.push(format!("{}: {label}", catalog.text("results.store", "Store")));
    }

    parts.join(SEPARATOR)
}
