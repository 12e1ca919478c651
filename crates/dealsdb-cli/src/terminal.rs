use dealsdb_core::Catalog;
use dealsdb_feed::{DealCard, FeedView, PriceTag, RenderMode};

/// Prints the feed to stdout as numbered text cards.
#[derive(Debug, Default)]
pub(crate) struct TerminalView {
    catalog: Catalog,
    shown: usize,
}

impl TerminalView {
    pub(crate) fn new() -> Self {
        Self::default()
    }
}

fn price_line(tag: &PriceTag) -> String {
    match &tag.label {
        Some(label) => format!("{label} {}", tag.amount),
        None => tag.amount.clone(),
    }
}

pub(crate) fn format_card(number: usize, card: &DealCard) -> String {
    let mut lines = Vec::with_capacity(5);

    let mut headline = format!("{number:>3}. {}", card.title);
    if let Some(badge) = &card.discount_badge {
        headline.push_str(&format!("  [{badge}]"));
    }
    lines.push(headline);

    let mut store = format!("     {}", card.store);
    if let Some(category) = &card.category {
        store.push_str(&format!(" | {category}"));
    }
    lines.push(store);

    let prices: Vec<String> = card
        .before
        .iter()
        .chain(card.now.iter())
        .map(price_line)
        .collect();
    if !prices.is_empty() {
        lines.push(format!("     {}", prices.join("  ")));
    }

    let link = card.deal_href.as_deref().unwrap_or("-");
    lines.push(format!(
        "     {}: {link}  {}: {}",
        card.cta, card.details_label, card.details_href
    ));

    if let Some(description) = &card.description {
        lines.push(format!("     {description}"));
    }
    lines.join("\n")
}

impl FeedView for TerminalView {
    fn render(&mut self, cards: &[DealCard], mode: RenderMode) {
        if cards.is_empty() {
            return;
        }
        if mode == RenderMode::Replace {
            self.shown = 0;
            println!();
        }
        for card in cards {
            self.shown += 1;
            println!("{}", format_card(self.shown, card));
        }
    }

    fn show_loading(&mut self, mode: RenderMode) {
        if mode == RenderMode::Append {
            println!("{}", self.catalog.text("infiniteScroll.loading", "Loading..."));
        }
    }

    fn show_empty(&mut self) {
        self.shown = 0;
        println!(
            "{}",
            self.catalog
                .text("infiniteScroll.noResults", "No deals match your filters.")
        );
    }

    fn show_all_loaded(&mut self) {
        println!(
            "{}",
            self.catalog
                .text("infiniteScroll.allLoaded", "All deals loaded.")
        );
    }

    fn show_error(&mut self, message: &str) {
        eprintln!(
            "{} ({message})",
            self.catalog
                .text("infiniteScroll.error", "Could not load deals.")
        );
    }

    fn set_summary(&mut self, text: &str) {
        println!("== {text} ==");
    }

    fn set_catalog(&mut self, catalog: &Catalog) {
        self.catalog = catalog.clone();
    }
}
