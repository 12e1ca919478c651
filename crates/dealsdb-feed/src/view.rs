use dealsdb_core::Catalog;

use crate::render::{DealCard, RenderMode};

/// Display surface driven by the feed controller.
///
/// Only [`render`](FeedView::render) is required; the state signals default
/// to no-ops for views that do not show them.
pub trait FeedView {
    /// Shows a page of cards. `Replace` clears prior output first, `Append`
    /// adds after it. An empty slice changes nothing.
    fn render(&mut self, cards: &[DealCard], mode: RenderMode);

    /// A fetch started: skeleton cards for `Replace`, a spinner for `Append`.
    fn show_loading(&mut self, _mode: RenderMode) {}

    /// The current filters match nothing. Replaces any grid.
    fn show_empty(&mut self) {}

    /// The last page of the current filters is shown.
    fn show_all_loaded(&mut self) {}

    fn show_error(&mut self, _message: &str) {}

    fn set_summary(&mut self, _text: &str) {}

    /// The active locale changed.
    fn set_catalog(&mut self, _catalog: &Catalog) {}
}

/// In-memory view that keeps rendered cards and the latest signals.
#[derive(Debug, Default)]
pub struct CardGrid {
    pub cards: Vec<DealCard>,
    pub summary: String,
    pub loading: Option<RenderMode>,
    pub empty: bool,
    pub all_loaded: bool,
    pub error: Option<String>,
    pub locale: Option<String>,
}

impl CardGrid {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn hash_ids(&self) -> Vec<&str> {
        self.cards.iter().map(|c| c.hash_id.as_str()).collect()
    }
}

impl FeedView for CardGrid {
    fn render(&mut self, cards: &[DealCard], mode: RenderMode) {
        if cards.is_empty() {
            return;
        }
        if mode == RenderMode::Replace {
            self.cards.clear();
            self.all_loaded = false;
        }
        self.cards.extend_from_slice(cards);
        self.loading = None;
        self.empty = false;
        self.error = None;
    }

    fn show_loading(&mut self, mode: RenderMode) {
        self.loading = Some(mode);
        self.error = None;
        if mode == RenderMode::Replace {
            self.all_loaded = false;
        }
    }

    fn show_empty(&mut self) {
        self.cards.clear();
        self.loading = None;
        self.empty = true;
        self.all_loaded = false;
    }

    fn show_all_loaded(&mut self) {
        self.loading = None;
        self.all_loaded = true;
    }

    fn show_error(&mut self, message: &str) {
        self.loading = None;
        self.error = Some(message.to_string());
    }

    fn set_summary(&mut self, text: &str) {
        text.clone_into(&mut self.summary);
    }

    fn set_catalog(&mut self, catalog: &Catalog) {
        self.locale = Some(catalog.locale().to_string());
    }
}
