//! Paging state machine for the listing feed.
//!
//! The controller never performs I/O. Operations that need data return an
//! [`Issued`] request; the caller fetches it and hands the outcome back to
//! [`Controller::settle`] together with the view to update. Every request is
//! tagged with a sequence number and only the latest one is ever rendered.

use std::fmt::Display;

use dealsdb_core::{build, Catalog, FilterState, PageRequest, PageResult};

use crate::meta::summarize_with;
use crate::render::{DealCard, RenderMode};
use crate::scroll::{Phase, ScrollPosition, ScrollState};
use crate::view::FeedView;

/// A request the caller must fetch and settle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issued {
    pub request: PageRequest,
    pub mode: RenderMode,
}

impl Issued {
    #[must_use]
    pub fn seq(&self) -> u64 {
        self.request.seq
    }
}

/// What [`Controller::settle`] did with a fetch outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled {
    /// Cards were rendered and more pages remain.
    Rendered,
    /// The filters match nothing; the empty state is shown.
    Empty,
    /// The last page is rendered.
    Exhausted,
    /// The fetch failed; prior content is untouched.
    Failed,
    /// A newer request was issued since; the outcome was dropped.
    Stale,
}

#[derive(Debug)]
pub struct Controller {
    filters: FilterState,
    /// Snapshot behind the current generation; `None` before the first fetch.
    applied: Option<FilterState>,
    page_size: u32,
    catalog: Catalog,
    scroll: ScrollState,
    phase: Phase,
    last_seq: u64,
    in_flight: Option<Issued>,
    failed: Option<Issued>,
    total_count: Option<u64>,
    /// Filters behind `total_count`; lags `applied` while a replace is in flight.
    shown: Option<FilterState>,
    store_label: Option<String>,
}

impl Controller {
    #[must_use]
    pub fn new(filters: FilterState, page_size: u32, catalog: Catalog) -> Self {
        Self {
            filters,
            applied: None,
            page_size: page_size.max(1),
            catalog,
            scroll: ScrollState::default(),
            phase: Phase::Idle,
            last_seq: 0,
            in_flight: None,
            failed: None,
            total_count: None,
            shown: None,
            store_label: None,
        }
    }

    #[must_use]
    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    /// Mutable filters. Changes take effect on the next [`refresh`](Self::refresh).
    pub fn filters_mut(&mut self) -> &mut FilterState {
        &mut self.filters
    }

    #[must_use]
    pub fn scroll(&self) -> ScrollState {
        self.scroll
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Exact match count of the last rendered generation.
    #[must_use]
    pub fn total_count(&self) -> Option<u64> {
        self.total_count
    }

    /// Sequence number of the most recently issued request.
    #[must_use]
    pub fn last_seq(&self) -> u64 {
        self.last_seq
    }

    /// Starts a new generation when the filters changed since the last one,
    /// or when the last fetch failed.
    pub fn refresh<V: FeedView + ?Sized>(&mut self, view: &mut V) -> Option<Issued> {
        if self.phase != Phase::Error && self.applied.as_ref() == Some(&self.filters) {
            return None;
        }
        Some(self.restart(view))
    }

    /// Unconditionally resets paging and fetches page 1 in replace mode.
    pub fn restart<V: FeedView + ?Sized>(&mut self, view: &mut V) -> Issued {
        self.scroll.reset();
        self.failed = None;
        self.applied = Some(self.filters.clone());
        self.issue(1, RenderMode::Replace, view)
    }

    /// Jumps to page `n` of the current generation, replacing the grid.
    ///
    /// `n` is clamped to `[1, total_pages]`; page 1 is a full restart.
    pub fn go_to<V: FeedView + ?Sized>(&mut self, n: u32, view: &mut V) -> Issued {
        let page = n.clamp(1, self.scroll.total_pages);
        if page == 1 || self.applied.as_ref() != Some(&self.filters) {
            return self.restart(view);
        }
        self.failed = None;
        self.issue(page, RenderMode::Replace, view)
    }

    /// Requests the next page in append mode.
    ///
    /// Dropped (not queued) while a fetch is in flight, once every page is
    /// shown, before the first page, or after a failed replace fetch.
    pub fn load_more<V: FeedView + ?Sized>(&mut self, view: &mut V) -> Option<Issued> {
        if self.applied.is_none() || self.scroll.is_loading || !self.scroll.has_more_pages {
            return None;
        }
        if self.phase == Phase::Error
            && self
                .failed
                .as_ref()
                .is_some_and(|f| f.mode == RenderMode::Replace)
        {
            return None;
        }
        self.failed = None;
        let next = self.scroll.current_page + 1;
        Some(self.issue(next, RenderMode::Append, view))
    }

    /// Loads the next page when `position` is within `threshold` pixels of the end.
    pub fn on_scroll<V: FeedView + ?Sized>(
        &mut self,
        position: ScrollPosition,
        threshold: u32,
        view: &mut V,
    ) -> Option<Issued> {
        if !position.near_bottom(threshold) {
            return None;
        }
        self.load_more(view)
    }

    /// Re-issues the failed request under a fresh sequence number.
    pub fn retry<V: FeedView + ?Sized>(&mut self, view: &mut V) -> Option<Issued> {
        if self.phase != Phase::Error {
            return None;
        }
        let failed = self.failed.take()?;
        Some(self.issue(failed.request.page_index, failed.mode, view))
    }

    /// Switches the display language and re-renders the summary.
    pub fn set_catalog<V: FeedView + ?Sized>(&mut self, catalog: Catalog, view: &mut V) {
        self.catalog = catalog;
        view.set_catalog(&self.catalog);
        if let (Some(total), Some(shown)) = (self.total_count, &self.shown) {
            view.set_summary(&summarize_with(
                total,
                shown,
                &self.catalog,
                self.store_label.as_deref(),
            ));
        }
    }

    fn issue<V: FeedView + ?Sized>(&mut self, page: u32, mode: RenderMode, view: &mut V) -> Issued {
        self.last_seq += 1;
        let snapshot = self.applied.as_ref().unwrap_or(&self.filters);
        let request = build(snapshot, page, self.page_size).with_seq(self.last_seq);
        let issued = Issued { request, mode };

        tracing::debug!(
            seq = issued.seq(),
            page,
            ?mode,
            "feed request issued"
        );
        self.scroll.is_loading = true;
        self.phase = Phase::Fetching;
        self.in_flight = Some(issued.clone());
        view.show_loading(mode);
        issued
    }

    /// Applies the outcome of request `seq` to the paging state and the view.
    pub fn settle<E, V>(&mut self, seq: u64, outcome: Result<PageResult, E>, view: &mut V) -> Settled
    where
        E: Display,
        V: FeedView + ?Sized,
    {
        let Some(issued) = self.in_flight.take_if(|i| i.seq() == seq) else {
            tracing::debug!(seq, latest = self.last_seq, "stale feed result dropped");
            return Settled::Stale;
        };
        self.scroll.is_loading = false;

        let page = match outcome {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!(seq, page = issued.request.page_index, error = %e, "feed fetch failed");
                self.phase = Phase::Error;
                self.failed = Some(issued);
                view.show_error(&e.to_string());
                return Settled::Failed;
            }
        };

        let Issued { request, mode } = issued;
        self.scroll
            .apply_page(request.page_index, page.total_count, self.page_size);
        self.total_count = Some(page.total_count);

        if mode == RenderMode::Replace {
            self.store_label = request
                .filters
                .pinned_store()
                .and(page.items.first())
                .and_then(|d| d.store_label())
                .map(str::to_string);
        }
        view.set_summary(&summarize_with(
            page.total_count,
            &request.filters,
            &self.catalog,
            self.store_label.as_deref(),
        ));
        self.shown = Some(request.filters);

        if mode == RenderMode::Replace && page.is_empty() {
            self.phase = Phase::Exhausted;
            view.show_empty();
            return Settled::Empty;
        }

        let cards: Vec<DealCard> = page
            .items
            .iter()
            .map(|deal| DealCard::build(deal, &self.catalog))
            .collect();
        view.render(&cards, mode);

        if self.scroll.has_more_pages {
            self.phase = Phase::Idle;
            Settled::Rendered
        } else {
            self.phase = Phase::Exhausted;
            view.show_all_loaded();
            Settled::Exhausted
        }
    }
}

#[cfg(test)]
#[path = "controller_test.rs"]
mod tests;
