//! Command-driven driver tying the controller to a result source and a view.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use dealsdb_core::{AppConfig, FilterState, PageRequest, PageResult, ResultSource, Translations};
use futures::stream::{FuturesUnordered, StreamExt};
use rust_decimal::Decimal;
use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::controller::{Controller, Issued, Settled};
use crate::debounce::Debouncer;
use crate::scroll::ScrollPosition;
use crate::view::FeedView;

/// A user action or UI event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Search box input; debounced by [`Pipeline::run`].
    SetSearch(String),
    ToggleCategory(String),
    SetPriceRange { min: Decimal, max: Decimal },
    /// Restore default filters, dropping URL pins.
    Reset,
    Scroll(ScrollPosition),
    /// Explicit "load more", independent of scroll position.
    LoadMore,
    GoTo(u32),
    Retry,
    LocaleChanged(String),
    /// Stop reading commands and wait for in-flight fetches.
    Shutdown,
}

/// Tunables of the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedSettings {
    pub page_size: u32,
    pub search_debounce: Duration,
    pub scroll_threshold_px: u32,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            page_size: dealsdb_core::DEFAULT_PAGE_SIZE,
            search_debounce: Duration::from_millis(300),
            scroll_threshold_px: 300,
        }
    }
}

impl FeedSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            page_size: config.page_size,
            search_debounce: Duration::from_millis(config.search_debounce_ms),
            scroll_threshold_px: config.scroll_threshold_px,
        }
    }
}

/// What applying a command asks the driver to do next.
enum Step {
    Fetch(Issued),
    Debounced,
    Stop,
    Nothing,
}

pub struct Pipeline<S, V> {
    source: Arc<S>,
    view: V,
    controller: Controller,
    translations: Translations,
    settings: FeedSettings,
    search: Debouncer<String>,
}

impl<S, V> Pipeline<S, V>
where
    S: ResultSource,
    V: FeedView,
{
    #[must_use]
    pub fn new(
        source: S,
        mut view: V,
        filters: FilterState,
        translations: Translations,
        locale: &str,
        settings: FeedSettings,
    ) -> Self {
        let catalog = translations.catalog(locale);
        view.set_catalog(&catalog);
        Self {
            source: Arc::new(source),
            view,
            controller: Controller::new(filters, settings.page_size, catalog),
            translations,
            settings,
            search: Debouncer::new(settings.search_debounce),
        }
    }

    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    #[must_use]
    pub fn view(&self) -> &V {
        &self.view
    }

    #[must_use]
    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn into_view(self) -> V {
        self.view
    }

    /// Loads page 1 of the current filters if it is not shown yet.
    pub async fn start(&mut self) -> Option<Settled> {
        let issued = self.controller.refresh(&mut self.view)?;
        Some(self.fetch_and_settle(issued).await)
    }

    /// Applies one command and awaits the fetch it triggers, if any.
    ///
    /// Search input is committed immediately; there is no debouncing here.
    pub async fn dispatch(&mut self, command: Command) -> Option<Settled> {
        let command = match command {
            Command::SetSearch(term) => {
                self.controller.filters_mut().set_search_term(&term);
                return self.refresh().await;
            }
            other => other,
        };
        match self.apply(command, Instant::now()) {
            Step::Fetch(issued) => Some(self.fetch_and_settle(issued).await),
            Step::Debounced | Step::Stop | Step::Nothing => None,
        }
    }

    async fn refresh(&mut self) -> Option<Settled> {
        let issued = self.controller.refresh(&mut self.view)?;
        Some(self.fetch_and_settle(issued).await)
    }

    async fn fetch_and_settle(&mut self, issued: Issued) -> Settled {
        let (seq, outcome) = fetch(Arc::clone(&self.source), issued.request).await;
        self.controller.settle(seq, outcome, &mut self.view)
    }

    /// Drives the feed from `commands` until [`Command::Shutdown`] or until
    /// every sender is dropped, then waits for in-flight fetches to settle.
    ///
    /// Fetches run concurrently on the calling task; results of superseded
    /// requests are dropped by the controller. A pending debounced search is
    /// discarded on shutdown.
    pub async fn run(&mut self, mut commands: mpsc::Receiver<Command>) {
        let mut in_flight = FuturesUnordered::new();
        let mut accepting = true;

        if let Some(issued) = self.controller.refresh(&mut self.view) {
            in_flight.push(fetch(Arc::clone(&self.source), issued.request));
        }

        loop {
            let deadline = self.search.deadline();
            tokio::select! {
                command = commands.recv(), if accepting => {
                    let step = match command {
                        Some(command) => self.apply(command, Instant::now()),
                        None => Step::Stop,
                    };
                    match step {
                        Step::Fetch(issued) => {
                            in_flight.push(fetch(Arc::clone(&self.source), issued.request));
                        }
                        Step::Stop => {
                            accepting = false;
                            self.search.clear();
                            tracing::debug!(pending = in_flight.len(), "feed shutting down");
                        }
                        Step::Debounced | Step::Nothing => {}
                    }
                }
                Some((seq, outcome)) = in_flight.next(), if !in_flight.is_empty() => {
                    self.controller.settle(seq, outcome, &mut self.view);
                }
                () = sleep_until_deadline(deadline), if deadline.is_some() => {
                    if let Some(term) = self.search.take_due(Instant::now()) {
                        self.controller.filters_mut().set_search_term(&term);
                        if let Some(issued) = self.controller.refresh(&mut self.view) {
                            in_flight.push(fetch(Arc::clone(&self.source), issued.request));
                        }
                    }
                }
                else => break,
            }
        }
    }

    fn apply(&mut self, command: Command, now: Instant) -> Step {
        let view = &mut self.view;
        let issued = match command {
            Command::SetSearch(term) => {
                self.search.push(term, now);
                return Step::Debounced;
            }
            Command::ToggleCategory(name) => {
                self.controller.filters_mut().toggle_category(&name);
                self.controller.refresh(view)
            }
            Command::SetPriceRange { min, max } => {
                self.controller.filters_mut().set_price_range(min, max);
                self.controller.refresh(view)
            }
            Command::Reset => {
                self.search.clear();
                self.controller.filters_mut().reset();
                self.controller.refresh(view)
            }
            Command::Scroll(position) => {
                self.controller
                    .on_scroll(position, self.settings.scroll_threshold_px, view)
            }
            Command::LoadMore => self.controller.load_more(view),
            Command::GoTo(page) => Some(self.controller.go_to(page, view)),
            Command::Retry => self.controller.retry(view),
            Command::LocaleChanged(locale) => {
                let catalog = self.translations.catalog(&locale);
                self.controller.set_catalog(catalog, view);
                None
            }
            Command::Shutdown => return Step::Stop,
        };
        issued.map_or(Step::Nothing, Step::Fetch)
    }
}

fn fetch<S: ResultSource>(
    source: Arc<S>,
    request: PageRequest,
) -> impl Future<Output = (u64, Result<PageResult, S::Error>)> {
    async move {
        let outcome = source.fetch_page(&request).await;
        (request.seq, outcome)
    }
}

async fn sleep_until_deadline(deadline: Option<Instant>) {
    if let Some(deadline) = deadline {
        tokio::time::sleep_until(deadline).await;
    }
}
