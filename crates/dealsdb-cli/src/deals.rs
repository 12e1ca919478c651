//! One-shot listing: apply filters, print the requested pages, exit.

use clap::Args;
use dealsdb_core::{AppConfig, FilterState, Translations, UrlContext};
use dealsdb_feed::{Command, FeedSettings, Phase, Pipeline, Settled};
use dealsdb_source::RestSource;
use rust_decimal::Decimal;

use crate::terminal::TerminalView;

#[derive(Debug, Args)]
pub struct DealsArgs {
    /// Search text matched against title, description and category
    #[arg(long)]
    search: Option<String>,
    /// Category to include (repeatable)
    #[arg(long = "category")]
    categories: Vec<String>,
    #[arg(long)]
    min_price: Option<Decimal>,
    #[arg(long)]
    max_price: Option<Decimal>,
    /// Listing URL query string, e.g. "?category=Gaming&store=Acme"
    #[arg(long)]
    url: Option<String>,
    /// Number of pages to load
    #[arg(long, default_value = "1")]
    pages: u32,
    /// Display language (defaults to DEALSDB_LOCALE)
    #[arg(long)]
    locale: Option<String>,
}

/// Builds the filters for a one-shot listing.
///
/// URL pins come first; `--category` adds to the selection without toggling
/// a pinned category off.
pub(crate) fn filters_from_args(args: &DealsArgs, price_ceiling: Decimal) -> FilterState {
    let ctx = args
        .url
        .as_deref()
        .map(UrlContext::from_query)
        .unwrap_or_default();
    let mut filters = FilterState::from_url(&ctx, price_ceiling);

    if let Some(search) = &args.search {
        filters.set_search_term(search);
    }
    for category in &args.categories {
        if !filters.is_category_selected(category.trim()) {
            filters.toggle_category(category);
        }
    }
    if args.min_price.is_some() || args.max_price.is_some() {
        filters.set_price_range(
            args.min_price.unwrap_or(filters.min_price()),
            args.max_price.unwrap_or(filters.max_price()),
        );
    }
    filters
}

/// Prints up to `--pages` pages of the listing.
///
/// # Errors
///
/// Returns an error if a page cannot be fetched.
pub(crate) async fn run_deals(
    source: RestSource,
    config: &AppConfig,
    translations: Translations,
    args: DealsArgs,
) -> anyhow::Result<()> {
    let filters = filters_from_args(&args, config.price_ceiling);
    let locale = args.locale.as_deref().unwrap_or(&config.locale);
    let mut pipeline = Pipeline::new(
        source,
        TerminalView::new(),
        filters,
        translations,
        locale,
        FeedSettings::from_app_config(config),
    );

    let mut settled = pipeline.start().await;
    for _ in 1..args.pages {
        if !matches!(settled, Some(Settled::Rendered)) {
            break;
        }
        settled = pipeline.dispatch(Command::LoadMore).await;
    }

    if pipeline.controller().phase() == Phase::Error {
        anyhow::bail!("failed to load the deals listing");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use dealsdb_core::DEFAULT_PRICE_CEILING;

    use super::*;

    #[derive(Debug, Parser)]
    struct TestCli {
        #[command(flatten)]
        args: DealsArgs,
    }

    fn parse(argv: &[&str]) -> DealsArgs {
        TestCli::parse_from(std::iter::once("deals").chain(argv.iter().copied())).args
    }

    #[test]
    fn category_flag_does_not_unpin_url_category() {
        let args = parse(&[
            "--url",
            "?category=Gaming",
            "--category",
            "Gaming",
            "--category",
            "Fashion",
        ]);
        let filters = filters_from_args(&args, DEFAULT_PRICE_CEILING);
        assert_eq!(filters.pinned_category(), Some("Gaming"));
        assert_eq!(
            filters.selected_categories().collect::<Vec<_>>(),
            vec!["Fashion", "Gaming"]
        );
    }

    #[test]
    fn price_flags_keep_the_other_bound() {
        let args = parse(&["--min-price", "25.5"]);
        let filters = filters_from_args(&args, DEFAULT_PRICE_CEILING);
        assert_eq!(filters.min_price(), "25.5".parse::<Decimal>().unwrap());
        assert_eq!(filters.max_price(), DEFAULT_PRICE_CEILING);
    }

    #[test]
    fn search_flag_overrides_url_search() {
        let args = parse(&["--url", "search=tv", "--search", "laptop"]);
        let filters = filters_from_args(&args, DEFAULT_PRICE_CEILING);
        assert_eq!(filters.search_term(), "laptop");
        assert_eq!(args.pages, 1);
    }
}
