//! Interactive listing: stdin lines become feed commands.

use clap::Args;
use dealsdb_core::{AppConfig, FilterState, Translations, UrlContext};
use dealsdb_feed::{Command, FeedSettings, Pipeline, ScrollPosition};
use dealsdb_source::RestSource;
use rust_decimal::Decimal;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::terminal::TerminalView;

#[derive(Debug, Args)]
pub struct BrowseArgs {
    /// Listing URL query string the session starts from
    #[arg(long)]
    url: Option<String>,
    /// Display language (defaults to DEALSDB_LOCALE)
    #[arg(long)]
    locale: Option<String>,
}

const HELP: &str = "commands: search <text> | cat <name> | price <min> <max> | reset | more | \
scroll <offset> <viewport> <height> | page <n> | retry | lang <code> | quit";

/// Parses one input line. Blank lines yield `Ok(None)`.
pub(crate) fn parse_line(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    let decimal = |raw: &str| {
        raw.parse::<Decimal>()
            .map_err(|e| format!("invalid price \"{raw}\": {e}"))
    };
    let number = |raw: &str| {
        raw.parse::<u32>()
            .map_err(|e| format!("invalid number \"{raw}\": {e}"))
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "search" => Command::SetSearch(rest.to_string()),
        "cat" if !rest.is_empty() => Command::ToggleCategory(rest.to_string()),
        "price" => {
            let Some((min, max)) = rest.split_once(char::is_whitespace) else {
                return Err("usage: price <min> <max>".to_string());
            };
            Command::SetPriceRange {
                min: decimal(min.trim())?,
                max: decimal(max.trim())?,
            }
        }
        "reset" => Command::Reset,
        "more" => Command::LoadMore,
        "scroll" => {
            let values: Vec<&str> = rest.split_whitespace().collect();
            let [offset, viewport, content_height] = values.as_slice() else {
                return Err("usage: scroll <offset> <viewport> <height>".to_string());
            };
            Command::Scroll(ScrollPosition {
                offset: number(*offset)?,
                viewport: number(*viewport)?,
                content_height: number(*content_height)?,
            })
        }
        "page" => Command::GoTo(number(rest)?),
        "retry" => Command::Retry,
        "lang" if !rest.is_empty() => Command::LocaleChanged(rest.to_string()),
        "quit" | "exit" => Command::Shutdown,
        _ => return Err(HELP.to_string()),
    };
    Ok(Some(command))
}

/// Runs the interactive session until `quit` or end of input.
///
/// # Errors
///
/// Returns an error if reading stdin fails.
pub(crate) async fn run_browse(
    source: RestSource,
    config: &AppConfig,
    translations: Translations,
    args: BrowseArgs,
) -> anyhow::Result<()> {
    let ctx = args
        .url
        .as_deref()
        .map(UrlContext::from_query)
        .unwrap_or_default();
    let filters = FilterState::from_url(&ctx, config.price_ceiling);
    let locale = args.locale.as_deref().unwrap_or(&config.locale);
    let mut pipeline = Pipeline::new(
        source,
        TerminalView::new(),
        filters,
        translations,
        locale,
        FeedSettings::from_app_config(config),
    );

    let (tx, rx) = mpsc::channel(32);
    eprintln!("{HELP}");
    let reader = tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            match parse_line(&line) {
                Ok(Some(command)) => {
                    let stop = command == Command::Shutdown;
                    if tx.send(command).await.is_err() || stop {
                        break;
                    }
                }
                Ok(None) => {}
                Err(message) => eprintln!("{message}"),
            }
        }
        Ok::<(), std::io::Error>(())
    });

    pipeline.run(rx).await;
    reader.abort();
    match reader.await {
        Ok(result) => result?,
        Err(e) if e.is_cancelled() => {}
        Err(e) => return Err(e.into()),
    }
    Ok(())
}
