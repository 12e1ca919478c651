//! HTTP result source for the hosted PostgREST backend.

mod stores;

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use dealsdb_core::{AppConfig, Deal, PageRequest, PageResult, Predicate, ResultSource, StoreKey};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::content_range::parse_total_count;
use crate::error::SourceError;
use crate::postgrest::render_conjunction;
use crate::rate_limit::retry_with_backoff;

/// Columns requested for listing cards.
pub(crate) const PRODUCT_COLUMNS: &str = "hash_id,title,price,sale_price,image,brand,link,\
affiliate_link,currency,description,description_english,store_id,ai_category";

const PRODUCTS_TABLE: &str = "cleaned_products";

/// Connection settings for [`RestSource`].
#[derive(Clone)]
pub struct RestSourceConfig {
    /// Backend origin; the REST API lives under `<base_url>/rest/v1`.
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Additional attempts after the first failure for 429 and transport errors.
    pub max_retries: u32,
    pub backoff_base_secs: u64,
}

impl RestSourceConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            base_url: config.source_url.clone(),
            api_key: config.source_api_key.clone(),
            timeout_secs: config.request_timeout_secs,
            user_agent: config.user_agent.clone(),
            max_retries: config.max_retries,
            backoff_base_secs: config.retry_backoff_base_secs,
        }
    }
}

impl std::fmt::Debug for RestSourceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestSourceConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .field("timeout_secs", &self.timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_retries", &self.max_retries)
            .field("backoff_base_secs", &self.backoff_base_secs)
            .finish()
    }
}

/// Rows of one response plus the exact count the backend reported.
pub(crate) struct Rows<T> {
    pub(crate) rows: Vec<T>,
    pub(crate) total: Option<u64>,
}

/// Result source backed by the deals REST API.
///
/// Only published deals with an image and a store are listed, newest first.
/// Store display names are looked up per page and cached for the lifetime of
/// the source.
pub struct RestSource {
    client: Client,
    rest_base: Url,
    api_key: Option<String>,
    max_retries: u32,
    backoff_base_secs: u64,
    /// Store id → display name; `None` records a store without a name.
    store_names: Mutex<HashMap<Uuid, Option<String>>>,
}

impl RestSource {
    /// Creates a source with the configured timeout, `User-Agent` and retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::InvalidBaseUrl`] if `base_url` is not an
    /// absolute http(s) URL, or [`SourceError::Http`] if the underlying
    /// `reqwest::Client` cannot be constructed.
    pub fn new(config: RestSourceConfig) -> Result<Self, SourceError> {
        let rest_base = Self::rest_base(&config.base_url)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(&config.user_agent)
            .build()?;
        Ok(Self {
            client,
            rest_base,
            api_key: config.api_key,
            max_retries: config.max_retries,
            backoff_base_secs: config.backoff_base_secs,
            store_names: Mutex::new(HashMap::new()),
        })
    }

    fn rest_base(base_url: &str) -> Result<Url, SourceError> {
        let invalid = |reason: String| SourceError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason,
        };
        let url = Url::parse(&format!("{}/rest/v1/", base_url.trim_end_matches('/')))
            .map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme \"{}\"", url.scheme())));
        }
        Ok(url)
    }

    /// Resolves `table` against the REST base.
    pub(crate) fn table_url(&self, table: &str) -> Result<Url, SourceError> {
        self.rest_base
            .join(table)
            .map_err(|e| SourceError::InvalidBaseUrl {
                base_url: self.rest_base.to_string(),
                reason: e.to_string(),
            })
    }

    /// Builds the listing URL for one page window.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::InvalidQuery`] if the predicates still contain
    /// an unresolved store name.
    pub(crate) fn products_url(
        &self,
        predicates: &[Predicate],
        offset: u64,
        limit: u32,
    ) -> Result<Url, SourceError> {
        let mut url = self.table_url(PRODUCTS_TABLE)?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("select", PRODUCT_COLUMNS)
                .append_pair("status", "eq.published")
                .append_pair("image", "not.is.null")
                .append_pair("store_id", "not.is.null")
                .append_pair("order", "updated_at.desc.nullslast")
                .append_pair("offset", &offset.to_string())
                .append_pair("limit", &limit.to_string());
            if let Some(tree) = render_conjunction(predicates)? {
                query.append_pair("and", &tree);
            }
        }
        Ok(url)
    }

    /// Issues a GET with the API headers, retrying transient failures.
    ///
    /// HTTP 416 (offset past the end) is an empty result, not an error.
    pub(crate) async fn get_rows<T>(&self, url: Url, context: &str) -> Result<Rows<T>, SourceError>
    where
        T: DeserializeOwned,
    {
        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.clone();
            async move {
                tracing::debug!(%url, "source request");
                let mut request = self
                    .client
                    .get(url.clone())
                    .header(reqwest::header::ACCEPT, "application/json")
                    .header("Prefer", "count=exact");
                if let Some(key) = &self.api_key {
                    request = request.header("apikey", key).bearer_auth(key);
                }

                let response = request.send().await?;
                let status = response.status();
                let total = parse_total_count(
                    response
                        .headers()
                        .get(reqwest::header::CONTENT_RANGE)
                        .and_then(|v| v.to_str().ok()),
                );

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.trim().parse::<u64>().ok())
                        .unwrap_or(0);
                    return Err(SourceError::RateLimited {
                        host: url.host_str().unwrap_or_default().to_owned(),
                        retry_after_secs,
                    });
                }

                if status == reqwest::StatusCode::RANGE_NOT_SATISFIABLE {
                    return Ok(Rows {
                        rows: Vec::new(),
                        total,
                    });
                }

                if !status.is_success() {
                    return Err(SourceError::UnexpectedStatus {
                        status: status.as_u16(),
                        url: url.to_string(),
                    });
                }

                let body = response.text().await?;
                let rows = serde_json::from_str::<Vec<T>>(&body).map_err(|e| {
                    SourceError::Deserialize {
                        context: context.to_owned(),
                        source: e,
                    }
                })?;
                Ok(Rows { rows, total })
            }
        })
        .await
    }

    /// Replaces a store-name pin with the id it resolves to.
    ///
    /// Returns `Ok(None)` when the name matches no store.
    async fn resolve_predicates(
        &self,
        predicates: &[Predicate],
    ) -> Result<Option<Vec<Predicate>>, SourceError> {
        let mut resolved = Vec::with_capacity(predicates.len());
        for predicate in predicates {
            match predicate {
                Predicate::Store(StoreKey::Name(name)) => match self.resolve_store_id(name).await? {
                    Some(id) => resolved.push(Predicate::Store(StoreKey::Id(id))),
                    None => {
                        tracing::warn!(store = %name, "pinned store not found, listing is empty");
                        return Ok(None);
                    }
                },
                other => resolved.push(other.clone()),
            }
        }
        Ok(Some(resolved))
    }

    async fn fetch_listing(&self, request: &PageRequest) -> Result<PageResult, SourceError> {
        let Some(predicates) = self.resolve_predicates(&request.predicates).await? else {
            return Ok(PageResult::default());
        };

        let url = self.products_url(&predicates, request.offset(), request.page_size)?;
        let Rows { mut rows, total } = self
            .get_rows::<Deal>(url, &format!("listing page {}", request.page_index))
            .await?;

        let seen = request.offset() + u64::try_from(rows.len()).unwrap_or(u64::MAX);
        let total_count = total.unwrap_or(seen);

        self.enrich_store_names(&mut rows).await;

        tracing::debug!(
            seq = request.seq,
            page = request.page_index,
            items = rows.len(),
            total_count,
            "listing page fetched"
        );
        Ok(PageResult::new(rows, total_count))
    }
}

impl ResultSource for RestSource {
    type Error = SourceError;

    async fn fetch_page(&self, request: &PageRequest) -> Result<PageResult, SourceError> {
        self.fetch_listing(request).await
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
