use std::path::PathBuf;

use rust_decimal::Decimal;

#[derive(Clone)]
pub struct AppConfig {
    /// Base URL of the hosted backend, e.g. `https://xyz.supabase.co`.
    pub source_url: String,
    /// Public (anon) API key sent as `apikey` and bearer token.
    pub source_api_key: Option<String>,
    pub log_level: String,
    pub locale: String,
    pub translations_path: PathBuf,
    pub page_size: u32,
    pub price_ceiling: Decimal,
    pub search_debounce_ms: u64,
    pub scroll_threshold_px: u32,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub retry_backoff_base_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("source_url", &self.source_url)
            .field(
                "source_api_key",
                &self.source_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("log_level", &self.log_level)
            .field("locale", &self.locale)
            .field("translations_path", &self.translations_path)
            .field("page_size", &self.page_size)
            .field("price_ceiling", &self.price_ceiling)
            .field("search_debounce_ms", &self.search_debounce_ms)
            .field("scroll_threshold_px", &self.scroll_threshold_px)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_secs", &self.retry_backoff_base_secs)
            .finish()
    }
}
