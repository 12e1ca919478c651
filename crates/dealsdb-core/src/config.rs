use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can drive it with a
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    use rust_decimal::Decimal;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let source_url = require("DEALSDB_SOURCE_URL")?;
    if !(source_url.starts_with("http://") || source_url.starts_with("https://")) {
        return Err(invalid(
            "DEALSDB_SOURCE_URL",
            format!("expected an http(s) URL, got \"{source_url}\""),
        ));
    }
    let source_api_key = lookup("DEALSDB_SOURCE_API_KEY").ok();

    let log_level = or_default("DEALSDB_LOG_LEVEL", "info");
    let locale = or_default("DEALSDB_LOCALE", "en");
    let translations_path = PathBuf::from(or_default(
        "DEALSDB_TRANSLATIONS_PATH",
        "./config/translations.yaml",
    ));

    let page_size = parse_u32("DEALSDB_PAGE_SIZE", "10")?;
    if page_size == 0 {
        return Err(invalid("DEALSDB_PAGE_SIZE", "must be at least 1".to_string()));
    }

    let raw_ceiling = or_default("DEALSDB_PRICE_CEILING", "3000");
    let price_ceiling = raw_ceiling
        .parse::<Decimal>()
        .map_err(|e| invalid("DEALSDB_PRICE_CEILING", e.to_string()))?;
    if price_ceiling.is_sign_negative() {
        return Err(invalid(
            "DEALSDB_PRICE_CEILING",
            "must not be negative".to_string(),
        ));
    }

    let search_debounce_ms = parse_u64("DEALSDB_SEARCH_DEBOUNCE_MS", "300")?;
    let scroll_threshold_px = parse_u32("DEALSDB_SCROLL_THRESHOLD_PX", "300")?;
    let request_timeout_secs = parse_u64("DEALSDB_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("DEALSDB_USER_AGENT", "dealsdb/0.1 (deals-feed)");
    let max_retries = parse_u32("DEALSDB_MAX_RETRIES", "2")?;
    let retry_backoff_base_secs = parse_u64("DEALSDB_RETRY_BACKOFF_BASE_SECS", "1")?;

    Ok(AppConfig {
        source_url,
        source_api_key,
        log_level,
        locale,
        translations_path,
        page_size,
        price_ceiling,
        search_debounce_ms,
        scroll_threshold_px,
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_secs,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
