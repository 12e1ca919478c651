pub mod app_config;
pub mod config;
pub mod deals;
pub mod error;
pub mod filters;
pub mod i18n;
pub mod query;
pub mod source;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use deals::{Deal, PageResult};
pub use error::ConfigError;
pub use filters::{FilterState, StoreKey, UrlContext, DEFAULT_PRICE_CEILING};
pub use i18n::{load_translations, Catalog, Translations};
pub use query::{build, Field, PageRequest, Predicate, DEFAULT_PAGE_SIZE};
pub use source::{MemorySource, ResultSource};
