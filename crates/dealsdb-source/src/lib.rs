pub mod client;
pub mod content_range;
pub mod error;
pub mod postgrest;
pub(crate) mod rate_limit;

pub use client::{RestSource, RestSourceConfig};
pub use content_range::parse_total_count;
pub use error::SourceError;
