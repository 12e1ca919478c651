//! Incremental result feed for the deals listing.
//!
//! The [`Controller`] owns paging state and decides what to fetch; the
//! [`Pipeline`] drives it from a command queue against a
//! [`ResultSource`](dealsdb_core::ResultSource) and a [`FeedView`].

pub mod controller;
pub mod debounce;
pub mod meta;
pub mod pipeline;
pub mod render;
pub mod scroll;
pub mod view;

pub use controller::{Controller, Issued, Settled};
pub use debounce::Debouncer;
pub use meta::{summarize, summarize_with};
pub use pipeline::{Command, FeedSettings, Pipeline};
pub use render::{format_price, DealCard, PriceTag, RenderMode};
pub use scroll::{Phase, ScrollPosition, ScrollState};
pub use view::{CardGrid, FeedView};
