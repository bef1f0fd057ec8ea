//! feed-relay - Norwegian product feed generator
//!
//! Fetches a Google Merchant RSS feed, keeps the items whose category
//! mentions a keyword, converts prices to NOK, attaches shipping terms,
//! writes the result atomically and optionally pushes it with git.

pub mod commands;
pub mod config;
pub mod error;
pub mod feed;
pub mod filters;
pub mod format;
pub mod publish;
pub mod transform;
pub mod writer;

pub use config::Config;
pub use error::FeedError;
pub use feed::{OutputFeed, OutputItem, RunSummary, ShippingBlock, SourceFeed, SourceItem};
