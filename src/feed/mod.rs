//! Source feed retrieval, parsing and data models.

pub mod client;
pub mod models;
pub mod names;
pub mod parser;

pub use client::{FeedClient, FeedSource, FileSource};
pub use models::{
    ChannelMeta, IncludedProduct, OutputFeed, OutputItem, PublishStatus, RunSummary,
    ShippingBlock, SourceFeed, SourceItem,
};
pub use parser::parse_feed;
