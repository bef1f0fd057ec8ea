//! Element names and namespaces used when reading and writing feeds.
//!
//! Merchant feeds mix bare RSS elements with `g:`-prefixed Google Merchant
//! elements. Update this file when the source feed changes its layout.

/// Google Merchant namespace URI.
pub const GOOGLE_NS: &str = "http://base.google.com/ns/1.0";

/// Prefix bound to [`GOOGLE_NS`] in the output document.
pub const GOOGLE_PREFIX: &str = "g";

/// Marker that must appear in a fetched body for it to count as a feed.
pub const ITEM_MARKER: &str = "<item";

/// Structural elements of an RSS 2.0 document.
pub mod rss {
    pub const ROOT: &str = "rss";
    pub const CHANNEL: &str = "channel";
    pub const ITEM: &str = "item";
    pub const VERSION: &str = "2.0";
}

/// Per-item product fields.
pub mod product {
    pub const ID: &str = "id";
    pub const TITLE: &str = "title";
    pub const DESCRIPTION: &str = "description";
    pub const LINK: &str = "link";
    pub const IMAGE_LINK: &str = "image_link";
    pub const AVAILABILITY: &str = "availability";
    pub const PRODUCT_TYPE: &str = "product_type";
    pub const GOOGLE_PRODUCT_CATEGORY: &str = "google_product_category";
    pub const PRICE: &str = "price";
}

/// Children of `<g:shipping>`.
pub mod shipping {
    pub const BLOCK: &str = "shipping";
    pub const COUNTRY: &str = "country";
    pub const SERVICE: &str = "service";
    pub const PRICE: &str = "price";
    pub const MIN_HANDLING_TIME: &str = "min_handling_time";
    pub const MAX_HANDLING_TIME: &str = "max_handling_time";
    pub const MIN_TRANSIT_TIME: &str = "min_transit_time";
    pub const MAX_TRANSIT_TIME: &str = "max_transit_time";
}
