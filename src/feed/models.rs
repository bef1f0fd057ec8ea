//! Data models for source feeds, transformed items and run summaries.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Text used for any output field missing from the source item.
pub const MISSING_FIELD: &str = "N/A";

/// A product item as read from the source feed. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceItem {
    pub id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub image_link: Option<String>,
    pub availability: Option<String>,
    pub product_type: Option<String>,
    pub google_product_category: Option<String>,
    /// Raw price text, e.g. `"499.00 SEK"`
    pub price: Option<String>,
}

impl SourceItem {
    /// Returns the category text used for keyword filtering:
    /// `product_type` and `google_product_category` joined by a space, lowercased.
    pub fn category_text(&self) -> String {
        let product_type = self.product_type.as_deref().unwrap_or_default();
        let category = self.google_product_category.as_deref().unwrap_or_default();
        format!("{} {}", product_type, category).trim().to_lowercase()
    }

    /// Returns the item id, or `"unknown"` when the feed has none.
    pub fn display_id(&self) -> &str {
        self.id.as_deref().unwrap_or("unknown")
    }
}

/// Channel-level metadata copied into the output feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelMeta {
    pub title: Option<String>,
    pub link: Option<String>,
    pub description: Option<String>,
}

impl ChannelMeta {
    /// Returns `(element name, text)` pairs for the fields that are present, in feed order.
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        [("title", &self.title), ("link", &self.link), ("description", &self.description)]
            .into_iter()
            .filter_map(|(name, value)| value.as_deref().map(|v| (name, v)))
            .collect()
    }
}

/// A parsed source feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFeed {
    pub channel: ChannelMeta,
    pub items: Vec<SourceItem>,
}

impl SourceFeed {
    /// Returns number of items.
    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the channel holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Delivery terms attached to every output item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingBlock {
    pub country: String,
    pub service: String,
    /// Shipping price in NOK
    pub price: Decimal,
    pub min_handling_time: u32,
    pub max_handling_time: u32,
    pub min_transit_time: u32,
    pub max_transit_time: u32,
}

impl ShippingBlock {
    /// Creates a Norwegian standard-service block with the given price.
    pub fn norway(price: Decimal) -> Self {
        Self {
            country: "NO".to_string(),
            service: "Standard".to_string(),
            price,
            min_handling_time: 0,
            max_handling_time: 1,
            min_transit_time: 1,
            max_transit_time: 9,
        }
    }
}

/// A product item rewritten for the Norwegian output feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputItem {
    pub id: String,
    pub title: String,
    pub description: String,
    pub link: String,
    pub image_link: String,
    pub availability: String,
    pub product_type: String,
    pub google_product_category: String,
    /// Converted price in NOK
    pub price: Decimal,
    pub shipping: ShippingBlock,
}

/// The transformed feed, ready for serialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputFeed {
    pub channel: ChannelMeta,
    pub items: Vec<OutputItem>,
}

/// Outcome of the optional git publish step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishStatus {
    /// Publishing was not requested
    #[default]
    Skipped,
    /// The file was committed and pushed
    Pushed,
    /// The file was identical to the committed version and the remote is up to date
    Unchanged,
    /// All attempts failed; the run still succeeded
    Failed,
}

impl std::fmt::Display for PublishStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PublishStatus::Skipped => write!(f, "skipped"),
            PublishStatus::Pushed => write!(f, "pushed"),
            PublishStatus::Unchanged => write!(f, "unchanged"),
            PublishStatus::Failed => write!(f, "failed"),
        }
    }
}

/// A product that made it into the output feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncludedProduct {
    pub id: String,
    pub title: String,
}

/// What a pipeline run did.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Items in the source channel
    pub total_items: usize,
    /// Items written to the output feed
    pub included: Vec<IncludedProduct>,
    /// Where the output feed was written
    pub output_path: PathBuf,
    pub publish: PublishStatus,
}

impl RunSummary {
    /// Returns number of included items.
    pub fn included_count(&self) -> usize {
        self.included.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_item(product_type: Option<&str>, category: Option<&str>) -> SourceItem {
        SourceItem {
            id: Some("SKU-1".to_string()),
            product_type: product_type.map(String::from),
            google_product_category: category.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_category_text_joins_and_lowercases() {
        let item = make_item(Some("Lampor > NORSK"), Some("Home & Garden"));
        assert_eq!(item.category_text(), "lampor > norsk home & garden");
    }

    #[test]
    fn test_category_text_missing_fields() {
        assert_eq!(make_item(None, None).category_text(), "");
        assert_eq!(make_item(None, Some("Norsk")).category_text(), "norsk");
        assert_eq!(make_item(Some("Norsk"), None).category_text(), "norsk");
    }

    #[test]
    fn test_display_id() {
        assert_eq!(make_item(None, None).display_id(), "SKU-1");
        assert_eq!(SourceItem::default().display_id(), "unknown");
    }

    #[test]
    fn test_channel_entries_skip_missing() {
        let channel = ChannelMeta {
            title: Some("Lampster".to_string()),
            link: None,
            description: Some("Lamps".to_string()),
        };
        assert_eq!(channel.entries(), vec![("title", "Lampster"), ("description", "Lamps")]);
        assert!(ChannelMeta::default().entries().is_empty());
    }

    #[test]
    fn test_shipping_norway_constants() {
        let block = ShippingBlock::norway(Decimal::new(13241, 2));
        assert_eq!(block.country, "NO");
        assert_eq!(block.service, "Standard");
        assert_eq!(block.price.to_string(), "132.41");
        assert_eq!(
            (block.min_handling_time, block.max_handling_time),
            (0, 1)
        );
        assert_eq!((block.min_transit_time, block.max_transit_time), (1, 9));
    }

    #[test]
    fn test_publish_status_display_and_serde() {
        assert_eq!(PublishStatus::default(), PublishStatus::Skipped);
        assert_eq!(PublishStatus::Unchanged.to_string(), "unchanged");
        let json = serde_json::to_string(&PublishStatus::Pushed).unwrap();
        assert_eq!(json, "\"pushed\"");
    }

    #[test]
    fn test_source_feed_counts() {
        let mut feed = SourceFeed::default();
        assert!(feed.is_empty());
        feed.items.push(make_item(None, None));
        assert_eq!(feed.count(), 1);
    }
}
