//! Rewrites source items into the Norwegian output schema.

pub mod price;

use crate::config::Config;
use crate::feed::models::MISSING_FIELD;
use crate::feed::{OutputFeed, OutputItem, ShippingBlock, SourceFeed, SourceItem};
use crate::filters::{FilterChain, FilterChainBuilder};
use rust_decimal::Decimal;
use tracing::{debug, info, trace, warn};

pub use price::Pricing;

/// Applies the filter chain and pricing rules to a source feed.
pub struct Transformer {
    filters: FilterChain,
    pricing: Pricing,
}

impl Transformer {
    /// Creates a transformer.
    pub fn new(filters: FilterChain, pricing: Pricing) -> Self {
        Self { filters, pricing }
    }

    /// Creates a transformer from the configuration.
    pub fn from_config(config: &Config) -> Self {
        let filters = FilterChainBuilder::new().category_keyword(&config.keyword).build();

        Self::new(filters, Pricing::from_config(config))
    }

    /// Filters and rewrites every item, keeping channel metadata and item order.
    pub fn transform(&self, feed: &SourceFeed) -> OutputFeed {
        if !self.filters.is_empty() {
            debug!("Active filters: {}", self.filters.descriptions().join(", "));
        }

        let items: Vec<OutputItem> = feed
            .items
            .iter()
            .filter(|item| {
                let keep = self.filters.matches(item);
                if !keep {
                    trace!("Skipping {}", item.display_id());
                }
                keep
            })
            .map(|item| self.transform_item(item))
            .collect();

        info!("Included {} of {} items", items.len(), feed.count());

        OutputFeed { channel: feed.channel.clone(), items }
    }

    /// Rewrites a single item, converting its price and attaching shipping.
    pub fn transform_item(&self, item: &SourceItem) -> OutputItem {
        let or_missing =
            |value: &Option<String>| value.clone().unwrap_or_else(|| MISSING_FIELD.to_string());

        let price = self.item_price(item);
        let shipping = ShippingBlock::norway(self.pricing.shipping_for(price));

        OutputItem {
            id: or_missing(&item.id),
            title: or_missing(&item.title),
            description: or_missing(&item.description),
            link: or_missing(&item.link),
            image_link: or_missing(&item.image_link),
            availability: or_missing(&item.availability),
            product_type: or_missing(&item.product_type),
            google_product_category: or_missing(&item.google_product_category),
            price,
            shipping,
        }
    }

    /// Converts the item's price, logging when the standard shipping value is substituted.
    fn item_price(&self, item: &SourceItem) -> Decimal {
        let fallback = self.pricing.standard_shipping_nok();

        match item.price.as_deref() {
            Some(raw) => self.pricing.try_price_nok(raw).unwrap_or_else(|| {
                warn!("Unparseable price {:?} for {}, using {}", raw, item.display_id(), fallback);
                fallback
            }),
            None => {
                debug!("No price for {}, using {}", item.display_id(), fallback);
                fallback
            }
        }
    }
}
