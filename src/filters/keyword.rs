//! Keyword filtering on an item's category fields.

use super::Filter;
use crate::feed::SourceItem;

/// Keeps items whose `product_type` + `google_product_category` contain a keyword.
pub struct CategoryFilter {
    /// Lowercased keyword
    keyword: String,
}

impl CategoryFilter {
    /// Creates a filter that requires `keyword`, matched case-insensitively.
    pub fn new(keyword: impl Into<String>) -> Self {
        Self { keyword: keyword.into().to_lowercase() }
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }
}

impl Filter for CategoryFilter {
    fn matches(&self, item: &SourceItem) -> bool {
        item.category_text().contains(self.keyword.as_str())
    }

    fn description(&self) -> String {
        format!("Category contains: {}", self.keyword)
    }
}
