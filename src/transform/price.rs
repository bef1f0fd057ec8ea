//! Currency conversion and shipping price rules.

use crate::config::Config;
use regex_lite::Regex;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;
use std::sync::LazyLock;

/// First numeric-looking token in a price string.
static AMOUNT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[-+]?[0-9.,]+").unwrap());

/// Output currency suffix.
pub const CURRENCY: &str = "NOK";

/// Parses the leading numeric token of a price such as `"499,00 SEK"`.
///
/// Commas are read as decimal points. Returns `None` when no token is found
/// or it is not a valid decimal (e.g. `"1,234.50"`).
pub fn parse_amount(text: &str) -> Option<Decimal> {
    let token = AMOUNT.find(text)?.as_str().replace(',', ".");
    Decimal::from_str(&token).ok()
}

/// Rounds to 2 decimals, half away from zero.
pub fn round_half_up(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats an amount as `"<amount> NOK"` with exactly two decimals.
pub fn format_nok(amount: Decimal) -> String {
    format!("{:.2} {}", amount, CURRENCY)
}

/// Price conversion and free-shipping rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pricing {
    /// Multiplier from source currency to NOK
    conversion_rate: Decimal,
    /// Standard shipping price in source currency
    standard_shipping: Decimal,
    /// NOK amount at or above which shipping is free
    free_shipping_threshold: Decimal,
}

impl Pricing {
    /// Creates pricing rules.
    pub fn new(
        conversion_rate: Decimal,
        standard_shipping: Decimal,
        free_shipping_threshold: Decimal,
    ) -> Self {
        Self { conversion_rate, standard_shipping, free_shipping_threshold }
    }

    /// Creates pricing rules from the configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.conversion_rate, config.standard_shipping, config.free_shipping_threshold)
    }

    /// Converts a source amount to NOK, rounded to 2 decimals.
    ///
    /// Returns `None` if the product overflows.
    pub fn convert(&self, amount: Decimal) -> Option<Decimal> {
        amount.checked_mul(self.conversion_rate).map(round_half_up)
    }

    /// Standard shipping in NOK.
    ///
    /// Also used as the item price when the source price is missing or unparseable.
    pub fn standard_shipping_nok(&self) -> Decimal {
        self.convert(self.standard_shipping).unwrap_or(self.standard_shipping)
    }

    /// Converts a raw source price. Returns `None` if it cannot be parsed or overflows.
    pub fn try_price_nok(&self, raw: &str) -> Option<Decimal> {
        parse_amount(raw).and_then(|amount| self.convert(amount))
    }

    /// Converts a raw source price, falling back to standard shipping in NOK.
    pub fn price_nok(&self, raw: Option<&str>) -> Decimal {
        raw.and_then(|raw| self.try_price_nok(raw)).unwrap_or_else(|| self.standard_shipping_nok())
    }

    /// Shipping price in NOK for an item with the given converted price.
    pub fn shipping_for(&self, price_nok: Decimal) -> Decimal {
        if price_nok >= self.free_shipping_threshold {
            Decimal::ZERO
        } else {
            self.standard_shipping_nok()
        }
    }
}

impl Default for Pricing {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
