//! Proration math for expected storefront prices
//!
//! The storefront bills the first month from the day of purchase to the end
//! of the month, inclusive. Every expected value is rounded per item to two
//! decimals before any summation, which is the order the store itself uses
//! when it renders a cart.

use chrono::{Datelike, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;
use tracing::debug;

use crate::error::{Error, Result};
use crate::types::{Catalog, Money};

const MONEY_DECIMAL_PLACES: u32 = 2;

/// Round to whole cents, midpoint away from zero
pub fn round_money(value: Decimal) -> Money {
    value.round_dp_with_strategy(MONEY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Number of days in the month containing `date`
pub fn days_in_month(date: NaiveDate) -> u32 {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };

    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first_of_next| first_of_next.pred_opt())
        .map(|last| last.day())
        // Only reachable at the edge of chrono's supported range, where the
        // month is December.
        .unwrap_or(31)
}

/// Price due for the rest of the month, counting `on` itself.
///
/// On the first of the month the full price is due. On the last day a
/// single day's price is due, never zero.
pub fn prorated_price(price: Money, on: NaiveDate) -> Money {
    let day = on.day();
    if day == 1 {
        return round_money(price);
    }

    let days = days_in_month(on);
    let daily_price = price / Decimal::from(days);
    let days_left = Decimal::from(days - day + 1);

    round_money(daily_price * days_left)
}

/// [`prorated_price`] for a price given as text, e.g. `"26.99"`
pub fn prorated_price_str(price: &str, on: NaiveDate) -> Result<Money> {
    let price = Decimal::from_str(price.trim())
        .map_err(|e| Error::InvalidPrice(format!("'{}': {}", price, e)))?;
    Ok(prorated_price(price, on))
}

/// Product plus every add-on, each prorated on its own when `prorated` is
/// set. The sum is not rounded again.
pub fn expected_subtotal(catalog: &Catalog, prorated: bool, on: NaiveDate) -> Money {
    let total: Money = catalog
        .entries()
        .map(|entry| {
            if prorated {
                prorated_price(entry.price, on)
            } else {
                entry.price
            }
        })
        .sum();

    debug!(prorated, %on, %total, "expected subtotal");
    total
}

/// Expected values for one catalog on one reference date
#[derive(Debug, Clone, Copy)]
pub struct PricingCalculator<'a> {
    catalog: &'a Catalog,
    reference_date: NaiveDate,
}

impl<'a> PricingCalculator<'a> {
    pub fn on(catalog: &'a Catalog, reference_date: NaiveDate) -> Self {
        Self {
            catalog,
            reference_date,
        }
    }

    pub fn reference_date(&self) -> NaiveDate {
        self.reference_date
    }

    pub fn prorated(&self, price: Money) -> Money {
        prorated_price(price, self.reference_date)
    }

    pub fn subtotal(&self, prorated: bool) -> Money {
        expected_subtotal(self.catalog, prorated, self.reference_date)
    }

    /// Prorated price of every entry, product first
    pub fn prorated_items(&self) -> Vec<Money> {
        self.catalog
            .entries()
            .map(|entry| self.prorated(entry.price))
            .collect()
    }

    /// Recurring price of every row: the product row carries the whole cart
    /// total, each add-on row its own price
    pub fn recurring_items(&self) -> Vec<Money> {
        std::iter::once(self.subtotal(false))
            .chain(self.catalog.addons.iter().map(|addon| addon.price))
            .collect()
    }

    /// Product name followed by the add-on names
    pub fn item_names(&self) -> Vec<&'a str> {
        self.catalog
            .entries()
            .map(|entry| entry.name.as_str())
            .collect()
    }

    pub fn prorated_addons(&self) -> Vec<Money> {
        self.catalog
            .addons
            .iter()
            .map(|addon| self.prorated(addon.price))
            .collect()
    }
}
