//! Core types for storecheck

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{Error, Result};

/// Monetary amount. Computed values always carry two fractional digits.
pub type Money = Decimal;

/// A purchasable product or add-on with its full monthly price
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub price: Money,
}

impl CatalogEntry {
    pub fn new(name: impl Into<String>, price: Money) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }
}

/// The product under test plus its add-ons, in the order the store lists them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub product: CatalogEntry,
    #[serde(default)]
    pub addons: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn new(product: CatalogEntry, addons: Vec<CatalogEntry>) -> Self {
        Self { product, addons }
    }

    /// Product first, then add-ons in catalog order
    pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        std::iter::once(&self.product).chain(self.addons.iter())
    }

    pub fn addon_names(&self) -> Vec<&str> {
        self.addons.iter().map(|a| a.name.as_str()).collect()
    }

    pub fn addon_prices(&self) -> Vec<Money> {
        self.addons.iter().map(|a| a.price).collect()
    }

    /// Reject negative prices and duplicate names
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();

        for entry in self.entries() {
            if entry.name.trim().is_empty() {
                return Err(Error::InvalidCatalog("entry with empty name".to_string()));
            }
            if entry.price.is_sign_negative() && !entry.price.is_zero() {
                return Err(Error::InvalidCatalog(format!(
                    "negative price {} for '{}'",
                    entry.price, entry.name
                )));
            }
            if !seen.insert(entry.name.as_str()) {
                return Err(Error::InvalidCatalog(format!(
                    "duplicate entry '{}'",
                    entry.name
                )));
            }
        }

        Ok(())
    }
}
