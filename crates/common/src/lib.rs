//! storecheck Common Library
//!
//! Catalog types, proration math and rendered-text parsing shared by the
//! storefront funnel checks.

pub mod error;
pub mod parse;
pub mod pricing;
pub mod types;

// Re-export commonly used types
pub use error::{Error, Result};
pub use parse::{direct_text_only, parse_price, RenderedNode};
pub use pricing::{
    days_in_month, expected_subtotal, prorated_price, prorated_price_str, round_money,
    PricingCalculator,
};
pub use types::{Catalog, CatalogEntry, Money};

/// storecheck version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
