//! Page objects for the purchase funnel
//!
//! ```text
//! HomePage ──click_order_now──▶ ProductCategoryPage ──click_order_product──▶
//! ConfigureOrderPage ──click_continue──▶ ReviewOrderPage ──click_checkout──▶
//! CheckoutOrderPage
//! ```
//!
//! Each transition consumes the current page and returns the next one only
//! after the next page's heading is visible, so a stage can neither be
//! skipped nor revisited.

mod category;
mod checkout;
mod configure;
mod home;
mod review;

pub use category::ProductCategoryPage;
pub use checkout::CheckoutOrderPage;
pub use configure::ConfigureOrderPage;
pub use home::HomePage;
pub use review::ReviewOrderPage;

use storecheck_common::PricingCalculator;

use crate::browser::BrowserSurface;
use crate::config::StoreConfig;
use crate::error::E2eResult;

/// Heading every funnel page shows once it has rendered
const PAGE_HEADER: &str = "h1";

/// What every page carries along the funnel
#[derive(Clone, Copy)]
pub(crate) struct Funnel<'a> {
    pub browser: &'a dyn BrowserSurface,
    pub store: &'a StoreConfig,
    pub pricing: PricingCalculator<'a>,
}

impl<'a> Funnel<'a> {
    async fn wait_for_header(&self) -> E2eResult<()> {
        self.browser.wait_visible(PAGE_HEADER).await
    }
}
