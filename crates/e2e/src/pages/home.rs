use chrono::NaiveDate;
use storecheck_common::PricingCalculator;
use tracing::{debug, info};

use super::{Funnel, ProductCategoryPage};
use crate::browser::{has_text, within, BrowserSurface};
use crate::config::StoreConfig;
use crate::error::E2eResult;

const ACCOUNT_DROPDOWN: &str = "#mainNavbar a:has-text(\"Account\")";
const LOGIN_MENU_ITEM: &str = "li[menuitemname=\"Login\"]";
const MOBILE_MENU_BUTTON: &str = "header button";

/// Below this width the navbar collapses behind the menu button
const MOBILE_BREAKPOINT: u32 = 1200;

/// Store landing page, the first funnel stage
pub struct HomePage<'a> {
    funnel: Funnel<'a>,
}

impl<'a> HomePage<'a> {
    /// Start a funnel for `store`, pricing against `reference_date`
    pub fn new(
        browser: &'a dyn BrowserSurface,
        store: &'a StoreConfig,
        reference_date: NaiveDate,
    ) -> Self {
        Self {
            funnel: Funnel {
                browser,
                store,
                pricing: PricingCalculator::on(&store.catalog, reference_date),
            },
        }
    }

    pub async fn visit(&self) -> E2eResult<()> {
        info!("Visiting {}", self.funnel.store.base_url);
        self.funnel.browser.goto(&self.funnel.store.base_url).await
    }

    /// Whether the Account menu offers anything other than "Login"
    pub async fn is_user_logged_in(&self) -> E2eResult<bool> {
        let browser = self.funnel.browser;

        if browser.viewport_width() < MOBILE_BREAKPOINT {
            debug!("Opening mobile menu");
            browser.click(MOBILE_MENU_BUTTON).await?;
        }

        browser.click(ACCOUNT_DROPDOWN).await?;
        let menu_item_text = browser.inner_text(LOGIN_MENU_ITEM).await?;

        Ok(menu_item_text.trim() != "Login")
    }

    pub async fn click_order_now(self) -> E2eResult<ProductCategoryPage<'a>> {
        let card = has_text(".card-body", &self.funnel.store.product_category_name);
        self.funnel.browser.click(&within(&card, "a")).await?;

        ProductCategoryPage::open(self.funnel).await
    }
}
