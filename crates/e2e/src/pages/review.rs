use tracing::warn;

use super::{CheckoutOrderPage, Funnel};
use crate::browser::{has_text, within};
use crate::error::E2eResult;
use crate::verify::{price_matches, prices_match, texts_match};

const CHECKOUT_BUTTON: &str = "#checkout";
const ADDON_ITEMS: &str = ".view-cart-items >> .item:has(.item-group:has-text(\"Addon\"))";
const SUBTOTAL: &str = "#subtotal";

const ITEM_TITLE: &str = ".item-title";
const RECURRING_PRICE: &str = ".item-price .cycle";
const PRORATED_PRICE: &str = ".item-price span:not(.cycle)";

/// Cart review: one row for the product, one per add-on
pub struct ReviewOrderPage<'a> {
    funnel: Funnel<'a>,
}

impl<'a> ReviewOrderPage<'a> {
    pub(super) async fn open(funnel: Funnel<'a>) -> E2eResult<Self> {
        funnel.wait_for_header().await?;
        Ok(Self { funnel })
    }

    pub async fn click_checkout(self) -> E2eResult<CheckoutOrderPage<'a>> {
        self.funnel.browser.click(CHECKOUT_BUTTON).await?;
        CheckoutOrderPage::open(self.funnel).await
    }

    fn product_item(&self) -> String {
        let group = has_text(".item-group", &self.funnel.store.product_category_name);
        format!(".item:has({})", group)
    }

    pub async fn are_expected_product_and_addon_names_present(&self) -> E2eResult<bool> {
        let product_name = self.is_expected_product_name_present().await?;
        let addon_names = self.are_expected_addon_names_present().await?;

        Ok(product_name && addon_names)
    }

    /// The product title read without nested badges
    async fn is_expected_product_name_present(&self) -> E2eResult<bool> {
        let title = within(&self.product_item(), ITEM_TITLE);
        let product_name = self.funnel.browser.direct_text(&title).await?;
        let expected = &self.funnel.store.catalog.product.name;

        if &product_name != expected {
            warn!(actual = %product_name, %expected, "product name mismatch");
            return Ok(false);
        }
        Ok(true)
    }

    async fn are_expected_addon_names_present(&self) -> E2eResult<bool> {
        let addon_names = self
            .funnel
            .browser
            .all_inner_texts(&within(ADDON_ITEMS, ITEM_TITLE))
            .await?;

        Ok(texts_match(&addon_names, &self.funnel.store.catalog.addon_names()))
    }

    /// Product row shows the full recurring total; add-on rows their own
    /// full price
    pub async fn are_subtotal_and_addon_prices_correct(&self) -> E2eResult<bool> {
        let subtotal = self.is_subtotal_price_correct().await?;
        let addon_prices = self.are_addon_prices_correct().await?;

        Ok(subtotal && addon_prices)
    }

    async fn is_subtotal_price_correct(&self) -> E2eResult<bool> {
        let text = self
            .funnel
            .browser
            .inner_text(&within(&self.product_item(), RECURRING_PRICE))
            .await?;

        Ok(price_matches(&text, self.funnel.pricing.subtotal(false)))
    }

    async fn are_addon_prices_correct(&self) -> E2eResult<bool> {
        let texts = self
            .funnel
            .browser
            .all_inner_texts(&within(ADDON_ITEMS, RECURRING_PRICE))
            .await?;

        Ok(prices_match(&texts, &self.funnel.store.catalog.addon_prices()))
    }

    /// Product, each add-on and the cart subtotal are prorated to the
    /// reference date
    pub async fn are_all_prorated_prices_correct(&self) -> E2eResult<bool> {
        let product = self.is_prorated_product_price_correct().await?;
        let addons = self.are_prorated_addon_prices_correct().await?;
        let subtotal = self.is_prorated_subtotal_price_correct().await?;

        Ok(product && addons && subtotal)
    }

    async fn is_prorated_product_price_correct(&self) -> E2eResult<bool> {
        let text = self
            .funnel
            .browser
            .inner_text(&within(&self.product_item(), PRORATED_PRICE))
            .await?;
        let expected = self.funnel.pricing.prorated(self.funnel.store.catalog.product.price);

        Ok(price_matches(&text, expected))
    }

    async fn are_prorated_addon_prices_correct(&self) -> E2eResult<bool> {
        let texts = self
            .funnel
            .browser
            .all_inner_texts(&within(ADDON_ITEMS, PRORATED_PRICE))
            .await?;

        Ok(prices_match(&texts, &self.funnel.pricing.prorated_addons()))
    }

    async fn is_prorated_subtotal_price_correct(&self) -> E2eResult<bool> {
        let text = self.funnel.browser.inner_text(SUBTOTAL).await?;
        Ok(price_matches(&text, self.funnel.pricing.subtotal(true)))
    }
}
