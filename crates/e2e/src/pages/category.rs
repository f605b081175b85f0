use super::{ConfigureOrderPage, Funnel};
use crate::browser::{has_text, within};
use crate::error::E2eResult;

/// Product listing for the chosen category
pub struct ProductCategoryPage<'a> {
    funnel: Funnel<'a>,
}

impl<'a> ProductCategoryPage<'a> {
    pub(super) async fn open(funnel: Funnel<'a>) -> E2eResult<Self> {
        funnel.wait_for_header().await?;
        Ok(Self { funnel })
    }

    pub async fn click_order_product(self) -> E2eResult<ConfigureOrderPage<'a>> {
        let product_card = has_text(".product", &self.funnel.store.catalog.product.name);
        self.funnel.browser.click(&within(&product_card, "a")).await?;

        ConfigureOrderPage::open(self.funnel).await
    }
}
