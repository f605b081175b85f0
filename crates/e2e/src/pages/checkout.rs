use tracing::debug;

use super::Funnel;
use crate::browser::{has_text, within};
use crate::error::E2eResult;
use crate::verify::{column_index, price_matches, prices_match, texts_match};

const ORDER_SUMMARY_TABLE: &str = "table";
const COMPLETE_ORDER_BUTTON: &str = "#btnCompleteOrder";

const PRODUCT_TYPE_COLUMN: &str = "Product Type";
const IP_ADDRESS_COLUMN: &str = "IP Address";
const RECURRING_PRICE_COLUMN: &str = "Recurring Price";
const DUE_TODAY_COLUMN: &str = "Due Today";

/// Checkout: order summary table, customer sections and the complete
/// order button
pub struct CheckoutOrderPage<'a> {
    funnel: Funnel<'a>,
}

impl<'a> CheckoutOrderPage<'a> {
    pub(super) async fn open(funnel: Funnel<'a>) -> E2eResult<Self> {
        funnel.wait_for_header().await?;
        Ok(Self { funnel })
    }

    /// Selector for the checkout section headed `name`
    pub fn section(&self, name: &str) -> String {
        has_text(".sub-heading", name)
    }

    /// Waits up to the action timeout for the section to render
    pub async fn is_section_visible(&self, name: &str) -> E2eResult<bool> {
        self.funnel.browser.is_visible(&self.section(name)).await
    }

    pub async fn is_complete_order_button_visible(&self) -> E2eResult<bool> {
        self.funnel.browser.is_visible(COMPLETE_ORDER_BUTTON).await
    }

    /// The order cannot be placed before the customer sections are filled
    pub async fn is_complete_order_button_disabled(&self) -> E2eResult<bool> {
        self.funnel.browser.is_disabled(COMPLETE_ORDER_BUTTON).await
    }

    async fn column_index(&self, column: &str) -> E2eResult<usize> {
        let headers = self
            .funnel
            .browser
            .all_inner_texts(&within(ORDER_SUMMARY_TABLE, "th"))
            .await?;
        column_index(&headers, column)
    }

    /// Text of every body cell in the column headed `column`
    async fn column_texts(&self, column: &str) -> E2eResult<Vec<String>> {
        let index = self.column_index(column).await?;
        debug!("Column '{}' is at position {}", column, index);

        let cells = format!("tbody td:nth-child({})", index);
        self.funnel
            .browser
            .all_inner_texts(&within(ORDER_SUMMARY_TABLE, &cells))
            .await
    }

    pub async fn are_item_names_correct(&self) -> E2eResult<bool> {
        let names = self.column_texts(PRODUCT_TYPE_COLUMN).await?;
        Ok(texts_match(&names, &self.funnel.pricing.item_names()))
    }

    /// Every row carries the IP address entered on the configure page
    pub async fn are_ip_addresses_correct(&self) -> E2eResult<bool> {
        let addresses = self.column_texts(IP_ADDRESS_COLUMN).await?;
        let rows = self.funnel.pricing.item_names().len();
        let expected = vec![self.funnel.store.ip_address.as_str(); rows];

        Ok(texts_match(&addresses, &expected))
    }

    /// The product row recurs at the full cart total, add-on rows at their
    /// own price
    pub async fn are_recurring_prices_correct(&self) -> E2eResult<bool> {
        let texts = self.column_texts(RECURRING_PRICE_COLUMN).await?;
        Ok(prices_match(&texts, &self.funnel.pricing.recurring_items()))
    }

    pub async fn are_due_today_prices_correct(&self) -> E2eResult<bool> {
        let texts = self.column_texts(DUE_TODAY_COLUMN).await?;
        Ok(prices_match(&texts, &self.funnel.pricing.prorated_items()))
    }

    pub async fn is_subtotal_price_correct(&self) -> E2eResult<bool> {
        let subtotal = within(ORDER_SUMMARY_TABLE, &has_text(".card-body", "Sub Total"));
        let text = self.funnel.browser.inner_text(&subtotal).await?;

        Ok(price_matches(&text, self.funnel.pricing.subtotal(true)))
    }
}
