use tracing::{info, warn};

use super::{Funnel, ReviewOrderPage};
use crate::browser::{by_label, has_text, within};
use crate::error::E2eResult;
use crate::verify::{summary_matches_selection, SummaryRows};

const IP_ADDRESS_INPUT: &str = "IP Address *";
const ADDON_CARDS: &str = ".addon-products .card";
const SELECTED_ADDON_CARDS: &str = ".addon-products .card:has(.panel-addon-selected)";
const CONTINUE_BUTTON: &str = "#btnCompleteProductConfig";
const SUMMARY_ADDON_ROWS: &str = "#producttotal >> .clearfix:has(span.pull-left:has-text(\"+\"))";

/// Product configuration: IP address and add-on selection
pub struct ConfigureOrderPage<'a> {
    funnel: Funnel<'a>,
}

impl<'a> ConfigureOrderPage<'a> {
    pub(super) async fn open(funnel: Funnel<'a>) -> E2eResult<Self> {
        funnel.wait_for_header().await?;
        Ok(Self { funnel })
    }

    pub async fn enter_ip_address(&self) -> E2eResult<()> {
        self.funnel
            .browser
            .fill(&by_label(IP_ADDRESS_INPUT), &self.funnel.store.ip_address)
            .await
    }

    /// Add every catalog add-on to the cart, in catalog order
    pub async fn select_addons(&self) -> E2eResult<()> {
        for addon in &self.funnel.store.catalog.addons {
            info!("Selecting add-on '{}'", addon.name);
            let card = format!("{}:has({})", ADDON_CARDS, has_text("label", &addon.name));
            self.funnel.browser.click(&within(&card, ".panel-add")).await?;
        }
        Ok(())
    }

    /// The order summary lists exactly the selected add-on cards, with the
    /// price each card shows
    pub async fn is_order_summary_updated_with_addons(&self) -> E2eResult<bool> {
        let browser = self.funnel.browser;

        let selected_names = browser
            .all_inner_texts(&within(SELECTED_ADDON_CARDS, "label"))
            .await?;
        let selected_prices = browser
            .all_inner_texts(&within(SELECTED_ADDON_CARDS, ".panel-price"))
            .await?;
        let summary_names = browser
            .all_inner_texts(&within(SUMMARY_ADDON_ROWS, ".pull-left"))
            .await?;
        let summary_prices = browser
            .all_inner_texts(&within(SUMMARY_ADDON_ROWS, ".pull-right"))
            .await?;

        let expected = self.funnel.store.catalog.addons.len();
        if selected_names.len() != expected {
            warn!(selected = selected_names.len(), expected, "unexpected number of selected add-ons");
            return Ok(false);
        }

        Ok(summary_matches_selection(
            SummaryRows {
                names: &selected_names,
                prices: &selected_prices,
            },
            SummaryRows {
                names: &summary_names,
                prices: &summary_prices,
            },
        ))
    }

    pub async fn click_continue(self) -> E2eResult<ReviewOrderPage<'a>> {
        self.funnel.browser.click(CONTINUE_BUTTON).await?;
        ReviewOrderPage::open(self.funnel).await
    }
}
