//! In-memory storefront answering the funnel's selectors with canned text

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use storecheck_common::{direct_text_only, RenderedNode};
use storecheck_e2e::{BrowserSurface, E2eError, E2eResult};

pub const PRODUCT_ITEM: &str = ".item:has(.item-group:has-text(\"cPanel Licenses\"))";
pub const ADDON_ITEMS: &str = ".view-cart-items >> .item:has(.item-group:has-text(\"Addon\"))";
pub const SELECTED_CARDS: &str = ".addon-products .card:has(.panel-addon-selected)";
pub const SUMMARY_ROWS: &str = "#producttotal >> .clearfix:has(span.pull-left:has-text(\"+\"))";
pub const COMPLETE_ORDER: &str = "#btnCompleteOrder";

pub struct FakeStorefront {
    texts: HashMap<String, Vec<String>>,
    nodes: HashMap<String, Vec<RenderedNode>>,
    visible: HashSet<String>,
    disabled: HashSet<String>,
    broken: HashSet<String>,
    viewport_width: u32,
    page_load_delay: Option<Duration>,
    appears_after: HashMap<String, Duration>,
    action_timeout: Duration,
    actions: Mutex<Vec<String>>,
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

impl FakeStorefront {
    pub fn empty() -> Self {
        Self {
            texts: HashMap::new(),
            nodes: HashMap::new(),
            visible: HashSet::new(),
            disabled: HashSet::new(),
            broken: HashSet::new(),
            viewport_width: 1280,
            page_load_delay: None,
            appears_after: HashMap::new(),
            action_timeout: Duration::from_secs(5),
            actions: Mutex::new(Vec::new()),
        }
    }

    /// The default cPanel store as it renders on 2025-09-30, the last day
    /// of a 30-day month, for an anonymous visitor
    pub fn cpanel_last_day_of_september() -> Self {
        let mut fake = Self::empty();

        fake.set_texts("li[menuitemname=\"Login\"]", &[" Login "]);

        let addon_names = [
            "Monthly CloudLinux for cPanel License",
            "LiteSpeed 8GB",
            "Monthly Imunify360 For cPanel Solo(R)",
        ];
        fake.set_texts(&format!("{} >> label", SELECTED_CARDS), &addon_names);
        fake.set_texts(
            &format!("{} >> .panel-price", SELECTED_CARDS),
            &["$16.00 USD Monthly", "$25.00 USD Monthly", "$12.00 USD Monthly"],
        );
        fake.set_texts(&format!("{} >> .pull-left", SUMMARY_ROWS), &addon_names);
        fake.set_texts(
            &format!("{} >> .pull-right", SUMMARY_ROWS),
            &["$16.00 USD", "$25.00 USD", "$12.00 USD"],
        );

        fake.nodes.insert(
            format!("{} >> .item-title", PRODUCT_ITEM),
            vec![
                RenderedNode::text("\n  cPanel Solo® Cloud (1 Account)\n  "),
                RenderedNode::Element(vec![RenderedNode::text("New")]),
            ],
        );
        fake.set_texts(&format!("{} >> .item-title", ADDON_ITEMS), &addon_names);
        fake.set_texts(
            &format!("{} >> .item-price .cycle", PRODUCT_ITEM),
            &["$79.99 USD Monthly"],
        );
        fake.set_texts(
            &format!("{} >> .item-price .cycle", ADDON_ITEMS),
            &["$16.00 USD Monthly", "$25.00 USD Monthly", "$12.00 USD Monthly"],
        );
        fake.set_texts(
            &format!("{} >> .item-price span:not(.cycle)", PRODUCT_ITEM),
            &["$0.90 USD"],
        );
        fake.set_texts(
            &format!("{} >> .item-price span:not(.cycle)", ADDON_ITEMS),
            &["$0.53 USD", "$0.83 USD", "$0.40 USD"],
        );
        fake.set_texts("#subtotal", &["$2.66 USD"]);

        fake.set_texts(
            "table >> th",
            &["Product Type", "IP Address", "Recurring Price", "Due Today"],
        );
        fake.set_texts(
            "table >> tbody td:nth-child(1)",
            &[
                "cPanel Solo® Cloud (1 Account)",
                "Monthly CloudLinux for cPanel License",
                "LiteSpeed 8GB",
                "Monthly Imunify360 For cPanel Solo(R)",
            ],
        );
        fake.set_texts(
            "table >> tbody td:nth-child(2)",
            &["2.2.2.2", "2.2.2.2", "2.2.2.2", "2.2.2.2"],
        );
        fake.set_texts(
            "table >> tbody td:nth-child(3)",
            &["$79.99 USD", "$16.00 USD", "$25.00 USD", "$12.00 USD"],
        );
        fake.set_texts(
            "table >> tbody td:nth-child(4)",
            &["$0.90 USD", "$0.53 USD", "$0.83 USD", "$0.40 USD"],
        );
        fake.set_texts(
            "table >> .card-body:has-text(\"Sub Total\")",
            &["Sub Total\n$2.66 USD"],
        );

        for section in [
            "Personal Information",
            "Billing Address",
            "Account Security",
            "Terms & Conditions",
            "Payment Details",
        ] {
            fake.visible.insert(format!(".sub-heading:has-text(\"{}\")", section));
        }
        fake.visible.insert(COMPLETE_ORDER.to_string());
        fake.disabled.insert(COMPLETE_ORDER.to_string());

        fake
    }

    pub fn set_texts(&mut self, selector: &str, texts: &[&str]) {
        self.texts.insert(selector.to_string(), strings(texts));
    }

    pub fn hide(&mut self, selector: &str) {
        self.visible.remove(selector);
    }

    pub fn enable(&mut self, selector: &str) {
        self.disabled.remove(selector);
    }

    /// Make every interaction with `selector` fail
    pub fn break_selector(&mut self, selector: &str) {
        self.broken.insert(selector.to_string());
    }

    pub fn with_viewport_width(mut self, width: u32) -> Self {
        self.viewport_width = width;
        self
    }

    /// Every heading takes `delay` to appear
    pub fn with_page_load_delay(mut self, delay: Duration) -> Self {
        self.page_load_delay = Some(delay);
        self
    }

    /// `selector` becomes visible `delay` after a check starts waiting on it
    pub fn appear_after(&mut self, selector: &str, delay: Duration) {
        self.visible.insert(selector.to_string());
        self.appears_after.insert(selector.to_string(), delay);
    }

    /// How long state checks keep retrying
    pub fn with_action_timeout(mut self, timeout: Duration) -> Self {
        self.action_timeout = timeout;
        self
    }

    pub fn actions(&self) -> Vec<String> {
        self.actions.lock().unwrap().clone()
    }

    fn record(&self, op: &str, selector: &str) -> E2eResult<()> {
        self.actions.lock().unwrap().push(format!("{} {}", op, selector));

        if self.broken.contains(selector) {
            return Err(E2eError::Driver {
                op: op.to_string(),
                selector: selector.to_string(),
                reason: "element not found".to_string(),
            });
        }
        Ok(())
    }

    fn missing(op: &str, selector: &str) -> E2eError {
        E2eError::Driver {
            op: op.to_string(),
            selector: selector.to_string(),
            reason: "no matching element".to_string(),
        }
    }
}

#[async_trait]
impl BrowserSurface for FakeStorefront {
    async fn goto(&self, url: &str) -> E2eResult<()> {
        self.record("goto", url)
    }

    async fn click(&self, selector: &str) -> E2eResult<()> {
        self.record("click", selector)
    }

    async fn fill(&self, selector: &str, value: &str) -> E2eResult<()> {
        self.record("fill", selector)?;
        self.actions.lock().unwrap().push(format!("value {}", value));
        Ok(())
    }

    async fn wait_visible(&self, selector: &str) -> E2eResult<()> {
        if let Some(delay) = self.page_load_delay {
            tokio::time::sleep(delay).await;
        }
        self.record("wait", selector)
    }

    async fn inner_text(&self, selector: &str) -> E2eResult<String> {
        self.record("read", selector)?;
        self.texts
            .get(selector)
            .and_then(|texts| texts.first().cloned())
            .ok_or_else(|| Self::missing("inner_text", selector))
    }

    async fn all_inner_texts(&self, selector: &str) -> E2eResult<Vec<String>> {
        self.record("read", selector)?;
        Ok(self.texts.get(selector).cloned().unwrap_or_default())
    }

    async fn direct_text(&self, selector: &str) -> E2eResult<String> {
        self.record("read", selector)?;
        self.nodes
            .get(selector)
            .map(|nodes| direct_text_only(nodes))
            .ok_or_else(|| Self::missing("direct_text", selector))
    }

    async fn is_visible(&self, selector: &str) -> E2eResult<bool> {
        self.record("read", selector)?;
        if !self.visible.contains(selector) {
            return Ok(false);
        }

        match self.appears_after.get(selector) {
            Some(&delay) if delay > self.action_timeout => {
                tokio::time::sleep(self.action_timeout).await;
                Ok(false)
            }
            Some(&delay) => {
                tokio::time::sleep(delay).await;
                Ok(true)
            }
            None => Ok(true),
        }
    }

    async fn is_disabled(&self, selector: &str) -> E2eResult<bool> {
        self.record("read", selector)?;
        Ok(self.disabled.contains(selector))
    }

    fn viewport_width(&self) -> u32 {
        self.viewport_width
    }
}
