//! The browser surface the funnel pages are written against

use async_trait::async_trait;

use crate::error::E2eResult;

/// Minimal set of browser interactions the page objects need.
///
/// Selectors use Playwright syntax: CSS with `:has()`/`:has-text()`, `>>`
/// to chain a child locator under a parent, and a `label=` prefix for
/// inputs located by their label text.
#[async_trait]
pub trait BrowserSurface: Send + Sync {
    async fn goto(&self, url: &str) -> E2eResult<()>;

    async fn click(&self, selector: &str) -> E2eResult<()>;

    async fn fill(&self, selector: &str, value: &str) -> E2eResult<()>;

    /// Wait until the element is visible
    async fn wait_visible(&self, selector: &str) -> E2eResult<()>;

    async fn inner_text(&self, selector: &str) -> E2eResult<String>;

    /// Inner text of every match, in document order
    async fn all_inner_texts(&self, selector: &str) -> E2eResult<Vec<String>>;

    /// Direct text-node children only, trimmed
    async fn direct_text(&self, selector: &str) -> E2eResult<String>;

    /// Retries until the element is visible or the action timeout runs out;
    /// `false` on timeout
    async fn is_visible(&self, selector: &str) -> E2eResult<bool>;

    /// Retries until the element is disabled or the action timeout runs out;
    /// `false` on timeout
    async fn is_disabled(&self, selector: &str) -> E2eResult<bool>;

    /// Width of the page viewport in CSS pixels
    fn viewport_width(&self) -> u32;
}

/// `child` located inside every match of `parent`
pub fn within(parent: &str, child: &str) -> String {
    format!("{} >> {}", parent, child)
}

/// `selector` restricted to elements containing `text`
pub fn has_text(selector: &str, text: &str) -> String {
    format!("{}:has-text(\"{}\")", selector, escape_quotes(text))
}

/// Input located by its label text
pub fn by_label(label: &str) -> String {
    format!("label={}", label)
}

fn escape_quotes(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
