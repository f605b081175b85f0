//! Parsing of text read from rendered storefront pages

use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::types::Money;

fn numeric_run() -> &'static Regex {
    static NUMERIC_RUN: OnceLock<Regex> = OnceLock::new();
    NUMERIC_RUN.get_or_init(|| Regex::new(r"[\d.]+").expect("numeric run pattern is valid"))
}

/// Parse a displayed price such as `"$1,234.56 USD"`.
///
/// Thousands separators are dropped and the first run of digits and dots is
/// read; the currency symbol and any suffix never match. Returns `None` for
/// empty text, text without a number, and runs that are not a single
/// well-formed decimal (`"1.2.3"`, `"."`). A `None` never equals an expected
/// price, so a check fed unparsable text fails.
pub fn parse_price(text: &str) -> Option<Money> {
    if text.is_empty() {
        return None;
    }

    let cleaned = text.replace(',', "");
    let run = numeric_run().find(&cleaned)?.as_str();

    if run.matches('.').count() > 1 || !run.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }

    Decimal::from_str(run).ok()
}

/// A rendered DOM node, reduced to what text extraction needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedNode {
    Text(String),
    Element(Vec<RenderedNode>),
}

impl RenderedNode {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// All text under this node, nested elements included
    pub fn full_text(&self) -> String {
        match self {
            RenderedNode::Text(text) => text.clone(),
            RenderedNode::Element(children) => {
                children.iter().map(RenderedNode::full_text).collect()
            }
        }
    }
}

/// Text of the direct text-node children of an element, trimmed.
///
/// Nested elements such as badges or labels inside a title are skipped, so a
/// product name can be read on its own.
pub fn direct_text_only(children: &[RenderedNode]) -> String {
    children
        .iter()
        .filter_map(|node| match node {
            RenderedNode::Text(text) => Some(text.as_str()),
            RenderedNode::Element(_) => None,
        })
        .collect::<String>()
        .trim()
        .to_string()
}
