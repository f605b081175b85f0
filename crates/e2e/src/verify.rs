//! Comparisons between rendered page text and expected catalog values
//!
//! Every sequence comparison requires the rendered row count to match the
//! expected count; extra or missing rows fail the check.

use storecheck_common::{parse_price, Money};
use tracing::warn;

use crate::error::{E2eError, E2eResult};

/// 1-based position of the table column whose header reads `name`, as used
/// by CSS `nth-child`
pub fn column_index(headers: &[String], name: &str) -> E2eResult<usize> {
    headers
        .iter()
        .position(|header| header.trim() == name)
        .map(|index| index + 1)
        .ok_or_else(|| E2eError::ColumnNotFound(name.to_string()))
}

/// Parsed `text` equals `expected` exactly
pub fn price_matches(text: &str, expected: Money) -> bool {
    match parse_price(text) {
        Some(actual) if actual == expected => true,
        actual => {
            warn!(text, ?actual, %expected, "price mismatch");
            false
        }
    }
}

/// Every rendered price parses and equals the expected price at its index
pub fn prices_match(texts: &[String], expected: &[Money]) -> bool {
    if texts.len() != expected.len() {
        warn!(
            rendered = texts.len(),
            expected = expected.len(),
            "price row count mismatch"
        );
        return false;
    }

    texts
        .iter()
        .zip(expected)
        .all(|(text, expected)| price_matches(text, *expected))
}

/// Every rendered text, trimmed, equals the expected text at its index
pub fn texts_match<S: AsRef<str>>(texts: &[String], expected: &[S]) -> bool {
    if texts.len() != expected.len() {
        warn!(
            rendered = texts.len(),
            expected = expected.len(),
            "text row count mismatch"
        );
        return false;
    }

    for (text, expected) in texts.iter().zip(expected) {
        if text.trim() != expected.as_ref() {
            warn!(actual = text.trim(), expected = expected.as_ref(), "text mismatch");
            return false;
        }
    }

    true
}

/// Rendered rows of a cart summary, as `(name, price)` text pairs
#[derive(Debug, Clone, Copy)]
pub struct SummaryRows<'a> {
    pub names: &'a [String],
    pub prices: &'a [String],
}

impl SummaryRows<'_> {
    fn is_well_formed(&self) -> bool {
        self.names.len() == self.prices.len()
    }
}

/// Each order-summary row names one of the selected add-on cards and shows
/// that card's price. Both lists must have the same number of rows.
pub fn summary_matches_selection(selected: SummaryRows<'_>, summary: SummaryRows<'_>) -> bool {
    if !selected.is_well_formed() || !summary.is_well_formed() {
        warn!("name and price row counts differ");
        return false;
    }
    if selected.names.len() != summary.names.len() {
        warn!(
            selected = selected.names.len(),
            summary = summary.names.len(),
            "order summary row count mismatch"
        );
        return false;
    }

    summary
        .names
        .iter()
        .zip(summary.prices)
        .all(|(summary_name, summary_price)| {
            let summary_name = summary_name.trim();
            let summary_price = summary_price.trim();

            let found = selected
                .names
                .iter()
                .zip(selected.prices)
                .any(|(name, price)| name.contains(summary_name) && price.contains(summary_price));

            if !found {
                warn!(summary_name, summary_price, "order summary row not among selected add-ons");
            }
            found
        })
}
