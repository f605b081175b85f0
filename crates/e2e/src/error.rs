//! Error types for E2E testing

use thiserror::Error;

#[derive(Error, Debug)]
pub enum E2eError {
    #[error("Playwright not found. Install with: npx playwright install")]
    PlaywrightNotFound,

    #[error("Playwright error: {0}")]
    Playwright(String),

    #[error("Browser action failed: {op} on '{selector}' - {reason}")]
    Driver {
        op: String,
        selector: String,
        reason: String,
    },

    #[error("Store config parse error: {0}")]
    ConfigParse(String),

    #[error("Invalid store config: {0}")]
    InvalidConfig(String),

    #[error("Store not found: {0}")]
    StoreNotFound(String),

    #[error("Column \"{0}\" not found")]
    ColumnNotFound(String),

    #[error("Timeout waiting for: {0}")]
    Timeout(String),

    #[error("Pricing error: {0}")]
    Pricing(#[from] storecheck_common::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl E2eError {
    /// Errors that invalidate a single check rather than the whole scenario
    pub fn is_check_local(&self) -> bool {
        matches!(self, E2eError::ColumnNotFound(_))
    }
}

pub type E2eResult<T> = Result<T, E2eError>;
