//! Error types for storecheck

use thiserror::Error;

/// Result type alias using storecheck Error
pub type Result<T> = std::result::Result<T, Error>;

/// storecheck error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),
}
