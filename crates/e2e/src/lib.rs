//! storecheck E2E Test Framework
//!
//! This crate drives a browser through the storefront purchase funnel and
//! reconciles what each page renders against the store's catalog:
//! - Loads declarative YAML store definitions
//! - Controls Playwright through a long-lived Node driver
//! - Walks the funnel through typed page objects
//! - Compares rendered names, IP addresses and prices, including proration
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Funnel Runner (Rust)                     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  FunnelRunner                                               │
//! │    ├── PlaywrightSession::launch() -> BrowserSurface        │
//! │    ├── run_scenario(surface, store) -> ScenarioResult       │
//! │    └── write_results(suite) -> test-results.json            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Pages                                                      │
//! │    Home → ProductCategory → ConfigureOrder                  │
//! │         → ReviewOrder → CheckoutOrder                       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  StoreConfig (YAML)                                         │
//! │    ├── base_url, product_category_name, ip_address          │
//! │    ├── catalog: product + ordered addons                    │
//! │    └── checkout_sections                                    │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod browser;
pub mod cli;
pub mod config;
pub mod error;
pub mod pages;
pub mod playwright;
pub mod runner;
pub mod verify;

pub use browser::BrowserSurface;
pub use config::StoreConfig;
pub use error::{E2eError, E2eResult};
pub use runner::FunnelRunner;
