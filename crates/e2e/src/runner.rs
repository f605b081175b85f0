//! Main funnel runner: launches the browser, walks the funnel and collects
//! check results

use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::browser::BrowserSurface;
use crate::config::StoreConfig;
use crate::error::{E2eError, E2eResult};
use crate::pages::HomePage;
use crate::playwright::{PlaywrightConfig, PlaywrightSession};

/// Outcome of one assertion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    pub message: String,
    pub passed: bool,
    pub error: Option<String>,
}

/// A named group of checks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepResult {
    pub name: String,
    pub success: bool,
    pub duration_ms: u64,
    pub checks: Vec<CheckResult>,
}

/// Result of walking the funnel for one store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub name: String,
    pub success: bool,
    pub reference_date: NaiveDate,
    pub duration_ms: u64,
    pub steps: Vec<StepResult>,
    pub error: Option<String>,
}

impl ScenarioResult {
    pub fn failed_checks(&self) -> impl Iterator<Item = &CheckResult> {
        self.steps
            .iter()
            .flat_map(|step| step.checks.iter())
            .filter(|check| !check.passed)
    }
}

/// Result of running all scenarios
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSuiteResult {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub duration_ms: u64,
    pub results: Vec<ScenarioResult>,
}

/// Collects steps and checks as the funnel is walked.
///
/// A failed check never stops the scenario. A missing table column fails
/// only the check that needed it; any other error ends the scenario.
#[derive(Debug, Default)]
struct ScenarioLog {
    steps: Vec<StepResult>,
    step_started: Option<Instant>,
}

impl ScenarioLog {
    fn step(&mut self, name: &str) {
        self.finish_step();
        info!("▶ {}", name);
        self.steps.push(StepResult {
            name: name.to_string(),
            success: true,
            duration_ms: 0,
            checks: Vec::new(),
        });
        self.step_started = Some(Instant::now());
    }

    fn check(&mut self, message: impl Into<String>, outcome: E2eResult<bool>) -> E2eResult<()> {
        let message = message.into();
        let (passed, error) = match outcome {
            Ok(passed) => (passed, None),
            Err(e) if e.is_check_local() => (false, Some(e.to_string())),
            Err(e) => return Err(e),
        };

        if passed {
            debug!("  ✓ {}", message);
        } else {
            error!("  ✗ {}{}", message, error.as_deref().map(|e| format!(" ({})", e)).unwrap_or_default());
        }

        if self.steps.is_empty() {
            self.step("checks");
        }
        if let Some(step) = self.steps.last_mut() {
            step.success &= passed;
            step.checks.push(CheckResult { message, passed, error });
        }
        Ok(())
    }

    fn finish_step(&mut self) {
        if let (Some(started), Some(step)) = (self.step_started.take(), self.steps.last_mut()) {
            step.duration_ms = started.elapsed().as_millis() as u64;
        }
    }
}

/// Walk the funnel from the home page to checkout
async fn run_funnel(
    browser: &dyn BrowserSurface,
    store: &StoreConfig,
    reference_date: NaiveDate,
    log: &mut ScenarioLog,
) -> E2eResult<()> {
    log.step("Navigate to the store");
    let home = HomePage::new(browser, store, reference_date);
    home.visit().await?;
    log.check(
        "User should not be logged in",
        home.is_user_logged_in().await.map(|logged_in| !logged_in),
    )?;

    log.step("Order a product");
    let category = home.click_order_now().await?;
    let configure = category.click_order_product().await?;
    configure.enter_ip_address().await?;
    configure.select_addons().await?;
    log.check(
        "Order summary should update with selected addons",
        configure.is_order_summary_updated_with_addons().await,
    )?;
    let review = configure.click_continue().await?;

    log.step("Verify product and price");
    log.check(
        "Chosen product and addons should be present",
        review.are_expected_product_and_addon_names_present().await,
    )?;
    log.check(
        "Subtotal and addon prices should be the same as mentioned before",
        review.are_subtotal_and_addon_prices_correct().await,
    )?;
    log.check(
        "Prorated prices should be calculated correctly",
        review.are_all_prorated_prices_correct().await,
    )?;
    let checkout = review.click_checkout().await?;

    log.step("Verify product table information");
    log.check(
        "Names of product and addons should be the same as mentioned before",
        checkout.are_item_names_correct().await,
    )?;
    log.check(
        "IP addresses should correspond to the defined one earlier",
        checkout.are_ip_addresses_correct().await,
    )?;
    log.check(
        "Recurring prices should be the same as mentioned before",
        checkout.are_recurring_prices_correct().await,
    )?;
    log.check(
        "Due Today product and addons prices should be calculated properly",
        checkout.are_due_today_prices_correct().await,
    )?;
    log.check(
        "Sub Total should equal the prorated product and addons",
        checkout.is_subtotal_price_correct().await,
    )?;

    log.step("Verify checkout sections");
    for section in &store.checkout_sections {
        log.check(
            format!("Section '{}' should be visible", section),
            checkout.is_section_visible(section).await,
        )?;
    }

    log.step("Verify complete order button");
    log.check(
        "Complete order button should be visible",
        checkout.is_complete_order_button_visible().await,
    )?;
    log.check(
        "Complete order button should be disabled",
        checkout.is_complete_order_button_disabled().await,
    )?;

    Ok(())
}

/// Main funnel runner
pub struct FunnelRunner {
    /// Playwright configuration
    playwright_config: PlaywrightConfig,

    /// Store definitions directory
    stores_dir: PathBuf,

    /// Output directory for results
    output_dir: PathBuf,

    /// Ceiling for a whole scenario
    scenario_timeout: Duration,

    /// Date prices are prorated to (None = today)
    reference_date: Option<NaiveDate>,
}

impl Default for FunnelRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl FunnelRunner {
    /// Create a new runner with default configuration
    pub fn new() -> Self {
        Self::with_config(RunnerConfig::default())
    }

    /// Create a runner with custom configuration
    pub fn with_config(config: RunnerConfig) -> Self {
        Self {
            playwright_config: config.playwright,
            stores_dir: config.stores_dir,
            output_dir: config.output_dir,
            scenario_timeout: config.scenario_timeout,
            reference_date: config.reference_date,
        }
    }

    /// Load stores from the stores directory, falling back to the built-in store
    pub fn load_stores(&self) -> E2eResult<Vec<StoreConfig>> {
        let stores = if self.stores_dir.is_dir() {
            StoreConfig::load_all(&self.stores_dir)?
        } else {
            Vec::new()
        };

        if stores.is_empty() {
            warn!(
                "No store definitions in {}, using the built-in store",
                self.stores_dir.display()
            );
            return Ok(vec![StoreConfig::default()]);
        }
        Ok(stores)
    }

    /// Run every store
    pub async fn run_all(&self) -> E2eResult<TestSuiteResult> {
        let stores = self.load_stores()?;
        Ok(self.run_stores(&stores).await)
    }

    /// Run stores matching a tag
    pub async fn run_tagged(&self, tag: &str) -> E2eResult<TestSuiteResult> {
        let stores = self.load_stores()?;
        let filtered: Vec<StoreConfig> = StoreConfig::filter_by_tag(&stores, tag)
            .into_iter()
            .cloned()
            .collect();
        Ok(self.run_stores(&filtered).await)
    }

    /// Run a specific store by name
    pub async fn run_named(&self, name: &str) -> E2eResult<TestSuiteResult> {
        let store = self
            .load_stores()?
            .into_iter()
            .find(|s| s.name == name)
            .ok_or_else(|| E2eError::StoreNotFound(name.to_string()))?;

        Ok(self.run_stores(std::slice::from_ref(&store)).await)
    }

    /// Run each store in its own browser, one after another
    pub async fn run_stores(&self, stores: &[StoreConfig]) -> TestSuiteResult {
        let start = Instant::now();
        let mut results = Vec::new();
        let mut passed = 0;
        let mut failed = 0;
        let skipped = 0;

        info!("Running {} scenario(s)...", stores.len());

        for store in stores {
            let result = match self.run_store(store).await {
                Ok(result) => result,
                Err(e) => ScenarioResult {
                    name: store.name.clone(),
                    success: false,
                    reference_date: self.reference_date(),
                    duration_ms: 0,
                    steps: vec![],
                    error: Some(e.to_string()),
                },
            };

            if result.success {
                passed += 1;
                info!("✓ {} ({} ms)", result.name, result.duration_ms);
            } else {
                failed += 1;
                error!(
                    "✗ {} - {}",
                    result.name,
                    result.error.as_deref().unwrap_or("unknown error")
                );
            }
            results.push(result);
        }

        let duration_ms = start.elapsed().as_millis() as u64;

        info!("");
        info!(
            "Test Results: {} passed, {} failed, {} skipped ({} ms)",
            passed, failed, skipped, duration_ms
        );

        TestSuiteResult {
            total: stores.len(),
            passed,
            failed,
            skipped,
            duration_ms,
            results,
        }
    }

    /// Launch a browser, walk the funnel for `store`, close the browser
    pub async fn run_store(&self, store: &StoreConfig) -> E2eResult<ScenarioResult> {
        let session = PlaywrightSession::launch(self.playwright_config.clone()).await?;
        let result = self.run_scenario(&session, store).await;

        if let Err(e) = session.close().await {
            warn!("Failed to close browser: {}", e);
        }
        Ok(result)
    }

    /// Walk the funnel for `store` on an already open browser
    pub async fn run_scenario(&self, browser: &dyn BrowserSurface, store: &StoreConfig) -> ScenarioResult {
        let start = Instant::now();
        let reference_date = self.reference_date();
        debug!("Running scenario '{}' priced on {}", store.name, reference_date);

        let mut log = ScenarioLog::default();
        let outcome = tokio::time::timeout(
            self.scenario_timeout,
            run_funnel(browser, store, reference_date, &mut log),
        )
        .await;
        log.finish_step();

        let mut scenario_error = match outcome {
            Ok(Ok(())) => None,
            Ok(Err(e)) => Some(e.to_string()),
            Err(_) => Some(
                E2eError::Timeout(format!(
                    "scenario '{}' after {} ms",
                    store.name,
                    self.scenario_timeout.as_millis()
                ))
                .to_string(),
            ),
        };

        let mut result = ScenarioResult {
            name: store.name.clone(),
            success: false,
            reference_date,
            duration_ms: start.elapsed().as_millis() as u64,
            steps: log.steps,
            error: None,
        };

        if scenario_error.is_none() {
            let failed: Vec<&str> = result.failed_checks().map(|c| c.message.as_str()).collect();
            if !failed.is_empty() {
                scenario_error = Some(format!("{} check(s) failed: {}", failed.len(), failed.join("; ")));
            }
        }

        result.success = scenario_error.is_none();
        result.error = scenario_error;
        result
    }

    fn reference_date(&self) -> NaiveDate {
        self.reference_date
            .unwrap_or_else(|| Local::now().date_naive())
    }

    /// Write results to JSON file
    pub fn write_results(&self, results: &TestSuiteResult) -> E2eResult<PathBuf> {
        std::fs::create_dir_all(&self.output_dir)?;

        let path = self.output_dir.join("test-results.json");
        let json = serde_json::to_string_pretty(results)?;
        std::fs::write(&path, json)?;

        info!("Results written to: {}", path.display());
        Ok(path)
    }
}

/// Configuration for the funnel runner
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub playwright: PlaywrightConfig,
    pub stores_dir: PathBuf,
    pub output_dir: PathBuf,
    pub scenario_timeout: Duration,
    pub reference_date: Option<NaiveDate>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            playwright: PlaywrightConfig::default(),
            stores_dir: PathBuf::from("tests/stores"),
            output_dir: PathBuf::from("test-results"),
            scenario_timeout: Duration::from_secs(30),
            reference_date: None,
        }
    }
}
