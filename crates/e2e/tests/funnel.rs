//! Funnel walks against an in-memory storefront
//!
//! The storefront renders the default cPanel store as it looks on the last
//! day of September 2025, so every prorated amount is one day's price.

mod support;

use std::time::Duration;

use chrono::NaiveDate;
use storecheck_e2e::pages::HomePage;
use storecheck_e2e::runner::{RunnerConfig, ScenarioResult, TestSuiteResult};
use storecheck_e2e::{FunnelRunner, StoreConfig};

use support::{FakeStorefront, COMPLETE_ORDER};

fn last_day_of_september() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, 30).unwrap()
}

fn runner_on(reference_date: NaiveDate) -> FunnelRunner {
    FunnelRunner::with_config(RunnerConfig {
        reference_date: Some(reference_date),
        ..Default::default()
    })
}

fn failed_messages(result: &ScenarioResult) -> Vec<&str> {
    result.failed_checks().map(|c| c.message.as_str()).collect()
}

#[tokio::test]
async fn full_funnel_passes_on_last_day_of_month() {
    let store = StoreConfig::default();
    let fake = FakeStorefront::cpanel_last_day_of_september();

    let result = runner_on(last_day_of_september())
        .run_scenario(&fake, &store)
        .await;

    assert!(result.success, "unexpected failure: {:?}", result.error);
    assert_eq!(result.reference_date, last_day_of_september());

    let steps: Vec<&str> = result.steps.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(
        steps,
        vec![
            "Navigate to the store",
            "Order a product",
            "Verify product and price",
            "Verify product table information",
            "Verify checkout sections",
            "Verify complete order button",
        ]
    );

    let checks: usize = result.steps.iter().map(|s| s.checks.len()).sum();
    assert_eq!(checks, 17);
}

#[tokio::test]
async fn pages_walk_the_funnel_in_order() {
    let store = StoreConfig::default();
    let fake = FakeStorefront::cpanel_last_day_of_september();

    let home = HomePage::new(&fake, &store, last_day_of_september());
    home.visit().await.unwrap();
    assert!(!home.is_user_logged_in().await.unwrap());

    let category = home.click_order_now().await.unwrap();
    let configure = category.click_order_product().await.unwrap();
    configure.enter_ip_address().await.unwrap();
    configure.select_addons().await.unwrap();
    assert!(configure.is_order_summary_updated_with_addons().await.unwrap());

    let review = configure.click_continue().await.unwrap();
    assert!(review.are_expected_product_and_addon_names_present().await.unwrap());
    assert!(review.are_subtotal_and_addon_prices_correct().await.unwrap());
    assert!(review.are_all_prorated_prices_correct().await.unwrap());

    let checkout = review.click_checkout().await.unwrap();
    assert!(checkout.are_item_names_correct().await.unwrap());
    assert!(checkout.are_ip_addresses_correct().await.unwrap());
    assert!(checkout.are_recurring_prices_correct().await.unwrap());
    assert!(checkout.are_due_today_prices_correct().await.unwrap());
    assert!(checkout.is_subtotal_price_correct().await.unwrap());
    assert!(checkout.is_complete_order_button_disabled().await.unwrap());

    let actions = fake.actions();
    let clicks: Vec<&str> = actions
        .iter()
        .filter_map(|a| a.strip_prefix("click "))
        .collect();
    assert_eq!(
        clicks,
        vec![
            "#mainNavbar a:has-text(\"Account\")",
            ".card-body:has-text(\"cPanel Licenses\") >> a",
            ".product:has-text(\"cPanel Solo® Cloud (1 Account)\") >> a",
            ".addon-products .card:has(label:has-text(\"Monthly CloudLinux for cPanel License\")) >> .panel-add",
            ".addon-products .card:has(label:has-text(\"LiteSpeed 8GB\")) >> .panel-add",
            ".addon-products .card:has(label:has-text(\"Monthly Imunify360 For cPanel Solo(R)\")) >> .panel-add",
            "#btnCompleteProductConfig",
            "#checkout",
        ]
    );

    let fill = actions
        .iter()
        .position(|a| a == "fill label=IP Address *")
        .expect("IP address filled");
    assert_eq!(actions[fill + 1], "value 2.2.2.2");
    assert_eq!(actions[0], "goto https://store.cpanel.net/");
}

#[tokio::test]
async fn wrong_due_today_price_fails_only_that_check() {
    let store = StoreConfig::default();
    let mut fake = FakeStorefront::cpanel_last_day_of_september();
    fake.set_texts(
        "table >> tbody td:nth-child(4)",
        &["$0.91 USD", "$0.53 USD", "$0.83 USD", "$0.40 USD"],
    );

    let result = runner_on(last_day_of_september())
        .run_scenario(&fake, &store)
        .await;

    assert!(!result.success);
    assert_eq!(
        failed_messages(&result),
        vec!["Due Today product and addons prices should be calculated properly"]
    );
    // Later steps still ran
    assert_eq!(result.steps.len(), 6);
    assert!(result.steps[4].success);
}

#[tokio::test]
async fn first_of_month_expects_full_price_today() {
    let store = StoreConfig::default();
    let fake = FakeStorefront::cpanel_last_day_of_september();
    let first_of_october = NaiveDate::from_ymd_opt(2025, 10, 1).unwrap();

    let result = runner_on(first_of_october).run_scenario(&fake, &store).await;

    assert!(!result.success);
    assert_eq!(
        failed_messages(&result),
        vec![
            "Prorated prices should be calculated correctly",
            "Due Today product and addons prices should be calculated properly",
            "Sub Total should equal the prorated product and addons",
        ]
    );
}

#[tokio::test]
async fn missing_column_fails_its_check_and_scenario_continues() {
    let store = StoreConfig::default();
    let mut fake = FakeStorefront::cpanel_last_day_of_september();
    fake.set_texts(
        "table >> th",
        &["Product Type", "Address", "Recurring Price", "Due Today"],
    );

    let result = runner_on(last_day_of_september())
        .run_scenario(&fake, &store)
        .await;

    assert!(!result.success);
    let failed: Vec<_> = result.failed_checks().collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(
        failed[0].message,
        "IP addresses should correspond to the defined one earlier"
    );
    assert_eq!(
        failed[0].error.as_deref(),
        Some("Column \"IP Address\" not found")
    );
    assert_eq!(result.steps.len(), 6);
}

#[tokio::test]
async fn extra_checkout_row_fails_name_check() {
    let store = StoreConfig::default();
    let mut fake = FakeStorefront::cpanel_last_day_of_september();
    fake.set_texts(
        "table >> tbody td:nth-child(1)",
        &[
            "cPanel Solo® Cloud (1 Account)",
            "Monthly CloudLinux for cPanel License",
            "LiteSpeed 8GB",
            "Monthly Imunify360 For cPanel Solo(R)",
            "Setup Fee",
        ],
    );

    let result = runner_on(last_day_of_september())
        .run_scenario(&fake, &store)
        .await;

    assert_eq!(
        failed_messages(&result),
        vec!["Names of product and addons should be the same as mentioned before"]
    );
}

#[tokio::test]
async fn narrow_viewport_opens_mobile_menu_first() {
    let store = StoreConfig::default();
    let fake = FakeStorefront::cpanel_last_day_of_september().with_viewport_width(800);

    let home = HomePage::new(&fake, &store, last_day_of_september());
    assert!(!home.is_user_logged_in().await.unwrap());

    let actions = fake.actions();
    assert_eq!(actions[0], "click header button");
    assert_eq!(actions[1], "click #mainNavbar a:has-text(\"Account\")");
}

#[tokio::test]
async fn logged_in_visitor_is_reported() {
    let store = StoreConfig::default();
    let mut fake = FakeStorefront::cpanel_last_day_of_september();
    fake.set_texts("li[menuitemname=\"Login\"]", &["Logout"]);

    let result = runner_on(last_day_of_september())
        .run_scenario(&fake, &store)
        .await;

    assert_eq!(failed_messages(&result), vec!["User should not be logged in"]);
}

#[tokio::test]
async fn hidden_section_and_enabled_button_fail() {
    let store = StoreConfig::default();
    let mut fake = FakeStorefront::cpanel_last_day_of_september();
    fake.hide(".sub-heading:has-text(\"Billing Address\")");
    fake.enable(COMPLETE_ORDER);

    let result = runner_on(last_day_of_september())
        .run_scenario(&fake, &store)
        .await;

    assert_eq!(
        failed_messages(&result),
        vec![
            "Section 'Billing Address' should be visible",
            "Complete order button should be disabled",
        ]
    );
}

#[tokio::test]
async fn broken_button_ends_the_scenario() {
    let store = StoreConfig::default();
    let mut fake = FakeStorefront::cpanel_last_day_of_september();
    fake.break_selector("#btnCompleteProductConfig");

    let result = runner_on(last_day_of_september())
        .run_scenario(&fake, &store)
        .await;

    assert!(!result.success);
    let error = result.error.as_deref().unwrap();
    assert!(error.contains("#btnCompleteProductConfig"), "{}", error);
    assert_eq!(result.steps.last().unwrap().name, "Order a product");
}

#[tokio::test]
async fn slow_store_hits_scenario_timeout() {
    let store = StoreConfig::default();
    let fake = FakeStorefront::cpanel_last_day_of_september()
        .with_page_load_delay(Duration::from_millis(200));
    let runner = FunnelRunner::with_config(RunnerConfig {
        reference_date: Some(last_day_of_september()),
        scenario_timeout: Duration::from_millis(50),
        ..Default::default()
    });

    let result = runner.run_scenario(&fake, &store).await;

    assert!(!result.success);
    assert!(result.error.as_deref().unwrap().starts_with("Timeout waiting for: scenario"));
}

#[tokio::test]
async fn results_are_written_as_json() {
    let store = StoreConfig::default();
    let fake = FakeStorefront::cpanel_last_day_of_september();
    let output = tempfile::tempdir().unwrap();
    let runner = FunnelRunner::with_config(RunnerConfig {
        reference_date: Some(last_day_of_september()),
        output_dir: output.path().to_path_buf(),
        ..Default::default()
    });

    let result = runner.run_scenario(&fake, &store).await;
    let suite = TestSuiteResult {
        total: 1,
        passed: 1,
        failed: 0,
        skipped: 0,
        duration_ms: result.duration_ms,
        results: vec![result],
    };

    let path = runner.write_results(&suite).unwrap();
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();

    assert_eq!(json["passed"], 1);
    assert_eq!(json["results"][0]["reference_date"], "2025-09-30");
    assert_eq!(json["results"][0]["steps"][2]["checks"][1]["passed"], true);
}

#[test]
fn shipped_store_definition_matches_built_in_store() {
    let stores = StoreConfig::load_all(std::path::Path::new("tests/stores")).unwrap();
    let built_in = StoreConfig::default();

    assert_eq!(stores.len(), 1);
    let store = &stores[0];
    assert_eq!(store.name, built_in.name);
    assert_eq!(store.base_url, built_in.base_url);
    assert_eq!(store.catalog.product.price, built_in.catalog.product.price);
    assert_eq!(store.catalog.addon_names(), built_in.catalog.addon_names());
    assert_eq!(store.catalog.addon_prices(), built_in.catalog.addon_prices());
    assert_eq!(store.checkout_sections, built_in.checkout_sections);
}

#[tokio::test]
async fn late_rendered_section_is_waited_for() {
    let store = StoreConfig::default();
    let mut fake = FakeStorefront::cpanel_last_day_of_september()
        .with_action_timeout(Duration::from_millis(200));
    fake.appear_after(
        ".sub-heading:has-text(\"Payment Details\")",
        Duration::from_millis(50),
    );

    let result = runner_on(last_day_of_september())
        .run_scenario(&fake, &store)
        .await;

    assert!(result.success, "unexpected failure: {:?}", result.error);
}

#[tokio::test]
async fn section_rendered_after_action_timeout_fails() {
    let store = StoreConfig::default();
    let mut fake = FakeStorefront::cpanel_last_day_of_september()
        .with_action_timeout(Duration::from_millis(20));
    fake.appear_after(
        ".sub-heading:has-text(\"Payment Details\")",
        Duration::from_millis(200),
    );

    let result = runner_on(last_day_of_september())
        .run_scenario(&fake, &store)
        .await;

    assert_eq!(
        failed_messages(&result),
        vec!["Section 'Payment Details' should be visible"]
    );
}
