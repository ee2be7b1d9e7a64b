//! End-to-end tests for the pricing engine
//!
//! These drive the engine the way the host console does: load a catalog
//! snapshot, edit line items, run the gates, record upstream echoes, and
//! read back resolutions and summaries.

use serde_json::json;
use test_utils::assertions::assert_close;

use domain_catalog::{PricingCatalogRow, RegionDirectory, RegionInfo};
use domain_ordering::*;

fn catalog_rows() -> Vec<PricingCatalogRow> {
    [
        json!({
            "region": "lagos-1",
            "product_id": "vm.standard.2",
            "name": "Standard VM",
            "unit_price": 45.0,
            "currency": "USD"
        }),
        json!({
            "region": "lagos-1",
            "product_id": "storage.std",
            "name": "Standard Storage",
            "quota_gb": 500,
            "price": 10.0,
            "currency": "USD"
        }),
        json!({
            "region": "abuja-1",
            "product_id": "storage.std",
            "name": "Standard Storage",
            "price": 4500.0,
            "currency": "NGN"
        }),
    ]
    .into_iter()
    .map(|v| serde_json::from_value(v).unwrap())
    .collect()
}

fn engine() -> PricingEngine {
    let mut engine = PricingEngine::new();
    engine.set_catalog(catalog_rows());
    engine.set_regions(RegionDirectory::new(vec![RegionInfo {
        code: "lagos-1".to_string(),
        label: Some("Lagos".to_string()),
        country: Some("NG".to_string()),
    }]));
    engine
}

fn compute_line(region: &str, tier_key: &str, quantity: i32, months: i32) -> CreateServiceProfile {
    CreateServiceProfile {
        region: region.to_string(),
        tier_key: tier_key.to_string(),
        quantity,
        months,
        instance_type: Some("vm.standard.2".to_string()),
        os_image: Some("ubuntu-24.04".to_string()),
        boot_volume_type: Some("ssd".to_string()),
        boot_volume_gb: Some(100.0),
        ..CreateServiceProfile::blank(ServiceKind::Compute)
    }
}

fn storage_line(region: &str, tier_key: &str, months: i32) -> CreateServiceProfile {
    CreateServiceProfile {
        region: region.to_string(),
        tier_key: tier_key.to_string(),
        months,
        ..CreateServiceProfile::blank(ServiceKind::ObjectStorage)
    }
}

#[test]
fn compute_line_prices_from_the_catalog() {
    // Scenario A: 2 instances x 12 months x 45.00 USD
    let mut engine = engine();
    engine
        .add_profile(compute_line("lagos-1", "lagos-1::vm.standard.2", 2, 12))
        .unwrap();

    let resolution = engine.resolve();
    let line = &resolution.profiles[0];
    assert!(line.is_complete);
    assert_eq!(line.unit_price, 45.0);
    assert_eq!(line.subtotal, 1080.0);
    assert_eq!(resolution.totals.subtotal, 1080.0);
    assert_eq!(resolution.totals.grand_total, 1080.0);
    assert_eq!(resolution.totals.currency, "USD");
}

#[test]
fn manual_override_beats_catalog_price() {
    // Scenario B: catalog 10.00/month, override "15", 6 months
    let mut engine = engine();
    let id = engine
        .add_profile(storage_line("lagos-1", "lagos-1::storage.std", 6))
        .unwrap();
    engine
        .update_profile(
            id,
            UpdateServiceProfile {
                price_override: Some(Some("15".to_string())),
                ..Default::default()
            },
        )
        .unwrap();

    let resolution = engine.resolve();
    let line = &resolution.profiles[0];
    assert!(line.override_applied);
    assert_eq!(line.unit_price, 15.0);
    assert_eq!(line.subtotal, 90.0);
}

#[test]
fn mixed_currencies_are_flagged_and_summed_literally() {
    // Scenario C: one USD profile, one NGN profile
    let mut engine = engine();
    engine
        .add_profile(storage_line("lagos-1", "lagos-1::storage.std", 1))
        .unwrap();
    engine
        .add_profile(storage_line("abuja-1", "abuja-1::storage.std", 1))
        .unwrap();

    let resolution = engine.resolve();
    assert!(resolution.totals.currency_mismatch);
    assert_eq!(resolution.totals.currency, "USD");
    assert_eq!(resolution.totals.subtotal, 10.0 + 4500.0);

    let summary = engine.summary();
    assert_eq!(summary.advisories.len(), 1);
}

#[test]
fn backend_echo_reconciles_totals() {
    // Scenario D: subtotal=500, tax=0, taxRate=7.5, stale total=500
    let mut engine = engine();
    engine
        .add_profile(storage_line("lagos-1", "lagos-1::storage.std", 1))
        .unwrap();
    engine.record_backend_pricing(&json!({
        "subtotal": 500,
        "tax": 0,
        "tax_rate": 7.5,
        "total": 500
    }));

    let totals = engine.resolve().totals;
    assert_eq!(totals.subtotal, 500.0);
    assert_close(totals.tax, 37.5, 1e-9, "derived tax");
    assert_close(totals.grand_total, 537.5, 1e-9, "recomputed grand total");
    assert_eq!(totals.source, TotalsSource::Backend);
}

#[test]
fn gateway_echo_takes_over_reconciliation() {
    let mut engine = engine();
    engine
        .add_profile(storage_line("lagos-1", "lagos-1::storage.std", 1))
        .unwrap();
    engine.record_backend_pricing(&json!({"subtotal": 500, "tax_rate": 7.5}));
    engine.record_gateway_status(&json!({
        "amount_paid": 540.0,
        "fee": 2.5,
        "status": "success"
    }));

    let totals = engine.resolve().totals;
    assert_eq!(totals.gateway_fees, 2.5);
    assert_close(totals.grand_total, 500.0 + 37.5 + 2.5, 1e-9, "grand total");
    assert_eq!(totals.source, TotalsSource::Gateway);
}

#[test]
fn resolve_is_idempotent_across_repeated_calls() {
    let mut engine = engine();
    engine
        .add_profile(storage_line("lagos-1", "lagos-1::storage.std", 3))
        .unwrap();
    engine.record_backend_pricing(&json!({"subtotal": 30, "tax_rate": 7.5}));

    let first = engine.resolve();
    let second = engine.resolve();
    assert_eq!(first.totals, second.totals);
    assert_eq!(first.profiles.len(), second.profiles.len());
    assert_eq!(first.profiles[0].subtotal, second.profiles[0].subtotal);
}

#[test]
fn incomplete_line_blocks_adding_another() {
    let mut engine = engine();
    engine
        .add_profile(CreateServiceProfile::blank(ServiceKind::Compute))
        .unwrap();

    let result = engine.add_profile(storage_line("lagos-1", "lagos-1::storage.std", 1));
    match result {
        Err(OrderingError::MissingRequiredField { index, fields }) => {
            assert_eq!(index, 1);
            assert!(fields.contains(&"region".to_string()));
        }
        other => panic!("expected MissingRequiredField, got {other:?}"),
    }
}

#[test]
fn submission_names_the_first_incomplete_line() {
    let mut engine = engine();
    engine
        .add_profile(storage_line("lagos-1", "lagos-1::storage.std", 1))
        .unwrap();
    // Second line loses its tier selection
    let id = engine
        .add_profile(storage_line("lagos-1", "lagos-1::storage.std", 1))
        .unwrap();
    engine
        .update_profile(
            id,
            UpdateServiceProfile {
                tier_key: Some(String::new()),
                ..Default::default()
            },
        )
        .unwrap();

    let error = engine.advance_stage(OrderStage::Ready).unwrap_err();
    match error {
        OrderingError::MissingRequiredField { index, fields } => {
            assert_eq!(index, 2);
            assert_eq!(fields[0], "storage tier");
        }
        other => panic!("expected MissingRequiredField, got {other:?}"),
    }
}

#[test]
fn order_lines_require_a_real_price_source() {
    let mut engine = engine();
    let id = engine
        .add_profile(compute_line("lagos-1", "lagos-1::vm.standard.2", 1, 12))
        .unwrap();

    let lines = engine.order_lines().unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].unit_price, 45.0);
    assert_eq!(lines[0].region, "lagos-1");

    // A catalog refresh drops the tier: the line still validates (compute
    // completeness does not depend on the catalog) but has no price source
    engine.set_catalog(Vec::new());
    let error = engine.order_lines().unwrap_err();
    assert!(matches!(error, OrderingError::UnresolvableCatalogEntry(_)));

    // A manual override is an acceptable price source again
    engine
        .update_profile(
            id,
            UpdateServiceProfile {
                price_override: Some(Some("12.50".to_string())),
                ..Default::default()
            },
        )
        .unwrap();
    let lines = engine.order_lines().unwrap();
    assert_eq!(lines[0].unit_price, 12.5);
}

#[test]
fn submission_flow_advances_through_the_documented_stages() {
    let mut engine = engine();
    engine
        .add_profile(storage_line("lagos-1", "lagos-1::storage.std", 1))
        .unwrap();

    engine.advance_stage(OrderStage::Ready).unwrap();
    engine.advance_stage(OrderStage::PendingBackendPrice).unwrap();
    assert!(!engine.totals_are_authoritative());

    engine.record_backend_pricing(&json!({"subtotal": 10, "tax": 0.75, "total": 10.75}));
    engine.advance_stage(OrderStage::Priced).unwrap();
    assert!(engine.totals_are_authoritative());

    engine.advance_stage(OrderStage::AwaitingPayment).unwrap();
    engine.advance_stage(OrderStage::Paid).unwrap();
    engine.advance_stage(OrderStage::Review).unwrap();

    let error = engine.advance_stage(OrderStage::Draft).unwrap_err();
    assert!(matches!(error, OrderingError::InvalidTransition { .. }));
}

#[test]
fn fast_track_skips_payment_stages() {
    let mut engine = engine();
    engine.set_fast_track(true);
    engine
        .add_profile(storage_line("lagos-1", "lagos-1::storage.std", 1))
        .unwrap();

    engine.advance_stage(OrderStage::Ready).unwrap();
    engine.advance_stage(OrderStage::PendingBackendPrice).unwrap();
    engine.advance_stage(OrderStage::Priced).unwrap();

    let error = engine.advance_stage(OrderStage::AwaitingPayment).unwrap_err();
    assert!(matches!(error, OrderingError::InvalidTransition { .. }));
    engine.advance_stage(OrderStage::Review).unwrap();
}

#[test]
fn reset_returns_the_engine_to_a_clean_draft() {
    let mut engine = engine();
    engine
        .add_profile(storage_line("lagos-1", "lagos-1::storage.std", 1))
        .unwrap();
    engine.record_backend_pricing(&json!({"subtotal": 500}));
    engine.advance_stage(OrderStage::Ready).unwrap();

    engine.reset();
    assert!(engine.profiles().is_empty());
    assert_eq!(engine.stage(), OrderStage::Draft);

    let totals = engine.resolve().totals;
    assert_eq!(totals.subtotal, 0.0);
    assert_eq!(totals.source, TotalsSource::Estimate);
}

#[test]
fn billing_country_auto_detects_from_the_first_line() {
    let mut engine = engine();
    assert_eq!(engine.billing_country(), None);

    engine
        .add_profile(storage_line("lagos-1", "lagos-1::storage.std", 1))
        .unwrap();
    assert_eq!(engine.billing_country(), Some("NG".to_string()));

    // An empty directory never fails the lookup
    engine.set_regions(RegionDirectory::default());
    assert_eq!(engine.billing_country(), None);
}
