//! Integration tests for the catalog index

use serde_json::json;
use test_utils::{TestDataBuilder, assertions::assert_some};

use domain_catalog::{CatalogIndex, PricingCatalogRow};

fn row(value: serde_json::Value) -> PricingCatalogRow {
    serde_json::from_value(value).unwrap()
}

#[test]
fn rebuild_replaces_the_previous_snapshot() {
    let builder = TestDataBuilder::from_test_name("rebuild_replaces");
    let region = builder.name("region", "a");

    let first = CatalogIndex::build(vec![row(json!({
        "region": region,
        "product_id": "tier.one",
        "price": 10.0
    }))]);
    assert_eq!(first.options(&region).len(), 1);

    // A fresh snapshot is a fresh index; no rows carry over
    let second = CatalogIndex::build(vec![row(json!({
        "region": region,
        "product_id": "tier.two",
        "price": 20.0
    }))]);
    assert_eq!(second.options(&region).len(), 1);
    assert!(second.entry(&region, &format!("{region}::tier.one")).is_none());

    let entry = assert_some(
        second.entry(&region, &format!("{region}::tier.two")),
        "rebuilt tier",
    );
    assert_eq!(entry.row.effective_price(), Some(20.0));
}

#[test]
fn an_empty_snapshot_resolves_nothing_but_never_fails() {
    let index = CatalogIndex::build(Vec::new());
    assert!(index.is_empty());
    assert!(index.options("lagos-1").is_empty());
    assert!(index.entry("lagos-1", "lagos-1::std").is_none());
}
