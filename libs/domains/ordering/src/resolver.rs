//! Per-profile price and currency resolution.
//!
//! A pure function of the profile, the current catalog snapshot, and the
//! billing context: safe to re-run on every edit, catalog load, or echo
//! arrival. All fallbacks are defined, so resolution never fails.

use domain_catalog::{CatalogIndex, extract, normalize_region_key};

use crate::models::{BillingContext, ResolvedProfile, ServiceProfile};
use crate::validator;

const DEFAULT_CURRENCY: &str = "USD";

/// Resolve one profile against the current catalog snapshot.
///
/// Unit-price precedence: a positive manual override wins regardless of
/// catalog data, else the first positive candidate price on the catalog row,
/// else 0. Months and quantity are clamped to at least 1.
pub fn resolve_profile(
    profile: &ServiceProfile,
    catalog: &CatalogIndex,
    context: &BillingContext,
) -> ResolvedProfile {
    let region_key = normalize_region_key(&profile.region);
    let entry = catalog.entry(&profile.region, &profile.tier_key);
    let has_tier_data = entry.is_some();

    let override_price = profile
        .price_override
        .as_deref()
        .and_then(extract::parse_amount)
        .filter(|price| *price > 0.0);
    let catalog_price = entry.and_then(|e| e.row.effective_price());

    let (unit_price, override_applied) = match override_price {
        Some(price) => (price, true),
        None => (catalog_price.unwrap_or(0.0), false),
    };

    let currency = entry
        .and_then(|e| e.row.effective_currency())
        .or_else(|| context.currency.clone())
        .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());

    let months = profile.months.max(1);
    let quantity = profile.quantity.max(1);
    let subtotal = quantity as f64 * months as f64 * unit_price;

    let missing_fields = validator::missing_fields(profile, has_tier_data, unit_price);

    ResolvedProfile {
        profile_id: profile.id,
        kind: profile.kind,
        region_key,
        tier_key: profile.tier_key.clone(),
        unit_price,
        currency,
        months,
        quantity,
        subtotal,
        has_tier_data,
        override_applied,
        is_complete: missing_fields.is_empty(),
        missing_fields,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CreateServiceProfile, ServiceKind};
    use domain_catalog::PricingCatalogRow;
    use serde_json::json;

    fn catalog() -> CatalogIndex {
        let rows: Vec<PricingCatalogRow> = [
            json!({"region": "lagos-1", "product_id": "std", "name": "Standard", "price": 10.0, "currency": "USD"}),
            json!({"region": "lagos-1", "product_id": "zero", "name": "Unpriced", "price": 0.0}),
            json!({"region": "lagos-1", "product_id": "chain", "unit_price": "oops", "price": -2.0, "monthly_price": 7.25}),
        ]
        .into_iter()
        .map(|v| serde_json::from_value(v).unwrap())
        .collect();
        CatalogIndex::build(rows)
    }

    fn storage_profile(tier_key: &str) -> ServiceProfile {
        let mut profile = ServiceProfile::new(CreateServiceProfile::blank(ServiceKind::ObjectStorage));
        profile.region = "Lagos-1".to_string();
        profile.tier_key = tier_key.to_string();
        profile
    }

    #[test]
    fn positive_override_wins_regardless_of_catalog() {
        let mut profile = storage_profile("lagos-1::std");
        profile.price_override = Some("15".to_string());
        profile.months = 6;

        let resolved = resolve_profile(&profile, &catalog(), &BillingContext::default());
        assert!(resolved.override_applied);
        assert_eq!(resolved.unit_price, 15.0);
        assert_eq!(resolved.subtotal, 90.0);
    }

    #[test]
    fn non_positive_or_garbage_override_falls_back_to_catalog() {
        let catalog = catalog();
        for raw in ["0", "-3", "abc", "  "] {
            let mut profile = storage_profile("lagos-1::std");
            profile.price_override = Some(raw.to_string());

            let resolved = resolve_profile(&profile, &catalog, &BillingContext::default());
            assert!(!resolved.override_applied, "override {raw:?} should not apply");
            assert_eq!(resolved.unit_price, 10.0);
        }
    }

    #[test]
    fn unit_price_is_first_positive_catalog_candidate() {
        let resolved = resolve_profile(
            &storage_profile("lagos-1::chain"),
            &catalog(),
            &BillingContext::default(),
        );
        assert_eq!(resolved.unit_price, 7.25);
    }

    #[test]
    fn no_positive_candidate_resolves_to_zero() {
        let resolved = resolve_profile(
            &storage_profile("lagos-1::zero"),
            &catalog(),
            &BillingContext::default(),
        );
        assert_eq!(resolved.unit_price, 0.0);
        assert_eq!(resolved.subtotal, 0.0);
        assert!(!resolved.is_complete);
    }

    #[test]
    fn unknown_tier_marks_missing_tier_data() {
        let resolved = resolve_profile(
            &storage_profile("lagos-1::ghost"),
            &catalog(),
            &BillingContext::default(),
        );
        assert!(!resolved.has_tier_data);
        assert!(resolved.missing_fields.contains(&"tier pricing data".to_string()));
    }

    #[test]
    fn region_lookup_is_case_and_whitespace_insensitive() {
        let catalog = catalog();
        for region in ["lagos-1", " LAGOS-1 ", "Lagos-1"] {
            let mut profile = storage_profile("lagos-1::std");
            profile.region = region.to_string();

            let resolved = resolve_profile(&profile, &catalog, &BillingContext::default());
            assert!(resolved.has_tier_data, "region {region:?} should resolve");
            assert_eq!(resolved.region_key, "lagos-1");
        }
    }

    #[test]
    fn months_and_quantity_clamp_to_one() {
        let mut profile = storage_profile("lagos-1::std");
        profile.months = 0;
        profile.quantity = -4;

        let resolved = resolve_profile(&profile, &catalog(), &BillingContext::default());
        assert_eq!(resolved.months, 1);
        assert_eq!(resolved.quantity, 1);
        assert_eq!(resolved.subtotal, 10.0);
    }

    #[test]
    fn currency_falls_back_to_context_then_usd() {
        let profile = storage_profile("lagos-1::zero");

        let context = BillingContext {
            currency: Some("NGN".to_string()),
            ..Default::default()
        };
        let resolved = resolve_profile(&profile, &catalog(), &context);
        assert_eq!(resolved.currency, "NGN");

        let resolved = resolve_profile(&profile, &catalog(), &BillingContext::default());
        assert_eq!(resolved.currency, "USD");
    }
}
