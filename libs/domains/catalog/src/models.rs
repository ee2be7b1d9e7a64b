use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use ts_rs::TS;
use utoipa::ToSchema;

use crate::extract;

/// Raw pricing record as returned by the catalog data source.
///
/// No field is guaranteed: different regions ship rows with different subsets
/// of identifiers and price fields. Malformed values deserialize as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, TS)]
#[ts(export)]
pub struct PricingCatalogRow {
    /// Region descriptor (e.g. "lagos-1"); rows without one are dropped
    pub region: Option<String>,
    /// Primary product identifier
    pub product_id: Option<String>,
    /// Fallback identifier from the upstream marketplace
    pub external_id: Option<String>,
    /// Provider-side resource identifier
    pub provider_resource_id: Option<String>,
    /// Product display name
    pub name: Option<String>,
    /// Capacity attribute for storage tiers (GB)
    #[serde(default, deserialize_with = "lenient_amount")]
    pub quota_gb: Option<f64>,
    /// Price fields, any subset of which may be present
    #[serde(default, deserialize_with = "lenient_amount")]
    pub unit_price: Option<f64>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub monthly_price: Option<f64>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub amount: Option<f64>,
    /// Currency fields, any subset of which may be present
    pub currency: Option<String>,
    pub currency_code: Option<String>,
    pub billing_currency: Option<String>,
    /// Unrecognized upstream fields, preserved verbatim
    #[serde(flatten)]
    #[ts(skip)]
    pub extra: Option<serde_json::Map<String, JsonValue>>,
}

impl PricingCatalogRow {
    /// Price candidates in precedence order.
    pub fn price_candidates(&self) -> [Option<f64>; 4] {
        [self.unit_price, self.price, self.monthly_price, self.amount]
    }

    /// Currency candidates in precedence order.
    pub fn currency_candidates(&self) -> [Option<&str>; 3] {
        [
            self.currency.as_deref(),
            self.currency_code.as_deref(),
            self.billing_currency.as_deref(),
        ]
    }

    /// Identifier candidates for the composite tier key, in precedence order.
    pub fn key_candidates(&self) -> [Option<&str>; 4] {
        [
            self.product_id.as_deref(),
            self.external_id.as_deref(),
            self.provider_resource_id.as_deref(),
            self.name.as_deref(),
        ]
    }

    /// First positive price among the candidate fields.
    pub fn effective_price(&self) -> Option<f64> {
        extract::first_positive(self.price_candidates())
    }

    /// First non-empty currency among the candidate fields.
    pub fn effective_currency(&self) -> Option<String> {
        extract::first_non_empty(self.currency_candidates())
    }
}

fn lenient_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<JsonValue>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(extract::amount_of))
}

/// A priced tier resolved into the catalog index.
#[derive(Debug, Clone, Serialize, ToSchema, TS)]
#[ts(export)]
pub struct CatalogEntry {
    /// Composite key, `regionKey::productKey`
    pub key: String,
    /// Display label assembled from name, capacity, and price
    pub label: String,
    /// Source row this entry was built from
    pub row: PricingCatalogRow,
}

/// Ordered `{ key, label }` pair for the host's tier select inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema, TS)]
#[ts(export)]
pub struct TierOption {
    pub key: String,
    pub label: String,
}

/// Format an amount with its currency for display labels.
pub fn money_label(currency: &str, amount: f64) -> String {
    if currency.is_empty() {
        format!("{amount:.2}")
    } else {
        format!("{currency} {amount:.2}")
    }
}

/// Reference metadata for a marketplace region.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, TS)]
#[ts(export)]
pub struct RegionInfo {
    /// Region code (e.g. "lagos-1")
    pub code: String,
    /// Human-readable label
    pub label: Option<String>,
    /// ISO country code, used for billing-country auto-detection
    pub country: Option<String>,
}

/// Cosmetic lookup of region metadata.
///
/// Lookups never fail: an unknown or empty directory falls back to the
/// queried code verbatim.
#[derive(Debug, Clone, Default)]
pub struct RegionDirectory {
    regions: HashMap<String, RegionInfo>,
}

impl RegionDirectory {
    pub fn new(regions: Vec<RegionInfo>) -> Self {
        let regions = regions
            .into_iter()
            .map(|info| (crate::index::normalize_region_key(&info.code), info))
            .collect();
        Self { regions }
    }

    /// Display label for a region code, or the code itself when unknown.
    pub fn label_for(&self, code: &str) -> String {
        self.regions
            .get(&crate::index::normalize_region_key(code))
            .and_then(|info| info.label.clone())
            .unwrap_or_else(|| code.trim().to_string())
    }

    /// Billing country for a region code, when known.
    pub fn country_for(&self, code: &str) -> Option<String> {
        self.regions
            .get(&crate::index::normalize_region_key(code))
            .and_then(|info| info.country.clone())
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}
