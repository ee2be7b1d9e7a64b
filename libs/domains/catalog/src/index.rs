use rand::{RngExt, distr::Alphanumeric};
use std::collections::HashMap;

use crate::extract;
use crate::models::{CatalogEntry, PricingCatalogRow, TierOption, money_label};

/// Normalize a region descriptor into a lookup key.
///
/// `"NG-1"`, `" ng-1 "`, and `"Ng-1"` all resolve to the same key.
pub fn normalize_region_key(region: &str) -> String {
    region.trim().to_lowercase()
}

/// Priced tiers for a single region: ordered options plus keyed entries.
#[derive(Debug, Clone, Default)]
pub struct RegionCatalog {
    options: Vec<TierOption>,
    entries: HashMap<String, CatalogEntry>,
}

impl RegionCatalog {
    pub fn options(&self) -> &[TierOption] {
        &self.options
    }

    pub fn entry(&self, tier_key: &str) -> Option<&CatalogEntry> {
        self.entries.get(tier_key)
    }
}

/// Region-keyed lookup of priced tiers, rebuilt whenever catalog data arrives.
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    regions: HashMap<String, RegionCatalog>,
}

impl CatalogIndex {
    /// Build an index from raw catalog rows.
    ///
    /// Rows are grouped by normalized region; rows without a resolvable
    /// region are dropped. Tier keys are composed from the first available
    /// identifier, falling back to a random suffix so every row stays
    /// addressable. Duplicate keys are last-write-wins.
    pub fn build(rows: Vec<PricingCatalogRow>) -> Self {
        let mut regions: HashMap<String, RegionCatalog> = HashMap::new();

        for row in rows {
            let Some(region_key) = row
                .region
                .as_deref()
                .map(normalize_region_key)
                .filter(|key| !key.is_empty())
            else {
                tracing::debug!(name = ?row.name, "Dropped catalog row without region");
                continue;
            };

            let product_key = extract::first_non_empty(row.key_candidates())
                .unwrap_or_else(fallback_product_key);
            let key = format!("{region_key}::{product_key}");
            let label = row_label(&row, &key);

            let region = regions.entry(region_key.clone()).or_default();
            let entry = CatalogEntry {
                key: key.clone(),
                label: label.clone(),
                row,
            };

            if let Some(previous) = region.entries.insert(key.clone(), entry) {
                tracing::warn!(
                    region = %region_key,
                    key = %key,
                    dropped = %previous.label,
                    kept = %label,
                    "Duplicate catalog tier key, keeping last row"
                );
                if let Some(option) = region.options.iter_mut().find(|o| o.key == key) {
                    option.label = label;
                }
            } else {
                region.options.push(TierOption { key, label });
            }
        }

        Self { regions }
    }

    /// Ordered tier options for a region; empty when the region is unknown.
    pub fn options(&self, region: &str) -> &[TierOption] {
        self.regions
            .get(&normalize_region_key(region))
            .map(RegionCatalog::options)
            .unwrap_or(&[])
    }

    /// Look up a priced entry by region and composite tier key.
    pub fn entry(&self, region: &str, tier_key: &str) -> Option<&CatalogEntry> {
        self.regions
            .get(&normalize_region_key(region))?
            .entry(tier_key)
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

/// Display label for a catalog row: name, capacity, and price, each omitted
/// when unavailable. Falls back to the composite key when nothing is known.
fn row_label(row: &PricingCatalogRow, key: &str) -> String {
    let mut parts: Vec<String> = Vec::new();

    if let Some(name) = row.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
        parts.push(name.to_string());
    }
    if let Some(quota) = row.quota_gb.filter(|q| *q > 0.0) {
        parts.push(format!("{quota:.0} GB"));
    }
    if let Some(price) = row.effective_price() {
        let currency = row.effective_currency().unwrap_or_default();
        parts.push(money_label(&currency, price));
    }

    if parts.is_empty() {
        key.to_string()
    } else {
        parts.join(" - ")
    }
}

fn fallback_product_key() -> String {
    let suffix: String = rand::rng()
        .sample_iter(Alphanumeric)
        .take(8)
        .map(char::from)
        .collect();
    format!("tier-{}", suffix.to_lowercase())
}
