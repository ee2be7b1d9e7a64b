//! Display-ready projection of a resolution pass.
//!
//! Pure read side: combines resolved profiles, aggregated totals, region
//! reference data, and the backend's descriptive line items into a structure
//! the host UI renders directly. Nothing here mutates core entities or adds
//! new computation.

use serde::Serialize;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

use domain_catalog::{CatalogIndex, RegionDirectory, money_label};

use crate::models::{BillingTotals, OrderResolution, ServiceKind, TotalsSource};
use crate::upstream::BackendPricingEcho;

const PRICING_UNAVAILABLE: &str = "pricing unavailable";

/// One rendered order line.
#[derive(Debug, Clone, Serialize, ToSchema, TS)]
#[ts(export)]
pub struct ProfileSummaryRow {
    #[ts(as = "String")]
    pub profile_id: Uuid,
    pub kind: ServiceKind,
    pub region_label: String,
    pub tier_label: String,
    /// e.g. "2 x 12 mo"
    pub term_label: String,
    pub unit_price_label: String,
    pub subtotal_label: String,
    pub is_complete: bool,
    pub missing_fields: Vec<String>,
    pub pricing_available: bool,
}

/// The aggregate totals block.
#[derive(Debug, Clone, Serialize, ToSchema, TS)]
#[ts(export)]
pub struct TotalsBlock {
    pub subtotal_label: String,
    /// Includes the rate when one is known, e.g. "NGN 37.50 (7.5%)"
    pub tax_label: String,
    pub gateway_fees_label: String,
    pub grand_total_label: String,
    pub currency: String,
    pub source: TotalsSource,
}

/// Verbatim rendering of one backend line item.
#[derive(Debug, Clone, Serialize, ToSchema, TS)]
#[ts(export)]
pub struct BackendLineSummary {
    pub label: String,
    pub amount_label: String,
}

/// Display-ready order summary.
#[derive(Debug, Clone, Serialize, ToSchema, TS)]
#[ts(export)]
pub struct OrderSummary {
    pub rows: Vec<ProfileSummaryRow>,
    pub totals: TotalsBlock,
    pub advisories: Vec<String>,
    /// Backend line items, descriptive only; never fed back into totals
    pub backend_lines: Vec<BackendLineSummary>,
}

/// Project a resolution pass into its display form.
pub fn project(
    resolution: &OrderResolution,
    catalog: &CatalogIndex,
    regions: &RegionDirectory,
    backend: Option<&BackendPricingEcho>,
) -> OrderSummary {
    let rows = resolution
        .profiles
        .iter()
        .map(|profile| {
            let pricing_available = profile.has_tier_data || profile.override_applied;
            let tier_label = catalog
                .entry(&profile.region_key, &profile.tier_key)
                .map(|entry| entry.label.clone())
                .unwrap_or_else(|| profile.tier_key.clone());
            let unit_price_label = if pricing_available {
                money_label(&profile.currency, profile.unit_price)
            } else {
                PRICING_UNAVAILABLE.to_string()
            };

            ProfileSummaryRow {
                profile_id: profile.profile_id,
                kind: profile.kind,
                region_label: regions.label_for(&profile.region_key),
                tier_label,
                term_label: format!("{} x {} mo", profile.quantity, profile.months),
                unit_price_label,
                subtotal_label: money_label(&profile.currency, profile.subtotal),
                is_complete: profile.is_complete,
                missing_fields: profile.missing_fields.clone(),
                pricing_available,
            }
        })
        .collect();

    let mut advisories = Vec::new();
    if resolution.totals.currency_mismatch {
        advisories.push(
            "Line items use mixed currencies; totals are a literal sum without conversion"
                .to_string(),
        );
    }

    let backend_lines = backend
        .map(|echo| {
            echo.line_items
                .iter()
                .map(|item| BackendLineSummary {
                    label: item.label.clone().unwrap_or_default(),
                    amount_label: item
                        .amount
                        .map(|amount| {
                            money_label(item.currency.as_deref().unwrap_or_default(), amount)
                        })
                        .unwrap_or_default(),
                })
                .collect()
        })
        .unwrap_or_default();

    OrderSummary {
        rows,
        totals: totals_block(&resolution.totals),
        advisories,
        backend_lines,
    }
}

fn totals_block(totals: &BillingTotals) -> TotalsBlock {
    let tax_label = match totals.tax_rate_percent {
        Some(rate) => format!("{} ({rate}%)", money_label(&totals.currency, totals.tax)),
        None => money_label(&totals.currency, totals.tax),
    };

    TotalsBlock {
        subtotal_label: money_label(&totals.currency, totals.subtotal),
        tax_label,
        gateway_fees_label: money_label(&totals.currency, totals.gateway_fees),
        grand_total_label: money_label(&totals.currency, totals.grand_total),
        currency: totals.currency.clone(),
        source: totals.source,
    }
}
