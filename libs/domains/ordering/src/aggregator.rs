//! Order-level aggregation with multi-source reconciliation.
//!
//! Totals are recomputed from scratch on every call: identical inputs yield
//! identical totals, with no hidden counters or accumulation. Source
//! precedence is local estimate < backend echo < payment gateway echo, field
//! by field, with the reconciliation invariant that the displayed grand
//! total always equals subtotal + tax + gateway fees.

use std::collections::HashSet;

use domain_catalog::extract::{first_non_negative, first_positive};

use crate::models::{BillingTotals, ResolvedProfile, TotalsSource};
use crate::upstream::{BackendPricingEcho, GatewayEcho};

const DEFAULT_CURRENCY: &str = "USD";
const RECONCILE_EPSILON: f64 = 1e-6;

/// Aggregate resolved profiles and any upstream echoes into order totals.
pub fn aggregate(
    resolved: &[ResolvedProfile],
    backend: Option<&BackendPricingEcho>,
    gateway: Option<&GatewayEcho>,
) -> BillingTotals {
    let (currency, currency_mismatch) = display_currency(resolved, backend, gateway);

    let local_subtotal: f64 = resolved.iter().map(|p| p.subtotal).sum();
    let backend_subtotal = backend.and_then(|b| b.subtotal).filter(|s| *s > 0.0);
    if let Some(subtotal) = backend_subtotal {
        if (subtotal - local_subtotal).abs() > RECONCILE_EPSILON {
            tracing::debug!(
                local = local_subtotal,
                backend = subtotal,
                "Backend subtotal overrides local estimate"
            );
        }
    }
    let subtotal = backend_subtotal.unwrap_or(local_subtotal);

    // An echoed tax of zero is not a usable answer when a rate is also
    // present: the rate derivation takes over (matches the console's
    // observed reconciliation behavior).
    let explicit_tax = first_positive([gateway.and_then(|g| g.tax), backend.and_then(|b| b.tax)]);
    let explicit_rate = backend
        .and_then(|b| b.tax_rate_percent)
        .filter(|rate| *rate > 0.0);
    let tax = explicit_tax
        .or_else(|| {
            explicit_rate
                .map(|rate| subtotal * rate / 100.0)
                .filter(|tax| *tax > 0.0)
        })
        .unwrap_or(0.0);

    // Derived rate is for display only and never re-drives the subtotal
    let tax_rate_percent = explicit_rate.or_else(|| {
        (subtotal > 0.0 && tax > 0.0).then(|| tax / subtotal * 100.0)
    });

    let gateway_fees = first_non_negative([
        gateway.and_then(|g| g.gateway_fees),
        backend.and_then(|b| b.gateway_fees),
    ])
    .unwrap_or(0.0);

    let computed_total = subtotal + tax + gateway_fees;
    let upstream_total = first_positive([gateway.and_then(|g| g.amount), backend.and_then(|b| b.total)]);
    let grand_total = if computed_total > 0.0 {
        if let Some(raw) = upstream_total {
            if (raw - computed_total).abs() > RECONCILE_EPSILON {
                tracing::debug!(
                    raw,
                    computed = computed_total,
                    "Upstream total superseded by component sum"
                );
            }
        }
        computed_total
    } else {
        upstream_total.unwrap_or(0.0)
    };

    let source = if gateway.is_some_and(GatewayEcho::has_figures) {
        TotalsSource::Gateway
    } else if backend.is_some_and(BackendPricingEcho::has_figures) {
        TotalsSource::Backend
    } else {
        TotalsSource::Estimate
    };

    BillingTotals {
        subtotal,
        tax,
        tax_rate_percent,
        gateway_fees,
        grand_total,
        currency,
        currency_mismatch,
        source,
    }
}

/// Display currency: first non-empty among resolved profiles, falling back
/// to the echoes, then USD. More than one distinct currency flags a
/// mismatch; amounts are still summed as literal numbers, no conversion.
fn display_currency(
    resolved: &[ResolvedProfile],
    backend: Option<&BackendPricingEcho>,
    gateway: Option<&GatewayEcho>,
) -> (String, bool) {
    let mut distinct: HashSet<&str> = HashSet::new();
    let mut first: Option<&str> = None;
    for profile in resolved {
        let currency = profile.currency.trim();
        if currency.is_empty() {
            continue;
        }
        distinct.insert(currency);
        first.get_or_insert(currency);
    }

    let mismatch = distinct.len() > 1;
    if mismatch {
        tracing::warn!(
            currencies = ?distinct,
            "Mismatched line-item currencies, summing literal amounts"
        );
    }

    let currency = first
        .map(str::to_string)
        .or_else(|| backend.and_then(|b| b.currency.clone()))
        .or_else(|| gateway.and_then(|g| g.currency.clone()))
        .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());

    (currency, mismatch)
}
