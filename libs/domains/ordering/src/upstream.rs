//! Pricing figures echoed back by the order-creation backend and the
//! payment gateway.
//!
//! Neither collaborator guarantees a payload shape, so every figure is read
//! through an ordered candidate list and missing or malformed fields simply
//! stay `None` (the aggregator's next fallback takes over). See
//! [`crate::aggregator`] for the precedence rules.

use serde::Serialize;
use serde_json::Value;
use ts_rs::TS;
use utoipa::ToSchema;

use domain_catalog::extract::{pick_amount, pick_text};

use crate::models::ResolvedProfile;

const SUBTOTAL_FIELDS: &[&str] = &["subtotal", "sub_total", "subTotal", "amount_subtotal"];
const TAX_FIELDS: &[&str] = &["tax", "tax_amount", "taxAmount", "vat"];
const TAX_RATE_FIELDS: &[&str] = &["tax_rate", "taxRate", "tax_rate_percent", "vat_rate"];
const FEE_FIELDS: &[&str] = &["gateway_fees", "gateway_fee", "processing_fee", "fees", "fee"];
const TOTAL_FIELDS: &[&str] = &["total", "grand_total", "grandTotal", "amount_total"];
const CURRENCY_FIELDS: &[&str] = &["currency", "currency_code", "currencyCode"];
const LINE_ITEM_FIELDS: &[&str] = &["line_items", "lineItems", "items", "lines"];

/// Authoritative pricing breakdown echoed by the order-creation backend
/// once an order exists.
#[derive(Debug, Clone, Default, Serialize, ToSchema, TS)]
#[ts(export)]
pub struct BackendPricingEcho {
    pub subtotal: Option<f64>,
    pub tax: Option<f64>,
    pub tax_rate_percent: Option<f64>,
    pub gateway_fees: Option<f64>,
    /// Raw upstream total; superseded whenever the component sum is positive
    pub total: Option<f64>,
    pub currency: Option<String>,
    /// Descriptive line items, rendered verbatim and never fed back into
    /// the aggregation math
    pub line_items: Vec<BackendLineItem>,
}

impl BackendPricingEcho {
    pub fn from_value(payload: &Value) -> Self {
        if !payload.is_object() {
            tracing::debug!("Backend pricing echo is not an object, treating as empty");
            return Self::default();
        }

        Self {
            subtotal: pick_amount(payload, SUBTOTAL_FIELDS),
            tax: pick_amount(payload, TAX_FIELDS),
            tax_rate_percent: pick_amount(payload, TAX_RATE_FIELDS),
            gateway_fees: pick_amount(payload, FEE_FIELDS),
            total: pick_amount(payload, TOTAL_FIELDS),
            currency: pick_text(payload, CURRENCY_FIELDS),
            line_items: parse_line_items(payload),
        }
    }

    /// Whether the echo carries any figure worth reconciling against.
    pub fn has_figures(&self) -> bool {
        self.subtotal.is_some()
            || self.tax.is_some()
            || self.tax_rate_percent.is_some()
            || self.gateway_fees.is_some()
            || self.total.is_some()
    }
}

/// One descriptive line item from the backend breakdown.
#[derive(Debug, Clone, Default, Serialize, ToSchema, TS)]
#[ts(export)]
pub struct BackendLineItem {
    pub label: Option<String>,
    pub amount: Option<f64>,
    pub quantity: Option<f64>,
    pub currency: Option<String>,
}

fn parse_line_items(payload: &Value) -> Vec<BackendLineItem> {
    let Some(items) = payload
        .as_object()
        .and_then(|object| LINE_ITEM_FIELDS.iter().find_map(|key| object.get(*key)))
        .and_then(Value::as_array)
    else {
        return Vec::new();
    };

    items
        .iter()
        .map(|item| BackendLineItem {
            label: pick_text(item, &["label", "name", "description", "title"]),
            amount: pick_amount(item, &["amount", "total", "price", "subtotal"]),
            quantity: pick_amount(item, &["quantity", "qty", "count"]),
            currency: pick_text(item, CURRENCY_FIELDS),
        })
        .collect()
}

/// Figures reported by the payment gateway once payment is initiated.
#[derive(Debug, Clone, Default, Serialize, ToSchema, TS)]
#[ts(export)]
pub struct GatewayEcho {
    /// Amount the gateway charged or intends to charge
    pub amount: Option<f64>,
    pub tax: Option<f64>,
    pub gateway_fees: Option<f64>,
    pub currency: Option<String>,
    pub status: Option<String>,
    pub reference: Option<String>,
}

impl GatewayEcho {
    pub fn from_value(payload: &Value) -> Self {
        if !payload.is_object() {
            tracing::debug!("Gateway echo is not an object, treating as empty");
            return Self::default();
        }

        Self {
            amount: pick_amount(payload, &["amount", "amount_paid", "charged_amount", "total"]),
            tax: pick_amount(payload, TAX_FIELDS),
            gateway_fees: pick_amount(payload, FEE_FIELDS),
            currency: pick_text(payload, CURRENCY_FIELDS),
            status: pick_text(payload, &["status", "payment_status", "state"]),
            reference: pick_text(payload, &["reference", "transaction_id", "tx_ref", "id"]),
        }
    }

    pub fn has_figures(&self) -> bool {
        self.amount.is_some() || self.tax.is_some() || self.gateway_fees.is_some()
    }
}

/// Request line for the order-creation API, derived from a resolved profile.
#[derive(Debug, Clone, Serialize, ToSchema, TS)]
#[ts(export)]
pub struct OrderLineRequest {
    pub region: String,
    pub tier_key: String,
    pub months: i32,
    pub quantity: i32,
    pub unit_price: f64,
}

impl From<&ResolvedProfile> for OrderLineRequest {
    fn from(resolved: &ResolvedProfile) -> Self {
        Self {
            region: resolved.region_key.clone(),
            tier_key: resolved.tier_key.clone(),
            months: resolved.months,
            quantity: resolved.quantity,
            unit_price: resolved.unit_price,
        }
    }
}
