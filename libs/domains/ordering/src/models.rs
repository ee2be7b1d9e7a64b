use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Kind of service a line item configures
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, Default, ToSchema, TS,
)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ServiceKind {
    #[default]
    Compute,
    ObjectStorage,
}

/// Submission-flow stage for an order
///
/// The core only validates transitions; the host UI drives them. Totals are
/// an estimate before `Priced` and authoritative-reconciled from it onward.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, Default, ToSchema, TS,
)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OrderStage {
    #[default]
    Draft,
    Ready,
    PendingBackendPrice,
    Priced,
    AwaitingPayment,
    Paid,
    Review,
}

impl OrderStage {
    /// Whether the submission flow may move from `self` to `next`.
    ///
    /// Fast-track orders skip payment collection and go straight from
    /// `Priced` to `Review`.
    pub fn can_advance_to(self, next: OrderStage, fast_track: bool) -> bool {
        use OrderStage::*;
        match (self, next) {
            (Draft, Ready) => true,
            // Any edit invalidates readiness
            (Ready, Draft) => true,
            (Ready, PendingBackendPrice) => true,
            (PendingBackendPrice, Priced) => true,
            (Priced, AwaitingPayment) => !fast_track,
            (Priced, Review) => fast_track,
            (AwaitingPayment, Paid) => true,
            (Paid, Review) => true,
            _ => false,
        }
    }

    /// Whether backend-reconciled figures are authoritative at this stage.
    pub fn is_authoritative(self) -> bool {
        use OrderStage::*;
        matches!(self, Priced | AwaitingPayment | Paid | Review)
    }
}

/// Which source last drove the aggregated totals
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, Default, ToSchema, TS,
)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TotalsSource {
    #[default]
    Estimate,
    Backend,
    Gateway,
}

/// Global billing context shared by every resolution pass
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, TS)]
#[ts(export)]
pub struct BillingContext {
    /// Preferred billing currency, used when a catalog row carries none
    pub currency: Option<String>,
    /// Billing country, auto-detected from the first profile's region
    pub billing_country: Option<String>,
}

/// A user-configured order line item awaiting pricing
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, TS)]
#[ts(export)]
pub struct ServiceProfile {
    #[ts(as = "String")]
    pub id: Uuid,
    pub kind: ServiceKind,
    /// Region code as entered (normalized only at lookup time)
    pub region: String,
    /// Composite tier key selected from the catalog options
    pub tier_key: String,
    /// Term length in months
    pub months: i32,
    /// Instance count (compute) or unit count (storage)
    pub quantity: i32,
    /// Manual unit-price override, kept as the raw user text
    pub price_override: Option<String>,
    /// Compute-only fields, relevant to validation but not pricing math
    pub instance_type: Option<String>,
    pub os_image: Option<String>,
    pub boot_volume_type: Option<String>,
    pub boot_volume_gb: Option<f64>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl ServiceProfile {
    /// Create a new profile from a CreateServiceProfile DTO
    pub fn new(input: CreateServiceProfile) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            kind: input.kind,
            region: input.region,
            tier_key: input.tier_key,
            months: input.months,
            quantity: input.quantity,
            price_override: input.price_override,
            instance_type: input.instance_type,
            os_image: input.os_image,
            boot_volume_type: input.boot_volume_type,
            boot_volume_gb: input.boot_volume_gb,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a field-level edit
    pub fn apply(&mut self, update: UpdateServiceProfile) {
        if let Some(region) = update.region {
            self.region = region;
        }
        if let Some(tier_key) = update.tier_key {
            self.tier_key = tier_key;
        }
        if let Some(months) = update.months {
            self.months = months;
        }
        if let Some(quantity) = update.quantity {
            self.quantity = quantity;
        }
        if let Some(price_override) = update.price_override {
            self.price_override = price_override;
        }
        if let Some(instance_type) = update.instance_type {
            self.instance_type = Some(instance_type);
        }
        if let Some(os_image) = update.os_image {
            self.os_image = Some(os_image);
        }
        if let Some(boot_volume_type) = update.boot_volume_type {
            self.boot_volume_type = Some(boot_volume_type);
        }
        if let Some(boot_volume_gb) = update.boot_volume_gb {
            self.boot_volume_gb = Some(boot_volume_gb);
        }
        self.updated_at = Utc::now();
    }
}

/// DTO for adding a new line item
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema, TS)]
#[ts(export)]
pub struct CreateServiceProfile {
    pub kind: ServiceKind,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub tier_key: String,
    #[serde(default = "default_term")]
    #[validate(range(min = 1))]
    pub months: i32,
    #[serde(default = "default_count")]
    #[validate(range(min = 1))]
    pub quantity: i32,
    pub price_override: Option<String>,
    pub instance_type: Option<String>,
    pub os_image: Option<String>,
    pub boot_volume_type: Option<String>,
    #[validate(range(min = 0.0))]
    pub boot_volume_gb: Option<f64>,
}

impl CreateServiceProfile {
    /// Blank line item of the given kind, edited field by field afterwards
    pub fn blank(kind: ServiceKind) -> Self {
        Self {
            kind,
            region: String::new(),
            tier_key: String::new(),
            months: default_term(),
            quantity: default_count(),
            price_override: None,
            instance_type: None,
            os_image: None,
            boot_volume_type: None,
            boot_volume_gb: None,
        }
    }
}

/// DTO for editing an existing line item
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema, TS)]
#[ts(export)]
pub struct UpdateServiceProfile {
    pub region: Option<String>,
    pub tier_key: Option<String>,
    #[validate(range(min = 1))]
    pub months: Option<i32>,
    #[validate(range(min = 1))]
    pub quantity: Option<i32>,
    /// Outer None leaves the override untouched, inner None clears it
    #[ts(as = "Option<String>")]
    pub price_override: Option<Option<String>>,
    pub instance_type: Option<String>,
    pub os_image: Option<String>,
    pub boot_volume_type: Option<String>,
    #[validate(range(min = 0.0))]
    pub boot_volume_gb: Option<f64>,
}

fn default_term() -> i32 {
    1
}

fn default_count() -> i32 {
    1
}

/// A ServiceProfile after price and currency resolution
///
/// Recomputed from scratch on every resolution pass; carries no identity of
/// its own beyond the source profile id.
#[derive(Debug, Clone, Serialize, ToSchema, TS)]
#[ts(export)]
pub struct ResolvedProfile {
    #[ts(as = "String")]
    pub profile_id: Uuid,
    pub kind: ServiceKind,
    /// Normalized region lookup key
    pub region_key: String,
    pub tier_key: String,
    /// Effective unit price: override, else first positive catalog price, else 0
    pub unit_price: f64,
    pub currency: String,
    pub months: i32,
    pub quantity: i32,
    /// quantity x months x unit_price, never negative
    pub subtotal: f64,
    pub has_tier_data: bool,
    pub override_applied: bool,
    pub is_complete: bool,
    /// Ordered, human-readable missing-field list
    pub missing_fields: Vec<String>,
}

/// Aggregated order-level totals
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema, TS)]
#[ts(export)]
pub struct BillingTotals {
    pub subtotal: f64,
    pub tax: f64,
    /// Explicit upstream rate, or derived from tax/subtotal for display only
    pub tax_rate_percent: Option<f64>,
    pub gateway_fees: f64,
    /// Always subtotal + tax + gateway_fees when that sum is positive
    pub grand_total: f64,
    /// Display currency; never averaged across mismatched inputs
    pub currency: String,
    pub currency_mismatch: bool,
    pub source: TotalsSource,
}

/// Result of one full resolution pass
#[derive(Debug, Clone, Serialize, ToSchema, TS)]
#[ts(export)]
pub struct OrderResolution {
    pub profiles: Vec<ResolvedProfile>,
    pub totals: BillingTotals,
}
