//! Engine facade for the host application's controller layer.
//!
//! Holds the line-item store, the current catalog snapshot, the billing
//! context, any upstream echoes, and the submission stage. All pricing math
//! happens in [`resolve`](PricingEngine::resolve), a pure recomputation over
//! the current inputs: the host calls it on every relevant event (profile
//! edit, catalog load, echo arrival) and renders the result. Preventing
//! duplicate submissions while a request is in flight is the caller's
//! concern, as is discarding superseded responses.

use serde_json::Value;
use uuid::Uuid;

use domain_catalog::{CatalogIndex, PricingCatalogRow, RegionDirectory};

use crate::error::{OrderingError, OrderingResult};
use crate::models::{
    BillingContext, CreateServiceProfile, OrderResolution, OrderStage, ServiceProfile,
    UpdateServiceProfile,
};
use crate::projector::{self, OrderSummary};
use crate::resolver::resolve_profile;
use crate::store::ProfileStore;
use crate::upstream::{BackendPricingEcho, GatewayEcho, OrderLineRequest};
use crate::{aggregator, validator};

#[derive(Debug, Default)]
pub struct PricingEngine {
    store: ProfileStore,
    catalog: CatalogIndex,
    regions: RegionDirectory,
    context: BillingContext,
    backend_echo: Option<BackendPricingEcho>,
    gateway_echo: Option<GatewayEcho>,
    stage: OrderStage,
    fast_track: bool,
}

impl PricingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_context(context: BillingContext) -> Self {
        Self {
            context,
            ..Self::default()
        }
    }

    /// Fast-track orders skip payment collection before provisioning;
    /// gating only, pricing math is unaffected.
    pub fn set_fast_track(&mut self, fast_track: bool) {
        self.fast_track = fast_track;
    }

    // ===== Inputs =====

    /// Rebuild the catalog index from freshly fetched rows.
    pub fn set_catalog(&mut self, rows: Vec<PricingCatalogRow>) {
        self.catalog = CatalogIndex::build(rows);
        tracing::debug!(regions = self.catalog.region_count(), "Catalog index rebuilt");
    }

    pub fn set_regions(&mut self, regions: RegionDirectory) {
        self.regions = regions;
    }

    pub fn catalog(&self) -> &CatalogIndex {
        &self.catalog
    }

    pub fn regions(&self) -> &RegionDirectory {
        &self.regions
    }

    /// Record the authoritative breakdown echoed by the order backend.
    pub fn record_backend_pricing(&mut self, payload: &Value) {
        self.backend_echo = Some(BackendPricingEcho::from_value(payload));
    }

    /// Record a payment-gateway status payload; the next resolution pass
    /// reconciles against it.
    pub fn record_gateway_status(&mut self, payload: &Value) {
        self.gateway_echo = Some(GatewayEcho::from_value(payload));
    }

    // ===== Line items =====

    /// Append a new line item. Every existing item must already be
    /// complete.
    pub fn add_profile(&mut self, input: CreateServiceProfile) -> OrderingResult<Uuid> {
        let resolution = self.resolve();
        validator::ensure_can_append(&resolution.profiles)?;
        Ok(self.store.add(input)?.id)
    }

    pub fn update_profile(
        &mut self,
        id: Uuid,
        update: UpdateServiceProfile,
    ) -> OrderingResult<ServiceProfile> {
        self.store.update(id, update)
    }

    pub fn remove_profile(&mut self, id: Uuid) -> OrderingResult<ServiceProfile> {
        self.store.remove(id)
    }

    /// Form reset: drop every line item, echo, and staged progress.
    pub fn reset(&mut self) {
        self.store.reset();
        self.backend_echo = None;
        self.gateway_echo = None;
        self.stage = OrderStage::Draft;
    }

    pub fn profiles(&self) -> &[ServiceProfile] {
        self.store.profiles()
    }

    // ===== Resolution =====

    /// One full pure recomputation over the current inputs.
    ///
    /// Deterministic and idempotent: re-invoking with unchanged inputs
    /// yields an identical resolution.
    pub fn resolve(&self) -> OrderResolution {
        let profiles: Vec<_> = self
            .store
            .profiles()
            .iter()
            .map(|profile| resolve_profile(profile, &self.catalog, &self.context))
            .collect();
        let totals = aggregator::aggregate(
            &profiles,
            self.backend_echo.as_ref(),
            self.gateway_echo.as_ref(),
        );
        OrderResolution { profiles, totals }
    }

    /// Display-ready projection of the current resolution.
    pub fn summary(&self) -> OrderSummary {
        projector::project(
            &self.resolve(),
            &self.catalog,
            &self.regions,
            self.backend_echo.as_ref(),
        )
    }

    /// Request lines for the order-creation API.
    ///
    /// Requires every profile to be complete and priced from a real source:
    /// a tier with no catalog row and no override cannot be submitted.
    pub fn order_lines(&self) -> OrderingResult<Vec<OrderLineRequest>> {
        let resolution = self.resolve();
        validator::ensure_submittable(&resolution.profiles)?;
        for profile in &resolution.profiles {
            if !profile.has_tier_data && !profile.override_applied {
                return Err(OrderingError::UnresolvableCatalogEntry(
                    profile.tier_key.clone(),
                ));
            }
        }
        Ok(resolution.profiles.iter().map(OrderLineRequest::from).collect())
    }

    // ===== Submission flow =====

    pub fn stage(&self) -> OrderStage {
        self.stage
    }

    /// Whether aggregated totals are backend-reconciled rather than local
    /// estimates.
    pub fn totals_are_authoritative(&self) -> bool {
        self.stage.is_authoritative()
    }

    /// Advance the submission flow; the host drives transitions, the core
    /// validates them.
    pub fn advance_stage(&mut self, next: OrderStage) -> OrderingResult<OrderStage> {
        if matches!(next, OrderStage::Ready | OrderStage::PendingBackendPrice) {
            let resolution = self.resolve();
            validator::ensure_submittable(&resolution.profiles)?;
        }
        if !self.stage.can_advance_to(next, self.fast_track) {
            return Err(OrderingError::InvalidTransition {
                from: self.stage,
                to: next,
            });
        }
        tracing::debug!(from = %self.stage, to = %next, "Order stage advanced");
        self.stage = next;
        Ok(self.stage)
    }

    // ===== Reference data =====

    /// Billing country: explicit context wins, else auto-detected from the
    /// first line item's region. Never fails on an empty directory.
    pub fn billing_country(&self) -> Option<String> {
        self.context
            .billing_country
            .clone()
            .or_else(|| {
                self.store
                    .profiles()
                    .first()
                    .and_then(|profile| self.regions.country_for(&profile.region))
            })
    }
}
