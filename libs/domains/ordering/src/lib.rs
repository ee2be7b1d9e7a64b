//! Ordering Domain
//!
//! Order pricing reconciliation engine for the marketplace admin console.
//! Resolves user-configured line items against the current catalog snapshot,
//! validates completeness, and aggregates order totals with multi-source
//! precedence (local estimate, backend echo, payment gateway echo).
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │   Service   │  ← Engine facade, store, submission-stage gating
//! └──────┬──────┘
//!        │
//! ┌──────▼────────────────────────────┐
//! │ Resolver │ Aggregator │ Projector │  ← Pure recomputation per event
//! └──────┬────────────────────────────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Profiles, totals, DTOs, upstream echoes
//! └─────────────┘
//! ```
//!
//! Everything is synchronous: the async boundaries (catalog fetch, order
//! submission, payment polling) live in the host application.

pub mod aggregator;
pub mod error;
pub mod models;
pub mod projector;
pub mod resolver;
pub mod service;
pub mod store;
pub mod upstream;
pub mod validator;

// Re-export commonly used types
pub use error::{OrderingError, OrderingResult};
pub use models::{
    BillingContext, BillingTotals, CreateServiceProfile, OrderResolution, OrderStage,
    ResolvedProfile, ServiceKind, ServiceProfile, TotalsSource, UpdateServiceProfile,
};
pub use projector::{OrderSummary, ProfileSummaryRow, TotalsBlock};
pub use resolver::resolve_profile;
pub use service::PricingEngine;
pub use store::ProfileStore;
pub use upstream::{BackendLineItem, BackendPricingEcho, GatewayEcho, OrderLineRequest};
