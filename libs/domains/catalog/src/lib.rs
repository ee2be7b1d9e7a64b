//! Catalog Domain
//!
//! Region-keyed lookup of priced tiers and instance types for the
//! marketplace admin console. Raw pricing rows arrive from the catalog data
//! source with no shape guarantees; this crate normalizes them into an
//! addressable index and provides the lenient extraction helpers shared with
//! the ordering domain.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │    Index    │  ← Region grouping, composite keys, display labels
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Extract   │  ← Ordered candidate extractors, first-positive-wins
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Raw rows, entries, region reference data
//! └─────────────┘
//! ```

pub mod extract;
pub mod index;
pub mod models;

// Re-export commonly used types
pub use index::{CatalogIndex, RegionCatalog, normalize_region_key};
pub use models::{
    CatalogEntry, PricingCatalogRow, RegionDirectory, RegionInfo, TierOption, money_label,
};
