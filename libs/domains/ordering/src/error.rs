use thiserror::Error;
use uuid::Uuid;

use crate::models::OrderStage;

/// Result type for ordering operations
pub type OrderingResult<T> = Result<T, OrderingError>;

/// Errors that can occur in the ordering domain
///
/// Numeric resolution never fails: every amount has a defined fallback.
/// Malformed upstream payloads degrade to absent fields instead of erroring.
#[derive(Debug, Error)]
pub enum OrderingError {
    /// A line item is missing fields required for pricing or submission
    #[error("line item {index} is missing required fields: {}", .fields.join(", "))]
    MissingRequiredField { index: usize, fields: Vec<String> },

    /// A tier is selected but no pricing row resolves for it
    #[error("no pricing data for tier: {0}")]
    UnresolvableCatalogEntry(String),

    /// Profile not found in the store
    #[error("profile not found: {0}")]
    ProfileNotFound(Uuid),

    /// The submission flow does not allow this stage change
    #[error("invalid order stage transition: {from} -> {to}")]
    InvalidTransition { from: OrderStage, to: OrderStage },

    /// Invalid input data
    #[error("invalid input: {0}")]
    Validation(#[from] validator::ValidationErrors),
}
