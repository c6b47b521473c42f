use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// A client-side capability the action depends on is missing
    /// (e.g. WhatsApp is not installed on the device).
    #[error("Capability unavailable: {0}")]
    CapabilityUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
