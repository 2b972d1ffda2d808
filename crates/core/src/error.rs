use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// A lifecycle intent was issued against a video whose state does not
    /// satisfy the intent's precondition. No mutation took place.
    #[error("Invalid transition: cannot {intent} a video that is '{status}'")]
    InvalidTransition {
        intent: &'static str,
        status: &'static str,
    },

    /// The remote store rejected or failed a call. Local state is left at
    /// the last known good value; the caller may retry.
    #[error("Store failure: {0}")]
    StoreFailure(String),

    /// Stored data broke an invariant the domain relies on.
    #[error("Internal error: {0}")]
    Internal(String),
}
