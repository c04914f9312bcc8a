//! Error types for the governance core
//!
//! Every policy check fails closed: unrecognized roles, sensitivities and
//! states surface as typed errors rather than falling back to a default.

use crate::content::ContentId;
use crate::lifecycle::LifecycleState;
use crate::role::Role;

/// Result alias used throughout the crate
pub type Result<T, E = GovernanceError> = std::result::Result<T, E>;

/// Main governance error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GovernanceError {
    /// Role string did not name a known role
    #[error("invalid role: '{0}'")]
    InvalidRole(String),

    /// Sensitivity string did not name a known classification
    #[error("invalid sensitivity: '{0}'")]
    InvalidSensitivity(String),

    /// Lifecycle state string did not name a known state
    #[error("invalid lifecycle state: '{0}'")]
    InvalidState(String),

    /// Requested transition is not in the lifecycle table
    #[error("invalid transition: {from} -> {to}")]
    InvalidTransition {
        /// State the item was in
        from: LifecycleState,
        /// State that was requested
        to: LifecycleState,
    },

    /// Policy check failed for the acting role
    #[error("unauthorized: {role} may not {action}")]
    Unauthorized {
        /// Action that was attempted
        action: &'static str,
        /// Role of the acting principal
        role: Role,
    },

    /// Guarded write lost against a concurrent writer
    #[error("concurrent modification of content {id}")]
    ConcurrentModification {
        /// Item whose write guard failed
        id: ContentId,
    },

    /// No item with this id
    #[error("content not found: {0}")]
    NotFound(ContentId),

    /// Insert of an id that is already stored
    #[error("content already exists: {0}")]
    AlreadyExists(ContentId),

    /// Review cycle must be a positive month count
    #[error("invalid review cycle: {0} months")]
    InvalidReviewCycle(u32),

    /// Item is in a terminal state and cannot be edited
    #[error("content is {0} and can no longer be modified")]
    Immutable(LifecycleState),

    /// Persisted record violates an item invariant
    #[error("invalid content record: {0}")]
    InvalidRecord(String),

    /// Transition history hash chain is broken
    #[error("transition history integrity violation at event {index}")]
    HistoryIntegrity {
        /// Position of the first bad event
        index: usize,
    },

    /// Configuration could not be loaded or is out of range
    #[error("configuration error: {0}")]
    Config(String),
}

impl GovernanceError {
    /// Only write-guard conflicts may be retried with a fresh read
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ConcurrentModification { .. })
    }

    /// Whether the error is a policy denial rather than bad input
    #[inline]
    #[must_use]
    pub fn is_denial(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Create an unauthorized error
    #[inline]
    pub(crate) fn unauthorized(action: &'static str, role: Role) -> Self {
        Self::Unauthorized { action, role }
    }
}
