//! Content lifecycle state machine
//!
//! ```text
//! DRAFT -> IN_REVIEW -> PUBLISHED -> NEEDS_UPDATE -> IN_REVIEW
//!            |                |              |
//!            v                +--------------+--> ARCHIVED | DEPRECATED
//!          DRAFT
//! ```
//!
//! Every edge carries its own permission. A pair of states with no edge is an
//! [`GovernanceError::InvalidTransition`] for every caller. A legal edge is
//! only open to principals who can read the item.

use crate::content::{ContentItem, Principal, Timestamp};
use crate::error::{GovernanceError, Result};
use crate::policy::{principal_can_edit, principal_can_read};
use crate::role::{normalize, Permission};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Governance status of a content item
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifecycleState {
    /// Being written
    Draft,
    /// Submitted, awaiting a reviewer
    InReview,
    /// Approved and live
    Published,
    /// Published but flagged for revision
    NeedsUpdate,
    /// Retired, kept for record
    Archived,
    /// Retired and superseded
    Deprecated,
}

impl LifecycleState {
    /// State of every new item
    pub const INITIAL: LifecycleState = LifecycleState::Draft;

    /// Every state
    pub const ALL: [LifecycleState; 6] = [
        LifecycleState::Draft,
        LifecycleState::InReview,
        LifecycleState::Published,
        LifecycleState::NeedsUpdate,
        LifecycleState::Archived,
        LifecycleState::Deprecated,
    ];

    /// No outbound transitions
    #[inline]
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, LifecycleState::Archived | LifecycleState::Deprecated)
    }

    /// Canonical upper-case name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LifecycleState::Draft => "DRAFT",
            LifecycleState::InReview => "IN_REVIEW",
            LifecycleState::Published => "PUBLISHED",
            LifecycleState::NeedsUpdate => "NEEDS_UPDATE",
            LifecycleState::Archived => "ARCHIVED",
            LifecycleState::Deprecated => "DEPRECATED",
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LifecycleState {
    type Err = GovernanceError;

    fn from_str(s: &str) -> Result<Self> {
        match normalize(s).as_str() {
            "DRAFT" => Ok(LifecycleState::Draft),
            "IN_REVIEW" => Ok(LifecycleState::InReview),
            "PUBLISHED" => Ok(LifecycleState::Published),
            "NEEDS_UPDATE" => Ok(LifecycleState::NeedsUpdate),
            "ARCHIVED" => Ok(LifecycleState::Archived),
            "DEPRECATED" => Ok(LifecycleState::Deprecated),
            _ => Err(GovernanceError::InvalidState(s.to_string())),
        }
    }
}

/// Named edge of the lifecycle graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    /// `DRAFT -> IN_REVIEW`
    Submit,
    /// `IN_REVIEW -> PUBLISHED`
    Approve,
    /// `IN_REVIEW -> DRAFT`
    Reject,
    /// `PUBLISHED -> NEEDS_UPDATE`
    FlagForUpdate,
    /// `NEEDS_UPDATE -> IN_REVIEW`
    Resubmit,
    /// `PUBLISHED | NEEDS_UPDATE -> ARCHIVED`
    Archive,
    /// `PUBLISHED | NEEDS_UPDATE -> DEPRECATED`
    Deprecate,
}

impl TransitionKind {
    /// Edge connecting `from` to `to`, if there is one
    #[must_use]
    pub fn between(from: LifecycleState, to: LifecycleState) -> Option<Self> {
        match (from, to) {
            (LifecycleState::Draft, LifecycleState::InReview) => Some(TransitionKind::Submit),
            (LifecycleState::InReview, LifecycleState::Published) => Some(TransitionKind::Approve),
            (LifecycleState::InReview, LifecycleState::Draft) => Some(TransitionKind::Reject),
            (LifecycleState::Published, LifecycleState::NeedsUpdate) => {
                Some(TransitionKind::FlagForUpdate)
            }
            (LifecycleState::NeedsUpdate, LifecycleState::InReview) => {
                Some(TransitionKind::Resubmit)
            }
            (
                LifecycleState::Published | LifecycleState::NeedsUpdate,
                LifecycleState::Archived,
            ) => Some(TransitionKind::Archive),
            (
                LifecycleState::Published | LifecycleState::NeedsUpdate,
                LifecycleState::Deprecated,
            ) => Some(TransitionKind::Deprecate),
            _ => None,
        }
    }

    /// Action phrase used in authorization errors
    #[must_use]
    pub fn action(self) -> &'static str {
        match self {
            TransitionKind::Submit => "submit content for review",
            TransitionKind::Approve => "approve content",
            TransitionKind::Reject => "reject content",
            TransitionKind::FlagForUpdate => "flag content for update",
            TransitionKind::Resubmit => "resubmit content",
            TransitionKind::Archive => "archive content",
            TransitionKind::Deprecate => "deprecate content",
        }
    }

    /// Permission a role needs to take this edge
    #[must_use]
    pub fn required_permission(self) -> Permission {
        match self {
            TransitionKind::Submit | TransitionKind::Resubmit => Permission::SubmitForReview,
            TransitionKind::Approve => Permission::ApproveContent,
            TransitionKind::Reject => Permission::RejectContent,
            TransitionKind::FlagForUpdate => Permission::FlagForUpdate,
            TransitionKind::Archive | TransitionKind::Deprecate => Permission::ArchiveContent,
        }
    }

    /// Edges reserved for principals who may edit the item
    fn needs_edit_rights(self) -> bool {
        matches!(
            self,
            TransitionKind::Submit | TransitionKind::Resubmit | TransitionKind::FlagForUpdate
        )
    }

    fn authorized(self, item: &ContentItem, principal: &Principal) -> bool {
        principal_can_read(principal, item)
            && principal.role.has_permission(self.required_permission())
            && (!self.needs_edit_rights() || principal_can_edit(principal, item))
    }
}

/// Check that `from -> to` is an edge of the lifecycle graph
pub fn validate_transition(from: LifecycleState, to: LifecycleState) -> Result<TransitionKind> {
    TransitionKind::between(from, to).ok_or(GovernanceError::InvalidTransition { from, to })
}

/// States reachable from `from` in one step
#[must_use]
pub fn allowed_transitions(from: LifecycleState) -> Vec<LifecycleState> {
    LifecycleState::ALL
        .into_iter()
        .filter(|to| TransitionKind::between(from, *to).is_some())
        .collect()
}

/// Apply a transition to a copy of `item`
///
/// Checks the edge exists, then that `principal` may read the item and holds
/// the edge's permission, then stamps the copy. Approval sets both
/// `published_at` and `last_reviewed_at` to `now`. Being overdue grants
/// nothing here; the time-triggered flag is [`flag_if_overdue`].
/// `item` itself is never modified.
pub fn transition(
    item: &ContentItem,
    target: LifecycleState,
    principal: &Principal,
    now: Timestamp,
) -> Result<ContentItem> {
    let kind = validate_transition(item.state(), target)?;
    if !kind.authorized(item, principal) {
        tracing::debug!(
            content_id = %item.id(),
            role = %principal.role,
            action = kind.action(),
            "transition denied"
        );
        return Err(GovernanceError::unauthorized(kind.action(), principal.role));
    }

    let mut next = item.touched(now);
    next.state = target;
    if kind == TransitionKind::Approve {
        next.published_at = Some(now);
        next.last_reviewed_at = Some(now);
    }
    Ok(next)
}

/// Time-triggered `PUBLISHED -> NEEDS_UPDATE`
///
/// Returns `None` when the item is not published or not yet overdue.
#[must_use]
pub fn flag_if_overdue(item: &ContentItem, now: Timestamp) -> Option<ContentItem> {
    if item.state() != LifecycleState::Published || !item.is_overdue(now) {
        return None;
    }
    let mut next = item.touched(now);
    next.state = LifecycleState::NeedsUpdate;
    Some(next)
}
