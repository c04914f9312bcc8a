//! Review scheduling
//!
//! Review dates use calendar-month arithmetic. When the target month is
//! shorter than the source day, the date clamps to the last day of that month
//! (Jan 31 + 1 month = Feb 28/29).

use crate::content::{ContentItem, Timestamp};
use crate::error::{GovernanceError, Result};
use crate::lifecycle::LifecycleState;
use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default cycle for new content
pub const DEFAULT_REVIEW_CYCLE_MONTHS: u32 = 12;

/// Default window for "due soon"
pub const DEFAULT_DUE_SOON_DAYS: u32 = 7;

/// Positive number of months between reviews
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct ReviewCycle(u32);

impl ReviewCycle {
    /// Create cycle, rejecting zero
    pub fn new(months: u32) -> Result<Self> {
        if months == 0 {
            return Err(GovernanceError::InvalidReviewCycle(months));
        }
        Ok(Self(months))
    }

    /// Month count
    #[inline]
    #[must_use]
    pub fn months(self) -> u32 {
        self.0
    }
}

impl Default for ReviewCycle {
    fn default() -> Self {
        Self(DEFAULT_REVIEW_CYCLE_MONTHS)
    }
}

impl TryFrom<u32> for ReviewCycle {
    type Error = GovernanceError;

    fn try_from(months: u32) -> Result<Self> {
        Self::new(months)
    }
}

impl From<ReviewCycle> for u32 {
    fn from(cycle: ReviewCycle) -> Self {
        cycle.0
    }
}

impl fmt::Display for ReviewCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} months", self.0)
    }
}

/// Add `cycle` months to the later of `last_reviewed_at` and `created_at`
///
/// Saturates at the maximum representable date.
#[must_use]
pub fn next_review_date(
    last_reviewed_at: Option<Timestamp>,
    created_at: Timestamp,
    cycle: ReviewCycle,
) -> Timestamp {
    let base = last_reviewed_at.map_or(created_at, |reviewed| reviewed.max(created_at));
    base.checked_add_months(Months::new(cycle.months()))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// `now > next_review`
#[inline]
#[must_use]
pub fn is_overdue(next_review: Timestamp, now: Timestamp) -> bool {
    now > next_review
}

/// Not overdue and due within `threshold_days`
#[must_use]
pub fn is_due_soon(next_review: Timestamp, now: Timestamp, threshold_days: u32) -> bool {
    !is_overdue(next_review, now)
        && next_review.signed_duration_since(now) <= Duration::days(i64::from(threshold_days))
}

/// Review urgency of an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    /// Next review is outside the warning window
    Current,
    /// Next review falls within the warning window
    DueSoon,
    /// Next review has passed
    Overdue,
}

impl ReviewStatus {
    /// Classify a next review date relative to `now`
    #[must_use]
    pub fn classify(next_review: Timestamp, now: Timestamp, threshold_days: u32) -> Self {
        if is_overdue(next_review, now) {
            ReviewStatus::Overdue
        } else if is_due_soon(next_review, now, threshold_days) {
            ReviewStatus::DueSoon
        } else {
            ReviewStatus::Current
        }
    }
}

/// Items needing governance attention, most urgent first
///
/// Includes everything already flagged `NeedsUpdate` and every `Published`
/// item that is overdue or due soon.
#[must_use]
pub fn review_queue(items: &[ContentItem], now: Timestamp, threshold_days: u32) -> Vec<&ContentItem> {
    let mut queue: Vec<&ContentItem> = items
        .iter()
        .filter(|item| match item.state() {
            LifecycleState::NeedsUpdate => true,
            LifecycleState::Published => {
                item.review_status(now, threshold_days) != ReviewStatus::Current
            }
            LifecycleState::Draft
            | LifecycleState::InReview
            | LifecycleState::Archived
            | LifecycleState::Deprecated => false,
        })
        .collect();
    queue.sort_by_key(|item| item.next_review_date());
    queue
}
