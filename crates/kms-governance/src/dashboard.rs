//! Role-scoped governance summaries

use crate::content::{ContentItem, Principal, Timestamp};
use crate::lifecycle::LifecycleState;
use crate::policy::principal_can_read;
use crate::review::ReviewStatus;
use crate::role::Permission;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Counts shown on a principal's dashboard
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceSummary {
    /// Items the principal may read
    pub total_visible: usize,
    /// Visible items per lifecycle state
    pub by_state: BTreeMap<LifecycleState, usize>,
    /// Live items past their review date
    pub overdue: usize,
    /// Live items inside the warning window
    pub due_soon: usize,
    /// Items in review; only counted for roles that can approve
    pub awaiting_review: usize,
    /// Visible items the principal owns
    pub owned: usize,
}

impl GovernanceSummary {
    /// Summarize `items` as seen by `principal`
    ///
    /// Review urgency only counts for `Published` and `NeedsUpdate` items;
    /// drafts and retired content have no review obligation.
    #[must_use]
    pub fn compute(
        items: &[ContentItem],
        principal: &Principal,
        now: Timestamp,
        threshold_days: u32,
    ) -> Self {
        let mut summary = Self::default();
        for item in items.iter().filter(|item| principal_can_read(principal, item)) {
            summary.total_visible += 1;
            *summary.by_state.entry(item.state()).or_default() += 1;
            if principal.owns(item) {
                summary.owned += 1;
            }
            match item.state() {
                LifecycleState::Published | LifecycleState::NeedsUpdate => {
                    match item.review_status(now, threshold_days) {
                        ReviewStatus::Overdue => summary.overdue += 1,
                        ReviewStatus::DueSoon => summary.due_soon += 1,
                        ReviewStatus::Current => {}
                    }
                }
                LifecycleState::InReview
                    if principal.role.has_permission(Permission::ApproveContent) =>
                {
                    summary.awaiting_review += 1;
                }
                _ => {}
            }
        }
        summary
    }

    /// Visible items in `state`
    #[must_use]
    pub fn count(&self, state: LifecycleState) -> usize {
        self.by_state.get(&state).copied().unwrap_or(0)
    }
}
