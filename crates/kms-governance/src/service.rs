//! Governance service
//!
//! Binds the pure policy and lifecycle functions to an injected
//! [`ContentStore`]. Every write is a read, a pure update and a guarded
//! compare-and-swap; a lost race surfaces as
//! [`GovernanceError::ConcurrentModification`].

use crate::actions;
use crate::config::GovernanceConfig;
use crate::content::{ContentId, ContentItem, NewContent, Principal, Timestamp, UserId};
use crate::dashboard::GovernanceSummary;
use crate::error::{GovernanceError, Result};
use crate::history::{Actor, TransitionEvent, TransitionHistory};
use crate::lifecycle::{self, LifecycleState};
use crate::policy::principal_can_read;
use crate::review;
use crate::role::Permission;
use crate::sensitivity::Sensitivity;
use crate::store::ContentStore;

/// Content governance over a store
#[derive(Debug)]
pub struct GovernanceService<S> {
    store: S,
    config: GovernanceConfig,
    history: TransitionHistory,
}

impl<S: ContentStore> GovernanceService<S> {
    /// Create service with default configuration
    #[must_use]
    pub fn new(store: S) -> Self {
        Self::with_config(store, GovernanceConfig::default())
    }

    /// Create service with explicit configuration
    #[must_use]
    pub fn with_config(store: S, config: GovernanceConfig) -> Self {
        Self {
            store,
            config,
            history: TransitionHistory::new(),
        }
    }

    /// Underlying store
    #[inline]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Active configuration
    #[inline]
    pub fn config(&self) -> &GovernanceConfig {
        &self.config
    }

    /// Committed transition log
    #[inline]
    pub fn history(&self) -> &TransitionHistory {
        &self.history
    }

    /// Draft input using the configured default review cycle
    pub fn new_content(&self, title: impl Into<String>, body: impl Into<String>) -> Result<NewContent> {
        Ok(NewContent::new(title, body).with_review_cycle(self.config.default_review_cycle()?))
    }

    /// Create a draft authored and owned by `principal`
    pub fn create(&self, input: NewContent, principal: &Principal, now: Timestamp) -> Result<ContentItem> {
        if !principal.role.has_permission(Permission::CreateContent) {
            return Err(GovernanceError::unauthorized("create content", principal.role));
        }
        let item = ContentItem::draft(input, principal.user_id, now);
        self.store.insert(item.clone())?;
        tracing::info!(content_id = %item.id(), author = %principal.user_id, "draft created");
        Ok(item)
    }

    /// Read an item the principal is allowed to see
    pub fn read(&self, id: ContentId, principal: &Principal) -> Result<ContentItem> {
        let item = self.store.get(id)?;
        if !principal_can_read(principal, &item) {
            return Err(GovernanceError::unauthorized("read content", principal.role));
        }
        Ok(item)
    }

    /// Every item the principal may read
    pub fn list_visible(&self, principal: &Principal) -> Result<Vec<ContentItem>> {
        Ok(self
            .store
            .list()?
            .into_iter()
            .filter(|item| principal_can_read(principal, item))
            .collect())
    }

    /// Transition from a snapshot the caller already holds
    ///
    /// The write only lands if the stored item is still at the snapshot's
    /// state and version.
    pub fn transition_from(
        &self,
        current: &ContentItem,
        target: LifecycleState,
        principal: &Principal,
        now: Timestamp,
    ) -> Result<ContentItem> {
        let updated = lifecycle::transition(current, target, principal, now)?;
        self.commit(current, updated, Actor::from(principal))
    }

    /// Single read-transition-write attempt
    pub fn transition_once(
        &self,
        id: ContentId,
        target: LifecycleState,
        principal: &Principal,
        now: Timestamp,
    ) -> Result<ContentItem> {
        let current = self.store.get(id)?;
        self.transition_from(&current, target, principal, now)
    }

    /// Transition with bounded retry on write-guard conflicts
    ///
    /// Each retry re-reads the item, so a retry can legitimately end in
    /// `InvalidTransition` when the winner already moved it.
    pub fn transition(
        &self,
        id: ContentId,
        target: LifecycleState,
        principal: &Principal,
        now: Timestamp,
    ) -> Result<ContentItem> {
        self.with_retry(id, || self.transition_once(id, target, principal, now))
    }

    /// Move every overdue published item to `NeedsUpdate`
    ///
    /// Items that change underneath the sweep are skipped; the next sweep
    /// picks them up.
    pub fn flag_overdue(&self, now: Timestamp) -> Result<Vec<ContentId>> {
        let mut flagged = Vec::new();
        for item in self.store.list()? {
            let Some(updated) = lifecycle::flag_if_overdue(&item, now) else {
                continue;
            };
            match self.commit(&item, updated, Actor::System) {
                Ok(_) => flagged.push(item.id()),
                Err(e) if e.is_retryable() => {
                    tracing::warn!(content_id = %item.id(), "skipped overdue item changed during sweep");
                }
                Err(e) => return Err(e),
            }
        }
        if !flagged.is_empty() {
            tracing::info!(count = flagged.len(), "flagged overdue content");
        }
        Ok(flagged)
    }

    /// Reassign ownership
    pub fn transfer_ownership(
        &self,
        id: ContentId,
        new_owner: UserId,
        principal: &Principal,
        now: Timestamp,
    ) -> Result<ContentItem> {
        self.mutate(id, principal, |item| actions::transfer_ownership(item, new_owner, principal, now))
    }

    /// Set or clear the steward
    pub fn assign_steward(
        &self,
        id: ContentId,
        steward: Option<UserId>,
        principal: &Principal,
        now: Timestamp,
    ) -> Result<ContentItem> {
        self.mutate(id, principal, |item| actions::assign_steward(item, steward, principal, now))
    }

    /// Reclassify an item
    pub fn change_sensitivity(
        &self,
        id: ContentId,
        sensitivity: Sensitivity,
        principal: &Principal,
        now: Timestamp,
    ) -> Result<ContentItem> {
        self.mutate(id, principal, |item| actions::change_sensitivity(item, sensitivity, principal, now))
    }

    /// Replace title and body
    pub fn update_content(
        &self,
        id: ContentId,
        title: &str,
        body: &str,
        principal: &Principal,
        now: Timestamp,
    ) -> Result<ContentItem> {
        self.mutate(id, principal, |item| actions::update_content(item, title, body, principal, now))
    }

    /// Dashboard counts for the principal
    ///
    /// Needs [`Permission::ViewGovernanceDashboard`].
    pub fn dashboard(&self, principal: &Principal, now: Timestamp) -> Result<GovernanceSummary> {
        if !principal.role.has_permission(Permission::ViewGovernanceDashboard) {
            return Err(GovernanceError::unauthorized("view the governance dashboard", principal.role));
        }
        let items = self.store.list()?;
        Ok(GovernanceSummary::compute(
            &items,
            principal,
            now,
            self.config.due_soon_threshold_days,
        ))
    }

    /// Visible items needing review attention, most urgent first
    pub fn review_queue(&self, principal: &Principal, now: Timestamp) -> Result<Vec<ContentItem>> {
        let items = self.list_visible(principal)?;
        Ok(review::review_queue(&items, now, self.config.due_soon_threshold_days)
            .into_iter()
            .cloned()
            .collect())
    }

    fn commit(&self, current: &ContentItem, updated: ContentItem, actor: Actor) -> Result<ContentItem> {
        let from = current.state();
        if let Err(e) = self
            .store
            .compare_and_swap(from, current.version(), updated.clone())
        {
            if e.is_retryable() {
                tracing::warn!(content_id = %current.id(), version = current.version(), "write guard failed");
            }
            return Err(e);
        }
        if updated.state() != from {
            self.history.append(TransitionEvent::new(
                updated.updated_at(),
                updated.id(),
                actor,
                from,
                updated.state(),
                updated.version(),
            ));
            tracing::info!(content_id = %updated.id(), %from, to = %updated.state(), "transition committed");
        }
        Ok(updated)
    }

    fn mutate<F>(&self, id: ContentId, principal: &Principal, apply: F) -> Result<ContentItem>
    where
        F: Fn(&ContentItem) -> Result<ContentItem>,
    {
        self.with_retry(id, || {
            let current = self.store.get(id)?;
            let updated = apply(&current)?;
            self.commit(&current, updated, Actor::from(principal))
        })
    }

    fn with_retry<F>(&self, id: ContentId, mut attempt: F) -> Result<ContentItem>
    where
        F: FnMut() -> Result<ContentItem>,
    {
        let mut retries = 0;
        loop {
            match attempt() {
                Err(e) if e.is_retryable() && retries < self.config.max_transition_retries => {
                    retries += 1;
                    tracing::debug!(content_id = %id, retries, "retrying after concurrent modification");
                }
                other => return other,
            }
        }
    }
}
