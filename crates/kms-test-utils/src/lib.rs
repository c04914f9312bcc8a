//! Testing utilities for the KMS workspace
//!
//! Shared fixtures: fixed timestamps, principals and items pinned to a
//! lifecycle state.

#![allow(missing_docs)]

use chrono::{TimeZone, Utc};
use kms_governance::{
    ContentId, ContentItem, ContentRecord, ContentStore, InMemoryStore, LifecycleState,
    Principal, Role, Sensitivity, Timestamp, UserId,
};

pub fn at(year: i32, month: u32, day: u32) -> Timestamp {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
}

pub fn principal(role: Role) -> Principal {
    Principal::new(UserId::new(), role)
}

/// Builder for items in arbitrary states, going through the record path the
/// persistence layer uses
#[derive(Debug, Clone)]
pub struct ItemFixture {
    record: ContentRecord,
}

impl ItemFixture {
    pub fn new(owner: UserId) -> Self {
        let created = at(2023, 1, 1);
        Self {
            record: ContentRecord {
                id: ContentId::new(),
                title: "Fixture SOP".into(),
                body: "1. Do the thing".into(),
                domain: "Engineering".into(),
                owner_id: owner,
                author_id: owner,
                steward_id: None,
                sensitivity: Sensitivity::Internal,
                state: LifecycleState::Draft,
                review_cycle_months: 12,
                created_at: created,
                updated_at: created,
                last_reviewed_at: None,
                published_at: None,
                version: 1,
            },
        }
    }

    pub fn author(mut self, author: UserId) -> Self {
        self.record.author_id = author;
        self
    }

    pub fn sensitivity(mut self, sensitivity: Sensitivity) -> Self {
        self.record.sensitivity = sensitivity;
        self
    }

    pub fn created(mut self, created: Timestamp) -> Self {
        self.record.created_at = created;
        self.record.updated_at = created;
        self
    }

    pub fn review_cycle(mut self, months: u32) -> Self {
        self.record.review_cycle_months = months;
        self
    }

    /// Published items without a `reviewed` stamp count as published at
    /// creation
    pub fn state(mut self, state: LifecycleState) -> Self {
        self.record.state = state;
        if state == LifecycleState::Published && self.record.published_at.is_none() {
            self.record.published_at = Some(self.record.created_at);
        }
        self
    }

    pub fn reviewed(mut self, reviewed: Timestamp) -> Self {
        self.record.last_reviewed_at = Some(reviewed);
        self.record.published_at = Some(reviewed);
        if self.record.updated_at < reviewed {
            self.record.updated_at = reviewed;
        }
        self
    }

    pub fn build(self) -> ContentItem {
        ContentItem::try_from(self.record).unwrap()
    }
}

pub fn item_in(state: LifecycleState, owner: UserId) -> ContentItem {
    ItemFixture::new(owner).state(state).build()
}

pub fn seeded_store(items: impl IntoIterator<Item = ContentItem>) -> InMemoryStore {
    let store = InMemoryStore::new();
    for item in items {
        store.insert(item).unwrap();
    }
    store
}
