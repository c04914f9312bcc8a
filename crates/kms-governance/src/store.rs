//! Persistence seam
//!
//! The governance core never owns a database handle. Callers inject a
//! [`ContentStore`]; the only write it needs is a guarded compare-and-swap.

use crate::content::{ContentId, ContentItem};
use crate::error::{GovernanceError, Result};
use crate::lifecycle::LifecycleState;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Content record storage
///
/// Implementations backed by SQL express `compare_and_swap` as
/// `UPDATE ... WHERE id = $1 AND state = $2 AND version = $3` and report zero
/// affected rows as [`GovernanceError::ConcurrentModification`].
pub trait ContentStore: Send + Sync {
    /// Store a new item; fails if the id is taken
    fn insert(&self, item: ContentItem) -> Result<()>;

    /// Current committed copy of an item
    fn get(&self, id: ContentId) -> Result<ContentItem>;

    /// Every stored item
    fn list(&self) -> Result<Vec<ContentItem>>;

    /// Replace the stored item iff it is still at `expected_state` and
    /// `expected_version`
    fn compare_and_swap(
        &self,
        expected_state: LifecycleState,
        expected_version: u64,
        updated: ContentItem,
    ) -> Result<()>;
}

/// Process-local store
#[derive(Debug, Default)]
pub struct InMemoryStore {
    items: RwLock<HashMap<ContentId, ContentItem>>,
}

impl InMemoryStore {
    /// Create empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored items
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    /// Whether the store is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }
}

impl ContentStore for InMemoryStore {
    fn insert(&self, item: ContentItem) -> Result<()> {
        let mut items = self.items.write();
        if items.contains_key(&item.id()) {
            return Err(GovernanceError::AlreadyExists(item.id()));
        }
        items.insert(item.id(), item);
        Ok(())
    }

    fn get(&self, id: ContentId) -> Result<ContentItem> {
        self.items
            .read()
            .get(&id)
            .cloned()
            .ok_or(GovernanceError::NotFound(id))
    }

    fn list(&self) -> Result<Vec<ContentItem>> {
        let mut all: Vec<ContentItem> = self.items.read().values().cloned().collect();
        all.sort_by_key(|item| (item.created_at(), item.id()));
        Ok(all)
    }

    fn compare_and_swap(
        &self,
        expected_state: LifecycleState,
        expected_version: u64,
        updated: ContentItem,
    ) -> Result<()> {
        let id = updated.id();
        let mut items = self.items.write();
        let current = items.get_mut(&id).ok_or(GovernanceError::NotFound(id))?;

        if current.state() != expected_state || current.version() != expected_version {
            return Err(GovernanceError::ConcurrentModification { id });
        }
        if current.author_id() != updated.author_id() {
            return Err(GovernanceError::InvalidRecord("author is immutable".into()));
        }
        *current = updated;
        Ok(())
    }
}
