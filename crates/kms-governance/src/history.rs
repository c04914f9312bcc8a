//! Append-only, hash-chained record of committed lifecycle transitions

use crate::content::{ContentId, Principal, Timestamp, UserId};
use crate::error::{GovernanceError, Result};
use crate::lifecycle::LifecycleState;
use crate::role::Role;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Unique event identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub Uuid);

impl EventId {
    /// Generate new event ID
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

/// Who drove a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Actor {
    /// An authenticated user
    User {
        /// Acting user
        user_id: UserId,
        /// Role at the time of the action
        role: Role,
    },
    /// The review scheduler
    System,
}

impl From<&Principal> for Actor {
    fn from(principal: &Principal) -> Self {
        Actor::User {
            user_id: principal.user_id,
            role: principal.role,
        }
    }
}

impl Actor {
    fn digest_into(&self, hasher: &mut Sha256) {
        match self {
            Actor::User { user_id, role } => {
                hasher.update([1]);
                hasher.update(user_id.0.as_bytes());
                hasher.update([role.rank()]);
            }
            Actor::System => hasher.update([0]),
        }
    }
}

/// One committed transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionEvent {
    /// Event identifier
    pub event_id: EventId,
    /// Commit time
    pub timestamp: Timestamp,
    /// Item that moved
    pub content_id: ContentId,
    /// Who moved it
    pub actor: Actor,
    /// Prior state
    pub from: LifecycleState,
    /// New state
    pub to: LifecycleState,
    /// Item version after the commit
    pub version: u64,
    /// Hash of the preceding event, zero for the first
    pub prev_hash: [u8; 32],
    /// Hash of this event
    pub hash: [u8; 32],
}

impl TransitionEvent {
    /// Build an unchained event; `append` fills in the hashes
    #[must_use]
    pub fn new(
        timestamp: Timestamp,
        content_id: ContentId,
        actor: Actor,
        from: LifecycleState,
        to: LifecycleState,
        version: u64,
    ) -> Self {
        Self {
            event_id: EventId::new(),
            timestamp,
            content_id,
            actor,
            from,
            to,
            version,
            prev_hash: [0u8; 32],
            hash: [0u8; 32],
        }
    }

    /// Hex form of `hash`
    #[must_use]
    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash)
    }
}

/// In-process transition log
#[derive(Debug, Default)]
pub struct TransitionHistory {
    inner: Mutex<Vec<TransitionEvent>>,
}

impl TransitionHistory {
    /// Create empty history
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Chain and store an event
    pub fn append(&self, mut event: TransitionEvent) -> EventId {
        let mut guard = self.inner.lock();
        event.prev_hash = guard.last().map_or([0u8; 32], |e| e.hash);
        event.hash = compute_hash(&event);
        let id = event.event_id;
        guard.push(event);
        id
    }

    /// Snapshot of every event
    #[must_use]
    pub fn events(&self) -> Vec<TransitionEvent> {
        self.inner.lock().clone()
    }

    /// Events for one item in version order
    ///
    /// Commits to the same item can reach the log out of order when two
    /// writers race between the guarded write and the append; the item
    /// version is authoritative.
    #[must_use]
    pub fn events_for(&self, content_id: ContentId) -> Vec<TransitionEvent> {
        let mut events: Vec<TransitionEvent> = self
            .inner
            .lock()
            .iter()
            .filter(|e| e.content_id == content_id)
            .cloned()
            .collect();
        events.sort_by_key(|e| e.version);
        events
    }

    /// Number of events
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Whether nothing has been recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Recompute the chain
    pub fn verify_integrity(&self) -> Result<()> {
        verify_chain(&self.inner.lock())
    }
}

/// Check hashes and links of an exported chain
pub fn verify_chain(events: &[TransitionEvent]) -> Result<()> {
    let mut prev = [0u8; 32];
    for (index, e) in events.iter().enumerate() {
        if e.prev_hash != prev || e.hash != compute_hash(e) {
            return Err(GovernanceError::HistoryIntegrity { index });
        }
        prev = e.hash;
    }
    Ok(())
}

fn compute_hash(event: &TransitionEvent) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(event.event_id.0.as_bytes());
    hasher.update(event.timestamp.timestamp_micros().to_le_bytes());
    hasher.update(event.content_id.0.as_bytes());
    event.actor.digest_into(&mut hasher);
    hasher.update(event.from.as_str().as_bytes());
    hasher.update([0]);
    hasher.update(event.to.as_str().as_bytes());
    hasher.update([0]);
    hasher.update(event.version.to_le_bytes());
    hasher.update(event.prev_hash);
    hasher.finalize().into()
}
