//! Content items and the principals acting on them

use crate::error::{GovernanceError, Result};
use crate::lifecycle::LifecycleState;
use crate::review::{self, ReviewCycle, ReviewStatus};
use crate::role::Role;
use crate::sensitivity::Sensitivity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Timestamp type used for every governance date
pub type Timestamp = DateTime<Utc>;

/// Unique content identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentId(pub Uuid);

impl ContentId {
    /// Generate new content ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ContentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique user identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate new user ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Authenticated caller, as verified by the authentication layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal {
    /// Verified user
    pub user_id: UserId,
    /// Role assigned to the user
    pub role: Role,
}

impl Principal {
    /// Create principal
    #[inline]
    #[must_use]
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    /// Whether this principal currently owns the item
    #[inline]
    #[must_use]
    pub fn owns(&self, item: &ContentItem) -> bool {
        item.owner_id == self.user_id
    }

    /// Whether this principal authored the item
    #[inline]
    #[must_use]
    pub fn authored(&self, item: &ContentItem) -> bool {
        item.author_id == self.user_id
    }
}

/// Input for creating a draft
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewContent {
    /// Document title
    pub title: String,
    /// Document body
    pub body: String,
    /// Organizational domain label (Engineering, Operations, ...)
    pub domain: String,
    /// Read classification
    pub sensitivity: Sensitivity,
    /// Months between reviews
    pub review_cycle: ReviewCycle,
}

impl NewContent {
    /// Create input with default classification and a 12 month cycle
    #[must_use]
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            domain: String::new(),
            sensitivity: Sensitivity::default(),
            review_cycle: ReviewCycle::default(),
        }
    }

    /// With domain
    #[inline]
    #[must_use]
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    /// With sensitivity
    #[inline]
    #[must_use]
    pub fn with_sensitivity(mut self, sensitivity: Sensitivity) -> Self {
        self.sensitivity = sensitivity;
        self
    }

    /// With review cycle
    #[inline]
    #[must_use]
    pub fn with_review_cycle(mut self, review_cycle: ReviewCycle) -> Self {
        self.review_cycle = review_cycle;
        self
    }
}

/// A governed document
///
/// Fields are only reachable through accessors. Mutation happens through the
/// lifecycle and governance operations, each of which returns a new copy and
/// bumps `version`. The next review date is always derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ContentRecord", into = "ContentRecord")]
pub struct ContentItem {
    pub(crate) id: ContentId,
    pub(crate) title: String,
    pub(crate) body: String,
    pub(crate) domain: String,
    pub(crate) owner_id: UserId,
    pub(crate) author_id: UserId,
    pub(crate) steward_id: Option<UserId>,
    pub(crate) sensitivity: Sensitivity,
    pub(crate) state: LifecycleState,
    pub(crate) review_cycle: ReviewCycle,
    pub(crate) created_at: Timestamp,
    pub(crate) updated_at: Timestamp,
    pub(crate) last_reviewed_at: Option<Timestamp>,
    pub(crate) published_at: Option<Timestamp>,
    pub(crate) version: u64,
}

impl ContentItem {
    /// Create a draft owned and authored by `author`
    #[must_use]
    pub fn draft(input: NewContent, author: UserId, now: Timestamp) -> Self {
        Self {
            id: ContentId::new(),
            title: input.title,
            body: input.body,
            domain: input.domain,
            owner_id: author,
            author_id: author,
            steward_id: None,
            sensitivity: input.sensitivity,
            state: LifecycleState::INITIAL,
            review_cycle: input.review_cycle,
            created_at: now,
            updated_at: now,
            last_reviewed_at: None,
            published_at: None,
            version: 1,
        }
    }

    /// Identifier
    #[inline]
    #[must_use]
    pub fn id(&self) -> ContentId {
        self.id
    }

    /// Title
    #[inline]
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Body text
    #[inline]
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Domain label
    #[inline]
    #[must_use]
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Current owner
    #[inline]
    #[must_use]
    pub fn owner_id(&self) -> UserId {
        self.owner_id
    }

    /// Original author
    #[inline]
    #[must_use]
    pub fn author_id(&self) -> UserId {
        self.author_id
    }

    /// Delegated steward, if any
    #[inline]
    #[must_use]
    pub fn steward_id(&self) -> Option<UserId> {
        self.steward_id
    }

    /// Read classification
    #[inline]
    #[must_use]
    pub fn sensitivity(&self) -> Sensitivity {
        self.sensitivity
    }

    /// Lifecycle state
    #[inline]
    #[must_use]
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Review cycle
    #[inline]
    #[must_use]
    pub fn review_cycle(&self) -> ReviewCycle {
        self.review_cycle
    }

    /// Creation time
    #[inline]
    #[must_use]
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Time of the last governed mutation
    #[inline]
    #[must_use]
    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Time of the last approval
    #[inline]
    #[must_use]
    pub fn last_reviewed_at(&self) -> Option<Timestamp> {
        self.last_reviewed_at
    }

    /// Time of the last transition into `Published`
    #[inline]
    #[must_use]
    pub fn published_at(&self) -> Option<Timestamp> {
        self.published_at
    }

    /// Write-guard version, starts at 1
    #[inline]
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Derived next review date
    #[must_use]
    pub fn next_review_date(&self) -> Timestamp {
        review::next_review_date(self.last_reviewed_at, self.created_at, self.review_cycle)
    }

    /// Whether review is past due at `now`
    #[inline]
    #[must_use]
    pub fn is_overdue(&self, now: Timestamp) -> bool {
        review::is_overdue(self.next_review_date(), now)
    }

    /// Review classification at `now`
    #[must_use]
    pub fn review_status(&self, now: Timestamp, threshold_days: u32) -> ReviewStatus {
        ReviewStatus::classify(self.next_review_date(), now, threshold_days)
    }

    /// Copy with the bookkeeping of a governed mutation applied
    pub(crate) fn touched(&self, now: Timestamp) -> Self {
        let mut next = self.clone();
        next.updated_at = now;
        next.version += 1;
        next
    }
}

/// Flat persisted shape of a [`ContentItem`]
///
/// This is what the persistence layer reads and writes. Converting back into
/// an item re-checks the invariants a stored row could violate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRecord {
    /// Identifier
    pub id: ContentId,
    /// Title
    pub title: String,
    /// Body text
    pub body: String,
    /// Domain label
    #[serde(default)]
    pub domain: String,
    /// Current owner
    pub owner_id: UserId,
    /// Original author
    pub author_id: UserId,
    /// Delegated steward
    #[serde(default)]
    pub steward_id: Option<UserId>,
    /// Read classification
    pub sensitivity: Sensitivity,
    /// Lifecycle state
    pub state: LifecycleState,
    /// Months between reviews
    pub review_cycle_months: u32,
    /// Creation time
    pub created_at: Timestamp,
    /// Last mutation time
    pub updated_at: Timestamp,
    /// Last approval time
    #[serde(default)]
    pub last_reviewed_at: Option<Timestamp>,
    /// Last publication time
    #[serde(default)]
    pub published_at: Option<Timestamp>,
    /// Write-guard version
    pub version: u64,
}

impl TryFrom<ContentRecord> for ContentItem {
    type Error = GovernanceError;

    fn try_from(record: ContentRecord) -> Result<Self> {
        let review_cycle = ReviewCycle::new(record.review_cycle_months)?;
        if record.version == 0 {
            return Err(GovernanceError::InvalidRecord("version must start at 1".into()));
        }
        if record.state == LifecycleState::Published && record.published_at.is_none() {
            return Err(GovernanceError::InvalidRecord(
                "published content requires published_at".into(),
            ));
        }
        if record.updated_at < record.created_at {
            return Err(GovernanceError::InvalidRecord(
                "updated_at precedes created_at".into(),
            ));
        }
        Ok(Self {
            id: record.id,
            title: record.title,
            body: record.body,
            domain: record.domain,
            owner_id: record.owner_id,
            author_id: record.author_id,
            steward_id: record.steward_id,
            sensitivity: record.sensitivity,
            state: record.state,
            review_cycle,
            created_at: record.created_at,
            updated_at: record.updated_at,
            last_reviewed_at: record.last_reviewed_at,
            published_at: record.published_at,
            version: record.version,
        })
    }
}

impl From<ContentItem> for ContentRecord {
    fn from(item: ContentItem) -> Self {
        Self {
            id: item.id,
            title: item.title,
            body: item.body,
            domain: item.domain,
            owner_id: item.owner_id,
            author_id: item.author_id,
            steward_id: item.steward_id,
            sensitivity: item.sensitivity,
            state: item.state,
            review_cycle_months: item.review_cycle.months(),
            created_at: item.created_at,
            updated_at: item.updated_at,
            last_reviewed_at: item.last_reviewed_at,
            published_at: item.published_at,
            version: item.version,
        }
    }
}
