//! KMS Governance (kms-governance)
//!
//! Decides who may see, create, modify, approve and publish a content item,
//! and how the item's status evolves over its lifecycle:
//! - **Role model** and permission table
//! - **Access policy** gating reads by sensitivity
//! - **Edit policy** gating writes by role, ownership and authorship
//! - **Lifecycle state machine** with per-edge authorization
//! - **Review scheduling** with calendar-month cycles
//!
//! Persistence is injected through [`ContentStore`]; the crate holds no
//! process-wide state.
//!
//! # Quick Start
//!
//! ```rust
//! use kms_governance::prelude::*;
//! use chrono::Utc;
//!
//! let service = GovernanceService::new(InMemoryStore::new());
//! let author = Principal::new(UserId::new(), Role::Contributor);
//! let steward = Principal::new(UserId::new(), Role::Steward);
//!
//! let input = service.new_content("Incident SOP", "1. Page on-call").unwrap();
//! let item = service.create(input, &author, Utc::now()).unwrap();
//! service.transition(item.id(), LifecycleState::InReview, &author, Utc::now()).unwrap();
//! let live = service.transition(item.id(), LifecycleState::Published, &steward, Utc::now()).unwrap();
//! assert!(live.published_at().is_some());
//! ```

// Core modules
pub mod actions;
pub mod config;
pub mod content;
pub mod dashboard;
pub mod error;
pub mod history;
pub mod lifecycle;
pub mod policy;
pub mod review;
pub mod role;
pub mod sensitivity;
pub mod service;
pub mod store;

// Re-exports
pub use config::GovernanceConfig;
pub use content::{ContentId, ContentItem, ContentRecord, NewContent, Principal, Timestamp, UserId};
pub use dashboard::GovernanceSummary;
pub use error::{GovernanceError, Result};
pub use history::{Actor, TransitionEvent, TransitionHistory};
pub use lifecycle::{allowed_transitions, transition, validate_transition, LifecycleState, TransitionKind};
pub use policy::{can_edit, can_read};
pub use review::{is_due_soon, is_overdue, next_review_date, ReviewCycle, ReviewStatus};
pub use role::{Permission, Role};
pub use sensitivity::Sensitivity;
pub use service::GovernanceService;
pub use store::{ContentStore, InMemoryStore};

/// Common imports
pub mod prelude {
    pub use crate::{
        can_edit, can_read, ContentId, ContentItem, ContentStore, GovernanceConfig,
        GovernanceError, GovernanceService, InMemoryStore, LifecycleState, NewContent, Principal,
        ReviewCycle, Role, Sensitivity, UserId,
    };
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
