//! Role model and permission table
//!
//! Roles are totally ordered; "minimum role" checks compare ranks.

use crate::error::GovernanceError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// User role, ordered from least to most privileged
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Read-only access to public content
    Visitor,
    /// Authors content and edits what they own or wrote
    Contributor,
    /// Delegated reviewer; approves and rejects submissions
    Steward,
    /// Content owner; may archive and transfer
    Owner,
    /// Unrestricted
    Admin,
}

impl Role {
    /// Every role, lowest rank first
    pub const ALL: [Role; 5] = [
        Role::Visitor,
        Role::Contributor,
        Role::Steward,
        Role::Owner,
        Role::Admin,
    ];

    /// Ordinal rank, `Visitor` = 0
    #[inline]
    #[must_use]
    pub fn rank(self) -> u8 {
        match self {
            Role::Visitor => 0,
            Role::Contributor => 1,
            Role::Steward => 2,
            Role::Owner => 3,
            Role::Admin => 4,
        }
    }

    /// True iff `rank(self) >= rank(required)`
    #[inline]
    #[must_use]
    pub fn at_least(self, required: Role) -> bool {
        self.rank() >= required.rank()
    }

    /// Static permission set granted to this role
    #[must_use]
    pub fn permissions(self) -> &'static [Permission] {
        match self {
            Role::Visitor => &[Permission::ViewPublic],
            Role::Contributor => &[
                Permission::ViewPublic,
                Permission::ViewInternal,
                Permission::CreateContent,
                Permission::EditOwnContent,
                Permission::SubmitForReview,
                Permission::FlagForUpdate,
            ],
            Role::Steward => &[
                Permission::ViewPublic,
                Permission::ViewInternal,
                Permission::ViewRestricted,
                Permission::CreateContent,
                Permission::EditOwnContent,
                Permission::EditAnyContent,
                Permission::SubmitForReview,
                Permission::FlagForUpdate,
                Permission::ApproveContent,
                Permission::RejectContent,
                Permission::AssignSteward,
                Permission::ViewGovernanceDashboard,
            ],
            Role::Owner => &[
                Permission::ViewPublic,
                Permission::ViewInternal,
                Permission::ViewRestricted,
                Permission::CreateContent,
                Permission::EditOwnContent,
                Permission::EditAnyContent,
                Permission::SubmitForReview,
                Permission::FlagForUpdate,
                Permission::ApproveContent,
                Permission::RejectContent,
                Permission::AssignSteward,
                Permission::ViewGovernanceDashboard,
                Permission::ArchiveContent,
                Permission::TransferOwnership,
                Permission::ChangeSensitivity,
            ],
            Role::Admin => &Permission::ALL,
        }
    }

    /// Set membership against [`Role::permissions`]
    #[inline]
    #[must_use]
    pub fn has_permission(self, permission: Permission) -> bool {
        self.permissions().contains(&permission)
    }

    /// Canonical upper-case name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Visitor => "VISITOR",
            Role::Contributor => "CONTRIBUTOR",
            Role::Steward => "STEWARD",
            Role::Owner => "OWNER",
            Role::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = GovernanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "VISITOR" => Ok(Role::Visitor),
            "CONTRIBUTOR" => Ok(Role::Contributor),
            "STEWARD" => Ok(Role::Steward),
            "OWNER" => Ok(Role::Owner),
            "ADMIN" => Ok(Role::Admin),
            _ => Err(GovernanceError::InvalidRole(s.to_string())),
        }
    }
}

/// Actions a role may be granted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Read public content
    ViewPublic,
    /// Read internal content
    ViewInternal,
    /// Read restricted content
    ViewRestricted,
    /// Create new drafts
    CreateContent,
    /// Edit content the user owns or authored
    EditOwnContent,
    /// Edit any content
    EditAnyContent,
    /// Move a draft into review
    SubmitForReview,
    /// Publish reviewed content
    ApproveContent,
    /// Send reviewed content back to draft
    RejectContent,
    /// Mark published content as needing an update
    FlagForUpdate,
    /// Archive or deprecate content
    ArchiveContent,
    /// Reassign content ownership
    TransferOwnership,
    /// Reclassify content sensitivity
    ChangeSensitivity,
    /// Delegate a steward for an item
    AssignSteward,
    /// See governance dashboards
    ViewGovernanceDashboard,
}

impl Permission {
    /// Every permission
    pub const ALL: [Permission; 15] = [
        Permission::ViewPublic,
        Permission::ViewInternal,
        Permission::ViewRestricted,
        Permission::CreateContent,
        Permission::EditOwnContent,
        Permission::EditAnyContent,
        Permission::SubmitForReview,
        Permission::ApproveContent,
        Permission::RejectContent,
        Permission::FlagForUpdate,
        Permission::ArchiveContent,
        Permission::TransferOwnership,
        Permission::ChangeSensitivity,
        Permission::AssignSteward,
        Permission::ViewGovernanceDashboard,
    ];
}

pub(crate) fn normalize(s: &str) -> String {
    s.trim()
        .chars()
        .map(|c| if c == '-' || c == ' ' { '_' } else { c.to_ascii_uppercase() })
        .collect()
}
