//! Sensitivity classification

use crate::error::GovernanceError;
use crate::role::{normalize, Permission, Role};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Read-access classification of a content item
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sensitivity {
    /// Anyone may read
    Public,
    /// Contributors and above
    #[default]
    Internal,
    /// Stewards and above
    Restricted,
}

impl Sensitivity {
    /// Every classification
    pub const ALL: [Sensitivity; 3] = [
        Sensitivity::Public,
        Sensitivity::Internal,
        Sensitivity::Restricted,
    ];

    /// Lowest role that may read content of this classification
    #[inline]
    #[must_use]
    pub fn minimum_role(self) -> Role {
        match self {
            Sensitivity::Public => Role::Visitor,
            Sensitivity::Internal => Role::Contributor,
            Sensitivity::Restricted => Role::Steward,
        }
    }

    /// Permission that grants read access without ownership
    #[must_use]
    pub fn view_permission(self) -> Permission {
        match self {
            Sensitivity::Public => Permission::ViewPublic,
            Sensitivity::Internal => Permission::ViewInternal,
            Sensitivity::Restricted => Permission::ViewRestricted,
        }
    }

    /// Canonical upper-case name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Sensitivity::Public => "PUBLIC",
            Sensitivity::Internal => "INTERNAL",
            Sensitivity::Restricted => "RESTRICTED",
        }
    }
}

impl fmt::Display for Sensitivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sensitivity {
    type Err = GovernanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "PUBLIC" => Ok(Sensitivity::Public),
            "INTERNAL" => Ok(Sensitivity::Internal),
            "RESTRICTED" => Ok(Sensitivity::Restricted),
            _ => Err(GovernanceError::InvalidSensitivity(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimum_roles() {
        assert_eq!(Sensitivity::Public.minimum_role(), Role::Visitor);
        assert_eq!(Sensitivity::Internal.minimum_role(), Role::Contributor);
        assert_eq!(Sensitivity::Restricted.minimum_role(), Role::Steward);
    }

    #[test]
    fn unknown_sensitivity_is_rejected() {
        assert_eq!(
            "secret".parse::<Sensitivity>(),
            Err(GovernanceError::InvalidSensitivity("secret".into()))
        );
        assert_eq!("restricted".parse::<Sensitivity>(), Ok(Sensitivity::Restricted));
    }
}
