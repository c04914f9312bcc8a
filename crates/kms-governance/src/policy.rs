//! Access and edit policy
//!
//! Pure functions. String-typed entry points parse first and fail closed.

use crate::content::{ContentItem, Principal};
use crate::error::Result;
use crate::role::Role;
use crate::sensitivity::Sensitivity;

/// Whether `role` may read content of `sensitivity`
///
/// Owners and admins always may; everyone else needs the sensitivity's
/// minimum role.
#[must_use]
pub fn can_read(role: Role, sensitivity: Sensitivity, is_owner: bool) -> bool {
    let granted = is_owner || role == Role::Admin || role.at_least(sensitivity.minimum_role());
    tracing::trace!(%role, %sensitivity, is_owner, granted, "read check");
    granted
}

/// [`can_read`] for untyped input; unknown values are errors, never grants
pub fn can_read_raw(role: &str, sensitivity: &str, is_owner: bool) -> Result<bool> {
    let role: Role = role.parse()?;
    let sensitivity: Sensitivity = sensitivity.parse()?;
    Ok(can_read(role, sensitivity, is_owner))
}

/// Whether `role` may modify content
#[must_use]
pub fn can_edit(role: Role, is_owner: bool, is_author: bool) -> bool {
    let granted = match role {
        Role::Admin | Role::Owner | Role::Steward => true,
        Role::Contributor => is_owner || is_author,
        Role::Visitor => false,
    };
    tracing::trace!(%role, is_owner, is_author, granted, "edit check");
    granted
}

/// [`can_edit`] for untyped input
pub fn can_edit_raw(role: &str, is_owner: bool, is_author: bool) -> Result<bool> {
    let role: Role = role.parse()?;
    Ok(can_edit(role, is_owner, is_author))
}

/// [`can_read`] for a principal against a concrete item
#[inline]
#[must_use]
pub fn principal_can_read(principal: &Principal, item: &ContentItem) -> bool {
    can_read(principal.role, item.sensitivity(), principal.owns(item))
}

/// [`can_edit`] for a principal against a concrete item
#[inline]
#[must_use]
pub fn principal_can_edit(principal: &Principal, item: &ContentItem) -> bool {
    can_edit(principal.role, principal.owns(item), principal.authored(item))
}

/// Items from `items` the principal may read
#[must_use]
pub fn visible_to<'a>(principal: &Principal, items: &'a [ContentItem]) -> Vec<&'a ContentItem> {
    items
        .iter()
        .filter(|item| principal_can_read(principal, item))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GovernanceError;
    use crate::role::Permission;

    #[test]
    fn restricted_is_hidden_from_contributors() {
        assert!(!can_read(Role::Contributor, Sensitivity::Restricted, false));
    }

    #[test]
    fn restricted_is_visible_to_stewards() {
        assert!(can_read(Role::Steward, Sensitivity::Restricted, false));
    }

    #[test]
    fn owner_always_reads() {
        for role in Role::ALL {
            for sensitivity in Sensitivity::ALL {
                assert!(can_read(role, sensitivity, true));
            }
        }
    }

    #[test]
    fn visitor_reads_only_public() {
        assert!(can_read(Role::Visitor, Sensitivity::Public, false));
        assert!(!can_read(Role::Visitor, Sensitivity::Internal, false));
        assert!(!can_read(Role::Visitor, Sensitivity::Restricted, false));
    }

    #[test]
    fn edit_table() {
        for (owner, author) in [(false, false), (true, false), (false, true), (true, true)] {
            assert!(can_edit(Role::Admin, owner, author));
            assert!(can_edit(Role::Owner, owner, author));
            assert!(can_edit(Role::Steward, owner, author));
            assert_eq!(can_edit(Role::Contributor, owner, author), owner || author);
            assert!(!can_edit(Role::Visitor, owner, author));
        }
    }

    #[test]
    fn read_rule_agrees_with_view_permissions() {
        for role in Role::ALL {
            for sensitivity in Sensitivity::ALL {
                assert_eq!(
                    can_read(role, sensitivity, false),
                    role.has_permission(sensitivity.view_permission()),
                    "{role} reading {sensitivity}"
                );
            }
        }
    }

    #[test]
    fn edit_rule_agrees_with_edit_permissions() {
        for role in Role::ALL {
            let any = role.has_permission(Permission::EditAnyContent);
            let own = any || role.has_permission(Permission::EditOwnContent);
            assert_eq!(can_edit(role, false, false), any, "{role}");
            assert_eq!(can_edit(role, true, false), own, "{role}");
            assert_eq!(can_edit(role, false, true), own, "{role}");
        }
    }

    #[test]
    fn raw_checks_fail_closed() {
        assert_eq!(
            can_read_raw("guest", "PUBLIC", true),
            Err(GovernanceError::InvalidRole("guest".into()))
        );
        assert_eq!(
            can_read_raw("ADMIN", "top-secret", false),
            Err(GovernanceError::InvalidSensitivity("top-secret".into()))
        );
        assert_eq!(can_read_raw("steward", "restricted", false), Ok(true));
        assert!(can_edit_raw("root", true, true).is_err());
        assert_eq!(can_edit_raw("contributor", false, true), Ok(true));
    }
}
