//! Governance actions outside the lifecycle graph
//!
//! Ownership, stewardship, classification and body edits. Like
//! [`crate::lifecycle::transition`], each returns an updated copy and leaves
//! the input untouched, and none is open to a principal who cannot read the
//! item.

use crate::content::{ContentItem, Principal, Timestamp, UserId};
use crate::error::{GovernanceError, Result};
use crate::policy::{principal_can_edit, principal_can_read};
use crate::role::Permission;
use crate::sensitivity::Sensitivity;

fn ensure_mutable(item: &ContentItem) -> Result<()> {
    if item.state().is_terminal() {
        return Err(GovernanceError::Immutable(item.state()));
    }
    Ok(())
}

fn ensure_visible(item: &ContentItem, principal: &Principal, action: &'static str) -> Result<()> {
    if !principal_can_read(principal, item) {
        return Err(GovernanceError::unauthorized(action, principal.role));
    }
    Ok(())
}

/// Hand ownership to `new_owner`
///
/// The current owner may give the item away; otherwise the role needs
/// [`Permission::TransferOwnership`].
pub fn transfer_ownership(
    item: &ContentItem,
    new_owner: UserId,
    principal: &Principal,
    now: Timestamp,
) -> Result<ContentItem> {
    ensure_mutable(item)?;
    ensure_visible(item, principal, "transfer ownership")?;
    if !principal.owns(item) && !principal.role.has_permission(Permission::TransferOwnership) {
        return Err(GovernanceError::unauthorized("transfer ownership", principal.role));
    }
    let mut next = item.touched(now);
    next.owner_id = new_owner;
    tracing::info!(content_id = %item.id(), from = %item.owner_id(), to = %new_owner, "ownership transferred");
    Ok(next)
}

/// Set or clear the delegated steward
pub fn assign_steward(
    item: &ContentItem,
    steward: Option<UserId>,
    principal: &Principal,
    now: Timestamp,
) -> Result<ContentItem> {
    ensure_mutable(item)?;
    ensure_visible(item, principal, "assign a steward")?;
    if !principal.role.has_permission(Permission::AssignSteward) {
        return Err(GovernanceError::unauthorized("assign a steward", principal.role));
    }
    let mut next = item.touched(now);
    next.steward_id = steward;
    Ok(next)
}

/// Reclassify read access
pub fn change_sensitivity(
    item: &ContentItem,
    sensitivity: Sensitivity,
    principal: &Principal,
    now: Timestamp,
) -> Result<ContentItem> {
    ensure_mutable(item)?;
    ensure_visible(item, principal, "change sensitivity")?;
    if !principal.role.has_permission(Permission::ChangeSensitivity) {
        return Err(GovernanceError::unauthorized("change sensitivity", principal.role));
    }
    let mut next = item.touched(now);
    next.sensitivity = sensitivity;
    tracing::info!(content_id = %item.id(), from = %item.sensitivity(), to = %sensitivity, "sensitivity changed");
    Ok(next)
}

/// Replace title and body
pub fn update_content(
    item: &ContentItem,
    title: impl Into<String>,
    body: impl Into<String>,
    principal: &Principal,
    now: Timestamp,
) -> Result<ContentItem> {
    ensure_mutable(item)?;
    ensure_visible(item, principal, "edit content")?;
    if !principal_can_edit(principal, item) {
        return Err(GovernanceError::unauthorized("edit content", principal.role));
    }
    let mut next = item.touched(now);
    next.title = title.into();
    next.body = body.into();
    Ok(next)
}
