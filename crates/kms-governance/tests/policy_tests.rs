//! Access and edit policy properties

use kms_governance::policy::{principal_can_read, visible_to};
use kms_governance::{can_edit, can_read, Role, Sensitivity, UserId};
use kms_test_utils::{principal, ItemFixture};
use proptest::prelude::*;

fn any_role() -> impl Strategy<Value = Role> {
    prop_oneof![
        Just(Role::Visitor),
        Just(Role::Contributor),
        Just(Role::Steward),
        Just(Role::Owner),
        Just(Role::Admin),
    ]
}

fn any_sensitivity() -> impl Strategy<Value = Sensitivity> {
    prop_oneof![
        Just(Sensitivity::Public),
        Just(Sensitivity::Internal),
        Just(Sensitivity::Restricted),
    ]
}

proptest! {
    #[test]
    fn prop_read_access_grows_with_rank(
        lower in any_role(),
        higher in any_role(),
        sensitivity in any_sensitivity(),
        is_owner in any::<bool>(),
    ) {
        prop_assume!(lower.rank() < higher.rank());
        if can_read(lower, sensitivity, is_owner) {
            prop_assert!(can_read(higher, sensitivity, is_owner));
        }
    }

    #[test]
    fn prop_owner_always_reads(role in any_role(), sensitivity in any_sensitivity()) {
        prop_assert!(can_read(role, sensitivity, true));
    }

    #[test]
    fn prop_visitor_never_edits(is_owner in any::<bool>(), is_author in any::<bool>()) {
        prop_assert!(!can_edit(Role::Visitor, is_owner, is_author));
    }

    #[test]
    fn prop_edit_access_grows_with_rank(
        lower in any_role(),
        higher in any_role(),
        is_owner in any::<bool>(),
        is_author in any::<bool>(),
    ) {
        prop_assume!(lower.rank() < higher.rank());
        if can_edit(lower, is_owner, is_author) {
            prop_assert!(can_edit(higher, is_owner, is_author));
        }
    }
}

#[test]
fn scenario_restricted_hidden_from_contributor() {
    assert!(!can_read(Role::Contributor, Sensitivity::Restricted, false));
}

#[test]
fn scenario_restricted_visible_to_steward() {
    assert!(can_read(Role::Steward, Sensitivity::Restricted, false));
}

#[test]
fn admin_reads_everything() {
    for sensitivity in Sensitivity::ALL {
        assert!(can_read(Role::Admin, sensitivity, false));
    }
}

#[test]
fn owner_sees_own_restricted_item() {
    let contributor = principal(Role::Contributor);
    let own = ItemFixture::new(contributor.user_id)
        .sensitivity(Sensitivity::Restricted)
        .build();
    let foreign = ItemFixture::new(UserId::new())
        .sensitivity(Sensitivity::Restricted)
        .build();

    assert!(principal_can_read(&contributor, &own));
    assert!(!principal_can_read(&contributor, &foreign));
}

#[test]
fn visible_to_filters_by_sensitivity() {
    let visitor = principal(Role::Visitor);
    let items = vec![
        ItemFixture::new(UserId::new()).sensitivity(Sensitivity::Public).build(),
        ItemFixture::new(UserId::new()).sensitivity(Sensitivity::Internal).build(),
        ItemFixture::new(UserId::new()).sensitivity(Sensitivity::Restricted).build(),
    ];
    let visible = visible_to(&visitor, &items);
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].sensitivity(), Sensitivity::Public);
}
