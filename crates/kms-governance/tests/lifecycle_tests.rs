//! Lifecycle state machine tests

use kms_governance::{
    allowed_transitions, transition, validate_transition, GovernanceError, LifecycleState, Role,
};
use kms_test_utils::{at, item_in, principal, ItemFixture};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn any_state() -> impl Strategy<Value = LifecycleState> {
    prop_oneof![
        Just(LifecycleState::Draft),
        Just(LifecycleState::InReview),
        Just(LifecycleState::Published),
        Just(LifecycleState::NeedsUpdate),
        Just(LifecycleState::Archived),
        Just(LifecycleState::Deprecated),
    ]
}

fn any_role() -> impl Strategy<Value = Role> {
    prop_oneof![
        Just(Role::Visitor),
        Just(Role::Contributor),
        Just(Role::Steward),
        Just(Role::Owner),
        Just(Role::Admin),
    ]
}

proptest! {
    #[test]
    fn prop_validation_matches_table(from in any_state(), to in any_state()) {
        let res = validate_transition(from, to);
        let allowed = allowed_transitions(from);

        if res.is_ok() {
            prop_assert!(allowed.contains(&to));
        } else {
            prop_assert!(!allowed.contains(&to));
        }
    }

    #[test]
    fn prop_terminal_states_never_move(
        terminal in prop_oneof![Just(LifecycleState::Archived), Just(LifecycleState::Deprecated)],
        to in any_state(),
        role in any_role(),
    ) {
        let actor = principal(role);
        let item = item_in(terminal, actor.user_id);
        let res = transition(&item, to, &actor, at(2030, 1, 1));
        prop_assert_eq!(res, Err(GovernanceError::InvalidTransition { from: terminal, to }));
    }

    #[test]
    fn prop_failed_transition_changes_nothing(
        from in any_state(),
        to in any_state(),
        role in any_role(),
    ) {
        let actor = principal(role);
        let item = item_in(from, actor.user_id);
        let before = item.clone();
        if transition(&item, to, &actor, at(2023, 6, 1)).is_err() {
            prop_assert_eq!(item, before);
        }
    }
}

#[test]
fn table_matches_documented_edges() {
    use LifecycleState as S;
    assert_eq!(allowed_transitions(S::Draft), vec![S::InReview]);
    assert_eq!(allowed_transitions(S::InReview), vec![S::Draft, S::Published]);
    assert_eq!(allowed_transitions(S::Published), vec![S::NeedsUpdate, S::Archived, S::Deprecated]);
    assert_eq!(allowed_transitions(S::NeedsUpdate), vec![S::InReview, S::Archived, S::Deprecated]);
    assert!(allowed_transitions(S::Archived).is_empty());
    assert!(allowed_transitions(S::Deprecated).is_empty());
}

#[test]
fn scenario_draft_cannot_skip_review() {
    let admin = principal(Role::Admin);
    let item = item_in(LifecycleState::Draft, admin.user_id);
    assert_eq!(
        transition(&item, LifecycleState::Published, &admin, at(2024, 1, 1)),
        Err(GovernanceError::InvalidTransition {
            from: LifecycleState::Draft,
            to: LifecycleState::Published,
        })
    );
}

#[test]
fn scenario_steward_approves_review() {
    let author = principal(Role::Contributor);
    let steward = principal(Role::Steward);
    let item = item_in(LifecycleState::InReview, author.user_id);
    let now = at(2024, 3, 14);

    let published = transition(&item, LifecycleState::Published, &steward, now).unwrap();

    assert_eq!(published.state(), LifecycleState::Published);
    assert_eq!(published.published_at(), Some(now));
    assert_eq!(published.last_reviewed_at(), Some(now));
    assert_eq!(published.next_review_date(), at(2025, 3, 14));
}

#[test]
fn rejection_returns_to_draft_without_stamps() {
    let author = principal(Role::Contributor);
    let owner = principal(Role::Owner);
    let item = item_in(LifecycleState::InReview, author.user_id);

    let rejected = transition(&item, LifecycleState::Draft, &owner, at(2024, 3, 14)).unwrap();

    assert_eq!(rejected.state(), LifecycleState::Draft);
    assert_eq!(rejected.published_at(), None);
    assert_eq!(rejected.last_reviewed_at(), None);
}

#[test]
fn needs_update_resubmission_requires_edit_rights() {
    let author = principal(Role::Contributor);
    let item = ItemFixture::new(author.user_id)
        .reviewed(at(2023, 2, 1))
        .state(LifecycleState::NeedsUpdate)
        .build();

    let stranger = principal(Role::Contributor);
    assert!(transition(&item, LifecycleState::InReview, &stranger, at(2024, 3, 1))
        .unwrap_err()
        .is_denial());

    let resubmitted = transition(&item, LifecycleState::InReview, &author, at(2024, 3, 1)).unwrap();
    assert_eq!(resubmitted.state(), LifecycleState::InReview);
}

#[test]
fn manual_flag_before_due_date() {
    let author = principal(Role::Contributor);
    let item = ItemFixture::new(author.user_id)
        .state(LifecycleState::Published)
        .reviewed(at(2024, 1, 1))
        .build();
    assert!(!item.is_overdue(at(2024, 2, 1)));

    let flagged = transition(&item, LifecycleState::NeedsUpdate, &author, at(2024, 2, 1)).unwrap();
    assert_eq!(flagged.state(), LifecycleState::NeedsUpdate);

    let visitor = principal(Role::Visitor);
    assert!(transition(&item, LifecycleState::NeedsUpdate, &visitor, at(2024, 2, 1)).is_err());
}

#[test]
fn only_owner_rank_retires() {
    let item = item_in(LifecycleState::NeedsUpdate, principal(Role::Contributor).user_id);
    for role in [Role::Visitor, Role::Contributor, Role::Steward] {
        let actor = principal(role);
        assert!(transition(&item, LifecycleState::Archived, &actor, at(2024, 1, 1))
            .unwrap_err()
            .is_denial());
    }
    for role in [Role::Owner, Role::Admin] {
        let actor = principal(role);
        assert_eq!(
            transition(&item, LifecycleState::Archived, &actor, at(2024, 1, 1))
                .unwrap()
                .state(),
            LifecycleState::Archived
        );
    }
}
