//! Review scheduling, overdue sweeps and dashboards

use kms_governance::review::review_queue;
use kms_governance::{
    GovernanceService, GovernanceSummary, LifecycleState, ReviewStatus, Role, Sensitivity,
};
use kms_test_utils::{at, principal, seeded_store, ItemFixture};
use pretty_assertions::assert_eq;

#[test]
fn scenario_year_old_review_is_overdue() {
    let item = ItemFixture::new(principal(Role::Owner).user_id)
        .review_cycle(12)
        .state(LifecycleState::Published)
        .reviewed(at(2023, 1, 15))
        .build();

    assert_eq!(item.next_review_date(), at(2024, 1, 15));
    assert!(item.is_overdue(at(2024, 2, 1)));
}

#[test]
fn next_review_date_is_stable() {
    let item = ItemFixture::new(principal(Role::Owner).user_id)
        .review_cycle(3)
        .build();
    let first = item.next_review_date();
    let second = item.next_review_date();
    assert_eq!(first, second);
    assert_eq!(first, at(2023, 4, 1));
}

#[test]
fn review_status_thresholds() {
    let item = ItemFixture::new(principal(Role::Owner).user_id)
        .review_cycle(1)
        .state(LifecycleState::Published)
        .reviewed(at(2024, 1, 31))
        .build();

    // Jan 31 + 1 month clamps to Feb 29 in a leap year.
    assert_eq!(item.next_review_date(), at(2024, 2, 29));
    assert_eq!(item.review_status(at(2024, 2, 1), 7), ReviewStatus::Current);
    assert_eq!(item.review_status(at(2024, 2, 25), 7), ReviewStatus::DueSoon);
    assert_eq!(item.review_status(at(2024, 3, 1), 7), ReviewStatus::Overdue);
}

#[test]
fn sweep_flags_only_overdue_published_items() {
    let owner = principal(Role::Owner).user_id;
    let stale = ItemFixture::new(owner)
        .state(LifecycleState::Published)
        .reviewed(at(2023, 1, 15))
        .build();
    let fresh = ItemFixture::new(owner)
        .state(LifecycleState::Published)
        .reviewed(at(2024, 1, 10))
        .build();
    let old_draft = ItemFixture::new(owner).created(at(2020, 1, 1)).build();

    let service = GovernanceService::new(seeded_store([stale.clone(), fresh.clone(), old_draft.clone()]));
    let flagged = service.flag_overdue(at(2024, 2, 1)).unwrap();

    assert_eq!(flagged, vec![stale.id()]);
    let admin = principal(Role::Admin);
    assert_eq!(service.read(stale.id(), &admin).unwrap().state(), LifecycleState::NeedsUpdate);
    assert_eq!(service.read(fresh.id(), &admin).unwrap().state(), LifecycleState::Published);
    assert_eq!(service.read(old_draft.id(), &admin).unwrap().state(), LifecycleState::Draft);

    let events = service.history().events_for(stale.id());
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].actor, kms_governance::Actor::System);

    // A second sweep finds nothing new.
    assert!(service.flag_overdue(at(2024, 2, 2)).unwrap().is_empty());
}

#[test]
fn queue_orders_by_urgency() {
    let owner = principal(Role::Owner).user_id;
    let later = ItemFixture::new(owner)
        .state(LifecycleState::Published)
        .reviewed(at(2023, 2, 5))
        .build();
    let earlier = ItemFixture::new(owner)
        .state(LifecycleState::Published)
        .reviewed(at(2023, 1, 20))
        .build();
    let current = ItemFixture::new(owner)
        .state(LifecycleState::Published)
        .reviewed(at(2023, 12, 1))
        .build();
    let items = vec![later.clone(), current, earlier.clone()];

    let queue: Vec<_> = review_queue(&items, at(2024, 2, 1), 7)
        .into_iter()
        .map(|item| item.id())
        .collect();
    assert_eq!(queue, vec![earlier.id(), later.id()]);
}

#[test]
fn dashboard_is_scoped_to_visible_items() {
    let contributor = principal(Role::Contributor);
    let steward = principal(Role::Steward);
    let other = principal(Role::Owner).user_id;

    let items = vec![
        ItemFixture::new(contributor.user_id).build(),
        ItemFixture::new(other).state(LifecycleState::InReview).build(),
        ItemFixture::new(other)
            .sensitivity(Sensitivity::Restricted)
            .state(LifecycleState::Published)
            .reviewed(at(2023, 1, 15))
            .build(),
        ItemFixture::new(other)
            .state(LifecycleState::Published)
            .reviewed(at(2023, 2, 3))
            .build(),
    ];
    let now = at(2024, 2, 1);

    let seen_by_contributor = GovernanceSummary::compute(&items, &contributor, now, 7);
    assert_eq!(seen_by_contributor.total_visible, 3);
    assert_eq!(seen_by_contributor.owned, 1);
    assert_eq!(seen_by_contributor.overdue, 0);
    assert_eq!(seen_by_contributor.due_soon, 1);
    assert_eq!(seen_by_contributor.awaiting_review, 0);

    let seen_by_steward = GovernanceSummary::compute(&items, &steward, now, 7);
    assert_eq!(seen_by_steward.total_visible, 4);
    assert_eq!(seen_by_steward.overdue, 1);
    assert_eq!(seen_by_steward.awaiting_review, 1);
    assert_eq!(seen_by_steward.count(LifecycleState::Published), 2);
}
