//! Legacy slot transition tests: supersession chain integrity and the
//! change policies governing already-booked reservations.

mod support;

use chrono::Weekday;
use support::*;

use tavola::api::{
    LegacySlot, NewLegacySlot, ReservationStatus, ServiceId, SlotChangePolicy,
};
use tavola::db::repository::LegacySlotRepository;
use tavola::db::LocalRepository;
use tavola::models::TimeWindow;
use tavola::services;

async fn seed_slot(repo: &LocalRepository, policy: SlotChangePolicy) -> LegacySlot {
    repo.insert_slot(NewLegacySlot {
        service_id: ServiceId::new(1),
        weekday: Weekday::Fri,
        start_time: t(19, 0),
        end_time: t(21, 0),
        valid_from: d(2026, 1, 1),
        valid_to: d(2099, 12, 31),
        active: true,
        change_policy: policy,
    })
    .await
    .unwrap()
}

#[tokio::test]
async fn transition_closes_old_and_links_new() {
    let fixture = evening_service().await;
    let repo = fixture.repo.as_ref();
    let slot = seed_slot(repo, SlotChangePolicy::HardCut).await;

    let effective = d(2026, 9, 4);
    let new_slot = services::change_slot_schedule(
        repo,
        slot.id,
        t(20, 0),
        t(22, 0),
        effective,
        SlotChangePolicy::HardCut,
        staff(),
    )
    .await
    .unwrap();

    let old = repo.fetch_slot(slot.id).await.unwrap();
    // Validity closes the day before the new version starts: no gap and no
    // overlap in weekday coverage.
    assert_eq!(old.valid_to, d(2026, 9, 3));
    assert_eq!(old.superseded_by, Some(new_slot.id));
    assert_eq!(new_slot.valid_from, effective);
    assert_eq!(new_slot.valid_to, d(2099, 12, 31));
    assert!(new_slot.active);
    assert_eq!(new_slot.window(), TimeWindow::new(t(20, 0), t(22, 0)));
    // Hours of the old version are never edited in place.
    assert_eq!(old.window(), TimeWindow::new(t(19, 0), t(21, 0)));
    assert_eq!(old.weekday, new_slot.weekday);

    assert!(!old.covers(effective));
    assert!(new_slot.covers(effective));
    assert!(old.covers(d(2026, 9, 3)));
    assert!(!new_slot.covers(d(2026, 9, 3)));
}

#[tokio::test]
async fn missing_slot_is_not_found() {
    let fixture = evening_service().await;
    let err = services::change_slot_schedule(
        fixture.repo.as_ref(),
        tavola::api::LegacySlotId::new(404),
        t(20, 0),
        t(22, 0),
        d(2026, 9, 4),
        SlotChangePolicy::HardCut,
        staff(),
    )
    .await
    .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn inverted_new_hours_are_rejected_before_any_write() {
    let fixture = evening_service().await;
    let repo = fixture.repo.as_ref();
    let slot = seed_slot(repo, SlotChangePolicy::HardCut).await;

    let err = services::change_slot_schedule(
        repo,
        slot.id,
        t(22, 0),
        t(20, 0),
        d(2026, 9, 4),
        SlotChangePolicy::HardCut,
        staff(),
    )
    .await
    .unwrap_err();
    assert!(matches!(
        err,
        tavola::db::RepositoryError::Validation { .. }
    ));

    // The slot is untouched.
    let unchanged = repo.fetch_slot(slot.id).await.unwrap();
    assert_eq!(unchanged.valid_to, d(2099, 12, 31));
    assert!(unchanged.superseded_by.is_none());
}

#[tokio::test]
async fn hard_cut_leaves_reservations_alone() {
    let fixture = evening_service().await;
    let repo = fixture.repo.as_ref();
    let slot = seed_slot(repo, SlotChangePolicy::HardCut).await;

    let reservation = fixture.repo.seed_reservation(
        fixture.version.id,
        Some(slot.id),
        d(2026, 9, 11),
        t(19, 30),
        TimeWindow::new(t(19, 0), t(21, 0)),
        2,
        ReservationStatus::Confirmed,
    );

    services::change_slot_schedule(
        repo,
        slot.id,
        t(20, 0),
        t(22, 0),
        d(2026, 9, 4),
        SlotChangePolicy::HardCut,
        staff(),
    )
    .await
    .unwrap();

    let stored = fixture.repo.reservation(reservation.id).unwrap();
    assert_eq!(stored.legacy_slot_id, Some(slot.id));
    assert!(fixture.repo.notifications().is_empty());
}

#[tokio::test]
async fn notify_customers_emits_one_event_per_reservation() {
    let fixture = evening_service().await;
    let repo = fixture.repo.as_ref();
    let slot = seed_slot(repo, SlotChangePolicy::NotifyCustomers).await;

    for day in [d(2026, 9, 11), d(2026, 9, 18)] {
        fixture.repo.seed_reservation(
            fixture.version.id,
            Some(slot.id),
            day,
            t(19, 30),
            TimeWindow::new(t(19, 0), t(21, 0)),
            2,
            ReservationStatus::Confirmed,
        );
    }
    // A reservation before the effective date is unaffected.
    fixture.repo.seed_reservation(
        fixture.version.id,
        Some(slot.id),
        d(2026, 8, 28),
        t(19, 30),
        TimeWindow::new(t(19, 0), t(21, 0)),
        2,
        ReservationStatus::Confirmed,
    );

    let new_slot = services::change_slot_schedule(
        repo,
        slot.id,
        t(20, 0),
        t(22, 0),
        d(2026, 9, 4),
        SlotChangePolicy::NotifyCustomers,
        staff(),
    )
    .await
    .unwrap();

    let events = fixture.repo.notifications();
    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|e| e.old_slot_id == slot.id));
    assert!(events.iter().all(|e| e.new_slot_id == new_slot.id));
    assert!(events
        .iter()
        .all(|e| e.new_window == TimeWindow::new(t(20, 0), t(22, 0))));
}

#[tokio::test]
async fn auto_migrate_rebinds_compatible_reservations() {
    let fixture = evening_service().await;
    let repo = fixture.repo.as_ref();
    let slot = seed_slot(repo, SlotChangePolicy::AutoMigrate).await;

    // 20:30 falls inside the new 20:00-22:00 window; 19:15 does not.
    let compatible = fixture.repo.seed_reservation(
        fixture.version.id,
        Some(slot.id),
        d(2026, 9, 11),
        t(20, 30),
        TimeWindow::new(t(19, 0), t(21, 0)),
        2,
        ReservationStatus::Confirmed,
    );
    let incompatible = fixture.repo.seed_reservation(
        fixture.version.id,
        Some(slot.id),
        d(2026, 9, 18),
        t(19, 15),
        TimeWindow::new(t(19, 0), t(21, 0)),
        4,
        ReservationStatus::Confirmed,
    );

    let new_slot = services::change_slot_schedule(
        repo,
        slot.id,
        t(20, 0),
        t(22, 0),
        d(2026, 9, 4),
        SlotChangePolicy::AutoMigrate,
        staff(),
    )
    .await
    .unwrap();

    // The compatible reservation moves to the new version.
    let migrated = fixture.repo.reservation(compatible.id).unwrap();
    assert_eq!(migrated.legacy_slot_id, Some(new_slot.id));

    // The incompatible one stays and its customer is notified instead.
    let stranded = fixture.repo.reservation(incompatible.id).unwrap();
    assert_eq!(stranded.legacy_slot_id, Some(slot.id));
    let events = fixture.repo.notifications();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].reservation_id, incompatible.id);
}

#[tokio::test]
async fn transition_is_audited() {
    let fixture = evening_service().await;
    let repo = fixture.repo.as_ref();
    let slot = seed_slot(repo, SlotChangePolicy::HardCut).await;

    services::change_slot_schedule(
        repo,
        slot.id,
        t(20, 0),
        t(22, 0),
        d(2026, 9, 4),
        SlotChangePolicy::HardCut,
        staff(),
    )
    .await
    .unwrap();

    let records = fixture.repo.audit_records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].actor, staff());
    assert!(records[0].old_value.is_some());
    assert!(records[0].new_value.is_some());
}

#[tokio::test]
async fn deactivate_and_reactivate_slot() {
    let fixture = evening_service().await;
    let repo = fixture.repo.as_ref();
    let slot = seed_slot(repo, SlotChangePolicy::HardCut).await;

    let deactivated = services::deactivate_slot(repo, slot.id, d(2026, 9, 4), staff())
        .await
        .unwrap();
    assert!(!deactivated.active);
    assert_eq!(deactivated.valid_to, d(2026, 9, 3));

    let reactivated = services::reactivate_slot(repo, slot.id, staff()).await.unwrap();
    assert!(reactivated.active);
    assert_eq!(reactivated.valid_to, d(2099, 12, 31));
}

#[tokio::test]
async fn modifiability_follows_future_reservations() {
    let fixture = evening_service().await;
    let repo = fixture.repo.as_ref();
    let slot = seed_slot(repo, SlotChangePolicy::HardCut).await;

    assert!(services::can_slot_be_modified(repo, slot.id, d(2026, 9, 1))
        .await
        .unwrap());

    fixture.repo.seed_reservation(
        fixture.version.id,
        Some(slot.id),
        d(2026, 9, 11),
        t(19, 30),
        TimeWindow::new(t(19, 0), t(21, 0)),
        2,
        ReservationStatus::Confirmed,
    );

    assert!(!services::can_slot_be_modified(repo, slot.id, d(2026, 9, 1))
        .await
        .unwrap());
    assert_eq!(
        services::future_reservation_count(repo, slot.id, d(2026, 9, 1))
            .await
            .unwrap(),
        1
    );
    // Counting from after the reservation date sees nothing.
    assert!(services::can_slot_be_modified(repo, slot.id, d(2026, 9, 12))
        .await
        .unwrap());
}
