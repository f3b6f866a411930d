//! Legacy slot transitions.
//!
//! The older fixed-slot model changes a slot's hours by closing the current
//! version and appending a successor, never by editing in place, so
//! historical reservations keep referring to the definition that was active
//! when they were made. The close/create/link triple runs as one atomic
//! repository operation; the chosen change policy then governs reservations
//! already booked on the old version.

use chrono::{Duration, NaiveDate, NaiveTime};
use log::{debug, info, warn};

use crate::api::{
    LegacySlot, LegacySlotId, NewAuditRecord, NewLegacySlot, Reservation, ScheduleChangeEvent,
    ScheduleEntityType, SlotChangePolicy, UserId,
};
use crate::db::repository::{
    FullRepository, LegacySlotRepository, NotificationSink, RepositoryResult,
    ReservationRepository,
};
use crate::models::validate_slot_window;
use crate::services::schedule::audit_best_effort;

/// Sentinel for "valid indefinitely"; far enough out that no reservation
/// horizon reaches it.
fn far_future() -> NaiveDate {
    NaiveDate::from_ymd_opt(2099, 12, 31).unwrap_or(NaiveDate::MAX)
}

fn snapshot<T: serde::Serialize>(value: &T) -> Option<serde_json::Value> {
    serde_json::to_value(value).ok()
}

/// Change a legacy slot's hours by appending a new version valid from
/// `effective_from`.
///
/// The old version's validity closes the day before `effective_from` and
/// its `superseded_by` pointer links to the new version. Reservations on
/// the old version with dates on or after `effective_from` are handled
/// according to `policy`.
#[allow(clippy::too_many_arguments)]
pub async fn change_slot_schedule(
    repo: &dyn FullRepository,
    slot_id: LegacySlotId,
    new_start: NaiveTime,
    new_end: NaiveTime,
    effective_from: NaiveDate,
    policy: SlotChangePolicy,
    actor: UserId,
) -> RepositoryResult<LegacySlot> {
    validate_slot_window(new_start, new_end)?;

    let current = repo.fetch_slot(slot_id).await?;
    info!(
        "changing slot {} from {} to {}-{} effective {}",
        slot_id,
        current.window(),
        new_start,
        new_end,
        effective_from
    );

    let replacement = NewLegacySlot {
        service_id: current.service_id,
        weekday: current.weekday,
        start_time: new_start,
        end_time: new_end,
        valid_from: effective_from,
        valid_to: far_future(),
        active: true,
        change_policy: policy,
    };
    let (old, new_slot) = repo
        .transition_slot(slot_id, effective_from, replacement)
        .await?;

    apply_change_policy(repo, &old, &new_slot, effective_from).await?;

    audit_best_effort(
        repo,
        NewAuditRecord {
            entity_type: ScheduleEntityType::LegacySlot,
            entity_id: new_slot.id.value(),
            actor,
            old_value: snapshot(&old),
            new_value: snapshot(&new_slot),
            message: format!("slot schedule changed effective {}", effective_from),
        },
    )
    .await;

    info!(
        "slot transition completed: old slot {}, new slot {}",
        old.id, new_slot.id
    );
    Ok(new_slot)
}

/// Apply the new version's change policy to reservations already booked on
/// the superseded version for dates on or after `effective_from`.
async fn apply_change_policy(
    repo: &dyn FullRepository,
    old: &LegacySlot,
    new_slot: &LegacySlot,
    effective_from: NaiveDate,
) -> RepositoryResult<()> {
    let affected = repo
        .find_future_reservations_by_slot(old.id, effective_from)
        .await?;
    info!(
        "{} future reservations on slot {} from {}",
        affected.len(),
        old.id,
        effective_from
    );

    for reservation in affected {
        match new_slot.change_policy {
            SlotChangePolicy::HardCut => {
                debug!(
                    "hard cut: reservation {} remains on superseded slot {}",
                    reservation.id, old.id
                );
            }
            SlotChangePolicy::NotifyCustomers => {
                notify_change(repo, &reservation, old, new_slot).await;
            }
            SlotChangePolicy::AutoMigrate => {
                if is_time_compatible(&reservation, new_slot) {
                    repo.rebind_reservation(reservation.id, new_slot.id).await?;
                    info!(
                        "reservation {} migrated from slot {} to slot {}",
                        reservation.id, old.id, new_slot.id
                    );
                } else {
                    warn!(
                        "cannot migrate reservation {} to slot {}: time incompatible",
                        reservation.id, new_slot.id
                    );
                    notify_change(repo, &reservation, old, new_slot).await;
                }
            }
        }
    }

    Ok(())
}

/// A reservation is compatible with a slot version when its arrival time
/// falls inside the version's window.
pub(crate) fn is_time_compatible(reservation: &Reservation, slot: &LegacySlot) -> bool {
    slot.window().contains(reservation.time)
}

/// Emit a schedule-change notification; dispatch failures are logged, not
/// propagated.
async fn notify_change(
    repo: &dyn FullRepository,
    reservation: &Reservation,
    old: &LegacySlot,
    new_slot: &LegacySlot,
) {
    let event = ScheduleChangeEvent {
        reservation_id: reservation.id,
        old_slot_id: old.id,
        new_slot_id: new_slot.id,
        old_window: old.window(),
        new_window: new_slot.window(),
    };
    if let Err(e) = repo.notify_schedule_change(event).await {
        warn!(
            "notification dispatch failed for reservation {}: {}",
            reservation.id, e
        );
    }
}

/// Deactivate a slot from a given date (temporal soft delete).
pub async fn deactivate_slot(
    repo: &dyn FullRepository,
    slot_id: LegacySlotId,
    effective_from: NaiveDate,
    actor: UserId,
) -> RepositoryResult<LegacySlot> {
    let mut slot = repo.fetch_slot(slot_id).await?;
    slot.valid_to = effective_from - Duration::days(1);
    slot.active = false;
    let slot = repo.update_slot(slot).await?;
    info!("slot {} deactivated effective {}", slot_id, effective_from);

    audit_best_effort(
        repo,
        NewAuditRecord {
            entity_type: ScheduleEntityType::LegacySlot,
            entity_id: slot.id.value(),
            actor,
            old_value: None,
            new_value: snapshot(&slot),
            message: format!("slot deactivated effective {}", effective_from),
        },
    )
    .await;

    Ok(slot)
}

/// Reactivate a deactivated slot with an open-ended validity window.
pub async fn reactivate_slot(
    repo: &dyn FullRepository,
    slot_id: LegacySlotId,
    actor: UserId,
) -> RepositoryResult<LegacySlot> {
    let mut slot = repo.fetch_slot(slot_id).await?;
    slot.active = true;
    slot.valid_to = far_future();
    let slot = repo.update_slot(slot).await?;
    info!("slot {} reactivated", slot_id);

    audit_best_effort(
        repo,
        NewAuditRecord {
            entity_type: ScheduleEntityType::LegacySlot,
            entity_id: slot.id.value(),
            actor,
            old_value: None,
            new_value: snapshot(&slot),
            message: "slot reactivated".to_string(),
        },
    )
    .await;

    Ok(slot)
}

/// True when the slot has no upcoming reservations and can change freely.
pub async fn can_slot_be_modified(
    repo: &dyn FullRepository,
    slot_id: LegacySlotId,
    from: NaiveDate,
) -> RepositoryResult<bool> {
    let future = repo.find_future_reservations_by_slot(slot_id, from).await?;
    Ok(future.is_empty())
}

/// Number of upcoming reservations bound to a slot.
pub async fn future_reservation_count(
    repo: &dyn FullRepository,
    slot_id: LegacySlotId,
    from: NaiveDate,
) -> RepositoryResult<usize> {
    let future = repo.find_future_reservations_by_slot(slot_id, from).await?;
    Ok(future.len())
}

#[cfg(test)]
#[path = "transition_tests.rs"]
mod transition_tests;
