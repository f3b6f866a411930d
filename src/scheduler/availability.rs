//! Availability resolution.
//!
//! Enriches candidate slots with live booking totals from the reservation
//! store. This is a read of mutable shared state: the totals are accurate
//! at the moment of the query and must not be trusted across more than one
//! validation cycle (the booking path re-checks under the store's own
//! atomic scope).

use chrono::NaiveDate;

use crate::api::ComputedSlot;
use crate::db::repository::{RepositoryResult, ReservationRepository};

/// Populate capacity fields on the candidate slots for `date`.
///
/// For each slot, `booked` is the sum of party sizes (not the number of
/// reservations) of pending/confirmed reservations overlapping the slot's
/// window; `available` floors at zero.
pub async fn resolve<R: ReservationRepository + ?Sized>(
    repo: &R,
    date: NaiveDate,
    candidates: Vec<ComputedSlot>,
) -> RepositoryResult<Vec<ComputedSlot>> {
    let mut slots = Vec::with_capacity(candidates.len());
    for mut slot in candidates {
        let booked = repo
            .sum_party_sizes_overlapping(slot.service_version_id, date, slot.window())
            .await?;
        slot.booked = booked;
        slot.available = slot.total_capacity.saturating_sub(booked);
        slot.is_available = slot.available > 0;
        slots.push(slot);
    }
    Ok(slots)
}
