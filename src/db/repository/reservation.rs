//! Reservation store trait.
//!
//! The engine reads booking totals that a concurrent reservation-creation
//! path writes. `try_reserve` is the designated write path: it re-checks
//! capacity inside the store's own atomic scope, closing the
//! check-then-act window between observing `available` and booking.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::error::RepositoryResult;
use crate::api::{
    BookingRequest, LegacySlotId, Reservation, ReservationId, ServiceVersionId,
};
use crate::models::TimeWindow;

/// Repository trait for reservation data.
#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Sum of party sizes of pending/confirmed reservations whose time
    /// window overlaps `window` on `date`.
    ///
    /// This is a point-in-time read; it must not be trusted across more
    /// than one validation cycle.
    async fn sum_party_sizes_overlapping(
        &self,
        service_version_id: ServiceVersionId,
        date: NaiveDate,
        window: TimeWindow,
    ) -> RepositoryResult<u32>;

    /// Atomically re-check capacity for the requested slot window and, when
    /// it suffices, insert a confirmed reservation.
    ///
    /// # Returns
    /// * `Ok(ReservationId)` - The new reservation
    /// * `Err(RepositoryError::Conflict)` - If the remaining capacity no
    ///   longer covers the requested party size
    async fn try_reserve(&self, request: BookingRequest) -> RepositoryResult<ReservationId>;

    /// Pending/confirmed reservations bound to a legacy slot with dates on
    /// or after `from`.
    async fn find_future_reservations_by_slot(
        &self,
        slot_id: LegacySlotId,
        from: NaiveDate,
    ) -> RepositoryResult<Vec<Reservation>>;

    /// Rebind a reservation to a different legacy slot version.
    async fn rebind_reservation(
        &self,
        reservation_id: ReservationId,
        new_slot_id: LegacySlotId,
    ) -> RepositoryResult<()>;
}
