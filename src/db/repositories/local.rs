//! In-memory repository implementation.
//!
//! Backs every collaborator trait with plain maps behind a single
//! `parking_lot::RwLock`. Because each mutation runs inside one write-lock
//! scope, multi-step mutations (the legacy slot transition, the booking
//! capacity check-and-insert) are atomic: concurrent readers observe either
//! the state before or after, never an intermediate one.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, NaiveTime, Utc, Weekday};
use parking_lot::RwLock;

use crate::api::{
    AuditRecord, BookingRequest, DateException, ExceptionId, LegacySlot, LegacySlotId,
    NewAuditRecord, NewDateException, NewLegacySlot, Reservation, ReservationId,
    ReservationStatus, RestaurantId, ScheduleChangeEvent, ServiceId, ServiceVersion,
    ServiceVersionId, SlotPolicy, SlotPolicyUpdate, VersionState, WeeklyTemplateEntry,
    WeeklyTemplateUpdate,
};
use crate::db::repository::{
    AuditRepository, ErrorContext, FullRepository, LegacySlotRepository, NotificationSink,
    RepositoryError, RepositoryResult, ReservationRepository, ScheduleRepository,
};
use crate::models::TimeWindow;

#[derive(Default)]
struct Store {
    next_id: i64,
    service_versions: HashMap<i64, ServiceVersion>,
    template_entries: HashMap<(i64, Weekday), WeeklyTemplateEntry>,
    slot_policies: HashMap<i64, SlotPolicy>,
    exceptions: HashMap<i64, DateException>,
    legacy_slots: HashMap<i64, LegacySlot>,
    reservations: HashMap<i64, Reservation>,
    audit_log: Vec<AuditRecord>,
    notifications: Vec<ScheduleChangeEvent>,
}

impl Store {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn service_version(&self, id: ServiceVersionId) -> RepositoryResult<&ServiceVersion> {
        self.service_versions.get(&id.value()).ok_or_else(|| {
            RepositoryError::not_found(
                format!("service version {} not found", id),
                ErrorContext::new("fetch_service_version")
                    .with_entity("service_version")
                    .with_entity_id(id),
            )
        })
    }

    fn booked_party_sum(
        &self,
        service_version_id: ServiceVersionId,
        date: NaiveDate,
        window: &TimeWindow,
    ) -> u32 {
        self.reservations
            .values()
            .filter(|r| {
                r.service_version_id == service_version_id
                    && r.date == date
                    && r.status.counts_toward_capacity()
                    && r.window.overlaps(window)
            })
            .map(|r| r.party_size)
            .sum()
    }
}

/// In-memory repository for unit testing and local development.
pub struct LocalRepository {
    store: RwLock<Store>,
}

impl LocalRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self {
            store: RwLock::new(Store::default()),
        }
    }

    // ==================== Seeding & Inspection ====================
    //
    // Service/restaurant account management lives outside the engine, so
    // service versions and historical reservations enter the in-memory
    // store through these helpers rather than through a trait.

    /// Seed an active service version, returning the stored record.
    pub fn seed_service_version(
        &self,
        service_id: ServiceId,
        restaurant_id: RestaurantId,
        effective_from: NaiveDate,
    ) -> ServiceVersion {
        let mut store = self.store.write();
        let id = store.allocate_id();
        let version = ServiceVersion {
            id: ServiceVersionId::new(id),
            service_id,
            restaurant_id,
            state: VersionState::Active,
            effective_from,
            effective_to: None,
            notes: None,
        };
        store.service_versions.insert(id, version.clone());
        version
    }

    /// Seed a reservation with an explicit status and occupied window.
    #[allow(clippy::too_many_arguments)]
    pub fn seed_reservation(
        &self,
        service_version_id: ServiceVersionId,
        legacy_slot_id: Option<LegacySlotId>,
        date: NaiveDate,
        time: NaiveTime,
        window: TimeWindow,
        party_size: u32,
        status: ReservationStatus,
    ) -> Reservation {
        let mut store = self.store.write();
        let id = store.allocate_id();
        let reservation = Reservation {
            id: ReservationId::new(id),
            service_version_id,
            legacy_slot_id,
            date,
            time,
            window,
            party_size,
            status,
        };
        store.reservations.insert(id, reservation.clone());
        reservation
    }

    /// Snapshot of a reservation, for assertions.
    pub fn reservation(&self, id: ReservationId) -> Option<Reservation> {
        self.store.read().reservations.get(&id.value()).cloned()
    }

    /// Snapshot of the audit log, for assertions.
    pub fn audit_records(&self) -> Vec<AuditRecord> {
        self.store.read().audit_log.clone()
    }

    /// Snapshot of dispatched notifications, for assertions.
    pub fn notifications(&self) -> Vec<ScheduleChangeEvent> {
        self.store.read().notifications.clone()
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ScheduleRepository for LocalRepository {
    async fn fetch_service_version(
        &self,
        id: ServiceVersionId,
    ) -> RepositoryResult<ServiceVersion> {
        let store = self.store.read();
        store.service_version(id).cloned()
    }

    async fn update_service_version_state(
        &self,
        id: ServiceVersionId,
        state: VersionState,
    ) -> RepositoryResult<ServiceVersion> {
        let mut store = self.store.write();
        let version = store.service_versions.get_mut(&id.value()).ok_or_else(|| {
            RepositoryError::not_found(
                format!("service version {} not found", id),
                ErrorContext::new("update_service_version_state")
                    .with_entity("service_version")
                    .with_entity_id(id),
            )
        })?;
        version.state = state;
        Ok(version.clone())
    }

    async fn fetch_template_entry(
        &self,
        service_version_id: ServiceVersionId,
        weekday: Weekday,
    ) -> RepositoryResult<Option<WeeklyTemplateEntry>> {
        let store = self.store.read();
        Ok(store
            .template_entries
            .get(&(service_version_id.value(), weekday))
            .cloned())
    }

    async fn fetch_template_week(
        &self,
        service_version_id: ServiceVersionId,
    ) -> RepositoryResult<Vec<WeeklyTemplateEntry>> {
        let store = self.store.read();
        let mut entries: Vec<WeeklyTemplateEntry> = store
            .template_entries
            .values()
            .filter(|e| e.service_version_id == service_version_id)
            .cloned()
            .collect();
        entries.sort_by_key(|e| e.weekday.num_days_from_monday());
        Ok(entries)
    }

    async fn upsert_template_entry(
        &self,
        service_version_id: ServiceVersionId,
        weekday: Weekday,
        update: WeeklyTemplateUpdate,
    ) -> RepositoryResult<WeeklyTemplateEntry> {
        let mut store = self.store.write();
        store.service_version(service_version_id)?;
        let existing_id = store
            .template_entries
            .get(&(service_version_id.value(), weekday))
            .map(|e| e.id);
        let id = match existing_id {
            Some(id) => id,
            None => store.allocate_id(),
        };
        let entry = WeeklyTemplateEntry {
            id,
            service_version_id,
            weekday,
            closed: update.closed,
            opening_time: update.opening_time,
            closing_time: update.closing_time,
            break_start: update.break_start,
            break_end: update.break_end,
        };
        store
            .template_entries
            .insert((service_version_id.value(), weekday), entry.clone());
        Ok(entry)
    }

    async fn fetch_slot_policy(
        &self,
        service_version_id: ServiceVersionId,
    ) -> RepositoryResult<Option<SlotPolicy>> {
        let store = self.store.read();
        Ok(store.slot_policies.get(&service_version_id.value()).cloned())
    }

    async fn upsert_slot_policy(
        &self,
        service_version_id: ServiceVersionId,
        update: SlotPolicyUpdate,
    ) -> RepositoryResult<SlotPolicy> {
        let mut store = self.store.write();
        store.service_version(service_version_id)?;
        let existing_id = store
            .slot_policies
            .get(&service_version_id.value())
            .map(|p| p.id);
        let id = match existing_id {
            Some(id) => id,
            None => store.allocate_id(),
        };
        let policy = SlotPolicy {
            id,
            service_version_id,
            slot_duration_minutes: update.slot_duration_minutes,
            buffer_minutes: update.buffer_minutes,
            capacity_per_slot: update.capacity_per_slot,
            daily_start: update.daily_start,
            daily_end: update.daily_end,
        };
        store
            .slot_policies
            .insert(service_version_id.value(), policy.clone());
        Ok(policy)
    }

    async fn insert_exception(
        &self,
        service_version_id: ServiceVersionId,
        exception: NewDateException,
    ) -> RepositoryResult<DateException> {
        let mut store = self.store.write();
        store.service_version(service_version_id)?;
        let id = store.allocate_id();
        let record = DateException {
            id: ExceptionId::new(id),
            service_version_id,
            date: exception.date,
            kind: exception.kind,
            fully_closed: exception.fully_closed,
            start_time: exception.start_time,
            end_time: exception.end_time,
            override_opening: exception.override_opening,
            override_closing: exception.override_closing,
            note: exception.note,
            created_at: Utc::now(),
        };
        store.exceptions.insert(id, record.clone());
        Ok(record)
    }

    async fn fetch_exception(&self, id: ExceptionId) -> RepositoryResult<DateException> {
        let store = self.store.read();
        store.exceptions.get(&id.value()).cloned().ok_or_else(|| {
            RepositoryError::not_found(
                format!("exception {} not found", id),
                ErrorContext::new("fetch_exception")
                    .with_entity("date_exception")
                    .with_entity_id(id),
            )
        })
    }

    async fn delete_exception(&self, id: ExceptionId) -> RepositoryResult<DateException> {
        let mut store = self.store.write();
        store.exceptions.remove(&id.value()).ok_or_else(|| {
            RepositoryError::not_found(
                format!("exception {} not found", id),
                ErrorContext::new("delete_exception")
                    .with_entity("date_exception")
                    .with_entity_id(id),
            )
        })
    }

    async fn fetch_exceptions_for_date(
        &self,
        service_version_id: ServiceVersionId,
        date: NaiveDate,
    ) -> RepositoryResult<Vec<DateException>> {
        let store = self.store.read();
        let mut exceptions: Vec<DateException> = store
            .exceptions
            .values()
            .filter(|e| e.service_version_id == service_version_id && e.date == date)
            .cloned()
            .collect();
        exceptions.sort_by_key(|e| (e.created_at, e.id));
        Ok(exceptions)
    }

    async fn fetch_exceptions_in_range(
        &self,
        service_version_id: ServiceVersionId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> RepositoryResult<Vec<DateException>> {
        let store = self.store.read();
        let mut exceptions: Vec<DateException> = store
            .exceptions
            .values()
            .filter(|e| {
                e.service_version_id == service_version_id && from <= e.date && e.date <= to
            })
            .cloned()
            .collect();
        exceptions.sort_by_key(|e| (e.date, e.created_at, e.id));
        Ok(exceptions)
    }

    async fn delete_exceptions_for_date(
        &self,
        service_version_id: ServiceVersionId,
        date: NaiveDate,
    ) -> RepositoryResult<usize> {
        let mut store = self.store.write();
        let doomed: Vec<i64> = store
            .exceptions
            .values()
            .filter(|e| e.service_version_id == service_version_id && e.date == date)
            .map(|e| e.id.value())
            .collect();
        for id in &doomed {
            store.exceptions.remove(id);
        }
        Ok(doomed.len())
    }
}

#[async_trait]
impl ReservationRepository for LocalRepository {
    async fn sum_party_sizes_overlapping(
        &self,
        service_version_id: ServiceVersionId,
        date: NaiveDate,
        window: TimeWindow,
    ) -> RepositoryResult<u32> {
        let store = self.store.read();
        Ok(store.booked_party_sum(service_version_id, date, &window))
    }

    async fn try_reserve(&self, request: BookingRequest) -> RepositoryResult<ReservationId> {
        // Capacity is re-checked under the write lock; two racing callers
        // serialize here and the second sees the first one's booking.
        let mut store = self.store.write();
        let booked =
            store.booked_party_sum(request.service_version_id, request.date, &request.window);
        if booked + request.party_size > request.capacity {
            return Err(RepositoryError::conflict(
                format!(
                    "slot {} on {} has {} of {} seats taken",
                    request.window, request.date, booked, request.capacity
                ),
                ErrorContext::new("try_reserve")
                    .with_entity("reservation")
                    .with_details(format!("requested party of {}", request.party_size)),
            ));
        }
        let id = store.allocate_id();
        let reservation = Reservation {
            id: ReservationId::new(id),
            service_version_id: request.service_version_id,
            legacy_slot_id: None,
            date: request.date,
            time: request.requested_time,
            window: request.window,
            party_size: request.party_size,
            status: ReservationStatus::Confirmed,
        };
        store.reservations.insert(id, reservation);
        Ok(ReservationId::new(id))
    }

    async fn find_future_reservations_by_slot(
        &self,
        slot_id: LegacySlotId,
        from: NaiveDate,
    ) -> RepositoryResult<Vec<Reservation>> {
        let store = self.store.read();
        let mut reservations: Vec<Reservation> = store
            .reservations
            .values()
            .filter(|r| {
                r.legacy_slot_id == Some(slot_id)
                    && r.date >= from
                    && r.status.counts_toward_capacity()
            })
            .cloned()
            .collect();
        reservations.sort_by_key(|r| (r.date, r.time, r.id));
        Ok(reservations)
    }

    async fn rebind_reservation(
        &self,
        reservation_id: ReservationId,
        new_slot_id: LegacySlotId,
    ) -> RepositoryResult<()> {
        let mut store = self.store.write();
        let reservation = store
            .reservations
            .get_mut(&reservation_id.value())
            .ok_or_else(|| {
                RepositoryError::not_found(
                    format!("reservation {} not found", reservation_id),
                    ErrorContext::new("rebind_reservation")
                        .with_entity("reservation")
                        .with_entity_id(reservation_id),
                )
            })?;
        reservation.legacy_slot_id = Some(new_slot_id);
        Ok(())
    }
}

#[async_trait]
impl LegacySlotRepository for LocalRepository {
    async fn fetch_slot(&self, id: LegacySlotId) -> RepositoryResult<LegacySlot> {
        let store = self.store.read();
        store.legacy_slots.get(&id.value()).cloned().ok_or_else(|| {
            RepositoryError::not_found(
                format!("slot {} not found", id),
                ErrorContext::new("fetch_slot")
                    .with_entity("legacy_slot")
                    .with_entity_id(id),
            )
        })
    }

    async fn insert_slot(&self, slot: NewLegacySlot) -> RepositoryResult<LegacySlot> {
        let mut store = self.store.write();
        let id = store.allocate_id();
        let record = LegacySlot {
            id: LegacySlotId::new(id),
            service_id: slot.service_id,
            weekday: slot.weekday,
            start_time: slot.start_time,
            end_time: slot.end_time,
            valid_from: slot.valid_from,
            valid_to: slot.valid_to,
            active: slot.active,
            superseded_by: None,
            change_policy: slot.change_policy,
        };
        store.legacy_slots.insert(id, record.clone());
        Ok(record)
    }

    async fn update_slot(&self, slot: LegacySlot) -> RepositoryResult<LegacySlot> {
        let mut store = self.store.write();
        if !store.legacy_slots.contains_key(&slot.id.value()) {
            return Err(RepositoryError::not_found(
                format!("slot {} not found", slot.id),
                ErrorContext::new("update_slot")
                    .with_entity("legacy_slot")
                    .with_entity_id(slot.id),
            ));
        }
        store.legacy_slots.insert(slot.id.value(), slot.clone());
        Ok(slot)
    }

    async fn transition_slot(
        &self,
        old_id: LegacySlotId,
        effective_from: NaiveDate,
        replacement: NewLegacySlot,
    ) -> RepositoryResult<(LegacySlot, LegacySlot)> {
        // One write-lock scope covers all three writes: close, insert, link.
        let mut store = self.store.write();
        let old = store
            .legacy_slots
            .get(&old_id.value())
            .cloned()
            .ok_or_else(|| {
                RepositoryError::not_found(
                    format!("slot {} not found", old_id),
                    ErrorContext::new("transition_slot")
                        .with_entity("legacy_slot")
                        .with_entity_id(old_id),
                )
            })?;

        let new_id = store.allocate_id();
        let new_slot = LegacySlot {
            id: LegacySlotId::new(new_id),
            service_id: replacement.service_id,
            weekday: replacement.weekday,
            start_time: replacement.start_time,
            end_time: replacement.end_time,
            valid_from: replacement.valid_from,
            valid_to: replacement.valid_to,
            active: replacement.active,
            superseded_by: None,
            change_policy: replacement.change_policy,
        };
        let closed = LegacySlot {
            valid_to: effective_from - Duration::days(1),
            superseded_by: Some(new_slot.id),
            ..old
        };

        store.legacy_slots.insert(old_id.value(), closed.clone());
        store.legacy_slots.insert(new_id, new_slot.clone());
        Ok((closed, new_slot))
    }
}

#[async_trait]
impl AuditRepository for LocalRepository {
    async fn append_audit(&self, record: NewAuditRecord) -> RepositoryResult<AuditRecord> {
        let mut store = self.store.write();
        let id = store.allocate_id();
        let stored = AuditRecord {
            id,
            entity_type: record.entity_type,
            entity_id: record.entity_id,
            actor: record.actor,
            old_value: record.old_value,
            new_value: record.new_value,
            message: record.message,
            recorded_at: Utc::now(),
        };
        store.audit_log.push(stored.clone());
        Ok(stored)
    }
}

#[async_trait]
impl NotificationSink for LocalRepository {
    async fn notify_schedule_change(&self, event: ScheduleChangeEvent) -> RepositoryResult<()> {
        let mut store = self.store.write();
        store.notifications.push(event);
        Ok(())
    }
}

#[async_trait]
impl FullRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(true)
    }
}
