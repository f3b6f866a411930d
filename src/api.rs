//! Public API surface for the availability engine.
//!
//! This file consolidates the identifier newtypes and the data types that
//! cross module boundaries: schedule records, computed slots, validation
//! results, and audit/notification payloads. All types derive
//! Serialize/Deserialize for JSON serialization.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::define_id_type;
use crate::models::TimeWindow;

define_id_type!(i64, ServiceVersionId);
define_id_type!(i64, ServiceId);
define_id_type!(i64, RestaurantId);
define_id_type!(i64, UserId);
define_id_type!(i64, ExceptionId);
define_id_type!(i64, LegacySlotId);
define_id_type!(i64, ReservationId);

/// Lifecycle state of a service version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionState {
    /// Accepting reservations.
    Active,
    /// Superseded or deactivated; kept for historical reservations.
    Archived,
}

/// A temporally-scoped scheduling context: one "version" of a restaurant's
/// bookable offering. Archived versions are never deleted so historical
/// reservations keep a valid reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceVersion {
    pub id: ServiceVersionId,
    pub service_id: ServiceId,
    pub restaurant_id: RestaurantId,
    pub state: VersionState,
    pub effective_from: NaiveDate,
    pub effective_to: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl ServiceVersion {
    pub fn is_active(&self) -> bool {
        self.state == VersionState::Active
    }
}

/// Weekly schedule template entry, keyed by (service version, day of week).
///
/// One entry exists per day of week per service version; days without an
/// explicit entry are treated as closed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyTemplateEntry {
    pub id: i64,
    pub service_version_id: ServiceVersionId,
    pub weekday: Weekday,
    pub closed: bool,
    pub opening_time: Option<NaiveTime>,
    pub closing_time: Option<NaiveTime>,
    pub break_start: Option<NaiveTime>,
    pub break_end: Option<NaiveTime>,
}

impl WeeklyTemplateEntry {
    /// A closed placeholder entry, used when a day has never been configured.
    pub fn closed_default(service_version_id: ServiceVersionId, weekday: Weekday) -> Self {
        Self {
            id: 0,
            service_version_id,
            weekday,
            closed: true,
            opening_time: None,
            closing_time: None,
            break_start: None,
            break_end: None,
        }
    }

    pub fn is_open(&self) -> bool {
        !self.closed && self.opening_time.is_some() && self.closing_time.is_some()
    }

    pub fn has_break(&self) -> bool {
        self.break_start.is_some() && self.break_end.is_some()
    }

    /// The break window, when both endpoints are configured.
    pub fn break_window(&self) -> Option<TimeWindow> {
        match (self.break_start, self.break_end) {
            (Some(start), Some(end)) => Some(TimeWindow::new(start, end)),
            _ => None,
        }
    }
}

/// Per-day update payload for a weekly template entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyTemplateUpdate {
    pub closed: bool,
    pub opening_time: Option<NaiveTime>,
    pub closing_time: Option<NaiveTime>,
    pub break_start: Option<NaiveTime>,
    pub break_end: Option<NaiveTime>,
}

/// Slot generation parameters for a service version.
///
/// One active policy exists per service version. Replacing a policy only
/// affects slots computed after the change; commitments already made against
/// earlier computations are untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotPolicy {
    pub id: i64,
    pub service_version_id: ServiceVersionId,
    /// Length of each generated slot in minutes. Must be positive.
    pub slot_duration_minutes: u32,
    /// Idle minutes inserted after each slot before the next may start.
    pub buffer_minutes: u32,
    /// Maximum summed party size bookable in one slot.
    pub capacity_per_slot: u32,
    /// Optional explicit generation window start, narrowing the template's
    /// opening hours.
    pub daily_start: Option<NaiveTime>,
    /// Optional explicit generation window end, narrowing the template's
    /// closing hours.
    pub daily_end: Option<NaiveTime>,
}

impl SlotPolicy {
    /// Minutes between consecutive slot starts (duration + buffer).
    pub fn slot_interval_minutes(&self) -> u32 {
        self.slot_duration_minutes + self.buffer_minutes
    }
}

/// Update payload for a slot policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotPolicyUpdate {
    pub slot_duration_minutes: u32,
    pub buffer_minutes: u32,
    pub capacity_per_slot: u32,
    pub daily_start: Option<NaiveTime>,
    pub daily_end: Option<NaiveTime>,
}

/// Classification of a date exception.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExceptionKind {
    FullClosure,
    PartialClosure,
    ReducedHours,
    Maintenance,
    SpecialEvent,
}

/// Date-specific override to the weekly template.
///
/// An exception either closes the whole day (`fully_closed`), blocks a time
/// range (`start_time`/`end_time`), or overrides the day's opening hours
/// (`override_opening`/`override_closing`). Several exceptions may target
/// the same date; `created_at` (with the id as tiebreaker) defines the order
/// in which their hour overrides are applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateException {
    pub id: ExceptionId,
    pub service_version_id: ServiceVersionId,
    pub date: NaiveDate,
    pub kind: ExceptionKind,
    pub fully_closed: bool,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub override_opening: Option<NaiveTime>,
    pub override_closing: Option<NaiveTime>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl DateException {
    /// True when the exception blocks a specific time range rather than the
    /// whole day.
    pub fn has_time_range(&self) -> bool {
        !self.fully_closed && self.start_time.is_some() && self.end_time.is_some()
    }

    /// The blocked time range, when present.
    pub fn blocked_window(&self) -> Option<TimeWindow> {
        if self.fully_closed {
            return None;
        }
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => Some(TimeWindow::new(start, end)),
            _ => None,
        }
    }

    pub fn is_hours_override(&self) -> bool {
        !self.fully_closed && (self.override_opening.is_some() || self.override_closing.is_some())
    }
}

/// Creation payload for a date exception.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDateException {
    pub date: NaiveDate,
    pub kind: ExceptionKind,
    #[serde(default)]
    pub fully_closed: bool,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub override_opening: Option<NaiveTime>,
    pub override_closing: Option<NaiveTime>,
    pub note: Option<String>,
}

/// A bookable time window computed for a single date.
///
/// Computed slots are derived from the template, policy, and exceptions on
/// demand; they are never persisted and live only for the duration of a
/// query/response cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputedSlot {
    /// Deterministic identifier derived from the service version, sequence
    /// number, and date.
    pub id: String,
    pub service_version_id: ServiceVersionId,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub total_capacity: u32,
    /// Sum of party sizes of reservations overlapping this slot.
    pub booked: u32,
    /// Remaining capacity (total - booked, floored at zero).
    pub available: u32,
    pub is_available: bool,
}

impl ComputedSlot {
    /// Derive the deterministic slot identifier.
    pub fn derive_id(service_version_id: ServiceVersionId, sequence: u32, date: NaiveDate) -> String {
        format!("sv_{}_slot_{:03}_{}", service_version_id, sequence, date)
    }

    /// Time-of-day window covered by this slot.
    pub fn window(&self) -> TimeWindow {
        TimeWindow::new(self.start.time(), self.end.time())
    }

    /// True when `time` falls inside the slot's half-open window.
    pub fn contains_time(&self, time: NaiveTime) -> bool {
        self.window().contains(time)
    }
}

/// Policy governing reservations already booked on a legacy slot when its
/// schedule changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotChangePolicy {
    /// Existing reservations stay bound to the old slot version.
    HardCut,
    /// Affected customers receive a schedule-change notification.
    NotifyCustomers,
    /// Compatible reservations are rebound to the new slot version;
    /// incompatible ones fall back to notification.
    AutoMigrate,
}

/// A slot from the superseded fixed-slot scheduling model.
///
/// Legacy slots are append-only: once reservations may reference a slot its
/// hours are never edited in place. A schedule change closes the current
/// version's validity window and appends a successor, linked through
/// `superseded_by`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacySlot {
    pub id: LegacySlotId,
    pub service_id: ServiceId,
    pub weekday: Weekday,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub valid_from: NaiveDate,
    pub valid_to: NaiveDate,
    pub active: bool,
    pub superseded_by: Option<LegacySlotId>,
    pub change_policy: SlotChangePolicy,
}

impl LegacySlot {
    /// True when this slot version governs the given date.
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.active && self.valid_from <= date && date <= self.valid_to
    }

    /// Time-of-day window covered by this slot.
    pub fn window(&self) -> TimeWindow {
        TimeWindow::new(self.start_time, self.end_time)
    }
}

/// Insertion payload for a legacy slot version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLegacySlot {
    pub service_id: ServiceId,
    pub weekday: Weekday,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub valid_from: NaiveDate,
    pub valid_to: NaiveDate,
    pub active: bool,
    pub change_policy: SlotChangePolicy,
}

/// Reservation lifecycle state, as exposed by the reservation store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
    Rejected,
}

impl ReservationStatus {
    /// Pending and confirmed reservations consume slot capacity.
    pub fn counts_toward_capacity(&self) -> bool {
        matches!(self, ReservationStatus::Pending | ReservationStatus::Confirmed)
    }
}

/// A reservation record, as seen through the reservation store interface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: ReservationId,
    pub service_version_id: ServiceVersionId,
    /// Set when the reservation was made against the legacy slot model.
    pub legacy_slot_id: Option<LegacySlotId>,
    pub date: NaiveDate,
    /// Requested arrival time, inside `window`.
    pub time: NaiveTime,
    /// Slot window this reservation occupies for capacity accounting.
    pub window: TimeWindow,
    pub party_size: u32,
    pub status: ReservationStatus,
}

/// Request for an atomic capacity check-and-insert against one slot window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub service_version_id: ServiceVersionId,
    pub date: NaiveDate,
    /// Window of the slot being booked.
    pub window: TimeWindow,
    /// Requested reservation time; must lie inside `window`.
    pub requested_time: NaiveTime,
    pub party_size: u32,
    /// Capacity limit for the slot at booking time.
    pub capacity: u32,
}

/// Outcome of a reservation validity check.
///
/// "No availability" is an expected, frequent outcome, so it is returned as
/// a value rather than raised as an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub reason: Option<String>,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self {
            valid: true,
            reason: None,
        }
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            reason: Some(reason.into()),
        }
    }
}

/// Outcome of a validate-and-book attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BookingOutcome {
    Booked {
        reservation_id: ReservationId,
        slot_id: String,
    },
    Rejected {
        result: ValidationResult,
    },
}

/// One day with availability, returned by the alternative-date search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailableTimeRange {
    pub date: NaiveDate,
    pub slots: Vec<ComputedSlot>,
    pub slot_count: usize,
    pub first_available_time: NaiveTime,
    pub last_available_time: NaiveTime,
    /// Offset in days from the preferred date.
    pub days_from_preferred: u32,
}

/// Entity classification for schedule audit records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleEntityType {
    ServiceVersion,
    TemplateDay,
    SlotPolicy,
    AvailabilityException,
    LegacySlot,
}

/// Append-only audit record of a schedule mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: i64,
    pub entity_type: ScheduleEntityType,
    pub entity_id: i64,
    pub actor: UserId,
    pub old_value: Option<serde_json::Value>,
    pub new_value: Option<serde_json::Value>,
    pub message: String,
    pub recorded_at: DateTime<Utc>,
}

/// Audit payload prior to repository assignment of id and timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAuditRecord {
    pub entity_type: ScheduleEntityType,
    pub entity_id: i64,
    pub actor: UserId,
    pub old_value: Option<serde_json::Value>,
    pub new_value: Option<serde_json::Value>,
    pub message: String,
}

/// Fire-and-forget notification that a schedule change affects a
/// reservation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleChangeEvent {
    pub reservation_id: ReservationId,
    pub old_slot_id: LegacySlotId,
    pub new_slot_id: LegacySlotId,
    pub old_window: TimeWindow,
    pub new_window: TimeWindow,
}

#[cfg(test)]
#[path = "api_tests.rs"]
mod api_tests;
