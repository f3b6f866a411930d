//! Data Transfer Objects for the HTTP API.
//!
//! These DTOs are used for request/response serialization in the REST API.
//! Most schedule types are re-exported from the api module since they
//! already derive Serialize/Deserialize.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

// Re-export existing types that are already serializable
pub use crate::api::{
    AvailableTimeRange, BookingOutcome, ComputedSlot, DateException, NewDateException,
    ServiceVersion, SlotChangePolicy, SlotPolicy, SlotPolicyUpdate, ValidationResult,
    WeeklyTemplateEntry, WeeklyTemplateUpdate,
};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
}

/// Response wrapping the 7-day weekly template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyTemplateResponse {
    pub service_version_id: i64,
    pub days: Vec<WeeklyTemplateEntry>,
}

/// Request body for updating one template day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTemplateDayRequest {
    /// Staff member performing the change
    pub actor_id: i64,
    #[serde(flatten)]
    pub update: WeeklyTemplateUpdate,
}

/// Request body for updating the slot policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateSlotPolicyRequest {
    /// Staff member performing the change
    pub actor_id: i64,
    #[serde(flatten)]
    pub update: SlotPolicyUpdate,
}

/// Request body for creating a date exception.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateExceptionRequest {
    /// Staff member performing the change
    pub actor_id: i64,
    #[serde(flatten)]
    pub exception: NewDateException,
}

/// Query string naming the acting staff member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorQuery {
    pub actor_id: i64,
}

/// Request body naming the acting staff member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorRequest {
    pub actor_id: i64,
}

/// Query string selecting a date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotsQuery {
    pub date: NaiveDate,
}

/// Query string selecting one slot by date and start time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotDetailQuery {
    pub date: NaiveDate,
    pub time: NaiveTime,
}

/// Computed slots for one date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotListResponse {
    pub date: NaiveDate,
    pub slots: Vec<ComputedSlot>,
    pub total: usize,
}

/// Query string selecting an inclusive date range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExceptionRangeQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

/// Exceptions recorded for a service version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExceptionListResponse {
    pub exceptions: Vec<DateException>,
    pub total: usize,
}

/// Request body for reservation validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateReservationRequest {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub party_size: u32,
}

/// Request body for booking a reservation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookReservationRequest {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub party_size: u32,
}

/// Query string for the alternative-date search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlternativesQuery {
    pub date: NaiveDate,
    pub party_size: u32,
    pub days_ahead: Option<u32>,
}

/// Alternative dates with availability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlternativesResponse {
    pub alternatives: Vec<AvailableTimeRange>,
    pub total: usize,
}

/// Request body for a legacy slot schedule change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeSlotScheduleRequest {
    /// Staff member performing the change
    pub actor_id: i64,
    pub new_start: NaiveTime,
    pub new_end: NaiveTime,
    pub effective_from: NaiveDate,
    pub policy: SlotChangePolicy,
}

/// Response for a legacy slot schedule change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeSlotScheduleResponse {
    pub old_slot_id: i64,
    pub new_slot: crate::api::LegacySlot,
}
