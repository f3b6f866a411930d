//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer for business logic.

use std::str::FromStr;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Weekday;

use super::dto::{
    ActorQuery, ActorRequest, AlternativesQuery, AlternativesResponse, BookReservationRequest,
    ChangeSlotScheduleRequest, ChangeSlotScheduleResponse, CreateExceptionRequest,
    ExceptionListResponse, ExceptionRangeQuery, HealthResponse, SlotDetailQuery, SlotListResponse,
    SlotsQuery, UpdateSlotPolicyRequest, UpdateTemplateDayRequest, ValidateReservationRequest,
    WeeklyTemplateResponse,
};
use super::error::AppError;
use super::state::AppState;
use crate::db::repository::FullRepository;
use crate::api::{
    BookingOutcome, ComputedSlot, DateException, ExceptionId, LegacySlotId, ServiceVersion,
    ServiceVersionId, SlotPolicy, UserId, ValidationResult, WeeklyTemplateEntry,
};
use crate::services;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

fn parse_weekday(raw: &str) -> Result<Weekday, AppError> {
    Weekday::from_str(raw)
        .map_err(|_| AppError::BadRequest(format!("invalid weekday: {}", raw)))
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and the backing
/// store is reachable.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match state.repository.health_check().await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Weekly Template
// =============================================================================

/// GET /v1/service-versions/{id}/weekly-template
///
/// The 7-day weekly template, Monday through Sunday.
pub async fn get_weekly_template(
    State(state): State<AppState>,
    Path(service_version_id): Path<i64>,
) -> HandlerResult<WeeklyTemplateResponse> {
    let days = services::get_weekly_template(
        state.repository.as_ref(),
        ServiceVersionId::new(service_version_id),
    )
    .await?;

    Ok(Json(WeeklyTemplateResponse {
        service_version_id,
        days,
    }))
}

/// PUT /v1/service-versions/{id}/weekly-template/{weekday}
///
/// Modify the schedule for one day of week.
pub async fn update_template_day(
    State(state): State<AppState>,
    Path((service_version_id, weekday)): Path<(i64, String)>,
    Json(request): Json<UpdateTemplateDayRequest>,
) -> HandlerResult<WeeklyTemplateEntry> {
    let weekday = parse_weekday(&weekday)?;
    let entry = services::update_weekly_template_day(
        state.repository.as_ref(),
        ServiceVersionId::new(service_version_id),
        weekday,
        request.update,
        UserId::new(request.actor_id),
    )
    .await?;

    Ok(Json(entry))
}

// =============================================================================
// Slot Policy
// =============================================================================

/// PUT /v1/service-versions/{id}/slot-policy
///
/// Replace the slot generation policy.
pub async fn update_slot_policy(
    State(state): State<AppState>,
    Path(service_version_id): Path<i64>,
    Json(request): Json<UpdateSlotPolicyRequest>,
) -> HandlerResult<SlotPolicy> {
    let policy = services::update_slot_policy(
        state.repository.as_ref(),
        ServiceVersionId::new(service_version_id),
        request.update,
        UserId::new(request.actor_id),
    )
    .await?;

    Ok(Json(policy))
}

// =============================================================================
// Computed Slots
// =============================================================================

/// GET /v1/service-versions/{id}/slots?date=YYYY-MM-DD
///
/// Computed slots for a date, with live capacity.
pub async fn get_slots(
    State(state): State<AppState>,
    Path(service_version_id): Path<i64>,
    Query(query): Query<SlotsQuery>,
) -> HandlerResult<SlotListResponse> {
    let slots = services::get_available_slots(
        state.repository.as_ref(),
        state.generator,
        ServiceVersionId::new(service_version_id),
        query.date,
    )
    .await?;

    let total = slots.len();
    Ok(Json(SlotListResponse {
        date: query.date,
        slots,
        total,
    }))
}

/// GET /v1/service-versions/{id}/slots/at?date=YYYY-MM-DD&time=HH:MM:SS
///
/// Details of the slot starting exactly at the given time.
pub async fn get_slot_details(
    State(state): State<AppState>,
    Path(service_version_id): Path<i64>,
    Query(query): Query<SlotDetailQuery>,
) -> HandlerResult<ComputedSlot> {
    let slot = services::get_slot_details(
        state.repository.as_ref(),
        state.generator,
        ServiceVersionId::new(service_version_id),
        query.date,
        query.time,
    )
    .await?;

    Ok(Json(slot))
}

// =============================================================================
// Date Exceptions
// =============================================================================

/// POST /v1/service-versions/{id}/exceptions
///
/// Create a closure, reduced-hours, or special-event exception.
pub async fn create_exception(
    State(state): State<AppState>,
    Path(service_version_id): Path<i64>,
    Json(request): Json<CreateExceptionRequest>,
) -> HandlerResult<DateException> {
    let record = services::create_exception(
        state.repository.as_ref(),
        ServiceVersionId::new(service_version_id),
        request.exception,
        UserId::new(request.actor_id),
    )
    .await?;

    Ok(Json(record))
}

/// GET /v1/service-versions/{id}/exceptions?from=YYYY-MM-DD&to=YYYY-MM-DD
///
/// List exceptions with dates in the inclusive range.
pub async fn list_exceptions(
    State(state): State<AppState>,
    Path(service_version_id): Path<i64>,
    Query(query): Query<ExceptionRangeQuery>,
) -> HandlerResult<ExceptionListResponse> {
    let exceptions = services::list_exceptions(
        state.repository.as_ref(),
        ServiceVersionId::new(service_version_id),
        query.from,
        query.to,
    )
    .await?;

    let total = exceptions.len();
    Ok(Json(ExceptionListResponse { exceptions, total }))
}

/// DELETE /v1/exceptions/{id}?actor_id=N
///
/// Remove an exception.
pub async fn delete_exception(
    State(state): State<AppState>,
    Path(exception_id): Path<i64>,
    Query(query): Query<ActorQuery>,
) -> HandlerResult<serde_json::Value> {
    services::delete_exception(
        state.repository.as_ref(),
        ExceptionId::new(exception_id),
        UserId::new(query.actor_id),
    )
    .await?;

    Ok(Json(serde_json::json!({ "deleted": exception_id })))
}

// =============================================================================
// Reservation Validation & Booking
// =============================================================================

/// POST /v1/service-versions/{id}/validate-reservation
///
/// Validate a (date, time, party size) tuple without booking.
pub async fn validate_reservation(
    State(state): State<AppState>,
    Path(service_version_id): Path<i64>,
    Json(request): Json<ValidateReservationRequest>,
) -> HandlerResult<ValidationResult> {
    let result = services::validate_reservation(
        state.repository.as_ref(),
        state.generator,
        ServiceVersionId::new(service_version_id),
        request.date,
        request.time,
        request.party_size,
    )
    .await?;

    Ok(Json(result))
}

/// POST /v1/service-versions/{id}/reservations
///
/// Validate and book in one atomic flow.
pub async fn book_reservation(
    State(state): State<AppState>,
    Path(service_version_id): Path<i64>,
    Json(request): Json<BookReservationRequest>,
) -> HandlerResult<BookingOutcome> {
    let outcome = services::validate_and_book(
        state.repository.as_ref(),
        state.generator,
        ServiceVersionId::new(service_version_id),
        request.date,
        request.time,
        request.party_size,
    )
    .await?;

    Ok(Json(outcome))
}

/// GET /v1/service-versions/{id}/alternatives?date=&party_size=&days_ahead=
///
/// Scan forward for dates with availability.
pub async fn find_alternatives(
    State(state): State<AppState>,
    Path(service_version_id): Path<i64>,
    Query(query): Query<AlternativesQuery>,
) -> HandlerResult<AlternativesResponse> {
    let alternatives = services::find_alternatives(
        state.repository.as_ref(),
        state.generator,
        ServiceVersionId::new(service_version_id),
        query.date,
        query.party_size,
        query.days_ahead,
    )
    .await?;

    let total = alternatives.len();
    Ok(Json(AlternativesResponse {
        alternatives,
        total,
    }))
}

// =============================================================================
// Schedule Lifecycle
// =============================================================================

/// POST /v1/service-versions/{id}/deactivate
///
/// Stop accepting reservations.
pub async fn deactivate_schedule(
    State(state): State<AppState>,
    Path(service_version_id): Path<i64>,
    Json(request): Json<ActorRequest>,
) -> HandlerResult<ServiceVersion> {
    let version = services::deactivate_schedule(
        state.repository.as_ref(),
        ServiceVersionId::new(service_version_id),
        UserId::new(request.actor_id),
    )
    .await?;

    Ok(Json(version))
}

/// POST /v1/service-versions/{id}/reactivate
///
/// Resume accepting reservations.
pub async fn reactivate_schedule(
    State(state): State<AppState>,
    Path(service_version_id): Path<i64>,
    Json(request): Json<ActorRequest>,
) -> HandlerResult<ServiceVersion> {
    let version = services::reactivate_schedule(
        state.repository.as_ref(),
        ServiceVersionId::new(service_version_id),
        UserId::new(request.actor_id),
    )
    .await?;

    Ok(Json(version))
}

// =============================================================================
// Legacy Slots
// =============================================================================

/// POST /v1/legacy-slots/{id}/schedule-change
///
/// Supersede a legacy slot with new hours effective from a date.
pub async fn change_legacy_slot_schedule(
    State(state): State<AppState>,
    Path(slot_id): Path<i64>,
    Json(request): Json<ChangeSlotScheduleRequest>,
) -> HandlerResult<ChangeSlotScheduleResponse> {
    let new_slot = services::change_slot_schedule(
        state.repository.as_ref(),
        LegacySlotId::new(slot_id),
        request.new_start,
        request.new_end,
        request.effective_from,
        request.policy,
        UserId::new(request.actor_id),
    )
    .await?;

    Ok(Json(ChangeSlotScheduleResponse {
        old_slot_id: slot_id,
        new_slot,
    }))
}
