//! Reservation validation and booking.
//!
//! Validates requested (date, time, party size) tuples against computed
//! availability, proposes alternative dates, and books seats through the
//! reservation store's atomic capacity check. The check-then-act window
//! between observing availability and booking is closed by `try_reserve`;
//! a lost capacity race is retried a bounded number of times, re-validating
//! between attempts, before a conflict surfaces to the caller.

use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use log::{debug, info};

use crate::api::{
    AvailableTimeRange, BookingOutcome, BookingRequest, ComputedSlot, ServiceVersionId,
    ValidationResult,
};
use crate::db::repository::{
    ErrorContext, FullRepository, RepositoryError, RepositoryResult, ReservationRepository,
    ScheduleRepository,
};
use crate::scheduler::GeneratorOptions;
use crate::services::schedule;

/// Upper bound on the alternative-date scan horizon.
pub const MAX_LOOKAHEAD_DAYS: u32 = 90;
/// Scan horizon used when the caller does not specify one.
pub const DEFAULT_LOOKAHEAD_DAYS: u32 = 7;
/// The scan stops early once this many alternative dates are collected.
pub const MAX_ALTERNATIVE_DATES: usize = 10;
/// Bounded retries for bookings that lose a capacity race.
pub const BOOKING_RETRY_ATTEMPTS: u32 = 3;

/// Internal outcome of one validation pass: either a rejection reason or
/// the slot the request resolves to.
enum Evaluation {
    Invalid(ValidationResult),
    Bookable(ComputedSlot),
}

/// Run the ordered validation checks once, returning the bookable slot on
/// success. Checks short-circuit on the first failure:
/// positive party size, active service version, not a past date, non-empty
/// availability, a slot containing the requested time, sufficient capacity.
async fn evaluate(
    repo: &dyn FullRepository,
    options: GeneratorOptions,
    service_version_id: ServiceVersionId,
    date: NaiveDate,
    time: NaiveTime,
    party_size: u32,
    today: NaiveDate,
) -> RepositoryResult<Evaluation> {
    if party_size == 0 {
        return Ok(Evaluation::Invalid(ValidationResult::invalid(
            "party size must be positive",
        )));
    }

    let version = match repo.fetch_service_version(service_version_id).await {
        Ok(version) => version,
        Err(e) if e.is_not_found() => {
            return Ok(Evaluation::Invalid(ValidationResult::invalid(
                "service version not found",
            )))
        }
        Err(e) => return Err(e),
    };
    if !version.is_active() {
        return Ok(Evaluation::Invalid(ValidationResult::invalid(
            "service version is not active for reservations",
        )));
    }

    if date < today {
        return Ok(Evaluation::Invalid(ValidationResult::invalid(
            "cannot reserve past dates",
        )));
    }

    let slots =
        schedule::get_available_slots(repo, options, service_version_id, date).await?;
    if slots.is_empty() {
        return Ok(Evaluation::Invalid(ValidationResult::invalid(
            "no availability for date",
        )));
    }

    let slot = match slots.iter().find(|slot| slot.contains_time(time)) {
        Some(slot) => slot.clone(),
        None => {
            let available_starts: Vec<String> = slots
                .iter()
                .filter(|slot| slot.available >= party_size)
                .map(|slot| slot.start.time().format("%H:%M").to_string())
                .collect();
            return Ok(Evaluation::Invalid(ValidationResult::invalid(format!(
                "requested time is not available; available start times: {}",
                available_starts.join(", ")
            ))));
        }
    };

    if slot.available < party_size {
        return Ok(Evaluation::Invalid(ValidationResult::invalid(
            "insufficient capacity for party size",
        )));
    }

    Ok(Evaluation::Bookable(slot))
}

/// Validate a reservation request against today's date.
pub async fn validate_reservation(
    repo: &dyn FullRepository,
    options: GeneratorOptions,
    service_version_id: ServiceVersionId,
    date: NaiveDate,
    time: NaiveTime,
    party_size: u32,
) -> RepositoryResult<ValidationResult> {
    let today = Utc::now().date_naive();
    validate_reservation_at(repo, options, service_version_id, date, time, party_size, today)
        .await
}

/// Validate a reservation request with an explicit "today".
#[allow(clippy::too_many_arguments)]
pub async fn validate_reservation_at(
    repo: &dyn FullRepository,
    options: GeneratorOptions,
    service_version_id: ServiceVersionId,
    date: NaiveDate,
    time: NaiveTime,
    party_size: u32,
    today: NaiveDate,
) -> RepositoryResult<ValidationResult> {
    debug!(
        "validating reservation: service version {}, {} {}, party of {}",
        service_version_id, date, time, party_size
    );
    match evaluate(repo, options, service_version_id, date, time, party_size, today).await? {
        Evaluation::Invalid(result) => Ok(result),
        Evaluation::Bookable(_) => Ok(ValidationResult::valid()),
    }
}

/// Validate and book in one call, retrying lost capacity races.
pub async fn validate_and_book(
    repo: &dyn FullRepository,
    options: GeneratorOptions,
    service_version_id: ServiceVersionId,
    date: NaiveDate,
    time: NaiveTime,
    party_size: u32,
) -> RepositoryResult<BookingOutcome> {
    let today = Utc::now().date_naive();
    validate_and_book_at(repo, options, service_version_id, date, time, party_size, today).await
}

/// Validate and book with an explicit "today".
///
/// Each attempt re-runs the full validation pass against fresh booking
/// totals, then books through the store's atomic capacity check. A
/// conflict on the final attempt surfaces to the caller as a transient
/// failure; a genuinely full slot surfaces as a rejected outcome.
#[allow(clippy::too_many_arguments)]
pub async fn validate_and_book_at(
    repo: &dyn FullRepository,
    options: GeneratorOptions,
    service_version_id: ServiceVersionId,
    date: NaiveDate,
    time: NaiveTime,
    party_size: u32,
    today: NaiveDate,
) -> RepositoryResult<BookingOutcome> {
    let mut last_conflict: Option<RepositoryError> = None;

    for attempt in 1..=BOOKING_RETRY_ATTEMPTS {
        let slot = match evaluate(
            repo,
            options,
            service_version_id,
            date,
            time,
            party_size,
            today,
        )
        .await?
        {
            Evaluation::Invalid(result) => return Ok(BookingOutcome::Rejected { result }),
            Evaluation::Bookable(slot) => slot,
        };

        let request = BookingRequest {
            service_version_id,
            date,
            window: slot.window(),
            requested_time: time,
            party_size,
            capacity: slot.total_capacity,
        };
        match repo.try_reserve(request).await {
            Ok(reservation_id) => {
                info!(
                    "reservation {} booked: service version {}, {} {}, party of {}",
                    reservation_id, service_version_id, date, time, party_size
                );
                return Ok(BookingOutcome::Booked {
                    reservation_id,
                    slot_id: slot.id,
                });
            }
            Err(e) if e.is_conflict() => {
                debug!(
                    "booking attempt {}/{} lost a capacity race: {}",
                    attempt, BOOKING_RETRY_ATTEMPTS, e
                );
                last_conflict = Some(e);
            }
            Err(e) => return Err(e),
        }
    }

    Err(last_conflict.unwrap_or_else(|| {
        RepositoryError::conflict(
            "booking retries exhausted",
            ErrorContext::new("validate_and_book"),
        )
    }))
}

/// Scan forward from the preferred date for days with availability.
///
/// `days_ahead` is clamped to [`MAX_LOOKAHEAD_DAYS`] and defaults to
/// [`DEFAULT_LOOKAHEAD_DAYS`] when absent or zero. The scan stops early
/// once [`MAX_ALTERNATIVE_DATES`] qualifying dates are collected.
pub async fn find_alternatives(
    repo: &dyn FullRepository,
    options: GeneratorOptions,
    service_version_id: ServiceVersionId,
    preferred_date: NaiveDate,
    party_size: u32,
    days_ahead: Option<u32>,
) -> RepositoryResult<Vec<AvailableTimeRange>> {
    if party_size == 0 {
        return Err(RepositoryError::validation(
            "party_size: party size must be positive",
            ErrorContext::new("find_alternatives").with_details("party_size"),
        ));
    }

    let horizon = match days_ahead {
        Some(days) if days > 0 => days.min(MAX_LOOKAHEAD_DAYS),
        _ => DEFAULT_LOOKAHEAD_DAYS,
    };

    let mut alternatives = Vec::new();
    for offset in 0..horizon {
        if alternatives.len() >= MAX_ALTERNATIVE_DATES {
            break;
        }
        let date = preferred_date + Duration::days(offset as i64);
        let slots =
            schedule::get_available_slots(repo, options, service_version_id, date).await?;
        let open: Vec<ComputedSlot> = slots
            .into_iter()
            .filter(|slot| slot.is_available && slot.available >= party_size)
            .collect();
        if open.is_empty() {
            continue;
        }

        let first_available_time = open[0].start.time();
        let last_available_time = open[open.len() - 1].end.time();
        alternatives.push(AvailableTimeRange {
            date,
            slot_count: open.len(),
            first_available_time,
            last_available_time,
            slots: open,
            days_from_preferred: offset,
        });
    }

    info!(
        "{} alternative dates found for service version {} from {}",
        alternatives.len(),
        service_version_id,
        preferred_date
    );
    Ok(alternatives)
}
