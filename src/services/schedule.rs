//! Schedule management service.
//!
//! Manages the weekly template, the slot policy, and date exceptions for a
//! service version, and runs the slot pipeline (generation + availability
//! resolution) for callers. Every mutation is followed by a best-effort
//! audit append; audit failures are logged and never block the mutation.

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use log::{debug, info, warn};

use crate::api::{
    ComputedSlot, DateException, ExceptionId, NewAuditRecord, NewDateException,
    ScheduleEntityType, ServiceVersion, ServiceVersionId, SlotPolicy, SlotPolicyUpdate, UserId,
    VersionState, WeeklyTemplateEntry, WeeklyTemplateUpdate,
};
use crate::db::repository::{
    AuditRepository, ErrorContext, FullRepository, RepositoryError, RepositoryResult,
    ScheduleRepository,
};
use crate::models::{validate_exception, validate_slot_policy, validate_template_update};
use crate::scheduler::{self, GeneratorOptions};

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Append an audit record, logging instead of failing when the audit store
/// is unavailable.
pub(crate) async fn audit_best_effort(repo: &dyn FullRepository, record: NewAuditRecord) {
    if let Err(e) = repo.append_audit(record).await {
        warn!("audit append failed: {}", e);
    }
}

fn snapshot<T: serde::Serialize>(value: &T) -> Option<serde_json::Value> {
    serde_json::to_value(value).ok()
}

// ============================================
// Weekly template
// ============================================

/// Get the weekly schedule template for a service version.
///
/// Always yields seven entries sorted Monday through Sunday; days that were
/// never configured come back as closed placeholders.
pub async fn get_weekly_template(
    repo: &dyn FullRepository,
    service_version_id: ServiceVersionId,
) -> RepositoryResult<Vec<WeeklyTemplateEntry>> {
    repo.fetch_service_version(service_version_id).await?;

    let mut entries = repo.fetch_template_week(service_version_id).await?;
    for weekday in WEEK {
        if !entries.iter().any(|e| e.weekday == weekday) {
            entries.push(WeeklyTemplateEntry::closed_default(service_version_id, weekday));
        }
    }
    entries.sort_by_key(|e| e.weekday.num_days_from_monday());
    Ok(entries)
}

/// Modify the template for a specific day of week.
pub async fn update_weekly_template_day(
    repo: &dyn FullRepository,
    service_version_id: ServiceVersionId,
    weekday: Weekday,
    update: WeeklyTemplateUpdate,
    actor: UserId,
) -> RepositoryResult<WeeklyTemplateEntry> {
    validate_template_update(&update)?;
    repo.fetch_service_version(service_version_id).await?;

    let old = repo
        .fetch_template_entry(service_version_id, weekday)
        .await?;
    let entry = repo
        .upsert_template_entry(service_version_id, weekday, update)
        .await?;
    info!(
        "template updated for service version {} on {}",
        service_version_id, weekday
    );

    audit_best_effort(
        repo,
        NewAuditRecord {
            entity_type: ScheduleEntityType::TemplateDay,
            entity_id: entry.id,
            actor,
            old_value: old.as_ref().and_then(snapshot),
            new_value: snapshot(&entry),
            message: format!("day schedule updated for {}", weekday),
        },
    )
    .await;

    Ok(entry)
}

// ============================================
// Slot policy
// ============================================

/// Update the slot generation policy for a service version.
pub async fn update_slot_policy(
    repo: &dyn FullRepository,
    service_version_id: ServiceVersionId,
    update: SlotPolicyUpdate,
    actor: UserId,
) -> RepositoryResult<SlotPolicy> {
    validate_slot_policy(&update)?;
    repo.fetch_service_version(service_version_id).await?;

    let old = repo.fetch_slot_policy(service_version_id).await?;
    let policy = repo.upsert_slot_policy(service_version_id, update).await?;
    info!("slot policy updated for service version {}", service_version_id);

    audit_best_effort(
        repo,
        NewAuditRecord {
            entity_type: ScheduleEntityType::SlotPolicy,
            entity_id: policy.id,
            actor,
            old_value: old.as_ref().and_then(snapshot),
            new_value: snapshot(&policy),
            message: "slot policy updated".to_string(),
        },
    )
    .await;

    Ok(policy)
}

// ============================================
// Date exceptions
// ============================================

/// Create a closure, reduced-hours, or special-event exception.
pub async fn create_exception(
    repo: &dyn FullRepository,
    service_version_id: ServiceVersionId,
    exception: NewDateException,
    actor: UserId,
) -> RepositoryResult<DateException> {
    validate_exception(&exception)?;
    repo.fetch_service_version(service_version_id).await?;

    let record = repo.insert_exception(service_version_id, exception).await?;
    info!(
        "exception {} created for service version {} on {}",
        record.id, service_version_id, record.date
    );

    audit_best_effort(
        repo,
        NewAuditRecord {
            entity_type: ScheduleEntityType::AvailabilityException,
            entity_id: record.id.value(),
            actor,
            old_value: None,
            new_value: snapshot(&record),
            message: format!("availability exception created for {}", record.date),
        },
    )
    .await;

    Ok(record)
}

/// Remove an exception.
pub async fn delete_exception(
    repo: &dyn FullRepository,
    exception_id: ExceptionId,
    actor: UserId,
) -> RepositoryResult<()> {
    let deleted = repo.delete_exception(exception_id).await?;
    info!("exception {} deleted", exception_id);

    audit_best_effort(
        repo,
        NewAuditRecord {
            entity_type: ScheduleEntityType::AvailabilityException,
            entity_id: deleted.id.value(),
            actor,
            old_value: snapshot(&deleted),
            new_value: None,
            message: format!("availability exception deleted for {}", deleted.date),
        },
    )
    .await;

    Ok(())
}

/// List exceptions for a service version with dates in `[from, to]`.
pub async fn list_exceptions(
    repo: &dyn FullRepository,
    service_version_id: ServiceVersionId,
    from: NaiveDate,
    to: NaiveDate,
) -> RepositoryResult<Vec<DateException>> {
    if from > to {
        return Err(RepositoryError::validation(
            format!("date range is inverted ({} > {})", from, to),
            ErrorContext::new("list_exceptions").with_details("to"),
        ));
    }
    repo.fetch_service_version(service_version_id).await?;
    repo.fetch_exceptions_in_range(service_version_id, from, to)
        .await
}

/// True when a full-day closure exception is recorded for the date.
pub async fn is_date_closed(
    repo: &dyn FullRepository,
    service_version_id: ServiceVersionId,
    date: NaiveDate,
) -> RepositoryResult<bool> {
    repo.fetch_service_version(service_version_id).await?;
    let exceptions = repo
        .fetch_exceptions_for_date(service_version_id, date)
        .await?;
    Ok(exceptions.iter().any(|e| e.fully_closed))
}

/// Remove every exception recorded for one date.
pub async fn delete_exceptions_for_date(
    repo: &dyn FullRepository,
    service_version_id: ServiceVersionId,
    date: NaiveDate,
    actor: UserId,
) -> RepositoryResult<usize> {
    repo.fetch_service_version(service_version_id).await?;
    let removed = repo
        .delete_exceptions_for_date(service_version_id, date)
        .await?;
    if removed > 0 {
        info!(
            "{} exceptions deleted for service version {} on {}",
            removed, service_version_id, date
        );
        audit_best_effort(
            repo,
            NewAuditRecord {
                entity_type: ScheduleEntityType::AvailabilityException,
                entity_id: service_version_id.value(),
                actor,
                old_value: None,
                new_value: None,
                message: format!("{} availability exceptions deleted for {}", removed, date),
            },
        )
        .await;
    }
    Ok(removed)
}

// ============================================
// Slot pipeline
// ============================================

/// Compute the available slots for a service version on a date.
///
/// Runs the full pipeline: template + policy + exceptions through the
/// generator, then availability resolution against live booking totals.
/// A service version without a slot policy yields no slots.
pub async fn get_available_slots(
    repo: &dyn FullRepository,
    options: GeneratorOptions,
    service_version_id: ServiceVersionId,
    date: NaiveDate,
) -> RepositoryResult<Vec<ComputedSlot>> {
    repo.fetch_service_version(service_version_id).await?;

    let policy = match repo.fetch_slot_policy(service_version_id).await? {
        Some(policy) => policy,
        None => {
            warn!(
                "no slot policy configured for service version {}",
                service_version_id
            );
            return Ok(Vec::new());
        }
    };

    let entry = repo
        .fetch_template_entry(service_version_id, date.weekday())
        .await?;
    let exceptions = repo
        .fetch_exceptions_for_date(service_version_id, date)
        .await?;

    let candidates = scheduler::generate(entry.as_ref(), &policy, &exceptions, date, options);
    debug!(
        "{} candidate slots for service version {} on {}",
        candidates.len(),
        service_version_id,
        date
    );
    if candidates.is_empty() {
        return Ok(Vec::new());
    }

    scheduler::resolve(repo, date, candidates).await
}

/// Details of the slot starting exactly at `time` on `date`.
pub async fn get_slot_details(
    repo: &dyn FullRepository,
    options: GeneratorOptions,
    service_version_id: ServiceVersionId,
    date: NaiveDate,
    time: NaiveTime,
) -> RepositoryResult<ComputedSlot> {
    let slots = get_available_slots(repo, options, service_version_id, date).await?;
    slots
        .into_iter()
        .find(|slot| slot.start.time() == time)
        .ok_or_else(|| {
            RepositoryError::not_found(
                format!("no slot starts at {} on {}", time, date),
                ErrorContext::new("get_slot_details")
                    .with_entity("computed_slot")
                    .with_entity_id(service_version_id),
            )
        })
}

// ============================================
// Schedule lifecycle
// ============================================

/// Stop accepting reservations for a service version.
pub async fn deactivate_schedule(
    repo: &dyn FullRepository,
    service_version_id: ServiceVersionId,
    actor: UserId,
) -> RepositoryResult<ServiceVersion> {
    let version = repo
        .update_service_version_state(service_version_id, VersionState::Archived)
        .await?;
    info!("schedule deactivated for service version {}", service_version_id);

    audit_best_effort(
        repo,
        NewAuditRecord {
            entity_type: ScheduleEntityType::ServiceVersion,
            entity_id: version.id.value(),
            actor,
            old_value: None,
            new_value: snapshot(&version),
            message: "schedule deactivated".to_string(),
        },
    )
    .await;

    Ok(version)
}

/// Resume accepting reservations for a service version.
pub async fn reactivate_schedule(
    repo: &dyn FullRepository,
    service_version_id: ServiceVersionId,
    actor: UserId,
) -> RepositoryResult<ServiceVersion> {
    let version = repo
        .update_service_version_state(service_version_id, VersionState::Active)
        .await?;
    info!("schedule reactivated for service version {}", service_version_id);

    audit_best_effort(
        repo,
        NewAuditRecord {
            entity_type: ScheduleEntityType::ServiceVersion,
            entity_id: version.id.value(),
            actor,
            old_value: None,
            new_value: snapshot(&version),
            message: "schedule reactivated".to_string(),
        },
    )
    .await;

    Ok(version)
}
