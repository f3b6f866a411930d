//! Schedule repository trait: service versions, weekly templates, slot
//! policies, and date exceptions.

use async_trait::async_trait;
use chrono::{NaiveDate, Weekday};

use super::error::RepositoryResult;
use crate::api::{
    DateException, ExceptionId, NewDateException, ServiceVersion, ServiceVersionId, SlotPolicy,
    SlotPolicyUpdate, VersionState, WeeklyTemplateEntry, WeeklyTemplateUpdate,
};

/// Repository trait for schedule configuration data.
///
/// Weekly templates and slot policies are upserted (created lazily on first
/// write); exceptions are created and deleted, never edited in place.
#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    // ==================== Service Versions ====================

    /// Fetch a service version by id.
    ///
    /// # Returns
    /// * `Ok(ServiceVersion)` - The version record
    /// * `Err(RepositoryError::NotFound)` - If no such version exists
    async fn fetch_service_version(
        &self,
        id: ServiceVersionId,
    ) -> RepositoryResult<ServiceVersion>;

    /// Change a service version's lifecycle state, returning the updated
    /// record.
    async fn update_service_version_state(
        &self,
        id: ServiceVersionId,
        state: VersionState,
    ) -> RepositoryResult<ServiceVersion>;

    // ==================== Weekly Template ====================

    /// Fetch the template entry for one day of week, if configured.
    async fn fetch_template_entry(
        &self,
        service_version_id: ServiceVersionId,
        weekday: Weekday,
    ) -> RepositoryResult<Option<WeeklyTemplateEntry>>;

    /// Fetch all configured template entries for a service version.
    ///
    /// Days that were never configured are absent; callers fill in closed
    /// defaults when a full week is needed.
    async fn fetch_template_week(
        &self,
        service_version_id: ServiceVersionId,
    ) -> RepositoryResult<Vec<WeeklyTemplateEntry>>;

    /// Create or replace the template entry for one day of week.
    async fn upsert_template_entry(
        &self,
        service_version_id: ServiceVersionId,
        weekday: Weekday,
        update: WeeklyTemplateUpdate,
    ) -> RepositoryResult<WeeklyTemplateEntry>;

    // ==================== Slot Policy ====================

    /// Fetch the active slot policy for a service version, if one exists.
    async fn fetch_slot_policy(
        &self,
        service_version_id: ServiceVersionId,
    ) -> RepositoryResult<Option<SlotPolicy>>;

    /// Create or replace the slot policy for a service version.
    async fn upsert_slot_policy(
        &self,
        service_version_id: ServiceVersionId,
        update: SlotPolicyUpdate,
    ) -> RepositoryResult<SlotPolicy>;

    // ==================== Date Exceptions ====================

    /// Insert a new exception; the repository assigns its id and creation
    /// timestamp (the timestamp drives override resolution order).
    async fn insert_exception(
        &self,
        service_version_id: ServiceVersionId,
        exception: NewDateException,
    ) -> RepositoryResult<DateException>;

    /// Fetch a single exception by id.
    async fn fetch_exception(&self, id: ExceptionId) -> RepositoryResult<DateException>;

    /// Delete an exception, returning the deleted record.
    ///
    /// # Returns
    /// * `Ok(DateException)` - The record as it was before deletion
    /// * `Err(RepositoryError::NotFound)` - If no such exception exists
    async fn delete_exception(&self, id: ExceptionId) -> RepositoryResult<DateException>;

    /// All exceptions for a service version on one date, ordered by
    /// (creation timestamp, id).
    async fn fetch_exceptions_for_date(
        &self,
        service_version_id: ServiceVersionId,
        date: NaiveDate,
    ) -> RepositoryResult<Vec<DateException>>;

    /// All exceptions for a service version with dates in `[from, to]`,
    /// ordered by (date, creation timestamp, id).
    async fn fetch_exceptions_in_range(
        &self,
        service_version_id: ServiceVersionId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> RepositoryResult<Vec<DateException>>;

    /// Delete every exception for a service version on one date.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of exceptions removed
    async fn delete_exceptions_for_date(
        &self,
        service_version_id: ServiceVersionId,
        date: NaiveDate,
    ) -> RepositoryResult<usize>;
}
