//! Audit log and notification dispatch traits.
//!
//! Both are one-way collaborator hooks: the engine appends records and
//! fires events but never reads them back for its own decisions.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::api::{AuditRecord, NewAuditRecord, ScheduleChangeEvent};

/// Append-only audit log of schedule mutations.
///
/// Audit failures must never block the mutation they describe; callers log
/// and continue.
#[async_trait]
pub trait AuditRepository: Send + Sync {
    /// Append an audit record; the repository assigns id and timestamp.
    async fn append_audit(&self, record: NewAuditRecord) -> RepositoryResult<AuditRecord>;
}

/// Fire-and-forget notification dispatch.
///
/// Delivery, retries, and channels are the notification system's concern;
/// the engine only emits the event.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Notify that a schedule change affects an existing reservation.
    async fn notify_schedule_change(&self, event: ScheduleChangeEvent) -> RepositoryResult<()>;
}
