//! Repository trait definitions for the availability engine's collaborators.
//!
//! The engine never talks to a concrete store: schedule configuration, the
//! reservation ledger, legacy slots, the audit log, and notification
//! dispatch are all consumed through the traits defined here. Backends are
//! swapped without touching the scheduling logic.
//!
//! # Thread Safety
//! All traits require `Send + Sync` so repositories can be shared across
//! async tasks behind an `Arc`.

pub mod audit;
pub mod error;
pub mod legacy;
pub mod reservation;
pub mod schedule;

pub use audit::{AuditRepository, NotificationSink};
pub use error::{ErrorContext, RepositoryError, RepositoryResult};
pub use legacy::LegacySlotRepository;
pub use reservation::ReservationRepository;
pub use schedule::ScheduleRepository;

use async_trait::async_trait;

/// Umbrella trait implemented by complete backends.
///
/// A `FullRepository` provides every collaborator interface the engine
/// consumes plus a liveness probe for health endpoints.
#[async_trait]
pub trait FullRepository:
    ScheduleRepository
    + ReservationRepository
    + LegacySlotRepository
    + AuditRepository
    + NotificationSink
    + Send
    + Sync
{
    /// Check that the backing store is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;
}
