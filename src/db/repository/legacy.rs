//! Legacy slot repository trait.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::error::RepositoryResult;
use crate::api::{LegacySlot, LegacySlotId, NewLegacySlot};

/// Repository trait for the superseded fixed-slot model.
///
/// Slots are append-only: `transition_slot` is the only way to change a
/// slot's hours once it exists, and it never edits the time fields of the
/// old version.
#[async_trait]
pub trait LegacySlotRepository: Send + Sync {
    /// Fetch a legacy slot by id.
    async fn fetch_slot(&self, id: LegacySlotId) -> RepositoryResult<LegacySlot>;

    /// Insert a new slot version.
    async fn insert_slot(&self, slot: NewLegacySlot) -> RepositoryResult<LegacySlot>;

    /// Update a slot's non-temporal fields (active flag, validity close).
    async fn update_slot(&self, slot: LegacySlot) -> RepositoryResult<LegacySlot>;

    /// Atomically supersede a slot: close the old version's validity window
    /// the day before `effective_from`, insert `replacement`, and link the
    /// old version to the new one through `superseded_by`.
    ///
    /// The three writes form one unit: no interleaved reader or crash may
    /// observe a closed slot without a reachable successor.
    ///
    /// # Returns
    /// * `Ok((old, new))` - Both slot versions after the transition
    /// * `Err(RepositoryError::NotFound)` - If `old_id` does not exist
    async fn transition_slot(
        &self,
        old_id: LegacySlotId,
        effective_from: NaiveDate,
        replacement: NewLegacySlot,
    ) -> RepositoryResult<(LegacySlot, LegacySlot)>;
}
