//! Timezone assignment repository trait definition.

use std::future::Future;

use guildkeeper_types::character::TimezoneAssignment;
use guildkeeper_types::error::RepositoryError;
use guildkeeper_types::id::UserId;

/// Repository trait for per-member timezone assignments.
///
/// One row per member, keyed by the member alone -- independent of any
/// character record. Upserted, never historized.
pub trait TimezoneRepository: Send + Sync {
    /// Insert or overwrite the member's timezone.
    fn upsert(
        &self,
        target_id: UserId,
        zone_id: &str,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// Fetch the member's timezone assignment, if any.
    fn get(
        &self,
        target_id: UserId,
    ) -> impl Future<Output = Result<Option<TimezoneAssignment>, RepositoryError>> + Send;
}
