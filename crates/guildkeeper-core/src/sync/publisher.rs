//! Sheet publisher trait definition.

use std::future::Future;

use guildkeeper_types::character::RosterRow;
use guildkeeper_types::error::PushError;

/// Port to the external record-keeping system.
///
/// Every push is a full-dataset replace, never an incremental diff -- the
/// external side converges regardless of how many commits were coalesced
/// into one push. Implementations live in guildkeeper-infra.
pub trait SheetPublisher: Send + Sync {
    /// Replace the external representation with `rows`.
    ///
    /// Must distinguish throttling/quota rejections (`PushError::Throttled`)
    /// from other failures so the scheduler can back off.
    fn replace_all(
        &self,
        rows: &[RosterRow],
    ) -> impl Future<Output = Result<(), PushError>> + Send;
}
