//! No-op publisher for deployments without a sheet endpoint.

use guildkeeper_core::sync::SheetPublisher;
use guildkeeper_types::character::RosterRow;
use guildkeeper_types::error::PushError;

/// Accepts every push without sending it anywhere.
///
/// Used when no sheet endpoint is configured: commits still land in
/// storage and the scheduler keeps its cadence, so enabling the endpoint
/// later needs no other change.
pub struct DisabledSheetPublisher;

impl SheetPublisher for DisabledSheetPublisher {
    async fn replace_all(&self, rows: &[RosterRow]) -> Result<(), PushError> {
        tracing::debug!(rows = rows.len(), "sheet push skipped (no endpoint configured)");
        Ok(())
    }
}
