//! SQLite timezone assignment repository implementation.

use chrono::{DateTime, Utc};
use sqlx::Row;

use guildkeeper_core::repository::TimezoneRepository;
use guildkeeper_types::character::TimezoneAssignment;
use guildkeeper_types::error::RepositoryError;
use guildkeeper_types::id::UserId;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `TimezoneRepository`.
pub struct SqliteTimezoneRepository {
    pool: DatabasePool,
}

impl SqliteTimezoneRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

impl TimezoneRepository for SqliteTimezoneRepository {
    async fn upsert(&self, target_id: UserId, zone_id: &str) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO timezone_assignments (target_id, zone_id, updated_at)
             VALUES (?, ?, ?)
             ON CONFLICT (target_id) DO UPDATE SET
                 zone_id = excluded.zone_id,
                 updated_at = excluded.updated_at",
        )
        .bind(target_id.to_string())
        .bind(zone_id)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(())
    }

    async fn get(&self, target_id: UserId) -> Result<Option<TimezoneAssignment>, RepositoryError> {
        let row = sqlx::query(
            "SELECT target_id, zone_id, updated_at FROM timezone_assignments WHERE target_id = ?",
        )
        .bind(target_id.to_string())
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        row.map(|r| {
            let zone_id: String = r
                .try_get("zone_id")
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            let updated_at: String = r
                .try_get("updated_at")
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            let updated_at = DateTime::parse_from_rfc3339(&updated_at)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))?;
            Ok(TimezoneAssignment {
                target_id,
                zone_id,
                updated_at,
            })
        })
        .transpose()
    }
}
