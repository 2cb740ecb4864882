//! SQLite character repository implementation.
//!
//! Implements `CharacterRepository` from `guildkeeper-core` using sqlx
//! with split read/write pools. The natural key (target_id, name) carries
//! a UNIQUE constraint; `upsert` relies on `ON CONFLICT ... DO UPDATE` so
//! retried registrations converge.

use chrono::{DateTime, Utc};
use sqlx::Row;

use guildkeeper_core::repository::CharacterRepository;
use guildkeeper_types::character::{Character, CharacterKind, NewCharacter, Role, RosterRow};
use guildkeeper_types::error::RepositoryError;
use guildkeeper_types::id::{CharacterId, UserId};

use super::pool::DatabasePool;

/// SQLite-backed implementation of `CharacterRepository`.
pub struct SqliteCharacterRepository {
    pool: DatabasePool,
}

impl SqliteCharacterRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to the domain Character.
struct CharacterRow {
    id: i64,
    target_id: String,
    name: String,
    kind: String,
    class: String,
    subclass: String,
    role: String,
    ability_score: i64,
    guild: Option<String>,
    parent_id: Option<i64>,
    created_at: String,
    updated_at: String,
}

impl CharacterRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            target_id: row.try_get("target_id")?,
            name: row.try_get("name")?,
            kind: row.try_get("kind")?,
            class: row.try_get("class")?,
            subclass: row.try_get("subclass")?,
            role: row.try_get("role")?,
            ability_score: row.try_get("ability_score")?,
            guild: row.try_get("guild")?,
            parent_id: row.try_get("parent_id")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_character(self) -> Result<Character, RepositoryError> {
        let target_id = self
            .target_id
            .parse::<UserId>()
            .map_err(|e| RepositoryError::Query(format!("invalid target id: {e}")))?;

        let kind: CharacterKind = self.kind.parse().map_err(RepositoryError::Query)?;
        let role: Role = self.role.parse().map_err(RepositoryError::Query)?;

        let created_at = parse_datetime(&self.created_at)?;
        let updated_at = parse_datetime(&self.updated_at)?;

        Ok(Character {
            id: CharacterId::new(self.id),
            target_id,
            name: self.name,
            kind,
            class: self.class,
            subclass: self.subclass,
            role,
            ability_score: self.ability_score,
            guild: self.guild,
            parent_id: self.parent_id.map(CharacterId::new),
            created_at,
            updated_at,
        })
    }
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

impl CharacterRepository for SqliteCharacterRepository {
    async fn upsert(&self, character: &NewCharacter) -> Result<Character, RepositoryError> {
        let now = format_datetime(&Utc::now());

        sqlx::query(
            "INSERT INTO characters (target_id, name, kind, class, subclass, role, ability_score, guild, parent_id, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT (target_id, name) DO UPDATE SET
                 class = excluded.class,
                 subclass = excluded.subclass,
                 role = excluded.role,
                 ability_score = excluded.ability_score,
                 guild = excluded.guild,
                 updated_at = excluded.updated_at",
        )
        .bind(character.target_id.to_string())
        .bind(&character.name)
        .bind(character.kind.to_string())
        .bind(&character.class)
        .bind(&character.subclass)
        .bind(character.role.to_string())
        .bind(character.ability_score)
        .bind(&character.guild)
        .bind(character.parent_id.map(|p| p.get()))
        .bind(&now)
        .bind(&now)
        .execute(&self.pool.writer)
        .await
        .map_err(map_sqlx_error)?;

        self.get(character.target_id, &character.name)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    async fn insert_subclass(&self, character: &NewCharacter) -> Result<Character, RepositoryError> {
        let now = format_datetime(&Utc::now());

        let result = sqlx::query(
            "INSERT INTO characters (target_id, name, kind, class, subclass, role, ability_score, guild, parent_id, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(character.target_id.to_string())
        .bind(&character.name)
        .bind(character.kind.to_string())
        .bind(&character.class)
        .bind(&character.subclass)
        .bind(character.role.to_string())
        .bind(character.ability_score)
        .bind(&character.guild)
        .bind(character.parent_id.map(|p| p.get()))
        .bind(&now)
        .bind(&now)
        .execute(&self.pool.writer)
        .await;

        match result {
            Ok(_) => self
                .get(character.target_id, &character.name)
                .await?
                .ok_or(RepositoryError::NotFound),
            Err(sqlx::Error::Database(db_err)) if db_err.message().contains("UNIQUE") => {
                Err(RepositoryError::Conflict(format!(
                    "character '{}' already exists",
                    character.name
                )))
            }
            Err(e) => Err(map_sqlx_error(e)),
        }
    }

    async fn get(
        &self,
        target_id: UserId,
        name: &str,
    ) -> Result<Option<Character>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, target_id, name, kind, class, subclass, role, ability_score, guild, parent_id, created_at, updated_at
             FROM characters WHERE target_id = ? AND name = ?",
        )
        .bind(target_id.to_string())
        .bind(name)
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(map_sqlx_error)?;

        row.map(|r| CharacterRow::from_row(&r).map_err(map_sqlx_error))
            .transpose()?
            .map(CharacterRow::into_character)
            .transpose()
    }

    async fn count_subclasses(&self, parent_id: CharacterId) -> Result<i64, RepositoryError> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM characters WHERE parent_id = ?")
                .bind(parent_id.get())
                .fetch_one(&self.pool.reader)
                .await
                .map_err(map_sqlx_error)?;
        Ok(count.0)
    }

    async fn fetch_all_with_timezones(&self) -> Result<Vec<RosterRow>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT c.id, c.target_id, c.name, c.kind, c.class, c.subclass, c.role,
                    c.ability_score, c.guild, c.parent_id, c.created_at, c.updated_at,
                    t.zone_id
             FROM characters c
             LEFT JOIN timezone_assignments t ON t.target_id = c.target_id
             ORDER BY c.target_id, c.name",
        )
        .fetch_all(&self.pool.reader)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter()
            .map(|row| {
                let zone_id: Option<String> =
                    row.try_get("zone_id").map_err(map_sqlx_error)?;
                let character = CharacterRow::from_row(&row)
                    .map_err(map_sqlx_error)?
                    .into_character()?;
                Ok(RosterRow { character, zone_id })
            })
            .collect()
    }

    async fn delete(&self, target_id: UserId, name: &str) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM characters WHERE target_id = ? AND name = ?")
            .bind(target_id.to_string())
            .bind(name)
            .execute(&self.pool.writer)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }
}

fn map_sqlx_error(e: sqlx::Error) -> RepositoryError {
    match e {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => RepositoryError::Connection,
        other => RepositoryError::Query(other.to_string()),
    }
}
