//! Character repository trait definition.

use std::future::Future;

use guildkeeper_types::character::{Character, NewCharacter, RosterRow};
use guildkeeper_types::error::RepositoryError;
use guildkeeper_types::id::{CharacterId, UserId};

/// Repository trait for character persistence.
///
/// Characters are addressed by their natural key (target user + in-game
/// name). Registration is idempotent: `upsert` overwrites the mutable
/// attributes on conflict so retried commits converge instead of
/// duplicating.
pub trait CharacterRepository: Send + Sync {
    /// Insert a character, or overwrite class/subclass/role/ability/guild
    /// on natural-key conflict. Returns the stored record.
    fn upsert(
        &self,
        character: &NewCharacter,
    ) -> impl Future<Output = Result<Character, RepositoryError>> + Send;

    /// Insert a subclass record linked to its parent. Never overwrites.
    fn insert_subclass(
        &self,
        character: &NewCharacter,
    ) -> impl Future<Output = Result<Character, RepositoryError>> + Send;

    /// Fetch one character by natural key.
    fn get(
        &self,
        target_id: UserId,
        name: &str,
    ) -> impl Future<Output = Result<Option<Character>, RepositoryError>> + Send;

    /// Number of subclass records linked to `parent_id`.
    fn count_subclasses(
        &self,
        parent_id: CharacterId,
    ) -> impl Future<Output = Result<i64, RepositoryError>> + Send;

    /// The full roster joined with timezone assignments, for the external
    /// push. Ordering is stable (target id, then name).
    fn fetch_all_with_timezones(
        &self,
    ) -> impl Future<Output = Result<Vec<RosterRow>, RepositoryError>> + Send;

    /// Delete one character by natural key. No-op if absent.
    fn delete(
        &self,
        target_id: UserId,
        name: &str,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;
}
