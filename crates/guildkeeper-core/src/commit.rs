//! Commit a completed wizard session into durable storage.
//!
//! The commit service owns every character write: the wizard itself never
//! touches storage. Registration commits are idempotent upserts by natural
//! key, so a retry after a timeout ambiguity converges instead of
//! duplicating. Subclass commits are parent-linked inserts; the per-parent
//! cap is a precondition the wizard entry point checks, not something
//! re-validated here.

use std::sync::Arc;

use guildkeeper_types::character::{Character, CharacterKind, NewCharacter};
use guildkeeper_types::error::{CommitError, RepositoryError};
use guildkeeper_types::session::{GuildChoice, Session, WizardKind};

use crate::repository::{CharacterRepository, TimezoneRepository};
use crate::session::SessionStore;
use crate::sync::SyncNotifier;

/// Maximum subclass records per parent character.
pub const MAX_SUBCLASSES_PER_PARENT: i64 = 3;

/// Turns completed sessions into character records and change signals.
pub struct CommitService<R, T> {
    characters: Arc<R>,
    timezones: Arc<T>,
    sessions: Arc<SessionStore>,
    sync: SyncNotifier,
}

impl<R, T> CommitService<R, T>
where
    R: CharacterRepository,
    T: TimezoneRepository,
{
    pub fn new(
        characters: Arc<R>,
        timezones: Arc<T>,
        sessions: Arc<SessionStore>,
        sync: SyncNotifier,
    ) -> Self {
        Self {
            characters,
            timezones,
            sessions,
            sync,
        }
    }

    /// Commit the session's collected record.
    ///
    /// On success the session is removed and the sync scheduler signaled;
    /// a signaling hiccup never rolls back the committed record. On
    /// storage failure the session is deliberately left in the store so
    /// the member can retry without losing collected answers.
    pub async fn commit(&self, session: &Session) -> Result<Character, CommitError> {
        let target_id = session.target_id();
        let record = self.build_record(session)?;

        let committed = match session.kind {
            WizardKind::NewMain | WizardKind::NewAlt => {
                self.characters.upsert(&record).await?
            }
            WizardKind::NewSubclass => self.characters.insert_subclass(&record).await?,
            WizardKind::Edit(_) => {
                // Preserve the stored kind and parent linkage; the upsert
                // only overwrites the editable attributes on conflict
                let existing = self
                    .characters
                    .get(target_id, &record.name)
                    .await?
                    .ok_or(CommitError::StorageFailure(RepositoryError::NotFound))?;
                let record = NewCharacter {
                    kind: existing.kind,
                    parent_id: existing.parent_id,
                    ..record
                };
                self.characters.upsert(&record).await?
            }
        };

        // Timezone is a member-level attribute with its own natural key
        if let Some(zone_id) = &session.collected.timezone {
            self.timezones.upsert(target_id, zone_id).await?;
        }

        tracing::info!(
            member = %target_id,
            name = %committed.name,
            kind = %committed.kind,
            "character committed"
        );

        self.sessions.remove(session.actor_id);
        self.sync.notify_changed();

        Ok(committed)
    }

    fn build_record(&self, session: &Session) -> Result<NewCharacter, CommitError> {
        let collected = &session.collected;

        let kind = match session.kind {
            WizardKind::NewMain => CharacterKind::Main,
            WizardKind::NewAlt => CharacterKind::Alt,
            WizardKind::NewSubclass => collected
                .parent_kind
                .and_then(|k| k.subclass_kind())
                .ok_or(CommitError::Incomplete("parent kind"))?,
            // Overwritten with the stored kind before the upsert
            WizardKind::Edit(_) => CharacterKind::Main,
        };

        let parent_id = match session.kind {
            WizardKind::NewSubclass => Some(
                collected
                    .parent_id
                    .ok_or(CommitError::Incomplete("parent id"))?,
            ),
            _ => None,
        };

        Ok(NewCharacter {
            target_id: session.target_id(),
            name: collected
                .name
                .clone()
                .ok_or(CommitError::Incomplete("name"))?,
            kind,
            class: collected
                .class
                .clone()
                .ok_or(CommitError::Incomplete("class"))?,
            subclass: collected
                .subclass
                .clone()
                .ok_or(CommitError::Incomplete("subclass"))?,
            role: collected.role.ok_or(CommitError::Incomplete("role"))?,
            ability_score: collected
                .ability_value
                .ok_or(CommitError::Incomplete("ability score"))?,
            guild: collected
                .guild
                .clone()
                .unwrap_or(GuildChoice::None)
                .as_stored(),
            parent_id,
        })
    }
}
