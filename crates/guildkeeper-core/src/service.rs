//! Wizard service facade: the contract the presentation layer calls.
//!
//! Orchestrates SessionStore + WizardEngine + CommitService. Every call
//! answers with a `RenderInstruction`; the chat layer does the drawing.
//! Session lookups that come back empty produce `SessionExpired`, a normal
//! "please restart" outcome rather than a failure.

use std::collections::HashMap;
use std::sync::Arc;

use guildkeeper_types::character::Character;
use guildkeeper_types::error::{CommitError, RepositoryError, WizardError};
use guildkeeper_types::id::UserId;
use guildkeeper_types::render::RenderInstruction;
use guildkeeper_types::session::{
    CollectedFields, EditField, GuildChoice, Session, StepTag, WizardKind,
};

use crate::catalog::ability;
use crate::commit::{CommitService, MAX_SUBCLASSES_PER_PARENT};
use crate::repository::{CharacterRepository, TimezoneRepository};
use crate::session::SessionStore;
use crate::wizard::{EngineOutcome, WizardEngine};

/// Errors surfaced through the service facade.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Wizard(#[from] WizardError),

    /// Commit-time storage failure. The session is retained; the member
    /// is told to try again.
    #[error(transparent)]
    Commit(#[from] CommitError),

    /// Storage failure outside commit (e.g. resolving a parent record).
    #[error("storage failure: {0}")]
    Storage(#[from] RepositoryError),
}

/// The data-collection entry points consumed by the chat layer.
pub struct WizardService<R, T> {
    engine: WizardEngine,
    sessions: Arc<SessionStore>,
    characters: Arc<R>,
    commit: CommitService<R, T>,
}

impl<R, T> WizardService<R, T>
where
    R: CharacterRepository,
    T: TimezoneRepository,
{
    pub fn new(
        engine: WizardEngine,
        sessions: Arc<SessionStore>,
        characters: Arc<R>,
        commit: CommitService<R, T>,
    ) -> Self {
        Self {
            engine,
            sessions,
            characters,
            commit,
        }
    }

    /// Start a registration wizard.
    ///
    /// For `NewSubclass`, `parent_name` addresses the character the
    /// subclass attaches to; the per-parent cap of
    /// [`MAX_SUBCLASSES_PER_PARENT`] is checked here, before any session
    /// exists. Starting a wizard unconditionally abandons any in-progress
    /// one for the same actor.
    pub async fn begin(
        &self,
        actor_id: UserId,
        kind: WizardKind,
        acting_on_behalf_of: Option<UserId>,
        parent_name: Option<&str>,
    ) -> Result<RenderInstruction, ServiceError> {
        debug_assert!(kind.is_creation(), "edits must go through begin_edit");
        let mut session = Session::new(
            actor_id,
            kind,
            acting_on_behalf_of,
            self.engine.initial_step(kind),
        );

        if kind == WizardKind::NewSubclass {
            let parent_name = parent_name.ok_or(WizardError::MissingParent)?;
            let parent = self.resolve_parent(session.target_id(), parent_name).await?;
            session.collected.parent_id = Some(parent.id);
            session.collected.parent_kind = Some(parent.kind);
        }

        tracing::info!(actor = %actor_id, kind = ?kind, "wizard started");
        let render = self.engine.render(&session);
        self.sessions.put(session);
        Ok(render)
    }

    /// Start an edit wizard for one field of an existing character.
    ///
    /// The session is seeded from the stored record so the engine can
    /// detect changes (the class-change forced guild revisit) and commit
    /// without re-asking for the name.
    pub async fn begin_edit(
        &self,
        actor_id: UserId,
        field: EditField,
        name: &str,
        acting_on_behalf_of: Option<UserId>,
    ) -> Result<RenderInstruction, ServiceError> {
        let kind = WizardKind::Edit(field);
        let target_id = acting_on_behalf_of.unwrap_or(actor_id);
        let existing = self
            .characters
            .get(target_id, name)
            .await?
            .ok_or_else(|| WizardError::UnknownCharacter(name.to_string()))?;

        let mut session = Session::new(
            actor_id,
            kind,
            acting_on_behalf_of,
            self.engine.initial_step(kind),
        );
        let collected = seed_from(&existing);
        session.baseline = Some(collected.clone());
        session.collected = collected;

        tracing::info!(actor = %actor_id, name = %existing.name, field = ?field, "edit wizard started");
        let render = self.engine.render(&session);
        self.sessions.put(session);
        Ok(render)
    }

    /// Handle one choice selection for the actor's session.
    pub async fn submit_selection(
        &self,
        actor_id: UserId,
        step: StepTag,
        value: &str,
    ) -> Result<RenderInstruction, ServiceError> {
        let mut session = self
            .sessions
            .get(actor_id)
            .ok_or(WizardError::SessionExpired)?;

        let outcome = match self.engine.apply_selection(&mut session, step, value) {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::warn!(actor = %actor_id, step = %step, value, "selection rejected");
                return Err(err.into());
            }
        };
        self.finish_event(session, outcome).await
    }

    /// Handle the name form submission for the actor's session.
    pub async fn submit_form(
        &self,
        actor_id: UserId,
        step: StepTag,
        fields: &HashMap<String, String>,
    ) -> Result<RenderInstruction, ServiceError> {
        let mut session = self
            .sessions
            .get(actor_id)
            .ok_or(WizardError::SessionExpired)?;

        let outcome = self.engine.apply_form(&mut session, step, fields)?;
        self.finish_event(session, outcome).await
    }

    /// Handle a back event: pop one step and re-render it.
    pub async fn back(&self, actor_id: UserId) -> Result<RenderInstruction, ServiceError> {
        let mut session = self
            .sessions
            .get(actor_id)
            .ok_or(WizardError::SessionExpired)?;

        let render = self.engine.apply_back(&mut session);
        self.sessions.put(session);
        Ok(render)
    }

    /// Abandon the actor's session, if any.
    pub async fn cancel(&self, actor_id: UserId) -> Result<RenderInstruction, ServiceError> {
        self.sessions.remove(actor_id);
        tracing::info!(actor = %actor_id, "wizard cancelled");
        Ok(RenderInstruction::message(
            StepTag::Committed,
            "Wizard cancelled.",
        ))
    }

    /// Persist the mutated session, committing if the flow completed.
    async fn finish_event(
        &self,
        session: Session,
        outcome: EngineOutcome,
    ) -> Result<RenderInstruction, ServiceError> {
        // Store progress before committing: a commit-time storage failure
        // must leave the collected answers in place for a retry
        self.sessions.put(session.clone());

        match outcome {
            EngineOutcome::Next(render) => Ok(render),
            EngineOutcome::Complete => {
                let character = self.commit.commit(&session).await?;
                Ok(
                    RenderInstruction::message(StepTag::Committed, "All done!").with_description(
                        format!(
                            "{} ({} {}) registered.",
                            character.name, character.class, character.subclass
                        ),
                    ),
                )
            }
        }
    }

    async fn resolve_parent(
        &self,
        target_id: UserId,
        parent_name: &str,
    ) -> Result<Character, ServiceError> {
        let parent = self
            .characters
            .get(target_id, parent_name)
            .await?
            .ok_or_else(|| WizardError::UnknownCharacter(parent_name.to_string()))?;

        if parent.kind.subclass_kind().is_none() {
            return Err(WizardError::InvalidParent(parent_name.to_string()).into());
        }

        let count = self.characters.count_subclasses(parent.id).await?;
        if count >= MAX_SUBCLASSES_PER_PARENT {
            return Err(WizardError::SubclassCapExceeded {
                parent: parent_name.to_string(),
                count,
                limit: MAX_SUBCLASSES_PER_PARENT,
            }
            .into());
        }

        Ok(parent)
    }
}

/// Seed collected fields from a stored record for an edit session.
fn seed_from(character: &Character) -> CollectedFields {
    CollectedFields {
        class: Some(character.class.clone()),
        subclass: Some(character.subclass.clone()),
        role: Some(character.role),
        ability_label: Some(ability::label_for_value(character.ability_score)),
        ability_value: Some(character.ability_score),
        guild: Some(match &character.guild {
            Some(g) => GuildChoice::Guild(g.clone()),
            None => GuildChoice::None,
        }),
        timezone: None,
        name: Some(character.name.clone()),
        parent_id: character.parent_id,
        parent_kind: None,
    }
}
