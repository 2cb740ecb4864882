//! End-to-end wizard flows through the service facade, against in-memory
//! repositories.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::mpsc;

use guildkeeper_core::commit::CommitService;
use guildkeeper_core::repository::{CharacterRepository, TimezoneRepository};
use guildkeeper_core::service::{ServiceError, WizardService};
use guildkeeper_core::session::SessionStore;
use guildkeeper_core::sync::SyncNotifier;
use guildkeeper_core::wizard::WizardEngine;
use guildkeeper_types::character::{
    Character, CharacterKind, NewCharacter, Role, RosterRow, TimezoneAssignment,
};
use guildkeeper_types::error::{CommitError, RepositoryError, WizardError};
use guildkeeper_types::id::{CharacterId, UserId};
use guildkeeper_types::session::{EditField, StepTag, WizardKind};

// ---------------------------------------------------------------------------
// In-memory repositories
// ---------------------------------------------------------------------------

#[derive(Default)]
struct MemoryCharacters {
    by_key: Mutex<HashMap<(u64, String), Character>>,
    next_id: Mutex<i64>,
    fail_writes: Mutex<bool>,
}

impl MemoryCharacters {
    fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn set_failing(&self, failing: bool) {
        *self.fail_writes.lock().unwrap() = failing;
    }

    fn store(&self, record: &NewCharacter) -> Character {
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        let now = Utc::now();
        let character = Character {
            id: CharacterId::new(*next),
            target_id: record.target_id,
            name: record.name.clone(),
            kind: record.kind,
            class: record.class.clone(),
            subclass: record.subclass.clone(),
            role: record.role,
            ability_score: record.ability_score,
            guild: record.guild.clone(),
            parent_id: record.parent_id,
            created_at: now,
            updated_at: now,
        };
        self.by_key.lock().unwrap().insert(
            (record.target_id.get(), record.name.clone()),
            character.clone(),
        );
        character
    }
}

impl CharacterRepository for MemoryCharacters {
    async fn upsert(&self, record: &NewCharacter) -> Result<Character, RepositoryError> {
        if *self.fail_writes.lock().unwrap() {
            return Err(RepositoryError::Connection);
        }
        let key = (record.target_id.get(), record.name.clone());
        let existing = self.by_key.lock().unwrap().get(&key).cloned();
        match existing {
            Some(mut stored) => {
                stored.class = record.class.clone();
                stored.subclass = record.subclass.clone();
                stored.role = record.role;
                stored.ability_score = record.ability_score;
                stored.guild = record.guild.clone();
                stored.updated_at = Utc::now();
                self.by_key.lock().unwrap().insert(key, stored.clone());
                Ok(stored)
            }
            None => Ok(self.store(record)),
        }
    }

    async fn insert_subclass(&self, record: &NewCharacter) -> Result<Character, RepositoryError> {
        if *self.fail_writes.lock().unwrap() {
            return Err(RepositoryError::Connection);
        }
        let key = (record.target_id.get(), record.name.clone());
        if self.by_key.lock().unwrap().contains_key(&key) {
            return Err(RepositoryError::Conflict(format!(
                "'{}' already exists",
                record.name
            )));
        }
        Ok(self.store(record))
    }

    async fn get(
        &self,
        target_id: UserId,
        name: &str,
    ) -> Result<Option<Character>, RepositoryError> {
        Ok(self
            .by_key
            .lock()
            .unwrap()
            .get(&(target_id.get(), name.to_string()))
            .cloned())
    }

    async fn count_subclasses(&self, parent_id: CharacterId) -> Result<i64, RepositoryError> {
        Ok(self
            .by_key
            .lock()
            .unwrap()
            .values()
            .filter(|c| c.parent_id == Some(parent_id))
            .count() as i64)
    }

    async fn fetch_all_with_timezones(&self) -> Result<Vec<RosterRow>, RepositoryError> {
        Ok(self
            .by_key
            .lock()
            .unwrap()
            .values()
            .cloned()
            .map(|character| RosterRow {
                character,
                zone_id: None,
            })
            .collect())
    }

    async fn delete(&self, target_id: UserId, name: &str) -> Result<(), RepositoryError> {
        self.by_key
            .lock()
            .unwrap()
            .remove(&(target_id.get(), name.to_string()));
        Ok(())
    }
}

#[derive(Default)]
struct MemoryTimezones {
    by_target: Mutex<HashMap<u64, String>>,
}

impl TimezoneRepository for MemoryTimezones {
    async fn upsert(&self, target_id: UserId, zone_id: &str) -> Result<(), RepositoryError> {
        self.by_target
            .lock()
            .unwrap()
            .insert(target_id.get(), zone_id.to_string());
        Ok(())
    }

    async fn get(&self, target_id: UserId) -> Result<Option<TimezoneAssignment>, RepositoryError> {
        Ok(self
            .by_target
            .lock()
            .unwrap()
            .get(&target_id.get())
            .map(|zone_id| TimezoneAssignment {
                target_id,
                zone_id: zone_id.clone(),
                updated_at: Utc::now(),
            }))
    }
}

// ---------------------------------------------------------------------------
// Fixture
// ---------------------------------------------------------------------------

struct Fixture {
    characters: Arc<MemoryCharacters>,
    timezones: Arc<MemoryTimezones>,
    sessions: Arc<SessionStore>,
    service: WizardService<MemoryCharacters, MemoryTimezones>,
    sync_rx: mpsc::Receiver<()>,
}

fn make_fixture(guilds: Vec<&str>) -> Fixture {
    let characters = MemoryCharacters::new();
    let timezones = Arc::new(MemoryTimezones::default());
    let sessions = Arc::new(SessionStore::new(Duration::from_secs(1800)));
    let (tx, sync_rx) = mpsc::channel(1);
    let commit = CommitService::new(
        characters.clone(),
        timezones.clone(),
        sessions.clone(),
        SyncNotifier::new(tx),
    );
    let engine = WizardEngine::new(guilds.into_iter().map(String::from).collect());
    let service = WizardService::new(engine, sessions.clone(), characters.clone(), commit);
    Fixture {
        characters,
        timezones,
        sessions,
        service,
        sync_rx,
    }
}

async fn select(fx: &Fixture, actor: UserId, step: StepTag, value: &str) {
    fx.service
        .submit_selection(actor, step, value)
        .await
        .unwrap();
}

fn name_fields(name: &str) -> HashMap<String, String> {
    let mut fields = HashMap::new();
    fields.insert("name".to_string(), name.to_string());
    fields
}

// ---------------------------------------------------------------------------
// Registration flows
// ---------------------------------------------------------------------------

#[tokio::test]
async fn main_registration_with_empty_guild_catalog() {
    let mut fx = make_fixture(Vec::new());
    let actor = UserId::new(1);

    let render = fx
        .service
        .begin(actor, WizardKind::NewMain, None, None)
        .await
        .unwrap();
    assert_eq!(render.step, StepTag::ChooseClass);

    select(&fx, actor, StepTag::ChooseClass, "Frost Mage").await;
    select(&fx, actor, StepTag::ChooseSubclass, "Icicle").await;
    select(&fx, actor, StepTag::ChooseAbilityScore, "20k-22k").await;

    // Guild catalog empty: the session is already on the timezone step
    let session = fx.sessions.get(actor).unwrap();
    assert_eq!(session.current_step, StepTag::ChooseTimezone);
    assert!(!session.back_stack.contains(&StepTag::ChooseGuild));

    select(&fx, actor, StepTag::ChooseTimezone, "Asia/Tokyo").await;

    let done = fx
        .service
        .submit_form(actor, StepTag::SubmitName, &name_fields("Yuki"))
        .await
        .unwrap();
    assert_eq!(done.step, StepTag::Committed);

    // The committed record matches the collected answers
    let character = fx.characters.get(actor, "Yuki").await.unwrap().unwrap();
    assert_eq!(character.kind, CharacterKind::Main);
    assert_eq!(character.class, "Frost Mage");
    assert_eq!(character.subclass, "Icicle");
    assert_eq!(character.role, Role::Dps);
    assert_eq!(character.ability_score, 21_000);
    assert_eq!(character.guild, None, "skipped guild commits as none");

    let tz = fx.timezones.get(actor).await.unwrap().unwrap();
    assert_eq!(tz.zone_id, "Asia/Tokyo");

    // Session removed; one push signal pending
    assert!(fx.sessions.get(actor).is_none());
    assert!(fx.sync_rx.try_recv().is_ok());
}

#[tokio::test]
async fn begin_replaces_in_progress_wizard() {
    let fx = make_fixture(Vec::new());
    let actor = UserId::new(1);

    fx.service
        .begin(actor, WizardKind::NewMain, None, None)
        .await
        .unwrap();
    select(&fx, actor, StepTag::ChooseClass, "Frost Mage").await;

    // A fresh invocation abandons the first wizard
    fx.service
        .begin(actor, WizardKind::NewAlt, None, None)
        .await
        .unwrap();
    let session = fx.sessions.get(actor).unwrap();
    assert_eq!(session.kind, WizardKind::NewAlt);
    assert_eq!(session.collected.class, None);
}

#[tokio::test]
async fn acting_on_behalf_of_registers_for_target() {
    let fx = make_fixture(Vec::new());
    let admin = UserId::new(5);
    let member = UserId::new(77);

    fx.service
        .begin(admin, WizardKind::NewMain, Some(member), None)
        .await
        .unwrap();
    select(&fx, admin, StepTag::ChooseClass, "Chanter").await;
    select(&fx, admin, StepTag::ChooseSubclass, "Harmony").await;
    select(&fx, admin, StepTag::ChooseAbilityScore, "12k-14k").await;
    select(&fx, admin, StepTag::ChooseTimezone, "Europe/Berlin").await;
    fx.service
        .submit_form(admin, StepTag::SubmitName, &name_fields("Mira"))
        .await
        .unwrap();

    let character = fx.characters.get(member, "Mira").await.unwrap().unwrap();
    assert_eq!(character.target_id, member);
    assert!(fx.characters.get(admin, "Mira").await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Subclass cap precondition
// ---------------------------------------------------------------------------

async fn seed_parent_with_subclasses(fx: &Fixture, target: UserId, count: usize) -> Character {
    let parent = fx
        .characters
        .upsert(&NewCharacter {
            target_id: target,
            name: "Yuki".to_string(),
            kind: CharacterKind::Main,
            class: "Frost Mage".to_string(),
            subclass: "Icicle".to_string(),
            role: Role::Dps,
            ability_score: 21_000,
            guild: None,
            parent_id: None,
        })
        .await
        .unwrap();

    for i in 0..count {
        fx.characters
            .insert_subclass(&NewCharacter {
                target_id: target,
                name: format!("Yuki-{i}"),
                kind: CharacterKind::SubclassOfMain,
                class: "Frost Mage".to_string(),
                subclass: "Deep Freeze".to_string(),
                role: Role::Dps,
                ability_score: 21_000,
                guild: None,
                parent_id: Some(parent.id),
            })
            .await
            .unwrap();
    }
    parent
}

#[tokio::test]
async fn fourth_subclass_rejected_before_any_session_exists() {
    let fx = make_fixture(Vec::new());
    let actor = UserId::new(1);
    seed_parent_with_subclasses(&fx, actor, 3).await;

    let err = fx
        .service
        .begin(actor, WizardKind::NewSubclass, None, Some("Yuki"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Wizard(WizardError::SubclassCapExceeded { count: 3, .. })
    ));

    // No wizard state was created
    assert!(fx.sessions.get(actor).is_none());
}

#[tokio::test]
async fn third_subclass_still_allowed() {
    let fx = make_fixture(Vec::new());
    let actor = UserId::new(1);
    let parent = seed_parent_with_subclasses(&fx, actor, 2).await;

    fx.service
        .begin(actor, WizardKind::NewSubclass, None, Some("Yuki"))
        .await
        .unwrap();
    let session = fx.sessions.get(actor).unwrap();
    assert_eq!(session.collected.parent_id, Some(parent.id));
    assert_eq!(session.collected.parent_kind, Some(CharacterKind::Main));
}

#[tokio::test]
async fn subclass_of_subclass_rejected() {
    let fx = make_fixture(Vec::new());
    let actor = UserId::new(1);
    seed_parent_with_subclasses(&fx, actor, 1).await;

    let err = fx
        .service
        .begin(actor, WizardKind::NewSubclass, None, Some("Yuki-0"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Wizard(WizardError::InvalidParent(_))
    ));
}

#[tokio::test]
async fn subclass_of_unknown_parent_rejected() {
    let fx = make_fixture(Vec::new());
    let err = fx
        .service
        .begin(UserId::new(1), WizardKind::NewSubclass, None, Some("Nobody"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Wizard(WizardError::UnknownCharacter(_))
    ));
}

// ---------------------------------------------------------------------------
// Expiry, cancellation, invalid input
// ---------------------------------------------------------------------------

#[tokio::test]
async fn event_without_session_is_expired_outcome() {
    let fx = make_fixture(Vec::new());
    let err = fx
        .service
        .submit_selection(UserId::new(9), StepTag::ChooseClass, "Frost Mage")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Wizard(WizardError::SessionExpired)
    ));
}

#[tokio::test]
async fn cancel_discards_session() {
    let fx = make_fixture(Vec::new());
    let actor = UserId::new(1);
    fx.service
        .begin(actor, WizardKind::NewMain, None, None)
        .await
        .unwrap();

    fx.service.cancel(actor).await.unwrap();

    let err = fx
        .service
        .submit_selection(actor, StepTag::ChooseClass, "Frost Mage")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Wizard(WizardError::SessionExpired)
    ));
}

#[tokio::test]
async fn invalid_selection_leaves_stored_session_unchanged() {
    let fx = make_fixture(Vec::new());
    let actor = UserId::new(1);
    fx.service
        .begin(actor, WizardKind::NewMain, None, None)
        .await
        .unwrap();

    let err = fx
        .service
        .submit_selection(actor, StepTag::ChooseClass, "Bard")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Wizard(WizardError::InvalidSelection { .. })
    ));

    // The same step still accepts a valid value
    let render = fx
        .service
        .submit_selection(actor, StepTag::ChooseClass, "Frost Mage")
        .await
        .unwrap();
    assert_eq!(render.step, StepTag::ChooseSubclass);
}

#[tokio::test]
async fn back_through_service_rerenders_previous_step() {
    let fx = make_fixture(Vec::new());
    let actor = UserId::new(1);
    fx.service
        .begin(actor, WizardKind::NewMain, None, None)
        .await
        .unwrap();
    select(&fx, actor, StepTag::ChooseClass, "Frost Mage").await;

    let render = fx.service.back(actor).await.unwrap();
    assert_eq!(render.step, StepTag::ChooseClass);

    // Re-forward with the same input lands back on subclass
    let render = fx
        .service
        .submit_selection(actor, StepTag::ChooseClass, "Frost Mage")
        .await
        .unwrap();
    assert_eq!(render.step, StepTag::ChooseSubclass);
}

// ---------------------------------------------------------------------------
// Commit failure retry
// ---------------------------------------------------------------------------

#[tokio::test]
async fn storage_failure_keeps_session_for_retry() {
    let fx = make_fixture(Vec::new());
    let actor = UserId::new(1);
    fx.service
        .begin(actor, WizardKind::NewMain, None, None)
        .await
        .unwrap();
    select(&fx, actor, StepTag::ChooseClass, "Frost Mage").await;
    select(&fx, actor, StepTag::ChooseSubclass, "Icicle").await;
    select(&fx, actor, StepTag::ChooseAbilityScore, "20k-22k").await;
    select(&fx, actor, StepTag::ChooseTimezone, "Asia/Tokyo").await;

    fx.characters.set_failing(true);
    let err = fx
        .service
        .submit_form(actor, StepTag::SubmitName, &name_fields("Yuki"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Commit(CommitError::StorageFailure(_))
    ));

    // Collected answers survive; resubmitting the name succeeds
    fx.characters.set_failing(false);
    let done = fx
        .service
        .submit_form(actor, StepTag::SubmitName, &name_fields("Yuki"))
        .await
        .unwrap();
    assert_eq!(done.step, StepTag::Committed);
    assert!(fx.characters.get(actor, "Yuki").await.unwrap().is_some());
}

// ---------------------------------------------------------------------------
// Edit flow
// ---------------------------------------------------------------------------

#[tokio::test]
async fn edit_class_forces_guild_revisit_and_commits() {
    let fx = make_fixture(vec!["Night Watch", "Dawn Patrol"]);
    let actor = UserId::new(1);
    seed_parent_with_subclasses(&fx, actor, 0).await;

    let render = fx
        .service
        .begin_edit(actor, EditField::Class, "Yuki", None)
        .await
        .unwrap();
    assert_eq!(render.step, StepTag::ChooseClass);

    select(&fx, actor, StepTag::ChooseClass, "Ironclad").await;
    select(&fx, actor, StepTag::ChooseSubclass, "Bulwark").await;

    // Role changed from dps to tank: guild must be revisited
    let session = fx.sessions.get(actor).unwrap();
    assert_eq!(session.current_step, StepTag::ChooseGuild);

    let done = fx
        .service
        .submit_selection(actor, StepTag::ChooseGuild, "Night Watch")
        .await
        .unwrap();
    assert_eq!(done.step, StepTag::Committed);

    let character = fx.characters.get(actor, "Yuki").await.unwrap().unwrap();
    assert_eq!(character.class, "Ironclad");
    assert_eq!(character.role, Role::Tank);
    assert_eq!(character.guild.as_deref(), Some("Night Watch"));
    assert_eq!(character.kind, CharacterKind::Main, "kind preserved");
}

#[tokio::test]
async fn edit_unknown_character_rejected() {
    let fx = make_fixture(Vec::new());
    let err = fx
        .service
        .begin_edit(UserId::new(1), EditField::Guild, "Nobody", None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Wizard(WizardError::UnknownCharacter(_))
    ));
}

#[tokio::test]
async fn edit_timezone_only_touches_assignment() {
    let fx = make_fixture(Vec::new());
    let actor = UserId::new(1);
    seed_parent_with_subclasses(&fx, actor, 0).await;

    fx.service
        .begin_edit(actor, EditField::Timezone, "Yuki", None)
        .await
        .unwrap();
    let done = fx
        .service
        .submit_selection(actor, StepTag::ChooseTimezone, "Europe/London")
        .await
        .unwrap();
    assert_eq!(done.step, StepTag::Committed);

    let tz = fx.timezones.get(actor).await.unwrap().unwrap();
    assert_eq!(tz.zone_id, "Europe/London");
}
