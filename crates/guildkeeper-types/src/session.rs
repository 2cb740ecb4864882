//! In-progress wizard session state.
//!
//! A `Session` is one actor's partially-collected character record plus the
//! state machine position. Sessions live only in memory (keyed by acting
//! user id) and are deleted on commit, cancel, or TTL expiry. The lifecycle
//! logic lives in `guildkeeper-core`; this module is plain data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::character::{CharacterKind, Role};
use crate::id::{CharacterId, UserId};

/// Which field an edit wizard is changing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditField {
    Class,
    Subclass,
    AbilityScore,
    Guild,
    Timezone,
}

/// The flavor of wizard a session is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardKind {
    /// Register the member's primary character.
    NewMain,
    /// Register an additional character.
    NewAlt,
    /// Register a subclass build under an existing character.
    NewSubclass,
    /// Edit one field of an existing character.
    Edit(EditField),
}

impl WizardKind {
    /// Whether this wizard registers a brand-new record.
    pub fn is_creation(&self) -> bool {
        matches!(
            self,
            WizardKind::NewMain | WizardKind::NewAlt | WizardKind::NewSubclass
        )
    }
}

/// Position in the wizard state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepTag {
    ChooseClass,
    ChooseSubclass,
    ChooseAbilityScore,
    ChooseGuild,
    ChooseTimezone,
    SubmitName,
    Committed,
}

impl StepTag {
    /// Stable string form used in render instructions and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            StepTag::ChooseClass => "choose_class",
            StepTag::ChooseSubclass => "choose_subclass",
            StepTag::ChooseAbilityScore => "choose_ability_score",
            StepTag::ChooseGuild => "choose_guild",
            StepTag::ChooseTimezone => "choose_timezone",
            StepTag::SubmitName => "submit_name",
            StepTag::Committed => "committed",
        }
    }
}

impl std::fmt::Display for StepTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A collected guild answer.
///
/// Distinct from "not collected yet": a skipped guild step and an explicit
/// "no guild" choice both record `GuildChoice::None`, and commit the same
/// way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuildChoice {
    None,
    Guild(String),
}

impl GuildChoice {
    /// The nullable guild value stored on the character record.
    pub fn as_stored(&self) -> Option<String> {
        match self {
            GuildChoice::None => None,
            GuildChoice::Guild(g) => Some(g.clone()),
        }
    }
}

/// The partial record accumulated across wizard steps.
///
/// Fields are only ever added or overwritten -- a back-navigation leaves
/// later-collected fields in place, to be overwritten on re-forward.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollectedFields {
    pub class: Option<String>,
    pub subclass: Option<String>,
    /// Always derived from `class` via the catalog, never set independently.
    pub role: Option<Role>,
    pub ability_label: Option<String>,
    pub ability_value: Option<i64>,
    pub guild: Option<GuildChoice>,
    pub timezone: Option<String>,
    pub name: Option<String>,
    pub parent_id: Option<CharacterId>,
    pub parent_kind: Option<CharacterKind>,
}

/// One actor's in-progress wizard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// The acting user. Key in the session store.
    pub actor_id: UserId,
    /// Set when an admin runs the wizard for another member's record.
    pub acting_on_behalf_of: Option<UserId>,
    pub kind: WizardKind,
    pub current_step: StepTag,
    /// Tags of previously-left steps, most recent last.
    pub back_stack: Vec<StepTag>,
    pub collected: CollectedFields,
    /// Snapshot of `collected` at edit-session start, for change detection
    /// (e.g. the class-change forced guild revisit). Empty for creations.
    pub baseline: Option<CollectedFields>,
    pub created_at: DateTime<Utc>,
    /// Refreshed on every mutation; the TTL sweep compares against this.
    pub last_touched: DateTime<Utc>,
}

impl Session {
    /// Create a fresh session positioned at `initial_step`.
    pub fn new(
        actor_id: UserId,
        kind: WizardKind,
        acting_on_behalf_of: Option<UserId>,
        initial_step: StepTag,
    ) -> Self {
        let now = Utc::now();
        Self {
            actor_id,
            acting_on_behalf_of,
            kind,
            current_step: initial_step,
            back_stack: Vec::new(),
            collected: CollectedFields::default(),
            baseline: None,
            created_at: now,
            last_touched: now,
        }
    }

    /// The user whose record this wizard builds.
    ///
    /// The actor themselves unless acting on another member's behalf.
    pub fn target_id(&self) -> UserId {
        self.acting_on_behalf_of.unwrap_or(self.actor_id)
    }

    /// Refresh the last-write timestamp. Call on every mutation.
    pub fn touch(&mut self) {
        self.last_touched = Utc::now();
    }
}
