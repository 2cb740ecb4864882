//! Wizard transition table and step rendering.
//!
//! One parameterized engine drives every wizard flavor (new main, new alt,
//! new subclass, field edits) keyed by the session's `WizardKind`, instead
//! of a code path per entry command. Each step is an explicit `StepTag` so
//! the full transition table is enumerable and testable without any
//! presentation concern.
//!
//! Transition rules:
//! - class selection stores the class and derives the role from the
//!   catalog; the subclass prompt offers only that class's subclasses;
//! - ability input is banded: the stored value is the band's
//!   representative integer, not the member's raw score;
//! - the guild step is skipped outright when the guild list is empty
//!   (guild recorded as the designated "none"), a first-class transition;
//! - only new-main wizards collect a timezone (it is an identity-level
//!   attribute, meaningful once);
//! - an edit that changes the class forces a revisit of the guild step
//!   when guilds exist, since a role change may invalidate eligibility;
//! - every forward transition pushes the just-left tag; back pops it and
//!   re-renders, leaving later-collected fields in place to be overwritten
//!   on re-forward.

use std::collections::HashMap;

use guildkeeper_types::error::WizardError;
use guildkeeper_types::render::{ChoiceOption, FormField, RenderInstruction};
use guildkeeper_types::session::{
    EditField, GuildChoice, Session, StepTag, WizardKind,
};

use crate::catalog::{ability, class, timezone as tz_catalog};

/// Upper bound on the in-game name field.
pub const MAX_NAME_LENGTH: usize = 32;

/// Reserved option value for "no guild".
const GUILD_NONE_VALUE: &str = "none";

/// What a successfully handled event leads to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineOutcome {
    /// Show the next prompt.
    Next(RenderInstruction),
    /// The flow is complete; hand the session to the commit service.
    Complete,
}

/// The wizard state machine, parameterized by the configured guild list.
#[derive(Debug, Clone)]
pub struct WizardEngine {
    guilds: Vec<String>,
}

impl WizardEngine {
    pub fn new(guilds: Vec<String>) -> Self {
        Self { guilds }
    }

    fn has_guilds(&self) -> bool {
        !self.guilds.is_empty()
    }

    /// The step a fresh session of `kind` starts on.
    pub fn initial_step(&self, kind: WizardKind) -> StepTag {
        match kind {
            WizardKind::NewMain | WizardKind::NewAlt | WizardKind::NewSubclass => {
                StepTag::ChooseClass
            }
            WizardKind::Edit(EditField::Class) => StepTag::ChooseClass,
            WizardKind::Edit(EditField::Subclass) => StepTag::ChooseSubclass,
            WizardKind::Edit(EditField::AbilityScore) => StepTag::ChooseAbilityScore,
            WizardKind::Edit(EditField::Guild) => StepTag::ChooseGuild,
            WizardKind::Edit(EditField::Timezone) => StepTag::ChooseTimezone,
        }
    }

    // -----------------------------------------------------------------
    // Rendering
    // -----------------------------------------------------------------

    /// The prompt for the session's current step.
    pub fn render(&self, session: &Session) -> RenderInstruction {
        let show_back = !session.back_stack.is_empty();
        match session.current_step {
            StepTag::ChooseClass => RenderInstruction::choices(
                StepTag::ChooseClass,
                "Choose a class",
                self.class_options(),
                show_back,
            ),
            StepTag::ChooseSubclass => {
                let class_name = session.collected.class.as_deref().unwrap_or("?");
                RenderInstruction::choices(
                    StepTag::ChooseSubclass,
                    format!("Choose a subclass for {class_name}"),
                    self.subclass_options(session),
                    show_back,
                )
            }
            StepTag::ChooseAbilityScore => RenderInstruction::choices(
                StepTag::ChooseAbilityScore,
                "Select your ability score range",
                self.ability_options(),
                show_back,
            )
            .with_description("Pick the range your current score falls in."),
            StepTag::ChooseGuild => RenderInstruction::choices(
                StepTag::ChooseGuild,
                "Which guild is this character in?",
                self.guild_options(),
                show_back,
            ),
            StepTag::ChooseTimezone => RenderInstruction::choices(
                StepTag::ChooseTimezone,
                "Select your timezone",
                self.timezone_options(),
                show_back,
            )
            .with_description("Suggestions are approximate; pick your actual zone."),
            StepTag::SubmitName => RenderInstruction::form(
                StepTag::SubmitName,
                "Name your character",
                vec![FormField {
                    field_id: "name".to_string(),
                    label: "In-game name".to_string(),
                    required: true,
                    max_length: MAX_NAME_LENGTH,
                }],
                show_back,
            ),
            StepTag::Committed => RenderInstruction::message(StepTag::Committed, "All done!"),
        }
    }

    fn class_options(&self) -> Vec<ChoiceOption> {
        class::classes()
            .iter()
            .map(|c| ChoiceOption::new(format!("{} ({})", c.name, c.role), c.name))
            .collect()
    }

    fn subclass_options(&self, session: &Session) -> Vec<ChoiceOption> {
        session
            .collected
            .class
            .as_deref()
            .and_then(class::class_by_name)
            .map(|info| {
                info.subclasses
                    .iter()
                    .map(|s| ChoiceOption::plain(*s))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn ability_options(&self) -> Vec<ChoiceOption> {
        ability::bands()
            .iter()
            .map(|b| ChoiceOption::plain(b.label))
            .collect()
    }

    fn guild_options(&self) -> Vec<ChoiceOption> {
        let mut options: Vec<ChoiceOption> = self
            .guilds
            .iter()
            .map(|g| ChoiceOption::plain(g.as_str()))
            .collect();
        options.push(ChoiceOption::new("No guild", GUILD_NONE_VALUE));
        options
    }

    fn timezone_options(&self) -> Vec<ChoiceOption> {
        tz_catalog::regions()
            .iter()
            .flat_map(|r| r.countries)
            .flat_map(|c| c.zones.iter().map(move |z| (c, z)))
            .map(|(country, zone)| {
                ChoiceOption::new(format!("{} ({})", zone.id, country.name), zone.id)
            })
            .collect()
    }

    // -----------------------------------------------------------------
    // Event handling
    // -----------------------------------------------------------------

    /// Handle one choice selection.
    ///
    /// Rejects (without mutating the session) a submission for a step the
    /// session is no longer on, and any value not among the currently
    /// offered options -- both defend against stale or duplicate
    /// submissions from a previous render.
    pub fn apply_selection(
        &self,
        session: &mut Session,
        step: StepTag,
        value: &str,
    ) -> Result<EngineOutcome, WizardError> {
        if step != session.current_step {
            return Err(WizardError::InvalidSelection {
                step: step.to_string(),
                value: value.to_string(),
            });
        }

        match session.current_step {
            StepTag::ChooseClass => {
                let info = class::class_by_name(value).ok_or_else(|| {
                    WizardError::InvalidSelection {
                        step: step.to_string(),
                        value: value.to_string(),
                    }
                })?;
                session.collected.class = Some(info.name.to_string());
                // Role is always derived from the class, never chosen
                session.collected.role = Some(info.role);
            }
            StepTag::ChooseSubclass => {
                let offered = self.subclass_options(session);
                if !offered.iter().any(|o| o.value == value) {
                    return Err(WizardError::InvalidSelection {
                        step: step.to_string(),
                        value: value.to_string(),
                    });
                }
                session.collected.subclass = Some(value.to_string());
            }
            StepTag::ChooseAbilityScore => {
                let band = ability::band_for_label(value).ok_or_else(|| {
                    WizardError::InvalidSelection {
                        step: step.to_string(),
                        value: value.to_string(),
                    }
                })?;
                session.collected.ability_label = Some(band.label.to_string());
                session.collected.ability_value = Some(band.representative);
            }
            StepTag::ChooseGuild => {
                if value == GUILD_NONE_VALUE {
                    session.collected.guild = Some(GuildChoice::None);
                } else if self.guilds.iter().any(|g| g == value) {
                    session.collected.guild = Some(GuildChoice::Guild(value.to_string()));
                } else {
                    return Err(WizardError::InvalidSelection {
                        step: step.to_string(),
                        value: value.to_string(),
                    });
                }
            }
            StepTag::ChooseTimezone => {
                if tz_catalog::zone_by_id(value).is_none() {
                    return Err(WizardError::InvalidSelection {
                        step: step.to_string(),
                        value: value.to_string(),
                    });
                }
                session.collected.timezone = Some(value.to_string());
            }
            StepTag::SubmitName | StepTag::Committed => {
                return Err(WizardError::InvalidSelection {
                    step: step.to_string(),
                    value: value.to_string(),
                });
            }
        }

        session.touch();
        Ok(self.advance(session))
    }

    /// Handle the name form submission.
    pub fn apply_form(
        &self,
        session: &mut Session,
        step: StepTag,
        fields: &HashMap<String, String>,
    ) -> Result<EngineOutcome, WizardError> {
        if step != session.current_step || session.current_step != StepTag::SubmitName {
            return Err(WizardError::InvalidSelection {
                step: step.to_string(),
                value: "<form>".to_string(),
            });
        }

        let name = fields
            .get("name")
            .map(|n| n.trim())
            .unwrap_or_default();
        if name.is_empty() {
            return Err(WizardError::InvalidName("name is required".to_string()));
        }
        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(WizardError::InvalidName(format!(
                "name exceeds {MAX_NAME_LENGTH} characters"
            )));
        }

        session.collected.name = Some(name.to_string());
        session.touch();
        Ok(self.advance(session))
    }

    /// Handle a back event: pop the stack and re-render that step.
    ///
    /// Fields collected after the reverted-to step are left in place; they
    /// are overwritten when the member proceeds forward again. With an
    /// empty stack this is a no-op that re-renders the current step.
    pub fn apply_back(&self, session: &mut Session) -> RenderInstruction {
        if let Some(previous) = session.back_stack.pop() {
            session.current_step = previous;
            session.touch();
        }
        self.render(session)
    }

    // -----------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------

    /// Move the session forward from its just-completed step.
    ///
    /// Pushes the left tag onto the back stack and applies step-skipping:
    /// the guild step is bypassed (guild recorded as none) when no guilds
    /// are configured, and the timezone step exists only for new mains.
    fn advance(&self, session: &mut Session) -> EngineOutcome {
        let left = session.current_step;
        match self.next_step(session) {
            Some(next) => {
                session.back_stack.push(left);
                session.current_step = next;
                EngineOutcome::Next(self.render(session))
            }
            None => EngineOutcome::Complete,
        }
    }

    fn next_step(&self, session: &mut Session) -> Option<StepTag> {
        let kind = session.kind;
        match session.current_step {
            StepTag::ChooseClass => Some(StepTag::ChooseSubclass),
            StepTag::ChooseSubclass => match kind {
                WizardKind::Edit(_) => self.after_edit_subclass(session),
                _ => Some(StepTag::ChooseAbilityScore),
            },
            StepTag::ChooseAbilityScore => match kind {
                WizardKind::Edit(_) => None,
                _ => {
                    if self.has_guilds() {
                        Some(StepTag::ChooseGuild)
                    } else {
                        // Skipped entirely: proceed as if guild were
                        // explicitly set to none
                        session.collected.guild = Some(GuildChoice::None);
                        self.after_guild(kind)
                    }
                }
            },
            StepTag::ChooseGuild => match kind {
                WizardKind::Edit(_) => None,
                _ => self.after_guild(kind),
            },
            StepTag::ChooseTimezone => match kind {
                WizardKind::Edit(_) => None,
                _ => Some(StepTag::SubmitName),
            },
            StepTag::SubmitName => None,
            StepTag::Committed => None,
        }
    }

    /// Where an edit flow goes after re-picking the subclass.
    ///
    /// A changed class changes the derived role, which may invalidate the
    /// guild choice -- force a guild revisit when guilds exist. This is a
    /// forced transition, not a member-requested back-navigation.
    fn after_edit_subclass(&self, session: &Session) -> Option<StepTag> {
        let baseline_class = session
            .baseline
            .as_ref()
            .and_then(|b| b.class.as_deref());
        let class_changed = baseline_class != session.collected.class.as_deref();
        if class_changed && self.has_guilds() {
            Some(StepTag::ChooseGuild)
        } else {
            None
        }
    }

    fn after_guild(&self, kind: WizardKind) -> Option<StepTag> {
        match kind {
            // Timezone is identity-level; only collected at main creation
            WizardKind::NewMain => Some(StepTag::ChooseTimezone),
            _ => Some(StepTag::SubmitName),
        }
    }
}
