//! The wizard state machine.

mod engine;

pub use engine::{EngineOutcome, WizardEngine, MAX_NAME_LENGTH};
