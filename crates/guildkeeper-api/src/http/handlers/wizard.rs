//! Wizard lifecycle handlers.
//!
//! Each endpoint returns the next `RenderInstruction` as JSON; the chat
//! layer turns it into platform widgets.

use std::collections::HashMap;

use axum::Json;
use axum::extract::State;
use serde::Deserialize;

use guildkeeper_types::id::UserId;
use guildkeeper_types::render::RenderInstruction;
use guildkeeper_types::session::{EditField, StepTag, WizardKind};

use crate::http::error::AppError;
use crate::state::AppState;

/// The wizard kinds a begin request may name (edits go through
/// `/wizard/edit`, which also takes the character name).
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BeginKind {
    NewMain,
    NewAlt,
    NewSubclass,
}

impl From<BeginKind> for WizardKind {
    fn from(kind: BeginKind) -> Self {
        match kind {
            BeginKind::NewMain => WizardKind::NewMain,
            BeginKind::NewAlt => WizardKind::NewAlt,
            BeginKind::NewSubclass => WizardKind::NewSubclass,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BeginRequest {
    pub actor_id: UserId,
    pub kind: BeginKind,
    /// Present when an admin acts for another member.
    pub target_id: Option<UserId>,
    /// Required for `new_subclass`.
    pub parent_name: Option<String>,
}

/// POST /api/v1/wizard/begin - Start a registration wizard.
pub async fn begin(
    State(state): State<AppState>,
    Json(body): Json<BeginRequest>,
) -> Result<Json<RenderInstruction>, AppError> {
    let render = state
        .wizard
        .begin(
            body.actor_id,
            body.kind.into(),
            body.target_id,
            body.parent_name.as_deref(),
        )
        .await?;
    Ok(Json(render))
}

#[derive(Debug, Deserialize)]
pub struct EditRequest {
    pub actor_id: UserId,
    pub field: EditField,
    pub name: String,
    pub target_id: Option<UserId>,
}

/// POST /api/v1/wizard/edit - Start an edit wizard for one field.
pub async fn begin_edit(
    State(state): State<AppState>,
    Json(body): Json<EditRequest>,
) -> Result<Json<RenderInstruction>, AppError> {
    let render = state
        .wizard
        .begin_edit(body.actor_id, body.field, &body.name, body.target_id)
        .await?;
    Ok(Json(render))
}

#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub actor_id: UserId,
    /// The step the presented prompt belonged to; stale submissions are
    /// rejected against the session's current step.
    pub step: StepTag,
    pub value: String,
}

/// POST /api/v1/wizard/select - Submit one choice selection.
pub async fn submit_selection(
    State(state): State<AppState>,
    Json(body): Json<SelectRequest>,
) -> Result<Json<RenderInstruction>, AppError> {
    let render = state
        .wizard
        .submit_selection(body.actor_id, body.step, &body.value)
        .await?;
    Ok(Json(render))
}

#[derive(Debug, Deserialize)]
pub struct FormRequest {
    pub actor_id: UserId,
    pub step: StepTag,
    pub fields: HashMap<String, String>,
}

/// POST /api/v1/wizard/form - Submit the name form.
pub async fn submit_form(
    State(state): State<AppState>,
    Json(body): Json<FormRequest>,
) -> Result<Json<RenderInstruction>, AppError> {
    let render = state
        .wizard
        .submit_form(body.actor_id, body.step, &body.fields)
        .await?;
    Ok(Json(render))
}

#[derive(Debug, Deserialize)]
pub struct ActorRequest {
    pub actor_id: UserId,
}

/// POST /api/v1/wizard/back - Re-render the previous step.
pub async fn back(
    State(state): State<AppState>,
    Json(body): Json<ActorRequest>,
) -> Result<Json<RenderInstruction>, AppError> {
    let render = state.wizard.back(body.actor_id).await?;
    Ok(Json(render))
}

/// POST /api/v1/wizard/cancel - Abandon the wizard.
pub async fn cancel(
    State(state): State<AppState>,
    Json(body): Json<ActorRequest>,
) -> Result<Json<RenderInstruction>, AppError> {
    let render = state.wizard.cancel(body.actor_id).await?;
    Ok(Json(render))
}
