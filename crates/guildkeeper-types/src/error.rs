use thiserror::Error;

/// Errors surfaced by the wizard flow.
#[derive(Debug, Error)]
pub enum WizardError {
    /// The session is absent or past its TTL. A normal outcome -- the
    /// presentation layer shows "session expired, please restart".
    #[error("session expired or not started")]
    SessionExpired,

    /// A submitted value is not among the currently offered options.
    /// Defensive check against stale or duplicate submissions from a
    /// previous render; the current step is re-rendered unchanged.
    #[error("invalid selection '{value}' for step {step}")]
    InvalidSelection { step: String, value: String },

    /// The parent already carries the maximum number of subclasses.
    /// Checked before any session is created.
    #[error("'{parent}' already has {count} subclasses (limit {limit})")]
    SubclassCapExceeded {
        parent: String,
        count: i64,
        limit: i64,
    },

    /// No character with the given name exists for the target member.
    #[error("no character named '{0}'")]
    UnknownCharacter(String),

    /// The named character is itself a subclass and cannot carry more.
    #[error("'{0}' cannot carry subclasses")]
    InvalidParent(String),

    /// A subclass wizard was started without naming the parent.
    #[error("subclass registration requires a parent character name")]
    MissingParent,

    /// The submitted name is empty or over the length bound.
    #[error("invalid name: {0}")]
    InvalidName(String),
}

/// Errors from repository operations (used by trait definitions in
/// guildkeeper-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors from committing a completed session.
#[derive(Debug, Error)]
pub enum CommitError {
    /// The storage upsert failed. The session is deliberately retained so
    /// the user can retry without losing collected answers.
    #[error("storage failure: {0}")]
    StorageFailure(#[from] RepositoryError),

    /// The session is missing a field the commit needs. Indicates a
    /// transition-table bug, not user error.
    #[error("session incomplete: missing {0}")]
    Incomplete(&'static str),
}

/// Errors from pushing the roster to the external record-keeping system.
///
/// Never surfaced to end users -- the scheduler backs off and retries on
/// the next coalescing window.
#[derive(Debug, Error)]
pub enum PushError {
    /// The external system rejected the push for rate/quota reasons.
    #[error("push throttled by external system")]
    Throttled,

    /// The push did not complete within the configured bound. Treated the
    /// same as throttling for backoff purposes.
    #[error("push timed out")]
    Timeout,

    #[error("push failed: {0}")]
    Failed(String),
}
