//! Common error types used across the workspace.
//!
//! Each failure family is a typed error converted into [`MarshalError`]
//! through `#[from]`. Blocking conditions such as unit deficits are *not*
//! errors: they travel as status strings on a step outcome.

/// Top-level error for the marshal workspace.
#[derive(Debug, thiserror::Error)]
pub enum MarshalError {
    #[error("validation error")]
    Validation(#[from] ValidationError),

    #[error("not found")]
    NotFound(#[from] NotFoundError),

    #[error("command rejected")]
    Command(#[from] CommandError),

    #[error("service unavailable")]
    Unavailable(#[from] UnavailableError),
}

/// A template, plan or request failed a domain invariant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("template must contain at least one step")]
    NoSteps,

    #[error("battle wave at step {step} has no participants")]
    EmptyWave { step: usize },

    #[error("participant {participant} appears more than once in step {step}")]
    DuplicateParticipant { step: usize, participant: String },

    #[error("participant {participant} in step {step} has an empty roster")]
    EmptyRoster { step: usize, participant: String },

    #[error("step index {index} is out of range (plan has {len} steps)")]
    StepOutOfRange { index: usize, len: usize },

    #[error("no plan is selected")]
    NoPlan,

    #[error("invalid identifier: {0}")]
    InvalidId(String),

    #[error("malformed template: {0}")]
    Malformed(String),
}

/// A referenced object does not exist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// The game refused or could not execute a submitted command.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("command {action_code} failed: {reason}")]
pub struct CommandError {
    pub action_code: String,
    pub reason: String,
}

/// An internal service (the scheduler actor) is gone.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{service} is not running")]
pub struct UnavailableError {
    pub service: &'static str,
}
