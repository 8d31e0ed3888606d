use std::time::Duration;

use crate::command::GameCommand;

/// What a step evaluation decided.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StepOutcome {
    /// Move the cursor to the next step.
    pub advance: bool,
    /// Human-readable status line; blocking deficits land here.
    pub status: Option<String>,
    /// Wait before evaluating again; `None` keeps the configured interval.
    pub next_interval: Option<Duration>,
    /// Commands to enqueue behind the evaluation.
    pub commands: Vec<GameCommand>,
}

impl StepOutcome {
    #[must_use]
    pub fn advance() -> Self {
        Self {
            advance: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn wait(status: impl Into<String>) -> Self {
        Self {
            status: Some(status.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    #[must_use]
    pub fn with_command(mut self, command: GameCommand) -> Self {
        self.commands.push(command);
        self
    }

    #[must_use]
    pub fn with_commands(mut self, commands: impl IntoIterator<Item = GameCommand>) -> Self {
        self.commands.extend(commands);
        self
    }

    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.next_interval = Some(interval);
        self
    }
}
