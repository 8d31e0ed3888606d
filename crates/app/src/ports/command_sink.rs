//! Command submission port: the only way the core changes the game.

use std::future::Future;

use marshal_domain::command::{CommandReceipt, Submission};
use marshal_domain::error::MarshalError;

/// Accepts flat command submissions.
///
/// Awaiting the returned future stands in for a result callback; the core
/// knows nothing about transport or retries behind it.
pub trait CommandSink: Send + Sync {
    /// Submit one command.
    fn submit(
        &self,
        submission: Submission,
    ) -> impl Future<Output = Result<CommandReceipt, MarshalError>> + Send;
}

impl<T: CommandSink> CommandSink for std::sync::Arc<T> {
    fn submit(
        &self,
        submission: Submission,
    ) -> impl Future<Output = Result<CommandReceipt, MarshalError>> + Send {
        (**self).submit(submission)
    }
}
