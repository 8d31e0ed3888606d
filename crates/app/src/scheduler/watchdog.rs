//! Stall heuristic of the dispatch chain.

use std::time::Duration;

/// Whether a chain that last dispatched `elapsed` ago has stalled, given
/// that the next dispatch was due after `expected`.
#[must_use]
pub fn is_stalled(elapsed: Duration, expected: Duration, slack: Duration) -> bool {
    elapsed > expected.saturating_add(slack)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(1000);
    const SLACK: Duration = Duration::from_millis(500);

    #[test]
    fn should_not_fire_when_within_slack() {
        assert!(!is_stalled(Duration::from_millis(1400), DELAY, SLACK));
    }

    #[test]
    fn should_fire_when_slack_exceeded() {
        assert!(is_stalled(Duration::from_millis(1600), DELAY, SLACK));
    }

    #[test]
    fn should_not_fire_when_exactly_at_threshold() {
        assert!(!is_stalled(Duration::from_millis(1500), DELAY, SLACK));
    }
}
