//! Unit ledger refresh: one full scan through the game state port.

use marshal_domain::ledger::UnitLedger;

use crate::context::OrchestrationContext;
use crate::ports::GameState;

/// Rescan home squads and every specialist's army, store the new ledger in
/// `context` and return it.
pub fn refresh(context: &OrchestrationContext, game: &impl GameState) -> UnitLedger {
    let squads = game.home_squads();
    let specialists = game.specialists();
    let ledger = UnitLedger::from_scan(&squads, specialists.iter().map(|s| &s.roster));
    tracing::debug!(
        free = %ledger.free(),
        carried = %ledger.carried(),
        "unit ledger refreshed"
    );
    context.replace_ledger(ledger.clone());
    ledger
}
