//! Unit ledger: free, carried and total army units currently owned.
//!
//! The ledger is rebuilt from a full scan every time it is refreshed and is
//! never patched incrementally, so a missed game event cannot make it drift.

use serde::Serialize;

use crate::roster::Roster;

/// Read-side aggregation of owned army units.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UnitLedger {
    free: Roster,
    carried: Roster,
    total: Roster,
}

impl UnitLedger {
    /// Build a ledger from the home-zone squads and every specialist's
    /// carried roster.
    #[must_use]
    pub fn from_scan<'a>(
        home_squads: impl IntoIterator<Item = &'a Roster>,
        carried: impl IntoIterator<Item = &'a Roster>,
    ) -> Self {
        let mut ledger = Self::default();
        ledger.rebuild(home_squads, carried);
        ledger
    }

    /// Replace all three maps with the result of a fresh scan.
    pub fn rebuild<'a>(
        &mut self,
        home_squads: impl IntoIterator<Item = &'a Roster>,
        carried: impl IntoIterator<Item = &'a Roster>,
    ) {
        let mut free = Roster::new();
        for squad in home_squads {
            free.absorb(squad);
        }
        let mut in_use = Roster::new();
        for roster in carried {
            in_use.absorb(roster);
        }
        let mut total = free.clone();
        total.absorb(&in_use);

        self.free = free;
        self.carried = in_use;
        self.total = total;
    }

    /// Units idle at home, available for loading.
    #[must_use]
    pub fn free(&self) -> &Roster {
        &self.free
    }

    /// Units currently assigned to specialists.
    #[must_use]
    pub fn carried(&self) -> &Roster {
        &self.carried
    }

    /// Free plus carried.
    #[must_use]
    pub fn total(&self) -> &Roster {
        &self.total
    }
}
