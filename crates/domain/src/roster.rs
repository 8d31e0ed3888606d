//! Rosters: multisets of army units keyed by unit type.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Name of an army unit type as the game reports it (e.g. `"Swordsman"`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitType(String);

impl UnitType {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UnitType {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Unit counts keyed by [`UnitType`].
///
/// Zero counts are never stored, so two rosters with the same non-zero
/// counts compare equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<UnitType, u32>", into = "BTreeMap<UnitType, u32>")]
pub struct Roster(BTreeMap<UnitType, u32>);

impl Roster {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count for `unit`, zero when absent.
    #[must_use]
    pub fn get(&self, unit: &UnitType) -> u32 {
        self.0.get(unit).copied().unwrap_or(0)
    }

    /// Overwrite the count for `unit`.
    pub fn set(&mut self, unit: UnitType, count: u32) {
        if count == 0 {
            self.0.remove(&unit);
        } else {
            self.0.insert(unit, count);
        }
    }

    /// Increase the count for `unit`.
    pub fn add(&mut self, unit: UnitType, count: u32) {
        if count == 0 {
            return;
        }
        let current = self.0.entry(unit).or_insert(0);
        *current = current.saturating_add(count);
    }

    /// Decrease the count for `unit`, saturating at zero.
    pub fn remove(&mut self, unit: &UnitType, count: u32) {
        if let Some(current) = self.0.get_mut(unit) {
            *current = current.saturating_sub(count);
            if *current == 0 {
                self.0.remove(unit);
            }
        }
    }

    /// Add every count of `other` into `self`.
    pub fn absorb(&mut self, other: &Roster) {
        for (unit, count) in other.iter() {
            self.add(unit.clone(), count);
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all counts.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.0.values().fold(0, |sum, count| sum.saturating_add(*count))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&UnitType, u32)> {
        self.0.iter().map(|(unit, count)| (unit, *count))
    }

    /// What `self` still lacks after taking everything `available` offers.
    ///
    /// Only positive differences are kept.
    #[must_use]
    pub fn shortfall(&self, available: &Roster) -> Roster {
        let mut missing = Roster::new();
        for (unit, wanted) in self.iter() {
            let have = available.get(unit);
            if wanted > have {
                missing.set(unit.clone(), wanted - have);
            }
        }
        missing
    }

    /// Whether `self` holds at least every count in `need`.
    #[must_use]
    pub fn covers(&self, need: &Roster) -> bool {
        need.shortfall(self).is_empty()
    }
}

impl From<BTreeMap<UnitType, u32>> for Roster {
    fn from(map: BTreeMap<UnitType, u32>) -> Self {
        Self(map.into_iter().filter(|(_, count)| *count > 0).collect())
    }
}

impl From<Roster> for BTreeMap<UnitType, u32> {
    fn from(roster: Roster) -> Self {
        roster.0
    }
}

impl<U: Into<UnitType>> FromIterator<(U, u32)> for Roster {
    fn from_iter<T: IntoIterator<Item = (U, u32)>>(iter: T) -> Self {
        let mut roster = Roster::new();
        for (unit, count) in iter {
            roster.add(unit.into(), count);
        }
        roster
    }
}

impl fmt::Display for Roster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("nothing");
        }
        let mut first = true;
        for (unit, count) in self.iter() {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{count} {unit}")?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster(entries: &[(&str, u32)]) -> Roster {
        entries.iter().map(|(u, c)| (*u, *c)).collect()
    }

    #[test]
    fn should_drop_zero_counts_when_setting() {
        let mut r = roster(&[("Swordsman", 3)]);
        r.set(UnitType::new("Swordsman"), 0);
        assert!(r.is_empty());
    }

    #[test]
    fn should_compare_equal_when_only_zero_entries_differ() {
        let a: Roster = serde_json::from_value(serde_json::json!({"Swordsman": 5, "Archer": 0})).unwrap();
        let b = roster(&[("Swordsman", 5)]);
        assert_eq!(a, b);
    }

    #[test]
    fn should_compute_positive_shortfall_only() {
        let need = roster(&[("Swordsman", 10), ("Archer", 2)]);
        let have = roster(&[("Swordsman", 4), ("Archer", 5)]);
        assert_eq!(need.shortfall(&have), roster(&[("Swordsman", 6)]));
    }

    #[test]
    fn should_cover_when_every_count_is_available() {
        let have = roster(&[("Swordsman", 10), ("Archer", 2)]);
        assert!(have.covers(&roster(&[("Swordsman", 10)])));
        assert!(!have.covers(&roster(&[("Archer", 3)])));
    }

    #[test]
    fn should_saturate_when_removing_more_than_present() {
        let mut r = roster(&[("Archer", 2)]);
        r.remove(&UnitType::new("Archer"), 5);
        assert_eq!(r.get(&UnitType::new("Archer")), 0);
        assert!(r.is_empty());
    }

    #[test]
    fn should_saturate_when_adding_past_capacity() {
        let mut r = roster(&[("Archer", u32::MAX - 1), ("Cavalry", 5)]);
        r.add(UnitType::new("Archer"), 10);
        assert_eq!(r.get(&UnitType::new("Archer")), u32::MAX);
        assert_eq!(r.total(), u32::MAX);
    }

    #[test]
    fn should_absorb_other_roster() {
        let mut r = roster(&[("Archer", 2)]);
        r.absorb(&roster(&[("Archer", 1), ("Cavalry", 4)]));
        assert_eq!(r, roster(&[("Archer", 3), ("Cavalry", 4)]));
        assert_eq!(r.total(), 7);
    }

    #[test]
    fn should_display_counts_in_unit_order() {
        let r = roster(&[("Swordsman", 6), ("Archer", 1)]);
        assert_eq!(r.to_string(), "1 Archer, 6 Swordsman");
        assert_eq!(Roster::new().to_string(), "nothing");
    }
}
