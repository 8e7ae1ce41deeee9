//! Press-time vkey swaps
//!
//! When a press is retargeted (B pressed with Mod1 held activates A), the
//! matching release has to retire A even if Mod1 is gone by then. The swap
//! table remembers `original → activated` from the press until that release.

use thiserror::Error;

use crate::vkey::Vkey;

/// A second swap for a vkey that still has one outstanding
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("{original} already swapped to {existing}, cannot swap to {requested}")]
pub struct SwapCollision {
    pub original: Vkey,
    pub existing: Vkey,
    pub requested: Vkey,
}

/// Outstanding swaps, at most one per original vkey
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SwapTable {
    entries: [Option<Vkey>; Vkey::COUNT],
}

impl SwapTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `original → activated`. Fails if `original` is already swapped.
    pub fn record(&mut self, original: Vkey, activated: Vkey) -> Result<(), SwapCollision> {
        let slot = &mut self.entries[original.index()];
        if let Some(existing) = *slot {
            return Err(SwapCollision {
                original,
                existing,
                requested: activated,
            });
        }
        *slot = Some(activated);
        Ok(())
    }

    /// Remove and return the swap for `original`
    pub fn take(&mut self, original: Vkey) -> Option<Vkey> {
        self.entries[original.index()].take()
    }

    pub fn get(&self, original: Vkey) -> Option<Vkey> {
        self.entries[original.index()]
    }

    pub fn contains(&self, original: Vkey) -> bool {
        self.get(original).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Outstanding `(original, activated)` pairs in catalog order
    pub fn iter(&self) -> impl Iterator<Item = (Vkey, Vkey)> + '_ {
        Vkey::ALL
            .iter()
            .zip(self.entries.iter())
            .filter_map(|(original, activated)| activated.map(|a| (*original, a)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_take() {
        let mut swaps = SwapTable::new();
        assert!(swaps.is_empty());

        swaps.record(Vkey::B, Vkey::A).unwrap();
        assert!(swaps.contains(Vkey::B));
        assert!(!swaps.contains(Vkey::A));
        assert_eq!(swaps.iter().collect::<Vec<_>>(), vec![(Vkey::B, Vkey::A)]);

        assert_eq!(swaps.take(Vkey::B), Some(Vkey::A));
        assert_eq!(swaps.take(Vkey::B), None);
        assert!(swaps.is_empty());
    }

    #[test]
    fn test_double_swap_is_rejected() {
        let mut swaps = SwapTable::new();
        swaps.record(Vkey::B, Vkey::A).unwrap();

        let err = swaps.record(Vkey::B, Vkey::X).unwrap_err();
        assert_eq!(
            err,
            SwapCollision {
                original: Vkey::B,
                existing: Vkey::A,
                requested: Vkey::X,
            }
        );
        // The outstanding entry is untouched
        assert_eq!(swaps.get(Vkey::B), Some(Vkey::A));
        assert_eq!(swaps.len(), 1);
    }
}
