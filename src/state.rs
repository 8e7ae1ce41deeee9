//! Active key state - the set of vkeys currently held
//!
//! Stored as a bitset over the closed vkey catalog. Iteration always walks
//! catalog order, so anything folded over the held set depends only on
//! membership and never on the order keys were pressed in.

use std::fmt;

use crate::vkey::{Vkey, VkeyKind};

/// Set of held vkeys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ActiveKeyState {
    bits: u32,
}

impl ActiveKeyState {
    pub fn new() -> Self {
        Self::default()
    }

    const fn bit(vkey: Vkey) -> u32 {
        1 << vkey.index()
    }

    /// Mark a vkey held (idempotent)
    pub fn add(&mut self, vkey: Vkey) {
        self.bits |= Self::bit(vkey);
    }

    /// Mark a vkey released; no-op if it was not held
    pub fn remove(&mut self, vkey: Vkey) {
        self.bits &= !Self::bit(vkey);
    }

    pub fn contains(&self, vkey: Vkey) -> bool {
        self.bits & Self::bit(vkey) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    /// Held vkeys in catalog order
    pub fn iter(&self) -> impl Iterator<Item = Vkey> + Clone {
        let bits = self.bits;
        Vkey::ALL
            .into_iter()
            .filter(move |v| bits & Self::bit(*v) != 0)
    }

    /// Held vkeys whose kind is any of `kinds`, in catalog order.
    ///
    /// The iterator is lazy and can be cloned to walk the same snapshot again.
    pub fn all_of_kind<'a>(
        &self,
        kinds: &'a [VkeyKind],
    ) -> impl Iterator<Item = Vkey> + Clone + 'a {
        self.iter().filter(move |v| kinds.contains(&v.kind()))
    }

    /// True iff every `required` vkey is held and no `excluded` vkey is
    pub fn has(&self, required: &[Vkey], excluded: &[Vkey]) -> bool {
        required.iter().all(|v| self.contains(*v)) && !excluded.iter().any(|v| self.contains(*v))
    }
}

impl FromIterator<Vkey> for ActiveKeyState {
    fn from_iter<I: IntoIterator<Item = Vkey>>(iter: I) -> Self {
        let mut state = ActiveKeyState::new();
        for vkey in iter {
            state.add(vkey);
        }
        state
    }
}

impl fmt::Display for ActiveKeyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(Vkey::name).collect();
        write!(f, "{{{}}}", names.join(", "))
    }
}
