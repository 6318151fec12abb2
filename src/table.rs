//! Transition Table & Alphabet (C4): maps `(stateId, eventSymbol)` to a
//! [`Transition`], derives the alphabet, and answers acceptance queries with
//! hierarchical fall-through.
//!
//! Grounded in the teacher's `TransitionTable` (`HashMap<TransitionSource, TransitionTarget>`);
//! generalised here so lookups climb a caller-supplied parent chain instead
//! of being flat.

use std::collections::{HashMap, HashSet};

use crate::ids::{EventSymbol, PackedKey, StateId};
use crate::transition::Transition;

/// Maps `(state, event)` to a [`Transition`] and accumulates the alphabet.
pub struct TransitionTable<Args> {
    rows: HashMap<PackedKey, Transition<Args>>,
    alphabet: HashSet<EventSymbol>,
}

impl<Args> TransitionTable<Args> {
    pub fn new() -> TransitionTable<Args> {
        TransitionTable {
            rows: HashMap::new(),
            alphabet: HashSet::new(),
        }
    }

    /// Inserts a row if absent. Returns `true` on success, `false` if the
    /// `(state, event)` key is already occupied (treated as an attempted
    /// ε-transition: the same row claimed twice).
    pub fn insert(&mut self, state: StateId, transition: Transition<Args>) -> bool {
        let key = PackedKey::new(state, transition.event());
        if self.rows.contains_key(&key) {
            return false;
        }
        self.alphabet.insert(transition.event());
        self.rows.insert(key, transition);
        true
    }

    /// Adds `event` to the alphabet without a transition row.
    pub fn add_alphabet_symbol(&mut self, event: EventSymbol) -> bool {
        self.alphabet.insert(event)
    }

    /// Direct lookup only — no parent fall-through.
    pub fn get_direct(&self, state: StateId, event: EventSymbol) -> Option<&Transition<Args>> {
        self.rows.get(&PackedKey::new(state, event))
    }

    /// Looks up `(state, event)`, climbing `parent_of` on miss until no
    /// parent remains. `parent_of` returns `StateId::UNSET` for states with
    /// no parent or that are unknown.
    pub fn lookup(
        &self,
        state: StateId,
        event: EventSymbol,
        parent_of: impl Fn(StateId) -> StateId,
    ) -> Option<&Transition<Args>> {
        let mut cursor = state;
        loop {
            if let Some(t) = self.get_direct(cursor, event) {
                return Some(t);
            }
            let parent = parent_of(cursor);
            if !parent.is_set() || parent == cursor {
                return None;
            }
            cursor = parent;
        }
    }

    pub fn alphabet(&self) -> &HashSet<EventSymbol> {
        &self.alphabet
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<Args> Default for TransitionTable<Args> {
    fn default() -> Self {
        TransitionTable::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_parent(_: StateId) -> StateId {
        StateId::UNSET
    }

    #[test]
    fn insert_rejects_duplicate_key() {
        let mut table: TransitionTable<()> = TransitionTable::new();
        let s = StateId::from_raw(1);
        let e = EventSymbol::new(1);
        assert!(table.insert(s, Transition::new(e, StateId::from_raw(2))));
        assert!(!table.insert(s, Transition::new(e, StateId::from_raw(3))));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn same_event_different_states_are_independent_rows() {
        let mut table: TransitionTable<()> = TransitionTable::new();
        let e = EventSymbol::new(1);
        assert!(table.insert(StateId::from_raw(1), Transition::new(e, StateId::from_raw(10))));
        assert!(table.insert(StateId::from_raw(2), Transition::new(e, StateId::from_raw(20))));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn alphabet_accumulates_from_inserts_and_explicit_adds() {
        let mut table: TransitionTable<()> = TransitionTable::new();
        table.insert(StateId::from_raw(1), Transition::new(EventSymbol::new(1), StateId::from_raw(2)));
        table.add_alphabet_symbol(EventSymbol::new(2));
        assert_eq!(table.alphabet().len(), 2);
    }

    #[test]
    fn lookup_falls_through_to_parent() {
        let mut table: TransitionTable<()> = TransitionTable::new();
        let parent = StateId::from_raw(10);
        let child = StateId::from_raw(11);
        let event = EventSymbol::new(5);
        table.insert(parent, Transition::new(event, StateId::from_raw(99)));

        let parent_of = |id: StateId| if id == child { parent } else { StateId::UNSET };
        assert!(table.lookup(child, event, parent_of).is_some());
        assert!(table.lookup(parent, event, no_parent).is_some());
    }

    #[test]
    fn lookup_returns_none_when_no_row_anywhere() {
        let table: TransitionTable<()> = TransitionTable::new();
        assert!(table.lookup(StateId::from_raw(1), EventSymbol::new(1), no_parent).is_none());
    }
}
