//! Transition (C2): pairs an input symbol with a destination state and an
//! optional guard predicate.

use crate::ids::{EventSymbol, StateId};
use crate::invoke::Guard;

/// A single transition row: `{ event, next, guard }`.
///
/// Valid iff `next != StateId::UNSET && event != EventSymbol::UNSET`.
pub struct Transition<Args> {
    event: EventSymbol,
    next: StateId,
    guard: Option<Box<dyn Guard<Args>>>,
}

impl<Args> Transition<Args> {
    /// Constructs a transition with no guard (always-taken).
    pub fn new(event: EventSymbol, next: StateId) -> Transition<Args> {
        Transition {
            event,
            next,
            guard: None,
        }
    }

    /// Constructs a transition guarded by `guard`.
    pub fn guarded(event: EventSymbol, next: StateId, guard: Box<dyn Guard<Args>>) -> Transition<Args> {
        Transition {
            event,
            next,
            guard: Some(guard),
        }
    }

    pub fn event(&self) -> EventSymbol {
        self.event
    }

    pub fn next(&self) -> StateId {
        self.next
    }

    pub fn has_guard(&self) -> bool {
        self.guard.is_some()
    }

    /// Invokes the guard, forwarding `args`.
    ///
    /// # Panics
    /// Panics if no guard is installed — callers must check [`Self::has_guard`]
    /// first.
    pub fn evaluate_guard(&self, args: &Args) -> bool {
        match &self.guard {
            Some(g) => g.evaluate(args),
            None => panic!("evaluate_guard called on an unguarded transition"),
        }
    }

    /// Equality with an event symbol compares only the transition's event.
    pub fn matches_event(&self, event: EventSymbol) -> bool {
        self.event == event
    }

    /// `(next != 0) && (event != 0)`.
    pub fn is_valid(&self) -> bool {
        self.next.is_set() && self.event.is_set()
    }
}
