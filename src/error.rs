//! Error taxonomy.
//!
//! The teacher's `Errors<EventType, StateType, ErrorType>` enum is flat and
//! carries the offending event/state inline rather than wrapping a nested
//! cause; this keeps the same shape (`NoTransition`, `InternalError`, ...)
//! but adds `Display`/`std::error::Error` so the type is usable the way a
//! published crate's error type is expected to be.

use std::fmt;

use crate::ids::{EventSymbol, StateId};

/// Errors the engine can report: duplicate registration, unknown reference,
/// an invalid automaton, an unaccepted event, a reentrant transition, a
/// handler failure, and a missed stop-wait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsmError {
    /// `add_state`/`add_transition`/`add_stop_state` given an id already registered.
    DuplicateRegistration(StateId),
    /// `set_start_state`/`set_error_state`/`add_stop_state` given an id not in `states`.
    UnknownState(StateId),
    /// `valid()` returned false, or `start(check=true)` found an invalid automaton.
    InvalidAutomaton,
    /// `raise`/`transition` called with a symbol `accept()` rejects from the current state.
    UnacceptedEvent(EventSymbol),
    /// A second `transition()` call arrived before the first was consumed.
    ReentrantTransition,
    /// A destination state's handler returned `false`, or had no handler installed.
    HandlerFailure(StateId),
    /// `stop(wait=false)` called while not in a stop or error state.
    StopWaitMiss,
}

impl fmt::Display for FsmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FsmError::DuplicateRegistration(id) => {
                write!(f, "duplicate registration for {id}")
            }
            FsmError::UnknownState(id) => write!(f, "unknown state {id}"),
            FsmError::InvalidAutomaton => write!(f, "automaton failed validity check"),
            FsmError::UnacceptedEvent(ev) => write!(f, "{ev} not accepted from current state"),
            FsmError::ReentrantTransition => {
                write!(f, "transition already in flight for this engine")
            }
            FsmError::HandlerFailure(id) => write!(f, "handler failure entering {id}"),
            FsmError::StopWaitMiss => write!(f, "stop(wait=false) requested outside a stop state"),
        }
    }
}

impl std::error::Error for FsmError {}
