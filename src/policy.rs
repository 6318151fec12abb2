//! Policy (C1): names the threading capability the engine must use.
//!
//! The source design parameterises the engine by template policy classes
//! naming container families, the event-symbol type, and threading
//! primitives. Rust expresses the container/event-symbol axis with ordinary
//! generics (`TransitionTable<Args>`, `EventSymbol`); the one axis worth a
//! dedicated trait is threading, because it changes *behaviour*
//! (`stop(wait=true)` either blocks on a real condition variable or
//! collapses to a trivial check) rather than just storage representation.

/// Advertises whether a policy wants real blocking synchronisation.
///
/// Selected at engine type-construction time: `Policy::Threading::THREADED`
/// is a capability query the engine reads once to decide whether
/// `stop(wait=true)` may actually block on the shared condition variable, or
/// whether every wait collapses to an immediate check (the "no-op threading
/// policy renders every primitive a trivial success" case).
pub trait ThreadingSupport {
    const THREADED: bool;
}

/// No threading model: every synchronisation primitive is a trivial success.
/// Appropriate for single-threaded microcontroller targets driven from one
/// `step()` loop.
pub struct SingleThreaded;

impl ThreadingSupport for SingleThreaded {
    const THREADED: bool = false;
}

/// A real threading model: `stop(wait=true)` blocks on the engine's
/// condition variable until pulsed by a stop/error-state entry.
pub struct MultiThreaded;

impl ThreadingSupport for MultiThreaded {
    const THREADED: bool = true;
}

/// Policy (C1): names the threading family the engine must use. The
/// container family and event-symbol type are expressed as ordinary generic
/// parameters on [`crate::engine::FsmBase`] rather than as policy associated
/// types, since Rust's generics already give the engine that flexibility
/// without an extra indirection layer.
pub trait Policy {
    type Threading: ThreadingSupport;
}

/// The default policy: single-threaded, matching the bulk of this crate's
/// target environments (bare microcontrollers driven from one `step()` loop).
pub struct DefaultPolicy;

impl Policy for DefaultPolicy {
    type Threading = SingleThreaded;
}

/// A policy opting into real multi-threaded synchronisation.
pub struct ThreadedPolicy;

impl Policy for ThreadedPolicy {
    type Threading = MultiThreaded;
}
