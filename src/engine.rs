//! Engine (C5): owns the state set, start/stop/error states, alphabet,
//! event queue, current state, status, and synchronisation. Validates the
//! automaton, executes transitions, integrates the watchdog, reports
//! diagnostics.
//!
//! Grounded in the teacher's `FSM::{add_transition, add_events,
//! process_event_queue}` (the event-queue draining loop in particular is a
//! direct generalisation of `process_event_queue`), enriched with the
//! mutex/condvar/watchdog/policy collaborators a hierarchical, thread-aware
//! engine contract requires that the teacher does not have.

use std::collections::{HashMap, HashSet, VecDeque};
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex, MutexGuard};

use slog::{crit, debug, o, Logger};

use crate::error::FsmError;
use crate::ids::{EventSymbol, StateId};
use crate::policy::{Policy, ThreadingSupport};
use crate::state::State;
use crate::status::Status;
use crate::table::TransitionTable;
use crate::transition::Transition;
use crate::watchdog::Watchdog;

/// Everything the engine mutex protects (every field except the watchdog
/// and the logger, which are their own independent collaborators).
struct Inner<Args> {
    states: HashMap<StateId, State<Args>>,
    stop_states: Vec<StateId>,
    start_state: StateId,
    error_state: StateId,
    current: StateId,
    status: Status,
    table: TransitionTable<Args>,
    events: VecDeque<(EventSymbol, Args)>,
    in_transition: bool,
}

impl<Args> Inner<Args> {
    fn new() -> Inner<Args> {
        Inner {
            states: HashMap::new(),
            stop_states: Vec::new(),
            start_state: StateId::UNSET,
            error_state: StateId::UNSET,
            current: StateId::UNSET,
            status: Status::Stopped,
            table: TransitionTable::new(),
            events: VecDeque::new(),
            in_transition: false,
        }
    }

    fn parent_of(&self, id: StateId) -> StateId {
        self.states.get(&id).map(|s| s.parent()).unwrap_or(StateId::UNSET)
    }

    fn accept(&self, event: EventSymbol) -> bool {
        if self.status != Status::Running {
            return false;
        }
        self.table
            .lookup(self.current, event, |id| self.parent_of(id))
            .is_some()
    }

    /// Structural validity, ignoring the `status` clause of `valid()` — used
    /// internally by `start(check=true)`, which runs before `status` is set
    /// to `Running`.
    fn structurally_valid(&self, log: &Logger) -> bool {
        if self.states.is_empty() {
            debug!(log, "fsm invalid: no registered states");
            return false;
        }
        if !self.start_state.is_set() || !self.error_state.is_set() || self.stop_states.is_empty() {
            debug!(log, "fsm invalid: start/error/stop state not fully configured");
            return false;
        }
        self.deterministic(log)
    }

    /// `deterministic()` (§5.4.3): every handler-bearing state must resolve
    /// every alphabet symbol via exactly one row on its parent chain.
    fn deterministic(&self, log: &Logger) -> bool {
        let mut ok = true;
        for (id, state) in self.states.iter() {
            if !state.has_handler() {
                continue;
            }
            for event in self.table.alphabet().iter().copied() {
                let mut direct_hits = 0usize;
                let mut cursor = *id;
                loop {
                    if self.table.get_direct(cursor, event).is_some() {
                        direct_hits += 1;
                    }
                    let parent = self.parent_of(cursor);
                    if !parent.is_set() || parent == cursor {
                        break;
                    }
                    cursor = parent;
                }
                if direct_hits == 0 {
                    debug!(log, "fsm invalid: {state} has no row for {event}", state = id, event = event);
                    ok = false;
                } else if direct_hits > 1 {
                    debug!(
                        log,
                        "fsm invalid: epsilon-transition, {state} accepts {event} via multiple rows",
                        state = id,
                        event = event
                    );
                    ok = false;
                }
            }
        }
        ok
    }
}

/// Policy-parameterised finite state machine engine.
///
/// `P` selects the threading capability (see [`crate::policy`]); `WD` is the
/// watchdog collaborator; `Args` is the engine's forwarded argument pack,
/// which must be `Clone` so a failing transition's arguments can be replayed
/// into the error state's handler.
pub struct FsmBase<P: Policy, WD: Watchdog, Args> {
    inner: Mutex<Inner<Args>>,
    stop_signal: Condvar,
    watchdog: Mutex<WD>,
    log: Logger,
    silent: AtomicBool,
    name: String,
    _policy: PhantomData<P>,
}

impl<P: Policy, WD: Watchdog, Args: Clone + Send> FsmBase<P, WD, Args> {
    pub fn new(name: &str, log: Logger) -> FsmBase<P, WD, Args> {
        let log = log.new(o!("fsm" => name.to_string()));
        FsmBase {
            inner: Mutex::new(Inner::new()),
            stop_signal: Condvar::new(),
            watchdog: Mutex::new(WD::default()),
            log,
            silent: AtomicBool::new(false),
            name: name.to_string(),
            _policy: PhantomData,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_silent(&self, silent: bool) {
        self.silent.store(silent, Ordering::Relaxed);
    }

    pub fn is_silent(&self) -> bool {
        self.silent.load(Ordering::Relaxed)
    }

    fn lock(&self) -> MutexGuard<'_, Inner<Args>> {
        self.inner.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn log_debug(&self, msg: impl AsRef<str>) {
        if !self.is_silent() {
            debug!(self.log, "{}", msg.as_ref());
        }
    }

    fn log_crit(&self, msg: impl AsRef<str>) {
        if !self.is_silent() {
            crit!(self.log, "{}", msg.as_ref());
        }
    }

    // ---- registration -----------------------------------------------

    /// Registers a state. Rejects duplicates by id.
    pub fn add_state(&self, state: State<Args>) -> (StateId, bool) {
        let mut inner = self.lock();
        let id = state.id();
        if inner.states.contains_key(&id) {
            return (id, false);
        }
        inner.states.insert(id, state);
        (id, true)
    }

    /// All-or-nothing bulk registration (§5.4.1 corrected contract, §10 open question 2).
    pub fn add_states(&self, states: Vec<State<Args>>) -> bool {
        let mut inner = self.lock();
        let mut seen: HashSet<StateId> = HashSet::new();
        for s in states.iter() {
            if inner.states.contains_key(&s.id()) || !seen.insert(s.id()) {
                return false;
            }
        }
        for s in states {
            inner.states.insert(s.id(), s);
        }
        true
    }

    /// Registers a transition out of `state`. Rejects unknown states and duplicate rows.
    pub fn add_transition(&self, state: StateId, transition: Transition<Args>) -> bool {
        let mut inner = self.lock();
        if !inner.states.contains_key(&state) {
            return false;
        }
        inner.table.insert(state, transition)
    }

    pub fn add_alphabet_symbol(&self, event: EventSymbol) -> bool {
        self.lock().table.add_alphabet_symbol(event)
    }

    /// Records the start state reference. No-op if `id` is unregistered.
    pub fn set_start_state(&self, id: StateId) -> bool {
        let mut inner = self.lock();
        if !inner.states.contains_key(&id) {
            return false;
        }
        inner.start_state = id;
        true
    }

    pub fn set_error_state(&self, id: StateId) -> bool {
        let mut inner = self.lock();
        if !inner.states.contains_key(&id) {
            return false;
        }
        inner.error_state = id;
        true
    }

    pub fn add_stop_state(&self, id: StateId) -> bool {
        let mut inner = self.lock();
        if !inner.states.contains_key(&id) || inner.stop_states.contains(&id) {
            return false;
        }
        inner.stop_states.push(id);
        true
    }

    /// All-or-nothing bulk stop-state registration.
    pub fn add_stop_states(&self, ids: &[StateId]) -> bool {
        let mut inner = self.lock();
        let mut seen: HashSet<StateId> = HashSet::new();
        for id in ids {
            if !inner.states.contains_key(id) || inner.stop_states.contains(id) || !seen.insert(*id) {
                return false;
            }
        }
        inner.stop_states.extend_from_slice(ids);
        true
    }

    pub fn start_state(&self) -> StateId {
        self.lock().start_state
    }

    pub fn error_state(&self) -> StateId {
        self.lock().error_state
    }

    pub fn stop_states(&self) -> Vec<StateId> {
        self.lock().stop_states.clone()
    }

    pub fn alphabet(&self) -> HashSet<EventSymbol> {
        self.lock().table.alphabet().clone()
    }

    // ---- validation ---------------------------------------------------

    /// `valid()`: status in {Running, Stopped}, non-empty state set,
    /// start/error/stop configured, and the automaton is deterministic.
    pub fn valid(&self) -> bool {
        let inner = self.lock();
        matches!(inner.status, Status::Running | Status::Stopped) && inner.structurally_valid(&self.log)
    }

    pub fn deterministic(&self) -> bool {
        self.lock().deterministic(&self.log)
    }

    /// Climbs the parent chain from the current state looking for a row on `event`.
    pub fn accept(&self, event: EventSymbol) -> bool {
        self.lock().accept(event)
    }

    // ---- lifecycle ------------------------------------------------------

    /// `Stopped -> Running`, after optional validation.
    pub fn start(&self, check: bool) {
        let mut inner = self.lock();
        if check && !inner.structurally_valid(&self.log) {
            self.log_debug("start() aborted: automaton failed validity check");
            return;
        }
        inner.current = inner.start_state;
        inner.status = Status::Running;
        self.log_debug(format!("fsm started at {}", inner.current));
    }

    /// Returns `true` immediately if not running, or if already in the
    /// error/stop state. Otherwise blocks on the stop signal once if
    /// `wait`, or fails immediately if `!wait`.
    pub fn stop(&self, wait: bool) -> bool {
        let mut inner = self.lock();
        if inner.status != Status::Running {
            inner.status = Status::Stopped;
            return true;
        }
        if inner.current == inner.error_state || inner.stop_states.contains(&inner.current) {
            inner.status = Status::Stopped;
            return true;
        }
        if !wait {
            return false;
        }
        if !P::Threading::THREADED {
            // No-op threading policy: nobody else can pulse the signal.
            return false;
        }
        inner = self.stop_signal.wait(inner).unwrap_or_else(|p| p.into_inner());
        if inner.current == inner.error_state || inner.stop_states.contains(&inner.current) {
            inner.status = Status::Stopped;
            true
        } else {
            false
        }
    }

    /// Forcibly stops without waiting.
    pub fn halt(&self) {
        self.lock().status = Status::Stopped;
    }

    pub fn status(&self) -> Status {
        self.lock().status
    }

    pub fn current_state(&self) -> Option<StateId> {
        let inner = self.lock();
        if inner.status == Status::Running {
            Some(inner.current)
        } else {
            None
        }
    }

    pub fn events_pending(&self) -> bool {
        !self.lock().events.is_empty()
    }

    // ---- event submission ------------------------------------------------

    /// External submission path: enqueues at the back. Rejected if `event`
    /// is not acceptable from the current state.
    pub fn raise(&self, event: EventSymbol, args: Args) -> Result<(), FsmError> {
        let mut inner = self.lock();
        if !inner.accept(event) {
            return Err(FsmError::UnacceptedEvent(event));
        }
        inner.events.push_back((event, args));
        Ok(())
    }

    /// Internal submission path used by state handlers: enqueues at the
    /// front, serialised by `in_transition` so only one handler-initiated
    /// transition is ever in flight.
    pub fn transition(&self, event: EventSymbol, args: Args) -> Result<(), FsmError> {
        let mut inner = self.lock();
        if inner.in_transition {
            return Err(FsmError::ReentrantTransition);
        }
        if !inner.accept(event) {
            return Err(FsmError::UnacceptedEvent(event));
        }
        inner.events.push_front((event, args));
        inner.in_transition = true;
        Ok(())
    }

    // ---- execution ------------------------------------------------------

    /// Pops and executes one queued event. Resets the watchdog first.
    pub fn step(&self) -> Status {
        {
            let mut wd = self.watchdog.lock().unwrap_or_else(|p| p.into_inner());
            wd.reset();
        }

        let mut inner = self.lock();
        if inner.status != Status::Running {
            return inner.status;
        }
        let Some((event, args)) = inner.events.pop_front() else {
            return Status::StateUnchanged;
        };
        inner.in_transition = false;

        let found = inner
            .table
            .lookup(inner.current, event, |id| inner.parent_of(id))
            .map(|t| t.next());

        let next = match found {
            Some(next) => next,
            None => {
                // Validation should make this unreachable for handler-bearing
                // states; treat a missing row defensively as a handler failure.
                return self.fault(inner, args);
            }
        };

        let saved_args = args.clone();
        inner.current = next;

        let (inner, ok) = self.invoke_unlocked(inner, next, args);

        if !ok {
            return self.fault(inner, saved_args);
        }

        if inner.stop_states.contains(&next) {
            self.stop_signal.notify_all();
        }
        self.log_debug(format!("fsm {} moved to {}", self.name, next));
        Status::StateChanged
    }

    /// Invokes `state_id`'s handler without holding the engine mutex, so a
    /// handler may call back into `transition()` (or any other lock-taking
    /// operation) without deadlocking on this thread's own lock.
    ///
    /// Only the handler is detached from the state for the call's duration —
    /// the state's id/parent stay in the map, so a concurrent lookup (e.g.
    /// the reentrant `transition()` call this exists for) still resolves
    /// hierarchy correctly. A handler missing because it's mid-invocation on
    /// another thread is reported as a failed invocation, not a missing one;
    /// this engine does not support two `step()` calls racing on the same
    /// state concurrently.
    fn invoke_unlocked<'a>(
        &'a self,
        mut inner: MutexGuard<'a, Inner<Args>>,
        state_id: StateId,
        args: Args,
    ) -> (MutexGuard<'a, Inner<Args>>, bool) {
        let mut handler = inner.states.get_mut(&state_id).and_then(|s| s.take_handler());
        drop(inner);

        let ok = match &mut handler {
            Some(h) => h.invoke(args),
            None => false,
        };

        let mut inner = self.lock();
        if let Some(h) = handler {
            if let Some(s) = inner.states.get_mut(&state_id) {
                s.restore_handler(h);
            }
        }
        (inner, ok)
    }

    fn fault<'a>(&'a self, mut inner: MutexGuard<'a, Inner<Args>>, saved_args: Args) -> Status {
        inner.current = inner.error_state;
        inner.status = Status::Error;
        let error_state = inner.error_state;

        let (inner, _) = self.invoke_unlocked(inner, error_state, saved_args);

        self.stop_signal.notify_all();
        self.log_crit(format!("fsm {} faulted, moved to error state {}", self.name, inner.error_state));
        Status::Fault
    }

    // ---- move/swap (§5.4.4) ----------------------------------------------

    /// Structural move for the common, exclusively-owned case: both engines
    /// are uniquely borrowed, so no locking is required.
    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(&mut self.inner, &mut other.inner);
        std::mem::swap(&mut self.watchdog, &mut other.watchdog);
        std::mem::swap(&mut self.log, &mut other.log);
        std::mem::swap(&mut self.name, &mut other.name);
        let a = self.silent.load(Ordering::Relaxed);
        let b = other.silent.load(Ordering::Relaxed);
        self.silent.store(b, Ordering::Relaxed);
        other.silent.store(a, Ordering::Relaxed);
    }

    /// Swap for two engines concurrently reachable (e.g. via `Arc`) from
    /// other threads: locks both engine mutexes in address order first, to
    /// avoid an ABBA deadlock between two engines swapping concurrently.
    pub fn swap_shared(&self, other: &Self) {
        let self_addr = self as *const _ as usize;
        let other_addr = other as *const _ as usize;
        if self_addr == other_addr {
            return;
        }
        if self_addr < other_addr {
            let mut a = self.lock();
            let mut b = other.lock();
            std::mem::swap(&mut *a, &mut *b);
        } else {
            let mut b = other.lock();
            let mut a = self.lock();
            std::mem::swap(&mut *a, &mut *b);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoke::BoolHandler;
    use crate::policy::{DefaultPolicy, ThreadedPolicy};
    use crate::watchdog::NoopWatchdog;
    use slog::{Drain, Level};
    use slog_atomic::AtomicSwitch;

    /// Builds a real root logger the way the teacher's test harness does:
    /// compact terminal formatting, fed through an async drain behind an
    /// atomic switch so tests can swap drains without racing a live logger.
    fn test_logger() -> Logger {
        let decorator = slog_term::PlainDecorator::new(std::io::stdout());
        let drain = slog_term::CompactFormat::new(decorator).build().fuse();
        let drain = slog_async::Async::new(drain).build().fuse();
        let drain = AtomicSwitch::new(drain);
        Logger::root(
            slog::LevelFilter::new(drain, Level::Info).fuse(),
            o!("version" => env!("CARGO_PKG_VERSION")),
        )
    }

    type TestFsm = FsmBase<DefaultPolicy, NoopWatchdog, ()>;

    fn always_true() -> Box<dyn crate::invoke::Invoke<()>> {
        Box::new(BoolHandler(|_: ()| true))
    }

    /// S1 — minimal traffic light.
    #[test]
    fn s1_minimal_traffic_light() {
        let fsm: TestFsm = FsmBase::new("traffic", test_logger());

        let g = StateId::from_raw(1);
        let y = StateId::from_raw(2);
        let r = StateId::from_raw(3);
        let tick = EventSymbol::new(1);

        fsm.add_state(State::with_id(g).with_handler(always_true()));
        fsm.add_state(State::with_id(y).with_handler(always_true()));
        fsm.add_state(State::with_id(r).with_handler(always_true()));

        fsm.add_transition(g, Transition::new(tick, y));
        fsm.add_transition(y, Transition::new(tick, r));
        fsm.add_transition(r, Transition::new(tick, g));

        fsm.set_start_state(g);
        fsm.set_error_state(g);
        fsm.add_stop_state(r);

        assert!(fsm.valid());
        fsm.start(true);
        assert_eq!(fsm.current_state(), Some(g));

        assert!(fsm.raise(tick, ()).is_ok());
        assert_eq!(fsm.step(), Status::StateChanged);
        assert_eq!(fsm.current_state(), Some(y));

        assert!(fsm.raise(tick, ()).is_ok());
        assert_eq!(fsm.step(), Status::StateChanged);
        assert_eq!(fsm.current_state(), Some(r));

        assert!(fsm.stop(false));
        assert_eq!(fsm.status(), Status::Stopped);
    }

    /// S2 — handler failure routes to error.
    #[test]
    fn s2_handler_failure_routes_to_error() {
        let fsm: TestFsm = FsmBase::new("fault", test_logger());

        let g = StateId::from_raw(1);
        let y = StateId::from_raw(2);
        let r = StateId::from_raw(3);
        let tick = EventSymbol::new(1);

        fsm.add_state(State::with_id(g).with_handler(always_true()));
        fsm.add_state(State::with_id(y).with_handler(Box::new(BoolHandler(|_: ()| false))));
        fsm.add_state(State::with_id(r).with_handler(always_true()));

        fsm.add_transition(g, Transition::new(tick, y));
        fsm.add_transition(y, Transition::new(tick, r));
        fsm.add_transition(r, Transition::new(tick, g));

        fsm.set_start_state(g);
        fsm.set_error_state(r);
        fsm.add_stop_state(r);

        assert!(fsm.valid());
        fsm.start(true);

        assert!(fsm.raise(tick, ()).is_ok());
        assert_eq!(fsm.step(), Status::Fault);
        assert_eq!(fsm.current_state(), None); // not Running anymore
        assert_eq!(fsm.status(), Status::Error);
    }

    /// S3 — hierarchical fall-through.
    #[test]
    fn s3_hierarchical_fall_through() {
        let fsm: TestFsm = FsmBase::new("hier", test_logger());

        let parent = StateId::from_raw(10);
        let child = StateId::from_raw(11);
        let tock = EventSymbol::new(7);

        fsm.add_state(State::with_id(parent).with_handler(always_true()));
        fsm.add_state(State::with_id(child).with_parent(parent).with_handler(always_true()));

        fsm.add_transition(parent, Transition::new(tock, child));

        fsm.set_start_state(parent);
        fsm.set_error_state(parent);
        fsm.add_stop_state(child);

        fsm.start(false);
        // from parent, tock leads to child via the direct row:
        assert!(fsm.accept(tock));
        assert!(fsm.raise(tock, ()).is_ok());
        assert_eq!(fsm.step(), Status::StateChanged);
        assert_eq!(fsm.current_state(), Some(child));

        // from child, tock is only reachable via the parent's row.
        assert!(fsm.accept(tock));
    }

    /// S4 — epsilon-transition rejection.
    #[test]
    fn s4_epsilon_transition_rejected() {
        let fsm: TestFsm = FsmBase::new("epsilon", test_logger());

        let a = StateId::from_raw(1);
        let b = StateId::from_raw(2);
        let x = EventSymbol::new(9);

        fsm.add_state(State::with_id(a).with_handler(always_true()));
        fsm.add_state(State::with_id(b).with_parent(a).with_handler(always_true()));

        fsm.add_transition(a, Transition::new(x, b));
        fsm.add_transition(b, Transition::new(x, a));

        fsm.set_start_state(a);
        fsm.set_error_state(a);
        fsm.add_stop_state(b);

        assert!(!fsm.deterministic());
        assert!(!fsm.valid());

        fsm.start(true);
        assert_eq!(fsm.status(), Status::Stopped); // start() was a silent no-op
    }

    /// S5 — in-handler transition wins (LIFO over pending raise).
    #[test]
    fn s5_in_handler_transition_wins() {
        let fsm: std::sync::Arc<FsmBase<DefaultPolicy, NoopWatchdog, ()>> =
            std::sync::Arc::new(FsmBase::new("priority", test_logger()));

        let a = StateId::from_raw(1);
        let b = StateId::from_raw(2);
        let ev_a = EventSymbol::new(1);
        let ev_b = EventSymbol::new(2);

        // State A's handler, on entry, calls transition(ev_b) against the
        // shared engine, biasing the queue so B is consumed before the
        // already-pending raise(ev_a) runs again.
        let inner_fsm = fsm.clone();
        fsm.add_state(
            State::with_id(a).with_handler(Box::new(BoolHandler(move |_: ()| {
                let _ = inner_fsm.transition(ev_b, ());
                true
            }))),
        );
        fsm.add_state(State::with_id(b).with_handler(always_true()));

        fsm.add_transition(a, Transition::new(ev_a, a));
        fsm.add_transition(a, Transition::new(ev_b, b));
        fsm.add_transition(b, Transition::new(ev_a, a));

        fsm.set_start_state(a);
        fsm.set_error_state(a);
        fsm.add_stop_state(b);

        fsm.start(false);
        assert!(fsm.raise(ev_a, ()).is_ok()); // queued at back: [A]

        // first step consumes the raised ev_a, entering A again, whose
        // handler pushes ev_b to the *front* of the queue.
        assert_eq!(fsm.step(), Status::StateChanged);
        assert_eq!(fsm.current_state(), Some(a));

        // second step consumes ev_b (the handler-issued transition).
        assert_eq!(fsm.step(), Status::StateChanged);
        assert_eq!(fsm.current_state(), Some(b));
    }

    /// S6 — reentrant transition rejected.
    #[test]
    fn s6_reentrant_transition_rejected() {
        let fsm: TestFsm = FsmBase::new("reentrant", test_logger());

        let a = StateId::from_raw(1);
        let e1 = EventSymbol::new(1);
        let e2 = EventSymbol::new(2);

        fsm.add_state(State::with_id(a).with_handler(always_true()));
        fsm.add_transition(a, Transition::new(e1, a));
        fsm.add_transition(a, Transition::new(e2, a));
        fsm.set_start_state(a);
        fsm.set_error_state(a);
        fsm.add_stop_state(a);

        fsm.start(false);
        assert!(fsm.transition(e1, ()).is_ok());
        assert_eq!(fsm.transition(e2, ()), Err(FsmError::ReentrantTransition));
    }

    #[test]
    fn add_states_is_all_or_nothing_on_collision() {
        let fsm: TestFsm = FsmBase::new("bulk", test_logger());
        let id = StateId::from_raw(42);
        fsm.add_state(State::with_id(id));

        let batch = vec![State::with_id(StateId::from_raw(43)), State::with_id(id)];
        assert!(!fsm.add_states(batch));
        assert!(fsm.add_state(State::with_id(StateId::from_raw(43))).1);
    }

    #[test]
    fn add_stop_states_is_all_or_nothing() {
        let fsm: TestFsm = FsmBase::new("bulk-stop", test_logger());
        let s1 = StateId::from_raw(1);
        let s2 = StateId::from_raw(2);
        fsm.add_state(State::with_id(s1));
        fsm.add_state(State::with_id(s2));

        // s2 duplicated within the batch -> rejected wholesale
        assert!(!fsm.add_stop_states(&[s1, s2, s2]));
        assert!(fsm.stop_states().is_empty());
        assert!(fsm.add_stop_states(&[s1, s2]));
        assert_eq!(fsm.stop_states().len(), 2);
    }

    #[test]
    fn raise_rejected_when_event_not_acceptable() {
        let fsm: TestFsm = FsmBase::new("reject", test_logger());
        let a = StateId::from_raw(1);
        let b = StateId::from_raw(2);
        fsm.add_state(State::with_id(a).with_handler(always_true()));
        fsm.add_state(State::with_id(b).with_handler(always_true()));
        fsm.add_transition(a, Transition::new(EventSymbol::new(1), b));
        fsm.set_start_state(a);
        fsm.set_error_state(a);
        fsm.add_stop_state(b);
        fsm.start(false);

        assert_eq!(
            fsm.raise(EventSymbol::new(99), ()),
            Err(FsmError::UnacceptedEvent(EventSymbol::new(99)))
        );
    }

    #[test]
    fn stop_with_wait_false_fails_outside_stop_state() {
        let fsm: TestFsm = FsmBase::new("stopwait", test_logger());
        let a = StateId::from_raw(1);
        fsm.add_state(State::with_id(a).with_handler(always_true()));
        fsm.set_start_state(a);
        fsm.set_error_state(a);
        fsm.add_stop_state(a);
        // deliberately do NOT add a transition, so `a` stays current and
        // isn't itself reached "by entering a stop state" semantics here —
        // it's both start and stop, so stop() should succeed immediately.
        fsm.start(false);
        assert!(fsm.stop(false));
    }

    #[test]
    fn threaded_policy_blocks_until_pulsed() {
        let fsm = std::sync::Arc::new(FsmBase::<ThreadedPolicy, NoopWatchdog, ()>::new(
            "threaded",
            test_logger(),
        ));
        let a = StateId::from_raw(1);
        let b = StateId::from_raw(2);
        let ev = EventSymbol::new(1);
        fsm.add_state(State::with_id(a).with_handler(always_true()));
        fsm.add_state(State::with_id(b).with_handler(always_true()));
        fsm.add_transition(a, Transition::new(ev, b));
        fsm.set_start_state(a);
        fsm.set_error_state(a);
        fsm.add_stop_state(b);
        fsm.start(false);

        let waiter = fsm.clone();
        let handle = std::thread::spawn(move || waiter.stop(true));

        // give the waiter a moment to block, then drive the transition that
        // pulses the stop signal.
        std::thread::sleep(std::time::Duration::from_millis(20));
        assert!(fsm.raise(ev, ()).is_ok());
        assert_eq!(fsm.step(), Status::StateChanged);

        assert!(handle.join().unwrap());
    }

    #[test]
    fn swap_exchanges_state() {
        let mut a: TestFsm = FsmBase::new("a", test_logger());
        let mut b: TestFsm = FsmBase::new("b", test_logger());

        let sa = StateId::from_raw(1);
        a.add_state(State::with_id(sa));
        a.set_start_state(sa);

        assert!(b.start_state().is_set() == false);
        a.swap(&mut b);
        assert_eq!(b.start_state(), sa);
        assert!(a.start_state().is_set() == false);
    }
}
