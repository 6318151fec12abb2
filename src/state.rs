//! State (C3): holds an identity, an optional parent identity, and an
//! optional handler invocable with the engine's argument pack.

use crate::ids::StateId;
use crate::invoke::Invoke;

/// A registered state.
///
/// `invoke` forwards to the handler if one is installed; a missing handler
/// reports failure, which is the engine's signal to drop to the error state.
pub struct State<Args> {
    id: StateId,
    parent: StateId,
    handler: Option<Box<dyn Invoke<Args>>>,
}

impl<Args> State<Args> {
    /// A fresh state with a freshly generated random id and no parent or handler.
    pub fn new() -> State<Args> {
        State {
            id: StateId::generate(),
            parent: StateId::UNSET,
            handler: None,
        }
    }

    /// A state with an explicit id. Intended for deterministic fixtures
    /// where ids are named rather than randomly generated.
    pub fn with_id(id: StateId) -> State<Args> {
        State {
            id,
            parent: StateId::UNSET,
            handler: None,
        }
    }

    pub fn with_parent(mut self, parent: StateId) -> State<Args> {
        self.parent = parent;
        self
    }

    pub fn with_handler(mut self, handler: Box<dyn Invoke<Args>>) -> State<Args> {
        self.handler = Some(handler);
        self
    }

    pub fn id(&self) -> StateId {
        self.id
    }

    pub fn parent(&self) -> StateId {
        self.parent
    }

    pub fn has_parent(&self) -> bool {
        self.parent.is_set()
    }

    pub fn has_handler(&self) -> bool {
        self.handler.is_some()
    }

    /// Forwards `args` to the handler. A missing handler reports failure.
    pub fn invoke(&mut self, args: Args) -> bool {
        match &mut self.handler {
            Some(h) => h.invoke(args),
            None => false,
        }
    }

    /// Detaches the handler, leaving `id`/`parent` in place. Lets a caller
    /// invoke the handler without holding a borrow on this `State` (or on
    /// whatever container it lives in), while the identity/hierarchy
    /// information a concurrent lookup needs stays intact.
    pub(crate) fn take_handler(&mut self) -> Option<Box<dyn Invoke<Args>>> {
        self.handler.take()
    }

    pub(crate) fn restore_handler(&mut self, handler: Box<dyn Invoke<Args>>) {
        self.handler = Some(handler);
    }
}

impl<Args> Default for State<Args> {
    fn default() -> Self {
        State::new()
    }
}
