//! State and event identity types.
//!
//! `StateId` is generated from random bytes at construction time, mirroring
//! the teacher's use of `Uuid::new_v4()` for graph node identity: the engine
//! never assumes sequential ids and must not rely on allocation order.

use std::fmt;

use slog::Value;
use uuid::Uuid;

/// Identifies a registered [`State`](crate::state::State).
///
/// Zero is reserved as the "unset" sentinel (`StateId::UNSET`); valid ids are
/// non-zero. Ids are generated from uniformly random bytes, so collision is
/// accepted as negligible rather than defended against structurally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateId(u64);

impl StateId {
    /// The unset sentinel. No registered state may carry this id.
    pub const UNSET: StateId = StateId(0);

    /// Generates a fresh, non-zero random id.
    ///
    /// Draws from a v4 UUID and folds it into 64 bits; re-rolls in the
    /// astronomically unlikely event the fold lands on zero.
    pub fn generate() -> StateId {
        loop {
            let uuid = Uuid::new_v4();
            let bytes = uuid.as_bytes();
            let mut buf = [0u8; 8];
            buf.copy_from_slice(&bytes[0..8]);
            let candidate = u64::from_le_bytes(buf);
            if candidate != 0 {
                return StateId(candidate);
            }
        }
    }

    /// Wraps an explicit numeric id. Intended for tests and deterministic
    /// fixtures that want fixed, readable small ids instead of random ones.
    pub const fn from_raw(raw: u64) -> StateId {
        StateId(raw)
    }

    pub const fn is_set(&self) -> bool {
        self.0 != 0
    }

    pub const fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for StateId {
    fn default() -> Self {
        StateId::UNSET
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "state#{:016x}", self.0)
    }
}

impl Value for StateId {
    fn serialize(
        &self,
        record: &slog::Record,
        key: slog::Key,
        serializer: &mut dyn slog::Serializer,
    ) -> slog::Result {
        self.to_string().serialize(record, key, serializer)
    }
}

/// Identifies a symbol of the input alphabet.
///
/// Zero means "unset", mirroring `StateId`'s sentinel convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventSymbol(u64);

impl EventSymbol {
    pub const UNSET: EventSymbol = EventSymbol(0);

    pub const fn new(raw: u64) -> EventSymbol {
        EventSymbol(raw)
    }

    pub const fn is_set(&self) -> bool {
        self.0 != 0
    }

    pub const fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for EventSymbol {
    fn default() -> Self {
        EventSymbol::UNSET
    }
}

impl From<u64> for EventSymbol {
    fn from(raw: u64) -> Self {
        EventSymbol(raw)
    }
}

impl fmt::Display for EventSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "event#{}", self.0)
    }
}

impl Value for EventSymbol {
    fn serialize(
        &self,
        record: &slog::Record,
        key: slog::Key,
        serializer: &mut dyn slog::Serializer,
    ) -> slog::Result {
        self.to_string().serialize(record, key, serializer)
    }
}

/// Packed `(StateId, EventSymbol)` composite key for the transition table.
///
/// State occupies the low half, event the high half. Packing into a single
/// integer means the same event against two different states is guaranteed
/// to be two independent table rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct PackedKey(u128);

impl PackedKey {
    pub(crate) fn new(state: StateId, event: EventSymbol) -> PackedKey {
        PackedKey(((event.raw() as u128) << 64) | state.raw() as u128)
    }
}
