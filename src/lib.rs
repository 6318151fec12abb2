//! A policy-parameterised, thread-aware, hierarchical-state finite state
//! machine engine for portable IoT runtimes.
//!
//! # Copyrights
//!
//! Copyright (c) 2026, lwIoT contributors.
//! All rights reserved.
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! you may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//! http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.
//!
//! # Example
//! ```
//! use detail_fsm::engine::FsmBase;
//! use detail_fsm::ids::{EventSymbol, StateId};
//! use detail_fsm::invoke::BoolHandler;
//! use detail_fsm::policy::DefaultPolicy;
//! use detail_fsm::state::State;
//! use detail_fsm::transition::Transition;
//! use detail_fsm::watchdog::NoopWatchdog;
//! use slog::{Logger, Discard, o};
//!
//! let fsm: FsmBase<DefaultPolicy, NoopWatchdog, ()> =
//!     FsmBase::new("door", Logger::root(Discard, o!()));
//!
//! let closed = StateId::from_raw(1);
//! let open = StateId::from_raw(2);
//! let knock = EventSymbol::new(1);
//!
//! fsm.add_state(State::with_id(closed).with_handler(Box::new(BoolHandler(|_: ()| true))));
//! fsm.add_state(State::with_id(open).with_handler(Box::new(BoolHandler(|_: ()| true))));
//! fsm.add_transition(closed, Transition::new(knock, open));
//! fsm.add_transition(open, Transition::new(knock, closed));
//! fsm.set_start_state(closed);
//! fsm.set_error_state(closed);
//! fsm.add_stop_state(open);
//!
//! assert!(fsm.valid());
//! fsm.start(true);
//! fsm.raise(knock, ()).unwrap();
//! fsm.step();
//! assert_eq!(fsm.current_state(), Some(open));
//! ```
//!
//! # Modules
//! * [`ids`] — `StateId`/`EventSymbol` identity types and the packed table key.
//! * [`error`] — the engine's error taxonomy.
//! * [`status`] — the engine's latched status.
//! * [`invoke`] — the type-erased handler and guard capabilities.
//! * [`transition`] — a single transition row.
//! * [`state`] — a registered state.
//! * [`table`] — the transition table and alphabet, with hierarchical lookup.
//! * [`policy`] — the threading capability an engine is built against.
//! * [`watchdog`] — the watchdog collaborator contract.
//! * [`engine`] — `FsmBase`, tying all of the above together.

pub mod engine;
pub mod error;
pub mod ids;
pub mod invoke;
pub mod policy;
pub mod state;
pub mod status;
pub mod table;
pub mod transition;
pub mod watchdog;

pub use engine::FsmBase;
pub use error::FsmError;
pub use ids::{EventSymbol, StateId};
pub use status::Status;
