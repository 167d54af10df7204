//! Concurrent event/combat coordination core for a multi-user text game
//! server.
//!
//! Many independently scheduled client sessions observe and mutate one
//! shared world without data races and without a central lock: every piece
//! of shared state is owned exclusively by a long-lived actor task and is
//! only reached through that actor's serialized command queue.
//!
//! Modules are organized by responsibility:
//! - [`events`] hosts the typed event model and the event bus actor
//! - [`combat`] hosts the combat resolver actor
//! - [`session`] hosts the per-player input/event interleaving loop
//! - [`throttle`] provides the pacing primitive shared by the timers
//! - [`config`] and [`error`] round out the public API surface
pub mod combat;
pub mod config;
pub mod error;
pub mod events;
pub mod session;
pub mod throttle;

pub use combat::{CombatHandle, CombatResolver};
pub use config::EngineConfig;
pub use error::{EngineError, Result, SessionError};
pub use events::{Event, EventBus, EventBusHandle};
pub use session::{
    CommandDispatcher, Dispatch, LineReader, Session, SessionContext, Terminal,
};
pub use throttle::Throttler;
