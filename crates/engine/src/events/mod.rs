//! Typed event model and the event bus actor.
//!
//! Events are immutable values constructed at the moment of the triggering
//! action and shared untouched across the fan-out; everything
//! receiver-specific ([`Event::render`], [`Event::is_for`]) is a pure
//! function of the receiver.

mod bus;
mod event;

pub use bus::{EventBus, EventBusHandle};
pub use event::Event;
