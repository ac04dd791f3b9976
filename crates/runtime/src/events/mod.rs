//! Topic-based event bus for module communication.
//!
//! The bus is the only channel between modules. Dispatch is synchronous and
//! single-threaded: [`EventBus::publish`] returns once the event and every
//! follow-up it caused have been handled.

mod bus;
mod event;
mod handler;

pub use bus::{DispatchEnv, DispatchReport, EventBus, Handler, HandlerFailure};
pub use event::{Event, Topic};
pub use handler::{HandlerContext, HandlerError, HandlerResult};
