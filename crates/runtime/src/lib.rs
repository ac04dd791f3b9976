//! Event-driven kernel for the arena battle simulation.
//!
//! This crate hosts the simulation: a [`Kernel`] owns a synchronous
//! topic-keyed [`EventBus`], a shared keyed [`StateStore`], and the modules
//! that react to events. Modules never call each other; they subscribe to
//! topics, read and write the store, and emit follow-up events.
//!
//! Modules are organized by responsibility:
//! - [`kernel`] hosts the kernel, its builder and the module contract
//! - [`events`] provides the event model and the dispatcher
//! - [`store`] holds the shared simulation state and its key layout
//! - [`modules`] contains the built-in actor, combat, stage and clock modules
pub mod events;
pub mod kernel;
pub mod modules;
pub mod store;

pub use events::{
    DispatchReport, Event, EventBus, HandlerContext, HandlerError, HandlerFailure, HandlerResult,
    Topic,
};
pub use kernel::{
    EXTERNAL_OWNER, Kernel, KernelBuilder, KernelError, Module, ModuleContext, ModuleError,
    ModuleRegistry, RuntimeConfig,
};
pub use modules::{ActorModule, ClockModule, CombatModule, StageModule};
pub use store::{StateError, StateRecord, StateSnapshot, StateStore, StateValue};
