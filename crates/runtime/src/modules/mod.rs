//! Built-in simulation modules.
//!
//! [`crate::KernelBuilder::with_default_modules`] registers them in the order
//! listed here; handler order on shared topics follows it.

mod actor;
pub(crate) mod clock;
mod combat;
mod stage;

pub use actor::ActorModule;
pub use clock::ClockModule;
pub use combat::CombatModule;
pub use stage::StageModule;
