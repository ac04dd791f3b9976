//! Module contract and the ordered registry.

use arena_core::Tables;
use tracing::warn;

use super::{KernelError, ModuleError, RuntimeConfig};
use crate::events::{Event, EventBus, HandlerContext, HandlerResult, Topic};
use crate::store::{StateRecord, StateStore, StateValue, keys};

/// A unit of simulation behavior.
///
/// `init` runs once during boot. It seeds the module's own store keys and
/// subscribes handlers; after that the module only acts through events.
pub trait Module {
    /// Unique, non-empty name. Also the store namespace the module owns.
    fn name(&self) -> &'static str;

    fn init(&self, ctx: &mut ModuleContext<'_>) -> Result<(), ModuleError>;
}

/// Boot-time access for [`Module::init`].
pub struct ModuleContext<'a> {
    module: &'static str,
    bus: &'a mut EventBus,
    store: &'a mut StateStore,
    tables: &'a Tables,
    config: &'a RuntimeConfig,
}

impl<'a> ModuleContext<'a> {
    pub(crate) fn new(
        module: &'static str,
        bus: &'a mut EventBus,
        store: &'a mut StateStore,
        tables: &'a Tables,
        config: &'a RuntimeConfig,
    ) -> Self {
        Self {
            module,
            bus,
            store,
            tables,
            config,
        }
    }

    /// Subscribes a handler owned by the initializing module.
    pub fn subscribe<F>(&mut self, topic: Topic, handler: F)
    where
        F: Fn(&Event, &mut HandlerContext<'_>) -> HandlerResult + 'static,
    {
        self.bus.subscribe(self.module, topic, handler);
    }

    pub fn read<T: StateRecord>(&self, key: &str) -> Result<&T, crate::store::StateError> {
        self.store.read(key)
    }

    pub fn write(&mut self, key: &'static str, value: impl Into<StateValue>) {
        if keys::owner(key) != Some(self.module) {
            warn!(
                target: "runtime::store",
                key,
                module = self.module,
                "initial write outside owned namespace"
            );
        }
        self.store.set(key, value);
    }

    pub fn tables(&self) -> &'a Tables {
        self.tables
    }

    pub fn config(&self) -> &'a RuntimeConfig {
        self.config
    }
}

/// Registered modules in registration order.
#[derive(Default)]
pub struct ModuleRegistry {
    modules: Vec<Box<dyn Module>>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a module. Empty or duplicate names are rejected and leave the
    /// registry unchanged.
    pub fn register(&mut self, module: Box<dyn Module>) -> Result<(), KernelError> {
        let name = module.name();
        if name.trim().is_empty() {
            return Err(KernelError::InvalidModule {
                name: name.to_owned(),
                reason: "module name is empty",
            });
        }
        if self.contains(name) {
            return Err(KernelError::InvalidModule {
                name: name.to_owned(),
                reason: "a module with this name is already registered",
            });
        }

        self.modules.push(module);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.modules.iter().any(|module| module.name() == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.modules.iter().map(|module| module.name())
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &dyn Module> {
        self.modules.iter().map(Box::as_ref)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
