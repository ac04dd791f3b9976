//! Kernel: owns the bus, the store and the module registry, and drives boot.
//!
//! ```text
//! Kernel::builder() ─ build ─→ Kernel ─ boot ─→ [init × N] → EngineBooted → GameStarted
//!                                        │
//!                        tick / publish ─┴─→ EventBus ─→ module handlers ─→ StateStore
//! ```

mod config;
mod error;
mod module;

pub use config::RuntimeConfig;
pub use error::{KernelError, ModuleError};
pub use module::{Module, ModuleContext, ModuleRegistry};

use arena_core::{PcgRng, RngOracle, Tables};
use tracing::{debug, info};

use crate::events::{
    DispatchEnv, DispatchReport, Event, EventBus, HandlerContext, HandlerResult, Topic,
};
use crate::modules::{ActorModule, ClockModule, CombatModule, StageModule};
use crate::store::{StateSnapshot, StateStore, keys};

/// Owner name used for handlers subscribed through [`Kernel::subscribe`].
pub const EXTERNAL_OWNER: &str = "external";

/// The simulation host.
///
/// Construct with [`Kernel::builder`], call [`Kernel::boot`] once, then
/// drive it with [`Kernel::tick`] and [`Kernel::publish`].
pub struct Kernel {
    config: RuntimeConfig,
    tables: Tables,
    rng: Box<dyn RngOracle>,
    seed: u64,
    bus: EventBus,
    store: StateStore,
    registry: ModuleRegistry,
    boot_attempted: bool,
}

impl Kernel {
    pub fn builder() -> KernelBuilder {
        KernelBuilder::new()
    }

    /// Registers a module. Only possible before boot.
    pub fn register(&mut self, module: impl Module + 'static) -> Result<(), KernelError> {
        if self.boot_attempted {
            return Err(KernelError::AlreadyBooted);
        }
        self.registry.register(Box::new(module))
    }

    /// Initializes every module in registration order, then publishes
    /// `EngineBooted` and `GameStarted`.
    ///
    /// Boot runs at most once, even when a module fails to initialize.
    pub fn boot(&mut self) -> Result<DispatchReport, KernelError> {
        if self.boot_attempted {
            return Err(KernelError::AlreadyBooted);
        }
        self.boot_attempted = true;
        self.store.set(keys::KERNEL_SEED, self.seed);

        for module in self.registry.iter() {
            let name = module.name();
            let mut ctx = ModuleContext::new(
                name,
                &mut self.bus,
                &mut self.store,
                &self.tables,
                &self.config,
            );
            module
                .init(&mut ctx)
                .map_err(|source| KernelError::ModuleInit {
                    module: name,
                    source,
                })?;
            debug!(target: "runtime::kernel", module = name, "module initialized");
        }

        let modules: Vec<String> = self.registry.names().map(str::to_owned).collect();
        self.store.set(keys::KERNEL_MODULES, modules.clone());
        self.store.set(keys::KERNEL_BOOTED, true);
        info!(
            target: "runtime::kernel",
            modules = modules.len(),
            seed = self.seed,
            "kernel booted"
        );

        let mut report = self.publish(Event::EngineBooted { modules });
        report.merge(self.publish(Event::GameStarted));
        Ok(report)
    }

    pub fn publish(&mut self, event: Event) -> DispatchReport {
        let mut env = DispatchEnv {
            store: &mut self.store,
            tables: &self.tables,
            rng: self.rng.as_ref(),
            seed: self.seed,
        };
        self.bus.publish(event, &mut env)
    }

    /// Advances simulated time by `elapsed`.
    pub fn tick(&mut self, elapsed: u64) -> DispatchReport {
        self.publish(Event::Tick { elapsed })
    }

    /// Subscribes an external collaborator (renderer, UI, test harness).
    ///
    /// External handlers run after module handlers subscribed earlier.
    pub fn subscribe<F>(&mut self, topic: Topic, handler: F)
    where
        F: Fn(&Event, &mut HandlerContext<'_>) -> HandlerResult + 'static,
    {
        self.bus.subscribe(EXTERNAL_OWNER, topic, handler);
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    pub fn snapshot(&self) -> StateSnapshot {
        self.store.snapshot()
    }

    pub fn tables(&self) -> &Tables {
        &self.tables
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn modules(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.registry.names()
    }

    pub fn is_booted(&self) -> bool {
        self.store.read::<bool>(keys::KERNEL_BOOTED).copied().unwrap_or(false)
    }
}

/// Builder for [`Kernel`].
pub struct KernelBuilder {
    config: RuntimeConfig,
    tables: Option<Tables>,
    rng: Option<Box<dyn RngOracle>>,
    modules: Vec<Box<dyn Module>>,
}

impl KernelBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            tables: None,
            rng: None,
            modules: Vec::new(),
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Static tables; [`Tables::builtin`] when not provided.
    pub fn tables(mut self, tables: Tables) -> Self {
        self.tables = Some(tables);
        self
    }

    /// RNG oracle; [`PcgRng`] when not provided.
    pub fn rng(mut self, rng: impl RngOracle + 'static) -> Self {
        self.rng = Some(Box::new(rng));
        self
    }

    pub fn module(mut self, module: impl Module + 'static) -> Self {
        self.modules.push(Box::new(module));
        self
    }

    /// Appends the actor, combat, stage and clock modules, in that order.
    pub fn with_default_modules(mut self) -> Self {
        self.modules.push(Box::new(ActorModule));
        self.modules.push(Box::new(CombatModule));
        self.modules.push(Box::new(StageModule));
        self.modules.push(Box::new(ClockModule));
        self
    }

    /// Validates the tables and registers the modules.
    pub fn build(self) -> Result<Kernel, KernelError> {
        let tables = self.tables.unwrap_or_else(Tables::builtin);
        tables.validate()?;

        let seed = self.config.seed.unwrap_or_else(rand::random);
        let mut registry = ModuleRegistry::new();
        for module in self.modules {
            registry.register(module)?;
        }

        debug!(
            target: "runtime::kernel",
            seed,
            modules = registry.len(),
            stages = tables.stages.len(),
            "kernel built"
        );

        Ok(Kernel {
            bus: EventBus::with_max_depth(self.config.max_dispatch_depth),
            rng: self.rng.unwrap_or_else(|| Box::new(PcgRng)),
            config: self.config,
            tables,
            seed,
            store: StateStore::new(),
            registry,
            boot_attempted: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::{ErrorSeverity, GameError};
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recording {
        name: &'static str,
        log: Rc<RefCell<Vec<&'static str>>>,
        fail: bool,
    }

    impl Module for Recording {
        fn name(&self) -> &'static str {
            self.name
        }

        fn init(&self, ctx: &mut ModuleContext<'_>) -> Result<(), ModuleError> {
            self.log.borrow_mut().push(self.name);
            if self.fail {
                return Err(ModuleError::Setup {
                    reason: "init refused".into(),
                });
            }
            let log = Rc::clone(&self.log);
            ctx.subscribe(Topic::GameStarted, move |_, _| {
                log.borrow_mut().push("game_started");
                Ok(())
            });
            Ok(())
        }
    }

    fn recording(name: &'static str, log: &Rc<RefCell<Vec<&'static str>>>) -> Recording {
        Recording {
            name,
            log: Rc::clone(log),
            fail: false,
        }
    }

    #[test]
    fn boot_inits_in_order_then_announces() {
        let log = Rc::default();
        let mut kernel = Kernel::builder()
            .seed(1)
            .module(recording("first", &log))
            .module(recording("second", &log))
            .build()
            .unwrap();

        let report = kernel.boot().unwrap();

        assert_eq!(*log.borrow(), ["first", "second", "game_started", "game_started"]);
        assert_eq!(report.delivered, vec![Topic::EngineBooted, Topic::GameStarted]);
        assert!(kernel.is_booted());
        assert_eq!(kernel.store().read::<u64>(keys::KERNEL_SEED), Ok(&1));
    }

    #[test]
    fn second_boot_is_rejected() {
        let mut kernel = Kernel::builder().seed(1).build().unwrap();
        kernel.boot().unwrap();

        let err = kernel.boot().unwrap_err();
        assert!(matches!(err, KernelError::AlreadyBooted));
        assert_eq!(err.severity(), ErrorSeverity::Validation);
        assert!(matches!(
            kernel.register(recording("late", &Rc::default())),
            Err(KernelError::AlreadyBooted)
        ));
    }

    #[test]
    fn failing_init_aborts_boot() {
        let log = Rc::default();
        let mut kernel = Kernel::builder()
            .seed(1)
            .module(Recording {
                name: "broken",
                log: Rc::clone(&log),
                fail: true,
            })
            .module(recording("never", &log))
            .build()
            .unwrap();

        let err = kernel.boot().unwrap_err();
        assert!(matches!(err, KernelError::ModuleInit { module: "broken", .. }));
        assert_eq!(err.error_code(), "MODULE_INIT");
        assert_eq!(*log.borrow(), ["broken"]);
        assert!(!kernel.is_booted());
    }

    #[test]
    fn invalid_module_is_rejected_at_build() {
        let log = Rc::default();
        let result = Kernel::builder()
            .with_default_modules()
            .module(recording("stage", &log))
            .build();
        assert!(matches!(result, Err(KernelError::InvalidModule { .. })));
    }

    #[test]
    fn invalid_tables_are_rejected_at_build() {
        let mut tables = Tables::builtin();
        tables.pools = arena_core::EnemyPools::new();
        assert!(matches!(
            Kernel::builder().tables(tables).build(),
            Err(KernelError::Tables(_))
        ));
    }

    #[test]
    fn default_modules_register_in_order() {
        let kernel = Kernel::builder().with_default_modules().build().unwrap();
        assert!(kernel.modules().eq(["actor", "combat", "stage", "clock"]));
    }
}
