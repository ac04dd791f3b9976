//! What a handler sees while it runs.

use arena_core::{ActorId, ErrorSeverity, GameError, RngOracle, StageError, StatError, Tables};
use tracing::warn;

use super::Event;
use crate::store::{StateError, StateRecord, StateStore, StateValue, keys};

pub type HandlerResult = Result<(), HandlerError>;

/// Failure of a single handler. Isolated by the bus; never aborts a publish.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error(transparent)]
    State(#[from] StateError),

    #[error(transparent)]
    Stat(#[from] StatError),

    #[error(transparent)]
    Stage(#[from] StageError),

    #[error("event names unknown actor {actor}")]
    UnknownActor { actor: ActorId },
}

impl GameError for HandlerError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::State(err) => err.severity(),
            Self::Stat(err) => err.severity(),
            Self::Stage(err) => err.severity(),
            Self::UnknownActor { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::State(err) => err.error_code(),
            Self::Stat(err) => err.error_code(),
            Self::Stage(err) => err.error_code(),
            Self::UnknownActor { .. } => "UNKNOWN_ACTOR",
        }
    }
}

/// Borrowed view of the simulation handed to one handler invocation.
///
/// Events passed to [`HandlerContext::emit`] are dispatched after the
/// handler returns, before the next handler of the current event runs.
pub struct HandlerContext<'a> {
    module: &'static str,
    store: &'a mut StateStore,
    tables: &'a Tables,
    rng: &'a dyn RngOracle,
    seed: u64,
    outbox: Vec<Event>,
}

impl<'a> HandlerContext<'a> {
    pub(crate) fn new(
        module: &'static str,
        store: &'a mut StateStore,
        tables: &'a Tables,
        rng: &'a dyn RngOracle,
        seed: u64,
    ) -> Self {
        Self {
            module,
            store,
            tables,
            rng,
            seed,
            outbox: Vec::new(),
        }
    }

    /// Name of the module that subscribed the running handler.
    pub fn module(&self) -> &'static str {
        self.module
    }

    pub fn store(&self) -> &StateStore {
        self.store
    }

    pub fn read<T: StateRecord>(&self, key: &str) -> Result<&T, StateError> {
        self.store.read(key)
    }

    /// Writes a full record back to the store.
    ///
    /// Writes outside the handler module's own namespace are allowed but
    /// logged, since they break the key ownership map.
    pub fn write(&mut self, key: &'static str, value: impl Into<StateValue>) {
        if keys::owner(key) != Some(self.module) {
            warn!(
                target: "runtime::store",
                key,
                module = self.module,
                owner = keys::owner(key).unwrap_or("none"),
                "write outside owned namespace"
            );
        }
        self.store.set(key, value);
    }

    pub fn tables(&self) -> &'a Tables {
        self.tables
    }

    pub fn rng(&self) -> &'a dyn RngOracle {
        self.rng
    }

    /// Game seed fixed at kernel build time.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Queues a follow-up event.
    pub fn emit(&mut self, event: Event) {
        self.outbox.push(event);
    }

    /// Events queued so far by this handler.
    pub fn emitted(&self) -> &[Event] {
        &self.outbox
    }

    pub(crate) fn into_outbox(self) -> Vec<Event> {
        self.outbox
    }
}
