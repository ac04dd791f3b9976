//! Topic-keyed synchronous event bus.

use std::collections::HashMap;

use arena_core::{ErrorSeverity, GameError, RngOracle, Tables};
use tracing::{error, trace, warn};

use super::{Event, HandlerContext, HandlerError, HandlerResult, Topic};
use crate::store::StateStore;

/// Boxed event handler.
pub type Handler = Box<dyn Fn(&Event, &mut HandlerContext<'_>) -> HandlerResult>;

struct Subscription {
    owner: &'static str,
    handler: Handler,
}

/// Simulation state lent to handlers for the duration of one publish.
pub struct DispatchEnv<'a> {
    pub store: &'a mut StateStore,
    pub tables: &'a Tables,
    pub rng: &'a dyn RngOracle,
    pub seed: u64,
}

/// A handler that returned an error during a publish.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HandlerFailure {
    pub topic: Topic,
    pub module: &'static str,
    pub code: &'static str,
    pub severity: ErrorSeverity,
    pub message: String,
}

/// What happened during one publish, including every follow-up event.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Topics in dispatch order.
    pub delivered: Vec<Topic>,
    pub failures: Vec<HandlerFailure>,
    /// Events dropped at the depth limit.
    pub dropped: usize,
}

impl DispatchReport {
    /// Number of dispatched events of `topic`.
    pub fn count(&self, topic: Topic) -> usize {
        self.delivered.iter().filter(|t| **t == topic).count()
    }

    pub fn contains(&self, topic: Topic) -> bool {
        self.delivered.contains(&topic)
    }

    /// No handler failed and nothing was dropped.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.dropped == 0
    }

    pub fn merge(&mut self, other: DispatchReport) {
        self.delivered.extend(other.delivered);
        self.failures.extend(other.failures);
        self.dropped += other.dropped;
    }
}

/// Topic-keyed publish/subscribe dispatcher.
///
/// Handlers of a topic run in registration order. Follow-up events emitted
/// by a handler are dispatched depth-first right after that handler returns,
/// so causal chains resolve before the next sibling handler observes the
/// store. Handler errors are logged and recorded; they never stop the
/// remaining handlers.
pub struct EventBus {
    subscriptions: HashMap<Topic, Vec<Subscription>>,
    max_depth: usize,
}

impl EventBus {
    pub const DEFAULT_MAX_DEPTH: usize = 64;

    pub fn new() -> Self {
        Self::with_max_depth(Self::DEFAULT_MAX_DEPTH)
    }

    /// Creates a bus that drops follow-up events nested deeper than `max_depth`.
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            subscriptions: HashMap::new(),
            max_depth: max_depth.max(1),
        }
    }

    pub fn subscribe<F>(&mut self, owner: &'static str, topic: Topic, handler: F)
    where
        F: Fn(&Event, &mut HandlerContext<'_>) -> HandlerResult + 'static,
    {
        self.subscriptions
            .entry(topic)
            .or_default()
            .push(Subscription {
                owner,
                handler: Box::new(handler),
            });
    }

    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.subscriptions.get(&topic).map_or(0, Vec::len)
    }

    /// Subscribing modules for `topic`, in invocation order.
    pub fn subscribers(&self, topic: Topic) -> impl Iterator<Item = &'static str> + '_ {
        self.subscriptions
            .get(&topic)
            .into_iter()
            .flatten()
            .map(|subscription| subscription.owner)
    }

    /// Publishes an event and every follow-up it causes.
    pub fn publish(&self, event: Event, env: &mut DispatchEnv<'_>) -> DispatchReport {
        let mut report = DispatchReport::default();
        self.dispatch(&event, 0, env, &mut report);
        report
    }

    fn dispatch(
        &self,
        event: &Event,
        depth: usize,
        env: &mut DispatchEnv<'_>,
        report: &mut DispatchReport,
    ) {
        let topic = event.topic();
        if depth >= self.max_depth {
            warn!(
                target: "runtime::events",
                %topic,
                depth,
                "dispatch depth limit reached, dropping event"
            );
            report.dropped += 1;
            return;
        }
        report.delivered.push(topic);

        let Some(subscriptions) = self.subscriptions.get(&topic) else {
            trace!(target: "runtime::events", %topic, "no subscribers");
            return;
        };

        for subscription in subscriptions {
            let mut ctx = HandlerContext::new(
                subscription.owner,
                env.store,
                env.tables,
                env.rng,
                env.seed,
            );
            let result = (subscription.handler)(event, &mut ctx);
            let outbox = ctx.into_outbox();

            match result {
                Ok(()) => {
                    for follow_up in &outbox {
                        self.dispatch(follow_up, depth + 1, env, report);
                    }
                }
                Err(err) => {
                    report
                        .failures
                        .push(handle_handler_error(topic, subscription.owner, err, outbox.len()));
                }
            }
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Logs a handler failure. Events the handler queued before failing are discarded.
fn handle_handler_error(
    topic: Topic,
    module: &'static str,
    err: HandlerError,
    discarded: usize,
) -> HandlerFailure {
    let severity = err.severity();
    let code = err.error_code();

    if severity.is_internal() {
        error!(
            target: "runtime::events",
            %topic,
            module,
            code,
            severity = severity.as_str(),
            discarded,
            error = %err,
            "Handler failed, continuing"
        );
    } else {
        warn!(
            target: "runtime::events",
            %topic,
            module,
            code,
            severity = severity.as_str(),
            discarded,
            error = %err,
            "Handler rejected event"
        );
    }

    HandlerFailure {
        topic,
        module,
        code,
        severity,
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StateError;
    use arena_core::{ActorId, PcgRng};
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Fixture {
        store: StateStore,
        tables: Tables,
        rng: PcgRng,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                store: StateStore::new(),
                tables: Tables::builtin(),
                rng: PcgRng,
            }
        }

        fn publish(&mut self, bus: &EventBus, event: Event) -> DispatchReport {
            let mut env = DispatchEnv {
                store: &mut self.store,
                tables: &self.tables,
                rng: &self.rng,
                seed: 0,
            };
            bus.publish(event, &mut env)
        }
    }

    type Log = Rc<RefCell<Vec<String>>>;

    fn recorder(
        log: &Log,
        label: &'static str,
    ) -> impl Fn(&Event, &mut HandlerContext<'_>) -> HandlerResult + 'static {
        let log = Rc::clone(log);
        move |event, _| {
            log.borrow_mut().push(format!("{label}:{}", event.topic()));
            Ok(())
        }
    }

    #[test]
    fn handlers_run_in_registration_order() {
        let log = Log::default();
        let mut bus = EventBus::new();
        bus.subscribe("a", Topic::GameStarted, recorder(&log, "first"));
        bus.subscribe("b", Topic::GameStarted, recorder(&log, "second"));

        let report = Fixture::new().publish(&bus, Event::GameStarted);

        assert_eq!(*log.borrow(), ["first:game_started", "second:game_started"]);
        assert_eq!(report.delivered, vec![Topic::GameStarted]);
        assert!(bus.subscribers(Topic::GameStarted).eq(["a", "b"]));
    }

    #[test]
    fn publish_without_subscribers_is_a_no_op() {
        let bus = EventBus::new();
        let report = Fixture::new().publish(&bus, Event::Tick { elapsed: 10 });
        assert!(report.is_clean());
        assert_eq!(report.count(Topic::Tick), 1);
    }

    #[test]
    fn follow_ups_run_before_next_sibling() {
        let log = Log::default();
        let mut bus = EventBus::new();
        bus.subscribe("stage", Topic::GameStarted, |_, ctx| {
            ctx.emit(Event::StageEntered { index: 1 });
            Ok(())
        });
        bus.subscribe("late", Topic::GameStarted, recorder(&log, "sibling"));
        bus.subscribe("spy", Topic::StageEntered, recorder(&log, "nested"));

        Fixture::new().publish(&bus, Event::GameStarted);

        assert_eq!(*log.borrow(), ["nested:stage_entered", "sibling:game_started"]);
    }

    #[test]
    fn failing_handler_does_not_stop_siblings() {
        let log = Log::default();
        let mut bus = EventBus::new();
        bus.subscribe("broken", Topic::AdvanceConfirmed, |_, ctx| {
            ctx.emit(Event::StageEntered { index: 9 });
            Err(StateError::MissingState {
                key: "stage.machine".into(),
            }
            .into())
        });
        bus.subscribe("ok", Topic::AdvanceConfirmed, recorder(&log, "ok"));
        bus.subscribe("spy", Topic::StageEntered, recorder(&log, "leak"));

        let report = Fixture::new().publish(&bus, Event::AdvanceConfirmed);

        assert_eq!(*log.borrow(), ["ok:advance_confirmed"]);
        assert_eq!(report.failures.len(), 1);
        let failure = &report.failures[0];
        assert_eq!(failure.module, "broken");
        assert_eq!(failure.code, "MISSING_STATE");
        assert_eq!(failure.severity, ErrorSeverity::Recoverable);
        assert!(!report.contains(Topic::StageEntered));
    }

    #[test]
    fn runaway_cascade_is_cut_at_depth_limit() {
        let mut bus = EventBus::with_max_depth(5);
        bus.subscribe("loop", Topic::ActorDied, |event, ctx| {
            ctx.emit(event.clone());
            Ok(())
        });

        let report = Fixture::new().publish(&bus, Event::ActorDied { actor: ActorId(1) });

        assert_eq!(report.count(Topic::ActorDied), 5);
        assert_eq!(report.dropped, 1);
        assert!(!report.is_clean());
    }

    #[test]
    fn handlers_share_the_store() {
        let mut bus = EventBus::new();
        bus.subscribe("clock", Topic::Tick, |event, ctx| {
            let Event::Tick { elapsed } = event else {
                return Ok(());
            };
            let now = ctx.read::<u64>("clock.now").copied().unwrap_or(0);
            ctx.write("clock.now", now + elapsed);
            Ok(())
        });

        let mut fixture = Fixture::new();
        fixture.publish(&bus, Event::Tick { elapsed: 30 });
        fixture.publish(&bus, Event::Tick { elapsed: 12 });

        assert_eq!(fixture.store.read::<u64>("clock.now"), Ok(&42));
    }
}
