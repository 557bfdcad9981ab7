//! The state machine host.
//!
//! [`StateMachine`] owns the current state, the destination graph and the
//! input queue, and drives one tick per [`update`](StateMachine::update)
//! call. Every transition request, whether made by a hook through
//! [`StateContext::request_transition`] or by the host through
//! [`StateMachine::change_state`], passes the same gate. What happens after
//! approval depends on the outgoing state's kind:
//!
//! - instant states ([`StateLogic`]) exit and the destination is entered
//!   within the same call;
//! - transitional states ([`TransitionalLogic`]) start their exit phase and
//!   the swap is deferred until `transition_out` reports completion (see the
//!   `transitional` submodule).
//!
//! # Example
//!
//! ```rust
//! use phaseflow::builder::StateMachineBuilder;
//! use phaseflow::input::Input;
//! use phaseflow::machine::{StateContext, StateLogic, StateResult};
//! use phaseflow::state_enum;
//!
//! state_enum! {
//!     enum Light {
//!         Red,
//!         Green,
//!     }
//! }
//!
//! #[derive(Clone, Debug)]
//! struct Switch;
//!
//! impl Input for Switch {
//!     type Kind = ();
//!     fn kind(&self) -> Self::Kind {}
//! }
//!
//! struct Lamp(Light);
//!
//! impl StateLogic<Light, Switch, ()> for Lamp {
//!     fn update(&mut self, cx: &mut StateContext<'_, Light, Switch, ()>) -> StateResult<Light> {
//!         if cx.inputs().has_input(()) {
//!             cx.request_transition(self.0)?;
//!         }
//!         Ok(())
//!     }
//! }
//!
//! let mut machine = StateMachineBuilder::new()
//!     .initial(Light::Red)
//!     .state(Light::Red, Lamp(Light::Green), [Light::Green])
//!     .state(Light::Green, Lamp(Light::Red), [Light::Red])
//!     .build()
//!     .unwrap();
//!
//! machine.start(&mut ()).unwrap();
//! machine.add_input(Switch);
//! machine.update(&mut ()).unwrap();
//! assert_eq!(machine.current_state(), Some(Light::Green));
//! ```

mod context;
mod engine;
mod error;
mod events;
mod logic;
mod transitional;

pub use context::StateContext;
pub use error::{MachineError, StateResult, TransitionError};
pub use events::MachineEvent;
pub use logic::{StateLogic, TransitionalLogic};

pub(crate) use logic::StateSlot;

use self::engine::{Commit, MachineCore};
use crate::config::MachineConfig;
use crate::core::{DestinationGraph, Phase, State, StateHistory};
use crate::input::{Input, InputQueue, InputSender};
use std::collections::HashMap;
use uuid::Uuid;

/// Tick-driven state machine over state ids `S`, inputs `E` and a host view
/// `V` that hooks can reach through their [`StateContext`].
///
/// Built with [`StateMachineBuilder`](crate::builder::StateMachineBuilder).
pub struct StateMachine<S: State, E: Input, V> {
    core: MachineCore<S, E>,
    slots: HashMap<S, StateSlot<S, E, V>>,
    initial: S,
    halted: Option<TransitionError<S>>,
}

impl<S: State, E: Input, V> StateMachine<S, E, V> {
    pub(crate) fn from_parts(
        initial: S,
        graph: DestinationGraph<S>,
        slots: HashMap<S, StateSlot<S, E, V>>,
        config: MachineConfig,
    ) -> Self {
        Self {
            core: MachineCore::new(graph, config),
            slots,
            initial,
            halted: None,
        }
    }

    /// Enter the initial state.
    pub fn start(&mut self, view: &mut V) -> Result<(), MachineError<S>> {
        if self.core.current.is_some() {
            return Err(MachineError::AlreadyStarted);
        }

        let initial = self.initial;
        self.core.current = Some(initial);
        tracing::info!(machine = %self.core.id, state = initial.name(), "State machine started");
        self.core.emit(MachineEvent::Started { state: initial });
        self.enter_state(initial, view);
        self.settle(view);
        Ok(())
    }

    /// Run one tick: move posted inputs into the write buffer, swap input
    /// buffers, then drive the current state.
    ///
    /// A transition error returned by a hook is reported here. With
    /// `halt_on_error` set the machine then refuses every later update with
    /// [`MachineError::Halted`]; the current state is left untouched either
    /// way.
    pub fn update(&mut self, view: &mut V) -> Result<(), MachineError<S>> {
        if let Some(cause) = &self.halted {
            return Err(MachineError::Halted(cause.clone()));
        }
        let current = self.core.current.ok_or(MachineError::NotStarted)?;

        self.core.tick += 1;
        self.core.inputs.drain_inbox();
        self.core.inputs.swap_input();

        match self.drive(current, view) {
            Ok(()) => {
                self.settle(view);
                Ok(())
            }
            Err(error) => {
                tracing::error!(
                    machine = %self.core.id,
                    tick = self.core.tick,
                    state = current.name(),
                    error = %error,
                    "State update failed"
                );
                if self.core.config.halt_on_error {
                    self.halted = Some(error.clone());
                } else {
                    self.settle(view);
                }
                Err(MachineError::Transition(error))
            }
        }
    }

    /// Request `from -> to` on behalf of the host.
    ///
    /// Validation is identical to a hook's request: self-transition, stale
    /// source, undeclared edge, then transition already in flight.
    pub fn change_state(&mut self, from: S, to: S, view: &mut V) -> Result<(), MachineError<S>> {
        if let Some(cause) = &self.halted {
            return Err(MachineError::Halted(cause.clone()));
        }
        let current = self.core.current.ok_or(MachineError::NotStarted)?;

        self.core.approve(current, from, to)?;
        self.settle(view);
        Ok(())
    }

    /// Record an input from the host. Readable on the next update.
    pub fn add_input(&mut self, input: E) {
        self.core.inputs.add_input(input);
    }

    pub fn input_sender(&self) -> InputSender<E> {
        self.core.inputs.sender()
    }

    pub fn inputs(&self) -> &InputQueue<E> {
        &self.core.inputs
    }

    /// `None` until [`start`](Self::start) is called.
    pub fn current_state(&self) -> Option<S> {
        self.core.current
    }

    pub fn initial_state(&self) -> S {
        self.initial
    }

    /// Destination of the transition in flight, if any.
    pub fn pending_destination(&self) -> Option<S> {
        self.core.commit.destination()
    }

    pub fn is_transitioning(&self) -> bool {
        self.core.commit != Commit::Idle
    }

    /// Phase of a transitional state. `None` for instant or unknown states.
    pub fn phase(&self, state: S) -> Option<Phase> {
        self.slots.get(&state).and_then(StateSlot::phase)
    }

    pub fn current_phase(&self) -> Option<Phase> {
        self.core.current.and_then(|state| self.phase(state))
    }

    pub fn destinations(&self, state: S) -> &[S] {
        self.core.graph.destinations(&state)
    }

    pub fn has_destination(&self, from: S, to: S) -> bool {
        self.core.graph.has_destination(&from, &to)
    }

    pub fn graph(&self) -> &DestinationGraph<S> {
        &self.core.graph
    }

    pub fn history(&self) -> &StateHistory<S> {
        &self.core.history
    }

    /// Number of updates run so far.
    pub fn tick(&self) -> u64 {
        self.core.tick
    }

    pub fn id(&self) -> Uuid {
        self.core.id
    }

    pub fn config(&self) -> &MachineConfig {
        &self.core.config
    }

    pub fn is_halted(&self) -> bool {
        self.halted.is_some()
    }

    /// Take every event recorded since the last call, oldest first.
    pub fn drain_events(&mut self) -> Vec<MachineEvent<S>> {
        self.core.events.drain(..).collect()
    }

    /// Act on approved requests until the machine is idle or waiting on an
    /// exit phase.
    ///
    /// Instant states whose `enter` hooks keep requesting each other never
    /// reach either. More swaps in one call than there are states is
    /// reported once.
    fn settle(&mut self, view: &mut V) {
        let limit = self.core.graph.len();
        let mut swaps = 0usize;
        while let Commit::Approved { from, to } = self.core.commit {
            if self.begin_exit(from, to, view) {
                self.complete_exit(view);
                swaps += 1;
                if swaps == limit + 1 {
                    tracing::warn!(
                        machine = %self.core.id,
                        tick = self.core.tick,
                        swaps,
                        state = to.name(),
                        "Instant states keep handing over within one call; entry hooks may be requesting each other"
                    );
                }
            }
        }
    }

    fn enter_state(&mut self, state: S, view: &mut V) {
        let tick = self.core.tick;
        let Some(slot) = self.slots.get_mut(&state) else {
            return;
        };

        let mut cx = StateContext::new(&mut self.core, view, state);
        let instant = match slot {
            StateSlot::Instant(logic) => {
                logic.enter(&mut cx);
                true
            }
            StateSlot::Transitional {
                logic,
                phase,
                since,
                stall_reported,
            } => {
                logic.enter(&mut cx);
                *phase = Phase::TransitionIn;
                *since = tick;
                *stall_reported = false;
                false
            }
        };

        self.core.emit(MachineEvent::Entered { state });
        if instant {
            self.core.emit(MachineEvent::FullyEntered { state });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::StateMachineBuilder;
    use crate::state_enum;
    use std::io;
    use std::sync::{Arc, Mutex};

    state_enum! {
        enum TestState {
            Start,
            Menu,
            Walk,
        }
    }

    #[derive(Clone, Debug, PartialEq)]
    enum TestInput {
        Next,
        Back,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    enum TestKind {
        Next,
        Back,
    }

    impl Input for TestInput {
        type Kind = TestKind;

        fn kind(&self) -> TestKind {
            match self {
                Self::Next => TestKind::Next,
                Self::Back => TestKind::Back,
            }
        }
    }

    #[derive(Default)]
    struct Trace {
        calls: Vec<String>,
    }

    struct Step {
        on_next: TestState,
        on_back: Option<TestState>,
    }

    impl StateLogic<TestState, TestInput, Trace> for Step {
        fn enter(&mut self, cx: &mut StateContext<'_, TestState, TestInput, Trace>) {
            let name = format!("enter {}", cx.this().name());
            cx.view_mut().calls.push(name);
        }

        fn update(
            &mut self,
            cx: &mut StateContext<'_, TestState, TestInput, Trace>,
        ) -> StateResult<TestState> {
            if cx.inputs().has_input(TestKind::Next) {
                cx.request_transition(self.on_next)?;
            } else if cx.inputs().has_input(TestKind::Back) {
                if let Some(back) = self.on_back {
                    cx.request_transition(back)?;
                }
            }
            Ok(())
        }

        fn exit(&mut self, cx: &mut StateContext<'_, TestState, TestInput, Trace>) {
            let name = format!("exit {}", cx.this().name());
            cx.view_mut().calls.push(name);
        }
    }

    fn machine() -> StateMachine<TestState, TestInput, Trace> {
        machine_with(MachineConfig::default())
    }

    fn machine_with(config: MachineConfig) -> StateMachine<TestState, TestInput, Trace> {
        StateMachineBuilder::new()
            .config(config)
            .initial(TestState::Start)
            .state(
                TestState::Start,
                Step {
                    on_next: TestState::Menu,
                    on_back: None,
                },
                [TestState::Menu],
            )
            .state(
                TestState::Menu,
                Step {
                    on_next: TestState::Walk,
                    on_back: Some(TestState::Start),
                },
                [TestState::Walk],
            )
            .state(
                TestState::Walk,
                Step {
                    on_next: TestState::Menu,
                    on_back: None,
                },
                [TestState::Menu],
            )
            .build()
            .unwrap()
    }

    #[test]
    fn update_before_start_is_rejected() {
        let mut machine = machine();
        assert_eq!(
            machine.update(&mut Trace::default()),
            Err(MachineError::NotStarted)
        );
        assert_eq!(machine.current_state(), None);
    }

    #[test]
    fn start_enters_initial_state_once() {
        let mut machine = machine();
        let mut trace = Trace::default();

        machine.start(&mut trace).unwrap();
        assert_eq!(machine.current_state(), Some(TestState::Start));
        assert_eq!(trace.calls, vec!["enter Start"]);
        assert_eq!(
            machine.start(&mut trace),
            Err(MachineError::AlreadyStarted)
        );
    }

    #[test]
    fn instant_transition_completes_within_the_tick() {
        let mut machine = machine();
        let mut trace = Trace::default();
        machine.start(&mut trace).unwrap();

        machine.add_input(TestInput::Next);
        machine.update(&mut trace).unwrap();

        assert_eq!(machine.current_state(), Some(TestState::Menu));
        assert!(!machine.is_transitioning());
        assert_eq!(trace.calls, vec!["enter Start", "exit Start", "enter Menu"]);
        assert_eq!(machine.history().len(), 1);
    }

    #[test]
    fn input_added_during_tick_is_not_seen_until_next_tick() {
        let mut machine = machine();
        let mut trace = Trace::default();
        machine.start(&mut trace).unwrap();

        machine.update(&mut trace).unwrap();
        machine.add_input(TestInput::Next);
        assert_eq!(machine.current_state(), Some(TestState::Start));

        machine.update(&mut trace).unwrap();
        assert_eq!(machine.current_state(), Some(TestState::Menu));

        // The Next input is gone by now, so Menu stays put.
        machine.update(&mut trace).unwrap();
        assert_eq!(machine.current_state(), Some(TestState::Menu));
    }

    #[test]
    fn illegal_request_from_hook_halts_machine_without_changing_state() {
        let mut machine = machine();
        let mut trace = Trace::default();
        machine.start(&mut trace).unwrap();
        machine.change_state(TestState::Start, TestState::Menu, &mut trace).unwrap();

        machine.add_input(TestInput::Back);
        let result = machine.update(&mut trace);

        assert_eq!(
            result,
            Err(MachineError::Transition(TransitionError::IllegalTransition {
                from: TestState::Menu,
                to: TestState::Start
            }))
        );
        assert_eq!(machine.current_state(), Some(TestState::Menu));
        assert!(machine.is_halted());
        assert!(matches!(
            machine.update(&mut trace),
            Err(MachineError::Halted(TransitionError::IllegalTransition { .. }))
        ));
    }

    #[test]
    fn illegal_request_from_hook_keeps_ticking_when_halting_is_off() {
        let mut machine = machine_with(MachineConfig {
            halt_on_error: false,
            ..MachineConfig::default()
        });
        let mut trace = Trace::default();
        machine.start(&mut trace).unwrap();
        machine.change_state(TestState::Start, TestState::Menu, &mut trace).unwrap();

        machine.add_input(TestInput::Back);
        assert_eq!(
            machine.update(&mut trace),
            Err(MachineError::Transition(TransitionError::IllegalTransition {
                from: TestState::Menu,
                to: TestState::Start
            }))
        );
        assert_eq!(machine.current_state(), Some(TestState::Menu));
        assert!(!machine.is_halted());
        assert!(!machine.is_transitioning());

        assert_eq!(machine.update(&mut trace), Ok(()));
        machine.change_state(TestState::Menu, TestState::Walk, &mut trace).unwrap();
        assert_eq!(machine.current_state(), Some(TestState::Walk));

        machine.add_input(TestInput::Next);
        machine.update(&mut trace).unwrap();
        assert_eq!(machine.current_state(), Some(TestState::Menu));
    }

    #[test]
    fn host_requests_go_through_the_same_gate() {
        let mut machine = machine();
        let mut trace = Trace::default();
        machine.start(&mut trace).unwrap();

        assert_eq!(
            machine.change_state(TestState::Start, TestState::Start, &mut trace),
            Err(MachineError::Transition(TransitionError::SelfTransition {
                state: TestState::Start
            }))
        );
        assert_eq!(
            machine.change_state(TestState::Menu, TestState::Walk, &mut trace),
            Err(MachineError::Transition(TransitionError::StaleSource {
                from: TestState::Menu,
                current: TestState::Start
            }))
        );
        assert_eq!(machine.current_state(), Some(TestState::Start));
        assert!(!machine.is_halted());
    }

    #[test]
    fn events_describe_lifecycle_in_order() {
        let mut machine = machine();
        let mut trace = Trace::default();
        machine.start(&mut trace).unwrap();
        machine.change_state(TestState::Start, TestState::Menu, &mut trace).unwrap();

        let events = machine.drain_events();
        assert_eq!(
            events,
            vec![
                MachineEvent::Started { state: TestState::Start },
                MachineEvent::Entered { state: TestState::Start },
                MachineEvent::FullyEntered { state: TestState::Start },
                MachineEvent::TransitionApproved {
                    from: TestState::Start,
                    to: TestState::Menu
                },
                MachineEvent::Exited {
                    from: TestState::Start,
                    to: TestState::Menu
                },
                MachineEvent::Entered { state: TestState::Menu },
                MachineEvent::FullyEntered { state: TestState::Menu },
            ]
        );
        assert!(machine.drain_events().is_empty());
    }

    /// Instant state that bounces to `other` on entry while the shared
    /// counter lasts.
    struct Bounce {
        other: TestState,
    }

    impl StateLogic<TestState, TestInput, u32> for Bounce {
        fn enter(&mut self, cx: &mut StateContext<'_, TestState, TestInput, u32>) {
            if *cx.view() > 0 {
                *cx.view_mut() -= 1;
                cx.request_transition(self.other).unwrap();
            }
        }

        fn update(
            &mut self,
            _cx: &mut StateContext<'_, TestState, TestInput, u32>,
        ) -> StateResult<TestState> {
            Ok(())
        }
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    fn bouncing(bounces: u32) -> (Captured, StateMachine<TestState, TestInput, u32>, u32) {
        let mut machine = StateMachineBuilder::new()
            .initial(TestState::Start)
            .state(
                TestState::Start,
                Bounce {
                    other: TestState::Menu,
                },
                [TestState::Menu],
            )
            .state(
                TestState::Menu,
                Bounce {
                    other: TestState::Start,
                },
                [TestState::Start],
            )
            .build()
            .unwrap();

        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();

        let mut left = bounces;
        tracing::subscriber::with_default(subscriber, || machine.start(&mut left)).unwrap();
        (captured, machine, left)
    }

    #[test]
    fn entry_hooks_requesting_each_other_are_reported_once() {
        let (captured, machine, left) = bouncing(7);

        assert_eq!(left, 0);
        assert_eq!(machine.history().len(), 7);
        assert_eq!(machine.current_state(), Some(TestState::Menu));
        assert!(!machine.is_transitioning());

        let logs = captured.text();
        assert_eq!(logs.matches("Instant states keep handing over").count(), 1);
        assert!(logs.contains("swaps=3"));
    }

    #[test]
    fn short_entry_chains_are_not_reported() {
        let (captured, machine, _) = bouncing(2);

        assert_eq!(machine.current_state(), Some(TestState::Start));
        assert_eq!(machine.history().len(), 2);
        assert!(!captured.text().contains("Instant states keep handing over"));
    }

    #[test]
    fn instant_states_report_no_phase() {
        let mut machine = machine();
        machine.start(&mut Trace::default()).unwrap();
        assert_eq!(machine.current_phase(), None);
        assert_eq!(machine.destinations(TestState::Menu), &[TestState::Walk]);
    }
}
