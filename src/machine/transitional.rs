//! Phase driving and the deferred commit.
//!
//! A transitional state is polled according to its phase each tick. When a
//! transition away from it is approved the machine runs its exit hook and
//! parks in `Commit::PendingExit`; the destination only becomes current once
//! `transition_out` reports completion or the host calls
//! [`StateMachine::state_successfully_exit`] itself.

use super::context::StateContext;
use super::engine::Commit;
use super::error::StateResult;
use super::events::MachineEvent;
use super::logic::StateSlot;
use super::StateMachine;
use crate::core::{Phase, State};
use crate::input::Input;

impl<S: State, E: Input, V> StateMachine<S, E, V> {
    /// Complete a pending exit: the outgoing state is reset for its next
    /// entry, the destination becomes current and is entered.
    ///
    /// Called automatically when `transition_out` returns true. Returns the
    /// newly current state, or `None` if no exit was pending.
    pub fn state_successfully_exit(&mut self, view: &mut V) -> Option<S> {
        let entered = self.complete_exit(view)?;
        self.settle(view);
        Some(entered)
    }

    /// Run one tick of `current` according to its kind and phase.
    pub(super) fn drive(&mut self, current: S, view: &mut V) -> StateResult<S> {
        let tick = self.core.tick;
        let stall_limit = self.core.config.stall_warning_ticks;
        let Some(slot) = self.slots.get_mut(&current) else {
            return Ok(());
        };

        let mut cx = StateContext::new(&mut self.core, view, current);
        let mut fully_entered = false;
        let mut exited = false;
        let mut stalled = None;

        match slot {
            StateSlot::Instant(logic) => logic.update(&mut cx)?,
            StateSlot::Transitional {
                logic, phase, since, ..
            } => match *phase {
                Phase::TransitionIn => {
                    if logic.transition_in(&mut cx) {
                        *phase = Phase::Update;
                        *since = tick;
                        fully_entered = true;
                    }
                }
                Phase::Update => logic.update(&mut cx)?,
                Phase::TransitionOut => {
                    if logic.transition_out(&mut cx) {
                        *phase = Phase::TransitionIn;
                        *since = tick;
                        exited = true;
                    }
                }
            },
        }

        if let StateSlot::Transitional {
            phase,
            since,
            stall_reported,
            ..
        } = slot
        {
            if let Some(limit) = stall_limit {
                let waited = tick.saturating_sub(*since);
                if phase.is_gated() && !*stall_reported && waited >= limit {
                    *stall_reported = true;
                    stalled = Some((*phase, waited));
                }
            }
        }

        if let Some((phase, ticks)) = stalled {
            tracing::warn!(
                machine = %self.core.id,
                state = current.name(),
                phase = %phase,
                ticks,
                "State is still waiting on its transition phase"
            );
            self.core.emit(MachineEvent::Stalled {
                state: current,
                phase,
                ticks,
            });
        }
        if fully_entered {
            tracing::debug!(machine = %self.core.id, tick, state = current.name(), "State fully entered");
            self.core.emit(MachineEvent::FullyEntered { state: current });
        }
        if exited {
            self.complete_exit(view);
        }
        Ok(())
    }

    /// Run the outgoing state's exit for an approved transition.
    ///
    /// Returns true when the exit finished synchronously (instant states) and
    /// the swap can be committed right away.
    pub(super) fn begin_exit(&mut self, from: S, to: S, view: &mut V) -> bool {
        let tick = self.core.tick;
        self.core.commit = Commit::PendingExit { from, to };
        let Some(slot) = self.slots.get_mut(&from) else {
            return true;
        };

        let mut cx = StateContext::new(&mut self.core, view, from);
        match slot {
            StateSlot::Instant(logic) => {
                logic.exit(&mut cx);
                true
            }
            StateSlot::Transitional {
                logic,
                phase,
                since,
                stall_reported,
            } => {
                *phase = Phase::TransitionOut;
                *since = tick;
                *stall_reported = false;
                logic.exit(&mut cx);
                false
            }
        }
    }

    /// Swap to the pending destination and enter it. Does not act on requests
    /// the destination makes while entering; callers settle afterwards.
    pub(super) fn complete_exit(&mut self, view: &mut V) -> Option<S> {
        let Commit::PendingExit { from, to } = self.core.commit else {
            return None;
        };

        if let Some(StateSlot::Transitional { phase, .. }) = self.slots.get_mut(&from) {
            *phase = Phase::TransitionIn;
        }
        self.core.commit_swap(from, to);
        self.enter_state(to, view);
        Some(to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::StateMachineBuilder;
    use crate::config::MachineConfig;
    use crate::machine::{MachineError, StateLogic, TransitionError, TransitionalLogic};
    use crate::state_enum;

    state_enum! {
        enum TestState {
            Start,
            Menu,
            Walk,
        }
    }

    #[derive(Clone, Debug, PartialEq)]
    enum TestInput {
        Go,
    }

    impl Input for TestInput {
        type Kind = ();

        fn kind(&self) -> Self::Kind {}
    }

    /// Stand-in for a UI panel whose animations the test finishes by hand.
    #[derive(Default)]
    struct Panels {
        menu_ready: bool,
        menu_open: bool,
        exits: usize,
    }

    struct Start;

    impl StateLogic<TestState, TestInput, Panels> for Start {
        fn update(
            &mut self,
            cx: &mut StateContext<'_, TestState, TestInput, Panels>,
        ) -> StateResult<TestState> {
            if cx.inputs().has_input(()) {
                cx.request_transition(TestState::Menu)?;
            }
            Ok(())
        }
    }

    struct Menu;

    impl TransitionalLogic<TestState, TestInput, Panels> for Menu {
        fn enter(&mut self, cx: &mut StateContext<'_, TestState, TestInput, Panels>) {
            let panels = cx.view_mut();
            panels.menu_open = true;
            panels.menu_ready = false;
        }

        fn transition_in(&mut self, cx: &mut StateContext<'_, TestState, TestInput, Panels>) -> bool {
            cx.view().menu_ready
        }

        fn update(
            &mut self,
            cx: &mut StateContext<'_, TestState, TestInput, Panels>,
        ) -> StateResult<TestState> {
            if cx.inputs().has_input(()) {
                cx.request_transition(TestState::Walk)?;
            }
            Ok(())
        }

        fn exit(&mut self, cx: &mut StateContext<'_, TestState, TestInput, Panels>) {
            let panels = cx.view_mut();
            panels.menu_open = false;
            panels.menu_ready = false;
            panels.exits += 1;
        }

        fn transition_out(
            &mut self,
            cx: &mut StateContext<'_, TestState, TestInput, Panels>,
        ) -> bool {
            cx.view().menu_ready
        }
    }

    /// Always ready at both edges.
    struct Walk;

    impl TransitionalLogic<TestState, TestInput, Panels> for Walk {
        fn update(
            &mut self,
            cx: &mut StateContext<'_, TestState, TestInput, Panels>,
        ) -> StateResult<TestState> {
            if cx.inputs().has_input(()) {
                cx.request_transition(TestState::Menu)?;
            }
            Ok(())
        }
    }

    fn machine(config: MachineConfig) -> StateMachine<TestState, TestInput, Panels> {
        StateMachineBuilder::new()
            .config(config)
            .initial(TestState::Start)
            .state(TestState::Start, Start, [TestState::Menu])
            .transitional(TestState::Menu, Menu, [TestState::Walk])
            .transitional(TestState::Walk, Walk, [TestState::Menu])
            .build()
            .unwrap()
    }

    fn in_menu(panels: &mut Panels) -> StateMachine<TestState, TestInput, Panels> {
        let mut machine = machine(MachineConfig::default());
        machine.start(panels).unwrap();
        machine.add_input(TestInput::Go);
        machine.update(panels).unwrap();
        machine
    }

    #[test]
    fn entering_transitional_state_starts_in_transition_in() {
        let mut panels = Panels::default();
        let machine = in_menu(&mut panels);

        assert_eq!(machine.current_state(), Some(TestState::Menu));
        assert_eq!(machine.current_phase(), Some(Phase::TransitionIn));
        assert!(panels.menu_open);
    }

    #[test]
    fn transition_in_waits_for_readiness() {
        let mut panels = Panels::default();
        let mut machine = in_menu(&mut panels);

        machine.update(&mut panels).unwrap();
        machine.update(&mut panels).unwrap();
        assert_eq!(machine.current_phase(), Some(Phase::TransitionIn));

        panels.menu_ready = true;
        machine.update(&mut panels).unwrap();
        assert_eq!(machine.current_phase(), Some(Phase::Update));
        assert!(machine
            .drain_events()
            .contains(&MachineEvent::FullyEntered {
                state: TestState::Menu
            }));
    }

    #[test]
    fn swap_is_deferred_until_transition_out_completes() {
        let mut panels = Panels::default();
        let mut machine = in_menu(&mut panels);
        panels.menu_ready = true;
        machine.update(&mut panels).unwrap();

        machine.add_input(TestInput::Go);
        machine.update(&mut panels).unwrap();
        assert_eq!(machine.current_state(), Some(TestState::Menu));
        assert_eq!(machine.pending_destination(), Some(TestState::Walk));
        assert_eq!(machine.current_phase(), Some(Phase::TransitionOut));
        assert_eq!(panels.exits, 1);

        machine.update(&mut panels).unwrap();
        assert_eq!(machine.current_state(), Some(TestState::Menu));

        panels.menu_ready = true;
        machine.update(&mut panels).unwrap();
        assert_eq!(machine.current_state(), Some(TestState::Walk));
        assert_eq!(machine.pending_destination(), None);
        assert_eq!(machine.phase(TestState::Menu), Some(Phase::TransitionIn));
        assert_eq!(machine.current_phase(), Some(Phase::TransitionIn));
    }

    #[test]
    fn always_ready_state_changes_phase_within_one_tick() {
        let mut panels = Panels::default();
        let mut machine = in_menu(&mut panels);
        panels.menu_ready = true;
        machine.update(&mut panels).unwrap();
        machine.add_input(TestInput::Go);
        machine.update(&mut panels).unwrap();
        panels.menu_ready = true;
        machine.update(&mut panels).unwrap();
        assert_eq!(machine.current_phase(), Some(Phase::TransitionIn));

        machine.update(&mut panels).unwrap();
        assert_eq!(machine.current_phase(), Some(Phase::Update));

        machine.add_input(TestInput::Go);
        machine.update(&mut panels).unwrap();
        assert_eq!(machine.current_phase(), Some(Phase::TransitionOut));

        machine.update(&mut panels).unwrap();
        assert_eq!(machine.current_state(), Some(TestState::Menu));
    }

    #[test]
    fn host_can_confirm_exit_directly() {
        let mut panels = Panels::default();
        let mut machine = in_menu(&mut panels);
        panels.menu_ready = true;
        machine.update(&mut panels).unwrap();

        machine
            .change_state(TestState::Menu, TestState::Walk, &mut panels)
            .unwrap();
        assert_eq!(machine.current_state(), Some(TestState::Menu));

        assert_eq!(
            machine.state_successfully_exit(&mut panels),
            Some(TestState::Walk)
        );
        assert_eq!(machine.current_state(), Some(TestState::Walk));
        assert_eq!(machine.state_successfully_exit(&mut panels), None);
    }

    #[test]
    fn request_during_pending_exit_is_rejected() {
        let mut panels = Panels::default();
        let mut machine = in_menu(&mut panels);
        panels.menu_ready = true;
        machine.update(&mut panels).unwrap();
        machine
            .change_state(TestState::Menu, TestState::Walk, &mut panels)
            .unwrap();

        assert_eq!(
            machine.change_state(TestState::Menu, TestState::Walk, &mut panels),
            Err(MachineError::Transition(TransitionError::TransitionPending {
                from: TestState::Menu,
                to: TestState::Walk,
                pending: TestState::Walk
            }))
        );
        assert_eq!(panels.exits, 1);
    }

    fn stalls(machine: &mut StateMachine<TestState, TestInput, Panels>) -> Vec<(Phase, u64)> {
        machine
            .drain_events()
            .into_iter()
            .filter_map(|event| match event {
                MachineEvent::Stalled {
                    state: TestState::Menu,
                    phase,
                    ticks,
                } => Some((phase, ticks)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn stall_is_reported_once_per_phase_entry() {
        let mut panels = Panels::default();
        let mut machine = machine(MachineConfig {
            stall_warning_ticks: Some(2),
            ..MachineConfig::default()
        });
        machine.start(&mut panels).unwrap();
        machine.add_input(TestInput::Go);
        machine.update(&mut panels).unwrap();
        machine.drain_events();

        machine.update(&mut panels).unwrap();
        assert!(stalls(&mut machine).is_empty());
        machine.update(&mut panels).unwrap();
        assert_eq!(stalls(&mut machine), vec![(Phase::TransitionIn, 2)]);

        for _ in 0..5 {
            machine.update(&mut panels).unwrap();
        }
        assert!(stalls(&mut machine).is_empty());
        assert_eq!(machine.current_phase(), Some(Phase::TransitionIn));
        assert_eq!(machine.current_state(), Some(TestState::Menu));
        assert!(!machine.is_halted());

        panels.menu_ready = true;
        machine.update(&mut panels).unwrap();
        machine.add_input(TestInput::Go);
        machine.update(&mut panels).unwrap();
        assert_eq!(machine.current_phase(), Some(Phase::TransitionOut));

        // The close animation never finishes, so the exit phase stalls too.
        for _ in 0..6 {
            machine.update(&mut panels).unwrap();
        }
        assert_eq!(stalls(&mut machine), vec![(Phase::TransitionOut, 2)]);
        assert_eq!(machine.pending_destination(), Some(TestState::Walk));
    }

    #[test]
    fn stall_reporting_can_be_disabled() {
        let mut panels = Panels::default();
        let mut machine = machine(MachineConfig {
            stall_warning_ticks: None,
            ..MachineConfig::default()
        });
        machine.start(&mut panels).unwrap();
        machine.add_input(TestInput::Go);
        machine.update(&mut panels).unwrap();

        for _ in 0..10 {
            machine.update(&mut panels).unwrap();
        }
        assert!(stalls(&mut machine).is_empty());
    }
}
