//! Per-state behaviour.
//!
//! A state's behaviour is one of two kinds. [`StateLogic`] states leave
//! instantly: the machine swaps to the destination inside the same call that
//! approved the transition. [`TransitionalLogic`] states wait on readiness
//! predicates at both edges of their lifetime, which is how exit and entry
//! animations gate the swap.

use super::context::StateContext;
use super::error::StateResult;
use crate::core::{Phase, State};
use crate::input::Input;

/// Hooks for a state whose entry and exit are immediate.
pub trait StateLogic<S: State, E: Input, V> {
    /// Called once each time the state becomes current.
    ///
    /// A transition requested here is acted on within the same call. Two
    /// instant states whose `enter` hooks always request each other never
    /// let that call return.
    fn enter(&mut self, _cx: &mut StateContext<'_, S, E, V>) {}

    /// Called once per tick while the state is current.
    fn update(&mut self, cx: &mut StateContext<'_, S, E, V>) -> StateResult<S>;

    /// Called once when a transition away from this state is approved.
    fn exit(&mut self, _cx: &mut StateContext<'_, S, E, V>) {}
}

/// Hooks for a state with a TransitionIn / Update / TransitionOut lifecycle.
///
/// The machine owns the phase. `enter` runs and the phase becomes
/// `TransitionIn`; `transition_in` is polled once per tick until it returns
/// true; `update` then runs once per tick until a transition is approved,
/// which runs `exit` and moves the phase to `TransitionOut`; `transition_out`
/// is polled once per tick until it returns true, at which point the machine
/// enters the destination.
///
/// A predicate that never returns true stalls the machine. No timeout is
/// applied.
pub trait TransitionalLogic<S: State, E: Input, V> {
    /// Runs before the first `transition_in` poll. A transition requested
    /// here starts this state's exit right away.
    fn enter(&mut self, _cx: &mut StateContext<'_, S, E, V>) {}

    /// Readiness of the entry phase, e.g. "open animation finished".
    fn transition_in(&mut self, _cx: &mut StateContext<'_, S, E, V>) -> bool {
        true
    }

    fn update(&mut self, cx: &mut StateContext<'_, S, E, V>) -> StateResult<S>;

    fn exit(&mut self, _cx: &mut StateContext<'_, S, E, V>) {}

    /// Readiness of the exit phase, e.g. "close animation finished".
    fn transition_out(&mut self, _cx: &mut StateContext<'_, S, E, V>) -> bool {
        true
    }
}

pub(crate) enum StateSlot<S: State, E: Input, V> {
    Instant(Box<dyn StateLogic<S, E, V>>),
    Transitional {
        logic: Box<dyn TransitionalLogic<S, E, V>>,
        phase: Phase,
        /// Tick on which `phase` was entered
        since: u64,
        stall_reported: bool,
    },
}

impl<S: State, E: Input, V> StateSlot<S, E, V> {
    pub(crate) fn transitional(logic: Box<dyn TransitionalLogic<S, E, V>>) -> Self {
        Self::Transitional {
            logic,
            phase: Phase::TransitionIn,
            since: 0,
            stall_reported: false,
        }
    }

    /// `None` for instant states, which have no phases.
    pub(crate) fn phase(&self) -> Option<Phase> {
        match self {
            Self::Instant(_) => None,
            Self::Transitional { phase, .. } => Some(*phase),
        }
    }
}
