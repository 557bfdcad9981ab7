//! Transition and machine errors.

use crate::core::State;
use thiserror::Error;

/// Rejections from the transition gate.
///
/// Every variant points at a bug in the graph wiring or in the requesting
/// state's logic. None of them changes the machine's current state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError<S: State> {
    #[error("State {state:?} cannot transition to itself")]
    SelfTransition { state: S },

    #[error("Transition requested by {from:?} but the current state is {current:?}")]
    StaleSource { from: S, current: S },

    #[error("{to:?} is not a declared destination of {from:?}")]
    IllegalTransition { from: S, to: S },

    #[error("Transition {from:?} -> {to:?} rejected while moving to {pending:?}")]
    TransitionPending { from: S, to: S, pending: S },
}

/// Result type returned by state hooks that may request transitions.
pub type StateResult<S> = Result<(), TransitionError<S>>;

/// Errors surfaced by [`StateMachine`](super::StateMachine) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MachineError<S: State> {
    #[error("State machine has not been started")]
    NotStarted,

    #[error("State machine was already started")]
    AlreadyStarted,

    #[error(transparent)]
    Transition(#[from] TransitionError<S>),

    #[error("State machine halted after: {0}")]
    Halted(TransitionError<S>),
}
