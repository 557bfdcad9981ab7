//! Lifecycle notifications recorded by the machine.

use crate::core::{Phase, State};
use serde::{Deserialize, Serialize};

/// Something the host may want to react to (debug HUDs, analytics, UI).
///
/// Events are appended in the order they happen and kept until the host calls
/// [`StateMachine::drain_events`](super::StateMachine::drain_events). They
/// carry no control flow: dropping them changes nothing in the machine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub enum MachineEvent<S: State> {
    /// The initial state was entered by `start`.
    Started { state: S },
    /// The gate accepted a request; the outgoing state's exit begins.
    TransitionApproved { from: S, to: S },
    /// The outgoing state finished leaving and `to` became current.
    Exited { from: S, to: S },
    /// `state` ran its entry hook.
    Entered { state: S },
    /// `state` finished its entry phase and is fully active.
    FullyEntered { state: S },
    /// `state` has spent `ticks` ticks in a gated `phase`. Recorded once per
    /// phase entry, when `stall_warning_ticks` is reached.
    Stalled { state: S, phase: Phase, ticks: u64 },
}

impl<S: State> MachineEvent<S> {
    /// The state this event is primarily about.
    pub fn subject(&self) -> S {
        match self {
            Self::Started { state }
            | Self::Entered { state }
            | Self::FullyEntered { state }
            | Self::Stalled { state, .. } => *state,
            Self::TransitionApproved { from, .. } | Self::Exited { from, .. } => *from,
        }
    }
}
