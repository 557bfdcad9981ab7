//! Lifecycle phases of a transitional state.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a transitional state is in its enter/run/leave cycle.
///
/// Every entry starts at [`Phase::TransitionIn`]. The machine moves the state
/// to [`Phase::Update`] once its `transition_in` readiness predicate holds, to
/// [`Phase::TransitionOut`] when a transition away is approved, and back to
/// [`Phase::TransitionIn`] once `transition_out` reports completion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for the entry animation (or other readiness signal).
    #[default]
    TransitionIn,
    /// Fully active; the state body runs every tick.
    Update,
    /// Waiting for the exit animation before the machine swaps states.
    TransitionOut,
}

impl Phase {
    /// True for the two phases that wait on an external readiness signal.
    pub fn is_gated(&self) -> bool {
        matches!(self, Self::TransitionIn | Self::TransitionOut)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::TransitionIn => write!(f, "transition-in"),
            Phase::Update => write!(f, "update"),
            Phase::TransitionOut => write!(f, "transition-out"),
        }
    }
}
