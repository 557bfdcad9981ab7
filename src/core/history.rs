//! Committed transition history.
//!
//! The machine records one [`StateTransition`] every time the current state
//! actually changes. For transitional states that is the moment the outgoing
//! state finishes its exit phase, not the moment the request was approved.

use super::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single committed transition.
///
/// # Example
///
/// ```rust
/// use phaseflow::core::StateTransition;
/// use phaseflow::state_enum;
/// use chrono::Utc;
///
/// state_enum! {
///     enum Screen {
///         Title,
///         Playing,
///     }
/// }
///
/// let transition = StateTransition {
///     from: Screen::Title,
///     to: Screen::Playing,
///     tick: 12,
///     timestamp: Utc::now(),
/// };
/// assert_eq!(transition.tick, 12);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateTransition<S: State> {
    /// The state that was current before the swap
    pub from: S,
    /// The state that became current
    pub to: S,
    /// Machine tick on which the swap happened
    pub tick: u64,
    /// Wall-clock time of the swap
    pub timestamp: DateTime<Utc>,
}

/// Ordered history of committed transitions.
///
/// History is immutable - `record` returns a new history with the transition
/// appended. The machine keeps only the most recent entries (see
/// [`StateHistory::retain_last`]).
///
/// # Example
///
/// ```rust
/// use phaseflow::core::{StateHistory, StateTransition};
/// use phaseflow::state_enum;
/// use chrono::Utc;
///
/// state_enum! {
///     enum Step {
///         Start,
///         Middle,
///         End,
///     }
/// }
///
/// let history = StateHistory::new()
///     .record(StateTransition { from: Step::Start, to: Step::Middle, tick: 1, timestamp: Utc::now() })
///     .record(StateTransition { from: Step::Middle, to: Step::End, tick: 4, timestamp: Utc::now() });
///
/// assert_eq!(history.get_path(), vec![&Step::Start, &Step::Middle, &Step::End]);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateHistory<S: State> {
    transitions: Vec<StateTransition<S>>,
}

impl<S: State> Default for StateHistory<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> StateHistory<S> {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }

    /// Record a transition, returning a new history.
    ///
    /// This does not modify the original history.
    pub fn record(&self, transition: StateTransition<S>) -> Self {
        let mut transitions = self.transitions.clone();
        transitions.push(transition);
        Self { transitions }
    }

    /// Keep only the `limit` most recent transitions. A limit of zero keeps
    /// everything.
    pub fn retain_last(mut self, limit: usize) -> Self {
        if limit > 0 && self.transitions.len() > limit {
            let excess = self.transitions.len() - limit;
            self.transitions.drain(..excess);
        }
        self
    }

    /// Get the path of states traversed: the `from` of the oldest retained
    /// transition, then the `to` of each transition.
    pub fn get_path(&self) -> Vec<&S> {
        let mut path = Vec::new();
        if let Some(first) = self.transitions.first() {
            path.push(&first.from);
        }
        for transition in &self.transitions {
            path.push(&transition.to);
        }
        path
    }

    /// Wall-clock duration from the first to the last retained transition.
    ///
    /// Returns `None` if there are no transitions.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.first(), self.transitions.last()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    /// Most recent transition.
    pub fn last(&self) -> Option<&StateTransition<S>> {
        self.transitions.last()
    }

    /// Get all retained transitions, oldest first.
    pub fn transitions(&self) -> &[StateTransition<S>] {
        &self.transitions
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}
