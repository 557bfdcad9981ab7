//! Build errors for state machines.

use crate::core::GraphIssue;
use thiserror::Error;

/// Errors that can occur when building a state machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("Initial state not specified. Call .initial(state) before .build()")]
    MissingInitialState,

    #[error("No states defined. Add at least one with .state() or .transitional()")]
    NoStates,

    #[error("State '{state}' was configured more than once")]
    DuplicateState { state: String },

    #[error("Invalid state graph ({} issue(s)): {}", .issues.len(), describe(.issues))]
    InvalidGraph { issues: Vec<GraphIssue> },
}

fn describe(issues: &[GraphIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
