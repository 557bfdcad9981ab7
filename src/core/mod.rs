//! Core state machine types.
//!
//! This module contains the engine-independent building blocks:
//! - State identities via the `State` trait
//! - The destination graph and its validation
//! - Lifecycle phases of transitional states
//! - Immutable transition history

mod graph;
mod history;
mod phase;
mod state;

pub use graph::{DestinationGraph, GraphIssue};
pub use history::{StateHistory, StateTransition};
pub use phase::Phase;
pub use state::State;
