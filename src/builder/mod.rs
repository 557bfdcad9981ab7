//! Builder API for ergonomic state machine construction.
//!
//! This module provides the fluent [`StateMachineBuilder`] that wires the
//! destination graph and per-state behaviour, and the [`state_enum!`] macro
//! for state ids.
//!
//! [`state_enum!`]: crate::state_enum

pub mod error;
pub mod machine;
pub mod macros;

pub use error::BuildError;
pub use machine::StateMachineBuilder;
