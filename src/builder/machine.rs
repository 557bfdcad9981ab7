//! Builder for constructing state machines.

use crate::builder::error::BuildError;
use crate::config::MachineConfig;
use crate::core::{DestinationGraph, State};
use crate::input::Input;
use crate::machine::{StateLogic, StateMachine, StateSlot, TransitionalLogic};
use std::collections::HashMap;
use stillwater::validation::Validation;

/// Builder for constructing state machines with a fluent API.
///
/// Each state is registered exactly once, together with its behaviour and
/// its allowed destinations. `build` checks the whole graph up front so a
/// wiring mistake fails at startup rather than on the first transition.
pub struct StateMachineBuilder<S: State, E: Input, V> {
    initial: Option<S>,
    graph: DestinationGraph<S>,
    slots: HashMap<S, StateSlot<S, E, V>>,
    duplicates: Vec<S>,
    config: MachineConfig,
}

impl<S: State, E: Input, V> StateMachineBuilder<S, E, V> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            initial: None,
            graph: DestinationGraph::new(),
            slots: HashMap::new(),
            duplicates: Vec::new(),
            config: MachineConfig::default(),
        }
    }

    /// Set the initial state (required).
    pub fn initial(mut self, state: S) -> Self {
        self.initial = Some(state);
        self
    }

    pub fn config(mut self, config: MachineConfig) -> Self {
        self.config = config;
        self
    }

    /// Register an instant state.
    pub fn state<L, I>(self, state: S, logic: L, destinations: I) -> Self
    where
        L: StateLogic<S, E, V> + 'static,
        I: IntoIterator<Item = S>,
    {
        self.register(state, StateSlot::Instant(Box::new(logic)), destinations)
    }

    /// Register a transitional (three-phase) state.
    pub fn transitional<L, I>(self, state: S, logic: L, destinations: I) -> Self
    where
        L: TransitionalLogic<S, E, V> + 'static,
        I: IntoIterator<Item = S>,
    {
        self.register(state, StateSlot::transitional(Box::new(logic)), destinations)
    }

    fn register<I>(mut self, state: S, slot: StateSlot<S, E, V>, destinations: I) -> Self
    where
        I: IntoIterator<Item = S>,
    {
        if self.graph.declare(state, destinations) {
            self.slots.insert(state, slot);
        } else {
            self.duplicates.push(state);
        }
        self
    }

    /// Build the state machine.
    /// Returns an error if required fields are missing or the graph is
    /// inconsistent; graph problems are reported all at once.
    pub fn build(self) -> Result<StateMachine<S, E, V>, BuildError> {
        let initial = self.initial.ok_or(BuildError::MissingInitialState)?;

        if self.slots.is_empty() {
            return Err(BuildError::NoStates);
        }

        if let Some(state) = self.duplicates.first() {
            return Err(BuildError::DuplicateState {
                state: state.name().to_string(),
            });
        }

        if let Validation::Failure(issues) = self.graph.validate(&initial) {
            return Err(BuildError::InvalidGraph {
                issues: issues.iter().cloned().collect(),
            });
        }

        tracing::debug!(
            initial = initial.name(),
            states = self.graph.len(),
            "State machine built"
        );
        Ok(StateMachine::from_parts(
            initial,
            self.graph,
            self.slots,
            self.config,
        ))
    }
}

impl<S: State, E: Input, V> Default for StateMachineBuilder<S, E, V> {
    fn default() -> Self {
        Self::new()
    }
}
