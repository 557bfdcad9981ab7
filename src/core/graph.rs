//! Directed destination graph.
//!
//! Each declared state owns the set of states it may transition to. The graph
//! is allowed to be disconnected and to contain cycles
//! (`Dialogue -> Walk -> Dialogue`); the only structural rules are that a
//! state never lists itself and that every listed destination is itself
//! declared.

use super::state::State;
use std::collections::HashMap;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// A structural problem found while validating a graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphIssue {
    #[error("State '{state}' is referenced by '{referenced_by}' but was never configured")]
    UnconfiguredState {
        state: String,
        referenced_by: String,
    },

    #[error("State '{state}' lists itself as a destination")]
    SelfDestination { state: String },

    #[error("Initial state '{state}' was never configured")]
    UnknownInitialState { state: String },
}

/// Per-state sets of allowed destinations.
#[derive(Clone, Debug)]
pub struct DestinationGraph<S: State> {
    order: Vec<S>,
    edges: HashMap<S, Vec<S>>,
}

impl<S: State> Default for DestinationGraph<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> DestinationGraph<S> {
    pub fn new() -> Self {
        Self {
            order: Vec::new(),
            edges: HashMap::new(),
        }
    }

    /// Declare `state` with its destinations. Duplicate destinations are
    /// collapsed, keeping first-seen order.
    ///
    /// Returns `false` (and leaves the graph untouched) if `state` was
    /// already declared.
    pub fn declare<I>(&mut self, state: S, destinations: I) -> bool
    where
        I: IntoIterator<Item = S>,
    {
        if self.edges.contains_key(&state) {
            return false;
        }

        let mut unique = Vec::new();
        for destination in destinations {
            if !unique.contains(&destination) {
                unique.push(destination);
            }
        }

        self.order.push(state);
        self.edges.insert(state, unique);
        true
    }

    pub fn is_declared(&self, state: &S) -> bool {
        self.edges.contains_key(state)
    }

    /// True iff `to` is a declared destination of `from`.
    pub fn has_destination(&self, from: &S, to: &S) -> bool {
        self.edges
            .get(from)
            .is_some_and(|destinations| destinations.contains(to))
    }

    /// Destinations of `from`, in declaration order. Empty for undeclared
    /// states.
    pub fn destinations(&self, from: &S) -> &[S] {
        self.edges.get(from).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Declared states in declaration order.
    pub fn states(&self) -> &[S] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Check the whole graph, accumulating every issue instead of stopping at
    /// the first one.
    pub fn validate(&self, initial: &S) -> Validation<(), NonEmptyVec<GraphIssue>> {
        let mut checks: Vec<Validation<(), NonEmptyVec<GraphIssue>>> = Vec::new();

        checks.push(if self.is_declared(initial) {
            Validation::success(())
        } else {
            Validation::fail(GraphIssue::UnknownInitialState {
                state: initial.name().to_string(),
            })
        });

        for state in &self.order {
            for destination in self.destinations(state) {
                if destination == state {
                    checks.push(Validation::fail(GraphIssue::SelfDestination {
                        state: state.name().to_string(),
                    }));
                } else if !self.is_declared(destination) {
                    checks.push(Validation::fail(GraphIssue::UnconfiguredState {
                        state: destination.name().to_string(),
                        referenced_by: state.name().to_string(),
                    }));
                }
            }
        }

        Validation::all_vec(checks).map(|_| ())
    }
}
