//! Machine bookkeeping shared by every state kind: the transition gate, the
//! outer commit phase, inputs, history and events.

use super::error::{StateResult, TransitionError};
use super::events::MachineEvent;
use crate::config::MachineConfig;
use crate::core::{DestinationGraph, State, StateHistory, StateTransition};
use crate::input::{Input, InputQueue};
use chrono::Utc;
use std::collections::VecDeque;
use uuid::Uuid;

/// Outer phase of the machine itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Commit<S> {
    /// No transition in flight.
    Idle,
    /// Gate passed; the outgoing state's exit hook has not run yet.
    Approved { from: S, to: S },
    /// Outgoing state is leaving; `to` becomes current once it is done.
    PendingExit { from: S, to: S },
}

impl<S: Copy> Commit<S> {
    pub(crate) fn destination(&self) -> Option<S> {
        match self {
            Self::Idle => None,
            Self::Approved { to, .. } | Self::PendingExit { to, .. } => Some(*to),
        }
    }
}

pub(crate) struct MachineCore<S: State, E: Input> {
    pub(crate) id: Uuid,
    pub(crate) graph: DestinationGraph<S>,
    pub(crate) current: Option<S>,
    pub(crate) commit: Commit<S>,
    pub(crate) inputs: InputQueue<E>,
    pub(crate) history: StateHistory<S>,
    pub(crate) events: VecDeque<MachineEvent<S>>,
    pub(crate) tick: u64,
    pub(crate) config: MachineConfig,
}

impl<S: State, E: Input> MachineCore<S, E> {
    pub(crate) fn new(graph: DestinationGraph<S>, config: MachineConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            graph,
            current: None,
            commit: Commit::Idle,
            inputs: InputQueue::with_capacity(config.input_capacity),
            history: StateHistory::new(),
            events: VecDeque::new(),
            tick: 0,
            config,
        }
    }

    /// Validate `from -> to` against the machine, in order: self-transition,
    /// stale source, undeclared edge, transition already in flight.
    pub(crate) fn gate(&self, current: S, from: S, to: S) -> StateResult<S> {
        if from == to {
            return Err(TransitionError::SelfTransition { state: from });
        }
        if from != current {
            return Err(TransitionError::StaleSource { from, current });
        }
        if !self.graph.has_destination(&from, &to) {
            return Err(TransitionError::IllegalTransition { from, to });
        }
        if let Some(pending) = self.commit.destination() {
            return Err(TransitionError::TransitionPending { from, to, pending });
        }
        Ok(())
    }

    /// Run the gate and, on success, freeze the state-change inputs and mark
    /// the transition approved. The caller acts on the approval once the
    /// requesting hook has returned.
    pub(crate) fn approve(&mut self, current: S, from: S, to: S) -> StateResult<S> {
        if let Err(error) = self.gate(current, from, to) {
            tracing::warn!(machine = %self.id, tick = self.tick, error = %error, "Transition rejected");
            return Err(error);
        }

        self.inputs.set_state_change_inputs();
        self.commit = Commit::Approved { from, to };
        tracing::debug!(
            machine = %self.id,
            tick = self.tick,
            from = from.name(),
            to = to.name(),
            "Transition approved"
        );
        self.emit(MachineEvent::TransitionApproved { from, to });
        Ok(())
    }

    /// Record that `to` is now current.
    pub(crate) fn commit_swap(&mut self, from: S, to: S) {
        self.current = Some(to);
        self.commit = Commit::Idle;
        self.history = self
            .history
            .record(StateTransition {
                from,
                to,
                tick: self.tick,
                timestamp: Utc::now(),
            })
            .retain_last(self.config.history_limit);
        tracing::info!(
            machine = %self.id,
            tick = self.tick,
            from = from.name(),
            to = to.name(),
            "State changed"
        );
        self.emit(MachineEvent::Exited { from, to });
    }

    pub(crate) fn emit(&mut self, event: MachineEvent<S>) {
        let limit = self.config.event_limit;
        if limit == 0 {
            return;
        }
        while self.events.len() >= limit {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }
}
