//! What a state hook can see and do.

use super::engine::MachineCore;
use super::error::StateResult;
use crate::core::State;
use crate::input::{Input, InputQueue, InputSender};

/// Borrowed view of the machine handed to every hook.
///
/// `this` is the state whose hook is running; transition requests are always
/// made on its behalf, so the gate can tell a request from the current state
/// apart from a stale one.
pub struct StateContext<'a, S: State, E: Input, V> {
    core: &'a mut MachineCore<S, E>,
    view: &'a mut V,
    this: S,
}

impl<'a, S: State, E: Input, V> StateContext<'a, S, E, V> {
    pub(crate) fn new(core: &'a mut MachineCore<S, E>, view: &'a mut V, this: S) -> Self {
        Self { core, view, this }
    }

    /// The state this hook belongs to.
    pub fn this(&self) -> S {
        self.this
    }

    pub fn tick(&self) -> u64 {
        self.core.tick
    }

    /// The host application's view (UI panels, loaders, agents).
    pub fn view(&self) -> &V {
        &*self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut *self.view
    }

    /// Inputs recorded during the previous tick, plus the state-change
    /// snapshot of the last approved transition.
    pub fn inputs(&self) -> &InputQueue<E> {
        &self.core.inputs
    }

    /// Record an input. It is readable on the next tick, never this one.
    pub fn add_input(&mut self, input: E) {
        self.core.inputs.add_input(input);
    }

    pub fn input_sender(&self) -> InputSender<E> {
        self.core.inputs.sender()
    }

    pub fn has_destination(&self, to: S) -> bool {
        self.core.graph.has_destination(&self.this, &to)
    }

    pub fn destinations(&self) -> &[S] {
        self.core.graph.destinations(&self.this)
    }

    /// Ask the machine to move from this state to `to`.
    ///
    /// The request is validated immediately. On success the machine runs this
    /// state's exit once the current hook returns; the destination becomes
    /// current right away for instant states, or after `transition_out`
    /// reports completion for transitional ones.
    pub fn request_transition(&mut self, to: S) -> StateResult<S> {
        // Only reachable once started; an unstarted machine never runs hooks.
        let current = self.core.current.unwrap_or(self.this);
        self.core.approve(current, self.this, to)
    }
}
