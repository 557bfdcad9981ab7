//! Double-buffered input queue.

use super::sender::InputSender;
use std::fmt::Debug;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// A tagged input value.
///
/// Inputs are usually an enum with one variant per kind of event; `Kind` is a
/// fieldless mirror of that enum used to filter queries without needing a
/// payload to compare against.
///
/// # Example
///
/// ```rust
/// use phaseflow::input::Input;
///
/// #[derive(Clone, Debug, PartialEq)]
/// enum Event {
///     Confirm,
///     Typed(String),
/// }
///
/// #[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// enum EventKind {
///     Confirm,
///     Typed,
/// }
///
/// impl Input for Event {
///     type Kind = EventKind;
///
///     fn kind(&self) -> EventKind {
///         match self {
///             Self::Confirm => EventKind::Confirm,
///             Self::Typed(_) => EventKind::Typed,
///         }
///     }
/// }
/// ```
pub trait Input: Clone + Debug + Send + 'static {
    type Kind: Copy + Eq + Debug;

    fn kind(&self) -> Self::Kind;
}

/// Two rotating buffers plus a frozen state-change snapshot.
///
/// Writes always land in the write buffer. Queries read the other buffer,
/// which holds what was written during the previous tick. [`swap_input`]
/// flips the two and clears the new write buffer, so an input is visible for
/// exactly one tick: the one after it was added.
///
/// [`swap_input`]: InputQueue::swap_input
#[derive(Debug)]
pub struct InputQueue<E: Input> {
    buffers: [Vec<E>; 2],
    write: usize,
    state_change: Vec<E>,
    inbox: UnboundedReceiver<E>,
    outlet: UnboundedSender<E>,
}

impl<E: Input> Default for InputQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Input> InputQueue<E> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create a queue whose buffers start with room for `capacity` inputs.
    pub fn with_capacity(capacity: usize) -> Self {
        let (outlet, inbox) = mpsc::unbounded_channel();
        Self {
            buffers: [Vec::with_capacity(capacity), Vec::with_capacity(capacity)],
            write: 0,
            state_change: Vec::new(),
            inbox,
            outlet,
        }
    }

    fn read(&self) -> usize {
        1 - self.write
    }

    /// Append `input` to the write buffer. It becomes visible after the next
    /// [`swap_input`](Self::swap_input).
    pub fn add_input(&mut self, input: E) {
        self.buffers[self.write].push(input);
    }

    /// Handle for producers that live outside the tick loop (other threads,
    /// async tasks). See [`drain_inbox`](Self::drain_inbox).
    pub fn sender(&self) -> InputSender<E> {
        InputSender::new(self.outlet.clone())
    }

    /// Move everything posted through [`InputSender`]s into the write buffer,
    /// in arrival order. Returns the number of inputs moved.
    pub fn drain_inbox(&mut self) -> usize {
        let mut moved = 0;
        while let Ok(input) = self.inbox.try_recv() {
            self.buffers[self.write].push(input);
            moved += 1;
        }
        moved
    }

    /// Rotate buffers: last tick's writes become readable and the buffer that
    /// was being read is cleared for new writes.
    pub fn swap_input(&mut self) {
        self.write = self.read();
        self.buffers[self.write].clear();
    }

    /// Replace the state-change snapshot with a copy of the read buffer.
    pub fn set_state_change_inputs(&mut self) {
        self.state_change.clear();
        self.state_change
            .extend(self.buffers[self.read()].iter().cloned());
    }

    /// Inputs readable this tick, in insertion order.
    pub fn current(&self) -> &[E] {
        &self.buffers[self.read()]
    }

    /// Inputs written so far this tick (not yet readable).
    pub fn pending(&self) -> &[E] {
        &self.buffers[self.write]
    }

    pub fn has_input(&self, kind: E::Kind) -> bool {
        self.current().iter().any(|input| input.kind() == kind)
    }

    pub fn first_input(&self, kind: E::Kind) -> Option<&E> {
        self.current().iter().find(|input| input.kind() == kind)
    }

    pub fn last_input(&self, kind: E::Kind) -> Option<&E> {
        self.current().iter().rev().find(|input| input.kind() == kind)
    }

    pub fn inputs(&self, kind: E::Kind) -> impl Iterator<Item = &E> {
        self.current().iter().filter(move |input| input.kind() == kind)
    }

    /// Snapshot taken when the most recent transition was approved.
    pub fn state_change_inputs(&self) -> &[E] {
        &self.state_change
    }

    pub fn has_state_change_input(&self, kind: E::Kind) -> bool {
        self.state_change.iter().any(|input| input.kind() == kind)
    }

    pub fn first_state_change_input(&self, kind: E::Kind) -> Option<&E> {
        self.state_change.iter().find(|input| input.kind() == kind)
    }

    pub fn last_state_change_input(&self, kind: E::Kind) -> Option<&E> {
        self.state_change
            .iter()
            .rev()
            .find(|input| input.kind() == kind)
    }
}
