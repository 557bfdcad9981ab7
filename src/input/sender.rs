//! Producer handle for inputs raised outside the tick loop.

use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;

/// The queue that owned the other end of the channel was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Input queue has been dropped")]
pub struct InputClosed;

/// Cloneable, thread-safe handle that posts inputs into an
/// [`InputQueue`](super::InputQueue).
///
/// Posted inputs sit in the queue's inbox until the machine's next update,
/// which moves them into the write buffer just before swapping. They are
/// therefore readable during that update, exactly like inputs added with
/// `add_input` before it.
#[derive(Debug)]
pub struct InputSender<E> {
    outlet: UnboundedSender<E>,
}

impl<E> Clone for InputSender<E> {
    fn clone(&self) -> Self {
        Self {
            outlet: self.outlet.clone(),
        }
    }
}

impl<E> InputSender<E> {
    pub(crate) fn new(outlet: UnboundedSender<E>) -> Self {
        Self { outlet }
    }

    pub fn send(&self, input: E) -> Result<(), InputClosed> {
        self.outlet.send(input).map_err(|_| InputClosed)
    }

    pub fn is_closed(&self) -> bool {
        self.outlet.is_closed()
    }
}
