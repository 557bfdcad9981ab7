//! Input recording for tick-driven machines.
//!
//! Producers (UI callbacks, trigger volumes, async collaborators) record
//! inputs while a tick runs; states read the inputs recorded during the
//! previous tick. The double buffer keeps a state from reacting, in the same
//! tick, to an input it just queued itself.

mod queue;
mod sender;

pub use queue::{Input, InputQueue};
pub use sender::{InputClosed, InputSender};
