//! Phaseflow: a tick-driven state machine with animation-gated transitions
//!
//! Phaseflow drives a graph of states from a plain per-frame update loop.
//! Nothing blocks: states whose entry or exit depends on something slow (a UI
//! panel's open animation, a level load) poll a readiness predicate once per
//! tick instead of awaiting it.
//!
//! # Core Concepts
//!
//! - **State**: a copyable id implementing [`State`], usually generated with
//!   [`state_enum!`]
//! - **Destination graph**: the declared edges; any other transition is an
//!   error
//! - **Instant and transitional states**: instant states swap in the same call
//!   that approves a transition, transitional ones pass through
//!   `TransitionIn`, `Update` and `TransitionOut` phases and defer the swap
//!   until their exit completes
//! - **Input queue**: double-buffered, so an input recorded during tick N is
//!   read during tick N+1 only
//!
//! # Example
//!
//! ```rust
//! use phaseflow::machine::{StateContext, StateLogic, StateResult, TransitionalLogic};
//! use phaseflow::{state_enum, Input, StateMachineBuilder};
//!
//! state_enum! {
//!     enum Flow {
//!         Boot,
//!         Title,
//!     }
//! }
//!
//! #[derive(Clone, Debug)]
//! enum Key {
//!     Enter,
//! }
//!
//! impl Input for Key {
//!     type Kind = ();
//!     fn kind(&self) -> Self::Kind {}
//! }
//!
//! /// Frames left on the title card's fade-in.
//! struct Screen {
//!     fade: u32,
//! }
//!
//! struct Boot;
//!
//! impl StateLogic<Flow, Key, Screen> for Boot {
//!     fn update(&mut self, cx: &mut StateContext<'_, Flow, Key, Screen>) -> StateResult<Flow> {
//!         if cx.inputs().has_input(()) {
//!             cx.request_transition(Flow::Title)?;
//!         }
//!         Ok(())
//!     }
//! }
//!
//! struct Title;
//!
//! impl TransitionalLogic<Flow, Key, Screen> for Title {
//!     fn transition_in(&mut self, cx: &mut StateContext<'_, Flow, Key, Screen>) -> bool {
//!         let screen = cx.view_mut();
//!         screen.fade = screen.fade.saturating_sub(1);
//!         screen.fade == 0
//!     }
//!
//!     fn update(&mut self, _cx: &mut StateContext<'_, Flow, Key, Screen>) -> StateResult<Flow> {
//!         Ok(())
//!     }
//! }
//!
//! let mut machine = StateMachineBuilder::new()
//!     .initial(Flow::Boot)
//!     .state(Flow::Boot, Boot, [Flow::Title])
//!     .transitional(Flow::Title, Title, [])
//!     .build()
//!     .unwrap();
//!
//! let mut screen = Screen { fade: 2 };
//! machine.start(&mut screen).unwrap();
//! machine.add_input(Key::Enter);
//! machine.update(&mut screen).unwrap();
//! assert_eq!(machine.current_state(), Some(Flow::Title));
//!
//! machine.update(&mut screen).unwrap();
//! machine.update(&mut screen).unwrap();
//! assert_eq!(machine.current_phase(), Some(phaseflow::core::Phase::Update));
//! ```

pub mod builder;
pub mod collaborators;
pub mod config;
pub mod core;
pub mod diagnostics;
pub mod game;
pub mod input;
pub mod machine;

// Re-export commonly used types
pub use crate::builder::{BuildError, StateMachineBuilder};
pub use crate::config::MachineConfig;
pub use crate::core::{Phase, State, StateHistory, StateTransition};
pub use crate::input::{Input, InputQueue, InputSender};
pub use crate::machine::{MachineError, StateMachine, TransitionError};
