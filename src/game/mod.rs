//! The top-level flow of a Clue-style exploration game.
//!
//! ```text
//! Start -> Menu -> WalkAround <-> Dialogue
//!                      ^
//!                      +--------> LevelTransition
//! ```
//!
//! `Start` is instant. Every other state is transitional and gated on the
//! readiness of the panel it opens, so the swap to the next state waits for
//! the previous panel's close animation.

mod headless;
mod input;
mod states;
mod view;

pub use headless::{ScriptedAgent, ScriptedLoader};
pub use input::{DoorAction, GameInput, GameInputKind, LevelKind, NpcId};
pub use states::{Dialogue, LevelTransition, Menu, Start, WalkAround};
pub use view::{GamePanels, GameView, Speaker, TranscriptLine};

use crate::builder::{BuildError, StateMachineBuilder};
use crate::config::MachineConfig;
use crate::machine::StateMachine;
use crate::state_enum;

state_enum! {
    pub enum GameState {
        Start,
        Menu,
        WalkAround,
        Dialogue,
        LevelTransition,
    }
}

pub type GameMachine = StateMachine<GameState, GameInput, GameView>;

/// Wire the game graph.
pub fn build_game_machine(config: MachineConfig) -> Result<GameMachine, BuildError> {
    StateMachineBuilder::new()
        .config(config)
        .initial(GameState::Start)
        .state(GameState::Start, Start, [GameState::Menu])
        .transitional(GameState::Menu, Menu, [GameState::WalkAround])
        .transitional(
            GameState::WalkAround,
            WalkAround,
            [GameState::Dialogue, GameState::LevelTransition],
        )
        .transitional(GameState::Dialogue, Dialogue::default(), [GameState::WalkAround])
        .transitional(
            GameState::LevelTransition,
            LevelTransition::default(),
            [GameState::WalkAround],
        )
        .build()
}
