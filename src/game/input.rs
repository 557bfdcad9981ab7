//! Inputs of the game flow.

use crate::input::Input;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a non-player character.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NpcId(pub String);

impl NpcId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NpcId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DoorAction {
    Open,
    Close,
    Enter,
}

/// Rooms of the house, visited in a fixed loop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LevelKind {
    #[default]
    Hall,
    Library,
    Conservatory,
}

impl LevelKind {
    /// The room behind the current room's exit door.
    pub fn next(self) -> Self {
        match self {
            Self::Hall => Self::Library,
            Self::Library => Self::Conservatory,
            Self::Conservatory => Self::Hall,
        }
    }
}

/// Everything that can happen to the game between two ticks.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameInput {
    /// Leave the splash screen
    Next,
    /// Start playing from the menu
    Play,
    /// Player started talking to an NPC
    Interact { npc: NpcId },
    Door(DoorAction),
    /// Text the player typed into the dialogue box
    PlayerMessage(String),
    /// Partial reply streamed by the agent
    NpcToken(String),
    /// The agent finished its reply
    NpcDone,
    /// Player closed the dialogue
    Leave,
    LevelLoaded(LevelKind),
}

/// Payload-free tag of a [`GameInput`], used for queue lookups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameInputKind {
    Next,
    Play,
    Interact,
    Door,
    PlayerMessage,
    NpcToken,
    NpcDone,
    Leave,
    LevelLoaded,
}

impl Input for GameInput {
    type Kind = GameInputKind;

    fn kind(&self) -> GameInputKind {
        match self {
            Self::Next => GameInputKind::Next,
            Self::Play => GameInputKind::Play,
            Self::Interact { .. } => GameInputKind::Interact,
            Self::Door(_) => GameInputKind::Door,
            Self::PlayerMessage(_) => GameInputKind::PlayerMessage,
            Self::NpcToken(_) => GameInputKind::NpcToken,
            Self::NpcDone => GameInputKind::NpcDone,
            Self::Leave => GameInputKind::Leave,
            Self::LevelLoaded(_) => GameInputKind::LevelLoaded,
        }
    }
}
