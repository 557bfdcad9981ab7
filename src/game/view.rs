//! The host-owned world the game states act on.

use super::input::{LevelKind, NpcId};
use crate::collaborators::{ConversationAgent, LevelLoader, UiPanel};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Speaker {
    Player,
    Npc(NpcId),
}

/// One finished line of dialogue.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptLine {
    pub speaker: Speaker,
    pub text: String,
}

/// The four panels the flow opens and closes.
pub struct GamePanels {
    pub menu: Box<dyn UiPanel>,
    pub hud: Box<dyn UiPanel>,
    pub dialogue: Box<dyn UiPanel>,
    pub loading: Box<dyn UiPanel>,
}

/// Everything the game states reach through `StateContext::view`.
pub struct GameView {
    pub panels: GamePanels,
    pub loader: Box<dyn LevelLoader<Level = LevelKind>>,
    pub agent: Box<dyn ConversationAgent>,
    pub level: LevelKind,
    pub door_open: bool,
    /// NPC the player is talking to, while in dialogue
    pub active_npc: Option<NpcId>,
    pub transcript: Vec<TranscriptLine>,
}

impl GameView {
    pub fn new(
        panels: GamePanels,
        loader: Box<dyn LevelLoader<Level = LevelKind>>,
        agent: Box<dyn ConversationAgent>,
    ) -> Self {
        Self {
            panels,
            loader,
            agent,
            level: LevelKind::default(),
            door_open: false,
            active_npc: None,
            transcript: Vec::new(),
        }
    }

    /// Step every panel animation by one frame.
    pub fn advance_frame(&mut self) {
        let panels = &mut self.panels;
        for panel in [
            &mut panels.menu,
            &mut panels.hud,
            &mut panels.dialogue,
            &mut panels.loading,
        ] {
            panel.advance();
        }
    }

    /// Lines spoken by `npc`, oldest first.
    pub fn lines_from<'a>(&'a self, npc: &'a NpcId) -> impl Iterator<Item = &'a str> + 'a {
        self.transcript
            .iter()
            .filter(move |line| matches!(&line.speaker, Speaker::Npc(id) if id == npc))
            .map(|line| line.text.as_str())
    }
}
