//! Collaborators that run without an engine, for demos and tests.

use super::input::{GameInput, LevelKind};
use super::view::{GamePanels, GameView};
use crate::collaborators::{ConversationAgent, CountdownPanel, LevelLoader};
use crate::input::InputSender;
use std::collections::HashMap;

/// Loads the next room instantly and reports it on the following tick.
pub struct ScriptedLoader {
    outlet: InputSender<GameInput>,
    loads: usize,
}

impl ScriptedLoader {
    pub fn new(outlet: InputSender<GameInput>) -> Self {
        Self { outlet, loads: 0 }
    }

    pub fn loads(&self) -> usize {
        self.loads
    }
}

impl LevelLoader for ScriptedLoader {
    type Level = LevelKind;

    fn load_next(&mut self, current: LevelKind) {
        self.loads += 1;
        let next = current.next();
        if self.outlet.send(GameInput::LevelLoaded(next)).is_err() {
            tracing::warn!(level = ?next, "Level loaded after the machine was dropped");
        }
    }
}

/// Answers from a fixed table, streaming each reply word by word.
#[derive(Default)]
pub struct ScriptedAgent {
    outlet: Option<InputSender<GameInput>>,
    replies: HashMap<String, String>,
}

impl ScriptedAgent {
    pub fn new(outlet: InputSender<GameInput>) -> Self {
        Self {
            outlet: Some(outlet),
            replies: HashMap::new(),
        }
    }

    pub fn with_reply(mut self, npc: impl Into<String>, reply: impl Into<String>) -> Self {
        self.replies.insert(npc.into(), reply.into());
        self
    }

    fn reply_for(&self, npc: &str, message: &str) -> String {
        self.replies
            .get(npc)
            .cloned()
            .unwrap_or_else(|| format!("{npc} has nothing to say about \"{message}\"."))
    }
}

impl ConversationAgent for ScriptedAgent {
    fn submit(&mut self, npc: &str, message: &str) {
        let Some(outlet) = &self.outlet else {
            return;
        };

        let reply = self.reply_for(npc, message);
        let streamed = reply
            .split_inclusive(' ')
            .map(|token| GameInput::NpcToken(token.to_string()))
            .chain(std::iter::once(GameInput::NpcDone))
            .try_for_each(|input| outlet.send(input));

        if streamed.is_err() {
            tracing::warn!(npc, "Reply streamed after the machine was dropped");
        }
    }
}

impl GameView {
    /// A view wired to headless collaborators. Every panel animation takes
    /// `frames` calls to [`GameView::advance_frame`].
    pub fn headless(outlet: InputSender<GameInput>, frames: u32) -> Self {
        let panels = GamePanels {
            menu: Box::new(CountdownPanel::new(frames)),
            hud: Box::new(CountdownPanel::new(frames)),
            dialogue: Box::new(CountdownPanel::new(frames)),
            loading: Box::new(CountdownPanel::new(frames)),
        };
        let agent = ScriptedAgent::new(outlet.clone())
            .with_reply("butler", "I was polishing the silver all evening.")
            .with_reply("cook", "Nobody leaves my kitchen hungry.");

        GameView::new(panels, Box::new(ScriptedLoader::new(outlet)), Box::new(agent))
    }
}
