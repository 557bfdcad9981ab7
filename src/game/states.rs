//! Behaviour of each game state.

use super::input::{DoorAction, GameInput, GameInputKind};
use super::view::{GameView, Speaker, TranscriptLine};
use super::GameState;
use crate::machine::{StateContext, StateLogic, StateResult, TransitionalLogic};

type Cx<'a> = StateContext<'a, GameState, GameInput, GameView>;

/// Splash screen. Leaves as soon as the player presses anything.
pub struct Start;

impl StateLogic<GameState, GameInput, GameView> for Start {
    fn update(&mut self, cx: &mut Cx<'_>) -> StateResult<GameState> {
        if cx.inputs().has_input(GameInputKind::Next) {
            cx.request_transition(GameState::Menu)?;
        }
        Ok(())
    }
}

pub struct Menu;

impl TransitionalLogic<GameState, GameInput, GameView> for Menu {
    fn enter(&mut self, cx: &mut Cx<'_>) {
        cx.view_mut().panels.menu.open();
    }

    fn transition_in(&mut self, cx: &mut Cx<'_>) -> bool {
        cx.view().panels.menu.is_ready()
    }

    fn update(&mut self, cx: &mut Cx<'_>) -> StateResult<GameState> {
        if cx.inputs().has_input(GameInputKind::Play) {
            cx.request_transition(GameState::WalkAround)?;
        }
        Ok(())
    }

    fn exit(&mut self, cx: &mut Cx<'_>) {
        cx.view_mut().panels.menu.close();
    }

    fn transition_out(&mut self, cx: &mut Cx<'_>) -> bool {
        cx.view().panels.menu.is_ready()
    }
}

/// Free roaming with the HUD up.
///
/// Talking to an NPC wins over walking through a door when both happen on
/// the same tick.
pub struct WalkAround;

impl TransitionalLogic<GameState, GameInput, GameView> for WalkAround {
    fn enter(&mut self, cx: &mut Cx<'_>) {
        cx.view_mut().panels.hud.open();
    }

    fn transition_in(&mut self, cx: &mut Cx<'_>) -> bool {
        cx.view().panels.hud.is_ready()
    }

    fn update(&mut self, cx: &mut Cx<'_>) -> StateResult<GameState> {
        let mut door = None;
        for input in cx.inputs().inputs(GameInputKind::Door) {
            if let GameInput::Door(action) = input {
                door = Some(*action);
            }
        }

        match door {
            Some(DoorAction::Open) => cx.view_mut().door_open = true,
            Some(DoorAction::Close) => cx.view_mut().door_open = false,
            Some(DoorAction::Enter) | None => {}
        }

        if cx.inputs().has_input(GameInputKind::Interact) {
            cx.request_transition(GameState::Dialogue)?;
        } else if door == Some(DoorAction::Enter) {
            cx.request_transition(GameState::LevelTransition)?;
        }
        Ok(())
    }

    fn exit(&mut self, cx: &mut Cx<'_>) {
        cx.view_mut().panels.hud.close();
    }

    fn transition_out(&mut self, cx: &mut Cx<'_>) -> bool {
        cx.view().panels.hud.is_ready()
    }
}

/// Conversation with the NPC named by the `Interact` input that opened it.
#[derive(Default)]
pub struct Dialogue {
    reply: String,
    awaiting_reply: bool,
}

impl TransitionalLogic<GameState, GameInput, GameView> for Dialogue {
    fn enter(&mut self, cx: &mut Cx<'_>) {
        self.reply.clear();
        self.awaiting_reply = false;

        let npc = match cx.inputs().last_state_change_input(GameInputKind::Interact) {
            Some(GameInput::Interact { npc }) => Some(npc.clone()),
            _ => None,
        };
        if npc.is_none() {
            tracing::warn!(tick = cx.tick(), "Dialogue entered without an Interact input");
        }

        let view = cx.view_mut();
        view.active_npc = npc;
        view.panels.dialogue.open();
    }

    fn transition_in(&mut self, cx: &mut Cx<'_>) -> bool {
        cx.view().panels.dialogue.is_ready()
    }

    fn update(&mut self, cx: &mut Cx<'_>) -> StateResult<GameState> {
        if cx.inputs().has_input(GameInputKind::Leave) {
            if self.awaiting_reply {
                cx.view_mut().agent.cancel();
                self.awaiting_reply = false;
            }
            return cx.request_transition(GameState::WalkAround);
        }

        let Some(npc) = cx.view().active_npc.clone() else {
            return Ok(());
        };

        if self.awaiting_reply {
            for input in cx.inputs().inputs(GameInputKind::NpcToken) {
                if let GameInput::NpcToken(token) = input {
                    self.reply.push_str(token);
                }
            }
        }

        if self.awaiting_reply && cx.inputs().has_input(GameInputKind::NpcDone) {
            self.awaiting_reply = false;
            let text = self.reply.trim().to_string();
            self.reply.clear();
            cx.view_mut().transcript.push(TranscriptLine {
                speaker: Speaker::Npc(npc.clone()),
                text,
            });
        }

        if self.awaiting_reply {
            return Ok(());
        }

        let message = match cx.inputs().first_input(GameInputKind::PlayerMessage) {
            Some(GameInput::PlayerMessage(text)) => text.clone(),
            _ => return Ok(()),
        };

        tracing::debug!(npc = npc.as_str(), "Player message sent to agent");
        let view = cx.view_mut();
        view.transcript.push(TranscriptLine {
            speaker: Speaker::Player,
            text: message.clone(),
        });
        view.agent.submit(npc.as_str(), &message);
        self.awaiting_reply = true;
        Ok(())
    }

    fn exit(&mut self, cx: &mut Cx<'_>) {
        let view = cx.view_mut();
        view.active_npc = None;
        view.panels.dialogue.close();
    }

    fn transition_out(&mut self, cx: &mut Cx<'_>) -> bool {
        cx.view().panels.dialogue.is_ready()
    }
}

/// Loading screen between rooms.
///
/// The load is requested on the first update tick, once the loading panel is
/// fully shown, so the `LevelLoaded` reply always arrives in the update phase.
#[derive(Default)]
pub struct LevelTransition {
    requested: bool,
}

impl TransitionalLogic<GameState, GameInput, GameView> for LevelTransition {
    fn enter(&mut self, cx: &mut Cx<'_>) {
        self.requested = false;
        let view = cx.view_mut();
        view.door_open = false;
        view.panels.loading.open();
    }

    fn transition_in(&mut self, cx: &mut Cx<'_>) -> bool {
        cx.view().panels.loading.is_ready()
    }

    fn update(&mut self, cx: &mut Cx<'_>) -> StateResult<GameState> {
        if !self.requested {
            self.requested = true;
            let view = cx.view_mut();
            let current = view.level;
            view.loader.load_next(current);
            return Ok(());
        }

        let loaded = match cx.inputs().last_input(GameInputKind::LevelLoaded) {
            Some(GameInput::LevelLoaded(level)) => *level,
            _ => return Ok(()),
        };

        tracing::info!(level = ?loaded, "Level loaded");
        cx.view_mut().level = loaded;
        cx.request_transition(GameState::WalkAround)
    }

    fn exit(&mut self, cx: &mut Cx<'_>) {
        cx.view_mut().panels.loading.close();
    }

    fn transition_out(&mut self, cx: &mut Cx<'_>) -> bool {
        cx.view().panels.loading.is_ready()
    }
}
