//! Plays one scripted round of the game flow on headless collaborators.
//!
//! Run with `RUST_LOG=phaseflow=debug cargo run --example clue_flow` to see
//! every approved transition and phase change.

use phaseflow::game::{build_game_machine, DoorAction, GameInput, GameMachine, GameView, NpcId};
use phaseflow::{MachineConfig, Phase};
use tracing::info;

/// Frames a panel animation lasts.
const PANEL_FRAMES: u32 = 3;

/// One host frame: run the machine, then let the panels animate.
fn frame(machine: &mut GameMachine, view: &mut GameView) -> Result<(), Box<dyn std::error::Error>> {
    machine.update(view)?;
    view.advance_frame();
    Ok(())
}

/// Tick until the current state accepts input again.
fn wait_until_ready(
    machine: &mut GameMachine,
    view: &mut GameView,
) -> Result<(), Box<dyn std::error::Error>> {
    while machine.is_transitioning() || machine.current_phase() == Some(Phase::TransitionIn) {
        frame(machine, view)?;
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = MachineConfig::from_json_str(r#"{ "stall_warning_ticks": 30 }"#)?;
    let mut machine = build_game_machine(config)?;
    let mut view = GameView::headless(machine.input_sender(), PANEL_FRAMES);

    machine.start(&mut view)?;
    info!(machine = %machine.id(), "Game started");

    // Each input is followed by a number of idle ticks.
    let script = [
        (GameInput::Next, 0),
        (GameInput::Play, 0),
        (
            GameInput::Interact {
                npc: NpcId::new("butler"),
            },
            0,
        ),
        (
            GameInput::PlayerMessage("Where were you when the lights went out?".to_string()),
            1,
        ),
        (GameInput::Leave, 0),
        (GameInput::Door(DoorAction::Open), 0),
        (GameInput::Door(DoorAction::Enter), 0),
    ];

    for (input, idle) in script {
        wait_until_ready(&mut machine, &mut view)?;
        info!(state = ?machine.current_state(), input = ?input, "Player acts");
        machine.add_input(input);
        for _ in 0..=idle {
            frame(&mut machine, &mut view)?;
        }
    }

    // Fade out, load the next room, fade back in.
    let start_level = view.level;
    while view.level == start_level {
        wait_until_ready(&mut machine, &mut view)?;
        frame(&mut machine, &mut view)?;
    }
    wait_until_ready(&mut machine, &mut view)?;

    for line in &view.transcript {
        println!("{:?}: {}", line.speaker, line.text);
    }
    for event in machine.drain_events() {
        println!("{event:?}");
    }
    println!("{}", machine.snapshot().to_json()?);
    info!(tick = machine.tick(), level = ?view.level, "Round finished");
    Ok(())
}
