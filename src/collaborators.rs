//! Contracts for the systems a game flow drives but does not own.
//!
//! Panels, level loading and the conversational agent all finish their work
//! asynchronously. States never wait on them: panels expose a readiness flag
//! that transitional states poll, and loaders and agents report back by
//! posting inputs through an [`InputSender`](crate::input::InputSender).

/// A UI panel with open and close animations.
pub trait UiPanel {
    /// Start the open animation. `is_ready` is false until it finishes.
    fn open(&mut self);

    /// Start the close animation. `is_ready` is false until it finishes.
    fn close(&mut self);

    /// True when no animation is running.
    fn is_ready(&self) -> bool;

    fn is_open(&self) -> bool;

    /// Step a running animation by one frame. Hosts call this once per
    /// frame; panels animated elsewhere can ignore it.
    fn advance(&mut self) {}
}

/// Fire-and-forget level loading.
///
/// Implementations post a "level loaded" input once the load finishes.
pub trait LevelLoader {
    type Level;

    fn load_next(&mut self, current: Self::Level);
}

/// A conversational agent behind an NPC.
///
/// Replies stream back as inputs: any number of partial tokens followed by
/// one completion marker.
pub trait ConversationAgent {
    fn submit(&mut self, npc: &str, message: &str);

    /// Drop any reply still being generated.
    fn cancel(&mut self) {}
}

/// Headless panel whose animations last a fixed number of frames.
///
/// The host steps it with [`UiPanel::advance`]. With `frames == 0` the panel
/// is always ready.
#[derive(Debug, Clone)]
pub struct CountdownPanel {
    frames: u32,
    remaining: u32,
    open: bool,
}

impl CountdownPanel {
    pub fn new(frames: u32) -> Self {
        Self {
            frames,
            remaining: 0,
            open: false,
        }
    }

    /// Frames left on the running animation.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }
}

impl UiPanel for CountdownPanel {
    fn open(&mut self) {
        self.open = true;
        self.remaining = self.frames;
    }

    fn close(&mut self) {
        self.open = false;
        self.remaining = self.frames;
    }

    fn is_ready(&self) -> bool {
        self.remaining == 0
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn advance(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }
}
