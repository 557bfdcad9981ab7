//! Machine configuration.

use serde::{Deserialize, Serialize};

/// Tunables for a [`StateMachine`](crate::machine::StateMachine).
///
/// All fields have defaults, so a partial JSON document is enough:
///
/// ```rust
/// use phaseflow::MachineConfig;
///
/// let config = MachineConfig::from_json_str(r#"{ "history_limit": 8 }"#).unwrap();
/// assert_eq!(config.history_limit, 8);
/// assert!(config.halt_on_error);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Initial capacity of each input buffer
    pub input_capacity: usize,
    /// Committed transitions kept in history (0 keeps all)
    pub history_limit: usize,
    /// Events retained until drained; oldest are dropped first
    pub event_limit: usize,
    /// Log a warning when a transitional state stays in a gated phase this
    /// many ticks. Logging only.
    pub stall_warning_ticks: Option<u64>,
    /// Refuse further updates after a hook returns a transition error
    pub halt_on_error: bool,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            input_capacity: 16,
            history_limit: 64,
            event_limit: 256,
            stall_warning_ticks: Some(600),
            halt_on_error: true,
        }
    }
}

impl MachineConfig {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
