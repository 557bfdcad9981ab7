//! Point-in-time snapshots of a running state machine.
//!
//! A [`MachineSnapshot`] captures what a debugger or a test needs to see:
//! the current state, any pending destination, the active phase and the
//! recorded history. State behaviour is not part of a snapshot, so a
//! snapshot describes a machine but cannot restore one.

use crate::core::{Phase, State, StateHistory};
use crate::input::Input;
use crate::machine::StateMachine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod error;

pub use error::SnapshotError;

/// Version identifier for the snapshot format
pub const SNAPSHOT_VERSION: u32 = 1;

/// Serializable view of a state machine at one tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct MachineSnapshot<S: State> {
    /// Snapshot format version
    pub version: u32,

    /// Id of the machine the snapshot was taken from
    pub machine_id: Uuid,

    pub taken_at: DateTime<Utc>,

    /// Number of updates the machine had run
    pub tick: u64,

    /// `None` before `start`
    pub current: Option<S>,

    /// Destination of an approved transition that has not committed yet
    pub pending: Option<S>,

    /// Phase of the current state, if it is transitional
    pub phase: Option<Phase>,

    /// Allowed destinations of the current state
    pub destinations: Vec<S>,

    pub history: StateHistory<S>,
}

impl<S: State> MachineSnapshot<S> {
    /// Encode as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SnapshotError::SerializationFailed(e.to_string()))
    }

    /// Decode from JSON, rejecting unknown format versions.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: Self = serde_json::from_str(json)
            .map_err(|e| SnapshotError::DeserializationFailed(e.to_string()))?;
        snapshot.check_version()
    }

    /// Encode with bincode.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        bincode::serialize(self).map_err(|e| SnapshotError::SerializationFailed(e.to_string()))
    }

    /// Decode from bincode, rejecting unknown format versions.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let snapshot: Self = bincode::deserialize(bytes)
            .map_err(|e| SnapshotError::DeserializationFailed(e.to_string()))?;
        snapshot.check_version()
    }

    /// True when no transition is waiting to commit.
    pub fn is_settled(&self) -> bool {
        self.pending.is_none()
    }

    fn check_version(self) -> Result<Self, SnapshotError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: self.version,
                supported: SNAPSHOT_VERSION,
            });
        }
        Ok(self)
    }
}

impl<S: State, E: Input, V> StateMachine<S, E, V> {
    /// Capture the machine's observable state.
    pub fn snapshot(&self) -> MachineSnapshot<S> {
        let destinations = self
            .current_state()
            .map(|state| self.destinations(state).to_vec())
            .unwrap_or_default();

        MachineSnapshot {
            version: SNAPSHOT_VERSION,
            machine_id: self.id(),
            taken_at: Utc::now(),
            tick: self.tick(),
            current: self.current_state(),
            pending: self.pending_destination(),
            phase: self.current_phase(),
            destinations,
            history: self.history().clone(),
        }
    }
}
