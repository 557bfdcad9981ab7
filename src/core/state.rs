//! State identity trait.
//!
//! A state id names a node of the machine's graph. Behaviour lives elsewhere
//! (see [`crate::machine::StateLogic`]); the id only has to be cheap to copy,
//! comparable, hashable and serializable for diagnostics.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

/// Trait for state identifiers.
///
/// States are typically fieldless enums, one variant per node of the graph.
/// Two ids compare equal exactly when they name the same node, which is what
/// the transition gate relies on to detect self-transitions and stale
/// requests.
///
/// # Required Traits
///
/// - `Copy` + `Eq` + `Hash`: ids key the machine's behaviour table
/// - `Debug`: ids appear in error messages and logs
/// - `Serialize` + `Deserialize`: ids are part of diagnostic snapshots
///
/// # Example
///
/// ```rust
/// use phaseflow::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum Screen {
///     Title,
///     Playing,
/// }
///
/// impl State for Screen {
///     fn name(&self) -> &str {
///         match self {
///             Self::Title => "Title",
///             Self::Playing => "Playing",
///         }
///     }
/// }
///
/// assert_eq!(Screen::Title.name(), "Title");
/// ```
pub trait State:
    Copy + Eq + Hash + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync + 'static
{
    /// Get the state's name for display/logging.
    fn name(&self) -> &str;
}
