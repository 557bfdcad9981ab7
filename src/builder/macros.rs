//! Macros for ergonomic state machine construction.

/// Generate a state id enum and its `State` implementation.
///
/// The enum derives `Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize,
/// Deserialize`, and `name()` returns the variant name.
///
/// # Example
///
/// ```
/// use phaseflow::core::State;
/// use phaseflow::state_enum;
///
/// state_enum! {
///     pub enum GameFlow {
///         Start,
///         Menu,
///         WalkAround,
///     }
/// }
///
/// assert_eq!(GameFlow::WalkAround.name(), "WalkAround");
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}
