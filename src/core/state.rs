//! State identifier trait.
//!
//! State identifiers name the modes of a machine. They are plain values
//! (usually fieldless enums) used as keys into the compiled state table.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;
use std::hash::Hash;

/// Trait for state machine state identifiers.
///
/// The set of states is finite and enumerable: [`State::variants`] lists
/// every identifier of the domain, which is what the builder's
/// `in_all_states` and `in_all_states_except` selectors iterate over.
///
/// # Required Traits
///
/// - `Clone` + `Eq` + `Hash`: identifiers are keys of the state table
/// - `Debug`: identifiers show up in errors and log fields
/// - `Serialize` + `Deserialize`: identifiers appear in the transition history
///
/// Most implementations come from the [`state_enum!`](crate::state_enum) macro.
///
/// # Example
///
/// ```rust
/// use switchyard::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum FeedState {
///     Normal,
///     Exception,
///     HalfOpen,
/// }
///
/// impl State for FeedState {
///     fn name(&self) -> &str {
///         match self {
///             Self::Normal => "Normal",
///             Self::Exception => "Exception",
///             Self::HalfOpen => "HalfOpen",
///         }
///     }
///
///     fn variants() -> Vec<Self> {
///         vec![Self::Normal, Self::Exception, Self::HalfOpen]
///     }
/// }
///
/// assert_eq!(FeedState::variants().len(), 3);
/// ```
pub trait State:
    Clone + Eq + Hash + Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Get the state's name for display/logging.
    fn name(&self) -> &str;

    /// Every identifier of this state domain, in declaration order.
    fn variants() -> Vec<Self>;
}
