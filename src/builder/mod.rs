//! Builder API for declarative state machine construction.
//!
//! A machine is described group by group:
//!
//! ```text
//! StateMachineBuilder::new()
//!     .in_state([A])            // select a group of states
//!     .on_enter(..)             // lifecycle callbacks for the group
//!     .when::<Cmd>().handle(..) // per-command handler
//!     .when::<Cmd>().transit_to_if(B, guard)
//!     .in_all_states_except([A])
//!     ...
//!     .build(A)
//! ```
//!
//! Each group is flushed into per-state [`StateConfiguration`]s, which are
//! compiled into dense dispatch tables by `build`.

pub mod configuration;
pub mod error;
pub mod group;
pub mod machine;
pub mod macros;

pub use configuration::StateConfiguration;
pub use error::BuildError;
pub use group::{CommandBuilder, StateGroupBuilder};
pub use machine::StateMachineBuilder;
