//! Compiled state machines and their dispatch tables.
//!
//! Everything in here is produced by the builder and is read-mostly: the only
//! thing that changes after construction is which state is active (and the
//! optional transition history).

mod definition;
mod error;
mod machine;

pub use definition::{StateAction, StateDefinition};
pub use error::MachineError;
pub use machine::StateMachine;
