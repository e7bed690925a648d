//! Core building blocks of the dispatch engine.
//!
//! This module contains the leaf types everything else is assembled from:
//! - State identifiers via the `State` trait
//! - The command type registry handing out dense ids
//! - Typed command handlers and their erased storage form
//! - Guards and guarded transitions
//! - Bounded transition history

mod guard;
mod handler;
mod history;
mod registry;
mod state;
mod transition;

pub use guard::TransitionGuard;
pub use handler::{CommandHandler, ErasedHandler};
pub use history::{StateHistory, TransitionRecord};
pub use registry::{CommandTypeId, CommandTypeRegistry};
pub use state::State;
pub use transition::StateTransition;
