//! Runtime errors raised by a compiled state machine.

use thiserror::Error;

/// Errors that can occur while driving a state machine.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MachineError {
    #[error("State '{state}' is not configured in this machine")]
    UnknownState { state: String },
}
