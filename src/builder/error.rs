//! Build errors for state machine builders.

use thiserror::Error;

/// Errors that can occur when compiling a state machine.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("Initial state '{state}' is not configured. Select it with .in_state(..) before .build()")]
    UnknownInitialState { state: String },

    #[error("Transition from '{from}' on {command} targets unconfigured state '{to}'")]
    UnknownTargetState {
        from: String,
        to: String,
        command: String,
    },
}
