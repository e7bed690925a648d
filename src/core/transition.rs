//! Guarded transitions between states.

use super::guard::TransitionGuard;
use super::state::State;

/// Immutable pair of a guard and the state it leads to.
#[derive(Clone, Debug)]
pub struct StateTransition<S: State> {
    guard: TransitionGuard,
    target: S,
}

impl<S: State> StateTransition<S> {
    pub fn new(target: S, guard: TransitionGuard) -> Self {
        Self { guard, target }
    }

    /// Transition that fires whenever its command arrives.
    pub fn unconditional(target: S) -> Self {
        Self::new(target, TransitionGuard::always())
    }

    pub fn guard(&self) -> &TransitionGuard {
        &self.guard
    }

    /// Destination state.
    pub fn target(&self) -> &S {
        &self.target
    }

    /// Evaluate the guard (with its side effects).
    pub fn can_fire(&self) -> bool {
        self.guard.is_satisfied()
    }
}
