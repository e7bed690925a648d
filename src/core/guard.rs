//! Guard predicates for controlling state transitions.
//!
//! A guard decides, at dispatch time, whether a transition may fire. Guards
//! are stateful predicates: they are allowed to read and mutate captured
//! state (for instance a counter incremented on every evaluation), and they
//! are never cached.

use std::fmt;
use std::sync::Arc;

type Predicate = Arc<dyn Fn() -> bool + Send + Sync>;

/// Zero-argument predicate gating a transition.
///
/// Guards are evaluated lazily, in registration order, and only until the
/// first one returns `true`. A guard with side effects therefore observes
/// exactly as many evaluations as there were dispatches that reached it.
///
/// # Example
///
/// ```rust
/// use switchyard::core::TransitionGuard;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// let failures = Arc::new(AtomicUsize::new(0));
/// let counter = Arc::clone(&failures);
/// let threshold_reached = TransitionGuard::new(move || {
///     counter.fetch_add(1, Ordering::SeqCst) + 1 == 2
/// });
///
/// assert!(!threshold_reached.is_satisfied());
/// assert!(threshold_reached.is_satisfied());
/// assert_eq!(failures.load(Ordering::SeqCst), 2);
/// ```
#[derive(Clone)]
pub struct TransitionGuard {
    predicate: Predicate,
}

impl TransitionGuard {
    /// Create a guard from a predicate.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        TransitionGuard {
            predicate: Arc::new(predicate),
        }
    }

    /// Guard that always allows the transition.
    pub fn always() -> Self {
        Self::new(|| true)
    }

    /// Evaluate the predicate. Runs the predicate's side effects every call.
    pub fn is_satisfied(&self) -> bool {
        (self.predicate)()
    }
}

impl Default for TransitionGuard {
    fn default() -> Self {
        Self::always()
    }
}

impl fmt::Debug for TransitionGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionGuard").finish_non_exhaustive()
    }
}
