//! Switchyard: a type-indexed finite state machine engine
//!
//! States, per-state command handlers and guarded transitions are declared
//! with a fluent builder and compiled into a [`StateMachine`] that routes each
//! incoming command to the active state through dense, type-indexed tables.
//!
//! # Core Concepts
//!
//! - **State**: identifiers of the machine's modes via the `State` trait
//! - **Command**: any `'static` type; each gets a dense id from the
//!   [`CommandTypeRegistry`] the first time it is configured
//! - **Guard**: a (possibly side-effecting) predicate gating a transition
//! - **Dispatch**: transition first, then the handler of the state that is
//!   active afterwards
//!
//! # Example
//!
//! ```rust
//! use switchyard::{state_enum, StateMachineBuilder};
//! use std::sync::atomic::{AtomicU32, Ordering};
//! use std::sync::Arc;
//!
//! state_enum! {
//!     enum Feed {
//!         Normal,
//!         Exception,
//!         HalfOpen,
//!     }
//! }
//!
//! struct ExceptionOccurred;
//! struct SuccessfulDispatch;
//!
//! let failures = Arc::new(AtomicU32::new(0));
//! let reset = Arc::clone(&failures);
//! let count = Arc::clone(&failures);
//!
//! let mut machine = StateMachineBuilder::new()
//!     .in_state([Feed::Normal])
//!     .when::<ExceptionOccurred>().transit_to(Feed::Exception)
//!     .in_state([Feed::Exception])
//!     .on_enter(move || reset.store(1, Ordering::SeqCst))
//!     .when::<ExceptionOccurred>().transit_to_if(Feed::HalfOpen, move || {
//!         count.fetch_add(1, Ordering::SeqCst) + 1 == 3
//!     })
//!     .in_state([Feed::HalfOpen, Feed::Exception])
//!     .when::<SuccessfulDispatch>().transit_to(Feed::Normal)
//!     .build(Feed::Normal)
//!     .unwrap();
//!
//! machine.handle(ExceptionOccurred);
//! machine.handle(ExceptionOccurred);
//! machine.handle(ExceptionOccurred);
//! assert_eq!(machine.current_state(), &Feed::HalfOpen);
//!
//! machine.handle(SuccessfulDispatch);
//! assert_eq!(machine.current_state(), &Feed::Normal);
//! ```

pub mod builder;
pub mod core;
pub mod runtime;

// Re-export commonly used types
pub use crate::builder::{BuildError, StateMachineBuilder};
pub use crate::core::{CommandTypeRegistry, State, TransitionGuard};
pub use crate::runtime::{MachineError, StateMachine};
