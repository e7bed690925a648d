//! Exception Feed
//!
//! A small circuit-breaker style machine driven by two commands.
//!
//! Key concepts:
//! - Guards with side effects (a failure counter bumped on evaluation)
//! - Enter callbacks resetting external state
//! - One transition registered for several states at once
//!
//! Run with: RUST_LOG=switchyard=debug cargo run --example exception_feed

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use switchyard::{state_enum, StateMachine, StateMachineBuilder};
use tracing_subscriber::EnvFilter;

state_enum! {
    enum FeedState {
        Normal,
        Exception,
        HalfOpen,
    }
}

struct ExceptionOccurred {
    reason: String,
}

struct SuccessfulDispatch;

struct ExceptionFeed {
    machine: StateMachine<FeedState>,
    exceptions_received: Arc<AtomicU32>,
}

impl ExceptionFeed {
    fn new(threshold: u32) -> Result<Self, switchyard::BuildError> {
        let exceptions_received = Arc::new(AtomicU32::new(0));
        let reset = Arc::clone(&exceptions_received);
        let count = Arc::clone(&exceptions_received);

        let machine = StateMachineBuilder::new()
            .in_state([FeedState::Normal])
            .when::<ExceptionOccurred>()
            .transit_to(FeedState::Exception)
            .in_state([FeedState::Exception])
            .on_enter(move || reset.store(1, Ordering::SeqCst))
            .when::<ExceptionOccurred>()
            .handle(|cmd: &ExceptionOccurred| println!("Logged failure: {}", cmd.reason))
            .when::<ExceptionOccurred>()
            .transit_to_if(FeedState::HalfOpen, move || {
                count.fetch_add(1, Ordering::SeqCst) + 1 == threshold
            })
            .in_state([FeedState::HalfOpen, FeedState::Exception])
            .when::<SuccessfulDispatch>()
            .transit_to(FeedState::Normal)
            .build(FeedState::Normal)?;

        Ok(Self {
            machine,
            exceptions_received,
        })
    }

    fn exception_occurred(&mut self, reason: &str) {
        println!("Exception occurred: {reason}");
        self.machine.handle(ExceptionOccurred {
            reason: reason.to_string(),
        });
        println!(
            "Exceptions received: {}",
            self.exceptions_received.load(Ordering::SeqCst)
        );
        self.print_state();
    }

    fn successful_dispatch(&mut self) {
        println!("Successful dispatch");
        self.machine.handle(SuccessfulDispatch);
        self.print_state();
    }

    fn print_state(&self) {
        println!("Current state: {:?}\n", self.machine.current_state());
    }
}

fn main() -> Result<(), switchyard::BuildError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Exception Feed Example ===\n");

    let mut feed = ExceptionFeed::new(3)?;
    feed.print_state();

    feed.exception_occurred("connection reset");
    feed.exception_occurred("connection reset");
    feed.exception_occurred("timeout");
    feed.successful_dispatch();
    feed.exception_occurred("timeout");
    feed.successful_dispatch();

    println!("=== Example Complete ===");
    Ok(())
}
