//! Property-based tests for registry and dispatch behaviour.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated command sequences.

use proptest::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use switchyard::core::{CommandTypeRegistry, State};
use switchyard::{state_enum, StateMachineBuilder};

state_enum! {
    enum TestState {
        Initial,
        Processing,
        Complete,
    }
}

struct Advance;
struct Retry;
struct Unrelated;
struct NeverConfigured;

#[derive(Clone, Copy, Debug)]
enum Command {
    Advance,
    Retry,
    Unrelated,
    NeverConfigured,
}

prop_compose! {
    fn arbitrary_state()(variant in 0..3u8) -> TestState {
        match variant {
            0 => TestState::Initial,
            1 => TestState::Processing,
            _ => TestState::Complete,
        }
    }
}

prop_compose! {
    fn arbitrary_command()(variant in 0..4u8) -> Command {
        match variant {
            0 => Command::Advance,
            1 => Command::Retry,
            2 => Command::Unrelated,
            _ => Command::NeverConfigured,
        }
    }
}

fn send(machine: &mut switchyard::StateMachine<TestState>, command: Command) {
    match command {
        Command::Advance => machine.handle(Advance),
        Command::Retry => machine.handle(Retry),
        Command::Unrelated => machine.handle(Unrelated),
        Command::NeverConfigured => machine.handle(NeverConfigured),
    }
}

/// Initial --Advance--> Processing --Advance--> Complete, Retry goes back to
/// Initial from anywhere, Unrelated is only handled (never transitions).
fn pipeline(registry: Arc<CommandTypeRegistry>) -> switchyard::StateMachine<TestState> {
    StateMachineBuilder::with_registry(registry)
        .in_state([TestState::Initial])
        .when::<Advance>()
        .transit_to(TestState::Processing)
        .in_state([TestState::Processing])
        .when::<Advance>()
        .transit_to(TestState::Complete)
        .in_all_states()
        .when::<Retry>()
        .transit_to(TestState::Initial)
        .when::<Unrelated>()
        .run(|| {})
        .build(TestState::Initial)
        .unwrap()
}

fn expected_next(state: TestState, command: Command) -> TestState {
    match (state, command) {
        (TestState::Initial, Command::Advance) => TestState::Processing,
        (TestState::Processing, Command::Advance) => TestState::Complete,
        (_, Command::Retry) => TestState::Initial,
        (state, _) => state,
    }
}

proptest! {
    #[test]
    fn dispatch_matches_transition_table(
        commands in prop::collection::vec(arbitrary_command(), 0..40)
    ) {
        let mut machine = pipeline(Arc::new(CommandTypeRegistry::new()));
        let mut expected = TestState::Initial;

        for command in commands {
            send(&mut machine, command);
            expected = expected_next(expected, command);
            prop_assert_eq!(machine.current_state(), &expected);
        }
    }

    #[test]
    fn commands_without_transitions_never_change_state(
        initial in arbitrary_state(),
        repeats in 1..20usize
    ) {
        let mut machine = pipeline(Arc::new(CommandTypeRegistry::new()));
        machine.transit_to(initial).unwrap();

        for _ in 0..repeats {
            machine.handle(Unrelated);
            machine.handle(NeverConfigured);
        }

        prop_assert_eq!(machine.current_state(), &initial);
    }

    #[test]
    fn build_enters_initial_state_exactly_once(initial in arbitrary_state()) {
        let entered = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&entered);
        let machine = StateMachineBuilder::with_registry(Arc::new(CommandTypeRegistry::new()))
            .in_all_states()
            .on_enter(move || log.lock().unwrap().push(()))
            .build(initial)
            .unwrap();

        prop_assert_eq!(machine.current_state(), &initial);
        prop_assert_eq!(entered.lock().unwrap().len(), 1);
    }

    #[test]
    fn first_passing_guard_wins(
        outcomes in prop::collection::vec(any::<bool>(), 1..8)
    ) {
        let calls: Vec<Arc<AtomicUsize>> =
            outcomes.iter().map(|_| Arc::new(AtomicUsize::new(0))).collect();

        let mut group = StateMachineBuilder::with_registry(Arc::new(CommandTypeRegistry::new()))
            .in_state([TestState::Processing, TestState::Complete])
            .in_state([TestState::Initial]);
        for (outcome, counter) in outcomes.iter().zip(&calls) {
            let outcome = *outcome;
            let counter = Arc::clone(counter);
            group = group.when::<Advance>().transit_to_if(TestState::Complete, move || {
                counter.fetch_add(1, Ordering::SeqCst);
                outcome
            });
        }
        group = group.when::<Advance>().transit_to(TestState::Processing);
        let mut machine = group.build(TestState::Initial).unwrap();

        machine.handle(Advance);

        let winner = outcomes.iter().position(|passed| *passed);
        let evaluated = winner.map_or(outcomes.len(), |index| index + 1);
        for (index, counter) in calls.iter().enumerate() {
            let expected_calls = usize::from(index < evaluated);
            prop_assert_eq!(counter.load(Ordering::SeqCst), expected_calls);
        }

        let expected = if winner.is_some() {
            TestState::Complete
        } else {
            TestState::Processing
        };
        prop_assert_eq!(machine.current_state(), &expected);
    }

    #[test]
    fn state_roundtrip_serialization(state in arbitrary_state()) {
        let json = serde_json::to_string(&state).unwrap();
        let deserialized: TestState = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(state, deserialized);
        prop_assert_eq!(state.name(), deserialized.name());
    }
}

#[test]
fn distinct_command_types_get_distinct_stable_ids() {
    let registry = CommandTypeRegistry::new();

    let ids = [
        registry.id_of::<Advance>(),
        registry.id_of::<Retry>(),
        registry.id_of::<Unrelated>(),
        registry.id_of::<NeverConfigured>(),
    ];

    for (i, a) in ids.iter().enumerate() {
        for b in &ids[i + 1..] {
            assert_ne!(a, b);
        }
    }
    assert_eq!(registry.id_of::<Retry>(), ids[1]);
    assert_eq!(registry.id_of::<NeverConfigured>(), ids[3]);
    assert_eq!(registry.len(), ids.len());
}

#[test]
fn machines_with_different_state_types_share_a_registry() {
    state_enum! {
        enum Other {
            Off,
            On,
        }
    }

    let registry = Arc::new(CommandTypeRegistry::new());
    let mut first = pipeline(Arc::clone(&registry));
    let mut second = StateMachineBuilder::with_registry(Arc::clone(&registry))
        .in_state([Other::Off])
        .when::<Retry>()
        .transit_to(Other::On)
        .in_state([Other::On])
        .build(Other::Off)
        .unwrap();

    first.handle(Advance);
    second.handle(Retry);
    second.handle(Advance);

    assert_eq!(first.current_state(), &TestState::Processing);
    assert_eq!(second.current_state(), &Other::On);
}

#[test]
fn command_type_first_seen_after_build_is_ignored() {
    struct LateCommand;

    let registry = Arc::new(CommandTypeRegistry::new());
    let mut machine = pipeline(Arc::clone(&registry));

    registry.id_of::<LateCommand>();
    machine.handle(LateCommand);

    assert_eq!(machine.current_state(), &TestState::Initial);
    assert!(!machine.can_handle::<LateCommand>());
}
