//! Builder for constructing state machines.

use crate::builder::configuration::StateConfiguration;
use crate::builder::error::BuildError;
use crate::builder::group::StateGroupBuilder;
use crate::core::{CommandTypeRegistry, State, StateHistory};
use crate::runtime::{MachineError, StateMachine};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

/// Builder for constructing state machines with a fluent API.
///
/// Configuration is given per group of states. Selecting the next group (or
/// building) flushes the pending group into every state it names; repeated
/// groups for the same state merge as described on [`StateConfiguration`].
///
/// # Example
///
/// ```rust
/// use switchyard::builder::StateMachineBuilder;
/// use switchyard::core::CommandTypeRegistry;
/// use switchyard::state_enum;
/// use std::sync::Arc;
///
/// state_enum! {
///     enum Turnstile {
///         Locked,
///         Unlocked,
///     }
/// }
///
/// struct Coin;
/// struct Push;
///
/// let mut machine = StateMachineBuilder::with_registry(Arc::new(CommandTypeRegistry::new()))
///     .in_state([Turnstile::Locked])
///     .when::<Coin>().transit_to(Turnstile::Unlocked)
///     .in_state([Turnstile::Unlocked])
///     .when::<Push>().transit_to(Turnstile::Locked)
///     .build(Turnstile::Locked)
///     .unwrap();
///
/// machine.handle(Push);
/// assert_eq!(machine.current_state(), &Turnstile::Locked);
/// machine.handle(Coin);
/// assert_eq!(machine.current_state(), &Turnstile::Unlocked);
/// ```
pub struct StateMachineBuilder<S: State> {
    registry: Arc<CommandTypeRegistry>,
    states: HashMap<S, StateConfiguration<S>>,
    order: Vec<S>,
    history_capacity: usize,
}

impl<S: State> StateMachineBuilder<S> {
    /// Create a builder using the process-wide command registry.
    pub fn new() -> Self {
        Self::with_registry(CommandTypeRegistry::global())
    }

    /// Create a builder using `registry` for command type ids.
    pub fn with_registry(registry: Arc<CommandTypeRegistry>) -> Self {
        Self {
            registry,
            states: HashMap::new(),
            order: Vec::new(),
            history_capacity: 0,
        }
    }

    /// Keep the last `capacity` state changes in the machine's history.
    /// Zero (the default) disables history.
    pub fn history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    pub fn registry(&self) -> &Arc<CommandTypeRegistry> {
        &self.registry
    }

    /// Start configuring the given states.
    pub fn in_state(self, states: impl IntoIterator<Item = S>) -> StateGroupBuilder<S> {
        StateGroupBuilder::new(self, states.into_iter().collect())
    }

    /// Start configuring every state of the domain.
    pub fn in_all_states(self) -> StateGroupBuilder<S> {
        StateGroupBuilder::new(self, S::variants())
    }

    /// Start configuring every state except the given ones.
    pub fn in_all_states_except(self, excluded: impl IntoIterator<Item = S>) -> StateGroupBuilder<S> {
        let excluded: HashSet<S> = excluded.into_iter().collect();
        let states = S::variants()
            .into_iter()
            .filter(|state| !excluded.contains(state))
            .collect();
        StateGroupBuilder::new(self, states)
    }

    /// Merge `configuration` into the stored configuration of each state.
    ///
    /// States seen for the first time are declared, even when
    /// `configuration` is empty.
    pub fn flush(&mut self, states: &[S], configuration: &StateConfiguration<S>) {
        for state in states {
            self.states
                .entry(state.clone())
                .or_insert_with(|| {
                    self.order.push(state.clone());
                    StateConfiguration::new()
                })
                .merge(configuration);
        }
    }

    /// Stored configuration of `state`, if it was declared.
    pub fn configuration(&self, state: &S) -> Option<&StateConfiguration<S>> {
        self.states.get(state)
    }

    /// Compile every declared state and enter `initial`.
    ///
    /// Dispatch tables are sized to the registry's current length, so every
    /// command type the machine will react to must have been named through
    /// `when::<C>()` before this call.
    pub fn build(self, initial: S) -> Result<StateMachine<S>, BuildError> {
        if !self.states.contains_key(&initial) {
            return Err(BuildError::UnknownInitialState {
                state: initial.name().to_string(),
            });
        }

        let slots = self.registry.len();
        let mut states = self.states;
        let definitions: Vec<_> = self
            .order
            .into_iter()
            .map(|state| {
                let configuration = states.remove(&state).unwrap_or_default();
                configuration.compile(state, slots)
            })
            .collect();

        for definition in &definitions {
            for (id, transition) in definition.transitions() {
                let target = transition.target();
                if !definitions.iter().any(|d| d.state() == target) {
                    return Err(BuildError::UnknownTargetState {
                        from: definition.state().name().to_string(),
                        to: target.name().to_string(),
                        command: self.registry.name_of(id).unwrap_or("<unknown>").to_string(),
                    });
                }
            }
        }

        debug!(
            initial = initial.name(),
            states = definitions.len(),
            command_types = slots,
            "Building state machine"
        );

        let history = StateHistory::with_capacity(self.history_capacity);
        StateMachine::new(self.registry, definitions, initial, history).map_err(|err| match err {
            MachineError::UnknownState { state } => BuildError::UnknownInitialState { state },
        })
    }
}

impl<S: State> Default for StateMachineBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}
