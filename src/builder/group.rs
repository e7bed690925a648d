//! Per-group and per-command configuration builders.

use crate::builder::configuration::StateConfiguration;
use crate::builder::error::BuildError;
use crate::builder::machine::StateMachineBuilder;
use crate::core::{CommandHandler, CommandTypeId, State, StateTransition, TransitionGuard};
use crate::runtime::StateMachine;
use std::marker::PhantomData;
use std::sync::Arc;

/// Configuration scope covering one or more states.
///
/// Everything registered here applies to each state of the group. The group
/// is flushed into the owning [`StateMachineBuilder`] when the next group is
/// selected, on [`finish`](Self::finish), or on [`build`](Self::build).
pub struct StateGroupBuilder<S: State> {
    machine: StateMachineBuilder<S>,
    states: Vec<S>,
    configuration: StateConfiguration<S>,
}

impl<S: State> StateGroupBuilder<S> {
    pub(crate) fn new(machine: StateMachineBuilder<S>, states: Vec<S>) -> Self {
        let mut unique = Vec::with_capacity(states.len());
        for state in states {
            if !unique.contains(&state) {
                unique.push(state);
            }
        }

        Self {
            machine,
            states: unique,
            configuration: StateConfiguration::new(),
        }
    }

    /// States this group configures.
    pub fn states(&self) -> &[S] {
        &self.states
    }

    /// Callback run each time one of these states becomes active.
    pub fn on_enter<F>(mut self, action: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.configuration.set_on_enter(Arc::new(action));
        self
    }

    /// Callback run each time one of these states is left.
    pub fn on_exit<F>(mut self, action: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.configuration.set_on_exit(Arc::new(action));
        self
    }

    /// Configure the reaction to command type `C`.
    ///
    /// Assigns `C` its type id if this is the first time it is seen.
    pub fn when<C: 'static>(self) -> CommandBuilder<S, C> {
        let id = self.machine.registry().id_of::<C>();
        CommandBuilder {
            group: self,
            id,
            _command: PhantomData,
        }
    }

    /// Register an unconditional transition for command type `C`.
    pub fn add_transition<C: 'static>(self, target: S) -> Self {
        self.when::<C>().transit_to(target)
    }

    pub fn in_state(self, states: impl IntoIterator<Item = S>) -> StateGroupBuilder<S> {
        self.finish().in_state(states)
    }

    pub fn in_all_states(self) -> StateGroupBuilder<S> {
        self.finish().in_all_states()
    }

    pub fn in_all_states_except(self, excluded: impl IntoIterator<Item = S>) -> StateGroupBuilder<S> {
        self.finish().in_all_states_except(excluded)
    }

    /// Flush this group and return the machine builder.
    pub fn finish(self) -> StateMachineBuilder<S> {
        let mut machine = self.machine;
        machine.flush(&self.states, &self.configuration);
        machine
    }

    /// Flush this group and compile the machine.
    pub fn build(self, initial: S) -> Result<StateMachine<S>, BuildError> {
        self.finish().build(initial)
    }
}

/// Configuration scope for one command type within a group of states.
pub struct CommandBuilder<S: State, C> {
    group: StateGroupBuilder<S>,
    id: CommandTypeId,
    _command: PhantomData<fn(&C)>,
}

impl<S: State, C: 'static> CommandBuilder<S, C> {
    pub fn id(&self) -> CommandTypeId {
        self.id
    }

    /// Handle `C` with access to the command value.
    ///
    /// A second handler for the same command and state replaces the first.
    pub fn handle<F>(mut self, handler: F) -> StateGroupBuilder<S>
    where
        F: Fn(&C) + Send + Sync + 'static,
    {
        self.group
            .configuration
            .add_handler(self.id, CommandHandler::new(handler).erase());
        self.group
    }

    /// Handle `C` without looking at the command value.
    pub fn run<F>(self, handler: F) -> StateGroupBuilder<S>
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.handle(move |_: &C| handler())
    }

    /// Move to `target` whenever `C` arrives.
    pub fn transit_to(self, target: S) -> StateGroupBuilder<S> {
        self.transit_with(target, TransitionGuard::always())
    }

    /// Move to `target` when `C` arrives and `guard` returns true.
    ///
    /// The guard runs on every dispatch of `C` that reaches it, so side
    /// effects in it (such as counting) happen once per such dispatch.
    pub fn transit_to_if<G>(self, target: S, guard: G) -> StateGroupBuilder<S>
    where
        G: Fn() -> bool + Send + Sync + 'static,
    {
        self.transit_with(target, TransitionGuard::new(guard))
    }

    /// Move to `target` when `C` arrives and `guard` is satisfied.
    pub fn transit_with(mut self, target: S, guard: TransitionGuard) -> StateGroupBuilder<S> {
        self.group
            .configuration
            .add_transition(self.id, StateTransition::new(target, guard));
        self.group
    }
}
