//! State machine dispatching commands to the active state.

use crate::core::{CommandTypeRegistry, State, StateHistory, TransitionRecord};
use crate::runtime::definition::StateDefinition;
use crate::runtime::error::MachineError;
use chrono::Utc;
use std::any::type_name;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, trace};

/// Compiled state machine.
///
/// Exactly one state is active at any time. Commands are routed by their
/// dense type id: the active state's transition table is consulted first,
/// then the handler of whichever state is active afterwards receives the
/// command.
///
/// Driving a machine needs `&mut self`; sharing one between threads requires
/// external synchronization.
pub struct StateMachine<S: State> {
    registry: Arc<CommandTypeRegistry>,
    definitions: Vec<StateDefinition<S>>,
    index: HashMap<S, usize>,
    current: usize,
    history: StateHistory<S>,
}

impl<S: State> StateMachine<S> {
    /// Create a machine and enter `initial`.
    ///
    /// Fails when `initial` has no definition. The initial state's enter
    /// callback runs before this returns.
    pub fn new(
        registry: Arc<CommandTypeRegistry>,
        definitions: Vec<StateDefinition<S>>,
        initial: S,
        history: StateHistory<S>,
    ) -> Result<Self, MachineError> {
        let index: HashMap<S, usize> = definitions
            .iter()
            .enumerate()
            .map(|(position, definition)| (definition.state().clone(), position))
            .collect();

        let current = *index.get(&initial).ok_or_else(|| MachineError::UnknownState {
            state: initial.name().to_string(),
        })?;

        let machine = Self {
            registry,
            definitions,
            index,
            current,
            history,
        };

        debug!(state = initial.name(), "Entering initial state");
        machine.definitions[machine.current].enter();

        Ok(machine)
    }

    /// The active state.
    pub fn current_state(&self) -> &S {
        self.definitions[self.current].state()
    }

    /// Every configured state.
    pub fn states(&self) -> impl Iterator<Item = &S> {
        self.definitions.iter().map(StateDefinition::state)
    }

    pub fn is_configured(&self, state: &S) -> bool {
        self.index.contains_key(state)
    }

    /// Whether the active state has a handler or a transition for `C`.
    ///
    /// Guards are not evaluated.
    pub fn can_handle<C: 'static>(&self) -> bool {
        self.registry
            .lookup::<C>()
            .is_some_and(|id| self.definitions[self.current].reacts_to(id))
    }

    pub fn history(&self) -> &StateHistory<S> {
        &self.history
    }

    pub fn registry(&self) -> &Arc<CommandTypeRegistry> {
        &self.registry
    }

    /// Dispatch a command.
    ///
    /// 1. The active state's transitions for `C` are checked in registration
    ///    order; the first one whose guard passes is taken.
    /// 2. The handler for `C` of the state active *after* step 1 runs.
    ///
    /// Commands the active state does not know are silently ignored.
    pub fn handle<C: 'static>(&mut self, command: C) {
        if self.dispatch(&command) == Dispatch::Absorbed {
            trace!(
                command = type_name::<C>(),
                state = self.current_state().name(),
                "Command absorbed by active state"
            );
        }
    }

    fn dispatch<C: 'static>(&mut self, command: &C) -> Dispatch {
        let Some(id) = self.registry.lookup::<C>() else {
            return Dispatch::Absorbed;
        };

        let target = self.definitions[self.current]
            .try_get_transition(id)
            .map(|transition| transition.target().clone());

        let transitioned = match target {
            Some(target) => match self.switch_to(target, Some(type_name::<C>())) {
                Ok(()) => true,
                Err(err) => {
                    error!(%err, command = type_name::<C>(), "Transition target missing");
                    false
                }
            },
            None => false,
        };

        let handled = self.definitions[self.current].handle(id, command);

        match (transitioned, handled) {
            (false, false) => Dispatch::Absorbed,
            (true, false) => Dispatch::Transitioned,
            (_, true) => Dispatch::Handled,
        }
    }

    /// Move to `state` without evaluating any guard.
    ///
    /// Runs the current state's exit callback, then the target's enter
    /// callback. Transitioning to the active state exits and re-enters it.
    /// An unknown target leaves the machine untouched.
    pub fn transit_to(&mut self, state: S) -> Result<(), MachineError> {
        self.switch_to(state, None)
    }

    fn switch_to(&mut self, target: S, command: Option<&'static str>) -> Result<(), MachineError> {
        let next = *self
            .index
            .get(&target)
            .ok_or_else(|| MachineError::UnknownState {
                state: target.name().to_string(),
            })?;

        let from = self.current;
        self.definitions[from].exit();
        self.current = next;

        debug!(
            from = self.definitions[from].state().name(),
            to = target.name(),
            command = command.unwrap_or("<explicit>"),
            "State transition"
        );
        if self.history.is_enabled() {
            self.history.record(TransitionRecord {
                from: self.definitions[from].state().clone(),
                to: target,
                command: command.map(str::to_string),
                timestamp: Utc::now(),
            });
        }

        self.definitions[self.current].enter();
        Ok(())
    }
}

/// What a single dispatch did to the machine.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Dispatch {
    /// Neither a transition fired nor a handler ran.
    Absorbed,
    /// A transition fired; the new state has no handler for the command.
    Transitioned,
    /// The (possibly new) active state's handler ran.
    Handled,
}

impl<S: State> fmt::Debug for StateMachine<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("current", self.current_state())
            .field("definitions", &self.definitions)
            .field("history", &self.history.len())
            .finish()
    }
}
