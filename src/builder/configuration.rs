//! Builder-time, mutable per-state configuration.

use crate::core::{CommandTypeId, ErasedHandler, State, StateTransition};
use crate::runtime::{StateAction, StateDefinition};
use std::collections::HashMap;

/// Accumulated configuration of one state (or one group of states).
///
/// Several configurations for the same state are combined with
/// [`StateConfiguration::merge`]:
/// - handlers: last registration for a command type wins
/// - transitions: appended, registration order preserved
/// - enter/exit: a later callback replaces an earlier one; an absent one
///   leaves the earlier one in place
#[derive(Clone)]
pub struct StateConfiguration<S: State> {
    handlers: HashMap<CommandTypeId, ErasedHandler>,
    transitions: HashMap<CommandTypeId, Vec<StateTransition<S>>>,
    on_enter: Option<StateAction>,
    on_exit: Option<StateAction>,
}

impl<S: State> StateConfiguration<S> {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            transitions: HashMap::new(),
            on_enter: None,
            on_exit: None,
        }
    }

    pub fn set_on_enter(&mut self, action: StateAction) {
        self.on_enter = Some(action);
    }

    pub fn set_on_exit(&mut self, action: StateAction) {
        self.on_exit = Some(action);
    }

    /// Register the handler for `id`, replacing any earlier one.
    ///
    /// `handler` must have been built for the command type owning `id`.
    pub fn add_handler(&mut self, id: CommandTypeId, handler: ErasedHandler) {
        self.handlers.insert(id, handler);
    }

    /// Append a transition for `id` after those already registered.
    pub fn add_transition(&mut self, id: CommandTypeId, transition: StateTransition<S>) {
        self.transitions.entry(id).or_default().push(transition);
    }

    /// Fold `other` into `self`.
    pub fn merge(&mut self, other: &StateConfiguration<S>) {
        for (id, handler) in &other.handlers {
            self.handlers.insert(*id, handler.clone());
        }

        for (id, transitions) in &other.transitions {
            self.transitions
                .entry(*id)
                .or_default()
                .extend(transitions.iter().cloned());
        }

        if let Some(action) = &other.on_enter {
            self.on_enter = Some(action.clone());
        }
        if let Some(action) = &other.on_exit {
            self.on_exit = Some(action.clone());
        }
    }

    pub fn has_handler(&self, id: CommandTypeId) -> bool {
        self.handlers.contains_key(&id)
    }

    pub fn transitions_for(&self, id: CommandTypeId) -> &[StateTransition<S>] {
        self.transitions
            .get(&id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn has_on_enter(&self) -> bool {
        self.on_enter.is_some()
    }

    pub fn has_on_exit(&self) -> bool {
        self.on_exit.is_some()
    }

    /// Lay the configuration out into dense tables of `slots` entries.
    ///
    /// `slots` is the registry length at build time; ids at or past it
    /// cannot occur for configurations built against the same registry.
    pub fn compile(self, state: S, slots: usize) -> StateDefinition<S> {
        let mut handlers: Vec<Option<ErasedHandler>> = vec![None; slots];
        for (id, handler) in self.handlers {
            if let Some(slot) = handlers.get_mut(id.index()) {
                *slot = Some(handler);
            }
        }

        let mut transitions: Vec<Vec<StateTransition<S>>> = vec![Vec::new(); slots];
        for (id, registered) in self.transitions {
            if let Some(slot) = transitions.get_mut(id.index()) {
                *slot = registered;
            }
        }

        StateDefinition::new(state, handlers, transitions, self.on_enter, self.on_exit)
    }
}

impl<S: State> Default for StateConfiguration<S> {
    fn default() -> Self {
        Self::new()
    }
}
