//! Compiled, immutable per-state dispatch tables.

use crate::core::{CommandTypeId, ErasedHandler, State, StateTransition};
use std::any::type_name;
use std::fmt;
use std::sync::Arc;
use tracing::error;

/// Enter/exit callback attached to a state.
pub type StateAction = Arc<dyn Fn() + Send + Sync>;

/// Dispatch tables of one state.
///
/// Both tables are indexed by [`CommandTypeId`] and sized to the registry's
/// length at build time. An id beyond the table or an empty slot means the
/// state does not react to that command.
pub struct StateDefinition<S: State> {
    state: S,
    handlers: Box<[Option<ErasedHandler>]>,
    transitions: Box<[Vec<StateTransition<S>>]>,
    on_enter: Option<StateAction>,
    on_exit: Option<StateAction>,
}

impl<S: State> StateDefinition<S> {
    pub fn new(
        state: S,
        handlers: Vec<Option<ErasedHandler>>,
        transitions: Vec<Vec<StateTransition<S>>>,
        on_enter: Option<StateAction>,
        on_exit: Option<StateAction>,
    ) -> Self {
        Self {
            state,
            handlers: handlers.into_boxed_slice(),
            transitions: transitions.into_boxed_slice(),
            on_enter,
            on_exit,
        }
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    /// Run the enter callback, if any.
    pub fn enter(&self) {
        if let Some(action) = &self.on_enter {
            action();
        }
    }

    /// Run the exit callback, if any.
    pub fn exit(&self) {
        if let Some(action) = &self.on_exit {
            action();
        }
    }

    /// First transition for `id` whose guard passes.
    ///
    /// Guards are evaluated in registration order and evaluation stops at
    /// the first match, so guards after it observe no call.
    pub fn try_get_transition(&self, id: CommandTypeId) -> Option<&StateTransition<S>> {
        self.transitions
            .get(id.index())?
            .iter()
            .find(|transition| transition.can_fire())
    }

    /// Invoke the handler registered for `id`.
    ///
    /// Returns `false` when the state has no handler for the command.
    pub fn handle<C: 'static>(&self, id: CommandTypeId, command: &C) -> bool {
        let Some(Some(erased)) = self.handlers.get(id.index()) else {
            return false;
        };

        match erased.downcast::<C>() {
            Some(handler) => {
                handler.handle(command);
                true
            }
            None => {
                error!(
                    id = id.index(),
                    command = type_name::<C>(),
                    "Handler slot holds a different command type"
                );
                false
            }
        }
    }

    /// Whether `id` has a handler or at least one transition in this state.
    pub fn reacts_to(&self, id: CommandTypeId) -> bool {
        let has_handler = matches!(self.handlers.get(id.index()), Some(Some(_)));
        let has_transition = self
            .transitions
            .get(id.index())
            .is_some_and(|slot| !slot.is_empty());
        has_handler || has_transition
    }

    /// Every registered transition with the id of the command triggering it.
    pub fn transitions(&self) -> impl Iterator<Item = (CommandTypeId, &StateTransition<S>)> {
        self.transitions
            .iter()
            .enumerate()
            .flat_map(|(index, slot)| {
                slot.iter()
                    .map(move |transition| (CommandTypeId::from_index(index), transition))
            })
    }
}

impl<S: State> fmt::Debug for StateDefinition<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateDefinition")
            .field("state", &self.state)
            .field(
                "handlers",
                &self.handlers.iter().filter(|h| h.is_some()).count(),
            )
            .field("transitions", &self.transitions().count())
            .field("on_enter", &self.on_enter.is_some())
            .field("on_exit", &self.on_exit.is_some())
            .finish()
    }
}
