//! Typed command handlers and their type-erased storage form.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Callback reacting to one command type while a state is active.
///
/// Handlers never change the active state; state changes go exclusively
/// through registered transitions.
///
/// # Example
///
/// ```rust
/// use switchyard::core::CommandHandler;
/// use std::sync::atomic::{AtomicU32, Ordering};
/// use std::sync::Arc;
///
/// struct Deposit(u32);
///
/// let balance = Arc::new(AtomicU32::new(0));
/// let account = Arc::clone(&balance);
/// let handler = CommandHandler::new(move |cmd: &Deposit| {
///     account.fetch_add(cmd.0, Ordering::SeqCst);
/// });
///
/// handler.handle(&Deposit(5));
/// assert_eq!(balance.load(Ordering::SeqCst), 5);
/// ```
pub struct CommandHandler<C> {
    callback: Arc<dyn Fn(&C) + Send + Sync>,
}

impl<C: 'static> CommandHandler<C> {
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&C) + Send + Sync + 'static,
    {
        Self {
            callback: Arc::new(callback),
        }
    }

    /// Invoke the wrapped callback.
    pub fn handle(&self, command: &C) {
        (self.callback)(command)
    }

    /// Erase the command type so handlers for different commands can share
    /// one dispatch table.
    pub fn erase(self) -> ErasedHandler {
        ErasedHandler {
            inner: Arc::new(self),
        }
    }
}

impl<C> Clone for CommandHandler<C> {
    fn clone(&self) -> Self {
        Self {
            callback: Arc::clone(&self.callback),
        }
    }
}

/// A [`CommandHandler`] with its command type erased.
///
/// Recovered with [`ErasedHandler::downcast`]. Dispatch tables place a handler
/// for command type `C` only in the slot whose id belongs to `C`, so the
/// downcast at that slot always matches.
#[derive(Clone)]
pub struct ErasedHandler {
    inner: Arc<dyn Any + Send + Sync>,
}

impl ErasedHandler {
    pub fn downcast<C: 'static>(&self) -> Option<&CommandHandler<C>> {
        self.inner.downcast_ref::<CommandHandler<C>>()
    }
}

impl fmt::Debug for ErasedHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErasedHandler").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Rename(String);
    struct Delete;

    #[test]
    fn handler_receives_command() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&seen);
        let handler = CommandHandler::new(move |cmd: &Rename| {
            log.lock().unwrap().push(cmd.0.clone());
        });

        handler.handle(&Rename("draft".to_string()));
        handler.handle(&Rename("final".to_string()));

        assert_eq!(*seen.lock().unwrap(), vec!["draft", "final"]);
    }

    #[test]
    fn erased_handler_downcasts_to_its_command_type() {
        let seen = Arc::new(Mutex::new(None));
        let slot = Arc::clone(&seen);
        let erased = CommandHandler::new(move |cmd: &Rename| {
            *slot.lock().unwrap() = Some(cmd.0.clone());
        })
        .erase();

        erased
            .downcast::<Rename>()
            .expect("handler was built for Rename")
            .handle(&Rename("renamed".to_string()));

        assert_eq!(seen.lock().unwrap().as_deref(), Some("renamed"));
    }

    #[test]
    fn erased_handler_rejects_other_types() {
        let erased = CommandHandler::new(|_: &Rename| {}).erase();

        assert!(erased.downcast::<Delete>().is_none());
    }
}
