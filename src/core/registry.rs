//! Command type registry.
//!
//! Maps each distinct command type to a dense integer id so that state
//! definitions can route commands with a plain slice index. Resolving the id
//! itself costs one shared read lock and one `TypeId` hash per dispatch; the
//! per-state tables are never searched.

use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};
use tracing::trace;

/// Dense, zero-based identifier of a command type.
///
/// Ids are handed out in first-use order (0, 1, 2, ...) with no gaps, and
/// never change for the lifetime of the registry that issued them.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct CommandTypeId(usize);

impl CommandTypeId {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index)
    }

    /// Slot index into per-state dispatch tables.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for CommandTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Default)]
struct RegistryInner {
    ids: HashMap<TypeId, CommandTypeId>,
    names: Vec<&'static str>,
}

/// Registry assigning dense ids to command types.
///
/// Most code uses the process-wide instance from [`CommandTypeRegistry::global`].
/// Independent registries can be created with [`CommandTypeRegistry::new`],
/// which keeps tests and embedded machines isolated from each other.
///
/// # Example
///
/// ```rust
/// use switchyard::core::CommandTypeRegistry;
///
/// struct Ping;
/// struct Pong;
///
/// let registry = CommandTypeRegistry::new();
/// let ping = registry.id_of::<Ping>();
/// let pong = registry.id_of::<Pong>();
///
/// assert_eq!(ping.index(), 0);
/// assert_eq!(pong.index(), 1);
/// assert_eq!(registry.id_of::<Ping>(), ping);
/// assert_eq!(registry.len(), 2);
/// ```
#[derive(Default)]
pub struct CommandTypeRegistry {
    inner: RwLock<RegistryInner>,
}

static GLOBAL: OnceLock<Arc<CommandTypeRegistry>> = OnceLock::new();

impl CommandTypeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry shared by builders that were not given one.
    pub fn global() -> Arc<CommandTypeRegistry> {
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(CommandTypeRegistry::new())))
    }

    /// Id of command type `C`, allocating the next dense id on first use.
    pub fn id_of<C: 'static>(&self) -> CommandTypeId {
        if let Some(id) = self.lookup::<C>() {
            return id;
        }

        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        // Another caller may have allocated between the read and write locks.
        if let Some(id) = inner.ids.get(&TypeId::of::<C>()) {
            return *id;
        }

        let id = CommandTypeId(inner.names.len());
        inner.ids.insert(TypeId::of::<C>(), id);
        inner.names.push(type_name::<C>());
        trace!(command = type_name::<C>(), id = id.index(), "Allocated command type id");
        id
    }

    /// Id of command type `C` if it has been referenced before.
    ///
    /// Never allocates, so the dispatch path cannot grow the registry.
    pub fn lookup<C: 'static>(&self) -> Option<CommandTypeId> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .ids
            .get(&TypeId::of::<C>())
            .copied()
    }

    /// Number of ids handed out so far.
    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .names
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Type name of the command registered under `id`.
    pub fn name_of(&self, id: CommandTypeId) -> Option<&'static str> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .names
            .get(id.index())
            .copied()
    }
}

impl fmt::Debug for CommandTypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("CommandTypeRegistry")
            .field("commands", &inner.names)
            .finish()
    }
}
