//! Ordered list of pre-execution callbacks.
//!
//! Hooks are registered and removed explicitly; nothing is installed by merely
//! linking the crate. Firing runs every hook in registration order, on the
//! calling thread, before the statement is dispatched.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use log::debug;

use crate::query::Statement;

/// Callback run immediately before a statement is executed.
///
/// Hooks observe the statement; they cannot alter or veto it.
pub trait BeforeExecute: Send + Sync {
    fn name(&self) -> &str;

    fn before_execute(&self, statement: &Statement);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookId(u64);

#[derive(Default)]
pub struct HookRegistry {
    hooks: RwLock<Vec<(HookId, Arc<dyn BeforeExecute>)>>,
    next_id: AtomicU64,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, hook: Arc<dyn BeforeExecute>) -> HookId {
        let id = HookId(self.next_id.fetch_add(1, Ordering::Relaxed));
        debug!("Registering before-execute hook '{}'", hook.name());
        self.hooks
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, hook));
        id
    }

    /// Returns false when the hook was not registered.
    pub fn remove(&self, id: HookId) -> bool {
        let mut hooks = self.hooks.write().unwrap_or_else(PoisonError::into_inner);
        let before = hooks.len();
        hooks.retain(|(hook_id, _)| *hook_id != id);
        hooks.len() != before
    }

    pub fn len(&self) -> usize {
        self.hooks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run every hook against `statement`. A panicking hook is contained and
    /// the remaining hooks still run.
    pub fn fire(&self, statement: &Statement) {
        // Snapshot so hooks may (un)register without deadlocking.
        let hooks: Vec<Arc<dyn BeforeExecute>> = self
            .hooks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, hook)| Arc::clone(hook))
            .collect();

        for hook in hooks {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| hook.before_execute(statement)));
            if outcome.is_err() {
                debug!("Before-execute hook '{}' panicked; ignored", hook.name());
            }
        }
    }
}

impl std::fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let hooks = self.hooks.read().unwrap_or_else(PoisonError::into_inner);
        f.debug_list()
            .entries(hooks.iter().map(|(id, hook)| (id.0, hook.name().to_string())))
            .finish()
    }
}
