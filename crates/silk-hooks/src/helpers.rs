//! Shorthand functions for common hook chores

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::{
    callback::IntoCallback,
    dispatcher::{HookDispatcher, Listener},
    error::Result,
    hook::Hook,
};

/// Create a hook, set its callback and start listening in one call
///
/// ```ignore
/// let hook = on(dispatcher.clone(), "init", || println!("ready"), 10)?;
/// ```
pub fn on<F, M>(
    dispatcher: Arc<dyn HookDispatcher>,
    handle: impl Into<String>,
    callback: F,
    priority: i32,
) -> Result<Hook>
where
    F: IntoCallback<M>,
{
    Hook::new(dispatcher, handle, priority)
        .set_callback(callback)
        .listen()
}

/// Outcome of [`off`]
#[derive(Debug)]
pub enum Off {
    /// The listener was registered and has been removed
    Removed,

    /// The listener was not registered; this hook removes it once it shows up
    Deferred(Hook),
}

impl Off {
    /// Whether the listener was removed immediately
    pub fn is_removed(&self) -> bool {
        matches!(self, Off::Removed)
    }

    /// The hook watching for the listener, if removal was deferred
    pub fn hook(&self) -> Option<&Hook> {
        match self {
            Off::Removed => None,
            Off::Deferred(hook) => Some(hook),
        }
    }
}

/// Remove a listener now, or as soon as it gets registered
///
/// If `listener` is attached to `handle` at `priority` it is removed right
/// away. Otherwise a hook is registered one priority step earlier; the first
/// time it sees the listener attached at `priority` it removes it, before the
/// listener gets a chance to run. Filter values pass through that hook
/// unchanged.
pub fn off(
    dispatcher: Arc<dyn HookDispatcher>,
    handle: &str,
    listener: Arc<dyn Listener>,
    priority: i32,
) -> Result<Off> {
    if dispatcher.remove_listener(handle, &listener, priority) {
        return Ok(Off::Removed);
    }

    debug!(
        handle = %handle,
        listener = %listener.label(),
        priority = priority,
        "Listener not registered, deferring removal"
    );

    // weak: the dispatcher ends up owning this hook
    let remover = {
        let dispatcher = Arc::downgrade(&dispatcher);
        let handle = handle.to_string();
        let listener = listener.clone();
        move |args: &[Value]| {
            if let Some(dispatcher) = dispatcher.upgrade() {
                dispatcher.remove_listener(&handle, &listener, priority);
            }
            args.first().cloned().unwrap_or(Value::Null)
        }
    };
    let present = {
        let dispatcher = Arc::downgrade(&dispatcher);
        let handle = handle.to_string();
        move |_: &[Value]| {
            dispatcher
                .upgrade()
                .is_some_and(|d| d.is_registered_at(&handle, &listener, priority))
        }
    };

    Hook::new(dispatcher, handle, priority.saturating_sub(1))
        .set_callback(remover)
        .only_if(present)
        .once()
        .listen()
        .map(Off::Deferred)
}
