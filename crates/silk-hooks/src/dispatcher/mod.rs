//! Host dispatcher seam
//!
//! The dispatcher owns the registration table: which listeners are attached to
//! which handle, at which priority, and how many arguments each accepts. A
//! [`Hook`](crate::Hook) never keeps global state of its own; it is handed an
//! `Arc<dyn HookDispatcher>` and registers itself through it.
//!
//! Two dispatch styles exist:
//!
//! * **Actions** ([`HookDispatcher::do_action`]): every listener is called with
//!   the arguments, return values are ignored.
//! * **Filters** ([`HookDispatcher::apply_filters`]): the first argument is
//!   threaded through the listeners, each receiving the previous listener's
//!   return value.
//!
//! Listeners run in ascending priority order, ties in registration order.
//!
//! # Examples
//!
//! ```ignore
//! let dispatcher = InMemoryDispatcher::new();
//! let listener: Arc<dyn Listener> = Arc::new(Callback::new(|v: Value| v));
//!
//! dispatcher.add_listener("the_title", listener.clone(), 10, 1)?;
//! let title = dispatcher.apply_filters("the_title", json!("Hello"), vec![])?;
//! ```

pub mod memory;

pub use memory::InMemoryDispatcher;

use std::sync::Arc;

use serde_json::Value;

use crate::{callback::CallbackResult, error::Result};

/// Something the dispatcher can call
///
/// Listener identity is the `Arc` allocation it is registered with: removing a
/// listener requires the same `Arc` (or a clone of it).
pub trait Listener: Send + Sync {
    /// Handle a dispatch with the (already truncated) argument list
    fn call(&self, args: &[Value]) -> CallbackResult;

    /// Human-readable name used in log output
    fn label(&self) -> String;
}

/// Registration and dispatch capability of a host system
pub trait HookDispatcher: Send + Sync {
    /// Attach a listener to a handle
    ///
    /// Re-adding the same listener at the same priority on the same handle is a
    /// no-op that keeps the original position.
    ///
    /// # Errors
    ///
    /// Returns [`HooksError::InvalidHandle`](crate::HooksError::InvalidHandle) if
    /// the handle is empty or blank.
    fn add_listener(
        &self,
        handle: &str,
        listener: Arc<dyn Listener>,
        priority: i32,
        accepted_args: usize,
    ) -> Result<()>;

    /// Detach a listener registered at `priority`
    ///
    /// Returns whether anything was removed.
    fn remove_listener(&self, handle: &str, listener: &Arc<dyn Listener>, priority: i32) -> bool;

    /// Whether any listener is attached to the handle
    fn has_listeners(&self, handle: &str) -> bool;

    /// Priority the listener is registered at, if it is registered
    ///
    /// A listener attached at several priorities reports the earliest one.
    fn listener_priority(&self, handle: &str, listener: &Arc<dyn Listener>) -> Option<i32>;

    /// Whether the listener is attached to the handle at exactly `priority`
    fn is_registered_at(&self, handle: &str, listener: &Arc<dyn Listener>, priority: i32) -> bool;

    /// Call every listener on the handle, discarding return values
    fn do_action(&self, handle: &str, args: Vec<Value>) -> Result<()>;

    /// Thread `value` through every listener on the handle
    fn apply_filters(&self, handle: &str, value: Value, args: Vec<Value>) -> Result<Value>;
}

/// Compare listeners by allocation, ignoring vtable metadata
pub(crate) fn same_listener(a: &Arc<dyn Listener>, b: &Arc<dyn Listener>) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}
