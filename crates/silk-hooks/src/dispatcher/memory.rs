//! In-memory dispatcher implementation

use std::{collections::HashMap, fmt, sync::Arc};

use parking_lot::RwLock;
use serde_json::Value;
use tracing::{debug, trace};

use super::{same_listener, HookDispatcher, Listener};
use crate::error::{HooksError, Result};

#[derive(Clone)]
struct Registration {
    id: u64,
    listener: Arc<dyn Listener>,
    priority: i32,
    accepted_args: usize,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("id", &self.id)
            .field("listener", &self.listener.label())
            .field("priority", &self.priority)
            .field("accepted_args", &self.accepted_args)
            .finish()
    }
}

#[derive(Debug, Default)]
struct Table {
    handles: HashMap<String, Vec<Registration>>,
    next_id: u64,
}

/// In-memory host dispatcher
///
/// Keeps one priority-ordered listener list per handle. Dispatch works on a
/// snapshot of the list and releases the lock before calling each listener, so
/// listeners may register, remove or dispatch re-entrantly. A listener removed
/// while a dispatch is in flight is skipped by that dispatch.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDispatcher {
    table: Arc<RwLock<Table>>,
}

impl InMemoryDispatcher {
    /// Create an empty dispatcher
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of listeners attached to a handle
    pub fn listener_count(&self, handle: &str) -> usize {
        self.table
            .read()
            .handles
            .get(handle)
            .map_or(0, |registrations| registrations.len())
    }

    fn snapshot(&self, handle: &str) -> Vec<Registration> {
        self.table
            .read()
            .handles
            .get(handle)
            .cloned()
            .unwrap_or_default()
    }

    fn is_registered(&self, handle: &str, id: u64) -> bool {
        self.table
            .read()
            .handles
            .get(handle)
            .is_some_and(|registrations| registrations.iter().any(|r| r.id == id))
    }

    fn run(&self, handle: &str, mut args: Vec<Value>, filter: bool) -> Result<Vec<Value>> {
        let registrations = self.snapshot(handle);

        if registrations.is_empty() {
            trace!(handle = %handle, "No listeners registered for handle");
            return Ok(args);
        }

        debug!(
            handle = %handle,
            listener_count = registrations.len(),
            filter = filter,
            "Dispatching"
        );

        for registration in registrations {
            if !self.is_registered(handle, registration.id) {
                trace!(
                    handle = %handle,
                    listener = %registration.listener.label(),
                    "Listener removed during dispatch, skipping"
                );
                continue;
            }

            let passed = accepted_slice(&args, registration.accepted_args);
            trace!(
                handle = %handle,
                listener = %registration.listener.label(),
                priority = registration.priority,
                arg_count = passed.len(),
                "Calling listener"
            );

            let output = registration.listener.call(passed)?;

            if filter {
                match args.first_mut() {
                    Some(first) => *first = output,
                    None => args.push(output),
                }
            }
        }

        Ok(args)
    }
}

fn accepted_slice(args: &[Value], accepted_args: usize) -> &[Value] {
    &args[..accepted_args.min(args.len())]
}

fn validate_handle(handle: &str) -> Result<()> {
    if handle.trim().is_empty() {
        return Err(HooksError::InvalidHandle(handle.to_string()));
    }
    Ok(())
}

impl HookDispatcher for InMemoryDispatcher {
    fn add_listener(
        &self,
        handle: &str,
        listener: Arc<dyn Listener>,
        priority: i32,
        accepted_args: usize,
    ) -> Result<()> {
        validate_handle(handle)?;

        let mut table = self.table.write();
        let id = table.next_id;
        let registrations = table.handles.entry(handle.to_string()).or_default();

        if registrations
            .iter()
            .any(|r| r.priority == priority && same_listener(&r.listener, &listener))
        {
            trace!(
                handle = %handle,
                listener = %listener.label(),
                priority = priority,
                "Listener already registered at priority"
            );
            return Ok(());
        }

        debug!(
            handle = %handle,
            listener = %listener.label(),
            priority = priority,
            accepted_args = accepted_args,
            "Adding listener"
        );

        let position = registrations.partition_point(|r| r.priority <= priority);
        registrations.insert(
            position,
            Registration {
                id,
                listener,
                priority,
                accepted_args,
            },
        );
        table.next_id += 1;

        Ok(())
    }

    fn remove_listener(&self, handle: &str, listener: &Arc<dyn Listener>, priority: i32) -> bool {
        let mut table = self.table.write();
        let Some(registrations) = table.handles.get_mut(handle) else {
            return false;
        };

        let before = registrations.len();
        registrations.retain(|r| !(r.priority == priority && same_listener(&r.listener, listener)));
        let removed = registrations.len() != before;

        if registrations.is_empty() {
            table.handles.remove(handle);
        }

        if removed {
            debug!(
                handle = %handle,
                listener = %listener.label(),
                priority = priority,
                "Removed listener"
            );
        }

        removed
    }

    fn has_listeners(&self, handle: &str) -> bool {
        self.listener_count(handle) > 0
    }

    fn listener_priority(&self, handle: &str, listener: &Arc<dyn Listener>) -> Option<i32> {
        self.table
            .read()
            .handles
            .get(handle)?
            .iter()
            .find(|r| same_listener(&r.listener, listener))
            .map(|r| r.priority)
    }

    fn is_registered_at(&self, handle: &str, listener: &Arc<dyn Listener>, priority: i32) -> bool {
        self.table.read().handles.get(handle).is_some_and(|registrations| {
            registrations
                .iter()
                .any(|r| r.priority == priority && same_listener(&r.listener, listener))
        })
    }

    fn do_action(&self, handle: &str, args: Vec<Value>) -> Result<()> {
        self.run(handle, args, false).map(|_| ())
    }

    fn apply_filters(&self, handle: &str, value: Value, args: Vec<Value>) -> Result<Value> {
        let mut all = Vec::with_capacity(args.len() + 1);
        all.push(value);
        all.extend(args);

        let mut all = self.run(handle, all, true)?;
        Ok(all.swap_remove(0))
    }
}
