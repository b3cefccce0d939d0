//! Callback mediator
//!
//! A [`Hook`] registers itself with a [`HookDispatcher`] and stands between the
//! dispatcher and a user [`Callback`]. On every dispatch it:
//!
//! 1. evaluates its conditions in order (the iteration limit first, then any
//!    [`Hook::only_if`] predicates) and stops at the first that fails,
//! 2. if gated, hands the first argument back untouched,
//! 3. otherwise trims the arguments to the callback's arity, bumps the
//!    invocation counter and returns whatever the callback returns.
//!
//! Callback errors are returned to the dispatcher as they are.
//!
//! # Examples
//!
//! ```ignore
//! use std::sync::Arc;
//! use serde_json::{json, Value};
//! use silk_hooks::{Hook, HookDispatcher, InMemoryDispatcher};
//!
//! let dispatcher = Arc::new(InMemoryDispatcher::new());
//!
//! Hook::on(dispatcher.clone(), "the_title")
//!     .set_callback(|title: Value| format!("{}!", title.as_str().unwrap_or_default()))
//!     .once()
//!     .listen()?;
//!
//! assert_eq!(dispatcher.apply_filters("the_title", json!("Hi"), vec![])?, json!("Hi!"));
//! assert_eq!(dispatcher.apply_filters("the_title", json!("Hi"), vec![])?, json!("Hi"));
//! ```

use std::{fmt, sync::Arc};

use parking_lot::Mutex;
use serde_json::Value;
use tracing::{debug, trace};
use uuid::Uuid;

use crate::{
    callback::{Callback, CallbackResult, IntoCallback},
    condition::{first_failing, Condition},
    config::HookConfig,
    dispatcher::{HookDispatcher, Listener},
    error::{HooksError, Result},
};

/// Fluent handle on a mediated callback
///
/// Cloning a `Hook` yields another handle on the same mediator; configuration
/// made through any clone is seen by the dispatcher. Dropping every handle does
/// not unregister the mediator: a listening dispatcher keeps it alive.
#[derive(Clone)]
pub struct Hook {
    mediator: Arc<Mediator>,
    dispatcher: Arc<dyn HookDispatcher>,
}

struct Mediator {
    id: Uuid,
    handle: String,
    accepted_args: usize,
    state: Mutex<MediatorState>,
}

#[derive(Debug)]
struct MediatorState {
    callback: Option<Callback>,
    priority: i32,
    registered_priority: Option<i32>,
    iterations: u64,
    max_iterations: Option<u64>,
    conditions: Vec<Condition>,
}

impl MediatorState {
    fn has_exceeded_iterations(&self) -> bool {
        self.max_iterations.is_some_and(|max| self.iterations >= max)
    }
}

impl Mediator {
    fn mediate(&self, args: &[Value]) -> CallbackResult {
        let given = args.first().cloned().unwrap_or(Value::Null);

        let (conditions, within_limit) = {
            let state = self.state.lock();
            (state.conditions.clone(), !state.has_exceeded_iterations())
        };

        // evaluated unlocked: predicates may touch this hook or dispatch again
        if let Some(index) = first_failing(&conditions, args, within_limit) {
            trace!(
                hook_id = %self.id,
                handle = %self.handle,
                condition = ?conditions[index],
                "Condition failed, bypassing callback"
            );
            return Ok(given);
        }

        let (callback, iteration) = {
            let mut state = self.state.lock();
            if state.has_exceeded_iterations() {
                trace!(
                    hook_id = %self.id,
                    handle = %self.handle,
                    "Iteration limit reached during condition checks, bypassing callback"
                );
                return Ok(given);
            }
            let callback = state
                .callback
                .clone()
                .ok_or_else(|| HooksError::CallbackNotSet(self.handle.clone()))?;
            state.iterations += 1;
            (callback, state.iterations)
        };

        let passed = match callback.arity() {
            0 => args,
            arity => &args[..arity.min(args.len())],
        };

        trace!(
            hook_id = %self.id,
            handle = %self.handle,
            callback = %callback.kind(),
            iteration = iteration,
            arg_count = passed.len(),
            "Invoking callback"
        );

        callback.invoke(passed)
    }
}

impl Listener for Mediator {
    fn call(&self, args: &[Value]) -> CallbackResult {
        self.mediate(args)
    }

    fn label(&self) -> String {
        format!("hook:{}#{}", self.handle, self.id)
    }
}

impl Hook {
    /// Create a hook on `handle` at the configured default priority
    pub fn on(dispatcher: Arc<dyn HookDispatcher>, handle: impl Into<String>) -> Self {
        Self::with_config(dispatcher, handle, &HookConfig::default())
    }

    /// Create a hook on `handle` at an explicit priority
    pub fn new(
        dispatcher: Arc<dyn HookDispatcher>,
        handle: impl Into<String>,
        priority: i32,
    ) -> Self {
        let config = HookConfig {
            default_priority: priority,
            ..HookConfig::default()
        };
        Self::with_config(dispatcher, handle, &config)
    }

    /// Create a hook using the given configuration defaults
    ///
    /// The hook always accepts at least one argument, so a gated filter can
    /// hand its value back.
    pub fn with_config(
        dispatcher: Arc<dyn HookDispatcher>,
        handle: impl Into<String>,
        config: &HookConfig,
    ) -> Self {
        let mediator = Mediator {
            id: Uuid::new_v4(),
            handle: handle.into(),
            accepted_args: config.accepted_args.max(1),
            state: Mutex::new(MediatorState {
                callback: None,
                priority: config.default_priority,
                registered_priority: None,
                iterations: 0,
                max_iterations: None,
                conditions: vec![Condition::IterationLimit],
            }),
        };

        Self {
            mediator: Arc::new(mediator),
            dispatcher,
        }
    }

    /// Set the callback invoked by the hook
    ///
    /// The callback's arity is computed here. Replacing a callback keeps the
    /// invocation count and conditions.
    pub fn set_callback<F, M>(self, callback: F) -> Self
    where
        F: IntoCallback<M>,
    {
        let callback = callback.into_callback();
        debug!(
            hook_id = %self.mediator.id,
            handle = %self.mediator.handle,
            callback = %callback.kind(),
            arity = callback.arity(),
            "Setting callback"
        );
        self.mediator.state.lock().callback = Some(callback);
        self
    }

    /// Register with the dispatcher at the current priority
    ///
    /// # Errors
    ///
    /// Returns whatever the dispatcher returns, typically
    /// [`HooksError::InvalidHandle`].
    pub fn listen(self) -> Result<Self> {
        let priority = self.mediator.state.lock().priority;

        self.dispatcher.add_listener(
            &self.mediator.handle,
            self.listener(),
            priority,
            self.mediator.accepted_args,
        )?;
        self.mediator.state.lock().registered_priority = Some(priority);

        debug!(
            hook_id = %self.mediator.id,
            handle = %self.mediator.handle,
            priority = priority,
            "Hook listening"
        );

        Ok(self)
    }

    /// Unregister from the dispatcher
    ///
    /// Uses the priority of the last [`Hook::listen`]; does nothing if the hook
    /// is not registered.
    pub fn remove(self) -> Self {
        let priority = {
            let mut state = self.mediator.state.lock();
            state.registered_priority.take().unwrap_or(state.priority)
        };

        let removed = self
            .dispatcher
            .remove_listener(&self.mediator.handle, &self.listener(), priority);

        debug!(
            hook_id = %self.mediator.id,
            handle = %self.mediator.handle,
            priority = priority,
            removed = removed,
            "Hook removed"
        );

        self
    }

    /// Limit the callback to a single invocation
    pub fn once(self) -> Self {
        self.only_x_times(1)
    }

    /// Limit the number of times the callback can be invoked
    ///
    /// `0` prevents any further invocation.
    pub fn only_x_times(self, times: u64) -> Self {
        self.mediator.state.lock().max_iterations = Some(times);
        self
    }

    /// Stop invoking the callback while staying registered
    pub fn bypass(self) -> Self {
        self.only_x_times(0)
    }

    /// Move the hook to another priority
    ///
    /// Removes the hook, updates the priority and listens again; the callback,
    /// conditions and counters are untouched.
    pub fn with_priority(self, priority: i32) -> Result<Self> {
        let hook = self.remove();
        hook.mediator.state.lock().priority = priority;
        hook.listen()
    }

    /// Add a condition controlling invocation of the callback
    ///
    /// If the predicate returns `false`, the callback is not invoked and the
    /// first argument is handed back unchanged.
    pub fn only_if<F>(self, predicate: F) -> Self
    where
        F: Fn(&[Value]) -> bool + Send + Sync + 'static,
    {
        self.mediator
            .state
            .lock()
            .conditions
            .push(Condition::predicate(predicate));
        self
    }

    /// Whether the callback has reached its iteration limit
    pub fn has_exceeded_iterations(&self) -> bool {
        self.mediator.state.lock().has_exceeded_iterations()
    }

    /// Run the mediation logic directly, as the dispatcher would
    pub fn mediate_invocation(&self, args: &[Value]) -> CallbackResult {
        self.mediator.mediate(args)
    }

    /// The mediator as registered with the dispatcher
    pub fn listener(&self) -> Arc<dyn Listener> {
        self.mediator.clone()
    }

    /// Whether the dispatcher currently has this hook registered
    pub fn is_listening(&self) -> bool {
        self.dispatcher
            .listener_priority(&self.mediator.handle, &self.listener())
            .is_some()
    }

    /// Unique id, used in log output
    pub fn id(&self) -> Uuid {
        self.mediator.id
    }

    /// Dispatch handle
    pub fn handle(&self) -> &str {
        &self.mediator.handle
    }

    /// Current priority
    pub fn priority(&self) -> i32 {
        self.mediator.state.lock().priority
    }

    /// Number of times the callback has been invoked
    pub fn iterations(&self) -> u64 {
        self.mediator.state.lock().iterations
    }

    /// Iteration bound, if one is set
    pub fn max_iterations(&self) -> Option<u64> {
        self.mediator.state.lock().max_iterations
    }
}

impl fmt::Debug for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.mediator.state.lock();
        f.debug_struct("Hook")
            .field("id", &self.mediator.id)
            .field("handle", &self.mediator.handle)
            .field("priority", &state.priority)
            .field("iterations", &state.iterations)
            .field("max_iterations", &state.max_iterations)
            .field("conditions", &state.conditions.len())
            .finish()
    }
}
