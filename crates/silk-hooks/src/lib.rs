//! Silk Hooks
//!
//! Fluent, testable callback registration on top of a host's hook dispatcher.
//!
//! # Overview
//!
//! Host systems expose a procedural hook API: attach a callable to a named
//! handle at some priority, and the host calls it whenever the handle is
//! dispatched. This crate puts a [`Hook`] between the host and the user
//! callback. The hook adds:
//!
//! - **Iteration limits**: [`Hook::once`], [`Hook::only_x_times`], [`Hook::bypass`]
//! - **Conditional gating**: [`Hook::only_if`]
//! - **Arity adaptation**: callbacks only receive as many arguments as they declare
//! - **Priority re-registration**: [`Hook::with_priority`]
//!
//! # Architecture
//!
//! 1. **Hook** (`hook`): the callback mediator
//! 2. **Callback** (`callback`): user callables with wrap-time arity
//! 3. **Conditions** (`condition`): gating predicates
//! 4. **Dispatcher** (`dispatcher`): the host seam, plus an in-memory host
//! 5. **Helpers** (`helpers`): [`on`] and [`off`] shorthands
//! 6. **Configuration** (`config`): default priority and argument count
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use serde_json::{json, Value};
//! use silk_hooks::{Hook, HookDispatcher, InMemoryDispatcher};
//!
//! let dispatcher = Arc::new(InMemoryDispatcher::new());
//!
//! let hook = Hook::on(dispatcher.clone(), "save_post")
//!     .set_callback(|post_id: Value| println!("saved {}", post_id))
//!     .only_if(|args| args.first().is_some_and(Value::is_number))
//!     .only_x_times(3)
//!     .listen()?;
//!
//! dispatcher.do_action("save_post", vec![json!(42)])?;
//! assert_eq!(hook.iterations(), 1);
//! # Ok::<(), silk_hooks::HooksError>(())
//! ```
//!
//! # Error Handling
//!
//! Operations return [`Result<T>`], an alias for
//! `std::result::Result<T, HooksError>`. Errors raised by user callbacks travel
//! back through the dispatcher unchanged in [`HooksError::Callback`].

pub mod callback;
pub mod condition;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod helpers;
pub mod hook;

pub use callback::{Callback, CallbackKind, CallbackOutput, CallbackResult, IntoCallback};
pub use condition::Condition;
pub use config::{ConfigLoader, HookConfig, DEFAULT_ACCEPTED_ARGS, DEFAULT_PRIORITY};
pub use dispatcher::{HookDispatcher, InMemoryDispatcher, Listener};
pub use error::{BoxError, HooksError, Result};
pub use helpers::{off, on, Off};
pub use hook::Hook;
