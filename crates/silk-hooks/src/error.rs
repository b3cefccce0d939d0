//! Error types for hook mediation
//!
//! Errors fall into two groups:
//!
//! 1. **Registration and configuration errors**: the host dispatcher rejected a
//!    handle, a mediator was dispatched before a callback was set, or a config
//!    file could not be read or parsed.
//!
//! 2. **Callback errors**: whatever the user callback returned as an error. These
//!    are carried through [`HooksError::Callback`] transparently, so `Display`
//!    and `source()` are those of the original error and callers can recover it
//!    with [`HooksError::into_callback_error`].
//!
//! # Examples
//!
//! ```ignore
//! match dispatcher.do_action("save_post", vec![json!(42)]) {
//!     Ok(()) => {}
//!     Err(HooksError::Callback(e)) => eprintln!("listener failed: {}", e),
//!     Err(e) => eprintln!("dispatch error: {}", e),
//! }
//! ```

use thiserror::Error;

/// Boxed error returned by user callbacks
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while registering, configuring or invoking hooks
#[derive(Debug, Error)]
pub enum HooksError {
    /// The dispatcher refused a handle
    ///
    /// Handles must be non-empty and must not consist only of whitespace.
    #[error("Invalid hook handle: {0:?}")]
    InvalidHandle(String),

    /// A mediator was invoked before `set_callback` was called
    ///
    /// The string contains the handle the mediator listens on.
    #[error("No callback set for hook: {0}")]
    CallbackNotSet(String),

    /// A typed callback received fewer arguments than it declares
    #[error("Callback expects {expected} arguments, {given} given")]
    ArgumentCount {
        /// Declared parameter count
        expected: usize,
        /// Arguments actually passed by the dispatcher
        given: usize,
    },

    /// Invalid configuration value
    #[error("Invalid hook configuration: {0}")]
    InvalidConfiguration(String),

    /// IO error while reading configuration
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parse error while reading configuration
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_yaml::Error),

    /// Error raised by a user callback, passed through unchanged
    #[error(transparent)]
    Callback(BoxError),
}

impl HooksError {
    /// Wrap an arbitrary user error
    pub fn callback<E>(error: E) -> Self
    where
        E: Into<BoxError>,
    {
        HooksError::Callback(error.into())
    }

    /// Whether this error originated inside a user callback
    pub fn is_callback(&self) -> bool {
        matches!(self, HooksError::Callback(_))
    }

    /// Recover the user's original error, if this is one
    pub fn into_callback_error(self) -> Option<BoxError> {
        match self {
            HooksError::Callback(e) => Some(e),
            _ => None,
        }
    }
}

/// Result type for hook operations
pub type Result<T> = std::result::Result<T, HooksError>;
