//! Error types for post models

use thiserror::Error;

/// Errors raised while mapping posts onto models
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PostError {
    /// A model was built from a post of the wrong type
    ///
    /// Raised by [`PostModel::from_post`](crate::PostModel::from_post) before the
    /// model exists; nothing is recovered internally.
    #[error("{model_class} instantiated with post of type \"{given_post_type}\", but requires a post of type \"{model_post_type}\".")]
    ModelPostTypeMismatch {
        /// Name of the model type
        model_class: String,
        /// Post type of the post that was given
        given_post_type: String,
        /// Post type the model requires
        model_post_type: String,
    },

    /// A post type id the host would refuse
    ///
    /// Ids must be 1 to 20 characters of lowercase letters, digits, `_` or `-`.
    #[error("Invalid post type id: {0:?}")]
    InvalidPostTypeId(String),
}

/// Result type for post operations
pub type Result<T> = std::result::Result<T, PostError>;
