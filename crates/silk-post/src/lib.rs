//! Silk Posts
//!
//! Typed models over the host's post records.
//!
//! - [`Post`]: the raw record
//! - [`PostModel`]: binds a Rust type to one post type and refuses posts of
//!   any other type with [`PostError::ModelPostTypeMismatch`]
//! - [`PostTypeBuilder`]: registration arguments for a post type

pub mod error;
pub mod model;
pub mod post;
pub mod post_type;

pub use error::{PostError, Result};
pub use model::{class_name_as_post_type, short_type_name, PostModel};
pub use post::Post;
pub use post_type::PostTypeBuilder;
