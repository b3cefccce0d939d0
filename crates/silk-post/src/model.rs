//! Typed post models
//!
//! A model is a Rust type bound to one post type. The post type id is either
//! pinned with [`PostModel::POST_TYPE`] or derived from the type's own name:
//!
//! ```ignore
//! struct Dinosaur(Post);
//!
//! impl PostModel for Dinosaur {
//!     fn from_post_unchecked(post: Post) -> Self { Dinosaur(post) }
//!     fn post(&self) -> &Post { &self.0 }
//! }
//!
//! assert_eq!(Dinosaur::post_type_id(), "dinosaur");
//! ```

use std::any::type_name;

use heck::ToSnakeCase;
use tracing::debug;

use crate::{
    error::{PostError, Result},
    post::Post,
    post_type::PostTypeBuilder,
};

/// Unqualified name of `T`, without module path or generic arguments
pub fn short_type_name<T: ?Sized>() -> &'static str {
    let full = type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// Post type id derived from a type name: `ModelTestPostType` → `model_test_post_type`
pub fn class_name_as_post_type<T: ?Sized>() -> String {
    short_type_name::<T>().to_snake_case()
}

/// A type that models posts of a single post type
pub trait PostModel: Sized {
    /// Fixed post type id; `None` derives it from the type name
    const POST_TYPE: Option<&'static str> = None;

    /// Build the model without checking the post type
    fn from_post_unchecked(post: Post) -> Self;

    /// The underlying post
    fn post(&self) -> &Post;

    /// Post type id this model maps
    fn post_type_id() -> String {
        Self::POST_TYPE
            .map(str::to_string)
            .unwrap_or_else(class_name_as_post_type::<Self>)
    }

    /// Build the model, failing if the post is of another type
    fn from_post(post: Post) -> Result<Self> {
        let expected = Self::post_type_id();

        if post.post_type != expected {
            debug!(
                model = short_type_name::<Self>(),
                given = %post.post_type,
                expected = %expected,
                "Post type mismatch"
            );
            return Err(PostError::ModelPostTypeMismatch {
                model_class: short_type_name::<Self>().to_string(),
                given_post_type: post.post_type,
                model_post_type: expected,
            });
        }

        Ok(Self::from_post_unchecked(post))
    }

    /// Builder for registering this model's post type with the host
    fn post_type() -> PostTypeBuilder {
        PostTypeBuilder::new(Self::post_type_id())
    }
}
