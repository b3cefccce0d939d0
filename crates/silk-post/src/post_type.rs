//! Post type registration arguments

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{PostError, Result};

const MAX_POST_TYPE_ID_LEN: usize = 20;

/// Fluent builder for the arguments the host needs to register a post type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostTypeBuilder {
    id: String,
    args: Map<String, Value>,
}

impl PostTypeBuilder {
    /// Start a builder for the post type `id`
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            args: Map::new(),
        }
    }

    /// Post type id being registered
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Set an arbitrary registration argument
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.args.insert(key.into(), value.into());
        self
    }

    /// Whether the post type is publicly queryable
    pub fn public(self, public: bool) -> Self {
        self.set("public", public)
    }

    /// Human-readable name
    pub fn label(self, label: impl Into<String>) -> Self {
        self.set("label", label.into())
    }

    /// Features the post type supports (`title`, `editor`, ...)
    pub fn supports(self, features: &[&str]) -> Self {
        let features: Vec<Value> = features.iter().map(|f| Value::from(*f)).collect();
        self.set("supports", features)
    }

    /// Registration argument set under `key`
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.args.get(key)
    }

    /// All registration arguments set so far
    pub fn args(&self) -> &Map<String, Value> {
        &self.args
    }

    /// Check the id against the host's constraints
    pub fn validate(&self) -> Result<()> {
        let valid = !self.id.is_empty()
            && self.id.len() <= MAX_POST_TYPE_ID_LEN
            && self
                .id
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-');

        if !valid {
            return Err(PostError::InvalidPostTypeId(self.id.clone()));
        }
        Ok(())
    }

    /// Validated registration payload
    pub fn build(&self) -> Result<Value> {
        self.validate()?;
        Ok(serde_json::json!({
            "post_type": self.id,
            "args": self.args,
        }))
    }
}
