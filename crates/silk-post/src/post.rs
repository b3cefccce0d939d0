//! Post record as handed over by the host

use serde::{Deserialize, Serialize};

fn default_status() -> String {
    "draft".to_string()
}

/// A content object stored by the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Host-assigned id
    #[serde(rename = "ID")]
    pub id: u64,

    /// Post type, e.g. `post`, `page` or a custom type
    pub post_type: String,

    /// Title, empty if the host sent none
    #[serde(default)]
    pub post_title: String,

    /// Body content
    #[serde(default)]
    pub post_content: String,

    /// Publication status, `draft` unless the host says otherwise
    #[serde(default = "default_status")]
    pub post_status: String,
}

impl Post {
    /// Create an empty draft of the given type
    pub fn new(id: u64, post_type: impl Into<String>) -> Self {
        Self {
            id,
            post_type: post_type.into(),
            post_title: String::new(),
            post_content: String::new(),
            post_status: default_status(),
        }
    }

    /// Replace the title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.post_title = title.into();
        self
    }

    /// Replace the status
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.post_status = status.into();
        self
    }
}
