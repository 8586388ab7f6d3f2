//! Chat completion seam
//!
//! Reflections and cluster labels both go through [`CompletionEngine`], so the
//! core can be driven by the HTTP client or by an in-memory double.

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Speaker of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// One role-tagged chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Messages plus sampling parameters
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub messages: Vec<Message>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Trait for text generation backends
pub trait CompletionEngine: Send {
    /// Generate the assistant reply for `request`
    fn complete(&self, request: &CompletionRequest) -> Result<String>;
}
