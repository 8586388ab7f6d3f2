//! OpenAI - HTTP backend for embeddings and chat completions
//!
//! One blocking [`Client`] implements both [`EmbeddingEngine`] and
//! [`CompletionEngine`], and clones of one instance back the scorer, the
//! cluster engine and the reflector.
//!
//! ```ignore
//! use introspect::{config::Config, openai};
//!
//! let config = Config::load()?;
//! let client = openai::connect(&config)?; // fails fast without OPENAI_API_KEY
//! ```
//!
//! [`EmbeddingEngine`]: crate::embeddings::EmbeddingEngine
//! [`CompletionEngine`]: crate::completion::CompletionEngine

mod internal;

use crate::config::Config;
use anyhow::Result;

pub use internal::Client;

/// Create a client from configuration, reading the credential from the environment
pub fn connect(config: &Config) -> Result<Client> {
    let api_key = config.api_key()?;
    Client::new(config, api_key)
}
