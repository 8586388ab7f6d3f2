//! Reflection: send a thought to the model and turn the exchange into a record

use crate::completion::{CompletionEngine, CompletionRequest, Message};
use crate::memory::Record;
use anyhow::{Context, Result};
use chrono::Local;

const REFLECTION_SYSTEM_PROMPT: &str = "You are a helpful cognitive reflection assistant.";

/// Timestamp format stored on records
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Produces model responses to user thoughts
pub struct Reflector {
    engine: Box<dyn CompletionEngine>,
}

impl Reflector {
    pub fn new(engine: Box<dyn CompletionEngine>) -> Self {
        Self { engine }
    }

    /// Ask the model to reflect on `prompt`
    ///
    /// Unlike scoring and labelling there is no fallback text here: an empty
    /// prompt or a provider failure is returned as an error.
    pub fn reflect(&self, prompt: &str) -> Result<String> {
        if prompt.trim().is_empty() {
            anyhow::bail!("No input provided.");
        }

        let request = CompletionRequest {
            messages: vec![
                Message::system(REFLECTION_SYSTEM_PROMPT),
                Message::user(prompt),
            ],
            temperature: 0.7,
            max_tokens: 600,
        };

        let reply = self
            .engine
            .complete(&request)
            .context("Reflection request failed")?;

        Ok(reply.trim().to_string())
    }

    /// Reflect on `prompt` and build the record to append to session memory
    pub fn record(&self, prompt: &str, tag: Option<&str>) -> Result<Record> {
        let response = self.reflect(prompt)?;
        let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();

        let mut record = Record::new(timestamp, prompt.trim(), response);
        record.tag = tag.map(str::trim).filter(|t| !t.is_empty()).map(String::from);
        Ok(record)
    }
}
