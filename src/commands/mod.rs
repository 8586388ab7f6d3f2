pub mod cluster;
pub mod history;
pub mod reflect;
pub mod score;

use introspect::embeddings::EmbeddingProvider;
use introspect::{openai, Config};

/// Embedding provider backed by the HTTP client, falling back to the configured dimension
fn embedding_provider(config: &Config, client: &openai::Client) -> EmbeddingProvider {
    EmbeddingProvider::new(Box::new(client.clone()), config.embedding_dimension)
}

/// First line of `text`, cut to `max` characters
fn preview(text: &str, max: usize) -> String {
    let line = text.lines().next().unwrap_or("");
    if line.chars().count() > max || text.lines().nth(1).is_some() {
        let cut: String = line.chars().take(max).collect();
        format!("{}…", cut.trim_end())
    } else {
        line.to_string()
    }
}
