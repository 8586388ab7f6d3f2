//! Embeddings module - Turn text into semantic vectors
//!
//! Provides a trait-based abstraction over embedding backends plus the
//! provider adapter the scoring core talks to. The adapter never fails:
//! backend errors are replaced by a zero vector of the configured dimension,
//! tagged as [`Embedding::Fallback`] so callers can tell it apart.

mod similarity;

pub use similarity::{cosine_similarity, squared_euclidean_distance};

use anyhow::Result;

/// Trait for embedding generation engines
pub trait EmbeddingEngine: Send {
    /// Generate embedding for a single text
    fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Get model name
    fn model_name(&self) -> &str;
}

/// Outcome of asking the provider for an embedding
#[derive(Debug, Clone, PartialEq)]
pub enum Embedding {
    /// Vector returned by the backend
    Computed(Vec<f32>),
    /// Zero vector substituted after a backend failure
    Fallback(Vec<f32>),
}

impl Embedding {
    /// The vector, whichever way it was produced
    pub fn vector(&self) -> &[f32] {
        match self {
            Embedding::Computed(v) | Embedding::Fallback(v) => v,
        }
    }

    /// Consume into the raw vector
    pub fn into_vector(self) -> Vec<f32> {
        match self {
            Embedding::Computed(v) | Embedding::Fallback(v) => v,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Embedding::Fallback(_))
    }
}

/// Embedding provider adapter
///
/// Wraps an [`EmbeddingEngine`] and applies the zero-vector fallback policy.
/// No retries, no caching of repeated inputs.
pub struct EmbeddingProvider {
    engine: Box<dyn EmbeddingEngine>,
    dimension: usize,
}

impl EmbeddingProvider {
    /// `dimension` is the length of the fallback vector
    pub fn new(engine: Box<dyn EmbeddingEngine>, dimension: usize) -> Self {
        Self { engine, dimension }
    }

    /// Embed `text`, substituting a zero vector on any backend error
    pub fn embed(&self, text: &str) -> Embedding {
        match self.engine.embed(text) {
            Ok(vector) => {
                log::debug!(
                    "embedded {} chars with {} ({} dims)",
                    text.len(),
                    self.engine.model_name(),
                    vector.len()
                );
                Embedding::Computed(vector)
            }
            Err(e) => {
                log::warn!(
                    "embedding via {} failed, using zero vector: {:#}",
                    self.engine.model_name(),
                    e
                );
                Embedding::Fallback(vec![0.0; self.dimension])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Vec<f32>);

    impl EmbeddingEngine for Fixed {
        fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(self.0.clone())
        }

        fn model_name(&self) -> &str {
            "fixed"
        }
    }

    struct Broken;

    impl EmbeddingEngine for Broken {
        fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            anyhow::bail!("service unavailable")
        }

        fn model_name(&self) -> &str {
            "broken"
        }
    }

    #[test]
    fn test_successful_embedding_is_computed() {
        let provider = EmbeddingProvider::new(Box::new(Fixed(vec![0.1, 0.2, 0.3])), 3);
        let embedding = provider.embed("hello");

        assert!(!embedding.is_fallback());
        assert_eq!(embedding.vector(), &[0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_failure_yields_zero_vector_of_configured_dimension() {
        let provider = EmbeddingProvider::new(Box::new(Broken), 1536);
        let embedding = provider.embed("hello");

        assert!(embedding.is_fallback());
        assert_eq!(embedding.vector().len(), 1536);
        assert!(embedding.vector().iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_empty_text_is_passed_through() {
        let provider = EmbeddingProvider::new(Box::new(Fixed(vec![1.0])), 1);
        assert_eq!(provider.embed("").into_vector(), vec![1.0]);
    }
}
