//! Alignment scoring
//!
//! Alignment is the cosine similarity between the embedding of what the user
//! wrote and the embedding of what the model answered. The session score is
//! the mean over entries with a strictly positive similarity: zero and
//! negative entries count as "no signal" and are left out of the mean, not
//! averaged in as misalignment. That exclusion is intentional.
//!
//! Per-entry similarities are not clamped. Because only positive values are
//! aggregated, the session score is either the 0.0 baseline or lies in (0, 1].

use super::Record;
use crate::embeddings::{cosine_similarity, EmbeddingProvider};

/// Alignment of a single record
#[derive(Debug, Clone, PartialEq)]
pub struct EntryScore {
    /// Position of the record in the scored slice
    pub index: usize,
    /// Cosine similarity, rounded to 3 decimals
    pub similarity: f32,
    /// Either side fell back to a zero vector
    pub degraded: bool,
}

impl EntryScore {
    /// Whether this entry contributes to the session mean
    pub fn counts(&self) -> bool {
        self.similarity > 0.0
    }
}

/// Per-entry detail plus the session-level mean
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AlignmentReport {
    /// One entry per scorable record, in input order
    pub entries: Vec<EntryScore>,
    /// Mean of the counted entries, rounded to 3 decimals; 0.0 when none count
    pub mean: f32,
}

impl AlignmentReport {
    /// Number of entries that went into the mean
    pub fn counted(&self) -> usize {
        self.entries.iter().filter(|e| e.counts()).count()
    }

    /// Number of entries scored against a fallback embedding
    pub fn degraded(&self) -> usize {
        self.entries.iter().filter(|e| e.degraded).count()
    }
}

/// Scores thought/response alignment through an embedding provider
pub struct AlignmentScorer {
    provider: EmbeddingProvider,
}

impl AlignmentScorer {
    pub fn new(provider: EmbeddingProvider) -> Self {
        Self { provider }
    }

    /// Session alignment score
    pub fn score(&self, records: &[Record]) -> f32 {
        self.report(records).mean
    }

    /// Score every scorable record and aggregate
    ///
    /// Records with an empty or whitespace-only side are skipped entirely and
    /// cost no provider calls.
    pub fn report(&self, records: &[Record]) -> AlignmentReport {
        let entries: Vec<EntryScore> = records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.is_scorable())
            .map(|(index, r)| self.score_entry(index, r))
            .collect();

        let counted: Vec<f32> = entries
            .iter()
            .filter(|e| e.counts())
            .map(|e| e.similarity)
            .collect();

        let mean = if counted.is_empty() {
            0.0
        } else {
            round3(counted.iter().sum::<f32>() / counted.len() as f32)
        };

        log::debug!(
            "alignment over {} records: {} scored, {} counted, {} degraded, mean {}",
            records.len(),
            entries.len(),
            counted.len(),
            entries.iter().filter(|e| e.degraded).count(),
            mean
        );

        AlignmentReport { entries, mean }
    }

    fn score_entry(&self, index: usize, record: &Record) -> EntryScore {
        let thought = self.provider.embed(record.thought.trim());
        let response = self.provider.embed(record.response.trim());

        EntryScore {
            index,
            similarity: round3(cosine_similarity(thought.vector(), response.vector())),
            degraded: thought.is_fallback() || response.is_fallback(),
        }
    }
}

/// Round to 3 decimal places
pub fn round3(value: f32) -> f32 {
    (value * 1000.0).round() / 1000.0
}
