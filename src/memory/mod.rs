// Session memory: the journal records and everything computed over them
// Storage is a flat JSON file; scoring and clustering are recomputed on demand.

use serde::{Deserialize, Serialize};

pub mod alignment;
pub mod cluster;
pub mod kmeans;
pub mod store;
pub mod timeline;

pub use alignment::{AlignmentReport, AlignmentScorer, EntryScore};
pub use cluster::{ClusterEngine, ClusterLabel, ClusterLabeler, Clusters, LabeledCluster};
pub use store::RecordStore;

/// One reflective exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub thought: String,
    #[serde(default)]
    pub response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl Record {
    pub fn new(
        timestamp: impl Into<String>,
        thought: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            thought: thought.into(),
            response: response.into(),
            tag: None,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Both sides carry text, so the record takes part in alignment scoring
    pub fn is_scorable(&self) -> bool {
        !self.thought.trim().is_empty() && !self.response.trim().is_empty()
    }

    /// Has a thought, so the record takes part in clustering
    pub fn has_thought(&self) -> bool {
        !self.thought.is_empty()
    }
}
