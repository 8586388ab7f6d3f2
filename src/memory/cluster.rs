//! Thought clustering and cluster labels
//!
//! [`ClusterEngine`] groups records by the embedding of their thought;
//! [`ClusterLabeler`] asks a completion backend for a short tag per group.
//! Clusters are recomputed on every call and never stored.

use super::kmeans::KMeans;
use super::Record;
use crate::completion::{CompletionEngine, CompletionRequest, Message};
use crate::embeddings::EmbeddingProvider;
use std::collections::BTreeMap;
use std::fmt;

/// Cluster id to member records, ids dense from 0
pub type Clusters = BTreeMap<usize, Vec<Record>>;

/// Default requested cluster count
pub const DEFAULT_CLUSTERS: usize = 5;

/// Thoughts sent as context when labelling
const LABEL_CONTEXT_LIMIT: usize = 10;

const LABEL_SYSTEM_PROMPT: &str = "You are a concise cluster labeling assistant.";

/// Groups records into semantic clusters
pub struct ClusterEngine {
    provider: EmbeddingProvider,
    seed: u64,
}

impl ClusterEngine {
    /// `seed` fixes k-means initialisation so results are reproducible
    pub fn new(provider: EmbeddingProvider, seed: u64) -> Self {
        Self { provider, seed }
    }

    /// Partition records with a non-empty thought into at most `k` clusters
    ///
    /// Fewer than two such records are returned as a single cluster 0 (or an
    /// empty map when there are none). Otherwise the effective cluster count is
    /// `min(k, records)`, at least 1, and every id in `0..effective` is present
    /// even if degenerate embeddings leave a group empty.
    pub fn cluster(&self, records: &[Record], k: usize) -> Clusters {
        let valid: Vec<&Record> = records.iter().filter(|r| r.has_thought()).collect();

        if valid.len() < 2 {
            let mut clusters = Clusters::new();
            if !valid.is_empty() {
                clusters.insert(0, valid.into_iter().cloned().collect());
            }
            return clusters;
        }

        let mut points: Vec<Vec<f32>> = valid
            .iter()
            .map(|r| self.provider.embed(&r.thought).into_vector())
            .collect();

        // Backend and fallback vectors can differ in length; pad to the longest
        let dim = points.iter().map(Vec::len).max().unwrap_or(0);
        for p in &mut points {
            p.resize(dim, 0.0);
        }

        let effective = k.clamp(1, valid.len());
        let fit = KMeans::new(effective, self.seed).fit(&points);

        let mut clusters: Clusters = (0..effective).map(|id| (id, Vec::new())).collect();
        for (record, label) in valid.into_iter().zip(fit.labels) {
            clusters.entry(label).or_default().push(record.clone());
        }

        log::debug!(
            "clustered {} thoughts into {} groups in {} iterations",
            points.len(),
            effective,
            fit.iterations
        );

        clusters
    }

    /// Cluster, then label every group in ascending id order
    pub fn cluster_labeled(
        &self,
        records: &[Record],
        k: usize,
        labeler: &ClusterLabeler,
    ) -> Vec<LabeledCluster> {
        self.cluster(records, k)
            .into_iter()
            .map(|(id, records)| {
                let thoughts: Vec<&str> = records.iter().map(|r| r.thought.as_str()).collect();
                LabeledCluster {
                    id,
                    label: labeler.label_cluster(&thoughts),
                    records,
                }
            })
            .collect()
    }
}

/// A cluster together with its generated label
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledCluster {
    pub id: usize,
    pub label: ClusterLabel,
    pub records: Vec<Record>,
}

/// Outcome of labelling a cluster
///
/// `Display` renders the text shown to users, including the sentinels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClusterLabel {
    /// Tag produced by the completion backend, trimmed
    Generated(String),
    /// No thoughts to label
    Unlabeled,
    /// Backend failed or replied with only whitespace
    ///
    /// A blank reply maps here, never to an empty tag.
    Unknown,
}

impl ClusterLabel {
    pub fn as_str(&self) -> &str {
        match self {
            ClusterLabel::Generated(label) => label,
            ClusterLabel::Unlabeled => "Unlabeled",
            ClusterLabel::Unknown => "Unknown",
        }
    }

    pub fn is_generated(&self) -> bool {
        matches!(self, ClusterLabel::Generated(_))
    }
}

impl fmt::Display for ClusterLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Asks a completion backend for one short tag per cluster
pub struct ClusterLabeler {
    engine: Box<dyn CompletionEngine>,
}

impl ClusterLabeler {
    pub fn new(engine: Box<dyn CompletionEngine>) -> Self {
        Self { engine }
    }

    /// Label a group of thoughts; never fails
    pub fn label_cluster<S: AsRef<str>>(&self, thoughts: &[S]) -> ClusterLabel {
        if thoughts.is_empty() {
            return ClusterLabel::Unlabeled;
        }

        match self.engine.complete(&label_request(thoughts)) {
            Ok(reply) => {
                let label = reply.trim();
                if label.is_empty() {
                    log::warn!("cluster label reply was empty");
                    ClusterLabel::Unknown
                } else {
                    ClusterLabel::Generated(label.to_string())
                }
            }
            Err(e) => {
                log::warn!("cluster labelling failed: {:#}", e);
                ClusterLabel::Unknown
            }
        }
    }
}

fn label_request<S: AsRef<str>>(thoughts: &[S]) -> CompletionRequest {
    let preview: String = thoughts
        .iter()
        .take(LABEL_CONTEXT_LIMIT)
        .map(|t| format!("\n- {}", t.as_ref()))
        .collect();

    let prompt = format!(
        "These are personal reflections grouped by semantic similarity:\n{}\n\n\
         Provide a single concise label or tag for this cluster (e.g., #loop, #growth, #conflict):",
        preview
    );

    CompletionRequest {
        messages: vec![Message::system(LABEL_SYSTEM_PROMPT), Message::user(prompt)],
        temperature: 0.4,
        max_tokens: 10,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::EmbeddingEngine;
    use anyhow::Result;
    use std::sync::{Arc, Mutex};

    /// Two topics: thoughts mentioning "work" point one way, everything else the other
    struct Topics;

    impl EmbeddingEngine for Topics {
        fn embed(&self, text: &str) -> Result<Vec<f32>> {
            if text.contains("work") {
                Ok(vec![1.0, 0.0, 0.0])
            } else {
                Ok(vec![0.0, 1.0, 0.0])
            }
        }

        fn model_name(&self) -> &str {
            "topics"
        }
    }

    struct Down;

    impl EmbeddingEngine for Down {
        fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            anyhow::bail!("timeout")
        }

        fn model_name(&self) -> &str {
            "down"
        }
    }

    /// Records the last request and answers with a fixed reply
    struct Scripted {
        reply: Result<String, String>,
        seen: Arc<Mutex<Option<CompletionRequest>>>,
    }

    impl CompletionEngine for Scripted {
        fn complete(&self, request: &CompletionRequest) -> Result<String> {
            *self.seen.lock().unwrap() = Some(request.clone());
            self.reply.clone().map_err(|e| anyhow::anyhow!(e))
        }
    }

    fn labeler(reply: Result<&str, &str>) -> (ClusterLabeler, Arc<Mutex<Option<CompletionRequest>>>) {
        let seen = Arc::new(Mutex::new(None));
        let engine = Scripted {
            reply: reply.map(str::to_string).map_err(str::to_string),
            seen: seen.clone(),
        };
        (ClusterLabeler::new(Box::new(engine)), seen)
    }

    fn engine() -> ClusterEngine {
        ClusterEngine::new(EmbeddingProvider::new(Box::new(Topics), 3), 42)
    }

    fn journal() -> Vec<Record> {
        vec![
            Record::new("t1", "work deadline again", "r"),
            Record::new("t2", "missing my sister", "r"),
            Record::new("t3", "", "no thought here"),
            Record::new("t4", "work feels endless", "r"),
            Record::new("t5", "called my sister", "r"),
        ]
    }

    #[test]
    fn test_empty_input_gives_empty_map() {
        assert!(engine().cluster(&[], 5).is_empty());
        assert!(engine().cluster(&[Record::new("t", "", "r")], 5).is_empty());
    }

    #[test]
    fn test_single_valid_record_is_one_cluster() {
        let records = vec![Record::new("t1", "", "r"), Record::new("t2", "alone", "r")];
        let clusters = engine().cluster(&records, 5);

        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[&0], vec![records[1].clone()]);
    }

    #[test]
    fn test_groups_by_topic() {
        let clusters = engine().cluster(&journal(), 2);
        assert_eq!(clusters.keys().copied().collect::<Vec<_>>(), vec![0, 1]);

        let mut groups: Vec<Vec<String>> = clusters
            .values()
            .map(|rs| rs.iter().map(|r| r.timestamp.clone()).collect())
            .collect();
        groups.sort();
        assert_eq!(groups, vec![vec!["t1", "t4"], vec!["t2", "t5"]]);
    }

    #[test]
    fn test_k_limited_by_valid_record_count() {
        let clusters = engine().cluster(&journal(), 10);
        assert_eq!(clusters.len(), 4);
        assert_eq!(clusters.values().map(Vec::len).sum::<usize>(), 4);
    }

    #[test]
    fn test_clustering_is_reproducible() {
        let a = engine().cluster(&journal(), 2);
        let b = engine().cluster(&journal(), 2);
        assert_eq!(a, b);
    }

    #[test]
    fn test_provider_outage_still_returns_dense_ids() {
        let engine = ClusterEngine::new(EmbeddingProvider::new(Box::new(Down), 8), 42);
        let clusters = engine.cluster(&journal(), 3);

        assert_eq!(clusters.keys().copied().collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(clusters.values().map(Vec::len).sum::<usize>(), 4);
    }

    #[test]
    fn test_label_empty_is_unlabeled() {
        let (labeler, seen) = labeler(Ok("#never"));
        let label = labeler.label_cluster::<&str>(&[]);
        assert_eq!(label, ClusterLabel::Unlabeled);
        assert_eq!(label.to_string(), "Unlabeled");
        assert!(seen.lock().unwrap().is_none());
    }

    #[test]
    fn test_label_failure_is_unknown() {
        let (labeler, _) = labeler(Err("rate limited"));
        let label = labeler.label_cluster(&["a thought"]);
        assert_eq!(label, ClusterLabel::Unknown);
        assert_eq!(label.to_string(), "Unknown");
    }

    #[test]
    fn test_label_blank_reply_is_unknown() {
        let (labeler, _) = labeler(Ok("  \n"));
        assert_eq!(labeler.label_cluster(&["a thought"]), ClusterLabel::Unknown);
    }

    #[test]
    fn test_label_is_trimmed() {
        let (labeler, _) = labeler(Ok("  #growth\n"));
        let label = labeler.label_cluster(&["learning to rest"]);
        assert_eq!(label, ClusterLabel::Generated("#growth".to_string()));
        assert_eq!(label.to_string(), "#growth");
    }

    #[test]
    fn test_label_prompt_uses_first_ten_thoughts() {
        let (labeler, seen) = labeler(Ok("#loop"));
        let thoughts: Vec<String> = (1..=12).map(|i| format!("thought number {}", i)).collect();
        labeler.label_cluster(&thoughts);

        let request = seen.lock().unwrap().clone().unwrap();
        assert_eq!(request.max_tokens, 10);
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].content, LABEL_SYSTEM_PROMPT);

        let prompt = &request.messages[1].content;
        assert!(prompt.contains("\n- thought number 1\n"));
        assert!(prompt.contains("\n- thought number 10\n"));
        assert!(!prompt.contains("thought number 11"));
        assert!(prompt.ends_with("(e.g., #loop, #growth, #conflict):"));
    }

    #[test]
    fn test_cluster_labeled_labels_each_group() {
        let (labeler, _) = labeler(Ok("#theme"));
        let labeled = engine().cluster_labeled(&journal(), 2, &labeler);

        assert_eq!(labeled.len(), 2);
        assert_eq!(labeled[0].id, 0);
        assert_eq!(labeled[1].id, 1);
        assert!(labeled.iter().all(|c| c.label.as_str() == "#theme"));
        assert!(labeled.iter().all(|c| c.records.len() == 2));
    }
}
