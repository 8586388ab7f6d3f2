//! Cluster command - Group past thoughts by meaning

use anyhow::Result;
use introspect::memory::{ClusterLabel, Clusters, LabeledCluster};
use introspect::{openai, ClusterEngine, ClusterLabeler, Config, RecordStore};
use serde_json::json;

pub fn execute(config: &Config, k: Option<usize>, label: bool, json: bool) -> Result<()> {
    let client = openai::connect(config)?;
    let records = RecordStore::new(&config.store_path).load()?;
    let k = k.unwrap_or(config.cluster_count);

    let engine = ClusterEngine::new(
        super::embedding_provider(config, &client),
        config.cluster_seed,
    );

    let clusters: Vec<LabeledCluster> = if label {
        let labeler = ClusterLabeler::new(Box::new(client));
        engine.cluster_labeled(&records, k, &labeler)
    } else {
        unlabeled(engine.cluster(&records, k))
    };

    if json {
        let output: Vec<_> = clusters
            .iter()
            .map(|c| {
                json!({
                    "id": c.id,
                    "label": label.then(|| c.label.to_string()),
                    "records": c.records,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if clusters.is_empty() {
        println!("No thoughts to cluster yet.");
        return Ok(());
    }

    for cluster in &clusters {
        if label {
            println!(
                "🧩 Cluster {} · {} ({} thoughts)",
                cluster.id,
                cluster.label,
                cluster.records.len()
            );
        } else {
            println!("🧩 Cluster {} ({} thoughts)", cluster.id, cluster.records.len());
        }
        for record in &cluster.records {
            println!("   {}  {}", record.timestamp, super::preview(&record.thought, 70));
        }
        println!();
    }

    Ok(())
}

fn unlabeled(clusters: Clusters) -> Vec<LabeledCluster> {
    clusters
        .into_iter()
        .map(|(id, records)| LabeledCluster {
            id,
            label: ClusterLabel::Unlabeled,
            records,
        })
        .collect()
}
