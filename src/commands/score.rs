//! Score command - Session alignment between thoughts and responses

use anyhow::Result;
use introspect::{openai, AlignmentScorer, Config, RecordStore};
use serde_json::json;

pub fn execute(config: &Config, json: bool) -> Result<()> {
    let client = openai::connect(config)?;
    let store = RecordStore::new(&config.store_path);
    let records = store.load()?;
    let scorer = AlignmentScorer::new(super::embedding_provider(config, &client));
    let report = scorer.report(&records);

    if json {
        let output = json!({
            "store": store.path().display().to_string(),
            "score": report.mean,
            "records": records.len(),
            "scored": report.entries.len(),
            "counted": report.counted(),
            "degraded": report.degraded(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No reflections recorded yet in {}.", store.path().display());
        return Ok(());
    }

    println!("📈 Alignment score: {:.3} / 1.0", report.mean);
    println!();
    println!("   Reflections:  {}", records.len());
    println!("   Scored:       {}", report.entries.len());
    println!("   Counted:      {}", report.counted());
    if report.degraded() > 0 {
        println!(
            "   ⚠️  {} entries scored against a fallback embedding",
            report.degraded()
        );
    }

    Ok(())
}
