//! Reflect command - Send a thought to the model and record the exchange

use anyhow::Result;
use introspect::{openai, AlignmentScorer, Config, RecordStore, Reflector};

pub fn execute(config: &Config, text: &str, tag: Option<&str>) -> Result<()> {
    if text.trim().is_empty() {
        anyhow::bail!("Please enter a thought.");
    }

    let client = openai::connect(config)?;
    let store = RecordStore::new(&config.store_path);
    let mut records = store.load()?;

    let reflector = Reflector::new(Box::new(client.clone()));
    let record = match reflector.record(text, tag) {
        Ok(record) => record,
        Err(e) => {
            log::error!("Error handling input: {:#}", e);
            return Err(e);
        }
    };

    println!("🧠 Reflection:");
    println!();
    for line in record.response.lines() {
        println!("> {}", line);
    }
    println!();

    records.push(record);
    store.save(&records)?;
    log::info!("Thought submitted and saved.");

    let scorer = AlignmentScorer::new(super::embedding_provider(config, &client));
    let score = scorer.score(&records);
    println!("📈 Alignment score: {:.2} / 1.0 ({} entries)", score, records.len());

    Ok(())
}
