//! History command - Browse recorded reflections

use anyhow::Result;
use introspect::memory::timeline;
use introspect::{Config, Record, RecordStore};

pub fn execute(config: &Config, search: Option<&str>, limit: usize, trend: bool) -> Result<()> {
    let records = RecordStore::new(&config.store_path).load()?;
    if trend {
        print_trend(&records);
        return Ok(());
    }
    let matches = timeline::search(&records, search.unwrap_or(""));

    if matches.is_empty() {
        println!("No memory entries found for the current filter.");
        return Ok(());
    }

    println!(
        "📜 Session timeline ({} of {} entries)",
        matches.len().min(limit),
        records.len()
    );
    println!();

    for record in timeline::recent(&matches, limit) {
        println!("{}", record.timestamp);
        if let Some(tag) = record.tag.as_deref().filter(|t| !t.is_empty()) {
            println!("🏷️  {}", tag);
        }
        println!("🗯️  {}", record.thought);
        println!("🔁 {}", record.response);
        println!("---");
    }

    Ok(())
}

fn print_trend(records: &[Record]) {
    let trend = timeline::daily_trend(records);
    if trend.is_empty() {
        println!("No dated reflections to chart yet.");
        return;
    }

    println!("📈 Daily length balance");
    println!();
    for (date, score) in &trend {
        let bar = "█".repeat((score * 20.0).round() as usize);
        println!("{}  {:.3}  {}", date, score, bar);
    }
}
