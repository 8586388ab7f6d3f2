use anyhow::Result;
use clap::{Parser, Subcommand};
use introspect::Config;
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(author, version = env!("CARGO_PKG_VERSION"), about = "Reflect to evolve: journal thoughts, score alignment, find recurring themes", long_about = None)]
struct Cli {
    /// Session memory file (overrides config)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a thought and record the model's reflection
    Reflect {
        /// Thought, observation, or reflection
        text: String,

        /// Optional tag (e.g., #insight, #loop, #trigger)
        #[arg(short, long)]
        tag: Option<String>,
    },

    /// Show the session alignment score
    Score {
        /// Output results as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Group past thoughts into semantic clusters
    Cluster {
        /// Number of clusters (default from config: 5)
        #[arg(short, long)]
        k: Option<usize>,

        /// Generate a short label for each cluster
        #[arg(short, long)]
        label: bool,

        /// Output results as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show recent reflections
    History {
        /// Filter by keyword or tag
        #[arg(short, long)]
        search: Option<String>,

        /// Maximum number of entries (default: 10)
        #[arg(short = 'n', long, default_value = "10")]
        limit: usize,

        /// Show the per-day length balance of thoughts and responses instead
        #[arg(long)]
        trend: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    introspect::logging::init(cli.verbose);

    let mut config = Config::load()?;
    if let Some(store) = cli.store {
        config.store_path = store;
    }

    match cli.command {
        Commands::Reflect { text, tag } => {
            commands::reflect::execute(&config, &text, tag.as_deref())?;
        }
        Commands::Score { json } => {
            commands::score::execute(&config, json)?;
        }
        Commands::Cluster { k, label, json } => {
            commands::cluster::execute(&config, k, label, json)?;
        }
        Commands::History {
            search,
            limit,
            trend,
        } => {
            commands::history::execute(&config, search.as_deref(), limit, trend)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cluster_count_accepts_short_and_long() {
        for args in [
            ["introspect", "cluster", "-k", "3"],
            ["introspect", "cluster", "--k", "3"],
        ] {
            let cli = Cli::try_parse_from(args).unwrap();
            assert!(matches!(cli.command, Commands::Cluster { k: Some(3), .. }));
        }
    }

    #[test]
    fn test_history_trend_flag() {
        let cli = Cli::try_parse_from(["introspect", "history", "--trend"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::History {
                trend: true,
                limit: 10,
                ..
            }
        ));
    }
}
