//! Single source of truth for the Introspect filesystem layout.
//!
//! This module defines WHERE data lives. It has no I/O, no validation,
//! no business logic. One file shows the entire filesystem layout.
//!
//! ```text
//! ~/.introspect/
//! ├── config.toml              # Optional user config
//! ├── memory_store.json        # Session memory (all records)
//! └── logs/                    # Daily log files
//!     └── introspect_YYYY-MM-DD.log
//! ```

use chrono::NaiveDate;
use std::path::PathBuf;

/// User's introspect home directory: `~/.introspect/`
pub fn introspect_home() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".introspect")
}

/// User config file: `~/.introspect/config.toml`
pub fn config_path() -> PathBuf {
    introspect_home().join("config.toml")
}

/// Session memory file: `~/.introspect/memory_store.json`
pub fn memory_store() -> PathBuf {
    introspect_home().join("memory_store.json")
}

/// Log paths
pub mod logs {
    use super::*;

    /// Log directory: `~/.introspect/logs/`
    pub fn dir() -> PathBuf {
        introspect_home().join("logs")
    }

    /// Daily log file: `~/.introspect/logs/introspect_{date}.log`
    pub fn daily_file(date: NaiveDate) -> PathBuf {
        dir().join(format!("introspect_{}.log", date.format("%Y-%m-%d")))
    }
}
