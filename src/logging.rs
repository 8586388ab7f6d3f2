//! Logging setup for the binary
//!
//! Lines look like `21:04:17 | INFO | saved 3 records to ...`. They go to
//! stderr and, when the log directory is writable, to a daily file under
//! `~/.introspect/logs/`. `RUST_LOG` overrides the default level.

use chrono::Local;
use log::LevelFilter;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

/// Initialise the global logger; later calls are no-ops
pub fn init(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let file = open_daily_file(&crate::paths::logs::daily_file(Local::now().date_naive()));

    let _ = env_logger::builder()
        .filter_level(level)
        .parse_default_env()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} | {} | {}",
                Local::now().format("%H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(Tee { file })))
        .try_init();
}

fn open_daily_file(path: &Path) -> Option<File> {
    let dir = path.parent()?;
    std::fs::create_dir_all(dir).ok()?;
    OpenOptions::new().create(true).append(true).open(path).ok()
}

/// Writes every line to stderr and, if present, the log file
struct Tee {
    file: Option<File>,
}

impl Write for Tee {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Some(file) = self.file.as_mut() {
            // Stop using the file after the first failed write
            if file.write_all(buf).is_err() {
                self.file = None;
            }
        }
        io::stderr().write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if let Some(file) = self.file.as_mut() {
            let _ = file.flush();
        }
        io::stderr().flush()
    }
}
