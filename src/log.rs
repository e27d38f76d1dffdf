// src/log.rs
//! Diagnostics setup: a `tracing` subscriber writing to stderr and,
//! optionally, appending to a log file.
//!
//! Timestamps are time since start (`HH:MM:SS.mmm`), which is what matters
//! when reading back how long each site took to answer.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::{Mutex, OnceLock};
use std::time::Instant;

use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::error::{Error, Result};

static START: OnceLock<Instant> = OnceLock::new();

fn start() -> Instant {
    *START.get_or_init(Instant::now)
}

fn fmt_elapsed(ms: u128) -> String {
    let total_ms = ms as u64;
    let h = total_ms / 3_600_000;
    let m = (total_ms % 3_600_000) / 60_000;
    let s = (total_ms % 60_000) / 1_000;
    let ms = total_ms % 1_000;
    format!("{h:02}:{m:02}:{s:02}.{ms:03}")
}

struct Elapsed;

impl FormatTime for Elapsed {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        w.write_str(&fmt_elapsed(start().elapsed().as_millis()))
    }
}

/// Default filter for `-v` count. `RUST_LOG` wins when set.
fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "prop_scrape=info",
        1 => "prop_scrape=debug",
        _ => "prop_scrape=trace",
    }
}

/// Install the global subscriber. A second call is a no-op.
pub fn init(verbosity: u8, log_file: Option<&Path>) -> Result<()> {
    start();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| Error::Io { path: path.to_path_buf(), source })?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_timer(Elapsed)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    let console = tracing_subscriber::fmt::layer()
        .with_timer(Elapsed)
        .with_target(false)
        .with_writer(std::io::stderr);

    // already installed (tests, embedding callers): keep theirs
    let _ = tracing_subscriber::registry().with(filter).with(console).with(file_layer).try_init();
    Ok(())
}
