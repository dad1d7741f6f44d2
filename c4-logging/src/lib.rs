//! c4-logging: NDJSON events for run post-mortems.
//!
//! Append-only, one JSON object per line, so a crashed run loses at most a
//! partial trailing line.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::Serialize;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// One committed self-play move.
#[derive(Debug, Clone, Serialize)]
pub struct SelfplayMoveEventV1 {
    pub event: &'static str,
    pub ts_ms: u64,
    pub game_id: u64,
    pub ply: u32,
    pub chosen_col: u8,
    /// Visit-count distribution the search produced (pre-noise).
    pub search_probs: [f32; 7],
    pub root_visits: u64,
}

/// End of one self-play game.
#[derive(Debug, Clone, Serialize)]
pub struct SelfplayGameEventV1 {
    pub event: &'static str,
    pub ts_ms: u64,
    pub game_id: u64,
    pub plies: u32,
    /// "x", "o", or "draw".
    pub winner: &'static str,
}

#[derive(Debug)]
pub enum NdjsonError {
    Io(io::Error),
    Json(serde_json::Error),
}

impl From<io::Error> for NdjsonError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for NdjsonError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl std::fmt::Display for NdjsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "ndjson io error: {e}"),
            Self::Json(e) => write!(f, "ndjson encode error: {e}"),
        }
    }
}

impl std::error::Error for NdjsonError {}

/// Append-only NDJSON writer.
///
/// Contract: each call writes exactly one JSON object followed by a newline.
pub struct NdjsonWriter {
    w: BufWriter<File>,
    lines_since_flush: u64,
    flush_every_lines: u64,
}

impl NdjsonWriter {
    /// Open a file for append. Creates it if it doesn't exist.
    pub fn open_append(path: impl AsRef<Path>) -> Result<Self, NdjsonError> {
        Self::open_append_with_flush(path, 0)
    }

    /// `flush_every_lines=0` disables periodic flushing.
    pub fn open_append_with_flush(
        path: impl AsRef<Path>,
        flush_every_lines: u64,
    ) -> Result<Self, NdjsonError> {
        let f = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            w: BufWriter::new(f),
            lines_since_flush: 0,
            flush_every_lines,
        })
    }

    pub fn write_event<T: Serialize>(&mut self, event: &T) -> Result<(), NdjsonError> {
        let mut buf = serde_json::to_vec(event)?;
        buf.push(b'\n');
        self.w.write_all(&buf)?;
        self.lines_since_flush += 1;
        if self.flush_every_lines > 0 && self.lines_since_flush >= self.flush_every_lines {
            self.flush()?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), NdjsonError> {
        self.w.flush()?;
        self.lines_since_flush = 0;
        Ok(())
    }
}

/// Milliseconds since the Unix epoch, for event timestamps.
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
