//! Server log line parser
//!
//! Recognizes two kinds of lines:
//!
//! ```text
//! [2025.09.24-12.00.54:722][  0]LogSCUM: Cargo drop spawned at: 100.0, 200.0, 0.0
//! LogSCUM: Server is restarting ...   /   ... Server shutdown ...
//! ```
//!
//! Lines that only partially match (bad timestamp, bad numbers) are not
//! events. [`LogParser`] adds spawn deduplication on top of [`parse_line`]
//! and forwards what survives to a [`DropEvents`] receiver.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use memchr::memchr_iter;
use memchr::memmem;

use crate::cargo_drop::{Coordinates, DropKey};
use crate::events::{ClearReason, DropEvents, LogSignal};
use crate::reader::LogFollower;

const DROP_SPAWN_MARKER: &str = "Cargo drop spawned at:";
const RESTART_MARKERS: [&str; 2] = ["Server is restarting", "Server shutdown"];

/// Timestamp layout inside the brackets, e.g. `2025.09.24-12.00.54:722`
const TIMESTAMP_FORMAT: &str = "%Y.%m.%d-%H.%M.%S:%3f";
const TIMESTAMP_LEN: usize = 23;

// ─────────────────────────────────────────────────────────────────────────────
// Stateless line parsing
// ─────────────────────────────────────────────────────────────────────────────

/// Extract every signal carried by one log line, restart first.
pub fn parse_line(line: &str) -> Vec<LogSignal> {
    let mut signals = Vec::new();

    if is_restart_line(line) {
        signals.push(LogSignal::ServerRestart);
    }

    if let Some((coordinates, spawned_at)) = parse_drop_spawn(line) {
        signals.push(LogSignal::DropSpawned {
            coordinates,
            spawned_at,
        });
    }

    signals
}

pub fn is_restart_line(line: &str) -> bool {
    RESTART_MARKERS
        .iter()
        .any(|marker| memmem::find(line.as_bytes(), marker.as_bytes()).is_some())
}

/// Parse a drop spawn line into raw coordinates and absolute spawn time.
pub fn parse_drop_spawn(line: &str) -> Option<(Coordinates, DateTime<Utc>)> {
    let marker_pos = memmem::find(line.as_bytes(), DROP_SPAWN_MARKER.as_bytes())?;

    // The bracketed timestamp precedes the marker somewhere on the line
    let naive = find_timestamp(&line[..marker_pos])?;

    let rest = &line[marker_pos + DROP_SPAWN_MARKER.len()..];
    let (x, rest) = take_decimal(rest)?;
    let (y, rest) = take_decimal(rest.strip_prefix(',')?)?;
    let (z, _) = take_decimal(rest.strip_prefix(',')?)?;

    Some((Coordinates::new(x, y, z), to_absolute(naive)))
}

/// First `[YYYY.MM.DD-HH.MM.SS:mmm]` bracket in `input`
fn find_timestamp(input: &str) -> Option<NaiveDateTime> {
    let bytes = input.as_bytes();
    memchr_iter(b'[', bytes).find_map(|start| {
        let end = start + 1 + TIMESTAMP_LEN;
        if bytes.get(end) != Some(&b']') {
            return None;
        }
        parse_log_timestamp(input.get(start + 1..end)?)
    })
}

/// Parse the bracket contents, e.g. `2025.09.24-12.00.54:722`
pub fn parse_log_timestamp(s: &str) -> Option<NaiveDateTime> {
    if s.len() != TIMESTAMP_LEN {
        return None;
    }
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).ok()
}

/// Log timestamps carry no zone; they are read as host local time.
pub fn to_absolute(naive: NaiveDateTime) -> DateTime<Utc> {
    match Local.from_local_datetime(&naive).earliest() {
        Some(local) => local.with_timezone(&Utc),
        // Falls inside a DST gap
        None => naive.and_utc(),
    }
}

/// Leading signed decimal (`-12.5`, `300.0`, `+4`) after optional whitespace.
fn take_decimal(input: &str) -> Option<(f64, &str)> {
    let input = input.trim_start();
    let bytes = input.as_bytes();

    let mut end = 0;
    if matches!(bytes.first(), Some(b'-' | b'+')) {
        end += 1;
    }
    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;
    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        if frac_end > frac_start {
            digits += frac_end - frac_start;
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }

    let value = input[..end].parse::<f64>().ok()?;
    Some((value, &input[end..]))
}

// ─────────────────────────────────────────────────────────────────────────────
// Stateful parser
// ─────────────────────────────────────────────────────────────────────────────

/// Feeds parsed log lines to a [`DropEvents`] receiver.
///
/// Spawns are deduplicated by rounded coordinates for the lifetime of the
/// parser: the seen set only grows. It is not reset by a restart, so a drop
/// respawning at the exact same spot is not reported again.
pub struct LogParser<H> {
    events: Arc<H>,
    seen_drops: HashSet<DropKey>,
}

impl<H: DropEvents> LogParser<H> {
    pub fn new(events: Arc<H>) -> Self {
        Self {
            events,
            seen_drops: HashSet::new(),
        }
    }

    /// Process one log line. Both checks run before returning.
    pub async fn handle_line(&mut self, line: &str) {
        for signal in parse_line(line) {
            match signal {
                LogSignal::ServerRestart => {
                    tracing::info!("Server restart detected in log");
                    self.events.clear(ClearReason::ServerRestart).await;
                }
                LogSignal::DropSpawned {
                    coordinates,
                    spawned_at,
                } => {
                    if !self.seen_drops.insert(coordinates.key()) {
                        tracing::debug!(?coordinates, "Ignoring already seen drop");
                        continue;
                    }
                    self.events.drop_spawned(coordinates, spawned_at).await;
                }
            }
        }
    }

    /// Consume lines from `follower` forever
    pub async fn follow(mut self, mut follower: LogFollower) {
        tracing::info!(path = ?follower.path(), "Log parser started");
        loop {
            let line = follower.next_line().await;
            self.handle_line(&line).await;
        }
    }

    /// Number of distinct drops observed so far
    pub fn seen_count(&self) -> usize {
        self.seen_drops.len()
    }
}
