//! Game server settings reader
//!
//! Cargo drop timings come from the `[World]` section of the server's INI
//! file. The file is read once at startup; any problem here is fatal.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::cargo_drop::DropTimings;

pub const WORLD_SECTION: &str = "World";
pub const FALL_DELAY_KEY: &str = "scum.CargoDropFallDelay";
pub const FALL_DURATION_KEY: &str = "scum.CargoDropFallDuration";
pub const SELFDESTRUCT_KEY: &str = "scum.CargoDropSelfdestructTime";

/// Longest accepted timing (about 31 years); keeps derived timestamps in range
pub const MAX_TIMING_SECS: f64 = 1e9;

/// Errors that can occur while loading drop timings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("cannot read server settings {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("section [{section}] missing in {path:?}")]
    MissingSection { path: PathBuf, section: String },

    #[error("missing required setting {key} in section [{section}] of {path:?}")]
    MissingKey {
        path: PathBuf,
        section: String,
        key: String,
    },

    #[error("invalid value {value:?} for {key} in {path:?}: expected seconds between 0 and {MAX_TIMING_SECS}")]
    InvalidValue {
        path: PathBuf,
        key: String,
        value: String,
    },
}

/// Load the cargo drop timings from a server INI file
pub fn read_drop_timings(path: &Path) -> Result<DropTimings, SettingsError> {
    let contents = fs::read_to_string(path).map_err(|e| SettingsError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let sections = parse_ini(&contents);
    let world = sections
        .get(WORLD_SECTION)
        .ok_or_else(|| SettingsError::MissingSection {
            path: path.to_path_buf(),
            section: WORLD_SECTION.to_string(),
        })?;

    let seconds = |key: &str| -> Result<f64, SettingsError> {
        let raw = world.get(&key.to_ascii_lowercase()).ok_or_else(|| SettingsError::MissingKey {
            path: path.to_path_buf(),
            section: WORLD_SECTION.to_string(),
            key: key.to_string(),
        })?;

        raw.parse::<f64>()
            .ok()
            .filter(|secs| secs.is_finite() && (0.0..=MAX_TIMING_SECS).contains(secs))
            .ok_or_else(|| SettingsError::InvalidValue {
                path: path.to_path_buf(),
                key: key.to_string(),
                value: raw.clone(),
            })
    };

    let timings = DropTimings::from_secs(
        seconds(FALL_DELAY_KEY)?,
        seconds(FALL_DURATION_KEY)?,
        seconds(SELFDESTRUCT_KEY)?,
    );

    tracing::debug!(?path, ?timings, "Loaded cargo drop timings");
    Ok(timings)
}

type Section = HashMap<String, String>;

/// Minimal INI parse: `[section]` headers, `key=value` pairs, `;`/`#`
/// comment lines. Keys are stored lowercased; keys before the first header
/// are ignored.
fn parse_ini(contents: &str) -> HashMap<String, Section> {
    let mut sections: HashMap<String, Section> = HashMap::new();
    let mut current: Option<String> = None;

    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }

        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            let name = name.trim().to_string();
            sections.entry(name.clone()).or_default();
            current = Some(name);
            continue;
        }

        let (Some(section), Some((key, value))) = (&current, line.split_once('=')) else {
            continue;
        };

        if let Some(entries) = sections.get_mut(section) {
            entries.insert(key.trim().to_ascii_lowercase(), value.trim().to_string());
        }
    }

    sections
}
