use chrono::{DateTime, Utc};

use crate::cargo_drop::Coordinates;

/// Structured events recognized in a single server log line.
/// A line may carry both a restart marker and a drop spawn.
#[derive(Debug, Clone, PartialEq)]
pub enum LogSignal {
    /// The server announced a restart or shutdown
    ServerRestart,

    /// A cargo drop spawned (raw, unrounded coordinates)
    DropSpawned {
        coordinates: Coordinates,
        spawned_at: DateTime<Utc>,
    },
}

/// Why every tracked drop is being discarded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearReason {
    /// Restart/shutdown line seen in the log
    ServerRestart,
    /// The server process disappeared from the process table
    ProcessExited,
}

impl ClearReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ServerRestart => "server_restart",
            Self::ProcessExited => "process_exited",
        }
    }
}
