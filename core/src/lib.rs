pub mod cargo_drop;
pub mod events;
pub mod messages;
pub mod notifier;
pub mod parser;
pub mod process_monitor;
pub mod reader;
pub mod sector;
pub mod server_settings;
pub mod tracker;
pub mod watchdog;

// Re-exports for convenience
pub use cargo_drop::{CargoDrop, Coordinates, DropKey, DropTimings};
pub use events::{ClearReason, DropEvents, LogSignal};
pub use messages::Messages;
pub use notifier::{LogNotifier, Notifier, NotifyError};
pub use parser::{LogParser, parse_line};
pub use process_monitor::{ProcessProbe, SystemProbe};
pub use reader::{FollowError, LogFollower};
pub use sector::{Sector, SectorMap};
pub use server_settings::{SettingsError, read_drop_timings};
pub use tracker::DropTracker;
pub use watchdog::{LivenessState, ProcessWatchdog};
