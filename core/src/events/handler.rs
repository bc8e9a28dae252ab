use std::future::Future;

use chrono::{DateTime, Utc};

use super::ClearReason;
use crate::cargo_drop::Coordinates;

/// Receiver of drop lifecycle events.
///
/// Implemented by the drop tracker; the log parser and the process watchdog
/// both hold a shared reference to one implementation and may call it
/// concurrently, so implementations must serialize their own state.
pub trait DropEvents: Send + Sync {
    /// A new (not previously seen) drop spawned
    fn drop_spawned(
        &self,
        coordinates: Coordinates,
        spawned_at: DateTime<Utc>,
    ) -> impl Future<Output = ()> + Send;

    /// Every tracked drop is gone
    fn clear(&self, reason: ClearReason) -> impl Future<Output = ()> + Send;
}
