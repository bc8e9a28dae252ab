//! Active drop tracking
//!
//! The tracker is the only state shared between the log pipeline and the
//! process watchdog. Every mutation of the active set happens behind one
//! async mutex, so a spawn and a clear arriving concurrently always resolve
//! to one of the two orders.
//!
//! Drops are never expired individually; their landing and destruction
//! times are only informational. They leave the set on a clear signal.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::cargo_drop::{CargoDrop, Coordinates, DropKey, DropTimings};
use crate::events::{ClearReason, DropEvents};
use crate::messages::Messages;
use crate::notifier::Notifier;
use crate::sector::SectorMap;

pub struct DropTracker<N> {
    active: Mutex<HashMap<DropKey, CargoDrop>>,
    timings: DropTimings,
    sectors: Arc<SectorMap>,
    messages: Messages,
    notifier: Arc<N>,
}

impl<N: Notifier> DropTracker<N> {
    pub fn new(
        timings: DropTimings,
        sectors: Arc<SectorMap>,
        messages: Messages,
        notifier: Arc<N>,
    ) -> Self {
        Self {
            active: Mutex::new(HashMap::new()),
            timings,
            sectors,
            messages,
            notifier,
        }
    }

    pub async fn active_count(&self) -> usize {
        self.active.lock().await.len()
    }

    pub async fn is_active(&self, key: &DropKey) -> bool {
        self.active.lock().await.contains_key(key)
    }

    /// Delivery failures are logged; tracked state does not depend on them.
    async fn deliver(&self, message: &str) {
        if let Err(e) = self.notifier.send(message).await {
            tracing::warn!(error = %e, "Failed to deliver notification");
        }
    }
}

impl<N: Notifier> DropEvents for DropTracker<N> {
    async fn drop_spawned(&self, coordinates: Coordinates, spawned_at: DateTime<Utc>) {
        let cargo = CargoDrop::new(coordinates, spawned_at, &self.timings, &self.sectors);
        let message = self.messages.drop_spawned(&cargo);

        tracing::info!(
            sector = %cargo.sector,
            x = coordinates.x,
            y = coordinates.y,
            z = coordinates.z,
            landed_at = %cargo.landed_at,
            destroyed_at = %cargo.destroyed_at,
            "Cargo drop spawned"
        );

        self.active.lock().await.insert(cargo.key(), cargo);

        // Sent outside the lock so a slow webhook never stalls a clear
        self.deliver(&message).await;
    }

    async fn clear(&self, reason: ClearReason) {
        let mut active = self.active.lock().await;
        if active.is_empty() {
            tracing::debug!(reason = reason.as_str(), "Clear signal with no active drops");
            return;
        }

        tracing::info!(
            count = active.len(),
            reason = reason.as_str(),
            "Clearing active cargo drops"
        );

        for cargo in active.values() {
            let message = self.messages.drop_disappeared(cargo);
            self.deliver(&message).await;
        }
        active.clear();
    }
}
