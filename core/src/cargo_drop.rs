//! Cargo drop value types
//!
//! A drop is identified by where it spawned. Its landing and self-destruct
//! times are derived once from the spawn time and the server's timings and
//! never change afterwards.

use chrono::{DateTime, TimeDelta, Utc};

use crate::sector::{Sector, SectorMap};

/// World position of a drop, as written in the server log
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Coordinates {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Identity key: each axis rounded to two decimals
    pub fn key(&self) -> DropKey {
        DropKey([hundredths(self.x), hundredths(self.y), hundredths(self.z)])
    }
}

/// Coordinates rounded to 2 decimals, stored as integer hundredths so the
/// key is hashable and exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DropKey([i64; 3]);

#[inline]
fn hundredths(value: f64) -> i64 {
    (value * 100.0).round() as i64
}

// ═══════════════════════════════════════════════════════════════════════════
// Timings
// ═══════════════════════════════════════════════════════════════════════════

/// Server-wide drop timings, shared by every drop in a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropTimings {
    /// Delay after spawning before the drop starts falling
    pub fall_delay: TimeDelta,
    /// How long the fall takes
    pub fall_duration: TimeDelta,
    /// Time on the ground before the drop destroys itself
    pub selfdestruct_time: TimeDelta,
}

impl DropTimings {
    /// Build timings from (fractional) seconds, rounded to milliseconds
    pub fn from_secs(fall_delay: f64, fall_duration: f64, selfdestruct_time: f64) -> Self {
        Self {
            fall_delay: secs_to_delta(fall_delay),
            fall_duration: secs_to_delta(fall_duration),
            selfdestruct_time: secs_to_delta(selfdestruct_time),
        }
    }
}

fn secs_to_delta(secs: f64) -> TimeDelta {
    TimeDelta::milliseconds((secs * 1000.0).round() as i64)
}

// ═══════════════════════════════════════════════════════════════════════════
// Drop Entity
// ═══════════════════════════════════════════════════════════════════════════

/// An observed cargo drop with its derived lifecycle timestamps
#[derive(Debug, Clone, PartialEq)]
pub struct CargoDrop {
    pub coordinates: Coordinates,
    pub spawned_at: DateTime<Utc>,
    pub landed_at: DateTime<Utc>,
    pub destroyed_at: DateTime<Utc>,
    pub sector: Sector,
}

impl CargoDrop {
    pub fn new(
        coordinates: Coordinates,
        spawned_at: DateTime<Utc>,
        timings: &DropTimings,
        sectors: &SectorMap,
    ) -> Self {
        let landed_at = add_saturating(
            add_saturating(spawned_at, timings.fall_delay),
            timings.fall_duration,
        );
        let destroyed_at = add_saturating(landed_at, timings.selfdestruct_time);

        Self {
            coordinates,
            spawned_at,
            landed_at,
            destroyed_at,
            sector: sectors.sector(coordinates.x, coordinates.y),
        }
    }

    pub fn key(&self) -> DropKey {
        self.coordinates.key()
    }
}

/// Clamps to the representable range instead of panicking
fn add_saturating(at: DateTime<Utc>, delta: TimeDelta) -> DateTime<Utc> {
    at.checked_add_signed(delta).unwrap_or(if delta < TimeDelta::zero() {
        DateTime::<Utc>::MIN_UTC
    } else {
        DateTime::<Utc>::MAX_UTC
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    #[test]
    fn test_derived_timestamps() {
        let timings = DropTimings::from_secs(5.0, 10.0, 20.0);
        let drop = CargoDrop::new(
            Coordinates::new(100.0, 200.0, 0.0),
            at(1000),
            &timings,
            &SectorMap::scum(),
        );

        assert_eq!(drop.landed_at, at(1015));
        assert_eq!(drop.destroyed_at, at(1035));
        assert_eq!(drop.sector.to_string(), "B2");
    }

    #[test]
    fn test_out_of_range_timings_saturate() {
        let timings = DropTimings {
            fall_delay: TimeDelta::MAX,
            fall_duration: TimeDelta::seconds(10),
            selfdestruct_time: TimeDelta::seconds(20),
        };
        let drop = CargoDrop::new(
            Coordinates::new(100.0, 200.0, 0.0),
            at(1_758_715_254),
            &timings,
            &SectorMap::scum(),
        );

        assert_eq!(drop.landed_at, DateTime::<Utc>::MAX_UTC);
        assert_eq!(drop.destroyed_at, DateTime::<Utc>::MAX_UTC);
    }

    #[test]
    fn test_fractional_timings() {
        let timings = DropTimings::from_secs(0.25, 1.5, 0.0);
        assert_eq!(timings.fall_delay, TimeDelta::milliseconds(250));
        assert_eq!(timings.fall_duration, TimeDelta::milliseconds(1500));
        assert_eq!(timings.selfdestruct_time, TimeDelta::zero());
    }

    #[test]
    fn test_key_rounds_to_two_decimals() {
        let a = Coordinates::new(100.001, -200.004, 0.0);
        let b = Coordinates::new(100.0, -200.0, 0.002);
        let c = Coordinates::new(100.01, -200.0, 0.0);

        assert_eq!(a.key(), b.key());
        assert_ne!(a.key(), c.key());
    }
}
