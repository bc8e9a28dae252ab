//! Localized notification text

use chrono::{DateTime, Local, Utc};
use dropwatch_types::Language;
use dropwatch_types::formatting::format_coordinates;

use crate::cargo_drop::CargoDrop;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S (UTC%:z)";

/// Message builder for one display language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Messages {
    language: Language,
}

impl Messages {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    /// Spawn announcement: sector, coordinates, landing and destruction time
    pub fn drop_spawned(&self, drop: &CargoDrop) -> String {
        let sector = drop.sector;
        let coords = coords(drop);
        let landed = local_time(drop.landed_at);
        let destroyed = local_time(drop.destroyed_at);

        match self.language {
            Language::Ru => format!(
                "🗺️ Дроп **{sector}** с координатами 📍 {coords}\n\
                 ⏳ Коснется земли в: {landed}\n\
                 💥 Будет уничтожен в: **{destroyed}**"
            ),
            Language::En => format!(
                "🗺️ Drop **{sector}** with coordinates 📍 {coords}\n\
                 ⏳ Will land at: {landed}\n\
                 💥 Will be destroyed at: **{destroyed}**"
            ),
        }
    }

    /// Sent for each tracked drop when the server restarts or stops
    pub fn drop_disappeared(&self, drop: &CargoDrop) -> String {
        let sector = drop.sector;
        let coords = coords(drop);

        match self.language {
            Language::Ru => format!(
                "🗺️ Дроп **{sector}** с координатами 📍 {coords} 🛑 исчез из-за рестарта сервера."
            ),
            Language::En => format!(
                "🗺️ Drop **{sector}** at coordinates 📍 {coords} 🛑 disappeared due to server restart."
            ),
        }
    }
}

fn coords(drop: &CargoDrop) -> String {
    let c = drop.coordinates;
    format_coordinates(c.x, c.y, c.z)
}

fn local_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format(TIME_FORMAT).to_string()
}
