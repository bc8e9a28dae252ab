//! Monitor configuration
//!
//! Every field has a default so a partially filled TOML file still loads;
//! required values are checked by the binary before any task starts.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default seconds between process-table polls
pub const DEFAULT_CHECK_INTERVAL_SECS: u64 = 10;

/// Default author name shown on webhook messages
pub const DEFAULT_AUTHOR_NAME: &str = "SCUM Server";

// ═══════════════════════════════════════════════════════════════════════════
// Language
// ═══════════════════════════════════════════════════════════════════════════

/// Display language for outbound notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    /// Russian (the historical default)
    #[default]
    Ru,
    /// English
    En,
}

impl Language {
    /// Resolve a language code, case-insensitively.
    ///
    /// Unknown codes fall back to [`Language::Ru`].
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_lowercase().as_str() {
            "en" => Self::En,
            _ => Self::Ru,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Ru => "ru",
            Self::En => "en",
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Monitor Configuration
// ═══════════════════════════════════════════════════════════════════════════

/// Discord webhook identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscordConfig {
    /// Webhook URL (None = log messages instead of posting them)
    pub webhook_url: Option<String>,

    /// Name displayed as message author
    pub author_name: String,

    /// Avatar URL of the message author
    pub author_icon: Option<String>,
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            author_name: DEFAULT_AUTHOR_NAME.to_string(),
            author_icon: None,
        }
    }
}

/// Process-wide settings, read once at startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Game server log file to follow
    pub log_path: Option<PathBuf>,

    /// Exact process name of the game server
    pub server_process_name: Option<String>,

    /// Game server INI file holding the cargo drop timings
    pub server_config_path: Option<PathBuf>,

    /// Seconds between process-table polls
    pub check_interval_secs: u64,

    /// Notification language
    pub language: Language,

    /// Directory for the monitor's own rolling log file (None = stderr only)
    pub log_dir: Option<PathBuf>,

    // ─── Notifications ──────────────────────────────────────────────────────
    pub discord: DiscordConfig,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            log_path: None,
            server_process_name: None,
            server_config_path: None,
            check_interval_secs: DEFAULT_CHECK_INTERVAL_SECS,
            language: Language::default(),
            log_dir: None,
            discord: DiscordConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml = r#"
log_path = "/srv/scum/SCUM.log"
language = "en"

[discord]
webhook_url = "https://discord.example/api/webhooks/1/abc"
"#;

        let config: MonitorConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.log_path, Some(PathBuf::from("/srv/scum/SCUM.log")));
        assert_eq!(config.language, Language::En);
        assert_eq!(config.check_interval_secs, DEFAULT_CHECK_INTERVAL_SECS);
        assert_eq!(config.discord.author_name, DEFAULT_AUTHOR_NAME);
        assert!(config.server_process_name.is_none());
    }

    #[test]
    fn test_language_codes() {
        assert_eq!(Language::from_code("EN"), Language::En);
        assert_eq!(Language::from_code(" ru "), Language::Ru);
        assert_eq!(Language::from_code("de"), Language::Ru);
        assert_eq!(Language::En.code(), "en");
    }
}
