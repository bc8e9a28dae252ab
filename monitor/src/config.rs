//! Configuration loading
//!
//! Values come from a TOML file (managed by `confy`), then command-line
//! flags or their environment variables override individual fields.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use dropwatch_types::{DiscordConfig, Language, MonitorConfig};
use thiserror::Error;

const APP_NAME: &str = "dropwatch";

#[derive(Parser, Debug, Default)]
#[command(version, about = "Announces SCUM cargo drops from the server log")]
pub struct Cli {
    /// TOML config file (defaults to the per-user config location)
    #[arg(short, long, env = "DROPWATCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Server log file to follow
    #[arg(long, env = "LOG_PATH")]
    pub log_path: Option<PathBuf>,

    /// Exact name of the server process
    #[arg(long, env = "SERVER_PROCESS_NAME")]
    pub server_process_name: Option<String>,

    /// Server INI file with the cargo drop timings
    #[arg(long, env = "SERVER_CONFIG_PATH")]
    pub server_config_path: Option<PathBuf>,

    /// Seconds between process checks
    #[arg(long, env = "CHECK_INTERVAL")]
    pub check_interval: Option<u64>,

    #[arg(long, env = "DISCORD_WEBHOOK_URL", hide_env_values = true)]
    pub webhook_url: Option<String>,

    #[arg(long, env = "DISCORD_AUTHOR_NAME")]
    pub author_name: Option<String>,

    #[arg(long, env = "DISCORD_AUTHOR_ICON")]
    pub author_icon: Option<String>,

    /// Notification language (ru, en)
    #[arg(long, env = "APP_LANGUAGE")]
    pub language: Option<String>,

    /// Directory for the monitor's own log file
    #[arg(long, env = "DROPWATCH_LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config file {path:?}: {source}")]
    Load {
        path: PathBuf,
        source: confy::ConfyError,
    },

    #[error("required setting `{0}` is not configured")]
    Missing(&'static str),

    #[error("check interval must be at least one second")]
    InvalidInterval,
}

/// Validated settings, fixed for the lifetime of the process
#[derive(Debug, Clone)]
pub struct Settings {
    pub log_path: PathBuf,
    pub process_name: String,
    pub server_config_path: PathBuf,
    pub check_interval: Duration,
    pub language: Language,
    pub discord: DiscordConfig,
}

/// Read the config file.
///
/// An explicit `--config` path must load. The default per-user location is
/// best effort: failures fall back to defaults and are returned as a warning.
pub fn load(cli: &Cli) -> Result<(MonitorConfig, Option<ConfigError>), ConfigError> {
    match &cli.config {
        Some(path) => load_path(path).map(|config| (config, None)),
        None => match confy::load::<MonitorConfig>(APP_NAME, None) {
            Ok(config) => Ok((config, None)),
            Err(source) => {
                let path = confy::get_configuration_file_path(APP_NAME, None).unwrap_or_default();
                Ok((MonitorConfig::default(), Some(ConfigError::Load { path, source })))
            }
        },
    }
}

fn load_path(path: &Path) -> Result<MonitorConfig, ConfigError> {
    confy::load_path(path).map_err(|source| ConfigError::Load {
        path: path.to_path_buf(),
        source,
    })
}

/// Command-line / environment values win over the file
pub fn apply_overrides(config: &mut MonitorConfig, cli: &Cli) {
    if let Some(path) = &cli.log_path {
        config.log_path = Some(path.clone());
    }
    if let Some(name) = &cli.server_process_name {
        config.server_process_name = Some(name.clone());
    }
    if let Some(path) = &cli.server_config_path {
        config.server_config_path = Some(path.clone());
    }
    if let Some(secs) = cli.check_interval {
        config.check_interval_secs = secs;
    }
    if let Some(url) = &cli.webhook_url {
        config.discord.webhook_url = Some(url.clone());
    }
    if let Some(name) = &cli.author_name {
        config.discord.author_name = name.clone();
    }
    if let Some(icon) = &cli.author_icon {
        config.discord.author_icon = Some(icon.clone());
    }
    if let Some(code) = &cli.language {
        config.language = Language::from_code(code);
    }
    if let Some(dir) = &cli.log_dir {
        config.log_dir = Some(dir.clone());
    }
}

pub fn validate(config: MonitorConfig) -> Result<Settings, ConfigError> {
    let log_path = config.log_path.ok_or(ConfigError::Missing("log_path"))?;
    let process_name = config
        .server_process_name
        .filter(|name| !name.trim().is_empty())
        .ok_or(ConfigError::Missing("server_process_name"))?;
    let server_config_path = config
        .server_config_path
        .ok_or(ConfigError::Missing("server_config_path"))?;

    if config.check_interval_secs == 0 {
        return Err(ConfigError::InvalidInterval);
    }

    let discord = DiscordConfig {
        webhook_url: config.discord.webhook_url.filter(|url| !url.trim().is_empty()),
        ..config.discord
    };

    Ok(Settings {
        log_path,
        process_name,
        server_config_path,
        check_interval: Duration::from_secs(config.check_interval_secs),
        language: config.language,
        discord,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_config() -> MonitorConfig {
        MonitorConfig {
            log_path: Some(PathBuf::from("/srv/scum/SCUM.log")),
            server_process_name: Some("SCUMServer.exe".to_string()),
            server_config_path: Some(PathBuf::from("/srv/scum/ServerSettings.ini")),
            ..MonitorConfig::default()
        }
    }

    #[test]
    fn test_cli_overrides_file() {
        let mut config = complete_config();
        let cli = Cli::try_parse_from([
            "dropwatch",
            "--log-path",
            "/tmp/other.log",
            "--check-interval",
            "3",
            "--language",
            "EN",
            "--webhook-url",
            "https://discord.example/api/webhooks/1/abc",
        ])
        .unwrap();

        apply_overrides(&mut config, &cli);

        assert_eq!(config.log_path, Some(PathBuf::from("/tmp/other.log")));
        assert_eq!(config.check_interval_secs, 3);
        assert_eq!(config.language, Language::En);
        assert_eq!(
            config.discord.webhook_url.as_deref(),
            Some("https://discord.example/api/webhooks/1/abc")
        );
        // Untouched fields keep their file values
        assert_eq!(config.server_process_name.as_deref(), Some("SCUMServer.exe"));
    }

    #[test]
    fn test_validate_complete() {
        let settings = validate(complete_config()).unwrap();
        assert_eq!(settings.process_name, "SCUMServer.exe");
        assert_eq!(settings.check_interval, Duration::from_secs(10));
        assert_eq!(settings.language, Language::Ru);
        assert!(settings.discord.webhook_url.is_none());
    }

    #[test]
    fn test_validate_missing_values() {
        let config = MonitorConfig {
            log_path: None,
            ..complete_config()
        };
        assert!(matches!(validate(config), Err(ConfigError::Missing("log_path"))));

        let config = MonitorConfig {
            server_process_name: Some("  ".to_string()),
            ..complete_config()
        };
        assert!(matches!(
            validate(config),
            Err(ConfigError::Missing("server_process_name"))
        ));

        let config = MonitorConfig {
            check_interval_secs: 0,
            ..complete_config()
        };
        assert!(matches!(validate(config), Err(ConfigError::InvalidInterval)));
    }

    #[test]
    fn test_blank_webhook_means_none() {
        let mut config = complete_config();
        config.discord.webhook_url = Some(String::new());
        assert!(validate(config).unwrap().discord.webhook_url.is_none());
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dropwatch.toml");
        std::fs::write(
            &path,
            "log_path = \"/srv/scum/SCUM.log\"\ncheck_interval_secs = 30\n",
        )
        .unwrap();

        let cli = Cli {
            config: Some(path),
            ..Cli::default()
        };
        let (config, warning) = load(&cli).unwrap();

        assert!(warning.is_none());
        assert_eq!(config.check_interval_secs, 30);
        assert_eq!(config.log_path, Some(PathBuf::from("/srv/scum/SCUM.log")));
    }
}
