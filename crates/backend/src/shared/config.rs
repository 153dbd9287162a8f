use chrono::NaiveTime;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub server: ServerConfig,
    pub reports: ReportsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 3000 }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReportsConfig {
    /// Directory holding generated report documents
    pub storage_dir: String,
    /// URL prefix under which stored documents are served
    pub public_prefix: String,
    /// Reference time of day for lateness, `HH:MM`
    pub work_start: String,
    /// Title printed at the top of every generated document
    pub title: String,
}

/// Report settings resolved from [`ReportsConfig`]
#[derive(Debug, Clone)]
pub struct ReportSettings {
    pub storage_dir: PathBuf,
    pub public_prefix: String,
    pub work_start: NaiveTime,
    pub title: String,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from("target/reports"),
            public_prefix: "/reports/files".to_string(),
            work_start: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN),
            title: "Reporte General".to_string(),
        }
    }
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[database]
path = "target/db/app.db"

[server]
port = 3000

[reports]
storage_dir = "target/reports"
public_prefix = "/reports/files"
work_start = "09:00"
title = "Reporte General"
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    if let Some(exe_dir) = exe_dir() {
        let config_path = exe_dir.join("config.toml");

        if config_path.exists() {
            tracing::info!("Loading config from: {}", config_path.display());
            let contents = std::fs::read_to_string(&config_path)?;
            return parse_config(&contents);
        }
        tracing::warn!("config.toml not found at: {}", config_path.display());
    }

    tracing::info!("Using default embedded configuration");
    parse_config(DEFAULT_CONFIG)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let config: Config = toml::from_str(contents)?;
    // Reject a bad work_start at startup rather than at report time
    parse_work_start(&config.reports.work_start)?;
    Ok(config)
}

fn exe_dir() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
}

/// Resolve a configured path; relative paths are taken relative to the
/// executable directory
pub fn resolve_path(path: &str) -> PathBuf {
    let p = Path::new(path);
    if p.is_absolute() {
        return p.to_path_buf();
    }
    match exe_dir() {
        Some(dir) => dir.join(p),
        None => PathBuf::from(path),
    }
}

/// Get the database file path from configuration
pub fn get_database_path(config: &Config) -> PathBuf {
    resolve_path(&config.database.path)
}

pub fn parse_work_start(value: &str) -> anyhow::Result<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map_err(|e| anyhow::anyhow!("invalid reports.work_start '{}': {}", value, e))
}

pub fn report_settings(config: &Config) -> anyhow::Result<ReportSettings> {
    let public_prefix = config.reports.public_prefix.trim_end_matches('/');
    if !public_prefix.starts_with('/') {
        anyhow::bail!(
            "reports.public_prefix must be an absolute URL path below '/', got '{}'",
            config.reports.public_prefix
        );
    }
    Ok(ReportSettings {
        storage_dir: resolve_path(&config.reports.storage_dir),
        public_prefix: public_prefix.to_string(),
        work_start: parse_work_start(&config.reports.work_start)?,
        title: config.reports.title.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.database.path, "target/db/app.db");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.reports.work_start, "09:00");
    }

    #[test]
    fn test_bad_work_start_is_rejected() {
        let broken = DEFAULT_CONFIG.replace("\"09:00\"", "\"nine\"");
        assert!(parse_config(&broken).is_err());
    }

    #[test]
    fn test_report_settings_trim_prefix() {
        let mut config = parse_config(DEFAULT_CONFIG).unwrap();
        config.reports.public_prefix = "/files/".to_string();
        let settings = report_settings(&config).unwrap();
        assert_eq!(settings.public_prefix, "/files");
        assert_eq!(settings.work_start, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
    }

    #[test]
    fn test_root_prefix_is_rejected() {
        let mut config = parse_config(DEFAULT_CONFIG).unwrap();
        for prefix in ["/", "", "files"] {
            config.reports.public_prefix = prefix.to_string();
            assert!(report_settings(&config).is_err(), "{:?}", prefix);
        }
    }
}
