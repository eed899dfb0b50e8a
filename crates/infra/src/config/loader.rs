//! Configuration loader
//!
//! ## Loading Strategy
//! 1. If `CALEX_CONTAINER_ID` is set, the whole configuration comes from
//!    environment variables
//! 2. Otherwise the first config file found by [`probe_config_paths`] is used
//! 3. With no file either, built-in defaults apply
//!
//! Every path ends in [`Config::validate`].
//!
//! ## Environment Variables
//! - `CALEX_CONTAINER_ID`: Root container element id (selects the env path)
//! - `CALEX_ROW_CLASS`: Class carried by event rows
//! - `CALEX_ROWS_CONTAINER_SELECTOR`: Selector of a bulk-rendered rows container
//! - `CALEX_REAPPLY_INTERVAL_MS`: Description re-apply period in milliseconds
//! - `CALEX_INTERSECTION_THRESHOLD`: Visible fraction required to count as entering
//! - `CALEX_DEBUG_STORE`: Log cache snapshots on every mutation (true/false)
//! - `CALEX_LOG_LEVEL`: Default tracing filter directive
//! - `CALEX_LOG_JSON`: Emit JSON log lines (true/false)
//!
//! ## File Locations
//! `calex.toml`, `calex.json`, `config.toml` and `config.json` are probed in
//! the working directory, its parent, and next to the executable.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use calex_domain::{CalexError, Config, EngineConfig, LoggingConfig, PageConfig, Result};

const ENV_CONTAINER_ID: &str = "CALEX_CONTAINER_ID";
const ENV_ROW_CLASS: &str = "CALEX_ROW_CLASS";
const ENV_ROWS_CONTAINER_SELECTOR: &str = "CALEX_ROWS_CONTAINER_SELECTOR";
const ENV_REAPPLY_INTERVAL_MS: &str = "CALEX_REAPPLY_INTERVAL_MS";
const ENV_INTERSECTION_THRESHOLD: &str = "CALEX_INTERSECTION_THRESHOLD";
const ENV_DEBUG_STORE: &str = "CALEX_DEBUG_STORE";
const ENV_LOG_LEVEL: &str = "CALEX_LOG_LEVEL";
const ENV_LOG_JSON: &str = "CALEX_LOG_JSON";

const CONFIG_FILE_NAMES: [&str; 4] = ["calex.toml", "calex.json", "config.toml", "config.json"];

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `CalexError::Config` if the selected source is malformed or the
/// resulting configuration fails validation. A missing file is not an error.
pub fn load() -> Result<Config> {
    if std::env::var_os(ENV_CONTAINER_ID).is_some() {
        let config = load_from_env()?;
        tracing::info!("Configuration loaded from environment variables");
        return Ok(config);
    }

    match probe_config_paths() {
        Some(path) => load_from_file(Some(path)),
        None => {
            tracing::info!("No config file found, using defaults");
            Ok(Config::default())
        }
    }
}

/// Load configuration from environment variables
///
/// `CALEX_CONTAINER_ID` is required; every other variable falls back to its
/// default when unset.
///
/// # Errors
/// Returns `CalexError::Config` if the container id is missing or a value
/// cannot be parsed.
pub fn load_from_env() -> Result<Config> {
    let page_defaults = PageConfig::default();
    let engine_defaults = EngineConfig::default();
    let logging_defaults = LoggingConfig::default();

    let config = Config {
        page: PageConfig {
            container_id: env_var(ENV_CONTAINER_ID)?,
            row_class: env_or(ENV_ROW_CLASS, page_defaults.row_class),
            rows_container_selector: env_or(
                ENV_ROWS_CONTAINER_SELECTOR,
                page_defaults.rows_container_selector,
            ),
        },
        engine: EngineConfig {
            reapply_interval_ms: env_parse(ENV_REAPPLY_INTERVAL_MS)?
                .unwrap_or(engine_defaults.reapply_interval_ms),
            intersection_threshold: env_parse(ENV_INTERSECTION_THRESHOLD)?
                .unwrap_or(engine_defaults.intersection_threshold),
            debug_store: env_bool(ENV_DEBUG_STORE, engine_defaults.debug_store),
        },
        logging: LoggingConfig {
            level: env_or(ENV_LOG_LEVEL, logging_defaults.level),
            json: env_bool(ENV_LOG_JSON, logging_defaults.json),
        },
    };

    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations. Format is chosen by
/// extension (`.toml` or `.json`); absent sections take their defaults.
///
/// # Errors
/// Returns `CalexError::Config` if no file is found, it cannot be read or
/// parsed, or the result fails validation.
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(CalexError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            CalexError::Config("No config file found in any of the standard locations".into())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| CalexError::Config(format!("Failed to read config file: {e}")))?;

    let config = parse_config(&contents, &config_path)?;
    config.validate()?;
    Ok(config)
}

fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| CalexError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| CalexError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(CalexError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe the standard locations for a configuration file
///
/// Returns the first existing candidate, or `None`.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        let parent = cwd.join("..");
        dirs.push(cwd);
        dirs.push(parent);
    }
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            dirs.push(exe_dir.to_path_buf());
        }
    }

    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.is_file())
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key)
        .map_err(|_| CalexError::Config(format!("Missing required environment variable: {key}")))
}

fn env_or(key: &str, default: String) -> String {
    std::env::var(key).ok().filter(|value| !value.is_empty()).unwrap_or(default)
}

fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| CalexError::Config(format!("Invalid value for {key}: {e}"))),
        Err(_) => Ok(None),
    }
}

/// Accepts `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
