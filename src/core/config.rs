//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.venom/config.toml` unless `--config` points
//! elsewhere. If missing on first run, a commented-out default is generated
//! so users can discover all options.
//!
//! Loading runs before the file logger exists, so diagnostics are collected
//! as [`Notice`]s and written to the log by `main` once it is up.

use log::Level;
use serde::{Deserialize, Serialize};
use simplelog::LevelFilter;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

/// A log line deferred until logging is initialised.
pub type Notice = (Level, String);

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct VenomConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(skip)]
    pub notices: Vec<Notice>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub log_file: Option<String>,
    pub log_level: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct StoreConfig {
    pub backend: Option<String>,
    pub base_url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub bucket: Option<String>,
    pub scope: Option<String>,
    pub collection: Option<String>,
    pub connect_timeout_secs: Option<u64>,
    pub operation_timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ExportConfig {
    pub base_dir: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_LOG_FILE: &str = "venom.log";
pub const DEFAULT_BACKEND: &str = "http";
pub const DEFAULT_STORE_URL: &str = "http://localhost:8091";
pub const DEFAULT_BUCKET: &str = "venom";
pub const DEFAULT_SCOPE: &str = "mindsnap";
pub const DEFAULT_COLLECTION: &str = "projects";
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_OPERATION_TIMEOUT_SECS: u64 = 10;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub log_file: PathBuf,
    pub log_level: LevelFilter,
    pub backend: String,
    pub store: StoreSettings,
    /// `None` means "the working directory at export time".
    pub export_dir: Option<PathBuf>,
    /// Everything loading and resolution had to say, in order.
    pub notices: Vec<Notice>,
}

/// Where the project documents live and how long to wait for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSettings {
    pub base_url: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub bucket: String,
    pub scope: String,
    pub collection: String,
    pub connect_timeout: Duration,
    pub operation_timeout: Duration,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_STORE_URL.to_string(),
            username: None,
            password: None,
            bucket: DEFAULT_BUCKET.to_string(),
            scope: DEFAULT_SCOPE.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            operation_timeout: Duration::from_secs(DEFAULT_OPERATION_TIMEOUT_SECS),
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.venom/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".venom").join("config.toml"))
}

/// Load config from `explicit`, or from `~/.venom/config.toml`.
///
/// A missing default file is generated and treated as empty. A missing
/// explicit file is an error. A malformed file returns `ConfigError::Parse`.
pub fn load_config(explicit: Option<&Path>) -> Result<VenomConfig, ConfigError> {
    if let Some(path) = explicit {
        return read_config(path);
    }

    let mut config = VenomConfig::default();
    let path = match config_path() {
        Some(p) => p,
        None => {
            config.notices.push((
                Level::Warn,
                "Could not determine home directory, using default config".to_string(),
            ));
            return Ok(config);
        }
    };

    if !path.exists() {
        config.notices.push((
            Level::Info,
            format!("No config file found, generating default at {}", path.display()),
        ));
        generate_default_config(&path, &mut config.notices);
        return Ok(config);
    }

    read_config(&path)
}

fn read_config(path: &Path) -> Result<VenomConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let mut config: VenomConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    config
        .notices
        .push((Level::Info, format!("Loaded config from {}", path.display())));
    // Never log the password.
    let summary = format!(
        "Config: backend={:?} base_url={:?} bucket={:?}",
        config.store.backend, config.store.base_url, config.store.bucket
    );
    config.notices.push((Level::Debug, summary));
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path, notices: &mut Vec<Notice>) {
    let default_content = r#"# Venom Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# log_file = "venom.log"             # Or set VENOM_LOG_FILE
# log_level = "info"                 # "error", "warn", "info", "debug", "trace"

# [store]
# backend = "http"                   # "http" or "memory"
# base_url = "http://localhost:8091" # Or set VENOM_STORE_URL
# username = "admin"                 # Or set VENOM_STORE_USERNAME
# password = "secret"                # Or set VENOM_STORE_PASSWORD
# bucket = "venom"
# scope = "mindsnap"
# collection = "projects"
# connect_timeout_secs = 5
# operation_timeout_secs = 10

# [export]
# base_dir = "/home/me/work"         # Or set VENOM_EXPORT_DIR; defaults to the working directory
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            notices.push((Level::Warn, format!("Failed to create config directory: {e}")));
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        notices.push((Level::Warn, format!("Failed to write default config: {e}")));
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
///
/// `cli_backend` is from the `--backend` flag (None = not specified).
pub fn resolve(config: &VenomConfig, cli_backend: Option<&str>) -> ResolvedConfig {
    resolve_with_env(config, cli_backend, |key| std::env::var(key).ok())
}

/// Same as [`resolve`] with the environment supplied by the caller.
pub fn resolve_with_env(
    config: &VenomConfig,
    cli_backend: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    let store = &config.store;
    let mut notices = config.notices.clone();

    // Backend: CLI → env → config → default
    let backend = cli_backend
        .map(|s| s.to_string())
        .or_else(|| env("VENOM_STORE_BACKEND"))
        .or_else(|| store.backend.clone())
        .unwrap_or_else(|| DEFAULT_BACKEND.to_string());

    let log_file = env("VENOM_LOG_FILE")
        .or_else(|| config.general.log_file.clone())
        .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string());

    let log_level = env("VENOM_LOG_LEVEL")
        .or_else(|| config.general.log_level.clone())
        .map(|level| {
            parse_level(&level).unwrap_or_else(|| {
                notices.push((Level::Warn, format!("Unknown log level '{level}', using info")));
                LevelFilter::Info
            })
        })
        .unwrap_or(LevelFilter::Info);

    let settings = StoreSettings {
        base_url: env("VENOM_STORE_URL")
            .or_else(|| store.base_url.clone())
            .unwrap_or_else(|| DEFAULT_STORE_URL.to_string()),
        username: env("VENOM_STORE_USERNAME").or_else(|| store.username.clone()),
        password: env("VENOM_STORE_PASSWORD").or_else(|| store.password.clone()),
        bucket: env("VENOM_BUCKET")
            .or_else(|| store.bucket.clone())
            .unwrap_or_else(|| DEFAULT_BUCKET.to_string()),
        scope: env("VENOM_SCOPE")
            .or_else(|| store.scope.clone())
            .unwrap_or_else(|| DEFAULT_SCOPE.to_string()),
        collection: env("VENOM_COLLECTION")
            .or_else(|| store.collection.clone())
            .unwrap_or_else(|| DEFAULT_COLLECTION.to_string()),
        connect_timeout: Duration::from_secs(
            store
                .connect_timeout_secs
                .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS),
        ),
        operation_timeout: Duration::from_secs(
            store
                .operation_timeout_secs
                .unwrap_or(DEFAULT_OPERATION_TIMEOUT_SECS),
        ),
    };

    let export_dir = env("VENOM_EXPORT_DIR")
        .or_else(|| config.export.base_dir.clone())
        .map(PathBuf::from);

    ResolvedConfig {
        log_file: PathBuf::from(log_file),
        log_level,
        backend,
        store: settings,
        export_dir,
        notices,
    }
}

fn parse_level(level: &str) -> Option<LevelFilter> {
    match level.to_ascii_lowercase().as_str() {
        "off" => Some(LevelFilter::Off),
        "error" => Some(LevelFilter::Error),
        "warn" | "warning" => Some(LevelFilter::Warn),
        "info" => Some(LevelFilter::Info),
        "debug" => Some(LevelFilter::Debug),
        "trace" => Some(LevelFilter::Trace),
        _ => None,
    }
}
