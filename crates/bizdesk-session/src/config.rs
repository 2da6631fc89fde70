//! # Session Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     BIZDESK_STORAGE=memory                                             │
//! │     BIZDESK_DATA_DIR=/srv/bizdesk                                      │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/bizdesk/bizdesk.toml (Linux)                             │
//! │     ~/Library/Application Support/com.bizdesk.bizdesk/bizdesk.toml     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     file storage in the platform data dir, BOB, 2 decimals             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # bizdesk.toml
//! [storage]
//! backend = "file"        # file | memory
//! data_dir = "/srv/bizdesk/drafts"
//!
//! [currency]
//! code = "BOB"
//! symbol = "Bs"
//! decimals = 2
//!
//! [logging]
//! filter = "info,bizdesk=debug"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use bizdesk_core::validation::validate_currency_code;
use bizdesk_core::{Money, DEFAULT_CURRENCY};

/// Name of the configuration file inside the platform config directory.
pub const CONFIG_FILE_NAME: &str = "bizdesk.toml";

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to encode config: {0}")]
    Encode(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// The configured data directory could not be opened.
    #[error("Storage unusable: {0}")]
    Storage(#[from] bizdesk_store::StoreError),

    /// No platform directory could be determined and none was configured.
    #[error("No data directory available; set BIZDESK_DATA_DIR")]
    NoDataDir,
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Storage Backend
// =============================================================================

/// Where drafts are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// One JSON file per draft in the data directory; survives restarts.
    #[default]
    File,

    /// Process memory only; drafts are lost on exit.
    Memory,
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackend::File => write!(f, "file"),
            StorageBackend::Memory => write!(f, "memory"),
        }
    }
}

impl std::str::FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "file" | "disk" => Ok(StorageBackend::File),
            "memory" | "mem" => Ok(StorageBackend::Memory),
            other => Err(ConfigError::Invalid(format!(
                "Unknown storage backend: '{}'. Valid options: file, memory",
                other
            ))),
        }
    }
}

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageSettings {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Overrides the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencySettings {
    /// Currency code of new drafts.
    #[serde(default = "default_currency_code")]
    pub code: String,

    /// Symbol used by [`SessionConfig::format_amount`].
    #[serde(default = "default_currency_symbol")]
    pub symbol: String,

    /// Decimal places shown by [`SessionConfig::format_amount`], at most
    /// [`MAX_DISPLAY_DECIMALS`].
    ///
    /// Amounts are always held in hundredths. Fewer places round half away
    /// from zero; more places pad with zeros.
    #[serde(default = "default_decimals")]
    pub decimals: u8,
}

fn default_currency_code() -> String {
    DEFAULT_CURRENCY.to_string()
}

fn default_currency_symbol() -> String {
    "Bs".to_string()
}

/// Upper bound for [`CurrencySettings::decimals`].
pub const MAX_DISPLAY_DECIMALS: u8 = 4;

/// Decimal places of a [`Money`] value (hundredths).
const MONEY_DECIMALS: u32 = 2;

fn default_decimals() -> u8 {
    2
}

impl Default for CurrencySettings {
    fn default() -> Self {
        CurrencySettings {
            code: default_currency_code(),
            symbol: default_currency_symbol(),
            decimals: default_decimals(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// `tracing_subscriber::EnvFilter` directive; `RUST_LOG` wins over it.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    "info,bizdesk_store=debug,bizdesk_session=debug".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            filter: default_log_filter(),
        }
    }
}

// =============================================================================
// Session Config
// =============================================================================

/// Complete session configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub currency: CurrencySettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

impl SessionConfig {
    /// In-memory configuration for tests and throwaway sessions.
    pub fn in_memory() -> Self {
        let mut config = SessionConfig::default();
        config.storage.backend = StorageBackend::Memory;
        config
    }

    /// Loads configuration from defaults, the config file, then environment.
    ///
    /// A missing file is not an error; an unparsable one is.
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = match config_path.or_else(Self::default_config_path) {
            Some(path) if path.exists() => {
                info!(?path, "Loading session config from file");
                Self::from_toml_str(&std::fs::read_to_string(&path)?)?
            }
            Some(path) => {
                debug!(?path, "Config file not found, using defaults");
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Loads config or returns the defaults if loading fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load session config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Parses TOML without validating it; [`load`](Self::load) validates
    /// after environment overrides are applied.
    pub fn from_toml_str(contents: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Writes the configuration as TOML, creating parent directories.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;

        info!(?path, "Session config saved");
        Ok(())
    }

    pub fn validate(&self) -> ConfigResult<()> {
        validate_currency_code(&self.currency.code)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        if self.currency.decimals > MAX_DISPLAY_DECIMALS {
            return Err(ConfigError::Invalid(format!(
                "currency decimals must be at most {}, got {}",
                MAX_DISPLAY_DECIMALS, self.currency.decimals
            )));
        }

        if self.logging.filter.trim().is_empty() {
            return Err(ConfigError::Invalid("log filter must not be empty".into()));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Applies `BIZDESK_*` overrides read through `lookup`.
    ///
    /// Unparsable values are logged and ignored.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(backend) = lookup("BIZDESK_STORAGE") {
            match backend.parse() {
                Ok(parsed) => {
                    debug!(backend = %parsed, "Overriding storage backend from environment");
                    self.storage.backend = parsed;
                }
                Err(e) => warn!("Ignoring BIZDESK_STORAGE: {}", e),
            }
        }

        if let Some(dir) = lookup("BIZDESK_DATA_DIR") {
            debug!(data_dir = %dir, "Overriding data directory from environment");
            self.storage.data_dir = Some(PathBuf::from(dir));
        }

        if let Some(code) = lookup("BIZDESK_CURRENCY") {
            self.currency.code = code.trim().to_uppercase();
        }

        if let Some(symbol) = lookup("BIZDESK_CURRENCY_SYMBOL") {
            self.currency.symbol = symbol;
        }

        if let Some(decimals) = lookup("BIZDESK_CURRENCY_DECIMALS") {
            match decimals.parse::<u8>() {
                Ok(d) => self.currency.decimals = d,
                Err(_) => warn!(value = %decimals, "Ignoring BIZDESK_CURRENCY_DECIMALS"),
            }
        }

        if let Some(filter) = lookup("BIZDESK_LOG") {
            self.logging.filter = filter;
        }
    }

    /// Platform config file location.
    pub fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Directory the file backend writes drafts into.
    pub fn data_dir(&self) -> ConfigResult<PathBuf> {
        if let Some(dir) = &self.storage.data_dir {
            return Ok(dir.clone());
        }
        project_dirs()
            .map(|dirs| dirs.data_dir().join("drafts"))
            .ok_or(ConfigError::NoDataDir)
    }

    // =========================================================================
    // Display Helpers
    // =========================================================================

    /// Formats an amount for display, e.g. `Bs 1234.50`.
    ///
    /// ```rust
    /// use bizdesk_core::Money;
    /// use bizdesk_session::SessionConfig;
    ///
    /// let mut config = SessionConfig::default();
    /// assert_eq!(config.format_amount(Money::from_minor(123450)), "Bs 1234.50");
    ///
    /// config.currency.decimals = 0;
    /// assert_eq!(config.format_amount(Money::from_minor(123450)), "Bs 1235");
    /// ```
    pub fn format_amount(&self, amount: Money) -> String {
        let decimals = u32::from(self.currency.decimals.min(MAX_DISPLAY_DECIMALS));
        let hundredths = i128::from(amount.minor_units()).abs();

        let (whole, frac) = if decimals >= MONEY_DECIMALS {
            let minor_per_major = 10_i128.pow(MONEY_DECIMALS);
            (
                hundredths / minor_per_major,
                (hundredths % minor_per_major) * 10_i128.pow(decimals - MONEY_DECIMALS),
            )
        } else {
            let step = 10_i128.pow(MONEY_DECIMALS - decimals);
            let rounded = (hundredths + step / 2) / step;
            let scale = 10_i128.pow(decimals);
            (rounded / scale, rounded % scale)
        };

        let digits = if decimals > 0 {
            format!("{}.{:0width$}", whole, frac, width = decimals as usize)
        } else {
            whole.to_string()
        };

        let sign = if amount.is_negative() && (whole, frac) != (0, 0) {
            "-"
        } else {
            ""
        };
        if self.currency.symbol.is_empty() {
            format!("{}{}", sign, digits)
        } else {
            format!("{}{} {}", sign, self.currency.symbol, digits)
        }
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "bizdesk", "bizdesk")
}
