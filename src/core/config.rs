//! Configuration for the gradebook tools

use crate::core::report::{MAX_CHART_SIZE, MIN_CHART_SIZE};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default CLI configuration loaded based on build profile.
/// Uses release defaults in release mode, debug defaults in debug mode.
#[cfg(not(debug_assertions))]
const CONFIG_DEFAULTS: &str = include_str!("../../assets/DefaultCLIConfigRelease.toml");

#[cfg(debug_assertions)]
const CONFIG_DEFAULTS: &str = include_str!("../../assets/DefaultCLIConfigDebug.toml");

#[cfg(not(debug_assertions))]
const CONFIG_FILE_NAME: &str = "config.toml";

#[cfg(debug_assertions)]
const CONFIG_FILE_NAME: &str = "dconfig.toml";

/// Variable expanded to the config directory inside config values
const HOME_VAR: &str = "$GRADEBOOK_HOME";

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_chart_width() -> u32 {
    800
}

const fn default_chart_height() -> u32 {
    400
}

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug)
    #[serde(default)]
    pub level: String,
    /// Log file path
    #[serde(default)]
    pub file: String,
    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,
}

impl LoggingConfig {
    /// Log file with `$GRADEBOOK_HOME` expanded, `None` when unset
    #[must_use]
    pub fn file_path(&self) -> Option<PathBuf> {
        Some(&self.file)
            .filter(|f| !f.is_empty())
            .map(|f| PathBuf::from(expand_home(f)))
    }
}

/// Course/grade service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the LMS backend
    #[serde(default)]
    pub endpoint: String,
    /// Bearer token sent with every request
    #[serde(default)]
    pub token: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            token: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ApiConfig {
    /// Request timeout as a duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Paths configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory for generated reports
    #[serde(default)]
    pub reports_dir: String,
    /// Directory for CSV gradebook exports
    #[serde(default)]
    pub exports_dir: String,
}

impl PathsConfig {
    /// Reports directory with `$GRADEBOOK_HOME` expanded
    #[must_use]
    pub fn reports_path(&self) -> PathBuf {
        PathBuf::from(expand_home(&self.reports_dir))
    }

    /// Exports directory with `$GRADEBOOK_HOME` expanded
    #[must_use]
    pub fn exports_path(&self) -> PathBuf {
        PathBuf::from(expand_home(&self.exports_dir))
    }
}

/// Report generation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Default report format (pdf, html, markdown)
    #[serde(default)]
    pub format: String,
    /// Distribution chart width in pixels
    #[serde(default = "default_chart_width")]
    pub chart_width: u32,
    /// Distribution chart height in pixels
    #[serde(default = "default_chart_height")]
    pub chart_height: u32,
    /// Chrome/Chromium executable used for PDF conversion; empty to auto-detect
    #[serde(default)]
    pub pdf_converter: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: String::new(),
            chart_width: default_chart_width(),
            chart_height: default_chart_height(),
            pdf_converter: String::new(),
        }
    }
}

impl ReportConfig {
    /// Configured PDF converter with `$GRADEBOOK_HOME` expanded, `None` to auto-detect
    #[must_use]
    pub fn converter(&self) -> Option<String> {
        Some(&self.pdf_converter)
            .filter(|c| !c.is_empty())
            .map(|c| expand_home(c))
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Logging settings
    pub logging: LoggingConfig,
    /// Service settings
    #[serde(default)]
    pub api: ApiConfig,
    /// Path settings
    #[serde(default)]
    pub paths: PathsConfig,
    /// Report settings
    #[serde(default)]
    pub report: ReportConfig,
}

/// Optional CLI overrides for configuration values
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Override logging level
    pub level: Option<String>,
    /// Override log file path
    pub file: Option<String>,
    /// Override verbose flag
    pub verbose: Option<bool>,
    /// Override service endpoint
    pub endpoint: Option<String>,
    /// Override service token
    pub token: Option<String>,
    /// Override reports output directory
    pub reports_dir: Option<String>,
}

/// Expand `$GRADEBOOK_HOME` in a config value
///
/// Values are stored unexpanded so the saved file stays portable; callers
/// expand when they turn a value into a path.
#[must_use]
pub fn expand_home(value: &str) -> String {
    if value.contains(HOME_VAR) {
        let home = Config::get_gradebook_dir();
        value.replace(HOME_VAR, &home.to_string_lossy())
    } else {
        value.to_string()
    }
}

/// Copy `default` into `value` when `value` is empty and `default` is not
fn fill_empty(value: &mut String, default: &str) -> bool {
    if value.is_empty() && !default.is_empty() {
        default.clone_into(value);
        true
    } else {
        false
    }
}

impl Config {
    /// Get the `$GRADEBOOK_HOME` directory path
    ///
    /// Returns:
    /// - Linux: `~/.config/gradebook`
    /// - macOS: `~/Library/Application Support/gradebook`
    /// - Windows: `%APPDATA%\gradebook`
    #[must_use]
    pub fn get_gradebook_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gradebook")
    }

    /// Merge missing fields from defaults into this config
    ///
    /// Only string fields that are empty here and non-empty in `defaults` are
    /// updated, so user settings survive upgrades that add new keys.
    ///
    /// # Returns
    ///
    /// `true` if any fields were added/changed, `false` otherwise
    pub fn merge_defaults(&mut self, defaults: &Self) -> bool {
        let merged = [
            fill_empty(&mut self.logging.level, &defaults.logging.level),
            fill_empty(&mut self.logging.file, &defaults.logging.file),
            fill_empty(&mut self.api.endpoint, &defaults.api.endpoint),
            fill_empty(&mut self.api.token, &defaults.api.token),
            fill_empty(&mut self.paths.reports_dir, &defaults.paths.reports_dir),
            fill_empty(&mut self.paths.exports_dir, &defaults.paths.exports_dir),
            fill_empty(&mut self.report.format, &defaults.report.format),
            fill_empty(&mut self.report.pdf_converter, &defaults.report.pdf_converter),
        ];
        merged.contains(&true)
    }

    /// Apply CLI-provided overrides onto the loaded configuration
    ///
    /// Overrides last for the current run only; the configuration file is
    /// not modified. Only non-`None` values replace config values.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let mut config = Config::load();
    /// let overrides = ConfigOverrides {
    ///     token: Some("abc123".to_string()),
    ///     ..Default::default()
    /// };
    /// config.apply_overrides(&overrides);
    /// ```
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(level) = &overrides.level {
            self.logging.level.clone_from(level);
        }
        if let Some(file) = &overrides.file {
            self.logging.file.clone_from(file);
        }
        if let Some(verbose) = overrides.verbose {
            self.logging.verbose = verbose;
        }
        if let Some(endpoint) = &overrides.endpoint {
            self.api.endpoint.clone_from(endpoint);
        }
        if let Some(token) = &overrides.token {
            self.api.token.clone_from(token);
        }
        if let Some(reports_dir) = &overrides.reports_dir {
            self.paths.reports_dir.clone_from(reports_dir);
        }
    }

    /// Get the user config file path
    ///
    /// `config.toml` for release builds, `dconfig.toml` for debug builds, inside
    /// [`get_gradebook_dir`](Self::get_gradebook_dir).
    #[must_use]
    pub fn get_config_file_path() -> PathBuf {
        Self::get_gradebook_dir().join(CONFIG_FILE_NAME)
    }

    /// Initialize config from a TOML string
    ///
    /// Missing fields take their serde defaults. `$GRADEBOOK_HOME` is kept
    /// as written; see [`expand_home`].
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML cannot be parsed or doesn't match the expected schema
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Load configuration from embedded defaults
    ///
    /// # Panics
    /// Panics if the compiled-in default configuration is not valid TOML.
    #[must_use]
    pub fn from_defaults() -> Self {
        Self::from_toml(CONFIG_DEFAULTS).expect("Failed to parse compiled-in default configuration")
    }

    /// Load configuration from file, or create it from defaults on first run
    ///
    /// An existing file has missing fields merged from defaults and is saved
    /// back when anything was added. Any read or parse failure falls back to
    /// the defaults.
    #[must_use]
    pub fn load() -> Self {
        let config_file = Self::get_config_file_path();
        let defaults = Self::from_defaults();

        if !config_file.exists() {
            if let Some(parent) = config_file.parent() {
                let _ = fs::create_dir_all(parent);
            }
            let _ = defaults.save();
            return defaults;
        }

        match fs::read_to_string(&config_file).map(|content| Self::from_toml(&content)) {
            Ok(Ok(mut config)) => {
                if config.merge_defaults(&defaults) {
                    let _ = config.save();
                }
                config
            }
            Ok(Err(e)) => {
                crate::warn!(
                    "Ignoring invalid config file {}: {e}",
                    config_file.display()
                );
                defaults
            }
            Err(e) => {
                crate::warn!("Could not read config file {}: {e}", config_file.display());
                defaults
            }
        }
    }

    /// Save configuration to the platform config file
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be created or the file
    /// cannot be written
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.save_to(&Self::get_config_file_path())
    }

    /// Save configuration to `path`
    ///
    /// # Errors
    /// Returns an error if the parent directory cannot be created or the file
    /// cannot be written
    pub fn save_to(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        fs::write(path, toml_str)?;
        Ok(())
    }

    /// TOML table and key a config key is stored under, e.g. `api.token`
    #[must_use]
    pub fn key_path(key: &str) -> Option<&'static str> {
        let path = match key {
            "level" => "logging.level",
            "file" => "logging.file",
            "verbose" => "logging.verbose",
            "endpoint" => "api.endpoint",
            "token" => "api.token",
            "timeout_secs" | "timeout-secs" => "api.timeout_secs",
            "reports_dir" | "reports-dir" => "paths.reports_dir",
            "exports_dir" | "exports-dir" => "paths.exports_dir",
            "format" => "report.format",
            "chart_width" | "chart-width" => "report.chart_width",
            "chart_height" | "chart-height" => "report.chart_height",
            "pdf_converter" | "pdf-converter" => "report.pdf_converter",
            _ => return None,
        };
        Some(path)
    }

    /// Whether a key holds a credential that must not be echoed
    #[must_use]
    pub fn is_secret(key: &str) -> bool {
        key == "token"
    }

    /// Value of `key` as shown to the user: secrets masked, empty values
    /// marked `(unset)`
    #[must_use]
    pub fn display_value(&self, key: &str) -> Option<String> {
        let value = self.get(key)?;
        Some(if value.is_empty() {
            "(unset)".to_string()
        } else if Self::is_secret(key) {
            mask_secret(&value)
        } else {
            value
        })
    }

    /// Get a configuration value by key
    ///
    /// Supported keys: `level`, `file`, `verbose`, `endpoint`, `token`,
    /// `timeout_secs`, `reports_dir`, `exports_dir`, `format`, `chart_width`,
    /// `chart_height`, `pdf_converter`. Hyphenated spellings are accepted.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "level" => Some(self.logging.level.clone()),
            "file" => Some(self.logging.file.clone()),
            "verbose" => Some(self.logging.verbose.to_string()),
            "endpoint" => Some(self.api.endpoint.clone()),
            "token" => Some(self.api.token.clone()),
            "timeout_secs" | "timeout-secs" => Some(self.api.timeout_secs.to_string()),
            "reports_dir" | "reports-dir" => Some(self.paths.reports_dir.clone()),
            "exports_dir" | "exports-dir" => Some(self.paths.exports_dir.clone()),
            "format" => Some(self.report.format.clone()),
            "chart_width" | "chart-width" => Some(self.report.chart_width.to_string()),
            "chart_height" | "chart-height" => Some(self.report.chart_height.to_string()),
            "pdf_converter" | "pdf-converter" => Some(self.report.pdf_converter.clone()),
            _ => None,
        }
    }

    /// Set a configuration value by key
    ///
    /// Updates the in-memory config only. Call [`save()`](Config::save) to persist.
    ///
    /// # Errors
    /// Returns an error if the key is unknown or the value cannot be parsed
    /// for that key
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "level" => {
                if crate::logger::Level::parse(value).is_none() {
                    return Err(format!("Invalid log level: '{value}'"));
                }
                self.logging.level = value.to_ascii_lowercase();
            }
            "file" => self.logging.file = value.to_string(),
            "verbose" => {
                self.logging.verbose = value
                    .parse::<bool>()
                    .map_err(|_| format!("Invalid boolean value for 'verbose': '{value}'"))?;
            }
            "endpoint" => self.api.endpoint = value.to_string(),
            "token" => self.api.token = value.to_string(),
            "timeout_secs" | "timeout-secs" => {
                self.api.timeout_secs = parse_number(key, value)?;
            }
            "reports_dir" | "reports-dir" => self.paths.reports_dir = value.to_string(),
            "exports_dir" | "exports-dir" => self.paths.exports_dir = value.to_string(),
            "format" => {
                let format: crate::core::report::ReportFormat =
                    value.parse().map_err(|e: crate::core::error::GradebookError| e.to_string())?;
                self.report.format = format.to_string();
            }
            "chart_width" | "chart-width" => self.report.chart_width = parse_chart_size(key, value)?,
            "chart_height" | "chart-height" => {
                self.report.chart_height = parse_chart_size(key, value)?;
            }
            "pdf_converter" | "pdf-converter" => self.report.pdf_converter = value.to_string(),
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Unset a configuration value by key (reset to default)
    ///
    /// # Errors
    /// Returns an error if the key is not recognized.
    pub fn unset(&mut self, key: &str, defaults: &Self) -> Result<(), String> {
        match key {
            "level" => self.logging.level.clone_from(&defaults.logging.level),
            "file" => self.logging.file.clone_from(&defaults.logging.file),
            "verbose" => self.logging.verbose = defaults.logging.verbose,
            "endpoint" => self.api.endpoint.clone_from(&defaults.api.endpoint),
            "token" => self.api.token.clone_from(&defaults.api.token),
            "timeout_secs" | "timeout-secs" => self.api.timeout_secs = defaults.api.timeout_secs,
            "reports_dir" | "reports-dir" => {
                self.paths.reports_dir.clone_from(&defaults.paths.reports_dir);
            }
            "exports_dir" | "exports-dir" => {
                self.paths.exports_dir.clone_from(&defaults.paths.exports_dir);
            }
            "format" => self.report.format.clone_from(&defaults.report.format),
            "chart_width" | "chart-width" => self.report.chart_width = defaults.report.chart_width,
            "chart_height" | "chart-height" => {
                self.report.chart_height = defaults.report.chart_height;
            }
            "pdf_converter" | "pdf-converter" => {
                self.report
                    .pdf_converter
                    .clone_from(&defaults.report.pdf_converter);
            }
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Reset all configuration to defaults by deleting the config file
    ///
    /// The next [`load()`](Config::load) recreates it. Succeeds when there is
    /// no file.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be deleted
    pub fn reset() -> Result<(), std::io::Error> {
        Self::reset_at(&Self::get_config_file_path())
    }

    /// Delete the config file at `path`, succeeding when there is none
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be deleted
    pub fn reset_at(path: &Path) -> Result<(), std::io::Error> {
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, String> {
    value
        .parse::<T>()
        .map_err(|_| format!("Invalid numeric value for '{key}': '{value}'"))
}

fn parse_chart_size(key: &str, value: &str) -> Result<u32, String> {
    let size: u32 = parse_number(key, value)?;
    if (MIN_CHART_SIZE..=MAX_CHART_SIZE).contains(&size) {
        Ok(size)
    } else {
        Err(format!(
            "'{key}' must be between {MIN_CHART_SIZE} and {MAX_CHART_SIZE} pixels, got {size}"
        ))
    }
}

/// Mask all but the last four characters of a secret
fn mask_secret(secret: &str) -> String {
    let count = secret.chars().count();
    if count <= 4 {
        "*".repeat(count)
    } else {
        let tail: String = secret.chars().skip(count - 4).collect();
        format!("{}{tail}", "*".repeat(count - 4))
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[logging]")?;
        writeln!(f, "  level = \"{}\"", self.logging.level)?;
        writeln!(f, "  file = \"{}\"", self.logging.file)?;
        writeln!(f, "  verbose = {}", self.logging.verbose)?;

        writeln!(f, "\n[api]")?;
        writeln!(f, "  endpoint = \"{}\"", self.api.endpoint)?;
        writeln!(f, "  token = \"{}\"", mask_secret(&self.api.token))?;
        writeln!(f, "  timeout_secs = {}", self.api.timeout_secs)?;

        writeln!(f, "\n[paths]")?;
        writeln!(f, "  reports_dir = \"{}\"", self.paths.reports_dir)?;
        writeln!(f, "  exports_dir = \"{}\"", self.paths.exports_dir)?;

        writeln!(f, "\n[report]")?;
        writeln!(f, "  format = \"{}\"", self.report.format)?;
        writeln!(f, "  chart_width = {}", self.report.chart_width)?;
        writeln!(f, "  chart_height = {}", self.report.chart_height)?;
        writeln!(f, "  pdf_converter = \"{}\"", self.report.pdf_converter)?;

        Ok(())
    }
}
