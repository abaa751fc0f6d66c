//! Configuration module for `GradeFinder`

use crate::core::models::{Campus, Session};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default CLI configuration loaded based on build profile.
#[cfg(not(debug_assertions))]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultCLIConfigRelease.toml");

#[cfg(debug_assertions)]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultCLIConfigDebug.toml");

#[cfg(not(debug_assertions))]
const CONFIG_FILE_NAME: &str = "config.toml";

#[cfg(debug_assertions)]
const CONFIG_FILE_NAME: &str = "dconfig.toml";

/// Variable expanded to [`Config::get_gradefinder_dir`] in path-like values
pub const DIR_VARIABLE: &str = "$GRADE_FINDER";

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

/// Dataset location configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataConfig {
    /// Directory or `http(s)://` base URL holding the datasets
    #[serde(default)]
    pub root: String,
    /// Dataset directory name of the main campus
    #[serde(default)]
    pub main_campus_dir: String,
    /// Dataset directory name of the satellite campus
    #[serde(default)]
    pub satellite_campus_dir: String,
    /// HTTP request timeout in seconds (0 = no timeout)
    #[serde(default)]
    pub timeout_secs: u64,
}

/// Durable user preferences
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreferencesConfig {
    /// Last selected campus (`v` or `o`)
    #[serde(default)]
    pub campus: String,
    /// Default academic session (e.g., `2023W`)
    #[serde(default)]
    pub session: String,
    /// Page theme (`light` or `dark`)
    #[serde(default)]
    pub theme: String,
}

/// Paths configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory generated pages are written to
    #[serde(default)]
    pub site_dir: String,
    /// JSON file holding the last filter selection
    #[serde(default)]
    pub state_file: String,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Logging settings
    pub logging: LoggingConfig,
    /// Dataset settings
    #[serde(default)]
    pub data: DataConfig,
    /// User preferences
    #[serde(default)]
    pub preferences: PreferencesConfig,
    /// Path settings
    #[serde(default)]
    pub paths: PathsConfig,
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
    /// Override dataset root
    pub data_root: Option<String>,
    /// Override request timeout
    pub timeout_secs: Option<u64>,
    /// Override page theme
    pub theme: Option<String>,
    /// Override site output directory
    pub site_dir: Option<String>,
}

/// Page colour scheme
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    /// Light background
    #[default]
    Light,
    /// Dark background
    Dark,
}

impl Theme {
    /// Value of the page's `data-theme` attribute
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(format!("Invalid theme '{other}' (expected light or dark)")),
        }
    }
}

impl Config {
    /// Get the `$GRADE_FINDER` directory path
    ///
    /// Returns:
    /// - Linux: `~/.config/gradefinder`
    /// - macOS: `~/Library/Application Support/gradefinder`
    /// - Windows: `%APPDATA%\gradefinder`
    #[must_use]
    pub fn get_gradefinder_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gradefinder")
    }

    /// Get the user config file path
    ///
    /// `config.toml` for release builds, `dconfig.toml` for debug builds.
    #[must_use]
    pub fn get_config_file_path() -> PathBuf {
        Self::get_gradefinder_dir().join(CONFIG_FILE_NAME)
    }

    /// Merge missing fields from defaults into this config
    ///
    /// Fields that are empty here and non-empty in `defaults` are copied over,
    /// so upgrading adds new settings without touching customised ones.
    ///
    /// # Returns
    ///
    /// `true` if any field was filled in
    pub fn merge_defaults(&mut self, defaults: &Self) -> bool {
        let mut changed = false;
        let mut fill = |target: &mut String, source: &String| {
            if target.is_empty() && !source.is_empty() {
                target.clone_from(source);
                changed = true;
            }
        };

        fill(&mut self.logging.level, &defaults.logging.level);
        fill(&mut self.logging.file, &defaults.logging.file);

        fill(&mut self.data.root, &defaults.data.root);
        fill(&mut self.data.main_campus_dir, &defaults.data.main_campus_dir);
        fill(
            &mut self.data.satellite_campus_dir,
            &defaults.data.satellite_campus_dir,
        );

        fill(&mut self.preferences.campus, &defaults.preferences.campus);
        fill(&mut self.preferences.session, &defaults.preferences.session);
        fill(&mut self.preferences.theme, &defaults.preferences.theme);

        fill(&mut self.paths.site_dir, &defaults.paths.site_dir);
        fill(&mut self.paths.state_file, &defaults.paths.state_file);

        changed
    }

    /// Apply CLI-provided overrides for this run only
    ///
    /// Only `Some` values replace config values; nothing is persisted.
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
        if let Some(root) = &overrides.data_root {
            self.data.root.clone_from(root);
        }
        if let Some(timeout) = overrides.timeout_secs {
            self.data.timeout_secs = timeout;
        }
        if let Some(theme) = &overrides.theme {
            self.preferences.theme.clone_from(theme);
        }
        if let Some(site_dir) = &overrides.site_dir {
            self.paths.site_dir.clone_from(site_dir);
        }
    }

    /// Expand `$GRADE_FINDER` in a string
    #[must_use]
    fn expand_variables(value: &str) -> String {
        if value.contains(DIR_VARIABLE) {
            let dir = Self::get_gradefinder_dir();
            value.replace(DIR_VARIABLE, dir.to_str().unwrap_or("."))
        } else {
            value.to_string()
        }
    }

    /// Initialize config from a TOML string
    ///
    /// Missing fields take their serde defaults (empty strings, `false`, 0)
    /// and `$GRADE_FINDER` is expanded in path-like values.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML cannot be parsed or doesn't match the schema
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(toml_str)?;

        config.logging.file = Self::expand_variables(&config.logging.file);
        config.data.root = Self::expand_variables(&config.data.root);
        config.paths.site_dir = Self::expand_variables(&config.paths.site_dir);
        config.paths.state_file = Self::expand_variables(&config.paths.state_file);

        Ok(config)
    }

    /// Load configuration from the embedded defaults
    ///
    /// # Panics
    /// Panics if the compiled-in default configuration is not valid TOML.
    #[must_use]
    pub fn from_defaults() -> Self {
        Self::from_toml(CONFIG_DEFAULTS).expect("Failed to parse compiled-in default configuration")
    }

    /// Load configuration from the user config file, creating it on first run
    ///
    /// Falls back to defaults if the file cannot be read or parsed.
    #[must_use]
    pub fn load() -> Self {
        Self::load_from(&Self::get_config_file_path())
    }

    /// Load configuration from an explicit file path
    ///
    /// An existing file is merged with defaults and rewritten when new fields
    /// were added; a missing file is created from defaults.
    #[must_use]
    pub fn load_from(config_file: &Path) -> Self {
        let defaults = Self::from_defaults();

        if config_file.exists() {
            if let Ok(content) = fs::read_to_string(config_file) {
                if let Ok(mut config) = Self::from_toml(&content) {
                    if config.merge_defaults(&defaults) {
                        let _ = config.save_to(config_file);
                    }
                    return config;
                }
            }
            return defaults;
        }

        let _ = defaults.save_to(config_file);
        defaults
    }

    /// Save configuration to the user config file
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created, the config cannot
    /// be serialized, or the file cannot be written.
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.save_to(&Self::get_config_file_path())
    }

    /// Save configuration to an explicit file path
    ///
    /// # Errors
    /// Same as [`save`](Self::save).
    pub fn save_to(&self, config_file: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = config_file.parent() {
            fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        fs::write(config_file, toml_str)?;
        Ok(())
    }

    /// Get a configuration value by key
    ///
    /// Supported keys: `level`, `file`, `verbose`, `data_root`,
    /// `main_campus_dir`, `satellite_campus_dir`, `timeout_secs`, `campus`,
    /// `session`, `theme`, `site_dir`, `state_file`. Dashes are accepted in
    /// place of underscores.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        let value = match key.replace('-', "_").as_str() {
            "level" => self.logging.level.clone(),
            "file" => self.logging.file.clone(),
            "verbose" => self.logging.verbose.to_string(),
            "data_root" | "root" => self.data.root.clone(),
            "main_campus_dir" => self.data.main_campus_dir.clone(),
            "satellite_campus_dir" => self.data.satellite_campus_dir.clone(),
            "timeout_secs" | "timeout" => self.data.timeout_secs.to_string(),
            "campus" => self.preferences.campus.clone(),
            "session" => self.preferences.session.clone(),
            "theme" => self.preferences.theme.clone(),
            "site_dir" => self.paths.site_dir.clone(),
            "state_file" => self.paths.state_file.clone(),
            _ => return None,
        };
        Some(value)
    }

    /// Set a configuration value by key
    ///
    /// Values are validated: `verbose` must be a boolean, `timeout_secs` an
    /// integer, `campus` `v`/`o`, `session` a term like `2023W`, and `theme`
    /// `light`/`dark`. Call [`save()`](Config::save) to persist.
    ///
    /// # Errors
    /// Returns an error if the key is unknown or the value is invalid.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key.replace('-', "_").as_str() {
            "level" => self.logging.level = value.to_string(),
            "file" => self.logging.file = value.to_string(),
            "verbose" => {
                self.logging.verbose = value
                    .parse::<bool>()
                    .map_err(|_| format!("Invalid boolean value for 'verbose': '{value}'"))?;
            }
            "data_root" | "root" => self.data.root = value.to_string(),
            "main_campus_dir" => self.data.main_campus_dir = value.to_string(),
            "satellite_campus_dir" => self.data.satellite_campus_dir = value.to_string(),
            "timeout_secs" | "timeout" => {
                self.data.timeout_secs = value
                    .parse::<u64>()
                    .map_err(|_| format!("Invalid number for 'timeout_secs': '{value}'"))?;
            }
            "campus" => {
                self.preferences.campus = value.parse::<Campus>()?.token().to_string();
            }
            "session" => self.preferences.session = value.parse::<Session>()?.to_string(),
            "theme" => self.preferences.theme = value.parse::<Theme>()?.as_str().to_string(),
            "site_dir" => self.paths.site_dir = value.to_string(),
            "state_file" => self.paths.state_file = value.to_string(),
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Reset a single configuration value to its default
    ///
    /// # Errors
    /// Returns an error if the key is not recognized.
    pub fn unset(&mut self, key: &str, defaults: &Self) -> Result<(), String> {
        match key.replace('-', "_").as_str() {
            "level" => self.logging.level.clone_from(&defaults.logging.level),
            "file" => self.logging.file.clone_from(&defaults.logging.file),
            "verbose" => self.logging.verbose = defaults.logging.verbose,
            "data_root" | "root" => self.data.root.clone_from(&defaults.data.root),
            "main_campus_dir" => self
                .data
                .main_campus_dir
                .clone_from(&defaults.data.main_campus_dir),
            "satellite_campus_dir" => self
                .data
                .satellite_campus_dir
                .clone_from(&defaults.data.satellite_campus_dir),
            "timeout_secs" | "timeout" => self.data.timeout_secs = defaults.data.timeout_secs,
            "campus" => self
                .preferences
                .campus
                .clone_from(&defaults.preferences.campus),
            "session" => self
                .preferences
                .session
                .clone_from(&defaults.preferences.session),
            "theme" => self.preferences.theme.clone_from(&defaults.preferences.theme),
            "site_dir" => self.paths.site_dir.clone_from(&defaults.paths.site_dir),
            "state_file" => self.paths.state_file.clone_from(&defaults.paths.state_file),
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Delete the user config file; the next [`load()`](Config::load)
    /// recreates it from defaults.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be deleted.
    pub fn reset() -> Result<(), std::io::Error> {
        let config_file = Self::get_config_file_path();
        if config_file.exists() {
            fs::remove_file(config_file)?;
        }
        Ok(())
    }

    /// Preferred campus, falling back to the main campus if unset or invalid
    #[must_use]
    pub fn campus(&self) -> Campus {
        self.preferences.campus.parse().unwrap_or_default()
    }

    /// Preferred session, falling back to the default session
    #[must_use]
    pub fn session(&self) -> Session {
        self.preferences.session.parse().unwrap_or_default()
    }

    /// Preferred theme, falling back to light
    #[must_use]
    pub fn theme(&self) -> Theme {
        self.preferences.theme.parse().unwrap_or_default()
    }

    /// Dataset directory name for a campus
    #[must_use]
    pub fn campus_dir(&self, campus: Campus) -> &str {
        match campus {
            Campus::Main => &self.data.main_campus_dir,
            Campus::Satellite => &self.data.satellite_campus_dir,
        }
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[logging]")?;
        writeln!(f, "  level = \"{}\"", self.logging.level)?;
        writeln!(f, "  file = \"{}\"", self.logging.file)?;
        writeln!(f, "  verbose = {}", self.logging.verbose)?;

        writeln!(f, "\n[data]")?;
        writeln!(f, "  root = \"{}\"", self.data.root)?;
        writeln!(f, "  main_campus_dir = \"{}\"", self.data.main_campus_dir)?;
        writeln!(
            f,
            "  satellite_campus_dir = \"{}\"",
            self.data.satellite_campus_dir
        )?;
        writeln!(f, "  timeout_secs = {}", self.data.timeout_secs)?;

        writeln!(f, "\n[preferences]")?;
        writeln!(f, "  campus = \"{}\"", self.preferences.campus)?;
        writeln!(f, "  session = \"{}\"", self.preferences.session)?;
        writeln!(f, "  theme = \"{}\"", self.preferences.theme)?;

        writeln!(f, "\n[paths]")?;
        writeln!(f, "  site_dir = \"{}\"", self.paths.site_dir)?;
        writeln!(f, "  state_file = \"{}\"", self.paths.state_file)?;

        Ok(())
    }
}
