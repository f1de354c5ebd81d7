//! # Configuration management for Quick IDE Core
//!
//! Settings are loaded with the following priority:
//! 1. Command line arguments (highest priority)
//! 2. Environment variables (`QUICKIDE_PROJECTS_ROOT`, `QUICKIDE_LOG`)
//! 3. Configuration file
//! 4. Default values (lowest priority)

use crate::manifest::{Version, DEFAULT_ENGINE_VERSION, DEFAULT_VERSION};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable overriding [`WorkspaceConfig::projects_root`].
pub const ENV_PROJECTS_ROOT: &str = "QUICKIDE_PROJECTS_ROOT";

/// Environment variable overriding [`LoggingConfig::level`].
pub const ENV_LOG_LEVEL: &str = "QUICKIDE_LOG";

const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

/// Main configuration structure for Quick IDE.
///
/// # Example
///
/// ```rust
/// use quickide_core::Config;
///
/// let config = Config::default();
/// assert_eq!(config.project.locales, vec!["en_US".to_string()]);
/// assert_eq!(config.generation.default_namespace, "wiki");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where projects live
    pub workspace: WorkspaceConfig,
    /// Defaults for new projects
    pub project: ProjectDefaults,
    /// Document generation settings
    pub generation: GenerationConfig,
    /// Export settings
    pub export: ExportConfig,
    /// Logging settings
    pub logging: LoggingConfig,
}

/// Workspace location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    /// Directory holding one sub-directory per project
    pub projects_root: PathBuf,
}

/// Defaults applied when creating a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectDefaults {
    /// Pack version
    pub version: Version,
    /// Minimum engine version
    pub engine_version: Version,
    /// Locales scaffolded into `texts/`
    pub locales: Vec<String>,
    /// Keep the behavior pack `scripts` folder
    pub include_scripts: bool,
    /// Keep the behavior pack `functions` folder
    pub include_functions: bool,
}

/// Document generation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Namespace for derived recipe identifiers
    pub default_namespace: String,
}

/// Export settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory archives are written to when no path is given
    pub default_directory: PathBuf,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
}

fn quick_dir() -> PathBuf {
    dirs::document_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_default()
        .join("Quick")
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            projects_root: quick_dir().join("projects"),
        }
    }
}

impl Default for ProjectDefaults {
    fn default() -> Self {
        Self {
            version: DEFAULT_VERSION,
            engine_version: DEFAULT_ENGINE_VERSION,
            locales: vec![crate::lang::DEFAULT_LOCALE.to_string()],
            include_scripts: true,
            include_functions: true,
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            default_namespace: crate::generator::recipe::DEFAULT_NAMESPACE.to_string(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            default_directory: quick_dir().join("exports"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the default location or create default config.
    ///
    /// See [`Config::load_or_create`].
    pub fn load_or_default() -> Result<Self> {
        Self::load_or_create(Self::default_config_path()?)
    }

    /// Load configuration from `path`, or write and return the defaults if
    /// no file exists there yet.
    ///
    /// # Errors
    ///
    /// An existing file that cannot be read, parsed or validated is an error
    /// and is left as it is. Failing to write the defaults is only logged.
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::load_from_file(path);
        }

        let config = Self::default();
        match config.save_to_file(path) {
            Ok(()) => info!("Created default configuration at {}", path.display()),
            Err(e) => warn!("Failed to save default configuration: {}", e),
        }
        Ok(config)
    }

    /// Load configuration from the default config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        Self::load_from_file(&config_path)
    }

    /// Load configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use quickide_core::Config;
    /// use std::path::Path;
    ///
    /// let config = Config::load_from_file(Path::new("quickide.toml"))?;
    /// # Ok::<(), quickide_core::Error>(())
    /// ```
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::config(format!("Failed to parse config file: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default config file.
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path()?;
        self.save_to_file(&config_path)
    }

    /// Save configuration to a specific file, creating its directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or cannot be written.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.validate()?;

        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::config(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::config(format!("Failed to create config directory: {}", e)))?;
        }

        std::fs::write(path, content)
            .map_err(|e| Error::config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Apply `QUICKIDE_PROJECTS_ROOT` and `QUICKIDE_LOG` from the process
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns a validation error, leaving `self` unchanged, if the result
    /// is not a valid configuration.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides_from(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable lookup, then validate.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut updated = self.clone();
        if let Some(root) = lookup(ENV_PROJECTS_ROOT).filter(|v| !v.trim().is_empty()) {
            updated.workspace.projects_root = PathBuf::from(root);
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL).filter(|v| !v.trim().is_empty()) {
            updated.logging.level = level.trim().to_ascii_lowercase();
        }

        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Validate the configuration values.
    ///
    /// # Example
    ///
    /// ```rust
    /// use quickide_core::Config;
    ///
    /// let mut config = Config::default();
    /// assert!(config.validate().is_ok());
    ///
    /// config.generation.default_namespace = "bad:ns".to_string();
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<()> {
        if self.project.locales.is_empty() {
            return Err(Error::validation(
                "project.locales",
                "At least one locale is required",
            ));
        }

        if let Some(bad) = self.project.locales.iter().find(|l| !is_locale_name(l)) {
            return Err(Error::validation(
                "project.locales",
                format!("'{}' is not a locale name like en_US", bad),
            ));
        }

        let namespace = &self.generation.default_namespace;
        if namespace.trim().is_empty()
            || namespace.contains(':')
            || namespace.chars().any(char::is_whitespace)
        {
            return Err(Error::validation(
                "generation.default_namespace",
                "Namespace must be a non-empty word without ':'",
            ));
        }

        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(Error::validation(
                "logging.level",
                "Log level must be one of: error, warn, info, debug, trace",
            ));
        }

        Ok(())
    }

    /// Get the default configuration file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory cannot be determined.
    pub fn default_config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Get the configuration directory.
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("quickide"))
            .ok_or_else(|| Error::config("Could not determine config directory"))
    }
}

fn is_locale_name(locale: &str) -> bool {
    let bytes = locale.as_bytes();
    bytes.len() == 5
        && bytes[0].is_ascii_lowercase()
        && bytes[1].is_ascii_lowercase()
        && bytes[2] == b'_'
        && bytes[3].is_ascii_uppercase()
        && bytes[4].is_ascii_uppercase()
}
