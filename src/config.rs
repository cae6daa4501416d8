use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_SERVER_URL: &str = "http://localhost:8080";

/// Source of a configuration value
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    File,
    Environment,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::File => write!(f, "file"),
            ConfigSource::Environment => write!(f, "environment"),
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }
}

/// Client configuration with source tracking
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Base URL of the prayer API server
    pub server_url: ConfigValue<String>,
    /// Session id from the last login
    #[serde(skip_serializing)]
    pub session_token: Option<ConfigValue<String>>,
    /// Where the config file lives (read from and written to)
    pub config_path: PathBuf,
    /// Whether the config file existed when loaded
    pub file_found: bool,
}

/// On-disk config file layout
#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    server_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    session_token: Option<String>,
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        Self::load_with(config_path, |key| std::env::var(key).ok())
    }

    fn load_with(
        config_path: Option<PathBuf>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let path = config_path.unwrap_or_else(Self::default_config_path);

        let mut server_url =
            ConfigValue::new(DEFAULT_SERVER_URL.to_string(), ConfigSource::Default);
        let mut session_token = None;

        let file_found = path.exists();
        if file_found {
            let file = read_file(&path)?;
            if let Some(url) = file.server_url {
                server_url = ConfigValue::new(url, ConfigSource::File);
            }
            if let Some(token) = file.session_token {
                session_token = Some(ConfigValue::new(token, ConfigSource::File));
            }
        }

        // Apply environment variable overrides
        if let Some(url) = env("PRAYERTRACK_SERVER_URL") {
            server_url = ConfigValue::new(url, ConfigSource::Environment);
        }
        if let Some(token) = env("PRAYERTRACK_SESSION_TOKEN") {
            session_token = Some(ConfigValue::new(token, ConfigSource::Environment));
        }

        Ok(Self {
            server_url,
            session_token,
            config_path: path,
            file_found,
        })
    }

    pub fn token(&self) -> Option<String> {
        self.session_token.as_ref().map(|t| t.value.clone())
    }

    /// Writes (or clears) the session token in the config file, keeping any
    /// other settings already there.
    pub fn save_token(&mut self, token: Option<&str>) -> Result<(), ConfigError> {
        let path = &self.config_path;

        let mut file = if path.exists() {
            read_file(path)?
        } else {
            ConfigFile::default()
        };
        file.session_token = token.map(str::to_string);

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ConfigError::WriteError(path.clone(), e))?;
        }
        let contents = serde_yaml::to_string(&file)
            .map_err(|e| ConfigError::ParseError(path.clone(), e))?;
        std::fs::write(path, contents).map_err(|e| ConfigError::WriteError(path.clone(), e))?;

        self.session_token = token.map(|t| ConfigValue::new(t.to_string(), ConfigSource::File));
        self.file_found = true;
        Ok(())
    }

    /// Default config file path (platform config dir)/prayertrack/config.yaml
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("prayertrack")
            .join("config.yaml")
    }
}

fn read_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::ReadError(path.to_path_buf(), e))?;
    serde_yaml::from_str(&contents).map_err(|e| ConfigError::ParseError(path.to_path_buf(), e))
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    WriteError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::WriteError(path, e) => {
                write!(f, "Failed to write config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
