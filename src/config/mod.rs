//! Configuration management module.
//!
//! This module handles loading, saving, and validating the application
//! configuration: the enrollment API location, request timeout, validation
//! debounce, consent policy, contact links and log level.

mod error;

pub use error::ConfigError;

use crate::contact::{DEFAULT_CONTACT_EMAIL, DEFAULT_TERMS_URL};
use crate::error::AppError;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
    time::Duration,
};

const FILE_NAME: &str = "config.yml";
const DEFAULT_DIRECTORY_PATH: &str = ".config/enrollment-tui";

pub const DEFAULT_API_BASE_URL: &str = "https://api.novohorizonteteresopolis.com.br";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Oversees management of configuration file.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub debounce_ms: u64,
    pub require_consent: bool,
    pub contact_email: String,
    pub terms_url: String,
    pub log_level: String,
    file_path: Option<PathBuf>,
}

/// Define specification for configuration file.
///
#[derive(Serialize, Deserialize)]
struct FileSpec {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_require_consent")]
    pub require_consent: bool,
    #[serde(default = "default_contact_email")]
    pub contact_email: String,
    #[serde(default = "default_terms_url")]
    pub terms_url: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

fn default_require_consent() -> bool {
    true
}

fn default_contact_email() -> String {
    DEFAULT_CONTACT_EMAIL.to_string()
}

fn default_terms_url() -> String {
    DEFAULT_TERMS_URL.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Return a new instance holding the defaults.
    ///
    pub fn new() -> Config {
        Config {
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            debounce_ms: default_debounce_ms(),
            require_consent: default_require_consent(),
            contact_email: default_contact_email(),
            terms_url: default_terms_url(),
            log_level: default_log_level(),
            file_path: None,
        }
    }

    /// Try to load an existing configuration from the disk using the custom
    /// directory if provided. If no file exists yet, write one holding the
    /// defaults so the user has something to edit.
    ///
    pub fn load(&mut self, custom_path: Option<&str>) -> Result<(), AppError> {
        // Use default path unless custom path provided
        let dir_path = match custom_path {
            Some(path) => Path::new(&path).to_path_buf(),
            None => Config::default_path()?,
        };

        if !dir_path.exists() {
            fs::create_dir_all(&dir_path).map_err(|e| ConfigError::CreateDirectoryFailed {
                path: dir_path.clone(),
                source: e,
            })?;
        }

        let file_path = dir_path.join(Path::new(FILE_NAME));
        self.file_path = Some(file_path.clone());

        if file_path.exists() {
            let contents =
                fs::read_to_string(&file_path).map_err(|e| ConfigError::LoadFailed {
                    path: file_path.clone(),
                    message: format!("IO error: {}", e),
                })?;
            let data: FileSpec = if contents.trim().is_empty() {
                serde_yaml::from_str("{}")
            } else {
                serde_yaml::from_str(&contents)
            }
            .map_err(|e| ConfigError::DeserializationFailed(e.to_string()))?;
            self.apply(data);
        } else {
            self.save()?;
        }

        self.validate()?;
        Ok(())
    }

    /// Serialize the configuration and write it to the disk.
    ///
    pub fn save(&self) -> Result<(), AppError> {
        let file_path = self.file_path.as_ref().ok_or(ConfigError::FilePathNotSet)?;
        let content = serde_yaml::to_string(&self.spec())
            .map_err(|e| ConfigError::SerializationFailed(e.to_string()))?;

        if let Some(parent) = file_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| ConfigError::CreateDirectoryFailed {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        let mut file = fs::File::create(file_path).map_err(|e| ConfigError::SaveFailed {
            path: file_path.clone(),
            source: e,
        })?;
        write!(file, "{}", content).map_err(|e| ConfigError::SaveFailed {
            path: file_path.clone(),
            source: e,
        })?;
        file.flush().map_err(|e| ConfigError::SaveFailed {
            path: file_path.clone(),
            source: e,
        })?;
        Ok(())
    }

    /// Override the API base URL (from the command line).
    ///
    pub fn set_api_base_url(&mut self, url: &str) -> Result<(), AppError> {
        self.api_base_url = url.trim().to_string();
        self.validate()?;
        Ok(())
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Parsed log level.
    ///
    pub fn level_filter(&self) -> Result<LevelFilter, ConfigError> {
        self.log_level
            .trim()
            .parse::<LevelFilter>()
            .map_err(|_| ConfigError::InvalidLogLevel(self.log_level.clone()))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "request_timeout_secs",
                message: "must be greater than zero".to_string(),
            });
        }
        reqwest::Url::parse(&self.api_base_url).map_err(|e| ConfigError::InvalidValue {
            key: "api_base_url",
            message: e.to_string(),
        })?;
        self.level_filter()?;
        Ok(())
    }

    fn apply(&mut self, data: FileSpec) {
        self.api_base_url = data.api_base_url;
        self.request_timeout_secs = data.request_timeout_secs;
        self.debounce_ms = data.debounce_ms;
        self.require_consent = data.require_consent;
        self.contact_email = data.contact_email;
        self.terms_url = data.terms_url;
        self.log_level = data.log_level;
    }

    fn spec(&self) -> FileSpec {
        FileSpec {
            api_base_url: self.api_base_url.clone(),
            request_timeout_secs: self.request_timeout_secs,
            debounce_ms: self.debounce_ms,
            require_consent: self.require_consent,
            contact_email: self.contact_email.clone(),
            terms_url: self.terms_url.clone(),
            log_level: self.log_level.clone(),
        }
    }

    /// Returns the path buffer for the default configuration directory or an
    /// error if the home directory could not be found.
    ///
    fn default_path() -> Result<PathBuf, AppError> {
        match dirs::home_dir() {
            Some(home) => Ok(home.join(DEFAULT_DIRECTORY_PATH)),
            None => Err(ConfigError::HomeDirectoryNotFound.into()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "enrollment-tui-{}-{}",
            name,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_load_writes_defaults_when_missing() {
        let dir = scratch_dir("defaults");
        let mut config = Config::new();
        config.load(dir.to_str()).unwrap();

        let file = dir.join(FILE_NAME);
        assert!(file.exists());
        assert_eq!(config.file_path(), Some(file.as_path()));
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.debounce(), Duration::from_millis(300));
        assert!(config.require_consent);

        let mut reloaded = Config::new();
        reloaded.load(dir.to_str()).unwrap();
        assert_eq!(reloaded, config);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let dir = scratch_dir("partial");
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join(FILE_NAME),
            "api_base_url: http://localhost:3000\nrequire_consent: false\n",
        )
        .unwrap();

        let mut config = Config::new();
        config.load(dir.to_str()).unwrap();
        assert_eq!(config.api_base_url, "http://localhost:3000");
        assert!(!config.require_consent);
        assert_eq!(config.terms_url, DEFAULT_TERMS_URL);
        assert_eq!(config.level_filter().unwrap(), LevelFilter::Info);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let dir = scratch_dir("invalid");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(FILE_NAME), "request_timeout_secs: 0\n").unwrap();
        let mut config = Config::new();
        let error = config.load(dir.to_str()).unwrap_err();
        assert!(error.to_string().contains("request_timeout_secs"));

        fs::write(dir.join(FILE_NAME), "log_level: loud\n").unwrap();
        let mut config = Config::new();
        assert!(config.load(dir.to_str()).is_err());

        fs::write(dir.join(FILE_NAME), "debounce_ms: [1, 2\n").unwrap();
        let mut config = Config::new();
        let error = config.load(dir.to_str()).unwrap_err();
        assert!(error.to_string().contains("deserialize"));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_api_url_override_is_validated() {
        let mut config = Config::new();
        config.set_api_base_url(" http://127.0.0.1:8080 ").unwrap();
        assert_eq!(config.api_base_url, "http://127.0.0.1:8080");
        assert!(config.set_api_base_url("not a url").is_err());
    }

    #[test]
    fn test_save_without_path_fails() {
        let config = Config::new();
        assert!(config.save().is_err());
    }
}
