//! Configuration for the web service.
//!
//! Settings are layered, lowest precedence first:
//!
//! 1. defaults of the selected environment (production, development, test)
//! 2. an optional TOML file
//! 3. `KNOWLIFT_*` environment variables
//!
//! Production has no default database or secret key; both must come from
//! the file or the environment.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Missing required field
    #[error("Missing required configuration field: {0}")]
    MissingField(String),

    /// A value could not be interpreted
    #[error("Invalid value for {field}: {value}")]
    InvalidValue {
        /// Setting name
        field: String,
        /// Offending value
        value: String,
    },
}

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Live deployment
    Production,
    /// Local development
    Development,
    /// Automated tests
    Test,
}

impl Environment {
    /// Resolve an environment name
    ///
    /// Case and surrounding whitespace are ignored. Unknown names fall back
    /// to production.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "development" => Environment::Development,
            "test" => Environment::Test,
            _ => Environment::Production,
        }
    }

    /// Name of the environment
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Production => "production",
            Environment::Development => "development",
            Environment::Test => "test",
        }
    }
}

/// Web service configuration
#[derive(Debug, Clone, Serialize)]
pub struct WebConfig {
    /// Environment the settings were resolved for
    pub environment: Environment,

    /// Bind address (e.g., "127.0.0.1")
    pub bind_address: String,

    /// Bind port (e.g., 8000)
    pub bind_port: u16,

    /// SQLite database file
    pub database: PathBuf,

    /// Secret used to sign session tokens
    #[serde(skip_serializing)]
    pub secret_key: String,

    /// Session token lifetime in seconds
    pub session_expiry_secs: u64,

    /// Default log filter (overridden by RUST_LOG)
    pub log_level: String,

    /// Number of answers after which the level is reassessed
    pub answer_window: u32,
}

/// Settings as they appear in a TOML file; every key is optional
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Bind address
    pub bind_address: Option<String>,
    /// Bind port
    pub bind_port: Option<u16>,
    /// SQLite database file
    pub database: Option<PathBuf>,
    /// Session signing secret
    pub secret_key: Option<String>,
    /// Session token lifetime in seconds
    pub session_expiry_secs: Option<u64>,
    /// Default log filter
    pub log_level: Option<String>,
    /// Answers per level reassessment
    pub answer_window: Option<u32>,
}

impl ConfigFile {
    /// Load a config file from disk
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let file: ConfigFile = toml::from_str(&contents)?;
        Ok(file)
    }
}

const DEVELOPMENT_SECRET_KEY: &str = "development-secret-key-do-not-use-in-production";
const DEFAULT_SESSION_EXPIRY_SECS: u64 = 86_400;
const DEFAULT_ANSWER_WINDOW: u32 = 10;

/// Partially resolved settings while layers are applied
#[derive(Debug, Clone)]
struct Layered {
    bind_address: String,
    bind_port: u16,
    database: Option<PathBuf>,
    secret_key: Option<String>,
    session_expiry_secs: u64,
    log_level: String,
    answer_window: u32,
}

impl Layered {
    fn defaults(environment: Environment) -> Self {
        let (database, secret_key, log_level) = match environment {
            Environment::Production => (None, None, "info"),
            Environment::Development => (
                Some(PathBuf::from("development.db")),
                Some(DEVELOPMENT_SECRET_KEY.to_string()),
                "debug",
            ),
            Environment::Test => (
                Some(PathBuf::from(":memory:")),
                Some("test-secret-key-do-not-use-in-production".to_string()),
                "warn",
            ),
        };

        Self {
            bind_address: "127.0.0.1".to_string(),
            bind_port: 8000,
            database,
            secret_key,
            session_expiry_secs: DEFAULT_SESSION_EXPIRY_SECS,
            log_level: log_level.to_string(),
            answer_window: DEFAULT_ANSWER_WINDOW,
        }
    }

    fn apply_file(&mut self, file: ConfigFile) {
        if let Some(v) = file.bind_address {
            self.bind_address = v;
        }
        if let Some(v) = file.bind_port {
            self.bind_port = v;
        }
        if let Some(v) = file.database {
            self.database = Some(v);
        }
        if let Some(v) = file.secret_key {
            self.secret_key = Some(v);
        }
        if let Some(v) = file.session_expiry_secs {
            self.session_expiry_secs = v;
        }
        if let Some(v) = file.log_level {
            self.log_level = v;
        }
        if let Some(v) = file.answer_window {
            self.answer_window = v;
        }
    }

    fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("KNOWLIFT_BIND_ADDRESS") {
            self.bind_address = v;
        }
        if let Some(v) = lookup("KNOWLIFT_BIND_PORT") {
            self.bind_port = parse_value("KNOWLIFT_BIND_PORT", &v)?;
        }
        if let Some(v) = lookup("KNOWLIFT_DATABASE") {
            self.database = Some(PathBuf::from(v));
        }
        if let Some(v) = lookup("KNOWLIFT_SECRET_KEY") {
            self.secret_key = Some(v);
        }
        if let Some(v) = lookup("KNOWLIFT_SESSION_EXPIRY_SECS") {
            self.session_expiry_secs = parse_value("KNOWLIFT_SESSION_EXPIRY_SECS", &v)?;
        }
        if let Some(v) = lookup("KNOWLIFT_LOG_LEVEL") {
            self.log_level = v;
        }
        if let Some(v) = lookup("KNOWLIFT_ANSWER_WINDOW") {
            self.answer_window = parse_value("KNOWLIFT_ANSWER_WINDOW", &v)?;
        }
        Ok(())
    }
}

fn parse_value<T: std::str::FromStr>(field: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
    })
}

impl WebConfig {
    /// Resolve configuration from all layers
    ///
    /// `lookup` reads environment variables; pass `|k| std::env::var(k).ok()`
    /// in production code.
    pub fn load<F>(
        environment: Environment,
        file: Option<ConfigFile>,
        lookup: F,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut layered = Layered::defaults(environment);
        if let Some(file) = file {
            layered.apply_file(file);
        }
        layered.apply_env(lookup)?;

        let database = layered
            .database
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| ConfigError::MissingField("database".to_string()))?;
        let secret_key = layered
            .secret_key
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ConfigError::MissingField("secret_key".to_string()))?;

        if layered.answer_window == 0 {
            return Err(ConfigError::InvalidValue {
                field: "answer_window".to_string(),
                value: "0".to_string(),
            });
        }

        Ok(WebConfig {
            environment,
            bind_address: layered.bind_address,
            bind_port: layered.bind_port,
            database,
            secret_key,
            session_expiry_secs: layered.session_expiry_secs,
            log_level: layered.log_level,
            answer_window: layered.answer_window,
        })
    }

    /// Resolve configuration from an optional file and the process environment
    pub fn from_env(
        environment: Environment,
        config_path: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        let file = config_path.map(ConfigFile::from_file).transpose()?;
        Self::load(environment, file, |key| std::env::var(key).ok())
    }

    /// Create a default configuration for testing
    pub fn default_test_config() -> Self {
        WebConfig {
            environment: Environment::Test,
            bind_address: "127.0.0.1".to_string(),
            bind_port: 8000,
            database: PathBuf::from(":memory:"),
            secret_key: "test-secret-key-do-not-use-in-production".to_string(),
            session_expiry_secs: 3600,
            log_level: "warn".to_string(),
            answer_window: DEFAULT_ANSWER_WINDOW,
        }
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }
}
