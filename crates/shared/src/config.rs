//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Seeder configuration.
    #[serde(default)]
    pub seed: SeedConfig,
}

/// Database configuration.
///
/// Either `url` is given, or the URL is assembled from the individual parts.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Full connection URL. Takes precedence over the individual parts.
    #[serde(default)]
    pub url: Option<String>,
    /// Database host.
    #[serde(default = "default_host")]
    pub host: String,
    /// Database port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Database user.
    #[serde(default = "default_username")]
    pub username: String,
    /// Database password.
    #[serde(default = "default_password")]
    pub password: String,
    /// Database name.
    #[serde(default = "default_database")]
    pub database: String,
    /// Apply pending schema migrations when the session is initialized.
    #[serde(default = "default_synchronize")]
    pub synchronize: bool,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Seconds to wait for a connection before giving up.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    5432
}

fn default_username() -> String {
    "postgres".to_string()
}

fn default_password() -> String {
    "postgres".to_string()
}

fn default_database() -> String {
    "catalog".to_string()
}

fn default_synchronize() -> bool {
    true
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_connect_timeout() -> u64 {
    8
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: default_host(),
            port: default_port(),
            username: default_username(),
            password: default_password(),
            database: default_database(),
            synchronize: default_synchronize(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl DatabaseConfig {
    /// Creates a configuration that connects to an explicit URL.
    #[must_use]
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    /// Returns the connection URL.
    ///
    /// Credentials are inserted verbatim; use `url` when they contain
    /// characters that need percent-encoding.
    #[must_use]
    pub fn connection_url(&self) -> String {
        match &self.url {
            Some(url) => url.clone(),
            None => format!(
                "postgres://{}:{}@{}:{}/{}",
                self.username, self.password, self.host, self.port, self.database
            ),
        }
    }

    /// Returns the connection target without credentials, for logging.
    #[must_use]
    pub fn redacted_target(&self) -> String {
        match &self.url {
            Some(url) => match url.rsplit_once('@') {
                Some((_, target)) => target.to_string(),
                None => url.clone(),
            },
            None => format!("{}:{}/{}", self.host, self.port, self.database),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Default `tracing` filter directive, used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

fn default_log_filter() -> String {
    "catalog=info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

/// Seeder configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedConfig {
    /// Number of resources to create.
    #[serde(default = "default_seed_count")]
    pub count: u32,
}

fn default_seed_count() -> u32 {
    25
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            count: default_seed_count(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("CATALOG").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
