use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::evaluation::DEFAULT_VERSION;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub evaluation: EvaluationSettings,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let default_version = env::var("ECO_DEFAULT_VERSION")
            .map(|value| value.trim().to_string())
            .unwrap_or_else(|_| DEFAULT_VERSION.to_string());
        if default_version.is_empty() {
            return Err(ConfigError::EmptyDefaultVersion);
        }

        let catalog_dir = match env::var("ECO_CATALOG_DIR") {
            Ok(value) if !value.trim().is_empty() => {
                let dir = PathBuf::from(value.trim());
                if !dir.is_dir() {
                    return Err(ConfigError::CatalogDirMissing { path: dir });
                }
                Some(dir)
            }
            _ => None,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            evaluation: EvaluationSettings {
                default_version,
                catalog_dir,
            },
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Formula version defaults and where factor catalogs come from. Without a catalog directory
/// the tables compiled into the binary are used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationSettings {
    pub default_version: String,
    pub catalog_dir: Option<PathBuf>,
}

impl Default for EvaluationSettings {
    fn default() -> Self {
        Self {
            default_version: DEFAULT_VERSION.to_string(),
            catalog_dir: None,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    EmptyDefaultVersion,
    CatalogDirMissing { path: PathBuf },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::EmptyDefaultVersion => {
                write!(f, "ECO_DEFAULT_VERSION must not be blank")
            }
            ConfigError::CatalogDirMissing { path } => write!(
                f,
                "ECO_CATALOG_DIR '{}' is not a readable directory",
                path.display()
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::EmptyDefaultVersion
            | ConfigError::CatalogDirMissing { .. } => None,
        }
    }
}
