use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::workflows::origination::evaluation::UnderwritingStrategy;

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

/// Top-level configuration for the lending service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub policy: PolicyConfig,
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
        let ansi = env::var("APP_LOG_ANSI")
            .map(|value| value.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let underwriting_strategy = match env::var("APP_UNDERWRITING_STRATEGY") {
            Ok(raw) => parse_strategy(&raw)?,
            Err(_) => UnderwritingStrategy::Tiered,
        };
        let review_page_size = env::var("APP_REVIEW_PAGE_SIZE")
            .unwrap_or_else(|_| "20".to_string())
            .parse::<u32>()
            .ok()
            .filter(|size| *size > 0)
            .ok_or(ConfigError::InvalidPageSize)?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level, ansi },
            policy: PolicyConfig {
                underwriting_strategy,
                review_page_size,
            },
        })
    }
}

fn parse_strategy(raw: &str) -> Result<UnderwritingStrategy, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "tiered" => Ok(UnderwritingStrategy::Tiered),
        "legacy" | "salary-bands" => Ok(UnderwritingStrategy::LegacySalaryBands),
        other => Err(ConfigError::UnknownStrategy {
            value: other.to_string(),
        }),
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

/// Tracing output controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub ansi: bool,
}

/// Lending-policy selections resolved at startup.
#[derive(Debug, Clone)]
pub struct PolicyConfig {
    pub underwriting_strategy: UnderwritingStrategy,
    pub review_page_size: u32,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidPageSize,
    UnknownStrategy { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidPageSize => {
                write!(f, "APP_REVIEW_PAGE_SIZE must be a positive integer")
            }
            ConfigError::UnknownStrategy { value } => {
                write!(
                    f,
                    "APP_UNDERWRITING_STRATEGY '{}' is not one of: tiered, legacy",
                    value
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}
