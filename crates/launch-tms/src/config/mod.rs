use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::reports::lsw::{ReportSettings, SubmissionCutoff, TerminalInfo};

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
    pub reporting: ReportingConfig,
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

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            reporting: ReportingConfig::from_env()?,
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

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Terminal identity and submission cutoff for the daily report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportingConfig {
    pub terminal: TerminalInfo,
    pub cutoff: SubmissionCutoff,
}

impl ReportingConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = TerminalInfo::default();
        let terminal = TerminalInfo {
            id: env::var("LSW_TERMINAL_ID").unwrap_or(defaults.id),
            name: env::var("LSW_TERMINAL_NAME").unwrap_or(defaults.name),
            code: env::var("LSW_TERMINAL_CODE").unwrap_or(defaults.code),
        };

        let cutoff = match env::var("LSW_SUBMISSION_CUTOFF") {
            Ok(value) => SubmissionCutoff::parse(&value)
                .ok_or(ConfigError::InvalidCutoff { value })?,
            Err(_) => SubmissionCutoff::default(),
        };

        Ok(Self { terminal, cutoff })
    }

    pub fn settings(&self) -> ReportSettings {
        ReportSettings {
            terminal: self.terminal.clone(),
            cutoff: self.cutoff,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidCutoff { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidCutoff { value } => {
                write!(f, "LSW_SUBMISSION_CUTOFF must be HH:MM, got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidCutoff { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
