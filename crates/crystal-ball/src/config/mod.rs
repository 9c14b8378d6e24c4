use crate::matchup::{NoiseMode, ScoringPolicy};
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

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
    pub roster: RosterConfig,
    pub scoring: ScoringConfig,
    pub commentary: CommentaryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "5001".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let athletes_path = env::var("APP_ATHLETES_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data/athletes.json"));
        let activities_path = env::var("APP_ACTIVITIES_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data/activities.json"));

        let policy_raw = env::var("APP_SCORING_POLICY").unwrap_or_else(|_| "normalized".to_string());
        let policy = policy_raw
            .parse::<ScoringPolicy>()
            .map_err(|_| ConfigError::InvalidScoringPolicy(policy_raw.clone()))?;

        let noise_raw = env::var("APP_NOISE").unwrap_or_else(|_| "random".to_string());
        let noise = noise_raw
            .parse::<NoiseMode>()
            .map_err(|_| ConfigError::InvalidNoiseMode(noise_raw.clone()))?;

        let api_key = env::var("GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());
        let model =
            env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string());
        let timeout_secs = env::var("APP_COMMENTARY_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidCommentaryTimeout)?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            roster: RosterConfig {
                athletes_path,
                activities_path,
            },
            scoring: ScoringConfig { policy, noise },
            commentary: CommentaryConfig {
                api_key,
                model,
                timeout: Duration::from_secs(timeout_secs),
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

/// Locations of the competitor and activity data files.
#[derive(Debug, Clone)]
pub struct RosterConfig {
    pub athletes_path: PathBuf,
    pub activities_path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringConfig {
    pub policy: ScoringPolicy,
    pub noise: NoiseMode,
}

/// Commentary provider settings. A missing key disables commentary.
#[derive(Clone)]
pub struct CommentaryConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub timeout: Duration,
}

impl fmt::Debug for CommentaryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommentaryConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidScoringPolicy(String),
    InvalidNoiseMode(String),
    InvalidCommentaryTimeout,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidScoringPolicy(value) => write!(
                f,
                "APP_SCORING_POLICY '{}' must be one of linear, normalized, normalized-compounding",
                value
            ),
            ConfigError::InvalidNoiseMode(value) => write!(
                f,
                "APP_NOISE '{}' must be random, disabled, or an unsigned integer seed",
                value
            ),
            ConfigError::InvalidCommentaryTimeout => {
                write!(f, "APP_COMMENTARY_TIMEOUT_SECS must be a whole number of seconds")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidScoringPolicy(_)
            | ConfigError::InvalidNoiseMode(_)
            | ConfigError::InvalidCommentaryTimeout => None,
        }
    }
}
