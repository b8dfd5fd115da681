use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

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
    pub matching: MatchingConfig,
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
            matching: MatchingConfig::from_env()?,
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

/// Knobs for suggestion size, ranking depth, and the simulated analysis latency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchingConfig {
    pub suggestion_limit: usize,
    pub default_top_n: usize,
    pub analysis_delay: Duration,
    pub catalog_csv: Option<PathBuf>,
    /// Live sessions kept before the least recently used one is evicted.
    pub session_capacity: usize,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            suggestion_limit: crate::registry::DEFAULT_SUGGESTION_LIMIT,
            default_top_n: 10,
            analysis_delay: Duration::from_millis(2000),
            catalog_csv: None,
            session_capacity: 1024,
        }
    }
}

impl MatchingConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let suggestion_limit =
            positive_from_env("MATCH_SUGGESTION_LIMIT", defaults.suggestion_limit)?;
        let default_top_n = positive_from_env("MATCH_DEFAULT_TOP_N", defaults.default_top_n)?;
        let analysis_delay = match env::var("MATCH_ANALYSIS_DELAY_MS") {
            Ok(raw) => Duration::from_millis(raw.trim().parse::<u64>().map_err(|_| {
                ConfigError::InvalidNumber {
                    key: "MATCH_ANALYSIS_DELAY_MS",
                }
            })?),
            Err(_) => defaults.analysis_delay,
        };
        let catalog_csv = env::var("MATCH_CATALOG_CSV")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);
        let session_capacity =
            positive_from_env("MATCH_SESSION_CAPACITY", defaults.session_capacity)?;

        Ok(Self {
            suggestion_limit,
            default_top_n,
            analysis_delay,
            catalog_csv,
            session_capacity,
        })
    }
}

fn positive_from_env(key: &'static str, default: usize) -> Result<usize, ConfigError> {
    match env::var(key) {
        Ok(raw) => match raw.trim().parse::<usize>() {
            Ok(value) if value > 0 => Ok(value),
            _ => Err(ConfigError::InvalidNumber { key }),
        },
        Err(_) => Ok(default),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { key: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { key } => {
                write!(f, "{key} must be a positive integer")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidNumber { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "MATCH_SUGGESTION_LIMIT",
            "MATCH_DEFAULT_TOP_N",
            "MATCH_ANALYSIS_DELAY_MS",
            "MATCH_CATALOG_CSV",
            "MATCH_SESSION_CAPACITY",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.matching, MatchingConfig::default());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn reads_matching_overrides() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("MATCH_SUGGESTION_LIMIT", "5");
        env::set_var("MATCH_ANALYSIS_DELAY_MS", "0");
        env::set_var("MATCH_CATALOG_CSV", "data/jobs.csv");
        env::set_var("MATCH_SESSION_CAPACITY", "64");

        let matching = MatchingConfig::from_env().expect("config loads");
        assert_eq!(matching.suggestion_limit, 5);
        assert_eq!(matching.default_top_n, 10);
        assert_eq!(matching.analysis_delay, Duration::ZERO);
        assert_eq!(matching.catalog_csv, Some(PathBuf::from("data/jobs.csv")));
        assert_eq!(matching.session_capacity, 64);
        reset_env();
    }

    #[test]
    fn rejects_zero_top_n() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("MATCH_DEFAULT_TOP_N", "0");

        match MatchingConfig::from_env() {
            Err(ConfigError::InvalidNumber { key }) => assert_eq!(key, "MATCH_DEFAULT_TOP_N"),
            other => panic!("expected invalid number, got {other:?}"),
        }
        reset_env();
    }

    #[test]
    fn rejects_zero_session_capacity() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("MATCH_SESSION_CAPACITY", "0");

        match MatchingConfig::from_env() {
            Err(ConfigError::InvalidNumber { key }) => assert_eq!(key, "MATCH_SESSION_CAPACITY"),
            other => panic!("expected invalid number, got {other:?}"),
        }
        reset_env();
    }
}
