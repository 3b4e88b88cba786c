use std::env;
use std::fmt;
use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use crate::scoring::{ScoringConfig, ScoringConfigError};

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
    pub scoring: ScoringSettings,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("RMI_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("RMI_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("RMI_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("RMI_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let methodology_path = env::var("RMI_METHODOLOGY_PATH")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            scoring: ScoringSettings { methodology_path },
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

/// Where the scoring methodology comes from.
#[derive(Debug, Clone, Default)]
pub struct ScoringSettings {
    pub methodology_path: Option<PathBuf>,
}

impl ScoringSettings {
    /// Methodology from the configured file, or the standard one when none is set.
    pub fn methodology(&self) -> Result<ScoringConfig, ConfigError> {
        match &self.methodology_path {
            Some(path) => load_methodology(path),
            None => Ok(ScoringConfig::default()),
        }
    }
}

pub fn load_methodology(path: &Path) -> Result<ScoringConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::MethodologyIo {
        path: path.to_path_buf(),
        source,
    })?;
    ScoringConfig::from_json(&raw).map_err(|source| ConfigError::Methodology {
        path: path.to_path_buf(),
        source,
    })
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost {
        source: std::net::AddrParseError,
    },
    MethodologyIo {
        path: PathBuf,
        source: std::io::Error,
    },
    Methodology {
        path: PathBuf,
        source: ScoringConfigError,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "RMI_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "RMI_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::MethodologyIo { path, .. } => {
                write!(f, "unable to read methodology file {}", path.display())
            }
            ConfigError::Methodology { path, source } => {
                write!(f, "invalid methodology in {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::MethodologyIo { source, .. } => Some(source),
            ConfigError::Methodology { source, .. } => Some(source),
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
        env::remove_var("RMI_ENV");
        env::remove_var("RMI_HOST");
        env::remove_var("RMI_PORT");
        env::remove_var("RMI_LOG_LEVEL");
        env::remove_var("RMI_METHODOLOGY_PATH");
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
        assert!(config.scoring.methodology_path.is_none());
        assert_eq!(
            config.scoring.methodology().expect("standard methodology"),
            ScoringConfig::default()
        );
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("RMI_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn rejects_invalid_port() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("RMI_PORT", "not-a-port");
        assert!(matches!(AppConfig::load(), Err(ConfigError::InvalidPort)));
        reset_env();
    }

    #[test]
    fn loads_methodology_from_file() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let mut methodology = ScoringConfig::default();
        methodology.methodology_version = "2.0-pilot".to_string();
        let path = env::temp_dir().join(format!("rmi-methodology-{}.json", std::process::id()));
        fs::write(
            &path,
            serde_json::to_string(&methodology).expect("serializes"),
        )
        .expect("temp file writable");
        env::set_var("RMI_METHODOLOGY_PATH", &path);

        let config = AppConfig::load().expect("config loads");
        let loaded = config.scoring.methodology().expect("methodology loads");

        assert_eq!(loaded.methodology_version, "2.0-pilot");
        fs::remove_file(&path).ok();
        reset_env();
    }

    #[test]
    fn missing_methodology_file_is_reported() {
        let settings = ScoringSettings {
            methodology_path: Some(PathBuf::from("/nonexistent/rmi-methodology.json")),
        };
        assert!(matches!(
            settings.methodology(),
            Err(ConfigError::MethodologyIo { .. })
        ));
    }
}
