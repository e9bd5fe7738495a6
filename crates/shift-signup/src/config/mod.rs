use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::signups::QuotaLimits;

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
    pub signups: SignupConfig,
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
            signups: SignupConfig::from_env()?,
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

/// Quota limits and roster defaults for the signup service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupConfig {
    pub limits: QuotaLimits,
    pub default_country_code: String,
}

impl Default for SignupConfig {
    fn default() -> Self {
        Self {
            limits: QuotaLimits::default(),
            default_country_code: "1".to_string(),
        }
    }
}

impl SignupConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = QuotaLimits::default();
        let limits = QuotaLimits {
            kakad: limit_from_env("SIGNUP_KAKAD_LIMIT", defaults.kakad)?,
            robe: limit_from_env("SIGNUP_ROBE_LIMIT", defaults.robe)?,
            thursday: limit_from_env("SIGNUP_THURSDAY_LIMIT", defaults.thursday)?,
            phase1_total: limit_from_env("SIGNUP_PHASE1_TOTAL", defaults.phase1_total)?,
            phase2_additional: limit_from_env(
                "SIGNUP_PHASE2_ADDITIONAL",
                defaults.phase2_additional,
            )?,
            running_total: limit_from_env("SIGNUP_RUNNING_TOTAL", defaults.running_total)?,
        };

        let default_country_code: String = env::var("DEFAULT_COUNTRY_CODE")
            .unwrap_or_else(|_| "1".to_string())
            .chars()
            .filter(char::is_ascii_digit)
            .collect();
        if default_country_code.is_empty() {
            return Err(ConfigError::InvalidCountryCode);
        }

        Ok(Self {
            limits,
            default_country_code,
        })
    }
}

fn limit_from_env(key: &'static str, default: u32) -> Result<u32, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<u32>()
            .map_err(|_| ConfigError::InvalidLimit { key }),
        Err(_) => Ok(default),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidLimit { key: &'static str },
    InvalidCountryCode,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidLimit { key } => {
                write!(f, "{key} must be a non-negative integer")
            }
            ConfigError::InvalidCountryCode => {
                write!(f, "DEFAULT_COUNTRY_CODE must contain at least one digit")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidLimit { .. }
            | ConfigError::InvalidCountryCode => None,
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
            "SIGNUP_KAKAD_LIMIT",
            "SIGNUP_ROBE_LIMIT",
            "SIGNUP_THURSDAY_LIMIT",
            "SIGNUP_PHASE1_TOTAL",
            "SIGNUP_PHASE2_ADDITIONAL",
            "SIGNUP_RUNNING_TOTAL",
            "DEFAULT_COUNTRY_CODE",
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
        assert_eq!(config.signups, SignupConfig::default());
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
    fn quota_limits_can_be_overridden() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("SIGNUP_RUNNING_TOTAL", "10");
        env::set_var("DEFAULT_COUNTRY_CODE", "+91");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.signups.limits.running_total, 10);
        assert_eq!(config.signups.limits.kakad, 2);
        assert_eq!(config.signups.default_country_code, "91");
        reset_env();
    }

    #[test]
    fn rejects_non_numeric_limits() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("SIGNUP_KAKAD_LIMIT", "two");
        match AppConfig::load() {
            Err(ConfigError::InvalidLimit { key }) => assert_eq!(key, "SIGNUP_KAKAD_LIMIT"),
            other => panic!("expected invalid limit, got {other:?}"),
        }
        reset_env();
    }
}
