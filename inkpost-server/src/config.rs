//! Server configuration - bind address, passphrase and CORS
//!
//! Environment variables:
//! - `PORT`: listen address; `:8080` style binds all interfaces (default: :8080)
//! - `SECRET_PASSPHRASE`: required, checked by `/api/validate-passphrase`
//! - `ALLOWED_ORIGINS`, `ALLOW_METHODS`, `ALLOW_HEADERS`, `EXPOSE_HEADERS`:
//!   comma-separated CORS lists
//! - `ALLOW_CREDENTIALS`: `true` to allow credentials (default: true)
//! - `MAX_AGE`: preflight cache duration such as `12h` or `1h30m` (default: 12h)

use std::net::SocketAddr;
use std::time::Duration;

use axum::http::{HeaderName, HeaderValue, Method};
use inkpost_core::config::split_list;
use thiserror::Error;
use tower_http::cors::{AllowOrigin, CorsLayer};

const DEFAULT_PORT: &str = ":8080";
const DEFAULT_ORIGINS: &str = "https://innov.ink,http://localhost:5173,http://localhost:8080";
const DEFAULT_METHODS: &str = "GET,POST,PUT,DELETE,OPTIONS";
const DEFAULT_HEADERS: &str = "Origin,Content-Type,Authorization";
const DEFAULT_EXPOSE: &str = "Content-Length";
const DEFAULT_MAX_AGE: &str = "12h";

/// Configuration errors, reported once at startup
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("SECRET_PASSPHRASE must be set")]
    MissingPassphrase,

    #[error("invalid listen address '{0}'")]
    InvalidBind(String),

    #[error("invalid duration '{0}' (expected e.g. 12h, 30m, 1h30m)")]
    InvalidDuration(String),

    #[error("invalid CORS {kind} '{value}'")]
    InvalidCors { kind: &'static str, value: String },

    #[error("CORS credentials cannot be combined with a wildcard origin")]
    CredentialsWithWildcard,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 0.0.0.0:8080)
    pub bind_addr: SocketAddr,

    /// Passphrase accepted by the editor login check
    pub secret_passphrase: String,

    pub cors: CorsConfig,
}

impl ServerConfig {
    /// Load from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let secret_passphrase = std::env::var("SECRET_PASSPHRASE").unwrap_or_default();
        if secret_passphrase.is_empty() {
            return Err(ConfigError::MissingPassphrase);
        }

        Ok(Self {
            bind_addr: parse_bind(&env_or("PORT", DEFAULT_PORT))?,
            secret_passphrase,
            cors: CorsConfig::from_env()?,
        })
    }
}

/// CORS settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allow_methods: Vec<String>,
    pub allow_headers: Vec<String>,
    pub expose_headers: Vec<String>,
    pub allow_credentials: bool,
    pub max_age: Duration,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: split_list(DEFAULT_ORIGINS),
            allow_methods: split_list(DEFAULT_METHODS),
            allow_headers: split_list(DEFAULT_HEADERS),
            expose_headers: split_list(DEFAULT_EXPOSE),
            allow_credentials: true,
            max_age: Duration::from_secs(12 * 3600),
        }
    }
}

impl CorsConfig {
    /// Load from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            allowed_origins: split_list(&env_or("ALLOWED_ORIGINS", DEFAULT_ORIGINS)),
            allow_methods: split_list(&env_or("ALLOW_METHODS", DEFAULT_METHODS)),
            allow_headers: split_list(&env_or("ALLOW_HEADERS", DEFAULT_HEADERS)),
            expose_headers: split_list(&env_or("EXPOSE_HEADERS", DEFAULT_EXPOSE)),
            allow_credentials: env_or("ALLOW_CREDENTIALS", "true") == "true",
            max_age: parse_duration(&env_or("MAX_AGE", DEFAULT_MAX_AGE))?,
        })
    }

    /// Build the tower-http layer, validating every entry
    pub fn layer(&self) -> Result<CorsLayer, ConfigError> {
        let wildcard = self.allowed_origins.iter().any(|o| o == "*");
        if wildcard && self.allow_credentials {
            return Err(ConfigError::CredentialsWithWildcard);
        }

        let origins = if wildcard {
            AllowOrigin::any()
        } else {
            let values = self
                .allowed_origins
                .iter()
                .map(|o| {
                    HeaderValue::from_str(o).map_err(|_| ConfigError::InvalidCors {
                        kind: "origin",
                        value: o.clone(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            AllowOrigin::list(values)
        };

        let methods = self
            .allow_methods
            .iter()
            .map(|m| {
                Method::from_bytes(m.to_uppercase().as_bytes()).map_err(|_| ConfigError::InvalidCors {
                    kind: "method",
                    value: m.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(header_names("header", &self.allow_headers)?)
            .expose_headers(header_names("expose header", &self.expose_headers)?)
            .allow_credentials(self.allow_credentials)
            .max_age(self.max_age))
    }
}

fn header_names(kind: &'static str, names: &[String]) -> Result<Vec<HeaderName>, ConfigError> {
    names
        .iter()
        .map(|h| {
            HeaderName::from_bytes(h.as_bytes()).map_err(|_| ConfigError::InvalidCors {
                kind,
                value: h.clone(),
            })
        })
        .collect()
}

/// Parse a listen address; a bare `:port` or `port` binds all interfaces
pub fn parse_bind(value: &str) -> Result<SocketAddr, ConfigError> {
    let value = value.trim();
    let candidate = if let Some(port) = value.strip_prefix(':') {
        format!("0.0.0.0:{}", port)
    } else if value.chars().all(|c| c.is_ascii_digit()) && !value.is_empty() {
        format!("0.0.0.0:{}", value)
    } else {
        value.to_string()
    };

    candidate
        .parse()
        .map_err(|_| ConfigError::InvalidBind(value.to_string()))
}

/// Parse durations like `12h`, `30m`, `45s`, `500ms` or `1h30m`
pub fn parse_duration(value: &str) -> Result<Duration, ConfigError> {
    let invalid = || ConfigError::InvalidDuration(value.to_string());
    let mut rest = value.trim();
    if rest.is_empty() {
        return Err(invalid());
    }

    let mut total = Duration::ZERO;
    while !rest.is_empty() {
        let digits = rest.find(|c: char| !c.is_ascii_digit()).ok_or_else(invalid)?;
        if digits == 0 {
            return Err(invalid());
        }
        let amount: u64 = rest[..digits].parse().map_err(|_| invalid())?;
        rest = &rest[digits..];

        let unit_len = rest.find(|c: char| c.is_ascii_digit()).unwrap_or(rest.len());
        let step = match &rest[..unit_len] {
            "h" => Duration::from_secs(amount * 3600),
            "m" => Duration::from_secs(amount * 60),
            "s" => Duration::from_secs(amount),
            "ms" => Duration::from_millis(amount),
            _ => return Err(invalid()),
        };
        total += step;
        rest = &rest[unit_len..];
    }

    Ok(total)
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_forms() {
        assert_eq!(parse_bind(":8080").unwrap(), "0.0.0.0:8080".parse().unwrap());
        assert_eq!(parse_bind("3000").unwrap(), "0.0.0.0:3000".parse().unwrap());
        assert_eq!(
            parse_bind("127.0.0.1:3030").unwrap(),
            "127.0.0.1:3030".parse().unwrap()
        );
        assert!(parse_bind("localhost").is_err());
    }

    #[test]
    fn durations() {
        assert_eq!(parse_duration("12h").unwrap(), Duration::from_secs(43_200));
        assert_eq!(parse_duration("1h30m").unwrap(), Duration::from_secs(5_400));
        assert_eq!(parse_duration("45s").unwrap(), Duration::from_secs(45));
        assert_eq!(parse_duration("250ms").unwrap(), Duration::from_millis(250));
        assert!(parse_duration("").is_err());
        assert!(parse_duration("h").is_err());
        assert!(parse_duration("12").is_err());
        assert!(parse_duration("3d").is_err());
    }

    #[test]
    fn default_cors_builds() {
        let cors = CorsConfig::default();
        assert_eq!(cors.allowed_origins.len(), 3);
        assert_eq!(cors.max_age, Duration::from_secs(43_200));
        assert!(cors.layer().is_ok());
    }

    #[test]
    fn wildcard_with_credentials_is_rejected() {
        let cors = CorsConfig {
            allowed_origins: vec!["*".into()],
            ..Default::default()
        };
        assert_eq!(cors.layer().err(), Some(ConfigError::CredentialsWithWildcard));

        let cors = CorsConfig {
            allowed_origins: vec!["*".into()],
            allow_credentials: false,
            ..Default::default()
        };
        assert!(cors.layer().is_ok());
    }

    #[test]
    fn bad_method_is_reported() {
        let cors = CorsConfig {
            allow_methods: vec!["GET".into(), "NOT A METHOD".into()],
            ..Default::default()
        };
        assert!(matches!(
            cors.layer(),
            Err(ConfigError::InvalidCors { kind: "method", .. })
        ));
    }
}
