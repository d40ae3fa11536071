//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file, if present).

use chrono::TimeDelta;
use std::env;
use std::fmt;
use std::str::FromStr;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

/// General application settings
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub name: String,
    /// Deployment platform; gates destructive admin operations
    pub env: Environment,
}

/// Deployment platform
///
/// Anything that is not explicitly a development deployment is treated as
/// production, including a missing `PLATFORM` variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    Development,
    Staging,
    #[default]
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    /// Parse a `PLATFORM` value; unknown values fall back to production
    #[must_use]
    pub fn from_platform(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "dev" | "development" => Self::Development,
            "staging" => Self::Staging,
            _ => Self::Production,
        }
    }
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Secrets and lifetimes for the authentication core
#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC secret for session tokens
    pub jwt_secret: String,
    /// Shared secret expected from the payment provider's webhooks
    pub polka_key: String,
    /// Session token lifetime in seconds
    pub session_token_expiry: i64,
    /// Refresh token lifetime in days
    pub refresh_token_expiry_days: i64,
}

impl AuthConfig {
    /// Session token lifetime, saturating at the largest representable span
    #[must_use]
    pub fn session_token_ttl(&self) -> TimeDelta {
        TimeDelta::try_seconds(self.session_token_expiry).unwrap_or(TimeDelta::MAX)
    }

    /// Refresh token lifetime, saturating at the largest representable span
    #[must_use]
    pub fn refresh_token_ttl(&self) -> TimeDelta {
        TimeDelta::try_days(self.refresh_token_expiry_days).unwrap_or(TimeDelta::MAX)
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("polka_key", &"<redacted>")
            .field("session_token_expiry", &self.session_token_expiry)
            .field("refresh_token_expiry_days", &self.refresh_token_expiry_days)
            .finish()
    }
}

// Default value functions
fn default_app_name() -> String {
    "chirpy".to_string()
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_session_token_expiry() -> i64 {
    3600 // 1 hour
}

fn default_refresh_token_expiry_days() -> i64 {
    60
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    ///
    /// # Errors
    /// Returns an error if required keys are missing or values don't parse
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::MissingVar(key))
        };

        let database_url = lookup("DB_URL")
            .or_else(|| lookup("DATABASE_URL"))
            .ok_or(ConfigError::MissingVar("DB_URL"))?;

        let session_token_expiry =
            parse_or(&lookup, "SESSION_TOKEN_EXPIRY", default_session_token_expiry)?;
        if session_token_expiry <= 0 || TimeDelta::try_seconds(session_token_expiry).is_none() {
            return Err(ConfigError::InvalidValue(
                "SESSION_TOKEN_EXPIRY",
                format!("{session_token_expiry} is not a usable number of seconds"),
            ));
        }

        let refresh_token_expiry_days = parse_or(
            &lookup,
            "REFRESH_TOKEN_EXPIRY_DAYS",
            default_refresh_token_expiry_days,
        )?;
        if refresh_token_expiry_days <= 0 || TimeDelta::try_days(refresh_token_expiry_days).is_none()
        {
            return Err(ConfigError::InvalidValue(
                "REFRESH_TOKEN_EXPIRY_DAYS",
                format!("{refresh_token_expiry_days} is not a usable number of days"),
            ));
        }

        Ok(Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(default_app_name),
                env: lookup("PLATFORM")
                    .map(|s| Environment::from_platform(&s))
                    .unwrap_or_default(),
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections: parse_or(
                    &lookup,
                    "DATABASE_MAX_CONNECTIONS",
                    default_max_connections,
                )?,
                min_connections: parse_or(
                    &lookup,
                    "DATABASE_MIN_CONNECTIONS",
                    default_min_connections,
                )?,
            },
            auth: AuthConfig {
                jwt_secret: required("JWT_SECRET")?,
                polka_key: required("POLKA_KEY")?,
                session_token_expiry,
                refresh_token_expiry_days,
            },
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: fn() -> T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key, raw)),
        None => Ok(default()),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn minimal() -> Vec<(&'static str, &'static str)> {
        vec![
            ("DB_URL", "postgres://localhost/chirpy"),
            ("JWT_SECRET", "s3cret"),
            ("POLKA_KEY", "f271c81ff7084ee5b99a5091b42d486e"),
        ]
    }

    #[test]
    fn test_environment_is_production() {
        assert!(!Environment::Development.is_production());
        assert!(!Environment::Staging.is_production());
        assert!(Environment::Production.is_production());
    }

    #[test]
    fn test_environment_is_development() {
        assert!(Environment::Development.is_development());
        assert!(!Environment::Staging.is_development());
        assert!(!Environment::Production.is_development());
    }

    #[test]
    fn test_from_platform() {
        assert_eq!(Environment::from_platform("dev"), Environment::Development);
        assert_eq!(Environment::from_platform("Development"), Environment::Development);
        assert_eq!(Environment::from_platform("staging"), Environment::Staging);
        assert_eq!(Environment::from_platform("prod"), Environment::Production);
        assert_eq!(Environment::from_platform(""), Environment::Production);
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&minimal())).unwrap();

        assert_eq!(config.app.name, "chirpy");
        assert_eq!(config.app.env, Environment::Production);
        assert_eq!(config.database.max_connections, 20);
        assert_eq!(config.auth.session_token_expiry, 3600);
        assert_eq!(config.auth.refresh_token_ttl(), chrono::Duration::days(60));
        assert_eq!(config.auth.session_token_ttl(), chrono::Duration::hours(1));
    }

    #[test]
    fn test_platform_flag() {
        let mut pairs = minimal();
        pairs.push(("PLATFORM", "dev"));
        let config = AppConfig::from_lookup(lookup_from(&pairs)).unwrap();

        assert!(config.app.env.is_development());
    }

    #[test]
    fn test_database_url_fallback() {
        let pairs = [
            ("DATABASE_URL", "postgres://db/chirpy"),
            ("JWT_SECRET", "s3cret"),
            ("POLKA_KEY", "key"),
        ];
        let config = AppConfig::from_lookup(lookup_from(&pairs)).unwrap();
        assert_eq!(config.database.url, "postgres://db/chirpy");
    }

    #[test]
    fn test_missing_secret() {
        let pairs = [("DB_URL", "postgres://localhost/chirpy"), ("POLKA_KEY", "key")];
        let err = AppConfig::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("JWT_SECRET")));
    }

    #[test]
    fn test_blank_polka_key_is_missing() {
        let pairs = [
            ("DB_URL", "postgres://localhost/chirpy"),
            ("JWT_SECRET", "s3cret"),
            ("POLKA_KEY", "   "),
        ];
        let err = AppConfig::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("POLKA_KEY")));
    }

    #[test]
    fn test_invalid_number() {
        let mut pairs = minimal();
        pairs.push(("SESSION_TOKEN_EXPIRY", "an hour"));
        let err = AppConfig::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue("SESSION_TOKEN_EXPIRY", _)));

        let mut pairs = minimal();
        pairs.push(("REFRESH_TOKEN_EXPIRY_DAYS", "0"));
        let err = AppConfig::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue("REFRESH_TOKEN_EXPIRY_DAYS", _)));
    }

    #[test]
    fn test_unrepresentable_lifetimes_rejected() {
        let mut pairs = minimal();
        pairs.push(("SESSION_TOKEN_EXPIRY", "9223372036854775807"));
        let err = AppConfig::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue("SESSION_TOKEN_EXPIRY", _)));

        let mut pairs = minimal();
        pairs.push(("REFRESH_TOKEN_EXPIRY_DAYS", "9223372036854775807"));
        let err = AppConfig::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue("REFRESH_TOKEN_EXPIRY_DAYS", _)));
    }

    #[test]
    fn test_ttl_accessors_saturate() {
        let mut config = AppConfig::from_lookup(lookup_from(&minimal())).unwrap();
        config.auth.session_token_expiry = i64::MAX;
        config.auth.refresh_token_expiry_days = i64::MAX;

        assert_eq!(config.auth.session_token_ttl(), TimeDelta::MAX);
        assert_eq!(config.auth.refresh_token_ttl(), TimeDelta::MAX);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = AppConfig::from_lookup(lookup_from(&minimal())).unwrap();
        let rendered = format!("{config:?}");

        assert!(!rendered.contains("s3cret"));
        assert!(!rendered.contains("f271c81ff7084ee5b99a5091b42d486e"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_default_values() {
        assert_eq!(default_app_name(), "chirpy");
        assert_eq!(default_min_connections(), 5);
        assert_eq!(default_session_token_expiry(), 3600);
        assert_eq!(default_refresh_token_expiry_days(), 60);
    }
}
