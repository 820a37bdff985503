use std::env;
use std::str::FromStr;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be a valid {expected}, got `{value}`")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("ADMIN_EMAIL and ADMIN_PASSWORD must be set together")]
    PartialBootstrapAdmin,
}

/// Credentials for the admin account created at startup when missing.
#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub email: String,
    pub password: String,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Server host to bind to.
    pub host: String,
    /// Server port to bind to.
    pub port: u16,
    /// PostgreSQL connection URL. Without it the server keeps data in memory.
    pub database_url: Option<String>,
    /// Maximum database connections in the pool.
    pub db_max_connections: u32,
    /// Minimum database connections in the pool.
    pub db_min_connections: u32,
    /// Session-token signing secret.
    pub jwt_secret: String,
    /// Session-token lifetime in seconds.
    pub session_ttl_secs: i64,
    /// Optional static service token accepted on write routes.
    pub admin_token: Option<String>,
    pub bootstrap_admin: Option<BootstrapAdmin>,
    /// Maximum accepted request body, in bytes.
    pub body_limit_bytes: usize,
    /// Log level (e.g., "info", "debug", "trace").
    pub log_level: String,
}

fn var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T: FromStr>(
    name: &'static str,
    default: T,
    expected: &'static str,
) -> Result<T, ConfigError> {
    match var(name) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            expected,
            value,
        }),
    }
}

impl AppConfig {
    /// Load configuration from environment variables with sensible defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let bootstrap_admin = match (var("ADMIN_EMAIL"), var("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(BootstrapAdmin { email, password }),
            (None, None) => None,
            _ => return Err(ConfigError::PartialBootstrapAdmin),
        };

        Ok(Self {
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_var("PORT", 3030, "u16")?,
            database_url: var("DATABASE_URL"),
            db_max_connections: parse_var("DB_MAX_CONNECTIONS", 20, "u32")?,
            db_min_connections: parse_var("DB_MIN_CONNECTIONS", 5, "u32")?,
            jwt_secret: var("JWT_SECRET")
                .unwrap_or_else(|| "dev-secret-change-me-in-production".to_string()),
            session_ttl_secs: parse_var("SESSION_TTL_SECS", 86_400, "number of seconds")?,
            admin_token: var("ADMIN_TOKEN"),
            bootstrap_admin,
            body_limit_bytes: parse_var("BODY_LIMIT_BYTES", 2 * 1024 * 1024, "usize")?,
            log_level: var("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Build the socket address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
impl AppConfig {
    pub fn for_tests() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            database_url: None,
            db_max_connections: 1,
            db_min_connections: 1,
            jwt_secret: "test-secret".to_string(),
            session_ttl_secs: 3600,
            admin_token: Some(crate::test_support::SERVICE_TOKEN.to_string()),
            bootstrap_admin: None,
            body_limit_bytes: 64 * 1024,
            log_level: "debug".to_string(),
        }
    }
}
