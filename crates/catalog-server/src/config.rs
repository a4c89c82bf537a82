//! Server configuration from environment variables.

use std::env;

/// Server configuration.
///
/// Database settings live in [`catalog_store::StoreConfig`]; this
/// covers only the HTTP side.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server port to listen on.
    pub port: u16,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// CORS allowed origins (comma-separated or "*" for all).
    pub cors_allowed_origins: String,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional:
    /// - `PORT`: Server port (default: 3000)
    /// - `LOG_LEVEL`: Logging level (default: "info")
    /// - `CORS_ALLOWED_ORIGINS`: Allowed CORS origins (default: "*")
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match env::var("PORT") {
            Err(_) => 3000,
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                name: "PORT".to_string(),
                reason: format!("not a valid port number: {raw}"),
            })?,
        };

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let cors_allowed_origins =
            env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| "*".to_string());

        Ok(Self {
            port,
            log_level,
            cors_allowed_origins,
        })
    }

    /// Get the socket address for the server.
    pub fn socket_addr(&self) -> std::net::SocketAddr {
        std::net::SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Required environment variable is missing.
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    /// Invalid environment variable value.
    #[error("invalid value for environment variable {name}: {reason}")]
    InvalidValue { name: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    // One test so the env mutations cannot interleave.
    #[test]
    fn test_env_parsing() {
        // SAFETY: No other test in this binary reads these variables.
        unsafe {
            env::remove_var("PORT");
            env::remove_var("LOG_LEVEL");
            env::remove_var("CORS_ALLOWED_ORIGINS");
        }

        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.cors_allowed_origins, "*");
        assert_eq!(config.socket_addr().port(), 3000);

        // SAFETY: See above.
        unsafe { env::set_var("PORT", "not-a-port") };
        let result = ServerConfig::from_env();
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));

        // SAFETY: See above.
        unsafe { env::remove_var("PORT") };
    }
}
