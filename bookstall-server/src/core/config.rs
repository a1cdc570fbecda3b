//! Server configuration

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite database file path
    pub database_path: String,
    /// HTTP port
    pub http_port: u16,
    /// Shared secret for payment gateway signature verification
    pub payment_gateway_secret: String,
    /// Days after delivery during which a return may be requested
    pub return_window_days: i64,
    /// Environment: development | staging | production
    pub environment: String,
    /// Directory for rolling log files (stdout only when unset)
    pub log_dir: Option<String>,
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        Ok(Self {
            database_path: std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "data/bookstall.db".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            payment_gateway_secret: Self::require_secret("PAYMENT_GATEWAY_SECRET", &environment)?,
            return_window_days: std::env::var("RETURN_WINDOW_DAYS")
                .ok()
                .and_then(|d| d.parse().ok())
                .unwrap_or(7),
            environment,
            log_dir: std::env::var("LOG_DIR").ok().filter(|s| !s.is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_secret_falls_back_in_development() {
        let v = Config::require_secret("BOOKSTALL_TEST_UNSET_SECRET", "development").unwrap();
        assert!(v.starts_with("dev-"));
    }

    #[test]
    fn require_secret_fails_in_production() {
        let e = Config::require_secret("BOOKSTALL_TEST_UNSET_SECRET", "production");
        assert!(e.is_err());
    }
}
