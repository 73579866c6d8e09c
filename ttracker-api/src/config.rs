/// Configuration management for the API server
///
/// Configuration is read once at startup and handed to constructors; nothing
/// reads the environment after that.
///
/// # Environment Variables
///
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `PORT`: Port to bind to (default: 8000)
/// - `DATABASE_URL`: PostgreSQL connection string (falls back to `LOCAL_DB`)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `COGNITO_JWK_URL`: Identity provider key set URL (required)
/// - `COGNITO_ISSUER`: Expected token issuer (required)
/// - `JWKS_CACHE_TTL_SECONDS`: Key set cache lifetime (default: 3600)
/// - `JWKS_FETCH_TIMEOUT_SECONDS`: Key set HTTP timeout (default: 10)
/// - `CORS_ORIGINS`: Comma separated allowed origins (default: *)
/// - `APP_ENV`: `production` skips loading `.env`
///
/// # Example
///
/// ```no_run
/// use ttracker_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Identity provider configuration
    pub auth: AuthConfig,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Allowed CORS origins; `*` allows any origin
    pub cors_origins: Vec<String>,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

/// Identity provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// URL of the published key set
    pub jwk_url: String,

    /// Expected `iss` claim
    pub issuer: String,

    /// How long a fetched key set is trusted (seconds)
    pub jwks_cache_ttl_seconds: u64,

    /// Timeout for fetching the key set (seconds)
    pub jwks_fetch_timeout_seconds: u64,
}

impl AuthConfig {
    pub fn jwks_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.jwks_cache_ttl_seconds)
    }

    pub fn jwks_fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.jwks_fetch_timeout_seconds)
    }
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// A `.env` file is loaded first unless `APP_ENV=production`.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a numeric
    /// variable does not parse.
    pub fn from_env() -> anyhow::Result<Self> {
        let production = is_production(env::var("APP_ENV").ok().as_deref());
        if !production {
            dotenvy::dotenv().ok();
        }

        Self::from_vars(|key| env::var(key).ok())
    }

    /// Builds configuration from a variable lookup
    pub fn from_vars<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let host = var_or("API_HOST", "0.0.0.0");
        let port = var_or("PORT", "8000")
            .parse::<u16>()
            .context("PORT must be a valid port number")?;

        let database_url = lookup("DATABASE_URL")
            .or_else(|| lookup("LOCAL_DB"))
            .context("DATABASE_URL (or LOCAL_DB) environment variable is required")?;

        let max_connections = var_or("DATABASE_MAX_CONNECTIONS", "10")
            .parse::<u32>()
            .context("DATABASE_MAX_CONNECTIONS must be a positive integer")?;

        let jwk_url = lookup("COGNITO_JWK_URL")
            .context("COGNITO_JWK_URL environment variable is required")?;
        let issuer = lookup("COGNITO_ISSUER")
            .context("COGNITO_ISSUER environment variable is required")?;

        let jwks_cache_ttl_seconds = var_or("JWKS_CACHE_TTL_SECONDS", "3600")
            .parse::<u64>()
            .context("JWKS_CACHE_TTL_SECONDS must be a number of seconds")?;
        let jwks_fetch_timeout_seconds = var_or("JWKS_FETCH_TIMEOUT_SECONDS", "10")
            .parse::<u64>()
            .context("JWKS_FETCH_TIMEOUT_SECONDS must be a number of seconds")?;

        if jwks_cache_ttl_seconds == 0 {
            anyhow::bail!("JWKS_CACHE_TTL_SECONDS must be greater than zero");
        }

        let cors_origins = var_or("CORS_ORIGINS", "*")
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Ok(Self {
            api: ApiConfig {
                host,
                port,
                cors_origins,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            auth: AuthConfig {
                jwk_url,
                issuer,
                jwks_cache_ttl_seconds,
                jwks_fetch_timeout_seconds,
            },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    /// Whether any origin may call the API
    pub fn allows_any_origin(&self) -> bool {
        self.api.cors_origins.iter().any(|origin| origin == "*")
    }
}

fn is_production(app_env: Option<&str>) -> bool {
    matches!(app_env, Some(env) if env.eq_ignore_ascii_case("production"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const REQUIRED: &[(&str, &str)] = &[
        ("DATABASE_URL", "postgresql://localhost/ttracker"),
        ("COGNITO_JWK_URL", "https://issuer.example.com/jwks.json"),
        ("COGNITO_ISSUER", "https://issuer.example.com"),
    ];

    #[test]
    fn test_defaults() {
        let config = Config::from_vars(lookup(REQUIRED)).unwrap();

        assert_eq!(config.bind_address(), "0.0.0.0:8000");
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.auth.jwks_cache_ttl(), Duration::from_secs(3600));
        assert_eq!(config.auth.jwks_fetch_timeout(), Duration::from_secs(10));
        assert!(config.allows_any_origin());
    }

    #[test]
    fn test_local_db_fallback() {
        let vars = [
            ("LOCAL_DB", "postgresql://localhost/dev"),
            ("COGNITO_JWK_URL", "https://issuer.example.com/jwks.json"),
            ("COGNITO_ISSUER", "https://issuer.example.com"),
        ];
        let config = Config::from_vars(lookup(&vars)).unwrap();
        assert_eq!(config.database.url, "postgresql://localhost/dev");
    }

    #[test]
    fn test_missing_required() {
        let err = Config::from_vars(lookup(&REQUIRED[..2])).unwrap_err();
        assert!(err.to_string().contains("COGNITO_ISSUER"));

        let err = Config::from_vars(lookup(&REQUIRED[1..])).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn test_overrides() {
        let mut vars = REQUIRED.to_vec();
        vars.extend([
            ("PORT", "9090"),
            ("CORS_ORIGINS", "https://a.example.com, https://b.example.com"),
        ]);
        let config = Config::from_vars(lookup(&vars)).unwrap();

        assert_eq!(config.api.port, 9090);
        assert_eq!(config.api.cors_origins.len(), 2);
        assert!(!config.allows_any_origin());
    }

    #[test]
    fn test_is_production() {
        assert!(is_production(Some("production")));
        assert!(is_production(Some("Production")));
        assert!(!is_production(Some("staging")));
        assert!(!is_production(None));
    }

    #[test]
    fn test_invalid_port() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("PORT", "eighty"));
        assert!(Config::from_vars(lookup(&vars)).is_err());
    }
}
