use anyhow::{anyhow, Context, Result};
use sqlx::postgres::PgSslMode;
use std::{fmt, str::FromStr};

/// Connection string variables, in order of preference
const DATABASE_URL_VARS: [&str; 2] = ["DATABASE_PUBLIC_URL", "DATABASE_URL"];

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    /// When schema initialization runs at process start
    pub init_on_startup: StartupInit,
}

/// Deployment mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Production,
    Development,
}

impl Environment {
    pub fn from_name(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        }
    }

    pub fn is_production(self) -> bool {
        self == Environment::Production
    }
}

/// Startup initialization policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupInit {
    Always,
    /// Only when running in production mode
    ProductionOnly,
    Never,
}

impl StartupInit {
    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "always" | "true" | "1" => Some(StartupInit::Always),
            "production" => Some(StartupInit::ProductionOnly),
            "never" | "false" | "0" => Some(StartupInit::Never),
            _ => None,
        }
    }

    pub fn should_run(self, environment: Environment) -> bool {
        match self {
            StartupInit::Always => true,
            StartupInit::ProductionOnly => environment.is_production(),
            StartupInit::Never => false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Clone)]
pub struct DatabaseConfig {
    pub url: String,
    /// Name of the variable `url` was read from
    pub url_source: &'static str,
    pub max_connections: u32,
    /// Minimum idle connections in pool
    pub min_connections: u32,
    /// Connection acquire timeout in seconds
    pub connect_timeout_secs: u64,
    /// Idle connection timeout in seconds
    pub idle_timeout_secs: u64,
    /// Server-side statement timeout in milliseconds (0 disables)
    pub statement_timeout_ms: u64,
    /// TLS mode override; `None` keeps whatever the URL specifies
    pub ssl_mode: Option<PgSslMode>,
}

// The URL carries credentials
impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &"<redacted>")
            .field("url_source", &self.url_source)
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("idle_timeout_secs", &self.idle_timeout_secs)
            .field("statement_timeout_ms", &self.statement_timeout_ms)
            .field("ssl_mode", &self.ssl_mode)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// Allowed CORS origins (comma-separated, or "*" for any)
    pub cors_origins: String,
    /// Bearer token required by the init endpoint (open when unset)
    pub init_token: Option<String>,
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }
fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 0 }
fn default_connect_timeout() -> u64 { 10 }
fn default_idle_timeout() -> u64 { 20 }
fn default_statement_timeout() -> u64 { 30_000 }
fn default_cors_origins() -> String { "*".to_string() }

fn parse_number<T: FromStr>(value: Option<String>) -> Option<T> {
    value.and_then(|v| v.trim().parse().ok())
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve configuration from an arbitrary key lookup.
    ///
    /// Empty values count as unset. A missing connection string or an
    /// unrecognized enumerated value is an error; malformed numbers fall
    /// back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let (url_source, url) = DATABASE_URL_VARS
            .iter()
            .find_map(|&key| get(key).map(|url| (key, url)))
            .ok_or_else(|| anyhow!("DATABASE_PUBLIC_URL or DATABASE_URL must be set"))?;

        let environment = get("APP_ENV")
            .or_else(|| get("NODE_ENV"))
            .map(|v| Environment::from_name(&v))
            .unwrap_or(Environment::Development);

        let ssl_mode = match get("DATABASE_SSL_MODE") {
            Some(mode) => Some(
                PgSslMode::from_str(mode.trim())
                    .with_context(|| format!("invalid DATABASE_SSL_MODE '{}'", mode))?,
            ),
            None if environment.is_production() => Some(PgSslMode::Require),
            None => None,
        };

        let init_on_startup = match get("INIT_ON_STARTUP") {
            Some(v) => StartupInit::from_name(&v)
                .ok_or_else(|| anyhow!("invalid INIT_ON_STARTUP '{}' (expected always, production or never)", v))?,
            None => StartupInit::Always,
        };

        Ok(Config {
            environment,
            server: ServerConfig {
                host: get("HOST").unwrap_or_else(default_host),
                port: parse_number(get("PORT")).unwrap_or_else(default_port),
            },
            database: DatabaseConfig {
                url,
                url_source,
                max_connections: parse_number(get("DATABASE_MAX_CONNECTIONS"))
                    .unwrap_or_else(default_max_connections),
                min_connections: parse_number(get("DATABASE_MIN_CONNECTIONS"))
                    .unwrap_or_else(default_min_connections),
                connect_timeout_secs: parse_number(get("DATABASE_CONNECT_TIMEOUT"))
                    .unwrap_or_else(default_connect_timeout),
                idle_timeout_secs: parse_number(get("DATABASE_IDLE_TIMEOUT"))
                    .unwrap_or_else(default_idle_timeout),
                statement_timeout_ms: parse_number(get("DATABASE_STATEMENT_TIMEOUT_MS"))
                    .unwrap_or_else(default_statement_timeout),
                ssl_mode,
            },
            security: SecurityConfig {
                cors_origins: get("CORS_ORIGINS").unwrap_or_else(default_cors_origins),
                init_token: get("INIT_DB_TOKEN"),
            },
            init_on_startup,
        })
    }
}
