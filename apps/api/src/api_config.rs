use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use stockroom_core::AppError;
use tracing_subscriber::EnvFilter;

const DEFAULT_ACCESS_TOKEN_TTL_SECONDS: i64 = 5 * 60;
const DEFAULT_REFRESH_TOKEN_TTL_SECONDS: i64 = 24 * 60 * 60;
const MIN_JWT_SECRET_LEN: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "postgres" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            other => Err(AppError::Validation(format!(
                "STORE_BACKEND must be either 'postgres' or 'memory', got '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub store_backend: StoreBackend,
    pub database_url: Option<String>,
    pub frontend_url: String,
    pub api_host: String,
    pub api_port: u16,
    pub jwt_secret: String,
    pub access_token_ttl_seconds: i64,
    pub refresh_token_ttl_seconds: i64,
    pub accounts_file: PathBuf,
    pub role_policy_file: Option<PathBuf>,
    pub tasks_file: PathBuf,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");
        Self::from_source(migrate_only, |name| env::var(name).ok())
    }

    /// Builds the configuration from any variable lookup.
    pub fn from_source(
        migrate_only: bool,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, AppError> {
        let optional = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let required = |name: &str| {
            optional(name).ok_or_else(|| AppError::Validation(format!("{name} is required")))
        };

        let store_backend = optional("STORE_BACKEND")
            .map(|value| StoreBackend::from_str(value.as_str()))
            .transpose()?
            .unwrap_or(StoreBackend::Postgres);

        let database_url = if store_backend == StoreBackend::Postgres || migrate_only {
            Some(required("DATABASE_URL")?)
        } else {
            optional("DATABASE_URL")
        };

        let jwt_secret = required("JWT_SECRET")?;
        if jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(AppError::Validation(format!(
                "JWT_SECRET must be at least {MIN_JWT_SECRET_LEN} characters"
            )));
        }

        let access_token_ttl_seconds = positive_seconds(
            "ACCESS_TOKEN_TTL_SECONDS",
            optional("ACCESS_TOKEN_TTL_SECONDS"),
            DEFAULT_ACCESS_TOKEN_TTL_SECONDS,
        )?;
        let refresh_token_ttl_seconds = positive_seconds(
            "REFRESH_TOKEN_TTL_SECONDS",
            optional("REFRESH_TOKEN_TTL_SECONDS"),
            DEFAULT_REFRESH_TOKEN_TTL_SECONDS,
        )?;

        let api_port = match optional("API_PORT") {
            Some(value) => value
                .parse::<u16>()
                .map_err(|error| AppError::Validation(format!("invalid API_PORT: {error}")))?,
            None => 3001,
        };

        Ok(Self {
            migrate_only,
            store_backend,
            database_url,
            frontend_url: optional("FRONTEND_URL")
                .unwrap_or_else(|| "http://localhost:3000".to_owned()),
            api_host: optional("API_HOST").unwrap_or_else(|| "127.0.0.1".to_owned()),
            api_port,
            jwt_secret,
            access_token_ttl_seconds,
            refresh_token_ttl_seconds,
            accounts_file: PathBuf::from(required("ACCOUNTS_FILE")?),
            role_policy_file: optional("ROLE_POLICY_FILE").map(PathBuf::from),
            tasks_file: PathBuf::from(
                optional("TASKS_FILE").unwrap_or_else(|| "data/tasks.json".to_owned()),
            ),
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn positive_seconds(name: &str, value: Option<String>, default: i64) -> Result<i64, AppError> {
    let Some(value) = value else {
        return Ok(default);
    };

    match value.parse::<i64>() {
        Ok(seconds) if seconds > 0 => Ok(seconds),
        _ => Err(AppError::Validation(format!(
            "{name} must be a positive number of seconds, got '{value}'"
        ))),
    }
}
