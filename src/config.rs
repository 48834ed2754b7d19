use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    /// Token lifetime in minutes.
    pub jwt_maxage: i64,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub run_migrations: bool,
    pub log_level: String,
}

impl Config {
    pub fn init() -> Result<Config, ConfigError> {
        let database_url = required("DATABASE_URL")?;
        let jwt_secret = required("JWT_SECRET_KEY")?;
        let jwt_maxage = parse("JWT_MAXAGE", &required("JWT_MAXAGE")?)?;

        let port = match std::env::var("PORT") {
            Ok(value) => parse("PORT", &value)?,
            Err(_) => 8000,
        };

        let database_max_connections = match std::env::var("DATABASE_MAX_CONNECTIONS") {
            Ok(value) => parse("DATABASE_MAX_CONNECTIONS", &value)?,
            Err(_) => 10,
        };

        let allowed_origins = std::env::var("ALLOWED_ORIGINS")
            .map(|origins| split_origins(&origins))
            .unwrap_or_else(|_| vec!["http://localhost:5173".to_string()]);

        let run_migrations = match std::env::var("RUN_MIGRATIONS") {
            Ok(value) => parse("RUN_MIGRATIONS", &value)?,
            Err(_) => true,
        };

        let log_level = std::env::var("LOG_LEVEL")
            .unwrap_or_else(|_| "debug".to_string());

        Ok(Config {
            database_url,
            database_max_connections,
            jwt_secret,
            jwt_maxage,
            port,
            allowed_origins,
            run_migrations,
            log_level,
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::Missing(name))
}

fn parse<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse::<T>().map_err(|_| ConfigError::Invalid {
        name,
        value: value.to_string(),
    })
}

fn split_origins(origins: &str) -> Vec<String> {
    origins
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}
