use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

const DEFAULT_POOL_MAX_SIZE: u32 = 8;

#[derive(Debug, Deserialize, Clone)]
pub struct WebConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub web: WebConfig,
    // Populated from the .env file
    pub database_path: String,
    pub allowed_origins: String,
    pub log_level: String,
    pub db_pool_max_size: u32,
}

fn fatal(message: String) -> config::ConfigError {
    config::ConfigError::Message(message)
}

impl Config {
    /// Loads the given .env file into the process environment, then builds
    /// the configuration from it layered over `config/default.toml`.
    pub fn from_env(env_path: &Path) -> Result<Self, config::ConfigError> {
        dotenvy::from_path(env_path).map_err(|e| {
            fatal(format!(
                "FATAL: Failed to load .env file from '{}'. Error: {}",
                env_path.display(),
                e
            ))
        })?;

        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, config::ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_path = lookup("DATABASE_PATH").ok_or_else(|| {
            fatal("FATAL: Environment variable 'DATABASE_PATH' is not set in your .env file.".to_string())
        })?;

        if Path::new(&database_path).is_relative() {
            return Err(fatal(format!(
                "FATAL: The 'DATABASE_PATH' in your .env file is a relative path ('{}'). It MUST be an absolute path.",
                database_path
            )));
        }

        let allowed_origins = lookup("ALLOWED_ORIGINS").unwrap_or_default();
        let log_level = lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        let db_pool_max_size = match lookup("DB_POOL_MAX_SIZE") {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(size) if size >= 1 => size,
                _ => {
                    return Err(fatal(format!(
                        "FATAL: 'DB_POOL_MAX_SIZE' must be a positive integer, got '{}'.",
                        raw
                    )))
                }
            },
            None => DEFAULT_POOL_MAX_SIZE,
        };

        let builder = config::Config::builder()
            // Base settings (web host/port) come from the TOML file.
            .add_source(config::File::new("config/default.toml", config::FileFormat::Toml))
            .set_override("database_path", database_path)?
            .set_override("allowed_origins", allowed_origins)?
            .set_override("log_level", log_level)?
            .set_override("db_pool_max_size", i64::from(db_pool_max_size))?
            .build()?;

        builder.try_deserialize()
    }

    /// Full path of the SQLite file holding dashboard users and multimedia posts.
    pub fn multimedia_db_path(&self) -> PathBuf {
        PathBuf::from(&self.database_path)
            .join("multimedia")
            .join("multimedia.db")
    }
}
