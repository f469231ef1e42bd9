use crate::common::errors::AppError;
use dotenvy::dotenv;
use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    pub db_url: String,
    pub app_name: String,
    pub deployment: String,
    pub lab_url: String,
    pub poll_interval_secs: u64,
    pub data_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenv().ok(); // Load from .env file if available
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup, `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key).ok_or_else(|| AppError::Config {
                key: key.to_string(),
                message: "must be set".to_string(),
            })
        };

        let db_url = match lookup("DB_URL") {
            Some(url) => url,
            None => format!(
                "{}://{}:{}@{}:{}/{}",
                lookup("DB_PREFIX").unwrap_or_else(|| "postgresql".to_string()),
                required("DB_USER")?,
                required("DB_PASSWORD")?,
                required("DB_HOST")?,
                lookup("DB_PORT").unwrap_or_else(|| "5432".to_string()),
                required("DB_NAME")?,
            ),
        };

        let poll_interval_secs = match lookup("BENCHMARK_POLL_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| AppError::Config {
                key: "BENCHMARK_POLL_SECS".to_string(),
                message: format!("expected a whole number of seconds, got '{raw}'"),
            })?,
            None => 5,
        };
        if poll_interval_secs == 0 {
            return Err(AppError::Config {
                key: "BENCHMARK_POLL_SECS".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        Ok(Config {
            db_url,
            app_name: lookup("APP_NAME").unwrap_or_else(|| "tvb-store".to_string()),
            deployment: lookup("DEPLOYMENT").unwrap_or_else(|| "local".to_string()),
            lab_url: lookup("LAB_URL").unwrap_or_else(|| "http://localhost:8080".to_string()),
            poll_interval_secs,
            data_dir: lookup("TVB_DATA_DIR")
                .map_or_else(|| PathBuf::from("./tvb_data"), PathBuf::from),
        })
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Config {
            db_url: "sqlite::memory:".to_string(),
            app_name: "tvb-store-test".to_string(),
            deployment: "test".to_string(),
            lab_url: "http://localhost:8080".to_string(),
            poll_interval_secs: 1,
            data_dir: PathBuf::from("./tvb_data"),
        }
    }
}
