use std::str::FromStr;

use crate::error::DriverError;

pub mod config;
pub mod database;
pub mod error;
pub mod identity;

/// Reads a required setting from the process environment or `.env`.
pub fn env(key: &str) -> Result<String, DriverError> {
    dotenvy::var(key).map_err(DriverError::from)
}

/// Reads an optional setting, falling back to `default` when it is not set.
pub fn env_or<T: FromStr>(key: &str, default: T) -> Result<T, DriverError> {
    match dotenvy::var(key) {
        Ok(value) => value.parse().map_err(|_| DriverError::InvalidSetting {
            key: key.to_string(),
            value,
        }),
        Err(dotenvy::Error::EnvVar(std::env::VarError::NotPresent)) => Ok(default),
        Err(error) => Err(DriverError::from(error)),
    }
}
