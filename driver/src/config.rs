use std::time::Duration;

use kernel::KernelError;

use crate::env_or;
use crate::error::ConvertError;

static POSTGRES_MAX_CONNECTIONS: &str = "POSTGRES_MAX_CONNECTIONS";
static LOCK_TIMEOUT_MS: &str = "LOCK_TIMEOUT_MS";

const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_LOCK_TIMEOUT_MS: u64 = 3000;

/// Limits shared by every storage backend.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    max_connections: u32,
    lock_timeout: Duration,
}

impl StorageConfig {
    pub fn new(max_connections: u32, lock_timeout: Duration) -> Self {
        Self {
            max_connections,
            lock_timeout,
        }
    }

    pub fn from_env() -> error_stack::Result<Self, KernelError> {
        let max_connections =
            env_or(POSTGRES_MAX_CONNECTIONS, DEFAULT_MAX_CONNECTIONS).convert_error()?;
        let lock_timeout = env_or(LOCK_TIMEOUT_MS, DEFAULT_LOCK_TIMEOUT_MS).convert_error()?;
        Ok(Self::new(
            max_connections,
            Duration::from_millis(lock_timeout),
        ))
    }

    pub fn max_connections(&self) -> u32 {
        self.max_connections
    }

    /// Upper bound for waiting on a connection or a row lock.
    pub fn lock_timeout(&self) -> Duration {
        self.lock_timeout
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(
            DEFAULT_MAX_CONNECTIONS,
            Duration::from_millis(DEFAULT_LOCK_TIMEOUT_MS),
        )
    }
}
