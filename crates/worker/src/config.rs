//! Worker configuration from the environment

use ctbridge_core::{Error, Result};
use ctbridge_networking::shopify::DEFAULT_API_VERSION;
use std::path::PathBuf;
use std::str::FromStr;

const DEFAULT_DATABASE_PATH: &str = "ctbridge.db";
const DEFAULT_CONCURRENCY: usize = 1;
const DEFAULT_QUEUE_CAPACITY: usize = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct WorkerConfig {
    pub database_path: PathBuf,
    /// Passphrase the session token key is derived from
    pub encryption_key: String,
    pub api_version: String,
    pub concurrency: usize,
    pub queue_capacity: usize,
}

impl WorkerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source; empty values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let encryption_key = get("CTBRIDGE_ENCRYPTION_KEY")
            .ok_or_else(|| Error::ConfigError("CTBRIDGE_ENCRYPTION_KEY is not set".to_string()))?;

        Ok(Self {
            database_path: get("CTBRIDGE_DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH)),
            encryption_key,
            api_version: get("SHOPIFY_API_VERSION")
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            concurrency: positive(
                "CTBRIDGE_WORKER_CONCURRENCY",
                get("CTBRIDGE_WORKER_CONCURRENCY"),
                DEFAULT_CONCURRENCY,
            )?,
            queue_capacity: positive(
                "CTBRIDGE_QUEUE_CAPACITY",
                get("CTBRIDGE_QUEUE_CAPACITY"),
                DEFAULT_QUEUE_CAPACITY,
            )?,
        })
    }
}

fn positive(name: &str, raw: Option<String>, default: usize) -> Result<usize> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match usize::from_str(raw.trim()) {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(Error::ConfigError(format!(
            "{} must be a positive integer, got '{}'",
            name, raw
        ))),
    }
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
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = WorkerConfig::from_lookup(lookup(&[("CTBRIDGE_ENCRYPTION_KEY", "secret")])).unwrap();
        assert_eq!(config.database_path, PathBuf::from("ctbridge.db"));
        assert_eq!(config.encryption_key, "secret");
        assert_eq!(config.api_version, "2025-04");
        assert_eq!(config.concurrency, 1);
        assert_eq!(config.queue_capacity, 100);
    }

    #[test]
    fn test_overrides() {
        let config = WorkerConfig::from_lookup(lookup(&[
            ("CTBRIDGE_ENCRYPTION_KEY", "secret"),
            ("CTBRIDGE_DATABASE_PATH", "/var/lib/ctbridge/sessions.db"),
            ("SHOPIFY_API_VERSION", "2024-10"),
            ("CTBRIDGE_WORKER_CONCURRENCY", "4"),
            ("CTBRIDGE_QUEUE_CAPACITY", " 16 "),
        ]))
        .unwrap();
        assert_eq!(config.database_path, PathBuf::from("/var/lib/ctbridge/sessions.db"));
        assert_eq!(config.api_version, "2024-10");
        assert_eq!(config.concurrency, 4);
        assert_eq!(config.queue_capacity, 16);
    }

    #[test]
    fn test_missing_key_is_rejected() {
        for vars in [&[][..], &[("CTBRIDGE_ENCRYPTION_KEY", "  ")][..]] {
            let err = WorkerConfig::from_lookup(lookup(vars)).unwrap_err();
            assert!(matches!(err, Error::ConfigError(m) if m.contains("CTBRIDGE_ENCRYPTION_KEY")));
        }
    }

    #[test]
    fn test_invalid_numbers_are_rejected() {
        for bad in ["0", "-2", "many"] {
            let err = WorkerConfig::from_lookup(lookup(&[
                ("CTBRIDGE_ENCRYPTION_KEY", "secret"),
                ("CTBRIDGE_WORKER_CONCURRENCY", bad),
            ]))
            .unwrap_err();
            assert!(matches!(err, Error::ConfigError(m) if m.contains("CTBRIDGE_WORKER_CONCURRENCY")));
        }
    }
}
