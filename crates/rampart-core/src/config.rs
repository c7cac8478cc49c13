// Copyright 2026 Rampart Dev
// SPDX-License-Identifier: Apache-2.0

//! Configuration management for Rampart.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Main configuration for the policy subsystem.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Store configuration.
    pub store: StoreConfig,
    /// Policy document limits.
    pub policy: PolicyConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(crate::Error::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string cannot be parsed.
    pub fn parse(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))
    }
}

/// Store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Path of the metadata database file.
    pub db_path: PathBuf,
    /// Sync strategy for commits.
    pub sync: SyncStrategy,
    /// Number of attempts for an operation that hits a transient storage
    /// fault. Domain errors are never retried.
    pub retry_attempts: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { db_path: PathBuf::from("rampart.redb"), sync: SyncStrategy::Always, retry_attempts: 3 }
    }
}

/// Sync strategy for database commits, trading durability for throughput.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStrategy {
    /// fsync on every commit.
    Always,
    /// Let the database batch commits; flushed on a later durable commit.
    None,
}

/// Policy document limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Maximum accepted policy document size in bytes.
    /// Default: 20 KiB, matching the S3 bucket-policy limit.
    pub max_document_size: usize,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self { max_document_size: 20 * 1024 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.policy.max_document_size, 20 * 1024);
        assert_eq!(config.store.retry_attempts, 3);
        assert_eq!(config.store.sync, SyncStrategy::Always);
    }

    #[test]
    fn test_parse_partial_toml() {
        let config = Config::parse(
            r#"
            [store]
            db_path = "/var/lib/rampart/meta.redb"
            sync = "none"

            [policy]
            max_document_size = 4096
            "#,
        )
        .unwrap();

        assert_eq!(config.store.db_path, std::path::Path::new("/var/lib/rampart/meta.redb"));
        assert_eq!(config.store.sync, SyncStrategy::None);
        assert_eq!(config.policy.max_document_size, 4096);
    }

    #[test]
    fn test_parse_invalid_toml() {
        assert!(Config::parse("store = 12").is_err());
    }
}
