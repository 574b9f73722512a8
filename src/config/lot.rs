//! Lot and storage configuration structures.

use std::path::PathBuf;

use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};

use crate::core::AppResult;

/// Default number of audit events kept in memory.
pub const DEFAULT_AUDIT_BUFFER: usize = 256;

/// Slot store backend selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackendConfig {
    /// Volatile store for development/testing.
    InMemory,
    /// SQLite database file.
    Sqlite {
        /// Database file path; created if missing.
        path: PathBuf,
    },
}

/// Lot configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotConfig {
    /// Number of slots, fixed at initialization.
    pub capacity: u32,
    /// Store backend selection.
    pub store: StoreBackendConfig,
    /// In-memory audit buffer size; 0 disables the in-memory audit trail.
    #[serde(default = "default_audit_buffer")]
    pub audit_buffer: usize,
}

const fn default_audit_buffer() -> usize {
    DEFAULT_AUDIT_BUFFER
}

impl LotConfig {
    /// In-memory lot with the given capacity.
    pub const fn in_memory(capacity: u32) -> Self {
        Self {
            capacity,
            store: StoreBackendConfig::InMemory,
            audit_buffer: DEFAULT_AUDIT_BUFFER,
        }
    }

    /// SQLite-backed lot with the given capacity.
    pub fn sqlite(capacity: u32, path: impl Into<PathBuf>) -> Self {
        Self {
            capacity,
            store: StoreBackendConfig::Sqlite { path: path.into() },
            audit_buffer: DEFAULT_AUDIT_BUFFER,
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.capacity == 0 {
            return Err("capacity must be greater than 0".into());
        }
        if let StoreBackendConfig::Sqlite { path } = &self.store {
            if path.as_os_str().is_empty() {
                return Err("sqlite path must not be empty".into());
            }
        }
        Ok(())
    }

    /// Parse lot configuration from a JSON string and validate.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load configuration from the process environment, reading `.env` first if present.
    ///
    /// `PARKING_CAPACITY` is required. `PARKING_DB_PATH` selects the SQLite
    /// backend (in-memory otherwise) and `PARKING_AUDIT_BUFFER` sizes the audit trail.
    pub fn from_env() -> AppResult<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let capacity = lookup("PARKING_CAPACITY")
            .context("PARKING_CAPACITY is not set")?
            .trim()
            .parse::<u32>()
            .context("PARKING_CAPACITY must be a positive integer")?;
        let store = match lookup("PARKING_DB_PATH") {
            Some(path) if !path.trim().is_empty() => StoreBackendConfig::Sqlite {
                path: PathBuf::from(path.trim()),
            },
            _ => StoreBackendConfig::InMemory,
        };
        let audit_buffer = match lookup("PARKING_AUDIT_BUFFER") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .context("PARKING_AUDIT_BUFFER must be a non-negative integer")?,
            None => DEFAULT_AUDIT_BUFFER,
        };
        let cfg = Self {
            capacity,
            store,
            audit_buffer,
        };
        cfg.validate().map_err(|e| anyhow!("invalid lot configuration: {e}"))?;
        Ok(cfg)
    }
}
