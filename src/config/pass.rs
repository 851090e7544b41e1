//! Admission pass configuration.

use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::AdmissionError;

/// Environment variable overriding [`AdmissionConfig::max_candidates`].
pub const ENV_MAX_CANDIDATES: &str = "ADMISSION_MAX_CANDIDATES";
/// Environment variable overriding [`AdmissionConfig::spawn_dependencies`].
pub const ENV_SPAWN_DEPENDENCIES: &str = "ADMISSION_SPAWN_DEPENDENCIES";
/// Environment variable overriding [`AdmissionConfig::audit_capacity`].
pub const ENV_AUDIT_CAPACITY: &str = "ADMISSION_AUDIT_CAPACITY";

/// Tunables of one admission pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdmissionConfig {
    /// Candidates evaluated per pass; the rest are deferred.
    pub max_candidates: usize,
    /// Whether stale projects and inventory sources get dependency syncs.
    pub spawn_dependencies: bool,
    /// Events kept by sinks built from this config.
    pub audit_capacity: usize,
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self {
            max_candidates: 200,
            spawn_dependencies: true,
            audit_capacity: 1024,
        }
    }
}

impl AdmissionConfig {
    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// [`AdmissionError::InvalidConfig`] when `max_candidates` is zero.
    pub fn validate(&self) -> Result<(), AdmissionError> {
        if self.max_candidates == 0 {
            return Err(AdmissionError::InvalidConfig(
                "max_candidates must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// Parse configuration from a JSON string and validate. Missing fields
    /// take their defaults.
    ///
    /// # Errors
    ///
    /// [`AdmissionError::InvalidConfig`] on parse or validation failure.
    pub fn from_json_str(input: &str) -> Result<Self, AdmissionError> {
        let cfg: Self = serde_json::from_str(input)
            .map_err(|e| AdmissionError::InvalidConfig(format!("parse error: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Defaults overridden by `ADMISSION_*` variables, after loading `.env`.
    ///
    /// # Errors
    ///
    /// [`AdmissionError::InvalidConfig`] when a variable does not parse or
    /// the result fails validation.
    pub fn from_env() -> Result<Self, AdmissionError> {
        let _ = dotenvy::dotenv();
        let mut cfg = Self::default();
        if let Some(value) = read_var(ENV_MAX_CANDIDATES)? {
            cfg.max_candidates = value;
        }
        if let Some(value) = read_var(ENV_SPAWN_DEPENDENCIES)? {
            cfg.spawn_dependencies = value;
        }
        if let Some(value) = read_var(ENV_AUDIT_CAPACITY)? {
            cfg.audit_capacity = value;
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

fn read_var<T>(name: &str) -> Result<Option<T>, AdmissionError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| AdmissionError::InvalidConfig(format!("{name}={raw}: {e}"))),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(AdmissionError::InvalidConfig(format!("{name}: {e}"))),
    }
}
