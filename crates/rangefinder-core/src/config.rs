// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Sensor tuning, plus the config service and storage port hosts persist it with.

use std::cell::RefCell;
use std::collections::BTreeMap;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

use crate::probe::LayerMask;
use crate::scanner::ScanParams;

/// Store key under which [`SensorConfig`] is persisted.
pub const SENSOR_CONFIG_KEY: &str = "sensor";

/// Speed of light in m/s; default propagation speed for light-time filtering.
pub const SPEED_OF_LIGHT: f64 = 299_792_458.0;

/// Tunable sensor parameters.
///
/// Missing fields deserialize to their defaults, so partial JSON files are valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Scanner convergence length in metres.
    pub epsilon: f64,
    /// Slices per walk when a search starts; at least 2.
    pub initial_slices: u32,
    /// Fraction (0–1) of the host tick the terrain solver may spend.
    pub time_budget_fraction: f64,
    /// Metres added past the far search bound to tolerate body motion.
    pub bound_margin: f64,
    /// Metres backed up when a search suspends.
    pub resume_margin: f64,
    /// Nesting ceiling for scanner refinement and slice doubling.
    pub max_scan_depth: u32,
    /// Consecutive contradicted ticks before the probe stabilizer gives in.
    pub contradiction_threshold: u32,
    /// Propagation speed (m/s) for light-time hit validation.
    pub propagation_speed: f64,
    /// Probe fixes farther than this (metres) also consult the terrain solver.
    pub near_field_cutoff: f64,
    /// Range passed to the physics probe.
    pub probe_max_distance: f64,
    /// Layers the physics probe may hit.
    pub probe_mask: LayerMask,
    /// Terrain fixes closer than this (metres) are discarded; `0` disables.
    pub analytic_min_distance: f64,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            epsilon: 2.0,
            initial_slices: 50,
            time_budget_fraction: 0.05,
            bound_margin: 50.0,
            resume_margin: 5.0,
            max_scan_depth: 64,
            contradiction_threshold: 2,
            propagation_speed: SPEED_OF_LIGHT,
            near_field_cutoff: 2_500.0,
            probe_max_distance: 100_000.0,
            probe_mask: LayerMask::ALL,
            analytic_min_distance: 0.0,
        }
    }
}

impl SensorConfig {
    /// Scanner parameters derived from this config.
    pub fn scan_params(&self) -> ScanParams {
        ScanParams {
            epsilon: self.epsilon,
            resume_margin: self.resume_margin,
            max_depth: self.max_scan_depth,
        }
    }

    /// Checks ranges; returns the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be finite and > 0, got {value}"),
                })
            }
        }
        fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be finite and >= 0, got {value}"),
                })
            }
        }

        positive("epsilon", self.epsilon)?;
        positive("propagation_speed", self.propagation_speed)?;
        positive("probe_max_distance", self.probe_max_distance)?;
        non_negative("bound_margin", self.bound_margin)?;
        non_negative("resume_margin", self.resume_margin)?;
        non_negative("near_field_cutoff", self.near_field_cutoff)?;
        non_negative("analytic_min_distance", self.analytic_min_distance)?;
        if !(0.0..=1.0).contains(&self.time_budget_fraction) {
            return Err(ConfigError::Invalid {
                field: "time_budget_fraction",
                reason: format!("must lie in [0, 1], got {}", self.time_budget_fraction),
            });
        }
        if self.initial_slices < 2 {
            return Err(ConfigError::Invalid {
                field: "initial_slices",
                reason: "must be at least 2".into(),
            });
        }
        if self.max_scan_depth == 0 {
            return Err(ConfigError::Invalid {
                field: "max_scan_depth",
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }
}

/// Storage port for raw config blobs (keyed by logical name).
pub trait ConfigStore {
    /// Load a raw config blob. Returns `NotFound` when missing.
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError>;
    /// Persist a raw config blob.
    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError>;
}

/// Error type for config operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Key not present in store.
    #[error("not found")]
    NotFound,
    /// I/O error while reading/writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization/deserialization failure.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
    /// A value was out of range.
    #[error("invalid {field}: {reason}")]
    Invalid {
        /// Offending field.
        field: &'static str,
        /// What was wrong with it.
        reason: String,
    },
    /// Catch-all error variant.
    #[error("other: {0}")]
    Other(String),
}

/// Thin service that serializes config values and delegates storage to a `ConfigStore`.
pub struct ConfigService<S> {
    store: S,
}

impl<S> ConfigService<S> {
    /// Create a new service using the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Consume the service and return the inner store.
    pub fn into_inner(self) -> S {
        self.store
    }
}

impl<S> ConfigService<S>
where
    S: ConfigStore,
{
    /// Load and deserialize a config value for `key`. Returns `Ok(None)` if missing.
    pub fn load<T>(&self, key: &str) -> Result<Option<T>, ConfigError>
    where
        T: DeserializeOwned,
    {
        match self.store.load_raw(key) {
            Ok(bytes) => {
                if bytes.is_empty() {
                    return Ok(None);
                }
                let value = serde_json::from_slice(&bytes)?;
                Ok(Some(value))
            }
            Err(ConfigError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Serialize and persist a config value for `key`.
    pub fn save<T>(&self, key: &str, value: &T) -> Result<(), ConfigError>
    where
        T: Serialize,
    {
        let data = serde_json::to_vec_pretty(value)?;
        self.store.save_raw(key, &data)
    }

    /// Loads and validates the sensor config, falling back to defaults when
    /// none is stored.
    pub fn sensor_config(&self) -> Result<SensorConfig, ConfigError> {
        let config = self
            .load::<SensorConfig>(SENSOR_CONFIG_KEY)?
            .unwrap_or_default();
        config.validate()?;
        Ok(config)
    }
}

/// In-memory `ConfigStore`, for hosts that embed their config and for tests.
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    blobs: RefCell<BTreeMap<String, Vec<u8>>>,
}

impl ConfigStore for MemoryConfigStore {
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError> {
        self.blobs
            .borrow()
            .get(key)
            .cloned()
            .ok_or(ConfigError::NotFound)
    }

    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError> {
        self.blobs.borrow_mut().insert(key.to_owned(), data.to_vec());
        Ok(())
    }
}
