// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-aperiodic project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Configuration management for the aperiodic analysis tool
//!
//! This module provides functionality for loading, validating, and applying
//! configuration settings. The configuration is backed by a YAML file and
//! validated against a JSON schema for robustness.
//!
//! ## Configuration Structure
//!
//! The configuration is organized as a nested structure with sections:
//! - `simulation`: Parameters of the colored-noise simulator
//! - `irasa`: Fitting band, resampling factors and Welch settings of the separator
//! - `plateau`: Thresholds of the noise-floor detector
//! - `sweep`: Lower fitting borders of the fitting-error sweep
//!
//! ## Usage
//!
//! ```no_run
//! use rust_aperiodic::config::Config;
//! use std::path::Path;
//!
//! // Load config from file, creates a default if not found
//! let mut config = Config::from_file(Path::new("config.yaml")).unwrap();
//!
//! // Apply command line overrides if needed
//! config.apply_args(
//!     Some(2.0),          // Exponent
//!     None,               // White-noise level
//!     Some(1000.0),       // Sample rate
//!     Some(60.0),         // Duration
//!     Some(42),           // Seed
//!     Some((2.0, 40.0)),  // Fitting band
//!     None,               // IRASA window in seconds
//! );
//!
//! println!("Fitting band: {:?}", config.irasa.band);
//! ```

pub mod irasa;
pub mod plateau;
pub mod simulation;
pub mod spectral;
pub mod sweep;
pub mod utils;

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, error};
use serde::{Deserialize, Serialize};

// Re-export all types for public API
pub use irasa::IrasaConfig;
pub use plateau::PlateauConfig;
pub use simulation::SimulationConfig;
pub use spectral::WelchConfig;
pub use sweep::SweepConfig;
pub use utils::output_config_schema;

/// Root configuration structure.
///
/// # Default Values
///
/// Each section uses default values when not explicitly specified in the
/// configuration file, so an empty file is a valid configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Simulator settings used by the `simulate` command
    #[serde(default)]
    pub simulation: SimulationConfig,

    /// Separator settings used by the `separate` and `sweep` commands
    #[serde(default)]
    pub irasa: IrasaConfig,

    /// Noise-floor detector settings used by the `plateau` command
    #[serde(default)]
    pub plateau: PlateauConfig,

    /// Fitting-error sweep settings used by the `sweep` command
    #[serde(default)]
    pub sweep: SweepConfig,
}

impl Config {
    /// Helper method to create a sample config file when validation fails
    fn create_sample_config<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        let sample_path = path.with_extension("sample.yaml");
        debug!("Original path: {:?}, Sample path: {:?}", path, sample_path);

        if let Some(parent) = sample_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                debug!("Creating parent directory: {:?}", parent);
                fs::create_dir_all(parent).with_context(|| {
                    format!(
                        "Failed to create parent directory for sample config at {:?}",
                        parent
                    )
                })?;
            }
        }

        Self::default()
            .save_to_file(&sample_path)
            .with_context(|| format!("Failed to save sample config to {:?}", sample_path))?;

        error!(
            "Sample configuration file created at {:?}\nPlease edit and rename it",
            sample_path
        );
        Ok(())
    }

    /// Load configuration from a file
    ///
    /// A missing file is created with the default configuration. A file that
    /// fails schema validation, deserialization or the specific rules leaves a
    /// `*.sample.yaml` file with the defaults next to it and returns an error.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(
                "Configuration file not found at {:?}, creating default",
                path
            );
            let default_config = Self::default();
            default_config.save_to_file(path)?;
            return Ok(default_config);
        }

        debug!("Loading configuration from {:?}", path);
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file at {:?}", path))?;

        // First step: convert YAML to a generic Value
        let yaml_value: serde_yml::Value = serde_yml::from_str(&contents)
            .with_context(|| format!("Failed to parse YAML configuration from {:?}", path))?;

        // An empty document parses as null and means "all defaults"
        let json_value = match serde_json::to_value(&yaml_value).with_context(|| {
            format!("Failed to convert YAML to JSON for validation: {:?}", path)
        })? {
            serde_json::Value::Null => serde_json::Value::Object(Default::default()),
            value => value,
        };

        let validator = utils::schema_validator()?;

        debug!("Validating {} configuration against schema", path.display());
        if let Err(error) = validator.validate(&json_value) {
            error!("Configuration validation error before deserialization");
            Self::create_sample_config(path)?;
            anyhow::bail!("Configuration validation failed: {}", error);
        }

        debug!("Schema validation passed, deserializing into Config structure");
        let config: Config = match serde_json::from_value(json_value) {
            Ok(config) => config,
            Err(err) => {
                error!("Configuration deserialization error: {}", err);
                if let Err(e) = Self::create_sample_config(path) {
                    error!("Failed to create sample config: {}", e);
                }
                return Err(anyhow::anyhow!(
                    "Failed to deserialize configuration from {}: {}",
                    path.display(),
                    err
                ));
            }
        };

        if let Err(err) = config.validate() {
            error!("Configuration specific validation error: {}", err);
            Self::create_sample_config(path)?;
            return Err(err);
        }

        Ok(config)
    }

    /// Validate the configuration against the rules the JSON schema cannot express
    pub fn validate(&self) -> Result<()> {
        utils::validate_specific_rules(self)
    }

    /// Save the configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml =
            serde_yml::to_string(self).context("Failed to serialize configuration to YAML")?;

        let mut file = File::create(path.as_ref())
            .with_context(|| format!("Failed to create config file at {:?}", path.as_ref()))?;

        file.write_all(yaml.as_bytes())
            .with_context(|| format!("Failed to write configuration to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Apply command line arguments to override configuration values.
    ///
    /// Only values that are explicitly provided override the existing
    /// configuration.
    ///
    /// # Parameters
    ///
    /// * `exponent` - Aperiodic exponent of the simulated signal
    /// * `noise_level` - Standard deviation of the added white noise
    /// * `sample_rate` - Sample rate of the simulated signal in Hz
    /// * `duration` - Duration of the simulated signal in seconds
    /// * `seed` - Seed of the simulator
    /// * `band` - IRASA fitting band in Hz
    /// * `window_seconds` - IRASA Welch segment duration in seconds
    #[allow(clippy::too_many_arguments)]
    pub fn apply_args(
        &mut self,
        exponent: Option<f64>,
        noise_level: Option<f64>,
        sample_rate: Option<f64>,
        duration: Option<f64>,
        seed: Option<u64>,
        band: Option<(f64, f64)>,
        window_seconds: Option<f64>,
    ) {
        if let Some(exponent) = exponent {
            debug!("Overriding exponent from command line: {}", exponent);
            self.simulation.parameters.exponent = exponent;
        }
        if let Some(level) = noise_level {
            debug!("Overriding noise level from command line: {}", level);
            self.simulation.parameters.noise_level = level;
        }
        if let Some(rate) = sample_rate {
            debug!("Overriding sample rate from command line: {}", rate);
            self.simulation.parameters.sample_rate = rate;
        }
        if let Some(duration) = duration {
            debug!("Overriding duration from command line: {}", duration);
            self.simulation.parameters.duration = duration;
        }
        if let Some(seed) = seed {
            debug!("Overriding seed from command line: {}", seed);
            self.simulation.seed = Some(seed);
        }
        if let Some(band) = band {
            debug!("Overriding fitting band from command line: {:?}", band);
            self.irasa.band = band;
        }
        if let Some(window) = window_seconds {
            debug!("Overriding IRASA window from command line: {}", window);
            self.irasa.window_seconds = window;
        }
    }
}
