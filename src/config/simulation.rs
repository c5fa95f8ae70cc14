// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-aperiodic project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Signal simulation configuration
//!
//! This module defines the configuration section used by the `simulate`
//! command and by any analysis that starts from a synthetic signal.

use serde::{Deserialize, Serialize};

use crate::simulation::SpectralParameters;

/// Configuration for the colored-noise simulator.
///
/// The spectral parameters are flattened into the section, so a YAML file
/// reads:
///
/// ```yaml
/// simulation:
///   exponent: 2.0
///   periodic_components:
///     - frequency: 10.0
///       amplitude: 0.5
///       width: 1.0
///   noise_level: 0.0
///   normalize: 6.0
///   highpass_order: 4
///   highpass_mode: causal
///   highpass_cutoff: 1.0
///   sample_rate: 2400.0
///   duration: 180.0
///   seed: 1
/// ```
///
/// # Example
///
/// ```
/// use rust_aperiodic::config::SimulationConfig;
///
/// let config = SimulationConfig::default();
/// assert_eq!(config.seed, Some(1));
/// assert_eq!(config.parameters.sample_rate, 2400.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Spectral shape and acquisition parameters
    #[serde(flatten)]
    pub parameters: SpectralParameters,

    /// Seed of the random phase and white-noise generator, `null` draws
    /// from OS entropy
    #[serde(default = "default_seed")]
    pub seed: Option<u64>,
}

fn default_seed() -> Option<u64> {
    Some(1)
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            parameters: SpectralParameters::default(),
            seed: default_seed(),
        }
    }
}
