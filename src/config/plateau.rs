// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-aperiodic project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Noise-floor detector configuration

use serde::{Deserialize, Serialize};

use crate::error::{ensure_positive, AperiodicError, Result};

/// Thresholds of the plateau (noise-floor) detector.
///
/// # Example
///
/// ```yaml
/// plateau:
///   window_hz: 50.0
///   tolerance: 0.05
///   sustain_bins: 5
///   start_frequency: 1.0
///   segment_seconds: 1.0
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlateauConfig {
    /// Width of the sliding slope window in Hz
    pub window_hz: f64,
    /// Largest local log-log slope magnitude still considered flat
    pub tolerance: f64,
    /// Consecutive flat window positions required for a detection
    pub sustain_bins: usize,
    /// Only bins above this frequency are scanned
    pub start_frequency: f64,
    /// Welch segment duration used by the `plateau` command
    pub segment_seconds: f64,
}

impl Default for PlateauConfig {
    fn default() -> Self {
        Self {
            window_hz: 50.0,
            tolerance: 0.05,
            sustain_bins: 5,
            start_frequency: 1.0,
            segment_seconds: 1.0,
        }
    }
}

impl PlateauConfig {
    pub fn validate(&self) -> Result<()> {
        ensure_positive("window_hz", self.window_hz)?;
        ensure_positive("segment_seconds", self.segment_seconds)?;
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(AperiodicError::InvalidConfig(format!(
                "plateau tolerance must be a non-negative number, got {}",
                self.tolerance
            )));
        }
        if self.sustain_bins == 0 {
            return Err(AperiodicError::InvalidConfig(
                "plateau sustain_bins must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
