// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-aperiodic project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Fitting-error sweep configuration

use serde::{Deserialize, Serialize};

use crate::error::{ensure_band, AperiodicError, Result};

/// Lower fitting borders to sweep and the reference exponent.
///
/// Each lower border `l` produces one IRASA fit over `[l, upper_border]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Lower fitting borders in Hz
    pub lower_borders: Vec<f64>,
    /// Upper fitting border shared by every fit, in Hz
    pub upper_border: f64,
    /// Exponent the estimates are compared against
    pub true_exponent: f64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            lower_borders: (1..80).map(f64::from).collect(),
            upper_border: 100.0,
            true_exponent: 2.0,
        }
    }
}

impl SweepConfig {
    pub fn validate(&self) -> Result<()> {
        if self.lower_borders.is_empty() {
            return Err(AperiodicError::InvalidConfig(
                "sweep needs at least one lower border".to_string(),
            ));
        }
        if !self.true_exponent.is_finite() {
            return Err(AperiodicError::InvalidConfig(
                "true exponent must be finite".to_string(),
            ));
        }
        for &lower in &self.lower_borders {
            ensure_band((lower, self.upper_border))?;
        }
        Ok(())
    }
}
