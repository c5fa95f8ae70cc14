// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-aperiodic project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! IRASA configuration
//!
//! This module defines the settings of the aperiodic/oscillatory separator.

use log::warn;
use serde::{Deserialize, Serialize};

use super::WelchConfig;
use crate::error::{ensure_band, ensure_positive, AperiodicError, Result};
use crate::irasa::Aggregation;
use crate::resampling::{rational_factor, ResamplerKind};

/// Configuration of the IRASA separator.
///
/// # Resampling factors
///
/// Every factor must be strictly greater than 1. Factors are rounded to four
/// decimals when converted to `up / down` fractions. Integer factors are
/// accepted but realign harmonics onto the original grid, so they only give
/// valid results on oscillation-free input.
///
/// # Example
///
/// ```
/// use rust_aperiodic::config::IrasaConfig;
///
/// let config = IrasaConfig::default().with_linear_factors(1.1, 3.0, 5);
/// assert_eq!(config.factors.len(), 5);
/// assert_eq!(config.max_factor(), 3.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IrasaConfig {
    /// Fitting band `[low, high]` in Hz
    pub band: (f64, f64),

    /// Resampling factors `h`
    pub factors: Vec<f64>,

    /// Welch segment duration in seconds
    pub window_seconds: f64,

    /// Reduction of the per-factor aperiodic estimates
    pub aggregation: Aggregation,

    /// Rate-change algorithm
    pub resampler: ResamplerKind,

    /// Welch estimator settings
    pub welch: WelchConfig,
}

impl Default for IrasaConfig {
    fn default() -> Self {
        Self {
            band: (1.0, 30.0),
            factors: default_factors(),
            window_seconds: 4.0,
            aggregation: Aggregation::Mean,
            resampler: ResamplerKind::Polyphase,
            welch: WelchConfig::default(),
        }
    }
}

/// 1.10, 1.15, ..., 1.90
fn default_factors() -> Vec<f64> {
    (0..17).map(|i| 1.1 + 0.05 * i as f64).collect()
}

impl IrasaConfig {
    /// Replace the factors with `count` evenly spaced values from `first` to `last`
    pub fn with_linear_factors(mut self, first: f64, last: f64, count: usize) -> Self {
        self.factors = match count {
            0 => Vec::new(),
            1 => vec![first],
            _ => {
                let step = (last - first) / (count - 1) as f64;
                (0..count).map(|i| first + step * i as f64).collect()
            }
        };
        self
    }

    /// Set the fitting band (builder pattern)
    pub fn with_band(mut self, low: f64, high: f64) -> Self {
        self.band = (low, high);
        self
    }

    /// Largest resampling factor, 1 for an empty set
    pub fn max_factor(&self) -> f64 {
        self.factors.iter().copied().fold(1.0, f64::max)
    }

    /// Check the settings before any signal is touched
    ///
    /// ### Errors
    ///
    /// [`AperiodicError::InvalidConfig`] for an invalid band, an empty factor
    /// set, a factor not strictly above 1 (before or after rounding to four
    /// decimals), two factors equal after rounding or a non-positive window.
    pub fn validate(&self) -> Result<()> {
        ensure_band(self.band)?;
        ensure_positive("window_seconds", self.window_seconds)?;
        if self.factors.is_empty() {
            return Err(AperiodicError::InvalidConfig(
                "at least one resampling factor is required".to_string(),
            ));
        }
        let mut rationalized: Vec<(usize, usize)> = Vec::with_capacity(self.factors.len());
        for &factor in &self.factors {
            if !factor.is_finite() || factor <= 1.0 {
                return Err(AperiodicError::InvalidConfig(format!(
                    "resampling factors must be > 1, got {}",
                    factor
                )));
            }
            let (up, down) = rational_factor(factor)?;
            if up <= down {
                return Err(AperiodicError::InvalidConfig(format!(
                    "resampling factor {} rounds to {}/{}, which is not above 1",
                    factor, up, down
                )));
            }
            if rationalized.contains(&(up, down)) {
                return Err(AperiodicError::InvalidConfig(format!(
                    "resampling factor {} repeats {}/{} after rounding to four decimals",
                    factor, up, down
                )));
            }
            rationalized.push((up, down));
            if factor.fract() == 0.0 {
                warn!(
                    "Integer resampling factor {} keeps harmonics aligned, only use it on oscillation-free data",
                    factor
                );
            }
        }
        if !(0.0..1.0).contains(&self.welch.overlap) {
            return Err(AperiodicError::InvalidConfig(format!(
                "Welch overlap must lie in [0, 1), got {}",
                self.welch.overlap
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_factors() {
        let config = IrasaConfig::default();
        assert_eq!(config.factors.len(), 17);
        assert_relative_eq!(config.factors[0], 1.1);
        assert_relative_eq!(config.max_factor(), 1.9, epsilon = 1e-12);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_linear_factors() {
        let config = IrasaConfig::default().with_linear_factors(1.1, 1.9, 9);
        assert_eq!(config.factors.len(), 9);
        assert_relative_eq!(config.factors[4], 1.5, epsilon = 1e-12);
        assert_relative_eq!(config.factors[8], 1.9, epsilon = 1e-12);
    }

    #[test]
    fn test_validation() {
        let config = IrasaConfig::default();
        assert!(config.clone().with_band(0.0, 30.0).validate().is_err());
        assert!(config.clone().with_band(30.0, 10.0).validate().is_err());

        let mut bad_factor = config.clone();
        bad_factor.factors = vec![1.2, 1.0];
        assert!(matches!(
            bad_factor.validate(),
            Err(AperiodicError::InvalidConfig(_))
        ));

        // 1.00001 becomes 1/1 once rounded
        let mut rounds_to_one = config.clone();
        rounds_to_one.factors = vec![1.00001];
        assert!(rounds_to_one.validate().is_err());

        let mut duplicate = config.clone();
        duplicate.factors = vec![1.3, 1.30004];
        assert!(duplicate.validate().is_err());

        let mut empty = config.clone();
        empty.factors.clear();
        assert!(empty.validate().is_err());

        // Integer factors only warn
        let integer = config.with_linear_factors(2.0, 3.0, 2);
        assert!(integer.validate().is_ok());
    }
}
