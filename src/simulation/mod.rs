// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-aperiodic project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! # Electrophysiological signal simulation
//!
//! This module synthesizes time series whose power spectrum follows a known
//! power law `P(f) ~ f^-exponent`, optionally with narrowband oscillatory
//! peaks, additive white noise and the high-pass filter of an acquisition
//! chain. Because the ground-truth exponent is known, the simulated signals
//! are used to measure how well an estimator recovers it.
//!
//! Every call produces two series built from the *same* random phases:
//!
//! * the pure aperiodic signal
//! * the same signal with the oscillatory peaks added
//!
//! so that any difference between the two is caused by the peaks alone.
//!
//! ## Example
//!
//! ```rust
//! use rust_aperiodic::simulation::{ColoredNoiseGenerator, SpectralParameters};
//!
//! let params = SpectralParameters::default()
//!     .with_exponent(2.0)
//!     .with_component(10.0, 0.5, 1.0)
//!     .with_sample_rate(1000.0)
//!     .with_duration(10.0);
//!
//! let mut generator = ColoredNoiseGenerator::new(1);
//! let signals = generator.generate(&params).unwrap();
//! assert_eq!(signals.aperiodic.len(), 10_000);
//! ```

mod colored_noise;


pub use colored_noise::{ColoredNoiseGenerator, RandomPhases};

use serde::{Deserialize, Serialize};

use crate::error::{ensure_positive, AperiodicError, Result};
use crate::preprocessing::FilterMode;
use crate::utility::TimeSeries;

/// A Gaussian bump added to the amplitude spectrum
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodicComponent {
    /// Center frequency in Hz
    pub frequency: f64,
    /// Scale of the Gaussian density added to the amplitude spectrum
    pub amplitude: f64,
    /// Standard deviation of the bump in Hz
    pub width: f64,
}

/// Parameters of one simulation call
///
/// Defaults: exponent 1, no peaks, no white noise, normalization to a
/// standard deviation of 6, order 4 causal high-pass at 1 Hz, 2400 Hz for
/// 180 s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpectralParameters {
    /// Aperiodic exponent
    pub exponent: f64,
    /// Oscillatory peaks
    pub periodic_components: Vec<PeriodicComponent>,
    /// Standard deviation of the additive white noise, 0 disables it
    pub noise_level: f64,
    /// Target standard deviation of the aperiodic series
    pub normalize: Option<f64>,
    /// Butterworth high-pass order, 0 disables the filter
    pub highpass_order: usize,
    /// Causal or zero-phase high-pass application
    pub highpass_mode: FilterMode,
    /// High-pass cutoff in Hz
    pub highpass_cutoff: f64,
    /// Sample rate in Hz
    pub sample_rate: f64,
    /// Duration in seconds
    pub duration: f64,
}

impl Default for SpectralParameters {
    fn default() -> Self {
        Self {
            exponent: 1.0,
            periodic_components: Vec::new(),
            noise_level: 0.0,
            normalize: Some(6.0),
            highpass_order: 4,
            highpass_mode: FilterMode::Causal,
            highpass_cutoff: 1.0,
            sample_rate: 2400.0,
            duration: 180.0,
        }
    }
}

impl SpectralParameters {
    pub fn with_exponent(mut self, exponent: f64) -> Self {
        self.exponent = exponent;
        self
    }

    /// Add a Gaussian peak at `frequency` Hz
    pub fn with_component(mut self, frequency: f64, amplitude: f64, width: f64) -> Self {
        self.periodic_components.push(PeriodicComponent {
            frequency,
            amplitude,
            width,
        });
        self
    }

    pub fn with_noise_level(mut self, noise_level: f64) -> Self {
        self.noise_level = noise_level;
        self
    }

    pub fn with_normalize(mut self, normalize: Option<f64>) -> Self {
        self.normalize = normalize;
        self
    }

    /// Set the high-pass order (0 disables it) and mode
    pub fn with_highpass(mut self, order: usize, mode: FilterMode) -> Self {
        self.highpass_order = order;
        self.highpass_mode = mode;
        self
    }

    pub fn with_sample_rate(mut self, sample_rate: f64) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = duration;
        self
    }

    /// Number of samples, `round(duration * sample_rate)`
    pub fn sample_count(&self) -> usize {
        (self.duration * self.sample_rate).round() as usize
    }

    /// Check every parameter before generation
    ///
    /// ### Errors
    ///
    /// [`AperiodicError::InvalidConfig`] for a non-positive sample rate or
    /// duration, a negative noise level or peak width, a non-positive
    /// normalization target, a high-pass cutoff outside `(0, Nyquist)` or any
    /// non-finite value.
    pub fn validate(&self) -> Result<()> {
        ensure_positive("sample_rate", self.sample_rate)?;
        ensure_positive("duration", self.duration)?;
        if !self.exponent.is_finite() {
            return Err(AperiodicError::InvalidConfig(format!(
                "exponent must be finite, got {}",
                self.exponent
            )));
        }
        if !self.noise_level.is_finite() || self.noise_level < 0.0 {
            return Err(AperiodicError::InvalidConfig(format!(
                "noise level must be a non-negative number, got {}",
                self.noise_level
            )));
        }
        if let Some(target) = self.normalize {
            ensure_positive("normalize", target)?;
        }
        for component in &self.periodic_components {
            if !component.frequency.is_finite() || !component.amplitude.is_finite() {
                return Err(AperiodicError::InvalidConfig(format!(
                    "periodic component {:?} has non-finite values",
                    component
                )));
            }
            if !component.width.is_finite() || component.width < 0.0 {
                return Err(AperiodicError::InvalidConfig(format!(
                    "periodic component width must be >= 0, got {}",
                    component.width
                )));
            }
        }
        if self.highpass_order > 0 {
            ensure_positive("highpass_cutoff", self.highpass_cutoff)?;
            if self.highpass_cutoff >= self.sample_rate / 2.0 {
                return Err(AperiodicError::InvalidConfig(format!(
                    "high-pass cutoff {} Hz must be below Nyquist ({} Hz)",
                    self.highpass_cutoff,
                    self.sample_rate / 2.0
                )));
            }
        }
        Ok(())
    }
}

/// Output of one simulation call
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedSignals {
    /// Power-law signal without peaks
    pub aperiodic: TimeSeries,
    /// Same signal with the periodic components added
    pub aperiodic_with_oscillations: TimeSeries,
}
