// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-aperiodic project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).
//!
//! Spectral analysis module
//!
//! This module handles spectral estimation of a time series (Welch method),
//! power-law fitting in log-log space and the detection of the frequency at
//! which a spectrum flattens into its noise floor.

pub mod fit;
pub mod plateau;
pub mod welch;

use serde::Serialize;

pub use fit::{fit_power_law, PowerLawFit};
pub use plateau::{detect_plateau_onset, PlateauOnset};
pub use welch::{Averaging, Detrend, WelchEstimator, WindowFunction};

/// One-sided power spectrum on a uniform, ascending frequency grid
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PowerSpectrum {
    /// Bin frequencies in Hz
    pub frequencies: Vec<f64>,
    /// Power spectral density per bin (units²/Hz)
    pub power: Vec<f64>,
}

impl PowerSpectrum {
    /// Number of frequency bins
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// Spacing between two bins, 0 for spectra with fewer than two bins
    pub fn resolution(&self) -> f64 {
        if self.frequencies.len() < 2 {
            0.0
        } else {
            self.frequencies[1] - self.frequencies[0]
        }
    }

    /// Keep the bins with `low <= f <= high`
    pub fn restrict(&self, low: f64, high: f64) -> PowerSpectrum {
        let (frequencies, power) = self
            .frequencies
            .iter()
            .zip(&self.power)
            .filter(|(f, _)| **f >= low && **f <= high)
            .map(|(f, p)| (*f, *p))
            .unzip();
        PowerSpectrum { frequencies, power }
    }
}

/// Indices of the bins of `frequencies` that fall inside `[low, high]`
pub(crate) fn band_indices(frequencies: &[f64], low: f64, high: f64) -> Vec<usize> {
    frequencies
        .iter()
        .enumerate()
        .filter(|(_, f)| **f >= low && **f <= high)
        .map(|(i, _)| i)
        .collect()
}
