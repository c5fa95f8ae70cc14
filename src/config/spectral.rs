// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-aperiodic project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Spectral estimation configuration

use serde::{Deserialize, Serialize};

use crate::spectral::{Averaging, Detrend, WindowFunction};

/// Settings of the Welch estimator.
///
/// The segment length is not part of this section: it is derived from the
/// analysis window in seconds and the sample rate of the analyzed signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WelchConfig {
    /// Overlap between consecutive segments, as a fraction of the segment
    pub overlap: f64,
    /// Taper applied to each segment
    pub window: WindowFunction,
    /// Trend removed from each segment
    pub detrend: Detrend,
    /// Combination of the segment periodograms
    pub averaging: Averaging,
}

impl Default for WelchConfig {
    fn default() -> Self {
        Self {
            overlap: 0.5,
            window: WindowFunction::Hann,
            detrend: Detrend::Constant,
            averaging: Averaging::Mean,
        }
    }
}
