// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-aperiodic project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Sampled time series container

use ndarray::ArrayView2;

use crate::error::{ensure_positive, AperiodicError, Result};

/// Real-valued samples at a fixed sample rate
///
/// The series is immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    samples: Vec<f64>,
    sample_rate: f64,
}

impl TimeSeries {
    /// Wrap `samples` recorded at `sample_rate` Hz
    pub fn new(samples: Vec<f64>, sample_rate: f64) -> Result<Self> {
        ensure_positive("sample_rate", sample_rate)?;
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds
    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate
    }

    /// View the series as a one-channel matrix
    pub fn as_channel_view(&self) -> Result<ArrayView2<'_, f64>> {
        ArrayView2::from_shape((1, self.samples.len()), &self.samples)
            .map_err(|e| AperiodicError::InvalidConfig(format!("invalid series shape: {}", e)))
    }

    pub fn into_samples(self) -> Vec<f64> {
        self.samples
    }
}
