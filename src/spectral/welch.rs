// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-aperiodic project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Welch power spectral density estimation
//!
//! This module estimates one-sided power spectral densities by averaging the
//! periodograms of overlapping, windowed segments of a signal. It follows the
//! conventions of `scipy.signal.welch` so spectra computed here can be compared
//! with spectra produced by common electrophysiology tooling:
//!
//! - periodic ("DFT-even") window functions
//! - per-segment constant detrending (optional)
//! - density scaling in units²/Hz, doubled for every bin except DC and Nyquist
//! - mean or bias-corrected median averaging across segments
//!
//! # Example
//!
//! ```
//! use rust_aperiodic::spectral::welch::WelchEstimator;
//!
//! let sample_rate = 1000.0;
//! let signal: Vec<f64> = (0..10_000)
//!     .map(|i| (2.0 * std::f64::consts::PI * 50.0 * i as f64 / sample_rate).sin())
//!     .collect();
//!
//! // One second segments give a 1 Hz resolution
//! let estimator = WelchEstimator::new(1000);
//! let spectrum = estimator.estimate(&signal, sample_rate).unwrap();
//!
//! let peak = spectrum
//!     .power
//!     .iter()
//!     .enumerate()
//!     .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
//!     .map(|(i, _)| spectrum.frequencies[i])
//!     .unwrap();
//! assert_eq!(peak, 50.0);
//! ```

use std::f64::consts::PI;

use log::{debug, warn};
use realfft::RealFftPlanner;
use serde::{Deserialize, Serialize};

use super::PowerSpectrum;
use crate::config::WelchConfig;
use crate::error::{ensure_positive, AperiodicError, Result};

/// Available window functions for spectral analysis
///
/// All windows are generated in their periodic form, which is what
/// `scipy.signal.get_window` returns for spectral estimation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowFunction {
    /// Rectangular window (no windowing)
    Rectangular,
    /// Hann window (cosine-based)
    Hann,
    /// Hamming window (raised cosine with non-zero edges)
    Hamming,
    /// Blackman window (enhanced leakage suppression)
    Blackman,
}

impl WindowFunction {
    /// Coefficients of the window for a segment of `len` samples
    pub fn coefficients(&self, len: usize) -> Vec<f64> {
        let n = len as f64;
        (0..len)
            .map(|i| {
                let x = i as f64 / n;
                match self {
                    WindowFunction::Rectangular => 1.0,
                    WindowFunction::Hann => 0.5 - 0.5 * (2.0 * PI * x).cos(),
                    WindowFunction::Hamming => 0.54 - 0.46 * (2.0 * PI * x).cos(),
                    WindowFunction::Blackman => {
                        0.42 - 0.5 * (2.0 * PI * x).cos() + 0.08 * (4.0 * PI * x).cos()
                    }
                }
            })
            .collect()
    }
}

/// Trend removal applied to each segment before windowing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Detrend {
    /// Leave the segment untouched
    None,
    /// Subtract the segment mean
    Constant,
}

/// How segment periodograms are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Averaging {
    /// Arithmetic mean of the segment periodograms
    Mean,
    /// Median of the segment periodograms, corrected for its bias on
    /// chi-squared distributed values
    Median,
}

/// Welch power spectral density estimator
///
/// The estimator is stateless: every call to [`WelchEstimator::estimate`]
/// plans its own FFT, so one instance can be shared between threads.
#[derive(Debug, Clone)]
pub struct WelchEstimator {
    segment_length: usize,
    overlap: f64,
    window: WindowFunction,
    detrend: Detrend,
    averaging: Averaging,
}

impl WelchEstimator {
    /// Create an estimator with `segment_length` samples per segment and the
    /// scipy defaults (Hann window, 50% overlap, constant detrend, mean)
    pub fn new(segment_length: usize) -> Self {
        Self {
            segment_length,
            overlap: 0.5,
            window: WindowFunction::Hann,
            detrend: Detrend::Constant,
            averaging: Averaging::Mean,
        }
    }

    /// Create an estimator from the configuration section
    pub fn from_config(segment_length: usize, config: &WelchConfig) -> Self {
        Self {
            segment_length,
            overlap: config.overlap,
            window: config.window,
            detrend: config.detrend,
            averaging: config.averaging,
        }
    }

    /// Set the window function (builder pattern)
    pub fn with_window(mut self, window: WindowFunction) -> Self {
        self.window = window;
        self
    }

    /// Set the detrending mode (builder pattern)
    pub fn with_detrend(mut self, detrend: Detrend) -> Self {
        self.detrend = detrend;
        self
    }

    /// Set the averaging mode (builder pattern)
    pub fn with_averaging(mut self, averaging: Averaging) -> Self {
        self.averaging = averaging;
        self
    }

    /// Set the overlap between consecutive segments as a fraction in `[0, 1)`
    pub fn with_overlap(mut self, overlap: f64) -> Self {
        self.overlap = overlap;
        self
    }

    /// Number of samples per segment
    pub fn segment_length(&self) -> usize {
        self.segment_length
    }

    /// Estimate the one-sided power spectral density of `signal`
    ///
    /// ### Errors
    ///
    /// - [`AperiodicError::InvalidConfig`] for a non-positive sample rate, a
    ///   zero segment length or an overlap outside `[0, 1)`
    /// - [`AperiodicError::InsufficientData`] when the signal holds fewer than
    ///   two samples
    pub fn estimate(&self, signal: &[f64], sample_rate: f64) -> Result<PowerSpectrum> {
        ensure_positive("sample_rate", sample_rate)?;
        if self.segment_length == 0 {
            return Err(AperiodicError::InvalidConfig(
                "Welch segment length must be at least one sample".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&self.overlap) {
            return Err(AperiodicError::InvalidConfig(format!(
                "Welch overlap must lie in [0, 1), got {}",
                self.overlap
            )));
        }
        if signal.len() < 2 {
            return Err(AperiodicError::InsufficientData(format!(
                "Welch estimate needs at least 2 samples, got {}",
                signal.len()
            )));
        }

        let mut nperseg = self.segment_length;
        if signal.len() < nperseg {
            warn!(
                "Segment length {} exceeds signal length {}, shrinking segment",
                nperseg,
                signal.len()
            );
            nperseg = signal.len();
        }
        let noverlap = ((nperseg as f64 * self.overlap).floor() as usize).min(nperseg - 1);
        let step = nperseg - noverlap;
        let n_segments = (signal.len() - nperseg) / step + 1;

        let window = self.window.coefficients(nperseg);
        let window_power: f64 = window.iter().map(|w| w * w).sum();
        let scale = 1.0 / (sample_rate * window_power);
        let n_freqs = nperseg / 2 + 1;

        let mut planner = RealFftPlanner::<f64>::new();
        let r2c = planner.plan_fft_forward(nperseg);
        let mut input = r2c.make_input_vec();
        let mut output = r2c.make_output_vec();
        let mut scratch = r2c.make_scratch_vec();

        let mut periodograms: Vec<Vec<f64>> = Vec::with_capacity(n_segments);
        for segment_index in 0..n_segments {
            let start = segment_index * step;
            let segment = &signal[start..start + nperseg];
            let offset = match self.detrend {
                Detrend::None => 0.0,
                Detrend::Constant => segment.iter().sum::<f64>() / nperseg as f64,
            };
            for ((dst, &x), &w) in input.iter_mut().zip(segment).zip(&window) {
                *dst = (x - offset) * w;
            }
            r2c.process_with_scratch(&mut input, &mut output, &mut scratch)?;

            let periodogram: Vec<f64> = output
                .iter()
                .enumerate()
                .map(|(k, c)| {
                    let density = c.norm_sqr() * scale;
                    if k == 0 || (nperseg % 2 == 0 && k == n_freqs - 1) {
                        density
                    } else {
                        2.0 * density
                    }
                })
                .collect();
            periodograms.push(periodogram);
        }

        let power = match self.averaging {
            Averaging::Mean => {
                let mut acc = vec![0.0; n_freqs];
                for periodogram in &periodograms {
                    for (a, p) in acc.iter_mut().zip(periodogram) {
                        *a += p;
                    }
                }
                acc.iter().map(|a| a / n_segments as f64).collect()
            }
            Averaging::Median => {
                let bias = median_bias(n_segments);
                (0..n_freqs)
                    .map(|k| {
                        let mut column: Vec<f64> = periodograms.iter().map(|p| p[k]).collect();
                        median(&mut column) / bias
                    })
                    .collect()
            }
        };

        let frequencies = (0..n_freqs)
            .map(|k| k as f64 * sample_rate / nperseg as f64)
            .collect();

        debug!(
            "Welch estimate: {} samples, {} segments of {}, {} bins",
            signal.len(),
            n_segments,
            nperseg,
            n_freqs
        );

        Ok(PowerSpectrum { frequencies, power })
    }
}

/// Median of a slice, reordering it in place
pub(crate) fn median(values: &mut [f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        0.5 * (values[mid - 1] + values[mid])
    } else {
        values[mid]
    }
}

/// Ratio between the median and the mean of `n` chi-squared (2 dof) values
fn median_bias(n: usize) -> f64 {
    let half = (n.saturating_sub(1)) / 2;
    1.0 + (1..=half)
        .map(|i| {
            let ii = 2.0 * i as f64;
            1.0 / (ii + 1.0) - 1.0 / ii
        })
        .sum::<f64>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rand_distr::{Distribution, Normal};

    fn create_sine(amplitude: f64, freq: f64, sample_rate: f64, num_samples: usize) -> Vec<f64> {
        (0..num_samples)
            .map(|n| amplitude * (2.0 * PI * freq * n as f64 / sample_rate).sin())
            .collect()
    }

    #[test]
    fn test_hann_window_tapers_edges() {
        let window = WindowFunction::Hann.coefficients(1024);
        assert_eq!(window[0], 0.0);
        assert_relative_eq!(window[512], 1.0, epsilon = 1e-12);
        assert!(window[1023] < 0.001);
    }

    #[test]
    fn test_frequency_axis() {
        let estimator = WelchEstimator::new(200);
        let signal = vec![0.0; 1000];
        let spectrum = estimator.estimate(&signal, 100.0).unwrap();
        assert_eq!(spectrum.len(), 101);
        assert_eq!(spectrum.frequencies[0], 0.0);
        assert_relative_eq!(spectrum.frequencies[1], 0.5, epsilon = 1e-12);
        assert_relative_eq!(spectrum.frequencies[100], 50.0, epsilon = 1e-12);
    }

    #[test]
    fn test_white_noise_density_level() {
        // One-sided density of unit-variance white noise is 2 / fs
        let sample_rate = 500.0;
        let mut rng = StdRng::seed_from_u64(7);
        let normal = Normal::new(0.0, 1.0).unwrap();
        let signal: Vec<f64> = (0..200_000).map(|_| normal.sample(&mut rng)).collect();

        let spectrum = WelchEstimator::new(500).estimate(&signal, sample_rate).unwrap();
        let inner = &spectrum.power[5..245];
        let mean = inner.iter().sum::<f64>() / inner.len() as f64;
        assert_relative_eq!(mean, 2.0 / sample_rate, max_relative = 0.05);
    }

    #[test]
    fn test_sine_power_matches_variance() {
        // Integrated density of a sine equals its variance A²/2
        let sample_rate = 1000.0;
        let signal = create_sine(2.0, 100.0, sample_rate, 20_000);
        let spectrum = WelchEstimator::new(1000).estimate(&signal, sample_rate).unwrap();
        let df = spectrum.resolution();
        let total: f64 = spectrum.power.iter().sum::<f64>() * df;
        assert_relative_eq!(total, 2.0, max_relative = 0.01);
    }

    #[test]
    fn test_median_matches_mean_on_white_noise() {
        let sample_rate = 200.0;
        let mut rng = StdRng::seed_from_u64(11);
        let normal = Normal::new(0.0, 1.0).unwrap();
        let signal: Vec<f64> = (0..100_000).map(|_| normal.sample(&mut rng)).collect();

        let mean_spectrum = WelchEstimator::new(200).estimate(&signal, sample_rate).unwrap();
        let median_spectrum = WelchEstimator::new(200)
            .with_averaging(Averaging::Median)
            .estimate(&signal, sample_rate)
            .unwrap();

        let avg = |p: &[f64]| p[5..95].iter().sum::<f64>() / 90.0;
        assert_relative_eq!(
            avg(&median_spectrum.power),
            avg(&mean_spectrum.power),
            max_relative = 0.05
        );
    }

    #[test]
    fn test_short_signal_shrinks_segment() {
        let signal = vec![1.0, -1.0, 1.0, -1.0];
        let spectrum = WelchEstimator::new(16).estimate(&signal, 4.0).unwrap();
        assert_eq!(spectrum.len(), 3);
    }

    #[test]
    fn test_invalid_inputs() {
        let estimator = WelchEstimator::new(16);
        assert!(matches!(
            estimator.estimate(&[1.0; 32], 0.0),
            Err(AperiodicError::InvalidConfig(_))
        ));
        assert!(matches!(
            estimator.estimate(&[1.0], 10.0),
            Err(AperiodicError::InsufficientData(_))
        ));
        assert!(WelchEstimator::new(16)
            .with_overlap(1.0)
            .estimate(&[1.0; 32], 10.0)
            .is_err());
    }

    #[test]
    fn test_median_bias_values() {
        assert_relative_eq!(median_bias(1), 1.0);
        // 1 + (1/3 - 1/2) for three segments
        assert_relative_eq!(median_bias(3), 1.0 - 1.0 / 6.0, epsilon = 1e-12);
    }
}
