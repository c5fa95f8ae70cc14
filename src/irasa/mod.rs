// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-aperiodic project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! # Irregular-resampling auto-spectral analysis (IRASA)
//!
//! IRASA separates the aperiodic (fractal, power-law) part of a power
//! spectrum from its oscillatory peaks. Resampling a signal by a
//! non-integer factor `h` shifts every oscillation to another frequency while
//! a power law keeps its shape up to a scale factor. For each `h`:
//!
//! 1. the signal is resampled up by `h` and down by `1/h`
//! 2. Welch spectra of both are computed with the original segment length,
//!    at sample rates `h * fs` and `fs / h`
//! 3. their geometric mean is taken bin by bin
//!
//! The scale factors of the two spectra cancel in the geometric mean, while
//! the displaced peaks are averaged away when the per-factor spectra are
//! reduced. The aperiodic estimate is then fitted with a power law inside a
//! band. Because the up- and down-sampled spectra are read at `f * h` and
//! `f / h`, the fit depends on spectral values in the whole *effective
//! range* `[band_low / h_max, band_high * h_max]`.
//!
//! ## Example
//!
//! ```no_run
//! use rust_aperiodic::config::IrasaConfig;
//! use rust_aperiodic::irasa::Irasa;
//! use rust_aperiodic::simulation::{ColoredNoiseGenerator, SpectralParameters};
//!
//! let params = SpectralParameters::default().with_exponent(1.5);
//! let signals = ColoredNoiseGenerator::new(1).generate(&params).unwrap();
//!
//! let irasa = Irasa::new(IrasaConfig::default().with_band(2.0, 30.0)).unwrap();
//! let result = irasa.separate_series(&signals.aperiodic).unwrap();
//! println!("exponent: {:.2}", result.fits[0].exponent());
//! ```

pub mod sweep;

pub use sweep::FitErrorSweep;

use log::{debug, warn};
use ndarray::{Array2, ArrayView2};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::IrasaConfig;
use crate::error::{ensure_band, ensure_positive, AperiodicError, Result};
use crate::resampling::{output_length, rational_factor, RateChange};
use crate::spectral::welch::median;
use crate::spectral::{band_indices, fit_power_law, WelchEstimator};
use crate::utility::TimeSeries;

/// Reduction of the per-factor aperiodic spectra
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    /// Arithmetic mean over factors
    Mean,
    /// Median over factors
    Median,
}

/// Power-law fit of one channel's aperiodic spectrum
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChannelFit {
    /// log10 power at 1 Hz
    #[serde(rename = "Intercept")]
    pub intercept: f64,
    /// Signed log-log slope
    #[serde(rename = "Slope")]
    pub slope: f64,
    /// Coefficient of determination of the fit
    #[serde(rename = "R^2")]
    pub r_squared: f64,
    /// Sample standard deviation of the oscillatory spectrum in the band
    #[serde(rename = "std(osc)")]
    pub oscillatory_std: f64,
}

impl ChannelFit {
    /// Aperiodic exponent, `-slope`
    pub fn exponent(&self) -> f64 {
        -self.slope
    }
}

/// Frequency span whose spectral values influence the fit
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EffectiveRange {
    pub low: f64,
    pub high: f64,
}

impl EffectiveRange {
    /// `[band_low / h_max, band_high * h_max]`
    pub fn new(band: (f64, f64), max_factor: f64) -> Self {
        Self {
            low: band.0 / max_factor,
            high: band.1 * max_factor,
        }
    }

    pub fn contains(&self, frequency: f64) -> bool {
        frequency >= self.low && frequency <= self.high
    }
}

/// Output of [`Irasa::separate`]
#[derive(Debug, Clone)]
pub struct IrasaResult {
    /// Frequencies of the fitting band
    pub frequencies: Vec<f64>,
    /// Aperiodic spectra in the band, one row per channel
    pub aperiodic: Array2<f64>,
    /// Original minus aperiodic spectra in the band, one row per channel
    pub oscillatory: Array2<f64>,
    /// Fit of every channel
    pub fits: Vec<ChannelFit>,
    /// Effective frequency range of the fit
    pub effective_range: EffectiveRange,
}

/// A resampling factor with its rational representation and prepared filters
struct Factor {
    value: f64,
    up: usize,
    down: usize,
    upsample: Box<dyn RateChange>,
    downsample: Box<dyn RateChange>,
}

/// Aperiodic/oscillatory separator
///
/// Resampling filters are designed once here and reused for every channel,
/// every call and every step of a [`FitErrorSweep`].
pub struct Irasa {
    config: IrasaConfig,
    factors: Vec<Factor>,
}

impl Irasa {
    /// Validate the configuration and prepare the resampling factors
    pub fn new(config: IrasaConfig) -> Result<Self> {
        config.validate()?;
        let resampler = config.resampler.create();
        let factors = config
            .factors
            .iter()
            .map(|&h| {
                let (up, down) = rational_factor(h)?;
                Ok(Factor {
                    value: up as f64 / down as f64,
                    up,
                    down,
                    upsample: resampler.prepare(up, down)?,
                    downsample: resampler.prepare(down, up)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        debug!(
            "IRASA with {} factors: {:?}",
            factors.len(),
            factors.iter().map(|f| (f.up, f.down)).collect::<Vec<_>>()
        );
        Ok(Self { config, factors })
    }

    pub fn config(&self) -> &IrasaConfig {
        &self.config
    }

    /// Effective range of a fit over `band`
    pub fn effective_range(&self, band: (f64, f64)) -> EffectiveRange {
        let max_factor = self.factors.iter().map(|f| f.value).fold(1.0, f64::max);
        EffectiveRange::new(band, max_factor)
    }

    /// Separate every row of `data` and fit over the configured band
    pub fn separate(&self, data: ArrayView2<f64>, sample_rate: f64) -> Result<IrasaResult> {
        self.separate_in_band(data, sample_rate, self.config.band)
    }

    /// Single-channel convenience over the configured band
    pub fn separate_series(&self, series: &TimeSeries) -> Result<IrasaResult> {
        self.separate(series.as_channel_view()?, series.sample_rate())
    }

    /// Single-channel separation with an explicit fitting band
    pub fn separate_series_in_band(
        &self,
        series: &TimeSeries,
        band: (f64, f64),
    ) -> Result<IrasaResult> {
        self.separate_in_band(series.as_channel_view()?, series.sample_rate(), band)
    }

    /// Separate every row of `data` and fit over `band`
    ///
    /// ### Errors
    ///
    /// - [`AperiodicError::InvalidConfig`] for an empty input, a non-positive
    ///   sample rate or an invalid band
    /// - [`AperiodicError::InsufficientData`] when the signal is shorter than
    ///   one Welch segment after downsampling by the largest factor, or the
    ///   band holds fewer than two bins
    pub fn separate_in_band(
        &self,
        data: ArrayView2<f64>,
        sample_rate: f64,
        band: (f64, f64),
    ) -> Result<IrasaResult> {
        ensure_positive("sample_rate", sample_rate)?;
        ensure_band(band)?;
        let (n_channels, n_samples) = data.dim();
        if n_channels == 0 || n_samples == 0 {
            return Err(AperiodicError::InvalidConfig(
                "IRASA needs at least one non-empty channel".to_string(),
            ));
        }

        let segment_length = (self.config.window_seconds * sample_rate).round() as usize;
        if segment_length < 2 {
            return Err(AperiodicError::InvalidConfig(format!(
                "window of {} s at {} Hz is shorter than two samples",
                self.config.window_seconds, sample_rate
            )));
        }
        let shortest = self
            .factors
            .iter()
            .map(|f| output_length(n_samples, f.down, f.up))
            .min()
            .unwrap_or(n_samples);
        if shortest < segment_length {
            return Err(AperiodicError::InsufficientData(format!(
                "{} samples shrink to {} after downsampling, below the {} sample window",
                n_samples, shortest, segment_length
            )));
        }

        let effective_range = self.effective_range(band);
        let nyquist = sample_rate / 2.0;
        if effective_range.high > nyquist {
            warn!(
                "Effective range upper border {:.2} Hz exceeds the Nyquist frequency {:.2} Hz",
                effective_range.high, nyquist
            );
        }

        let welch = WelchEstimator::from_config(segment_length, &self.config.welch);

        let mut frequencies = Vec::new();
        let mut aperiodic_rows = Vec::with_capacity(n_channels);
        let mut oscillatory_rows = Vec::with_capacity(n_channels);
        let mut fits = Vec::with_capacity(n_channels);

        for (channel, row) in data.outer_iter().enumerate() {
            let signal = row.to_vec();
            let (freqs, original, aperiodic) = self.channel_spectra(&signal, sample_rate, &welch)?;

            let indices = band_indices(&freqs, band.0, band.1);
            let band_freqs: Vec<f64> = indices.iter().map(|&i| freqs[i]).collect();
            let band_aperiodic: Vec<f64> = indices.iter().map(|&i| aperiodic[i]).collect();
            let band_oscillatory: Vec<f64> = indices
                .iter()
                .map(|&i| original[i] - aperiodic[i])
                .collect();

            let fit = fit_power_law(&band_freqs, &band_aperiodic)?;
            let channel_fit = ChannelFit {
                intercept: fit.offset,
                slope: fit.slope,
                r_squared: fit.r_squared,
                oscillatory_std: sample_std(&band_oscillatory),
            };
            debug!(
                "Channel {}: exponent {:.3}, R^2 {:.4}",
                channel,
                channel_fit.exponent(),
                channel_fit.r_squared
            );

            frequencies = band_freqs;
            aperiodic_rows.extend(band_aperiodic);
            oscillatory_rows.extend(band_oscillatory);
            fits.push(channel_fit);
        }

        let shape = (n_channels, frequencies.len());
        let aperiodic = Array2::from_shape_vec(shape, aperiodic_rows)
            .map_err(|e| AperiodicError::InvalidConfig(format!("spectrum shape: {}", e)))?;
        let oscillatory = Array2::from_shape_vec(shape, oscillatory_rows)
            .map_err(|e| AperiodicError::InvalidConfig(format!("spectrum shape: {}", e)))?;

        Ok(IrasaResult {
            frequencies,
            aperiodic,
            oscillatory,
            fits,
            effective_range,
        })
    }

    /// Full-range frequencies, original spectrum and aperiodic estimate of one channel
    fn channel_spectra(
        &self,
        signal: &[f64],
        sample_rate: f64,
        welch: &WelchEstimator,
    ) -> Result<(Vec<f64>, Vec<f64>, Vec<f64>)> {
        let original = welch.estimate(signal, sample_rate)?;
        let n_bins = original.len();

        let per_factor: Vec<Vec<f64>> = self
            .factors
            .par_iter()
            .map(|factor| {
                let upsampled = factor.upsample.apply(signal)?;
                let downsampled = factor.downsample.apply(signal)?;
                let p_up = welch.estimate(&upsampled, sample_rate * factor.value)?;
                let p_down = welch.estimate(&downsampled, sample_rate / factor.value)?;
                if p_up.len() != n_bins || p_down.len() != n_bins {
                    return Err(AperiodicError::InsufficientData(format!(
                        "resampled spectra for h = {} do not match the original grid",
                        factor.value
                    )));
                }
                Ok(p_up
                    .power
                    .iter()
                    .zip(&p_down.power)
                    .map(|(u, d)| (u * d).sqrt())
                    .collect())
            })
            .collect::<Result<Vec<_>>>()?;

        let aperiodic = match self.config.aggregation {
            Aggregation::Mean => (0..n_bins)
                .map(|k| per_factor.iter().map(|p| p[k]).sum::<f64>() / per_factor.len() as f64)
                .collect(),
            Aggregation::Median => (0..n_bins)
                .map(|k| {
                    let mut column: Vec<f64> = per_factor.iter().map(|p| p[k]).collect();
                    median(&mut column)
                })
                .collect(),
        };

        Ok((original.frequencies, original.power, aperiodic))
    }
}

/// Standard deviation with `1/(n-1)` normalization, NaN below two values
fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_effective_range() {
        let range = EffectiveRange::new((2.0, 30.0), 2.0);
        assert_eq!(range.low, 1.0);
        assert_eq!(range.high, 60.0);
        assert!(range.contains(45.0));
        assert!(!range.contains(61.0));
    }

    #[test]
    fn test_effective_range_uses_rationalized_factors() {
        let irasa = Irasa::new(IrasaConfig::default()).unwrap();
        let range = irasa.effective_range((1.0, 30.0));
        assert_relative_eq!(range.high, 57.0, epsilon = 1e-9);
    }

    #[test]
    fn test_sample_std() {
        assert_relative_eq!(sample_std(&[1.0, 2.0, 3.0, 4.0]), 1.2909944487358056);
        assert!(sample_std(&[1.0]).is_nan());
    }

    #[test]
    fn test_channel_fit_serializes_with_named_fields() {
        let fit = ChannelFit {
            intercept: 1.0,
            slope: -2.0,
            r_squared: 0.99,
            oscillatory_std: 0.1,
        };
        let json = serde_json::to_value(fit).unwrap();
        assert_eq!(json["Intercept"], 1.0);
        assert_eq!(json["Slope"], -2.0);
        assert_eq!(json["R^2"], 0.99);
        assert_eq!(json["std(osc)"], 0.1);
        assert_eq!(fit.exponent(), 2.0);
    }

    #[test]
    fn test_input_validation() {
        let irasa = Irasa::new(IrasaConfig::default()).unwrap();
        let empty = Array2::<f64>::zeros((0, 100));
        assert!(matches!(
            irasa.separate(empty.view(), 100.0),
            Err(AperiodicError::InvalidConfig(_))
        ));

        // 4 s window at 100 Hz needs 400 samples after downsampling by 1.9
        let short = Array2::<f64>::zeros((1, 500));
        assert!(matches!(
            irasa.separate(short.view(), 100.0),
            Err(AperiodicError::InsufficientData(_))
        ));

        let data = Array2::<f64>::zeros((1, 2000));
        assert!(irasa
            .separate_in_band(data.view(), 100.0, (0.0, 30.0))
            .is_err());
    }

    #[test]
    fn test_invalid_factor_is_rejected_at_construction() {
        let mut config = IrasaConfig::default();
        config.factors = vec![1.5, 0.8];
        assert!(matches!(
            Irasa::new(config),
            Err(AperiodicError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_factor_rounding_to_one_is_rejected() {
        let mut config = IrasaConfig::default();
        config.factors = vec![1.00001];
        assert!(matches!(
            Irasa::new(config),
            Err(AperiodicError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_factors_equal_after_rounding_are_rejected() {
        let mut config = IrasaConfig::default();
        config.factors = vec![1.5, 1.50001];
        assert!(matches!(
            Irasa::new(config),
            Err(AperiodicError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_prepared_filters_are_reused_across_calls() {
        let config = IrasaConfig::default().with_linear_factors(1.1, 1.5, 3);
        let irasa = Irasa::new(config).unwrap();
        assert_eq!(irasa.factors.len(), 3);

        let data = Array2::from_shape_fn((1, 2000), |(_, i)| {
            (i as f64 * 0.37).sin() + 1e-3 * i as f64
        });
        let first = irasa
            .separate_in_band(data.view(), 100.0, (2.0, 20.0))
            .unwrap();
        let second = irasa
            .separate_in_band(data.view(), 100.0, (2.0, 20.0))
            .unwrap();
        assert_eq!(first.aperiodic, second.aperiodic);
    }
}
