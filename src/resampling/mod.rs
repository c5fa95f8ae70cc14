// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-aperiodic project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Rational rate-change resampling
//!
//! IRASA stretches and compresses a signal by non-integer factors `h`. Each
//! factor is expressed as a reduced fraction `up / down` and applied with one
//! of the resamplers in this module:
//!
//! - [`PolyphaseResampler`]: Kaiser-windowed FIR polyphase filtering with the
//!   same filter design and alignment as `scipy.signal.resample_poly`
//! - [`FourierResampler`]: spectrum truncation or zero padding with a real FFT

mod fourier;
mod polyphase;

pub use fourier::FourierResampler;
pub use polyphase::{PolyphaseFilter, PolyphaseResampler};

use serde::{Deserialize, Serialize};

use crate::error::{AperiodicError, Result};

/// Decimal places kept when converting a factor to a fraction
const FACTOR_DECIMALS: i32 = 4;

/// A rate change whose filters are designed once and applied many times
pub trait RateChange: Send + Sync {
    /// Resample `signal`, returning `ceil(len * up / down)` samples
    fn apply(&self, signal: &[f64]) -> Result<Vec<f64>>;
}

/// Changes the sample rate of a signal by `up / down`
pub trait Resampler: Send + Sync {
    /// Prepare the rate change `up / down` for repeated use
    fn prepare(&self, up: usize, down: usize) -> Result<Box<dyn RateChange>>;

    /// One-shot resampling, returning `ceil(len * up / down)` samples
    fn resample(&self, signal: &[f64], up: usize, down: usize) -> Result<Vec<f64>> {
        self.prepare(up, down)?.apply(signal)
    }
}

/// Resampler selection for configuration files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResamplerKind {
    Polyphase,
    Fourier,
}

impl ResamplerKind {
    /// Instantiate the selected resampler
    pub fn create(&self) -> Box<dyn Resampler> {
        match self {
            ResamplerKind::Polyphase => Box::new(PolyphaseResampler::default()),
            ResamplerKind::Fourier => Box::new(FourierResampler),
        }
    }
}

/// Convert a resampling factor into a reduced `(up, down)` fraction
///
/// The factor is rounded to four decimals first, so `1.15` becomes `23 / 20`.
pub fn rational_factor(factor: f64) -> Result<(usize, usize)> {
    if !factor.is_finite() || factor <= 0.0 {
        return Err(AperiodicError::InvalidConfig(format!(
            "resampling factor must be positive and finite, got {}",
            factor
        )));
    }
    let denominator = 10u64.pow(FACTOR_DECIMALS as u32);
    let numerator = (factor * denominator as f64).round() as u64;
    if numerator == 0 {
        return Err(AperiodicError::InvalidConfig(format!(
            "resampling factor {} rounds to zero",
            factor
        )));
    }
    let divisor = gcd(numerator, denominator);
    Ok((
        (numerator / divisor) as usize,
        (denominator / divisor) as usize,
    ))
}

/// Number of output samples for `len` inputs resampled by `up / down`
pub fn output_length(len: usize, up: usize, down: usize) -> usize {
    (len * up).div_ceil(down)
}

/// Reject zero rates and reduce `up / down` by their gcd
pub(crate) fn reduced_rates(up: usize, down: usize) -> Result<(usize, usize)> {
    if up == 0 || down == 0 {
        return Err(AperiodicError::InvalidConfig(format!(
            "resampling rates must be positive, got {}/{}",
            up, down
        )));
    }
    let divisor = gcd(up as u64, down as u64) as usize;
    Ok((up / divisor, down / divisor))
}

pub(crate) fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rational_factor() {
        assert_eq!(rational_factor(1.15).unwrap(), (23, 20));
        assert_eq!(rational_factor(1.5).unwrap(), (3, 2));
        assert_eq!(rational_factor(2.0).unwrap(), (2, 1));
        assert_eq!(rational_factor(1.33333).unwrap(), (13333, 10000));
        assert!(rational_factor(0.0).is_err());
        assert!(rational_factor(f64::NAN).is_err());
    }

    #[test]
    fn test_output_length() {
        assert_eq!(output_length(100, 3, 2), 150);
        assert_eq!(output_length(101, 3, 2), 152);
        assert_eq!(output_length(100, 2, 3), 67);
    }

    #[test]
    fn test_reduced_rates() {
        assert_eq!(reduced_rates(46, 40).unwrap(), (23, 20));
        assert_eq!(reduced_rates(3, 3).unwrap(), (1, 1));
        assert!(reduced_rates(0, 2).is_err());
    }

    #[test]
    fn test_prepared_rate_change_matches_one_shot() {
        let signal: Vec<f64> = (0..300).map(|i| (i as f64 * 0.05).sin()).collect();
        for kind in [ResamplerKind::Polyphase, ResamplerKind::Fourier] {
            let resampler = kind.create();
            let prepared = resampler.prepare(23, 20).unwrap();
            let first = prepared.apply(&signal).unwrap();
            let second = prepared.apply(&signal[..200]).unwrap();
            assert_eq!(first, resampler.resample(&signal, 23, 20).unwrap());
            assert_eq!(second.len(), 230);
        }
    }

    #[test]
    fn test_resampler_kind_factory() {
        let signal = vec![1.0; 64];
        for kind in [ResamplerKind::Polyphase, ResamplerKind::Fourier] {
            let out = kind.create().resample(&signal, 3, 2).unwrap();
            assert_eq!(out.len(), 96);
        }
    }
}
