// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-aperiodic project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Error type shared by the numerical core
//!
//! Configuration-level code and the command line tool work with `anyhow`;
//! the library functions return [`AperiodicError`] so callers can tell a bad
//! parameter set apart from a spectrum that simply holds too few bins.

use thiserror::Error;

/// Errors that can occur while simulating or analyzing a signal
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AperiodicError {
    /// A parameter is out of its valid domain; raised before any computation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    /// Not enough samples or frequency bins to produce a meaningful result
    #[error("Insufficient data: {0}")]
    InsufficientData(String),
    /// The FFT backend rejected a buffer
    #[error("Transform failed: {0}")]
    Transform(String),
    /// Filter design returned an unexpected representation
    #[error("Filter design failed: {0}")]
    FilterDesign(String),
}

/// Convenience alias used across the numerical modules
pub type Result<T> = std::result::Result<T, AperiodicError>;

impl From<realfft::FftError> for AperiodicError {
    fn from(err: realfft::FftError) -> Self {
        AperiodicError::Transform(err.to_string())
    }
}

/// Fail with [`AperiodicError::InvalidConfig`] unless `value` is finite and strictly positive
pub(crate) fn ensure_positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(AperiodicError::InvalidConfig(format!(
            "{} must be a positive finite number, got {}",
            name, value
        )))
    }
}

/// Validate a `(low, high)` frequency band
pub(crate) fn ensure_band(band: (f64, f64)) -> Result<()> {
    let (low, high) = band;
    if !low.is_finite() || !high.is_finite() {
        return Err(AperiodicError::InvalidConfig(format!(
            "frequency band ({}, {}) must be finite",
            low, high
        )));
    }
    if low <= 0.0 {
        return Err(AperiodicError::InvalidConfig(format!(
            "lower band border must be positive, got {}",
            low
        )));
    }
    if low >= high {
        return Err(AperiodicError::InvalidConfig(format!(
            "empty frequency band: lower border {} >= upper border {}",
            low, high
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_positive() {
        assert!(ensure_positive("sample_rate", 1000.0).is_ok());
        assert!(ensure_positive("sample_rate", 0.0).is_err());
        assert!(ensure_positive("sample_rate", -5.0).is_err());
        assert!(ensure_positive("sample_rate", f64::NAN).is_err());
    }

    #[test]
    fn test_ensure_band() {
        assert!(ensure_band((1.0, 30.0)).is_ok());
        assert!(matches!(
            ensure_band((30.0, 30.0)),
            Err(AperiodicError::InvalidConfig(_))
        ));
        assert!(ensure_band((40.0, 30.0)).is_err());
        assert!(ensure_band((0.0, 30.0)).is_err());
        assert!(ensure_band((1.0, f64::INFINITY)).is_err());
    }
}
