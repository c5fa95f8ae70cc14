// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-aperiodic project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Power-law fitting
//!
//! A power law `P(f) = 10^offset * f^slope` is a straight line in log-log
//! coordinates. The fit is an ordinary least squares regression of
//! `log10(P)` on `log10(f)`; the aperiodic exponent is the negated slope.

use log::debug;
use serde::Serialize;

use crate::error::{AperiodicError, Result};

/// Result of a log-log line fit
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PowerLawFit {
    /// Intercept of the regression line (log10 power at 1 Hz)
    pub offset: f64,
    /// Signed regression slope, negative for decaying spectra
    pub slope: f64,
    /// Coefficient of determination
    pub r_squared: f64,
}

impl PowerLawFit {
    /// Aperiodic exponent, `-slope`
    pub fn exponent(&self) -> f64 {
        -self.slope
    }

    /// Power predicted by the fitted law at each frequency
    pub fn evaluate(&self, frequencies: &[f64]) -> Vec<f64> {
        let scale = 10f64.powf(self.offset);
        frequencies
            .iter()
            .map(|f| scale * f.powf(self.slope))
            .collect()
    }
}

/// Fit a power law to `(frequencies, power)` pairs
///
/// Bins with a non-positive or non-finite frequency or power cannot be placed
/// on a logarithmic axis and are left out of the regression.
///
/// ### Errors
///
/// - [`AperiodicError::InvalidConfig`] if the two slices differ in length
/// - [`AperiodicError::InsufficientData`] if fewer than two usable bins remain
///   or all usable bins share the same frequency
pub fn fit_power_law(frequencies: &[f64], power: &[f64]) -> Result<PowerLawFit> {
    if frequencies.len() != power.len() {
        return Err(AperiodicError::InvalidConfig(format!(
            "frequency and power lengths differ ({} vs {})",
            frequencies.len(),
            power.len()
        )));
    }

    let (x, y): (Vec<f64>, Vec<f64>) = frequencies
        .iter()
        .zip(power)
        .filter(|(f, p)| f.is_finite() && p.is_finite() && **f > 0.0 && **p > 0.0)
        .map(|(f, p)| (f.log10(), p.log10()))
        .unzip();

    if x.len() < frequencies.len() {
        debug!(
            "Power-law fit skipped {} non-positive bins",
            frequencies.len() - x.len()
        );
    }
    if x.len() < 2 {
        return Err(AperiodicError::InsufficientData(format!(
            "power-law fit needs at least 2 positive bins, got {}",
            x.len()
        )));
    }

    let (slope, offset) = linear_regression(&x, &y).ok_or_else(|| {
        AperiodicError::InsufficientData("all fitted bins share one frequency".to_string())
    })?;

    let y_mean = y.iter().sum::<f64>() / y.len() as f64;
    let ss_tot: f64 = y.iter().map(|v| (v - y_mean).powi(2)).sum();
    let ss_res: f64 = x
        .iter()
        .zip(&y)
        .map(|(xi, yi)| (yi - (offset + slope * xi)).powi(2))
        .sum();
    let r_squared = if ss_tot > 0.0 { 1.0 - ss_res / ss_tot } else { 1.0 };

    Ok(PowerLawFit {
        offset,
        slope,
        r_squared,
    })
}

/// Least squares line through `(x, y)`, returns `(slope, intercept)`
///
/// `None` when `x` has no spread.
pub(crate) fn linear_regression(x: &[f64], y: &[f64]) -> Option<(f64, f64)> {
    let n = x.len() as f64;
    let x_mean = x.iter().sum::<f64>() / n;
    let y_mean = y.iter().sum::<f64>() / n;
    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (xi, yi) in x.iter().zip(y) {
        sxx += (xi - x_mean) * (xi - x_mean);
        sxy += (xi - x_mean) * (yi - y_mean);
    }
    if sxx <= 0.0 {
        return None;
    }
    let slope = sxy / sxx;
    Some((slope, y_mean - slope * x_mean))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_exact_power_law() {
        let freqs: Vec<f64> = (1..=100).map(|f| f as f64).collect();
        let power: Vec<f64> = freqs.iter().map(|f| 3.0 * f.powf(-1.7)).collect();
        let fit = fit_power_law(&freqs, &power).unwrap();
        assert_relative_eq!(fit.exponent(), 1.7, epsilon = 1e-10);
        assert_relative_eq!(fit.offset, 3.0f64.log10(), epsilon = 1e-10);
        assert_relative_eq!(fit.r_squared, 1.0, epsilon = 1e-12);

        let model = fit.evaluate(&[10.0]);
        assert_relative_eq!(model[0], 3.0 * 10f64.powf(-1.7), max_relative = 1e-9);
    }

    #[test]
    fn test_skips_non_positive_bins() {
        let freqs = vec![0.0, 1.0, 2.0, 4.0];
        let power = vec![1.0, 1.0, 0.25, 0.0625];
        let fit = fit_power_law(&freqs, &power).unwrap();
        assert_relative_eq!(fit.slope, -2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_insufficient_bins() {
        assert!(matches!(
            fit_power_law(&[10.0], &[1.0]),
            Err(AperiodicError::InsufficientData(_))
        ));
        assert!(matches!(
            fit_power_law(&[0.0, 10.0], &[1.0, 1.0]),
            Err(AperiodicError::InsufficientData(_))
        ));
        assert!(matches!(
            fit_power_law(&[5.0, 5.0], &[1.0, 2.0]),
            Err(AperiodicError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_length_mismatch() {
        assert!(matches!(
            fit_power_law(&[1.0, 2.0], &[1.0]),
            Err(AperiodicError::InvalidConfig(_))
        ));
    }
}
