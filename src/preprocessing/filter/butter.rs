// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-aperiodic project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Butterworth high-pass filter using SciPy-style SOS (Second-Order Sections)
//!
//! 1. Design the filter using `iirfilter_dyn` with `FilterOutputType::Sos`
//! 2. Apply it section by section in transposed Direct Form II (causal), or
//!    with `sosfiltfilt_dyn` (zero-phase)

use log::debug;
use sci_rs::signal::filter::design::{
    iirfilter_dyn, DigitalFilter, FilterBandType, FilterOutputType, FilterType, Sos,
};
use sci_rs::signal::filter::sosfiltfilt_dyn;

use super::{Filter, FilterMode};
use crate::error::{ensure_positive, AperiodicError, Result};

/// Butterworth high-pass filter
///
/// # Parameters
/// - `cutoff`: -3 dB frequency in Hz
/// - `sample_rate`: Sample rate in Hz
/// - `order`: Filter order (higher = steeper roll-off)
/// - `mode`: causal or zero-phase application
#[derive(Debug, Clone)]
pub struct ButterHighpassFilter {
    cutoff: f64,
    sample_rate: f64,
    order: usize,
    mode: FilterMode,
    sos: Vec<Sos<f64>>,
}

impl ButterHighpassFilter {
    /// Design a new Butterworth high-pass filter
    ///
    /// ### Errors
    ///
    /// [`AperiodicError::InvalidConfig`] when the order is zero or the cutoff
    /// does not lie strictly between 0 and the Nyquist frequency.
    pub fn new(cutoff: f64, sample_rate: f64, order: usize, mode: FilterMode) -> Result<Self> {
        ensure_positive("sample_rate", sample_rate)?;
        ensure_positive("cutoff", cutoff)?;
        if order == 0 {
            return Err(AperiodicError::InvalidConfig(
                "high-pass order must be at least 1".to_string(),
            ));
        }
        let nyquist = sample_rate / 2.0;
        if cutoff >= nyquist {
            return Err(AperiodicError::InvalidConfig(format!(
                "high-pass cutoff {} Hz must be below Nyquist ({} Hz)",
                cutoff, nyquist
            )));
        }

        // SciPy normalizes critical frequencies to Nyquist
        let result = iirfilter_dyn(
            order,                          // filter order
            vec![cutoff / nyquist],         // critical frequency (normalized)
            None,                           // rp (not used for Butterworth)
            None,                           // rs (not used for Butterworth)
            Some(FilterBandType::Highpass), // filter type
            Some(FilterType::Butterworth),  // analog prototype
            Some(false),                    // digital filter
            Some(FilterOutputType::Sos),    // output as SOS
            None,                           // fs (already normalized)
        );

        let sos = match result {
            DigitalFilter::Sos(sos_filter) => sos_filter.sos,
            _ => {
                return Err(AperiodicError::FilterDesign(
                    "expected SOS output from iirfilter_dyn".to_string(),
                ))
            }
        };

        debug!(
            "Designed order {} Butterworth high-pass at {} Hz ({} sections)",
            order,
            cutoff,
            sos.len()
        );

        Ok(Self {
            cutoff,
            sample_rate,
            order,
            mode,
            sos,
        })
    }

    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    /// Minimum signal length accepted by the forward-backward pass
    fn padding_length(&self) -> usize {
        3 * (2 * self.sos.len() + 1)
    }

    /// Cascade of biquads in transposed Direct Form II, zero initial state
    fn apply_causal(&self, input: &[f64]) -> Vec<f64> {
        let mut output = input.to_vec();
        for section in &self.sos {
            let a0 = section.a[0];
            let b = [section.b[0] / a0, section.b[1] / a0, section.b[2] / a0];
            let a = [section.a[1] / a0, section.a[2] / a0];
            let mut z1 = 0.0;
            let mut z2 = 0.0;
            for sample in output.iter_mut() {
                let x = *sample;
                let y = b[0] * x + z1;
                z1 = b[1] * x - a[0] * y + z2;
                z2 = b[2] * x - a[1] * y;
                *sample = y;
            }
        }
        output
    }
}

impl Filter for ButterHighpassFilter {
    fn apply(&self, signal: &[f64]) -> Result<Vec<f64>> {
        match self.mode {
            FilterMode::Causal => Ok(self.apply_causal(signal)),
            FilterMode::ZeroPhase => {
                if signal.len() <= self.padding_length() {
                    return Err(AperiodicError::InsufficientData(format!(
                        "zero-phase filtering needs more than {} samples, got {}",
                        self.padding_length(),
                        signal.len()
                    )));
                }
                Ok(sosfiltfilt_dyn(signal.iter(), &self.sos))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    const FS: f64 = 500.0;

    fn offset_tone(seconds: f64) -> Vec<f64> {
        let n = (seconds * FS) as usize;
        (0..n)
            .map(|i| 5.0 + (2.0 * PI * 50.0 * i as f64 / FS).sin())
            .collect()
    }

    fn mean(values: &[f64]) -> f64 {
        values.iter().sum::<f64>() / values.len() as f64
    }

    fn rms(values: &[f64]) -> f64 {
        (values.iter().map(|v| v * v).sum::<f64>() / values.len() as f64).sqrt()
    }

    #[test]
    fn test_causal_removes_offset_and_keeps_tone() {
        let filter = ButterHighpassFilter::new(1.0, FS, 4, FilterMode::Causal).unwrap();
        let signal = offset_tone(20.0);
        let output = filter.apply(&signal).unwrap();
        assert_eq!(output.len(), signal.len());

        let tail = &output[(15.0 * FS) as usize..];
        assert!(mean(tail).abs() < 0.01, "offset left: {}", mean(tail));
        assert!((rms(tail) - 1.0 / 2f64.sqrt()).abs() < 0.02);
    }

    #[test]
    fn test_zero_phase_keeps_tone_in_place() {
        let filter = ButterHighpassFilter::new(1.0, FS, 4, FilterMode::ZeroPhase).unwrap();
        let signal = offset_tone(20.0);
        let output = filter.apply(&signal).unwrap();

        let start = (5.0 * FS) as usize;
        let end = (15.0 * FS) as usize;
        for i in start..end {
            let expected = signal[i] - 5.0;
            assert!((output[i] - expected).abs() < 0.01, "sample {} off", i);
        }
    }

    #[test]
    fn test_invalid_design() {
        assert!(ButterHighpassFilter::new(1.0, FS, 0, FilterMode::Causal).is_err());
        assert!(ButterHighpassFilter::new(300.0, FS, 4, FilterMode::Causal).is_err());
        assert!(ButterHighpassFilter::new(1.0, -FS, 4, FilterMode::Causal).is_err());
    }

    #[test]
    fn test_zero_phase_rejects_short_signal() {
        let filter = ButterHighpassFilter::new(1.0, FS, 4, FilterMode::ZeroPhase).unwrap();
        assert!(matches!(
            filter.apply(&[1.0; 8]),
            Err(AperiodicError::InsufficientData(_))
        ));
    }
}
