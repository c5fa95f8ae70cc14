// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-aperiodic project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Noise-floor detection
//!
//! Above some frequency a recorded spectrum stops following its power law and
//! flattens into the amplifier or quantization noise floor. The detector
//! slides a window of fixed width (in Hz) over the spectrum, fits the local
//! log-log slope and looks for several consecutive flat window positions.
//!
//! A window starting just below the knee already covers mostly flat bins, so
//! the first flat window starts early. The onset is then moved forward, inside
//! that window, to the first bin whose step to the next bin is flat.

use log::debug;
use serde::Serialize;

use super::fit::linear_regression;
use crate::config::PlateauConfig;
use crate::error::{AperiodicError, Result};

/// Frequency where the spectrum turns flat
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlateauOnset {
    /// Onset frequency in Hz, or the last scanned frequency when not detected
    pub frequency: f64,
    /// `false` when no sustained flat region was found
    pub detected: bool,
}

/// Find the onset of the noise floor in a power spectrum
///
/// Only bins strictly above `start_frequency` are candidates. Windows reaching
/// past the last frequency are cut at the top of the spectrum and need at
/// least two usable bins.
///
/// ### Returns
///
/// The onset, or `PlateauOnset { frequency: <last frequency>, detected: false }`
/// when the spectrum never flattens.
///
/// ### Errors
///
/// - [`AperiodicError::InvalidConfig`] for mismatched slices or invalid
///   detector settings
/// - [`AperiodicError::InsufficientData`] for an empty spectrum
pub fn detect_plateau_onset(
    frequencies: &[f64],
    power: &[f64],
    start_frequency: f64,
    config: &PlateauConfig,
) -> Result<PlateauOnset> {
    if frequencies.len() != power.len() {
        return Err(AperiodicError::InvalidConfig(format!(
            "frequency and power lengths differ ({} vs {})",
            frequencies.len(),
            power.len()
        )));
    }
    config.validate()?;
    let last = *frequencies.last().ok_or_else(|| {
        AperiodicError::InsufficientData("cannot detect a plateau in an empty spectrum".into())
    })?;

    // Log-log coordinates, NaN for bins that cannot be placed on log axes
    let log_f: Vec<f64> = frequencies
        .iter()
        .map(|f| if *f > 0.0 { f.log10() } else { f64::NAN })
        .collect();
    let log_p: Vec<f64> = power
        .iter()
        .map(|p| if *p > 0.0 { p.log10() } else { f64::NAN })
        .collect();

    let mut run = 0usize;
    let mut run_start = 0usize;

    for start in 0..frequencies.len() {
        if frequencies[start] <= start_frequency {
            continue;
        }
        let window_end = (frequencies[start] + config.window_hz).min(last);

        let (x, y): (Vec<f64>, Vec<f64>) = (start..frequencies.len())
            .take_while(|&i| frequencies[i] <= window_end)
            .filter(|&i| log_f[i].is_finite() && log_p[i].is_finite())
            .map(|i| (log_f[i], log_p[i]))
            .unzip();

        let flat = x.len() >= 2
            && linear_regression(&x, &y)
                .map(|(slope, _)| slope.abs() <= config.tolerance)
                .unwrap_or(false);

        if flat {
            if run == 0 {
                run_start = start;
            }
            run += 1;
            if run >= config.sustain_bins {
                let onset = refine_onset(frequencies, &log_f, &log_p, run_start, config);
                debug!(
                    "Plateau onset at {:.3} Hz after {} flat windows from {:.3} Hz",
                    frequencies[onset], run, frequencies[run_start]
                );
                return Ok(PlateauOnset {
                    frequency: frequencies[onset],
                    detected: true,
                });
            }
        } else {
            run = 0;
        }
    }

    debug!("No plateau above {} Hz", start_frequency);
    Ok(PlateauOnset {
        frequency: last,
        detected: false,
    })
}

/// First bin of the window at `run_start` whose step to the next bin is flat
fn refine_onset(
    frequencies: &[f64],
    log_f: &[f64],
    log_p: &[f64],
    run_start: usize,
    config: &PlateauConfig,
) -> usize {
    let window_end = frequencies[run_start] + config.window_hz;
    (run_start..frequencies.len().saturating_sub(1))
        .take_while(|&i| frequencies[i] <= window_end)
        .find(|&i| {
            let step = (log_p[i + 1] - log_p[i]) / (log_f[i + 1] - log_f[i]);
            step.is_finite() && step.abs() <= config.tolerance
        })
        .unwrap_or(run_start)
}
