// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-aperiodic project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! FFT resampler
//!
//! Works like `scipy.signal.resample` on real input: the spectrum is truncated
//! (downsampling) or zero padded (upsampling) and transformed back. The signal
//! is treated as periodic, so edges may ring.

use num_complex::Complex;
use realfft::RealFftPlanner;

use super::{output_length, reduced_rates, RateChange, Resampler};
use crate::error::Result;

/// Frequency-domain resampler
#[derive(Debug, Clone, Copy, Default)]
pub struct FourierResampler;

impl Resampler for FourierResampler {
    fn prepare(&self, up: usize, down: usize) -> Result<Box<dyn RateChange>> {
        let (up, down) = reduced_rates(up, down)?;
        Ok(Box::new(FourierRateChange { up, down }))
    }
}

/// Reduced rates of one FFT rate change
///
/// FFT plans depend on the signal length, so they are built per call.
#[derive(Debug, Clone, Copy)]
struct FourierRateChange {
    up: usize,
    down: usize,
}

impl RateChange for FourierRateChange {
    fn apply(&self, signal: &[f64]) -> Result<Vec<f64>> {
        let (up, down) = (self.up, self.down);
        if up == down || signal.is_empty() {
            return Ok(signal.to_vec());
        }

        let n_in = signal.len();
        let n_out = output_length(n_in, up, down);

        let mut planner = RealFftPlanner::<f64>::new();
        let r2c = planner.plan_fft_forward(n_in);
        let c2r = planner.plan_fft_inverse(n_out);

        let mut input = signal.to_vec();
        let mut spectrum = r2c.make_output_vec();
        r2c.process(&mut input, &mut spectrum)?;

        let mut resized = c2r.make_input_vec();
        let shared = n_in.min(n_out);
        let kept = shared / 2 + 1;
        resized[..kept].copy_from_slice(&spectrum[..kept]);

        // The last shared bin changes role between a paired bin and the Nyquist bin
        if shared % 2 == 0 {
            let edge = shared / 2;
            if n_out < n_in {
                resized[edge] *= 2.0;
            } else if n_out > n_in {
                resized[edge] *= 0.5;
            }
        }
        resized[0].im = 0.0;
        if n_out % 2 == 0 {
            let nyquist = resized.len() - 1;
            resized[nyquist] = Complex::new(resized[nyquist].re, 0.0);
        }

        let mut output = c2r.make_output_vec();
        c2r.process(&mut resized, &mut output)?;

        let scale = 1.0 / n_in as f64;
        for value in &mut output {
            *value *= scale;
        }
        Ok(output)
    }
}
