// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-aperiodic project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Polyphase FIR resampler
//!
//! The signal is conceptually upsampled by zero insertion, low-pass filtered
//! and decimated. Only the products that hit non-zero input samples are
//! evaluated, which is what makes the polyphase form cheap.
//!
//! Filter design: `2 * half_len + 1` taps with `half_len = 10 * max(up, down)`,
//! windowed-sinc with cutoff `1 / max(up, down)` of Nyquist, Kaiser window
//! with beta 5, unit DC gain scaled by `up`. The filter delay is compensated
//! so output sample `m` is aligned with input time `m * down / up`.

use std::f64::consts::PI;

use super::{output_length, reduced_rates, RateChange, Resampler};
use crate::error::Result;

/// Kaiser-windowed polyphase resampler
#[derive(Debug, Clone)]
pub struct PolyphaseResampler {
    /// Half filter length in units of `max(up, down)`
    pub half_len_factor: usize,
    /// Kaiser window shape parameter
    pub beta: f64,
}

impl Default for PolyphaseResampler {
    fn default() -> Self {
        Self {
            half_len_factor: 10,
            beta: 5.0,
        }
    }
}

impl PolyphaseResampler {
    /// Anti-aliasing filter for the given reduced rates
    pub fn design_filter(&self, up: usize, down: usize) -> Vec<f64> {
        let max_rate = up.max(down);
        let half_len = self.half_len_factor * max_rate;
        let num_taps = 2 * half_len + 1;
        let cutoff = 1.0 / max_rate as f64;
        let window = kaiser_window(num_taps, self.beta);

        let mut taps: Vec<f64> = (0..num_taps)
            .map(|i| {
                let m = i as f64 - half_len as f64;
                cutoff * sinc(cutoff * m) * window[i]
            })
            .collect();

        let sum: f64 = taps.iter().sum();
        let gain = up as f64 / sum;
        for tap in &mut taps {
            *tap *= gain;
        }
        taps
    }
}

impl PolyphaseResampler {
    /// Design the filter of one rate change
    ///
    /// The rates are reduced by their gcd first. An identity rate change
    /// carries no taps.
    pub fn design(&self, up: usize, down: usize) -> Result<PolyphaseFilter> {
        let (up, down) = reduced_rates(up, down)?;
        let taps = if up == down {
            Vec::new()
        } else {
            self.design_filter(up, down)
        };
        Ok(PolyphaseFilter { up, down, taps })
    }
}

impl Resampler for PolyphaseResampler {
    fn prepare(&self, up: usize, down: usize) -> Result<Box<dyn RateChange>> {
        Ok(Box::new(self.design(up, down)?))
    }
}

/// Anti-aliasing filter designed for one reduced `up / down` pair
#[derive(Debug, Clone)]
pub struct PolyphaseFilter {
    up: usize,
    down: usize,
    taps: Vec<f64>,
}

impl PolyphaseFilter {
    pub fn rates(&self) -> (usize, usize) {
        (self.up, self.down)
    }

    pub fn taps(&self) -> &[f64] {
        &self.taps
    }
}

impl RateChange for PolyphaseFilter {
    fn apply(&self, signal: &[f64]) -> Result<Vec<f64>> {
        if self.up == self.down {
            return Ok(signal.to_vec());
        }

        let (up, down) = (self.up, self.down);
        let taps = &self.taps;
        let half_len = (taps.len() - 1) / 2;
        let n_in = signal.len() as isize;
        let n_out = output_length(signal.len(), up, down);
        let up_i = up as isize;
        let last_tap = taps.len() as isize - 1;

        let output = (0..n_out)
            .map(|m| {
                // y[m] = sum_i h[i] * x_up[m * down + half_len - i]
                let t = (m * down + half_len) as isize;
                let k_min = (t - last_tap).max(0);
                let k_min = (k_min + up_i - 1) / up_i;
                let k_max = (t / up_i).min(n_in - 1);
                (k_min..=k_max)
                    .map(|k| taps[(t - k * up_i) as usize] * signal[k as usize])
                    .sum()
            })
            .collect();
        Ok(output)
    }
}

fn sinc(x: f64) -> f64 {
    if x == 0.0 {
        1.0
    } else {
        (PI * x).sin() / (PI * x)
    }
}

/// Symmetric Kaiser window of `len` points
pub(crate) fn kaiser_window(len: usize, beta: f64) -> Vec<f64> {
    if len == 1 {
        return vec![1.0];
    }
    let denom = bessel_i0(beta);
    let span = (len - 1) as f64;
    (0..len)
        .map(|n| {
            let r = 2.0 * n as f64 / span - 1.0;
            bessel_i0(beta * (1.0 - r * r).max(0.0).sqrt()) / denom
        })
        .collect()
}

/// Modified Bessel function of the first kind, order zero (power series)
pub(crate) fn bessel_i0(x: f64) -> f64 {
    let half = x / 2.0;
    let mut term = 1.0;
    let mut sum = 1.0;
    let mut k = 1.0;
    loop {
        term *= (half / k) * (half / k);
        sum += term;
        if term < sum * 1e-17 {
            break;
        }
        k += 1.0;
    }
    sum
}
