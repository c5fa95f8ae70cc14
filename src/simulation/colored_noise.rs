// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-aperiodic project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Colored noise synthesis in the frequency domain
//!
//! The amplitude spectrum is built bin by bin on the one-sided frequency axis
//! of the requested signal length, given uniformly random phases and brought
//! back to the time domain with an inverse real FFT.

use std::f64::consts::{PI, TAU};

use log::{debug, warn};
use num_complex::Complex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use realfft::RealFftPlanner;

use super::{SimulatedSignals, SpectralParameters};
use crate::error::{AperiodicError, Result};
use crate::preprocessing::{ButterHighpassFilter, Filter};
use crate::utility::TimeSeries;

/// Unit phasors shared by the aperiodic and oscillatory spectra
///
/// Index `k` holds the phasor of frequency bin `k`. The DC bin is always
/// `0`, and for an even signal length the Nyquist bin is real.
#[derive(Debug, Clone, PartialEq)]
pub struct RandomPhases {
    phasors: Vec<Complex<f64>>,
}

impl RandomPhases {
    /// Draw one phase in `[0, 2π)` per non-DC bin of an `n`-sample signal
    pub fn draw<R: Rng + ?Sized>(rng: &mut R, n_samples: usize) -> Self {
        let n_bins = n_samples / 2 + 1;
        let mut phasors = Vec::with_capacity(n_bins);
        phasors.push(Complex::new(0.0, 0.0));
        for _ in 1..n_bins {
            let phase: f64 = rng.random_range(0.0..TAU);
            phasors.push(Complex::from_polar(1.0, phase));
        }
        if n_samples % 2 == 0 && n_bins > 1 {
            let nyquist = &mut phasors[n_bins - 1];
            *nyquist = Complex::new(nyquist.re, 0.0);
        }
        Self { phasors }
    }

    pub fn len(&self) -> usize {
        self.phasors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phasors.is_empty()
    }

    pub fn as_slice(&self) -> &[Complex<f64>] {
        &self.phasors
    }
}

/// Generator of power-law signals with optional oscillatory peaks
///
/// The generator owns its random state. Two generators created with the same
/// seed produce identical outputs; successive calls on one generator continue
/// its random stream and therefore differ.
pub struct ColoredNoiseGenerator {
    rng: StdRng,
}

impl ColoredNoiseGenerator {
    /// Create a generator from a fixed seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create a generator seeded from operating system entropy
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Seeded generator when a seed is given, entropy-seeded otherwise
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::new(seed),
            None => Self::from_entropy(),
        }
    }

    /// Simulate the aperiodic signal and its oscillatory variant
    ///
    /// ### Processing order
    ///
    /// 1. Random phases, one per frequency bin
    /// 2. Aperiodic amplitudes `1 / f^(exponent / 2)`, peaks added on a copy
    /// 3. Inverse real FFT of both spectra
    /// 4. Normalization of both series by the aperiodic standard deviation
    /// 5. The same white-noise sequence added to both series
    /// 6. High-pass filtering of both series
    ///
    /// ### Errors
    ///
    /// - [`AperiodicError::InvalidConfig`] when [`SpectralParameters::validate`] fails
    /// - [`AperiodicError::InsufficientData`] when fewer than two samples result
    pub fn generate(&mut self, params: &SpectralParameters) -> Result<SimulatedSignals> {
        params.validate()?;
        let n = params.sample_count();
        if n < 2 {
            return Err(AperiodicError::InsufficientData(format!(
                "duration {} s at {} Hz yields {} samples",
                params.duration, params.sample_rate, n
            )));
        }

        let phases = RandomPhases::draw(&mut self.rng, n);
        let (aperiodic_spectrum, oscillatory_spectrum) = build_spectra(params, n, &phases);

        let mut aperiodic = inverse_real_fft(aperiodic_spectrum, n)?;
        let mut oscillatory = inverse_real_fft(oscillatory_spectrum, n)?;

        if let Some(target) = params.normalize {
            let std = population_std(&aperiodic);
            if std > 0.0 {
                let scale = std / target;
                for value in aperiodic.iter_mut().chain(oscillatory.iter_mut()) {
                    *value /= scale;
                }
            } else {
                warn!("Aperiodic signal has zero variance, normalization skipped");
            }
        }

        if params.noise_level > 0.0 {
            let normal = Normal::new(0.0, params.noise_level).map_err(|e| {
                AperiodicError::InvalidConfig(format!("invalid noise level: {}", e))
            })?;
            for (a, o) in aperiodic.iter_mut().zip(oscillatory.iter_mut()) {
                let noise = normal.sample(&mut self.rng);
                *a += noise;
                *o += noise;
            }
        }

        if params.highpass_order > 0 {
            let filter = ButterHighpassFilter::new(
                params.highpass_cutoff,
                params.sample_rate,
                params.highpass_order,
                params.highpass_mode,
            )?;
            aperiodic = filter.apply(&aperiodic)?;
            oscillatory = filter.apply(&oscillatory)?;
        }

        debug!(
            "Simulated {} samples at {} Hz, exponent {}, {} peaks",
            n,
            params.sample_rate,
            params.exponent,
            params.periodic_components.len()
        );

        Ok(SimulatedSignals {
            aperiodic: TimeSeries::new(aperiodic, params.sample_rate)?,
            aperiodic_with_oscillations: TimeSeries::new(oscillatory, params.sample_rate)?,
        })
    }
}

/// Aperiodic and oscillatory one-sided spectra built on the same phases
fn build_spectra(
    params: &SpectralParameters,
    n: usize,
    phases: &RandomPhases,
) -> (Vec<Complex<f64>>, Vec<Complex<f64>>) {
    let df = params.sample_rate / n as f64;
    let half_exponent = params.exponent / 2.0;

    let aperiodic: Vec<Complex<f64>> = phases
        .as_slice()
        .iter()
        .enumerate()
        .map(|(k, phasor)| {
            if k == 0 {
                Complex::new(0.0, 0.0)
            } else {
                *phasor / (k as f64 * df).powf(half_exponent)
            }
        })
        .collect();

    let mut oscillatory = aperiodic.clone();
    for component in &params.periodic_components {
        if component.width == 0.0 || component.amplitude == 0.0 {
            continue;
        }
        for (k, (bin, phasor)) in oscillatory
            .iter_mut()
            .zip(phases.as_slice())
            .enumerate()
            .skip(1)
        {
            let density = gaussian_pdf(k as f64 * df, component.frequency, component.width);
            *bin += *phasor * (component.amplitude * density);
        }
    }

    (aperiodic, oscillatory)
}

fn gaussian_pdf(x: f64, mean: f64, std: f64) -> f64 {
    let z = (x - mean) / std;
    (-0.5 * z * z).exp() / (std * (2.0 * PI).sqrt())
}

/// Inverse real FFT with `1/n` normalization
fn inverse_real_fft(mut spectrum: Vec<Complex<f64>>, n: usize) -> Result<Vec<f64>> {
    let mut planner = RealFftPlanner::<f64>::new();
    let c2r = planner.plan_fft_inverse(n);
    let mut output = c2r.make_output_vec();
    c2r.process(&mut spectrum, &mut output)?;
    let scale = 1.0 / n as f64;
    for value in &mut output {
        *value *= scale;
    }
    Ok(output)
}

/// Standard deviation with `1/n` normalization
fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n).sqrt()
}
