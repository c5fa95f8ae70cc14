// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-aperiodic project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Rust Aperiodic library
//!
//! This library simulates electrophysiological signals with a known 1/f
//! (aperiodic) power-law spectrum, optional oscillatory peaks, white noise and
//! high-pass filtering, and estimates the aperiodic exponent back from the
//! signal with IRASA (irregular-resampling auto-spectral analysis).
//!
//! ## Modules
//!
//! - [`simulation`]: colored-noise generator
//! - [`spectral`]: Welch spectra, power-law fits, noise-floor detection
//! - [`resampling`]: rational rate changes used by IRASA
//! - [`irasa`]: aperiodic/oscillatory separation and the fitting-error sweep
//! - [`preprocessing`]: Butterworth high-pass filter
//! - [`config`]: YAML configuration validated against a JSON schema
//! - [`utility`]: time series container and WAV input/output

pub mod config;
pub mod error;
pub mod irasa;
pub mod preprocessing;
pub mod resampling;
pub mod simulation;
pub mod spectral;
pub mod utility;

pub use error::{AperiodicError, Result};
