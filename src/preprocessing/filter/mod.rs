// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-aperiodic project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Digital filters for signal preprocessing
//!
//! Recorded electrophysiological signals are high-pass filtered by the
//! acquisition chain. The simulator reproduces that step with a Butterworth
//! high-pass filter in second-order sections designed by `sci-rs`.
//!
//! # Filter modes
//!
//! - **Causal**: a single forward pass, the way a hardware or online filter
//!   acts on a recording
//! - **Zero-phase**: forward-backward filtering (`filtfilt`), which doubles
//!   the attenuation and removes the phase delay
//!
//! # Examples
//!
//! ```no_run
//! use rust_aperiodic::preprocessing::filter::{ButterHighpassFilter, Filter, FilterMode};
//!
//! let filter = ButterHighpassFilter::new(1.0, 2400.0, 4, FilterMode::Causal).unwrap();
//! let input = vec![1.0, 0.5, -0.3, 0.8, -0.2];
//! let output = filter.apply(&input).unwrap();
//! assert_eq!(output.len(), input.len());
//! ```

mod butter;

pub use butter::ButterHighpassFilter;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Trait for implementing digital filters
///
/// Implementations are immutable once built, so one filter can process
/// several channels from different threads.
pub trait Filter: Send + Sync {
    /// Apply the filter to a signal and return the filtered signal
    ///
    /// ### Arguments
    ///
    /// * `signal` - Input samples
    ///
    /// ### Returns
    ///
    /// A new vector of the same length as the input
    fn apply(&self, signal: &[f64]) -> Result<Vec<f64>>;
}

/// How a filter is run over a finite signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    /// Single forward pass
    Causal,
    /// Forward-backward pass
    ZeroPhase,
}
