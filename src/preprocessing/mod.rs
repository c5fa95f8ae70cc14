// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-aperiodic project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Signal preprocessing
//!
//! Filters applied to time series before spectral analysis.

pub mod filter;

pub use filter::{ButterHighpassFilter, Filter, FilterMode};
