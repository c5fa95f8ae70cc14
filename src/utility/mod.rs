// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-aperiodic project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Utility module for common utilities used throughout the project

pub mod time_series;
pub mod wav;

// Re-exports for use in other modules
pub use time_series::TimeSeries;
pub use wav::{read_wav, write_wav};
