// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-aperiodic project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Fitting-error curve over lower fitting borders
//!
//! For a signal with a known exponent, the sweep runs one IRASA fit per lower
//! border `l` over `[l, upper_border]` and yields the absolute exponent error.
//! Each fit is expensive, so the sweep is an iterator: nothing is computed
//! until it is advanced, and a caller can stop early or run a subset.

use std::vec::IntoIter;

use super::Irasa;
use crate::config::SweepConfig;
use crate::error::Result;
use crate::utility::TimeSeries;

/// Lazy sequence of `|true_exponent - estimated_exponent|`
pub struct FitErrorSweep<'a> {
    irasa: &'a Irasa,
    series: &'a TimeSeries,
    lower_borders: IntoIter<f64>,
    upper_border: f64,
    true_exponent: f64,
}

impl<'a> FitErrorSweep<'a> {
    pub fn new(
        irasa: &'a Irasa,
        series: &'a TimeSeries,
        lower_borders: Vec<f64>,
        upper_border: f64,
        true_exponent: f64,
    ) -> Self {
        Self {
            irasa,
            series,
            lower_borders: lower_borders.into_iter(),
            upper_border,
            true_exponent,
        }
    }

    /// Sweep described by a configuration section
    pub fn from_config(irasa: &'a Irasa, series: &'a TimeSeries, config: &SweepConfig) -> Self {
        Self::new(
            irasa,
            series,
            config.lower_borders.clone(),
            config.upper_border,
            config.true_exponent,
        )
    }
}

impl Iterator for FitErrorSweep<'_> {
    type Item = Result<f64>;

    fn next(&mut self) -> Option<Self::Item> {
        let lower = self.lower_borders.next()?;
        let result = self
            .irasa
            .separate_series_in_band(self.series, (lower, self.upper_border))
            .map(|separation| {
                let estimated = separation.fits[0].exponent();
                (self.true_exponent - estimated).abs()
            });
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.lower_borders.size_hint()
    }
}

impl ExactSizeIterator for FitErrorSweep<'_> {}
