// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-aperiodic project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Configuration utilities
//!
//! This module provides utility functions for working with configuration
//! settings, including validation and schema management.

use anyhow::{Context, Result};
use log::{debug, warn};

use super::Config;

/// Embedded JSON schema of the configuration file
pub(crate) const CONFIG_SCHEMA: &str = include_str!("../../resources/config.schema.json");

/// Output the embedded JSON schema to the console.
///
/// This function is called when the `--show-config-schema` flag is provided
/// on the command line. It outputs the full JSON schema for the configuration
/// to stdout, formatted for readability.
///
/// # Example
///
/// ```bash
/// ./rust_aperiodic --show-config-schema > config_schema.json
/// ```
pub fn output_config_schema() -> Result<()> {
    let schema: serde_json::Value =
        serde_json::from_str(CONFIG_SCHEMA).context("Failed to parse JSON schema")?;

    let formatted_schema =
        serde_json::to_string_pretty(&schema).context("Failed to format JSON schema")?;

    println!("{}", formatted_schema);

    Ok(())
}

/// Build a validator for the embedded schema
pub(crate) fn schema_validator() -> Result<jsonschema::Validator> {
    let schema: serde_json::Value = serde_json::from_str(CONFIG_SCHEMA).with_context(|| {
        debug!("JSON schema string: {}", CONFIG_SCHEMA);
        "Failed to parse JSON schema"
    })?;

    let validator = jsonschema::draft202012::options()
        .should_validate_formats(true)
        .build(&schema)?;
    Ok(validator)
}

/// Validates the configuration against additional rules that aren't covered by the JSON schema.
///
/// # Validation Rules
///
/// - **Simulation**: positive sample rate and duration, non-negative peak
///   widths, a high-pass cutoff below Nyquist
/// - **IRASA**: ordered positive band, factors strictly above 1
/// - **Plateau**: positive window, sustain count of at least one
/// - **Sweep**: every lower border below the upper border
///
/// Fitting bands reaching beyond the Nyquist frequency of the simulated
/// signal only produce a warning, since a recorded signal may use another rate.
pub fn validate_specific_rules(config: &Config) -> Result<()> {
    debug!("Performing additional validation checks");

    config
        .simulation
        .parameters
        .validate()
        .context("Invalid simulation section")?;
    config.irasa.validate().context("Invalid irasa section")?;
    config
        .plateau
        .validate()
        .context("Invalid plateau section")?;
    config.sweep.validate().context("Invalid sweep section")?;

    let nyquist = config.simulation.parameters.sample_rate / 2.0;
    let effective_high = config.irasa.band.1 * config.irasa.max_factor();
    if effective_high > nyquist {
        warn!(
            "IRASA effective range reaches {} Hz, above the simulated Nyquist frequency {} Hz",
            effective_high, nyquist
        );
    }

    Ok(())
}
