// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-aperiodic project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

use anyhow::Result;
use rust_aperiodic::config::{self, Config};
use rust_aperiodic::irasa::Aggregation;
use std::fs;
use std::sync::Once;
use tempfile::tempdir;

static INIT: Once = Once::new();

fn setup() {
    INIT.call_once(|| {
        let _ = env_logger::builder()
            .filter_level(log::LevelFilter::Debug)
            .is_test(true)
            .try_init();
    });
}

#[test]
fn test_config_load_and_save() -> Result<()> {
    setup();
    let temp_dir = tempdir()?;
    let config_path = temp_dir.path().join("config.yaml");

    let mut config = Config::default();
    config.simulation.parameters.exponent = 2.5;
    config.simulation.seed = Some(42);
    config.irasa.band = (3.0, 45.0);
    config.irasa.aggregation = Aggregation::Median;
    config.sweep.lower_borders = vec![1.0, 2.0, 4.0];

    config.save_to_file(&config_path)?;
    let loaded = Config::from_file(&config_path)?;
    assert_eq!(loaded, config);

    // A missing file is created with the defaults
    let non_existent_path = temp_dir.path().join("non_existent.yaml");
    let default_config = Config::from_file(&non_existent_path)?;
    assert!(non_existent_path.exists());
    assert_eq!(default_config, Config::default());

    Ok(())
}

#[test]
fn test_partial_and_empty_files_use_defaults() -> Result<()> {
    setup();
    let temp_dir = tempdir()?;

    let empty_path = temp_dir.path().join("empty.yaml");
    fs::write(&empty_path, "")?;
    assert_eq!(Config::from_file(&empty_path)?, Config::default());

    let partial_path = temp_dir.path().join("partial.yaml");
    fs::write(
        &partial_path,
        r#"
simulation:
  exponent: 1.5
  periodic_components:
    - frequency: 10.0
      amplitude: 0.5
      width: 1.0
irasa:
  band: [2.0, 40.0]
  resampler: fourier
"#,
    )?;
    let partial = Config::from_file(&partial_path)?;
    assert_eq!(partial.simulation.parameters.exponent, 1.5);
    assert_eq!(partial.simulation.parameters.periodic_components.len(), 1);
    assert_eq!(partial.irasa.band, (2.0, 40.0));
    assert_eq!(partial.irasa.factors, Config::default().irasa.factors);
    assert_eq!(partial.plateau, Config::default().plateau);

    Ok(())
}

#[test]
fn test_schema_error_creates_sample_file() -> Result<()> {
    setup();
    let temp_dir = tempdir()?;
    let config_path = temp_dir.path().join("config.yaml");

    // Unknown enum variant and a string where a number is expected
    fs::write(
        &config_path,
        r#"
irasa:
  aggregation: mode
  window_seconds: "four"
"#,
    )?;

    let result = Config::from_file(&config_path);
    assert!(result.is_err(), "Config loading should have failed");

    let sample_path = config_path.with_extension("sample.yaml");
    assert!(sample_path.exists(), "Sample config file was not created");
    assert_eq!(Config::from_file(&sample_path)?, Config::default());

    Ok(())
}

#[test]
fn test_specific_rule_error_creates_sample_file() -> Result<()> {
    setup();
    let temp_dir = tempdir()?;
    let config_path = temp_dir.path().join("config.yaml");

    // Well-typed, but the band is reversed
    fs::write(
        &config_path,
        r#"
irasa:
  band: [40.0, 2.0]
"#,
    )?;

    assert!(Config::from_file(&config_path).is_err());
    assert!(config_path.with_extension("sample.yaml").exists());

    Ok(())
}

#[test]
fn test_config_validation() {
    assert!(Config::default().validate().is_ok());

    let mut bad_factor = Config::default();
    bad_factor.irasa.factors = vec![1.5, 0.8];
    assert!(bad_factor.validate().is_err());

    let mut bad_rate = Config::default();
    bad_rate.simulation.parameters.sample_rate = 0.0;
    assert!(bad_rate.validate().is_err());

    let mut bad_sweep = Config::default();
    bad_sweep.sweep.lower_borders = vec![10.0, 200.0];
    assert!(bad_sweep.validate().is_err());
}

#[test]
fn test_apply_args() {
    let mut config = Config::default();
    config.apply_args(
        Some(3.0),
        Some(0.01),
        Some(1000.0),
        None,
        Some(9),
        Some((5.0, 50.0)),
        None,
    );

    assert_eq!(config.simulation.parameters.exponent, 3.0);
    assert_eq!(config.simulation.parameters.noise_level, 0.01);
    assert_eq!(config.simulation.parameters.sample_rate, 1000.0);
    assert_eq!(config.simulation.seed, Some(9));
    assert_eq!(config.irasa.band, (5.0, 50.0));

    // Untouched values keep their defaults
    let defaults = Config::default();
    assert_eq!(
        config.simulation.parameters.duration,
        defaults.simulation.parameters.duration
    );
    assert_eq!(config.irasa.window_seconds, defaults.irasa.window_seconds);
}

#[test]
fn test_config_schema_output() -> Result<()> {
    config::output_config_schema()?;
    Ok(())
}
