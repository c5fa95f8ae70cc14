// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-aperiodic project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

use rust_aperiodic::config::{IrasaConfig, PlateauConfig};
use rust_aperiodic::irasa::{FitErrorSweep, Irasa};
use rust_aperiodic::preprocessing::FilterMode;
use rust_aperiodic::simulation::{ColoredNoiseGenerator, SpectralParameters};
use rust_aperiodic::spectral::{detect_plateau_onset, WelchEstimator};
use rust_aperiodic::utility::TimeSeries;
use rust_aperiodic::AperiodicError;

fn power_law_signal(
    exponent: f64,
    sample_rate: f64,
    duration: f64,
    noise_level: f64,
) -> TimeSeries {
    let params = SpectralParameters::default()
        .with_exponent(exponent)
        .with_sample_rate(sample_rate)
        .with_duration(duration)
        .with_noise_level(noise_level)
        .with_normalize(None)
        .with_highpass(0, FilterMode::Causal);
    ColoredNoiseGenerator::new(3)
        .generate(&params)
        .unwrap()
        .aperiodic
}

#[test]
fn test_sweep_errors_are_small_on_clean_signal() {
    let series = power_law_signal(1.5, 500.0, 60.0, 0.0);
    let config = IrasaConfig {
        window_seconds: 2.0,
        ..IrasaConfig::default()
    };
    let irasa = Irasa::new(config).unwrap();

    let sweep = FitErrorSweep::new(&irasa, &series, vec![2.0, 5.0, 10.0], 40.0, 1.5);
    assert_eq!(sweep.len(), 3);

    let errors: Vec<f64> = sweep.collect::<Result<_, _>>().unwrap();
    assert_eq!(errors.len(), 3);
    for error in errors {
        assert!(error >= 0.0);
        assert!(error < 0.15, "fitting error {}", error);
    }
}

#[test]
fn test_sweep_is_lazy() {
    let series = power_law_signal(1.0, 500.0, 30.0, 0.0);
    let irasa = Irasa::new(IrasaConfig::default()).unwrap();

    // The second border is invalid, but nothing fails until it is reached
    let mut sweep = FitErrorSweep::new(&irasa, &series, vec![5.0, 50.0], 40.0, 1.0);
    assert!(sweep.next().unwrap().is_ok());
    assert_eq!(sweep.len(), 1);
    assert!(matches!(
        sweep.next(),
        Some(Err(AperiodicError::InvalidConfig(_)))
    ));
    assert!(sweep.next().is_none());
}

#[test]
fn test_plateau_found_above_noise_knee() {
    // Power law and white noise cross at 100 Hz: sigma = 1 / (f0 * sqrt(n))
    let sample_rate = 2000.0;
    let duration = 300.0;
    let n = sample_rate * duration;
    let series = power_law_signal(2.0, sample_rate, duration, 1.0 / (100.0 * n.sqrt()));

    let spectrum = WelchEstimator::new(2000)
        .estimate(series.samples(), sample_rate)
        .unwrap();
    let config = PlateauConfig {
        window_hz: 200.0,
        tolerance: 0.1,
        ..PlateauConfig::default()
    };
    let onset =
        detect_plateau_onset(&spectrum.frequencies, &spectrum.power, 1.0, &config).unwrap();

    assert!(onset.detected);
    assert!(
        onset.frequency > 200.0 && onset.frequency < 600.0,
        "onset at {} Hz",
        onset.frequency
    );
}

#[test]
fn test_no_plateau_without_noise() {
    let sample_rate = 2000.0;
    let series = power_law_signal(2.0, sample_rate, 60.0, 0.0);
    let spectrum = WelchEstimator::new(2000)
        .estimate(series.samples(), sample_rate)
        .unwrap();
    let config = PlateauConfig {
        window_hz: 200.0,
        tolerance: 0.1,
        ..PlateauConfig::default()
    };
    let onset =
        detect_plateau_onset(&spectrum.frequencies, &spectrum.power, 1.0, &config).unwrap();

    assert!(!onset.detected);
    assert_eq!(onset.frequency, *spectrum.frequencies.last().unwrap());
}
