// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-aperiodic project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

// Command line entry point: simulate signals, separate aperiodic spectra,
// detect noise floors and sweep fitting errors

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use ndarray::Array2;
use serde::Serialize;

use rust_aperiodic::config::{self, Config};
use rust_aperiodic::irasa::{ChannelFit, EffectiveRange, FitErrorSweep, Irasa};
use rust_aperiodic::simulation::ColoredNoiseGenerator;
use rust_aperiodic::spectral::{detect_plateau_onset, WelchEstimator};
use rust_aperiodic::utility::{read_wav, write_wav, TimeSeries};

/// Aperiodic exponent simulation and estimation
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (YAML format)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to a configuration to validate and exit
    #[arg(long)]
    validate_config: Option<PathBuf>,

    /// Output the configuration schema as JSON and exit
    #[arg(long)]
    show_config_schema: bool,

    /// Enable verbose logging (debug level)
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,

    /// Disable all logging output
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate the aperiodic signal and its oscillatory variant
    Simulate {
        /// Output file (.wav or .json)
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Wav)]
        format: OutputFormat,

        /// Aperiodic exponent
        #[arg(long)]
        exponent: Option<f64>,

        /// Standard deviation of the added white noise
        #[arg(long)]
        noise_level: Option<f64>,

        /// Sample rate in Hz
        #[arg(long)]
        sample_rate: Option<f64>,

        /// Duration in seconds
        #[arg(long)]
        duration: Option<f64>,

        /// Random seed
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Separate aperiodic and oscillatory spectra of a WAV file with IRASA
    Separate {
        /// Input WAV file
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Lower border of the fitting band in Hz
        #[arg(long, requires = "band_high")]
        band_low: Option<f64>,

        /// Upper border of the fitting band in Hz
        #[arg(long, requires = "band_low")]
        band_high: Option<f64>,

        /// Welch segment duration in seconds
        #[arg(long)]
        window_seconds: Option<f64>,

        /// Write the JSON report to a file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Detect the noise-floor onset of a WAV file channel
    Plateau {
        /// Input WAV file
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Channel to analyze
        #[arg(long, default_value_t = 0)]
        channel: usize,

        /// Only scan frequencies above this value (Hz)
        #[arg(long)]
        start_frequency: Option<f64>,
    },

    /// Compute the IRASA fitting error for a range of lower fitting borders
    Sweep {
        /// Input WAV file
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Channel to analyze
        #[arg(long, default_value_t = 0)]
        channel: usize,

        /// Exponent used to simulate the signal
        #[arg(long)]
        true_exponent: Option<f64>,

        /// Upper fitting border in Hz
        #[arg(long)]
        upper_border: Option<f64>,

        /// Write the JSON report to a file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Wav,
    Json,
}

#[derive(Serialize)]
struct SimulationReport<'a> {
    sample_rate: f64,
    aperiodic: &'a [f64],
    aperiodic_with_oscillations: &'a [f64],
}

#[derive(Serialize)]
struct SeparationReport {
    frequencies: Vec<f64>,
    aperiodic: Vec<Vec<f64>>,
    oscillatory: Vec<Vec<f64>>,
    fits: Vec<ChannelFit>,
    effective_range: EffectiveRange,
}

#[derive(Serialize)]
struct PlateauReport {
    channel: usize,
    frequency: f64,
    detected: bool,
}

#[derive(Serialize)]
struct SweepPoint {
    lower_border: f64,
    error: f64,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.quiet {
        log::LevelFilter::Off
    } else if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    // Check if --show-config-schema flag is set
    if args.show_config_schema {
        return config::output_config_schema();
    }

    // Validate configuration file if --validate-config is set
    if let Some(validate_path) = args.validate_config {
        if !validate_path.exists() {
            anyhow::bail!(
                "Configuration file does not exist: {}",
                validate_path.display()
            );
        }
        Config::from_file(&validate_path)
            .map_err(|err| anyhow::anyhow!("Configuration validation failed: {}", err))?;
        println!("Configuration file is valid: {}", validate_path.display());
        return Ok(());
    }

    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    let Some(command) = args.command else {
        anyhow::bail!("No command given, see --help");
    };

    match command {
        Command::Simulate {
            output,
            format,
            exponent,
            noise_level,
            sample_rate,
            duration,
            seed,
        } => {
            config.apply_args(exponent, noise_level, sample_rate, duration, seed, None, None);
            config.validate()?;
            run_simulate(&config, &output, format)
        }
        Command::Separate {
            input,
            band_low,
            band_high,
            window_seconds,
            output,
        } => {
            let band = band_low.zip(band_high);
            config.apply_args(None, None, None, None, None, band, window_seconds);
            config.validate()?;
            run_separate(&config, &input, output.as_deref())
        }
        Command::Plateau {
            input,
            channel,
            start_frequency,
        } => {
            if let Some(start) = start_frequency {
                config.plateau.start_frequency = start;
            }
            config.validate()?;
            run_plateau(&config, &input, channel)
        }
        Command::Sweep {
            input,
            channel,
            true_exponent,
            upper_border,
            output,
        } => {
            if let Some(exponent) = true_exponent {
                config.sweep.true_exponent = exponent;
            }
            if let Some(upper) = upper_border {
                config.sweep.upper_border = upper;
            }
            config.validate()?;
            run_sweep(&config, &input, channel, output.as_deref())
        }
    }
}

fn run_simulate(config: &Config, output: &Path, format: OutputFormat) -> Result<()> {
    let mut generator = ColoredNoiseGenerator::from_seed_option(config.simulation.seed);
    let signals = generator.generate(&config.simulation.parameters)?;
    info!(
        "Generated {} s of signal at {} Hz",
        signals.aperiodic.duration(),
        signals.aperiodic.sample_rate()
    );

    match format {
        OutputFormat::Wav => write_wav(
            output,
            &[&signals.aperiodic, &signals.aperiodic_with_oscillations],
        )?,
        OutputFormat::Json => {
            let report = SimulationReport {
                sample_rate: signals.aperiodic.sample_rate(),
                aperiodic: signals.aperiodic.samples(),
                aperiodic_with_oscillations: signals.aperiodic_with_oscillations.samples(),
            };
            write_json(&report, Some(output))?;
        }
    }
    info!("Signals saved to {}", output.display());
    Ok(())
}

fn run_separate(config: &Config, input: &Path, output: Option<&Path>) -> Result<()> {
    let (data, sample_rate) = read_wav(input)?;
    let irasa = Irasa::new(config.irasa.clone())?;
    let result = irasa
        .separate(data.view(), sample_rate)
        .with_context(|| format!("IRASA failed on {}", input.display()))?;

    for (channel, fit) in result.fits.iter().enumerate() {
        info!(
            "Channel {}: exponent {:.3} (R^2 {:.4})",
            channel,
            fit.exponent(),
            fit.r_squared
        );
    }

    let report = SeparationReport {
        frequencies: result.frequencies,
        aperiodic: rows(&result.aperiodic),
        oscillatory: rows(&result.oscillatory),
        fits: result.fits,
        effective_range: result.effective_range,
    };
    write_json(&report, output)
}

fn run_plateau(config: &Config, input: &Path, channel: usize) -> Result<()> {
    let series = load_channel(input, channel)?;
    let segment = (config.plateau.segment_seconds * series.sample_rate()).round() as usize;
    let spectrum = WelchEstimator::from_config(segment, &config.irasa.welch)
        .estimate(series.samples(), series.sample_rate())?;
    let onset = detect_plateau_onset(
        &spectrum.frequencies,
        &spectrum.power,
        config.plateau.start_frequency,
        &config.plateau,
    )?;

    if onset.detected {
        info!("Noise floor starts at {:.2} Hz", onset.frequency);
    } else {
        info!("No noise floor found up to {:.2} Hz", onset.frequency);
    }
    write_json(
        &PlateauReport {
            channel,
            frequency: onset.frequency,
            detected: onset.detected,
        },
        None,
    )
}

fn run_sweep(config: &Config, input: &Path, channel: usize, output: Option<&Path>) -> Result<()> {
    let series = load_channel(input, channel)?;
    let irasa = Irasa::new(config.irasa.clone())?;
    let sweep = FitErrorSweep::from_config(&irasa, &series, &config.sweep);
    let total = sweep.len();

    let mut points = Vec::with_capacity(total);
    for (i, (lower, error)) in config.sweep.lower_borders.iter().zip(sweep).enumerate() {
        let error = error.with_context(|| format!("Fit failed for lower border {} Hz", lower))?;
        info!("[{}/{}] {} Hz: error {:.4}", i + 1, total, lower, error);
        points.push(SweepPoint {
            lower_border: *lower,
            error,
        });
    }
    write_json(&points, output)
}

fn load_channel(input: &Path, channel: usize) -> Result<TimeSeries> {
    let (data, sample_rate) = read_wav(input)?;
    if channel >= data.nrows() {
        anyhow::bail!(
            "Channel {} requested but {} has {} channels",
            channel,
            input.display(),
            data.nrows()
        );
    }
    Ok(TimeSeries::new(data.row(channel).to_vec(), sample_rate)?)
}

fn rows(matrix: &Array2<f64>) -> Vec<Vec<f64>> {
    matrix.outer_iter().map(|row| row.to_vec()).collect()
}

fn write_json<T: Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize report")?;
    match output {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("Failed to write report to {}", path.display()))?,
        None => println!("{}", json),
    }
    Ok(())
}
