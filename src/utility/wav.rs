// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-aperiodic project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! WAV file input and output
//!
//! Simulated signals are stored as multi-channel 32-bit float WAV files so
//! they can be analyzed later with the `separate`, `plateau` and `sweep`
//! commands or with any audio tool. Integer WAV files are accepted on input
//! and scaled to `[-1, 1)`.

use std::path::Path;

use anyhow::{Context, Result};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use log::debug;
use ndarray::Array2;

use super::TimeSeries;

/// Write channels of equal length and sample rate as an interleaved float WAV file
pub fn write_wav<P: AsRef<Path>>(path: P, channels: &[&TimeSeries]) -> Result<()> {
    let path = path.as_ref();
    let first = channels
        .first()
        .context("At least one channel is required to write a WAV file")?;
    let sample_rate = first.sample_rate();
    if sample_rate.fract() != 0.0 || sample_rate > u32::MAX as f64 {
        anyhow::bail!("WAV files need an integer sample rate, got {}", sample_rate);
    }
    for channel in channels {
        if channel.len() != first.len() || channel.sample_rate() != sample_rate {
            anyhow::bail!("All WAV channels must share length and sample rate");
        }
    }

    let spec = WavSpec {
        channels: channels.len() as u16,
        sample_rate: sample_rate as u32,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let mut writer = WavWriter::create(path, spec)
        .with_context(|| format!("Failed to create WAV file at {:?}", path))?;

    for i in 0..first.len() {
        for channel in channels {
            writer.write_sample(channel.samples()[i] as f32)?;
        }
    }
    writer
        .finalize()
        .with_context(|| format!("Failed to finalize WAV file at {:?}", path))?;

    debug!(
        "Wrote {} channels of {} samples to {:?}",
        channels.len(),
        first.len(),
        path
    );
    Ok(())
}

/// Read a WAV file into a `channels x samples` matrix and its sample rate
pub fn read_wav<P: AsRef<Path>>(path: P) -> Result<(Array2<f64>, f64)> {
    let path = path.as_ref();
    let mut reader =
        WavReader::open(path).with_context(|| format!("Failed to open WAV file at {:?}", path))?;
    let spec = reader.spec();
    let n_channels = spec.channels as usize;

    let interleaved: Vec<f64> = match spec.sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .map(|s| s.map(f64::from))
            .collect::<std::result::Result<_, _>>()
            .with_context(|| format!("Failed to decode float samples from {:?}", path))?,
        SampleFormat::Int => {
            let full_scale = (1i64 << (spec.bits_per_sample - 1)) as f64;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f64 / full_scale))
                .collect::<std::result::Result<_, _>>()
                .with_context(|| format!("Failed to decode integer samples from {:?}", path))?
        }
    };

    let n_frames = interleaved.len() / n_channels;
    let data = Array2::from_shape_fn((n_channels, n_frames), |(c, i)| {
        interleaved[i * n_channels + c]
    });

    debug!(
        "Read {} channels of {} samples at {} Hz from {:?}",
        n_channels, n_frames, spec.sample_rate, path
    );
    Ok((data, spec.sample_rate as f64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_wav_round_trip() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("signals.wav");

        let left = TimeSeries::new(vec![0.5, -0.25, 0.125, 0.0], 1000.0)?;
        let right = TimeSeries::new(vec![-1.0, 1.0, 0.75, 0.5], 1000.0)?;
        write_wav(&path, &[&left, &right])?;

        let (data, rate) = read_wav(&path)?;
        assert_eq!(rate, 1000.0);
        assert_eq!(data.shape(), &[2, 4]);
        assert_eq!(data[[0, 1]], -0.25);
        assert_eq!(data[[1, 2]], 0.75);
        Ok(())
    }

    #[test]
    fn test_write_rejects_fractional_rate() -> Result<()> {
        let dir = tempdir()?;
        let series = TimeSeries::new(vec![0.0; 4], 1000.5)?;
        assert!(write_wav(dir.path().join("bad.wav"), &[&series]).is_err());
        Ok(())
    }
}
