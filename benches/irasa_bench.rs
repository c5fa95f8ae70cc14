// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-aperiodic project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Benchmarks of the separator and its building blocks
//!
//! Run with: cargo bench --bench irasa_bench

use std::hint::black_box;
use std::time::Duration;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rust_aperiodic::config::IrasaConfig;
use rust_aperiodic::irasa::Irasa;
use rust_aperiodic::resampling::ResamplerKind;
use rust_aperiodic::simulation::{ColoredNoiseGenerator, SpectralParameters};
use rust_aperiodic::spectral::WelchEstimator;
use rust_aperiodic::utility::TimeSeries;

fn simulated(duration: f64) -> TimeSeries {
    let params = SpectralParameters::default()
        .with_exponent(2.0)
        .with_sample_rate(1000.0)
        .with_duration(duration)
        .with_component(10.0, 0.5, 1.0);
    ColoredNoiseGenerator::new(1)
        .generate(&params)
        .map(|signals| signals.aperiodic_with_oscillations)
        .unwrap()
}

fn bench_simulation(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulation");
    for duration in [10.0, 60.0] {
        let params = SpectralParameters::default()
            .with_sample_rate(1000.0)
            .with_duration(duration)
            .with_component(10.0, 0.5, 1.0);
        group.throughput(Throughput::Elements(params.sample_count() as u64));
        group.bench_with_input(
            BenchmarkId::new("colored_noise", duration),
            &params,
            |b, params| {
                let mut generator = ColoredNoiseGenerator::new(7);
                b.iter(|| generator.generate(black_box(params)))
            },
        );
    }
    group.finish();
}

fn bench_welch(c: &mut Criterion) {
    let series = simulated(60.0);
    let estimator = WelchEstimator::new(4000);
    c.bench_function("welch_60s", |b| {
        b.iter(|| estimator.estimate(black_box(series.samples()), series.sample_rate()))
    });
}

fn bench_irasa(c: &mut Criterion) {
    let mut group = c.benchmark_group("irasa");
    group.measurement_time(Duration::from_secs(10));
    group.sample_size(10);

    let series = simulated(60.0);
    for kind in [ResamplerKind::Polyphase, ResamplerKind::Fourier] {
        let config = IrasaConfig {
            resampler: kind,
            ..IrasaConfig::default()
        };
        let irasa = Irasa::new(config).unwrap();
        group.bench_function(BenchmarkId::new("separate", format!("{:?}", kind)), |b| {
            b.iter(|| irasa.separate_series(black_box(&series)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_simulation, bench_welch, bench_irasa);
criterion_main!(benches);
