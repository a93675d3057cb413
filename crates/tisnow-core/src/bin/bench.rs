/// Pure Rust benchmarks for the snow model.
///
/// Uses std::time::Instant for timing, a deterministic LCG PRNG for data generation,
/// and std::hint::black_box to prevent dead-code elimination.
use std::hint::black_box;
use std::time::{Duration, Instant};

use tisnow_core::bmi::vars::{PRECIPITATION, TEMPERATURE};
use tisnow_core::forcing::ForcingData;
use tisnow_core::snow::params::{Parameters, RainSnowMethod};
use tisnow_core::snow::run;
use tisnow_core::{ensemble, Bmi, Config, SnowBmi, SnowModel};

const REPEATS: usize = 7;

/// Simple LCG PRNG for deterministic data generation.
fn make_data(n: usize, seed: u64) -> (Vec<f64>, Vec<f64>) {
    let mut state = seed;
    let mut next_f64 = || -> f64 {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (state >> 33) as f64 / (1u64 << 31) as f64
    };

    let precip: Vec<f64> = (0..n).map(|_| next_f64() * 10.0).collect();
    let temp: Vec<f64> = (0..n).map(|_| -10.0 + next_f64() * 30.0).collect();
    (precip, temp)
}

/// Run a closure `REPEATS` times, return the median duration.
fn median_time<F: FnMut()>(mut f: F) -> Duration {
    let mut times: Vec<Duration> = (0..REPEATS)
        .map(|_| {
            let start = Instant::now();
            f();
            start.elapsed()
        })
        .collect();
    times.sort();
    times[REPEATS / 2]
}

fn bench_run(sizes: &[usize]) -> Vec<(&'static str, usize, Duration)> {
    let method = RainSnowMethod::LinearRamp {
        snow_max: 1.5,
        rain_min: 4.5,
    };
    let Ok(params) = Parameters::new(method, 3.0, 1.0, 0.0) else {
        return Vec::new();
    };
    let mut results = Vec::new();

    for &n in sizes {
        let (precip, temp) = make_data(n, 42);
        let Ok(forcing) = ForcingData::new(precip, temp) else {
            continue;
        };

        // Warmup
        black_box(run::run(&params, &forcing, None));

        let dur = median_time(|| {
            black_box(run::run(&params, &forcing, None));
        });
        results.push(("run", n, dur));
    }
    results
}

fn bench_bmi(sizes: &[usize]) -> Vec<(&'static str, usize, Duration)> {
    let mut results = Vec::new();

    for &n in sizes {
        let (precip, temp) = make_data(n, 7);

        let dur = median_time(|| {
            let mut bmi = SnowBmi::new();
            if bmi.initialize(None).is_err() {
                return;
            }
            for (p, t) in precip.iter().zip(&temp) {
                let stepped = bmi
                    .set_value(PRECIPITATION, &[*p])
                    .and_then(|_| bmi.set_value(TEMPERATURE, &[*t]))
                    .and_then(|_| bmi.update());
                black_box(stepped.is_ok());
            }
        });
        results.push(("bmi", n, dur));
    }
    results
}

fn bench_ensemble(members: &[usize], n_steps: usize) -> Vec<(&'static str, usize, Duration)> {
    let mut results = Vec::new();

    for &m in members {
        let Ok(model) = SnowModel::from_config(&Config {
            swe_init: 100.0,
            ..Config::default()
        }) else {
            continue;
        };
        let template = vec![model; m];

        let dur = median_time(|| {
            let mut models = template.clone();
            for _ in 0..n_steps {
                ensemble::advance_all(&mut models);
            }
            black_box(&models);
        });
        results.push(("ensemble", m, dur));
    }
    results
}

fn main() {
    println!("Pure Rust Core Benchmarks");
    println!("============================================================");
    println!("{:<18} {:>6}   {:>12}", "Benchmark", "N", "Median (ms)");
    println!("--------------------------------------------");

    let mut all_results: Vec<(&str, usize, Duration)> = Vec::new();

    all_results.extend(bench_run(&[3650, 36500]));
    all_results.extend(bench_bmi(&[3650, 36500]));
    all_results.extend(bench_ensemble(&[16, 256], 365));

    for (name, n, dur) in &all_results {
        let ms = dur.as_secs_f64() * 1000.0;
        println!("{:<18} {:>6}      {:>8.2}", name, n, ms);
    }

    println!("============================================================");
}
