//! Shared helpers for the criterion benches. Each bench target uses a subset.
#![allow(dead_code)]

use std::env;
use std::time::Duration;

use criterion::measurement::Measurement;
use criterion::{BenchmarkGroup, Criterion, Throughput};

use spacewise_core::{CoordStore, SpacePartition};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BenchTier {
    Quick,
    Full,
}

impl BenchTier {
    pub fn from_env() -> Self {
        match env::var("SPACEWISE_BENCH_TIER").as_deref() {
            Ok("full") => Self::Full,
            _ => Self::Quick,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupWeight {
    Light,
    Heavy,
}

#[derive(Debug, Clone)]
pub struct BenchConfig {
    pub tier: BenchTier,
    pub seed: u64,
    pub sample_size_light: usize,
    pub sample_size_heavy: usize,
    pub measurement_light: Duration,
    pub measurement_heavy: Duration,
}

pub fn bench_config() -> BenchConfig {
    let tier = BenchTier::from_env();
    let seed = env::var("SPACEWISE_BENCH_SEED")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(0xC0FFEE);
    let (sample_size_light, sample_size_heavy, measurement_light, measurement_heavy) = match tier {
        BenchTier::Quick => (20, 12, Duration::from_secs(3), Duration::from_secs(5)),
        BenchTier::Full => (30, 20, Duration::from_secs(5), Duration::from_secs(10)),
    };

    BenchConfig {
        tier,
        seed,
        sample_size_light,
        sample_size_heavy,
        measurement_light,
        measurement_heavy,
    }
}

pub fn configure_group<M: Measurement>(
    group: &mut BenchmarkGroup<'_, M>,
    cfg: &BenchConfig,
    weight: GroupWeight,
) {
    match weight {
        GroupWeight::Light => {
            group.sample_size(cfg.sample_size_light);
            group.measurement_time(cfg.measurement_light);
        }
        GroupWeight::Heavy => {
            group.sample_size(cfg.sample_size_heavy);
            group.measurement_time(cfg.measurement_heavy);
        }
    }
}

pub fn bench_criterion() -> Criterion {
    Criterion::default().configure_from_args()
}

pub fn points_throughput(points: usize) -> Throughput {
    Throughput::Elements(points as u64)
}

#[derive(Clone)]
pub struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    pub fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    pub fn gen_f64(&mut self, min: f64, max: f64) -> f64 {
        let n = self.next_u64() as f64 / u64::MAX as f64;
        min + (max - min) * n
    }
}

/// Uniform points in `[0, extent)^2`.
pub fn uniform_points(seed: u64, count: usize, extent: f64) -> CoordStore {
    let mut rng = XorShift64::new(seed);
    (0..count)
        .map(|_| (rng.gen_f64(0.0, extent), rng.gen_f64(0.0, extent)))
        .collect()
}

/// `spaces` clusters of `per_space` points each, one cluster per space.
pub fn clustered_spaces(seed: u64, spaces: usize, per_space: usize) -> (CoordStore, SpacePartition) {
    let mut rng = XorShift64::new(seed);
    let mut points = Vec::with_capacity(spaces * per_space);
    for _ in 0..spaces {
        let cx = rng.gen_f64(0.0, 1000.0);
        let cy = rng.gen_f64(0.0, 1000.0);
        for _ in 0..per_space {
            points.push((cx + rng.gen_f64(-25.0, 25.0), cy + rng.gen_f64(-25.0, 25.0)));
        }
    }
    (
        CoordStore::from_points(points),
        SpacePartition::from_lengths(&vec![per_space; spaces]),
    )
}
