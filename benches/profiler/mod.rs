// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-DialogueGraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dialogue Graph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::str::FromStr;
use std::time::Duration;

use criterion::Criterion;

use pprof::criterion::{Output, PProfProfiler};

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    std::env::var(name).ok().and_then(|raw| raw.trim().parse::<T>().ok()).unwrap_or(default)
}

/// Criterion settings for the dialogue-graph benches, tunable through `DG_BENCH_*` variables.
struct BenchConfig {
    profile_frequency: i32,
    sample_size: usize,
    warmup: Duration,
    measurement: Duration,
}

impl BenchConfig {
    fn from_env() -> Self {
        Self {
            profile_frequency: env_or("DG_BENCH_PROFILE_FREQ", 100).clamp(1, 1000),
            sample_size: env_or("DG_BENCH_SAMPLE_SIZE", 50usize).clamp(10, 200),
            warmup: Duration::from_secs(env_or("DG_BENCH_WARMUP_SECS", 2u64).clamp(1, 60)),
            measurement: Duration::from_secs(
                env_or("DG_BENCH_MEASUREMENT_SECS", 5u64).clamp(1, 120),
            ),
        }
    }
}

pub fn criterion() -> Criterion {
    let config = BenchConfig::from_env();

    Criterion::default()
        .sample_size(config.sample_size)
        .warm_up_time(config.warmup)
        .measurement_time(config.measurement)
        .with_profiler(PProfProfiler::new(
            config.profile_frequency,
            Output::Flamegraph(None),
        ))
}
