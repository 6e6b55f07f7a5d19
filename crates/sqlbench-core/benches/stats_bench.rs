// SQLBench - SQL Query Benchmarking Harness
//
// Copyright (c) 2025 SQLBench contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Criterion benchmarks for the statistics engine.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sqlbench_core::{sqrt, Decimal, Precision, QueryStatistics};

fn bench_aggregation(c: &mut Criterion) {
    let precision = Precision::default();
    for size in [100usize, 1_000, 10_000] {
        let elapsed: Vec<u64> = (0..size as u64).map(|i| (i * 7_919) % 1_000).collect();
        c.bench_function(&format!("aggregate_{size}_samples"), |b| {
            b.iter(|| QueryStatistics::from_elapsed(black_box(&elapsed), &precision));
        });
    }
}

fn bench_fixed_point_sqrt(c: &mut Criterion) {
    let values: Vec<Decimal> = ["0.00010", "2", "12345.67890"]
        .iter()
        .map(|s| s.parse().unwrap())
        .collect();
    c.bench_function("fixed_point_sqrt", |b| {
        b.iter(|| {
            for v in &values {
                black_box(sqrt(black_box(v), 3, 5));
            }
        });
    });
}

criterion_group!(benches, bench_aggregation, bench_fixed_point_sqrt);
criterion_main!(benches);
