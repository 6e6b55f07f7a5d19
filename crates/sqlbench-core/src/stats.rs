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

//! Descriptive statistics over a bucket's elapsed times.
//!
//! Pure numeric component: given the per-execution durations in
//! milliseconds, compute min/max/mean, Bessel-corrected sample variance,
//! and the Newton-iterated standard deviation, all in exact fixed-point
//! decimals (seconds at the standard precision, variance at the extended
//! precision).
//!
//! The mean reproduces the historical truncation order on purpose: total
//! milliseconds are integer-divided by the execution count *before* the
//! conversion to seconds, so `[1ms, 2ms]` averages to `0.001`, not
//! `0.002`. Changing this would silently shift reports between versions
//! of the harness.

use crate::decimal::{self, Decimal};
use serde::Serialize;

/// Reporting precision: fractional digits in reported seconds.
pub const STANDARD_PRECISION: u32 = 3;
/// Working precision for variance and square-root iteration.
pub const EXTENDED_PRECISION: u32 = 5;

/// Decimal precision configuration for the aggregator.
///
/// Passed in as a value rather than read from process-wide statics, so the
/// statistics component stays pure and testable.
#[derive(Debug, Clone, Copy)]
pub struct Precision {
    /// Scale of reported values (seconds, min/mean/max/stddev).
    pub standard: u32,
    /// Scale of intermediate values (variance, sqrt iteration).
    pub extended: u32,
}

impl Default for Precision {
    fn default() -> Self {
        Self {
            standard: STANDARD_PRECISION,
            extended: EXTENDED_PRECISION,
        }
    }
}

/// Statistics block for one query bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryStatistics {
    /// Number of executions aggregated.
    pub executions: usize,
    /// Per-run durations in seconds at the standard precision, in
    /// execution order.
    pub times_secs: Vec<Decimal>,
    /// Fastest execution, seconds.
    pub min_secs: Decimal,
    /// Mean execution time, seconds (truncated before conversion, see
    /// module docs).
    pub mean_secs: Decimal,
    /// Slowest execution, seconds.
    pub max_secs: Decimal,
    /// Sample variance (Bessel-corrected) at the extended precision;
    /// exactly zero for fewer than two executions.
    pub variance: Decimal,
    /// Standard deviation at the standard precision.
    pub stddev: Decimal,
}

impl QueryStatistics {
    /// Aggregate a bucket's elapsed times.
    ///
    /// An empty bucket reports every statistic as zero at the standard
    /// precision; this never fails.
    pub fn from_elapsed(elapsed_ms: &[u64], precision: &Precision) -> Self {
        let std = precision.standard;
        if elapsed_ms.is_empty() {
            let zero = Decimal::zero(std);
            return Self {
                executions: 0,
                times_secs: Vec::new(),
                min_secs: zero,
                mean_secs: zero,
                max_secs: zero,
                variance: zero,
                stddev: zero,
            };
        }

        let times_secs: Vec<Decimal> = elapsed_ms
            .iter()
            .map(|&ms| ms_to_secs(ms, std))
            .collect();

        let total: u128 = elapsed_ms.iter().map(|&ms| u128::from(ms)).sum();
        let mean_ms = (total / elapsed_ms.len() as u128) as u64;
        let mean_secs = ms_to_secs(mean_ms, std);

        // min/max always exist here; the empty case returned above.
        let min_ms = elapsed_ms.iter().copied().min().unwrap_or(0);
        let max_ms = elapsed_ms.iter().copied().max().unwrap_or(0);

        let variance = sample_variance(&times_secs, &mean_secs, precision);
        let stddev = decimal::sqrt(&variance, std, precision.extended);

        Self {
            executions: elapsed_ms.len(),
            times_secs,
            min_secs: ms_to_secs(min_ms, std),
            mean_secs,
            max_secs: ms_to_secs(max_ms, std),
            variance,
            stddev,
        }
    }
}

/// Milliseconds to seconds at the given scale, rounding half-up.
fn ms_to_secs(ms: u64, scale: u32) -> Decimal {
    Decimal::new(ms as i128, 0).divide(&Decimal::from_int(1_000), scale)
}

/// Bessel-corrected sample variance of the second-scale times.
///
/// Zero (at the standard scale) for fewer than two samples: the undefined
/// case is defined as zero, never an error.
fn sample_variance(times_secs: &[Decimal], mean: &Decimal, precision: &Precision) -> Decimal {
    if times_secs.len() <= 1 {
        return Decimal::zero(precision.standard);
    }
    let mut acc = Decimal::ZERO;
    for time in times_secs {
        let deviation = *time - *mean;
        acc = acc + deviation * deviation;
    }
    acc.divide(
        &Decimal::from_int(times_secs.len() as i64 - 1),
        precision.extended,
    )
}
