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

//! The benchmark orchestrator.
//!
//! [`BenchmarkRunner`] owns one database session and drives N sequential
//! executions per query, applying the capture/discard policy: the first
//! execution of a distinct query keeps its full row payload, later ones
//! keep only the row count. Results accumulate per normalized query text
//! in first-seen order for the lifetime of the runner.
//!
//! Execution is strictly sequential by design — overlapping statements or
//! parallel repeats would change the very latencies being measured. The
//! `&mut self` receivers enforce one operation in flight per runner at
//! compile time.

use crate::calibrate::{FetchSizeCalibrator, DEFAULT_FETCH_SIZE};
use crate::capture::ResultCapture;
use crate::error::BenchError;
use crate::executor::{Credentials, Driver, Executor};
use crate::query::Query;
use crate::report::{render_rows, BenchmarkReport, QueryReport};
use crate::stats::{Precision, QueryStatistics};
use std::collections::HashMap;
use std::io::{self, Write};
use std::time::Instant;

/// Default number of repeated executions per query.
pub const DEFAULT_NUM_EXECUTIONS: usize = 10;

/// Result buckets keyed by normalized query, first-seen order preserved.
///
/// Owned exclusively by the runner; lives for the runner's lifetime with
/// no reset operation.
#[derive(Debug, Default)]
struct ResultStore {
    index: HashMap<Query, usize>,
    buckets: Vec<(Query, Vec<ResultCapture>)>,
}

impl ResultStore {
    /// The bucket for `query`, created empty on first sight.
    fn bucket_mut(&mut self, query: &Query) -> &mut Vec<ResultCapture> {
        let i = match self.index.get(query) {
            Some(&i) => i,
            None => {
                let i = self.buckets.len();
                self.index.insert(query.clone(), i);
                self.buckets.push((query.clone(), Vec::new()));
                i
            }
        };
        &mut self.buckets[i].1
    }

    fn iter(&self) -> impl Iterator<Item = (&Query, &[ResultCapture])> {
        self.buckets
            .iter()
            .map(|(query, bucket)| (query, bucket.as_slice()))
    }
}

/// Executes queries repeatedly against one session and accumulates timed
/// results for reporting.
///
/// # Examples
///
/// ```no_run
/// use sqlbench_core::{BenchmarkRunner, Credentials, Driver, DEFAULT_NUM_EXECUTIONS};
///
/// # fn example(driver: Box<dyn Driver>) -> Result<(), sqlbench_core::BenchError> {
/// let mut runner = BenchmarkRunner::new(driver).with_print_results(true);
/// runner.connect(&Credentials::for_service("bench.db"))?;
/// runner.run("SELECT 1", DEFAULT_NUM_EXECUTIONS, None)?;
/// println!("{}", runner.report());
/// runner.disconnect();
/// # Ok(())
/// # }
/// ```
pub struct BenchmarkRunner {
    driver: Box<dyn Driver>,
    executor: Option<Box<dyn Executor>>,
    store: ResultStore,
    calibrator: FetchSizeCalibrator,
    precision: Precision,
    print_results: bool,
    row_sink: Box<dyn Write>,
}

impl BenchmarkRunner {
    /// Runner for the given driver, not yet connected.
    pub fn new(driver: Box<dyn Driver>) -> Self {
        Self {
            driver,
            executor: None,
            store: ResultStore::default(),
            calibrator: FetchSizeCalibrator::new(DEFAULT_FETCH_SIZE),
            precision: Precision::default(),
            print_results: false,
            row_sink: Box::new(io::stdout()),
        }
    }

    /// Render each query's first captured execution to the row sink.
    pub fn with_print_results(mut self, print_results: bool) -> Self {
        self.print_results = print_results;
        self
    }

    /// Redirect print-mode row output (stdout by default).
    pub fn with_row_sink(mut self, sink: Box<dyn Write>) -> Self {
        self.row_sink = sink;
        self
    }

    /// Override the exhausted-calibration fallback fetch size.
    pub fn with_default_fetch_size(mut self, fetch_size: usize) -> Self {
        self.calibrator = FetchSizeCalibrator::new(fetch_size);
        self
    }

    /// Override the statistics precision.
    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    /// True while a session is open.
    pub fn is_connected(&self) -> bool {
        self.executor.is_some()
    }

    /// Open a session, closing any prior one first (idempotent reconnect).
    ///
    /// On failure the runner keeps its accumulated results but has no
    /// active session.
    pub fn connect(&mut self, credentials: &Credentials) -> Result<(), BenchError> {
        self.disconnect();
        self.executor = Some(self.driver.open(credentials)?);
        Ok(())
    }

    /// Close the active session if one is open.
    ///
    /// Safe to call when already disconnected. A close failure is reported
    /// to stderr, never propagated — the session is considered gone either
    /// way.
    pub fn disconnect(&mut self) {
        if let Some(mut executor) = self.executor.take() {
            if let Err(err) = executor.close() {
                eprintln!("warning: failed to close connection: {err}");
            }
        }
    }

    /// Execute `query` `repeats` times, timing each execution.
    ///
    /// The query is normalized and bucketed by its canonical text; if
    /// `fetch_size` is `None` the prefetch size comes from the calibrator
    /// (memoized per query). The first execution ever recorded for the
    /// query retains full rows; later executions keep only the row count.
    ///
    /// # Errors
    ///
    /// [`BenchError::Precondition`] when no session is open (no work is
    /// done). [`BenchError::Execution`] when an execution fails mid-loop:
    /// the remaining repeats of this call are abandoned, but captures
    /// already collected — in this call or earlier ones — stay reportable.
    pub fn run(
        &mut self,
        query: &str,
        repeats: usize,
        fetch_size: Option<usize>,
    ) -> Result<(), BenchError> {
        let query = Query::new(query);
        let Self {
            executor,
            store,
            calibrator,
            print_results,
            row_sink,
            ..
        } = self;
        let Some(executor) = executor.as_deref_mut() else {
            return Err(BenchError::precondition(format!(
                "cannot run '{query}' without connecting first"
            )));
        };
        let fetch_size = match fetch_size {
            Some(size) => size,
            None => calibrator.fetch_size(executor, &query),
        };
        store.bucket_mut(&query);
        for _ in 0..repeats {
            let started = Instant::now();
            let row_set = executor.execute(query.text(), fetch_size)?;
            let elapsed_ms = started.elapsed().as_millis() as u64;
            let bucket = store.bucket_mut(&query);
            let capture = if bucket.is_empty() {
                if *print_results {
                    // Side channel: a sink failure must not disturb the
                    // benchmark.
                    let _ = row_sink.write_all(
                        render_rows(&row_set.columns, &row_set.rows).as_bytes(),
                    );
                }
                ResultCapture::captured(row_set, elapsed_ms)
            } else {
                ResultCapture::summarized(row_set.row_count(), elapsed_ms)
            };
            bucket.push(capture);
        }
        Ok(())
    }

    /// Execute `query` the default number of times with a calibrated
    /// fetch size.
    pub fn run_default(&mut self, query: &str) -> Result<(), BenchError> {
        self.run(query, DEFAULT_NUM_EXECUTIONS, None)
    }

    /// The calibrated prefetch size for `query`, if calibration has run.
    pub fn calibrated_fetch_size(&self, query: &str) -> Option<usize> {
        self.calibrator.cached(&Query::new(query))
    }

    /// The captures recorded for `query`, in execution order.
    pub fn captures(&self, query: &str) -> Option<&[ResultCapture]> {
        let query = Query::new(query);
        self.store
            .index
            .get(&query)
            .map(|&i| self.store.buckets[i].1.as_slice())
    }

    /// Build the statistics report, queries in first-seen order.
    pub fn report(&self) -> BenchmarkReport {
        let queries = self
            .store
            .iter()
            .map(|(query, bucket)| {
                let elapsed: Vec<u64> = bucket.iter().map(ResultCapture::elapsed_ms).collect();
                QueryReport {
                    query: query.text().to_string(),
                    row_count: bucket.first().map_or(0, ResultCapture::row_count),
                    fetch_size: self.calibrator.cached(query),
                    statistics: QueryStatistics::from_elapsed(&elapsed, &self.precision),
                }
            })
            .collect();
        BenchmarkReport { queries }
    }
}

impl Drop for BenchmarkRunner {
    fn drop(&mut self) {
        self.disconnect();
    }
}
