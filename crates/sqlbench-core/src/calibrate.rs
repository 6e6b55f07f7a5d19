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

//! Row-prefetch calibration.
//!
//! When materializing a query's result, the number of rows requested per
//! network round trip amortizes round-trip cost without over-buffering.
//! The calibrator probes the query's row count and uses it as the fetch
//! size, so the whole result arrives in one round trip.
//!
//! Probe order, each step a silent fallback for the previous:
//!
//! 1. `SELECT COUNT(1) FROM (<query>)` at a minimal prefetch of one row.
//!    Not every statement can be wrapped in a subquery, so this may fail.
//! 2. A scrollable, read-only scan of the original query, seeking to the
//!    last row for the count.
//! 3. The configured default ([`DEFAULT_FETCH_SIZE`]).
//!
//! Counts of zero or less floor to one. The outcome — including the
//! exhausted-fallback default — is memoized per distinct query text, so
//! calibration runs at most once per query no matter how many times it is
//! benchmarked.

use crate::error::BenchError;
use crate::executor::Executor;
use crate::query::Query;
use std::collections::HashMap;

/// Fetch size used when every calibration step fails.
pub const DEFAULT_FETCH_SIZE: usize = 10_000;

/// Determines and memoizes the prefetch size per distinct query.
#[derive(Debug, Clone)]
pub struct FetchSizeCalibrator {
    default_fetch_size: usize,
    cache: HashMap<Query, usize>,
}

impl FetchSizeCalibrator {
    /// Calibrator with the given exhausted-fallback default.
    pub fn new(default_fetch_size: usize) -> Self {
        Self {
            default_fetch_size,
            cache: HashMap::new(),
        }
    }

    /// The configured fallback default.
    pub fn default_fetch_size(&self) -> usize {
        self.default_fetch_size
    }

    /// Previously calibrated size for `query`, if any.
    pub fn cached(&self, query: &Query) -> Option<usize> {
        self.cache.get(query).copied()
    }

    /// The fetch size for `query`, calibrating on first use.
    pub fn fetch_size(&mut self, executor: &mut dyn Executor, query: &Query) -> usize {
        if let Some(size) = self.cached(query) {
            return size;
        }
        let size = self.calibrate(executor, query);
        self.cache.insert(query.clone(), size);
        size
    }

    fn calibrate(&self, executor: &mut dyn Executor, query: &Query) -> usize {
        if let Ok(size) = self.count_probe(executor, query) {
            return size;
        }
        if let Ok(count) = executor.scrollable_row_count(query.text()) {
            return floor_to_one(count as i128);
        }
        self.default_fetch_size
    }

    /// Step 1: wrap the query in a counting subquery.
    fn count_probe(&self, executor: &mut dyn Executor, query: &Query) -> Result<usize, BenchError> {
        let sql = format!("SELECT COUNT(1) FROM ({})", query.text());
        let result = executor.execute(&sql, 1)?;
        let cell = result.rows.first().and_then(|row| row.first());
        match cell {
            Some(Some(text)) => {
                let count: i128 = text.trim().parse().map_err(|_| {
                    BenchError::execution(&sql, format!("non-numeric count '{text}'"))
                })?;
                Ok(floor_to_one(count))
            }
            // A NULL count reads as zero, so it floors to one like any
            // other non-positive count.
            Some(None) => Ok(floor_to_one(0)),
            // A count query that yields no row at all gives us nothing to
            // size against.
            None => Ok(self.default_fetch_size),
        }
    }
}

fn floor_to_one(count: i128) -> usize {
    if count <= 0 {
        1
    } else {
        count as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::RowSet;

    /// Minimal scripted executor: answers count probes and scans from
    /// fixed responses, recording what was asked.
    struct Scripted {
        probe: Result<Option<String>, ()>,
        scan: Result<u64, ()>,
        executed: Vec<String>,
        scans: usize,
    }

    impl Scripted {
        fn new(probe: Result<Option<String>, ()>, scan: Result<u64, ()>) -> Self {
            Self {
                probe,
                scan,
                executed: Vec::new(),
                scans: 0,
            }
        }
    }

    impl Executor for Scripted {
        fn execute(&mut self, sql: &str, _prefetch_rows: usize) -> Result<RowSet, BenchError> {
            self.executed.push(sql.to_string());
            match &self.probe {
                Ok(cell) => Ok(RowSet {
                    columns: vec!["COUNT(1)".into()],
                    rows: vec![vec![cell.clone()]],
                }),
                Err(()) => Err(BenchError::execution(sql, "cannot wrap in subquery")),
            }
        }

        fn scrollable_row_count(&mut self, _sql: &str) -> Result<u64, BenchError> {
            self.scans += 1;
            self.scan
                .map_err(|()| BenchError::execution("scan", "not scrollable"))
        }

        fn close(&mut self) -> Result<(), BenchError> {
            Ok(())
        }
    }

    #[test]
    fn count_probe_wins_when_it_succeeds() {
        let mut executor = Scripted::new(Ok(Some("42".into())), Ok(7));
        let mut calibrator = FetchSizeCalibrator::new(DEFAULT_FETCH_SIZE);
        let query = Query::new("SELECT * FROM t");
        assert_eq!(calibrator.fetch_size(&mut executor, &query), 42);
        assert_eq!(executor.executed, ["SELECT COUNT(1) FROM (SELECT * FROM t)"]);
        assert_eq!(executor.scans, 0);
    }

    #[test]
    fn zero_count_floors_to_one() {
        let mut executor = Scripted::new(Ok(Some("0".into())), Ok(0));
        let mut calibrator = FetchSizeCalibrator::new(DEFAULT_FETCH_SIZE);
        assert_eq!(
            calibrator.fetch_size(&mut executor, &Query::new("SELECT * FROM empty")),
            1
        );
    }

    #[test]
    fn falls_back_to_scrollable_scan() {
        let mut executor = Scripted::new(Err(()), Ok(17));
        let mut calibrator = FetchSizeCalibrator::new(DEFAULT_FETCH_SIZE);
        let query = Query::new("SELECT * FROM t");
        // The probe fails; the scan's count must win, not the default.
        assert_eq!(calibrator.fetch_size(&mut executor, &query), 17);
        assert_eq!(executor.scans, 1);
    }

    #[test]
    fn exhausted_fallbacks_yield_the_default() {
        let mut executor = Scripted::new(Err(()), Err(()));
        let mut calibrator = FetchSizeCalibrator::new(500);
        assert_eq!(
            calibrator.fetch_size(&mut executor, &Query::new("SELECT * FROM t")),
            500
        );
    }

    #[test]
    fn unparseable_count_falls_through_to_scan() {
        let mut executor = Scripted::new(Ok(Some("not-a-number".into())), Ok(9));
        let mut calibrator = FetchSizeCalibrator::new(DEFAULT_FETCH_SIZE);
        assert_eq!(
            calibrator.fetch_size(&mut executor, &Query::new("SELECT * FROM t")),
            9
        );
    }

    #[test]
    fn null_count_floors_to_one() {
        let mut executor = Scripted::new(Ok(None), Ok(9));
        let mut calibrator = FetchSizeCalibrator::new(123);
        assert_eq!(
            calibrator.fetch_size(&mut executor, &Query::new("SELECT * FROM t")),
            1
        );
        // The probe answered; neither the scan nor the default was needed.
        assert_eq!(executor.scans, 0);
    }

    #[test]
    fn calibration_is_memoized_per_query() {
        let mut executor = Scripted::new(Ok(Some("5".into())), Ok(0));
        let mut calibrator = FetchSizeCalibrator::new(DEFAULT_FETCH_SIZE);
        let query = Query::new("SELECT * FROM t");
        assert_eq!(calibrator.fetch_size(&mut executor, &query), 5);
        assert_eq!(calibrator.fetch_size(&mut executor, &query), 5);
        // Only the first call probed the database.
        assert_eq!(executor.executed.len(), 1);
        assert_eq!(calibrator.cached(&query), Some(5));
    }

    #[test]
    fn default_outcome_is_memoized_too() {
        let mut executor = Scripted::new(Err(()), Err(()));
        let mut calibrator = FetchSizeCalibrator::new(DEFAULT_FETCH_SIZE);
        let query = Query::new("SELECT * FROM t");
        calibrator.fetch_size(&mut executor, &query);
        calibrator.fetch_size(&mut executor, &query);
        assert_eq!(executor.executed.len(), 1);
        assert_eq!(executor.scans, 1);
        assert_eq!(calibrator.cached(&query), Some(DEFAULT_FETCH_SIZE));
    }
}
