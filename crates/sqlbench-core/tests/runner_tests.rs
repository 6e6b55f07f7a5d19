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

//! Runner behavior against a scripted stub driver.
//!
//! Covers the capture/discard policy, query deduplication, calibration
//! flow, the precondition and fail-fast error paths, and session lifecycle.

use sqlbench_core::{
    BenchError, BenchmarkRunner, Credentials, Driver, Executor, RowSet, DEFAULT_FETCH_SIZE,
};
use std::io::Write;
use std::sync::{Arc, Mutex};

/// Shared observation and scripting state for the stub driver.
#[derive(Default)]
struct StubState {
    /// Each executed statement with its prefetch hint, probes included.
    executions: Vec<(String, usize)>,
    scan_calls: usize,
    opens: usize,
    closes: usize,
    /// Rows every ordinary execution returns.
    rows_per_execute: u64,
    /// Reject the `SELECT COUNT(1) FROM (...)` probe form.
    fail_count_probe: bool,
    /// `Some(n)`: the scrollable scan reports n rows; `None`: it fails.
    scan_rows: Option<u64>,
    /// Fail the nth ordinary (non-probe) execution, zero-based.
    fail_execution_at: Option<usize>,
    /// Make `close` report a failure.
    fail_close: bool,
    ordinary_executions: usize,
}

#[derive(Clone)]
struct StubDriver {
    state: Arc<Mutex<StubState>>,
    fail_open: bool,
}

impl StubDriver {
    fn new(state: Arc<Mutex<StubState>>) -> Self {
        Self {
            state,
            fail_open: false,
        }
    }
}

impl Driver for StubDriver {
    fn open(&self, _credentials: &Credentials) -> Result<Box<dyn Executor>, BenchError> {
        if self.fail_open {
            return Err(BenchError::connection("stub refused to open"));
        }
        self.state.lock().unwrap().opens += 1;
        Ok(Box::new(StubExecutor {
            state: Arc::clone(&self.state),
        }))
    }
}

struct StubExecutor {
    state: Arc<Mutex<StubState>>,
}

impl Executor for StubExecutor {
    fn execute(&mut self, sql: &str, prefetch_rows: usize) -> Result<RowSet, BenchError> {
        let mut state = self.state.lock().unwrap();
        state.executions.push((sql.to_string(), prefetch_rows));
        if sql.starts_with("SELECT COUNT(1) FROM (") {
            if state.fail_count_probe {
                return Err(BenchError::execution(sql, "cannot wrap in subquery"));
            }
            let count = state.rows_per_execute.to_string();
            return Ok(RowSet {
                columns: vec!["COUNT(1)".into()],
                rows: vec![vec![Some(count)]],
            });
        }
        let ordinal = state.ordinary_executions;
        state.ordinary_executions += 1;
        if state.fail_execution_at == Some(ordinal) {
            return Err(BenchError::execution(sql, "injected failure"));
        }
        let rows = (0..state.rows_per_execute)
            .map(|i| vec![Some(i.to_string()), Some(format!("row-{i}"))])
            .collect();
        Ok(RowSet {
            columns: vec!["id".into(), "label".into()],
            rows,
        })
    }

    fn scrollable_row_count(&mut self, _sql: &str) -> Result<u64, BenchError> {
        let mut state = self.state.lock().unwrap();
        state.scan_calls += 1;
        state
            .scan_rows
            .ok_or_else(|| BenchError::execution("scan", "not scrollable"))
    }

    fn close(&mut self) -> Result<(), BenchError> {
        let mut state = self.state.lock().unwrap();
        state.closes += 1;
        if state.fail_close {
            return Err(BenchError::connection("stub close failure"));
        }
        Ok(())
    }
}

/// Write sink backed by shared memory, for observing print-mode output.
#[derive(Clone, Default)]
struct SharedSink(Arc<Mutex<Vec<u8>>>);

impl Write for SharedSink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn connected_runner(state: &Arc<Mutex<StubState>>) -> BenchmarkRunner {
    let mut runner = BenchmarkRunner::new(Box::new(StubDriver::new(Arc::clone(state))));
    runner
        .connect(&Credentials::for_service("stub"))
        .expect("stub connect");
    runner
}

fn state_with_rows(rows: u64) -> Arc<Mutex<StubState>> {
    Arc::new(Mutex::new(StubState {
        rows_per_execute: rows,
        ..StubState::default()
    }))
}

#[test]
fn n_repeats_yield_n_captures_with_one_payload() {
    let state = state_with_rows(3);
    let mut runner = connected_runner(&state);
    runner.run("SELECT * FROM t", 5, Some(10)).unwrap();

    let captures = runner.captures("SELECT * FROM t").unwrap();
    assert_eq!(captures.len(), 5);
    let retained: Vec<bool> = captures.iter().map(|c| c.is_captured()).collect();
    assert_eq!(retained, [true, false, false, false, false]);
    assert!(captures.iter().all(|c| c.row_count() == 3));
}

#[test]
fn whitespace_and_keyword_casing_share_one_bucket() {
    let state = state_with_rows(1);
    let mut runner = connected_runner(&state);
    runner.run("SELECT 1\nFROM DUAL;", 2, Some(1)).unwrap();
    runner.run("  select   1 FROM DUAL", 2, Some(1)).unwrap();

    let report = runner.report();
    assert_eq!(report.queries.len(), 1);
    assert_eq!(report.queries[0].query, "SELECT 1 FROM DUAL");
    assert_eq!(report.queries[0].statistics.executions, 4);

    // The second call lands in the existing bucket, so even its first
    // repeat is summarized.
    let captures = runner.captures("SELECT 1 FROM DUAL").unwrap();
    assert_eq!(captures.iter().filter(|c| c.is_captured()).count(), 1);
    assert!(captures[0].is_captured());
}

#[test]
fn run_without_connection_is_a_precondition_error() {
    let state = state_with_rows(1);
    let mut runner = BenchmarkRunner::new(Box::new(StubDriver::new(Arc::clone(&state))));

    let err = runner.run("SELECT 1", 3, None).unwrap_err();
    assert!(matches!(err, BenchError::Precondition { .. }));
    assert!(runner.report().queries.is_empty());
    assert!(state.lock().unwrap().executions.is_empty());
}

#[test]
fn execution_failure_aborts_remaining_repeats_but_keeps_prior_captures() {
    let state = state_with_rows(2);
    state.lock().unwrap().fail_execution_at = Some(2);
    let mut runner = connected_runner(&state);

    let err = runner.run("SELECT * FROM t", 5, Some(4)).unwrap_err();
    assert!(matches!(err, BenchError::Execution { .. }));

    let captures = runner.captures("SELECT * FROM t").unwrap();
    assert_eq!(captures.len(), 2);
    assert!(captures[0].is_captured());

    let report = runner.report();
    assert_eq!(report.queries[0].statistics.executions, 2);
    assert_eq!(report.queries[0].row_count, 2);
}

#[test]
fn calibration_uses_count_probe_result_as_prefetch() {
    let state = state_with_rows(42);
    let mut runner = connected_runner(&state);
    runner.run("SELECT * FROM t", 2, None).unwrap();

    let state = state.lock().unwrap();
    assert_eq!(
        state.executions[0],
        ("SELECT COUNT(1) FROM (SELECT * FROM t)".to_string(), 1)
    );
    // Both timed executions request the probed row count.
    assert_eq!(state.executions[1], ("SELECT * FROM t".to_string(), 42));
    assert_eq!(state.executions[2], ("SELECT * FROM t".to_string(), 42));
    assert_eq!(state.scan_calls, 0);
}

#[test]
fn calibration_falls_back_to_scrollable_scan() {
    let state = state_with_rows(5);
    {
        let mut s = state.lock().unwrap();
        s.fail_count_probe = true;
        s.scan_rows = Some(17);
    }
    let mut runner = connected_runner(&state);
    runner.run("SELECT * FROM t", 1, None).unwrap();

    assert_eq!(runner.calibrated_fetch_size("SELECT * FROM t"), Some(17));
    let state = state.lock().unwrap();
    assert_eq!(state.scan_calls, 1);
    // The timed execution carries the scanned count, not the default.
    let (_, prefetch) = state.executions.last().unwrap();
    assert_eq!(*prefetch, 17);
}

#[test]
fn exhausted_calibration_uses_the_default_fetch_size() {
    let state = state_with_rows(5);
    {
        let mut s = state.lock().unwrap();
        s.fail_count_probe = true;
        s.scan_rows = None;
    }
    let mut runner = connected_runner(&state);
    runner.run("SELECT * FROM t", 1, None).unwrap();
    assert_eq!(
        runner.calibrated_fetch_size("SELECT * FROM t"),
        Some(DEFAULT_FETCH_SIZE)
    );
}

#[test]
fn calibration_runs_once_across_run_calls() {
    let state = state_with_rows(4);
    let mut runner = connected_runner(&state);
    runner.run("SELECT * FROM t", 2, None).unwrap();
    runner.run("SELECT * FROM t", 2, None).unwrap();

    let state = state.lock().unwrap();
    let probes = state
        .executions
        .iter()
        .filter(|(sql, _)| sql.starts_with("SELECT COUNT(1)"))
        .count();
    assert_eq!(probes, 1);
}

#[test]
fn explicit_fetch_size_skips_calibration() {
    let state = state_with_rows(4);
    let mut runner = connected_runner(&state);
    runner.run("SELECT * FROM t", 1, Some(99)).unwrap();

    let state = state.lock().unwrap();
    assert_eq!(state.executions, [("SELECT * FROM t".to_string(), 99)]);
    drop(state);
    assert_eq!(runner.calibrated_fetch_size("SELECT * FROM t"), None);
}

#[test]
fn disconnect_is_idempotent() {
    let state = state_with_rows(1);
    let mut runner = connected_runner(&state);
    assert!(runner.is_connected());
    runner.disconnect();
    runner.disconnect();
    assert!(!runner.is_connected());
    assert_eq!(state.lock().unwrap().closes, 1);
}

#[test]
fn close_failure_is_not_propagated() {
    let state = state_with_rows(1);
    state.lock().unwrap().fail_close = true;
    let mut runner = connected_runner(&state);
    runner.disconnect();
    assert!(!runner.is_connected());
}

#[test]
fn reconnect_closes_the_previous_session() {
    let state = state_with_rows(1);
    let mut runner = connected_runner(&state);
    runner.connect(&Credentials::for_service("stub")).unwrap();

    let state = state.lock().unwrap();
    assert_eq!(state.opens, 2);
    assert_eq!(state.closes, 1);
}

#[test]
fn failed_open_leaves_runner_disconnected() {
    let state = state_with_rows(1);
    let mut driver = StubDriver::new(Arc::clone(&state));
    driver.fail_open = true;
    let mut runner = BenchmarkRunner::new(Box::new(driver));

    let err = runner.connect(&Credentials::for_service("stub")).unwrap_err();
    assert!(matches!(err, BenchError::Connection { .. }));
    assert!(!runner.is_connected());
}

#[test]
fn report_preserves_first_seen_order() {
    let state = state_with_rows(1);
    let mut runner = connected_runner(&state);
    runner.run("SELECT b FROM t", 1, Some(1)).unwrap();
    runner.run("SELECT a FROM t", 1, Some(1)).unwrap();
    runner.run("SELECT b FROM t", 1, Some(1)).unwrap();

    let report = runner.report();
    let order: Vec<&str> = report.queries.iter().map(|q| q.query.as_str()).collect();
    assert_eq!(order, ["SELECT b FROM t", "SELECT a FROM t"]);
}

#[test]
fn end_to_end_report_matches_known_shape() {
    let state = state_with_rows(1);
    let mut runner = connected_runner(&state);
    runner.run("SELECT 1 FROM DUAL", 3, None).unwrap();

    let report = runner.report();
    let section = &report.queries[0];
    assert_eq!(section.query, "SELECT 1 FROM DUAL");
    assert_eq!(section.statistics.executions, 3);
    assert_eq!(section.row_count, 1);
    assert_eq!(section.fetch_size, Some(1));
    assert_eq!(section.statistics.times_secs.len(), 3);
    // Stub executions are effectively instantaneous.
    assert!(section.statistics.min_secs <= section.statistics.mean_secs);
    assert!(section.statistics.mean_secs <= section.statistics.max_secs);
}

#[test]
fn print_mode_renders_first_execution_rows_once() {
    let state = state_with_rows(2);
    let sink = SharedSink::default();
    let mut runner = BenchmarkRunner::new(Box::new(StubDriver::new(Arc::clone(&state))))
        .with_print_results(true)
        .with_row_sink(Box::new(sink.clone()));
    runner.connect(&Credentials::for_service("stub")).unwrap();
    runner.run("SELECT * FROM t", 3, Some(2)).unwrap();

    let rendered = String::from_utf8(sink.0.lock().unwrap().clone()).unwrap();
    assert_eq!(rendered.lines().count(), 2);
    assert!(rendered.contains("id: \"0\";  label: \"row-0\""));
    assert!(rendered.contains("id: \"1\";  label: \"row-1\""));
}

#[test]
fn print_mode_off_renders_nothing() {
    let state = state_with_rows(2);
    let sink = SharedSink::default();
    let mut runner = BenchmarkRunner::new(Box::new(StubDriver::new(Arc::clone(&state))))
        .with_row_sink(Box::new(sink.clone()));
    runner.connect(&Credentials::for_service("stub")).unwrap();
    runner.run("SELECT * FROM t", 2, Some(2)).unwrap();
    assert!(sink.0.lock().unwrap().is_empty());
}

#[test]
fn zero_repeats_registers_an_empty_bucket() {
    let state = state_with_rows(1);
    let mut runner = connected_runner(&state);
    runner.run("SELECT * FROM t", 0, Some(1)).unwrap();

    let report = runner.report();
    assert_eq!(report.queries.len(), 1);
    let section = &report.queries[0];
    assert_eq!(section.statistics.executions, 0);
    assert_eq!(section.row_count, 0);
    assert_eq!(section.statistics.mean_secs.to_string(), "0.000");
}

#[test]
fn dropping_the_runner_closes_the_session() {
    let state = state_with_rows(1);
    {
        let _runner = connected_runner(&state);
    }
    assert_eq!(state.lock().unwrap().closes, 1);
}
