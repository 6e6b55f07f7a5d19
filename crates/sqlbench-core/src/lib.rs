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

//! SQLBench core — the benchmarking and statistics engine.
//!
//! Given a SQL query and a repeat count, the engine executes the query
//! repeatedly against a live connection, measures per-execution latency,
//! discards duplicate result payloads after the first capture, and reports
//! descriptive statistics (min, max, mean, variance, standard deviation)
//! per distinct query text.
//!
//! # Components
//!
//! - [`BenchmarkRunner`] — orchestrates executions, deduplicates queries by
//!   normalized text, applies the capture/discard policy, and renders the
//!   report.
//! - [`QueryStatistics`] — pure fixed-point statistics over a bucket's
//!   elapsed times.
//! - [`FetchSizeCalibrator`] — probes each query's row count to choose a
//!   prefetch size, with fallbacks down to a configured default.
//! - [`ResultCapture`] — one execution's outcome; full rows for the first
//!   run of a query, a bare row count afterwards.
//! - [`Executor`]/[`Driver`] — the opaque database capability; one concrete
//!   adapter per real driver (see the `sqlbench-sqlite` crate).
//!
//! # Example
//!
//! ```no_run
//! use sqlbench_core::{BenchmarkRunner, Credentials, Driver};
//!
//! # fn example(driver: Box<dyn Driver>) -> Result<(), sqlbench_core::BenchError> {
//! let mut runner = BenchmarkRunner::new(driver);
//! runner.connect(&Credentials::for_service("bench.db"))?;
//! runner.run("SELECT count(1) FROM orders", 10, None)?;
//! for section in &runner.report().queries {
//!     println!("{section}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Measurement model
//!
//! Everything is single-threaded and sequential: one connection, one
//! statement at a time, no timeouts or cancellation. Concurrency would
//! change the latencies being measured. To parallelize across queries, use
//! independent runner/connection pairs — never share one.

pub mod calibrate;
pub mod capture;
pub mod decimal;
pub mod error;
pub mod executor;
pub mod query;
pub mod report;
pub mod runner;
pub mod stats;

pub use calibrate::{FetchSizeCalibrator, DEFAULT_FETCH_SIZE};
pub use capture::{ResultCapture, Rows};
pub use decimal::{sqrt, Decimal, ParseDecimalError};
pub use error::BenchError;
pub use executor::{Credentials, Driver, Executor, RowSet};
pub use query::Query;
pub use report::{render_rows, BenchmarkReport, QueryReport};
pub use runner::{BenchmarkRunner, DEFAULT_NUM_EXECUTIONS};
pub use stats::{Precision, QueryStatistics, EXTENDED_PRECISION, STANDARD_PRECISION};
