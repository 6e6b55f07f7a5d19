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

//! The database capability boundary.
//!
//! The engine treats the actual driver as opaque: a [`Driver`] opens a
//! session from [`Credentials`], and the resulting [`Executor`] runs one
//! statement at a time. Every column value is materialized as its string
//! representation (nullable), which is all the harness needs for display
//! and row counting.
//!
//! [`Executor`] deliberately exposes two execution modes: the ordinary
//! prefetch-hinted execution used for timed runs, and a scrollable
//! read-only row-count scan used by the fetch-size calibrator when a query
//! cannot be wrapped in a `COUNT(1)` subquery.

use crate::error::BenchError;

/// Connection parameters for a database session.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    /// Login user name.
    pub user: String,
    /// Login password.
    pub password: String,
    /// Server host name or address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Service identifier; embedded drivers interpret this as the database
    /// path.
    pub service: String,
}

impl Credentials {
    /// Credentials addressing only a service identifier, for embedded
    /// drivers that need no user, host, or port.
    pub fn for_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            ..Self::default()
        }
    }
}

/// A fully materialized query result: column names plus ordered rows of
/// nullable string values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowSet {
    /// Ordered column names.
    pub columns: Vec<String>,
    /// Ordered rows; each cell is the value's string form, `None` for SQL
    /// NULL.
    pub rows: Vec<Vec<Option<String>>>,
}

impl RowSet {
    /// Number of rows in the set.
    pub fn row_count(&self) -> u64 {
        self.rows.len() as u64
    }

    /// True when no rows were returned.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// An open database session capable of executing statements.
///
/// Implementations are exclusively owned by one runner; `&mut self` on
/// every operation keeps execution strictly sequential as the measurement
/// model requires.
pub trait Executor {
    /// Execute `sql`, requesting `prefetch_rows` rows per round trip, and
    /// materialize the complete result.
    ///
    /// Drivers without a round-trip concept (embedded databases) may ignore
    /// the hint.
    fn execute(&mut self, sql: &str, prefetch_rows: usize) -> Result<RowSet, BenchError>;

    /// Count the rows of `sql` via a scrollable, read-only scan without
    /// materializing values.
    fn scrollable_row_count(&mut self, sql: &str) -> Result<u64, BenchError>;

    /// Close the session. Must be safe to call more than once.
    fn close(&mut self) -> Result<(), BenchError>;
}

/// Opens database sessions; one implementation per concrete driver.
pub trait Driver {
    /// Open a session for the given credentials.
    fn open(&self, credentials: &Credentials) -> Result<Box<dyn Executor>, BenchError>;
}
