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

//! One execution's outcome.
//!
//! To bound memory across repeated executions, only the first run of a
//! query retains its full row payload; every later run keeps just the row
//! count. The two states are an explicit tagged variant, immutable after
//! construction — there is no in-place discarding.

use crate::executor::RowSet;

/// Row payload state of a capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rows {
    /// Full payload, retained for the first execution of a query.
    Captured {
        /// Ordered column names from the result metadata.
        columns: Vec<String>,
        /// Ordered rows of nullable string values.
        rows: Vec<Vec<Option<String>>>,
    },
    /// Payload discarded, only the count remembered.
    Summarized {
        /// Rows the execution produced.
        row_count: u64,
    },
}

/// The outcome of a single timed query execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultCapture {
    elapsed_ms: u64,
    rows: Rows,
}

impl ResultCapture {
    /// Capture with the full row payload (first execution of a query).
    pub fn captured(row_set: RowSet, elapsed_ms: u64) -> Self {
        Self {
            elapsed_ms,
            rows: Rows::Captured {
                columns: row_set.columns,
                rows: row_set.rows,
            },
        }
    }

    /// Capture retaining only the row count (subsequent executions).
    pub fn summarized(row_count: u64, elapsed_ms: u64) -> Self {
        Self {
            elapsed_ms,
            rows: Rows::Summarized { row_count },
        }
    }

    /// Elapsed wall-clock time for this execution, in milliseconds.
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    /// Row count, available in both states.
    pub fn row_count(&self) -> u64 {
        match &self.rows {
            Rows::Captured { rows, .. } => rows.len() as u64,
            Rows::Summarized { row_count } => *row_count,
        }
    }

    /// Column names and rows, present only for a [`Rows::Captured`] state.
    pub fn rows(&self) -> Option<(&[String], &[Vec<Option<String>>])> {
        match &self.rows {
            Rows::Captured { columns, rows } => Some((columns, rows)),
            Rows::Summarized { .. } => None,
        }
    }

    /// True when this capture retains its full row payload.
    pub fn is_captured(&self) -> bool {
        matches!(self.rows, Rows::Captured { .. })
    }
}
