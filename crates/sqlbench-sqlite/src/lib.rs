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

//! SQLite adapter for the SQLBench executor boundary.
//!
//! [`SqliteDriver`] interprets the credentials' service identifier as a
//! database path (`:memory:` for an in-memory database); user, password,
//! host, and port are meaningless for an embedded engine and are ignored.
//!
//! The prefetch hint is accepted and ignored: SQLite reads rows from local
//! storage with no network round trip to amortize. The hint still flows
//! through the trait so drivers that do buffer per round trip can use it.

use rusqlite::types::ValueRef;
use rusqlite::Connection;
use sqlbench_core::{BenchError, Credentials, Driver, Executor, RowSet};

/// Opens SQLite sessions from a database path.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteDriver;

impl Driver for SqliteDriver {
    fn open(&self, credentials: &Credentials) -> Result<Box<dyn Executor>, BenchError> {
        let connection = if credentials.service == ":memory:" {
            Connection::open_in_memory()
        } else {
            Connection::open(&credentials.service)
        }
        .map_err(|err| BenchError::connection(err.to_string()))?;
        Ok(Box::new(SqliteExecutor {
            connection: Some(connection),
        }))
    }
}

/// One open SQLite session.
pub struct SqliteExecutor {
    connection: Option<Connection>,
}

impl SqliteExecutor {
    fn connection(&self, sql: &str) -> Result<&Connection, BenchError> {
        self.connection
            .as_ref()
            .ok_or_else(|| BenchError::execution(sql, "session is closed"))
    }
}

impl Executor for SqliteExecutor {
    fn execute(&mut self, sql: &str, _prefetch_rows: usize) -> Result<RowSet, BenchError> {
        let connection = self.connection(sql)?;
        let mut statement = connection
            .prepare(sql)
            .map_err(|err| BenchError::execution(sql, err.to_string()))?;
        let columns: Vec<String> = statement
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        let column_count = columns.len();

        let mut rows = Vec::new();
        let mut cursor = statement
            .query([])
            .map_err(|err| BenchError::execution(sql, err.to_string()))?;
        loop {
            let row = cursor
                .next()
                .map_err(|err| BenchError::execution(sql, err.to_string()))?;
            let Some(row) = row else { break };
            let mut cells = Vec::with_capacity(column_count);
            for i in 0..column_count {
                let value = row
                    .get_ref(i)
                    .map_err(|err| BenchError::execution(sql, err.to_string()))?;
                cells.push(stringify(value));
            }
            rows.push(cells);
        }
        Ok(RowSet { columns, rows })
    }

    fn scrollable_row_count(&mut self, sql: &str) -> Result<u64, BenchError> {
        let connection = self.connection(sql)?;
        let mut statement = connection
            .prepare(sql)
            .map_err(|err| BenchError::execution(sql, err.to_string()))?;
        let mut cursor = statement
            .query([])
            .map_err(|err| BenchError::execution(sql, err.to_string()))?;
        let mut count = 0u64;
        while cursor
            .next()
            .map_err(|err| BenchError::execution(sql, err.to_string()))?
            .is_some()
        {
            count += 1;
        }
        Ok(count)
    }

    fn close(&mut self) -> Result<(), BenchError> {
        match self.connection.take() {
            Some(connection) => connection
                .close()
                .map_err(|(_, err)| BenchError::connection(err.to_string())),
            None => Ok(()),
        }
    }
}

/// Render one SQLite value as its nullable string form.
fn stringify(value: ValueRef<'_>) -> Option<String> {
    match value {
        ValueRef::Null => None,
        ValueRef::Integer(v) => Some(v.to_string()),
        ValueRef::Real(v) => Some(v.to_string()),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            Some(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}
