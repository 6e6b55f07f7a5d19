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

//! Error types for the benchmarking engine.
//!
//! The harness is a best-effort measurement tool: failures are surfaced as
//! `Result` values so the caller can report them and continue with the next
//! query. No error here aborts a whole benchmark session — a failed `run`
//! leaves previously collected captures intact and reportable.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for benchmark operations.
#[derive(Debug, Clone, Error)]
pub enum BenchError {
    /// Failure to open the database session.
    ///
    /// Prior runner state (results, fetch-size cache) is untouched.
    #[error("connection error: {message}")]
    Connection {
        /// Driver-reported failure detail.
        message: String,
    },

    /// An operation requiring an active connection was invoked without one.
    #[error("no active connection: {message}")]
    Precondition {
        /// What was attempted.
        message: String,
    },

    /// A statement execution or row materialization failed.
    ///
    /// Aborts the remaining repeats of the `run` call that hit it; captures
    /// already collected for the query remain valid.
    #[error("execution error for '{query}': {message}")]
    Execution {
        /// The statement that failed.
        query: String,
        /// Driver-reported failure detail.
        message: String,
    },

    /// A statement source file could not be read or decoded.
    #[error("source read error for '{path}': {message}")]
    SourceRead {
        /// The file that failed.
        path: PathBuf,
        /// Failure detail.
        message: String,
    },
}

impl BenchError {
    /// Connection failure with the given detail.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Missing-connection precondition failure.
    pub fn precondition(message: impl Into<String>) -> Self {
        Self::Precondition {
            message: message.into(),
        }
    }

    /// Execution failure for a specific statement.
    pub fn execution(query: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Execution {
            query: query.into(),
            message: message.into(),
        }
    }

    /// Source-file read failure.
    pub fn source_read(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::SourceRead {
            path: path.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_context() {
        let err = BenchError::execution("SELECT 1", "table missing");
        assert_eq!(
            err.to_string(),
            "execution error for 'SELECT 1': table missing"
        );

        let err = BenchError::precondition("run");
        assert!(err.to_string().starts_with("no active connection"));
    }
}
