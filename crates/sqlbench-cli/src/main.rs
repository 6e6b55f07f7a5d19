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

//! SQLBench command line interface.

use clap::Parser;
use sqlbench_cli::cli::Commands;
use std::process::ExitCode;

/// SQLBench - SQL query benchmarking harness
///
/// Executes SQL queries repeatedly against a live database, times every
/// execution, and reports per-query latency statistics (min, max, mean,
/// variance, standard deviation).
///
/// # Examples
///
/// ```bash
/// # Benchmark the statements in a script, 10 executions each
/// sqlbench run --database bench.db --file queries.sql
///
/// # Benchmark one inline query, printing its first result set
/// sqlbench run --database bench.db --query "SELECT count(1) FROM orders" --print-results
///
/// # List the statements a script would contribute
/// sqlbench extract queries.sql
/// ```
#[derive(Parser)]
#[command(name = "sqlbench")]
#[command(author, version, about = "SQL query benchmarking harness", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
