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

//! Run command - benchmarks queries and prints the statistics report.
//!
//! This is the reporting boundary for the harness's best-effort error
//! policy: an unreadable script degrades to an empty statement list, and
//! a query that fails mid-benchmark is reported and skipped while the
//! session moves on to the next query. Only having nothing to run at all,
//! or failing to connect, aborts the command.

use crate::cli::RunArgs;
use colored::Colorize;
use sqlbench_core::{BenchmarkRunner, Credentials};
use sqlbench_sqlite::SqliteDriver;

/// Execute the `run` command.
pub fn execute(args: RunArgs) -> Result<(), String> {
    let statements = collect_statements(&args);
    if statements.is_empty() {
        return Err("no queries to run; pass --file and/or --query".to_string());
    }

    let mut runner =
        BenchmarkRunner::new(Box::new(SqliteDriver)).with_print_results(args.print_results);

    println!("{} {}", "Connecting to".bold(), args.database);
    runner
        .connect(&Credentials::for_service(&args.database))
        .map_err(|err| err.to_string())?;

    for query in &statements {
        let fetch = match args.fetch_size {
            Some(size) => format!(", fetch size {size}"),
            None => String::new(),
        };
        println!(
            "{} ({} executions{}): {}",
            "Benchmarking".green().bold(),
            args.repeats,
            fetch,
            query
        );
        if let Err(err) = runner.run(query, args.repeats, args.fetch_size) {
            eprintln!("{} {err}", "Warning:".yellow().bold());
        }
    }

    if args.json {
        let report = serde_json::to_string_pretty(&runner.report())
            .map_err(|err| format!("failed to serialize report: {err}"))?;
        println!("{report}");
    } else {
        print!("{}", runner.report());
    }

    runner.disconnect();
    Ok(())
}

/// Gather statements from the script file (if any) and inline queries, in
/// that order. A script read failure is reported and contributes nothing.
fn collect_statements(args: &RunArgs) -> Vec<String> {
    let mut statements = Vec::new();
    if let Some(path) = &args.file {
        match sqlbench_script::extract_statements(path) {
            Ok(found) => {
                if found.is_empty() {
                    eprintln!(
                        "{} no SELECT statements found in {}",
                        "Warning:".yellow().bold(),
                        path.display()
                    );
                }
                statements.extend(found);
            }
            Err(err) => {
                eprintln!("{} {err}", "Warning:".yellow().bold());
            }
        }
    }
    statements.extend(args.queries.iter().cloned());
    statements
}
