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

//! CLI command definitions and argument parsing.

use crate::commands;
use clap::{Args, Subcommand};
use sqlbench_core::DEFAULT_NUM_EXECUTIONS;
use std::path::PathBuf;

/// Top-level CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Benchmark queries against a database
    Run(RunArgs),
    /// Extract the SELECT statements a SQL script would contribute
    Extract(ExtractArgs),
}

impl Commands {
    /// Execute the command with the provided arguments.
    ///
    /// # Errors
    ///
    /// Returns an error message when the command cannot complete: no
    /// queries to run, connection failure, or an unreadable script passed
    /// to `extract`.
    pub fn execute(self) -> Result<(), String> {
        match self {
            Commands::Run(args) => commands::run::execute(args),
            Commands::Extract(args) => commands::extract::execute(args),
        }
    }
}

/// Arguments for the `run` command.
#[derive(Args)]
pub struct RunArgs {
    /// Database to benchmark: path to a SQLite database, or `:memory:`
    #[arg(short, long)]
    pub database: String,

    /// SQL script whose SELECT statements are benchmarked
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Inline query to benchmark (repeatable)
    #[arg(short, long = "query", value_name = "SQL")]
    pub queries: Vec<String>,

    /// Executions per query
    #[arg(short = 'n', long, default_value_t = DEFAULT_NUM_EXECUTIONS)]
    pub repeats: usize,

    /// Fixed row-prefetch size; skips auto-calibration
    #[arg(long, value_name = "ROWS")]
    pub fetch_size: Option<usize>,

    /// Print each query's first result set
    #[arg(short, long)]
    pub print_results: bool,

    /// Emit the report as JSON instead of text
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `extract` command.
#[derive(Args)]
pub struct ExtractArgs {
    /// SQL script to parse
    pub file: PathBuf,
}
