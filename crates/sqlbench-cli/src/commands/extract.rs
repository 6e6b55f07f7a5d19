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

//! Extract command - lists the SELECT statements found in a script file.

use crate::cli::ExtractArgs;

/// Execute the `extract` command.
pub fn execute(args: ExtractArgs) -> Result<(), String> {
    let statements =
        sqlbench_script::extract_statements(&args.file).map_err(|err| err.to_string())?;
    for statement in &statements {
        println!("{statement}");
    }
    Ok(())
}
