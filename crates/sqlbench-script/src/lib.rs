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

//! SQL script statement extraction.
//!
//! Reads a text file of unknown encoding and extracts every
//! `SELECT ... ;` statement as a normalized single-line string: the
//! match is case-insensitive and spans lines, embedded line breaks are
//! collapsed to single spaces, and the trailing semicolon is stripped.
//!
//! The charset is auto-detected from the byte stream (BOM first, then a
//! statistical guess); when detection is inconclusive the bytes are
//! decoded with replacement characters rather than rejected. Decoding
//! never fails outright.
//!
//! # Examples
//!
//! ```no_run
//! use std::path::Path;
//!
//! let statements = sqlbench_script::extract_statements(Path::new("queries.sql"))?;
//! for statement in &statements {
//!     println!("{statement}");
//! }
//! # Ok::<(), sqlbench_script::ScriptError>(())
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error produced when a statement source file cannot be read.
///
/// Extraction itself never fails: a file that contains no matching
/// statements yields an empty list.
#[derive(Debug, Clone, Error)]
#[error("failed to read statement file '{path}': {message}")]
pub struct ScriptError {
    /// The file that could not be read.
    pub path: PathBuf,
    /// Failure detail.
    pub message: String,
}

/// `SELECT ... ;` at line granularity: case-insensitive, lazy up to the
/// first terminating semicolon, spanning line breaks.
static STATEMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?mi)^[ \t]*SELECT\s+[\s\S]+?;[ \t]*\r?$").expect("statement pattern compiles")
});

/// Extract normalized `SELECT` statements from a script file.
///
/// # Errors
///
/// [`ScriptError`] when the file cannot be read; decoding and matching
/// never fail.
pub fn extract_statements(path: &Path) -> Result<Vec<String>, ScriptError> {
    let bytes = fs::read(path).map_err(|err| ScriptError {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    Ok(extract_from_bytes(&bytes))
}

/// Extract normalized `SELECT` statements from raw script bytes.
pub fn extract_from_bytes(bytes: &[u8]) -> Vec<String> {
    extract_from_text(&decode(bytes))
}

/// Extract normalized `SELECT` statements from decoded script text.
pub fn extract_from_text(text: &str) -> Vec<String> {
    STATEMENT
        .find_iter(text)
        .map(|m| normalize(m.as_str()))
        .collect()
}

/// Decode script bytes with charset auto-detection.
///
/// A UTF-8/UTF-16 BOM wins outright; otherwise the detector guesses from
/// byte statistics. Either way decoding is lossy rather than fallible.
fn decode(bytes: &[u8]) -> String {
    let encoding = match encoding_rs::Encoding::for_bom(bytes) {
        Some((encoding, _)) => encoding,
        None => {
            let mut detector = chardetng::EncodingDetector::new();
            detector.feed(bytes, true);
            detector.guess(None, true)
        }
    };
    let (text, _, _) = encoding.decode(bytes);
    text.into_owned()
}

/// Collapse a matched statement onto one line and strip its terminator.
fn normalize(statement: &str) -> String {
    let mut out = String::with_capacity(statement.len());
    let mut in_break = false;
    for ch in statement.chars() {
        if ch == '\n' || ch == '\r' {
            in_break = true;
        } else {
            if in_break && !out.is_empty() {
                out.push(' ');
            }
            in_break = false;
            out.push(ch);
        }
    }
    let trimmed = out.trim();
    trimmed.strip_suffix(';').unwrap_or(trimmed).trim_end().to_string()
}
