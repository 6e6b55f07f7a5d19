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

//! Normalized query text, the deduplication key for result buckets.

use std::fmt;

/// A SQL query in canonical form.
///
/// Normalization collapses whitespace runs (including line breaks) to single
/// spaces, trims the ends, strips one trailing semicolon, and upper-cases a
/// leading `select` keyword so keyword casing does not split buckets. Two
/// `Query` values are equal iff their normalized text is equal; the
/// normalized text is also what gets submitted to the database.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Query {
    text: String,
}

impl Query {
    /// Normalize raw SQL text into its canonical form.
    pub fn new(raw: &str) -> Self {
        let mut text = String::with_capacity(raw.len());
        let mut pending_space = false;
        for ch in raw.trim().chars() {
            if ch.is_whitespace() {
                pending_space = true;
            } else {
                if pending_space && !text.is_empty() {
                    text.push(' ');
                }
                pending_space = false;
                text.push(ch);
            }
        }
        if text.ends_with(';') {
            text.pop();
            text.truncate(text.trim_end().len());
        }
        fold_select_keyword(&mut text);
        Self { text }
    }

    /// The normalized query text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Consume the query, yielding its normalized text.
    pub fn into_text(self) -> String {
        self.text
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Upper-case a leading `select` keyword in place.
///
/// Folding is limited to the keyword: case differences inside the statement
/// body (string literals in particular) are significant and must not be
/// conflated.
fn fold_select_keyword(text: &mut String) {
    const KEYWORD: &str = "SELECT";
    let leading = match text.get(..KEYWORD.len()) {
        Some(leading) => leading,
        None => return,
    };
    if leading.eq_ignore_ascii_case(KEYWORD)
        && text[KEYWORD.len()..].chars().next().map_or(true, |c| c == ' ')
    {
        text.replace_range(..KEYWORD.len(), KEYWORD);
    }
}
