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

//! Report data model and text rendering.
//!
//! Two renderings exist: the print-mode row dump of a query's first
//! captured execution (one line per row, column values aligned), and the
//! per-query summary block with the statistics from [`crate::stats`]. The
//! structs also serialize to JSON for machine consumption.

use crate::stats::QueryStatistics;
use serde::Serialize;
use std::fmt;

/// Per-query section of a benchmark report.
#[derive(Debug, Clone, Serialize)]
pub struct QueryReport {
    /// Normalized query text.
    pub query: String,
    /// Rows returned per execution, from the first capture.
    pub row_count: u64,
    /// Calibrated prefetch size, when auto-calibration ran.
    pub fetch_size: Option<usize>,
    /// Statistics over the bucket's elapsed times.
    pub statistics: QueryStatistics,
}

/// A complete benchmark report, queries in first-seen order.
#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkReport {
    /// One section per distinct query.
    pub queries: Vec<QueryReport>,
}

const RULE: &str = "---------------------------------------------";

impl fmt::Display for QueryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = &self.statistics;
        let times = stats
            .times_secs
            .iter()
            .map(|t| t.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(f, "{RULE}")?;
        writeln!(f, "Query: {}", self.query)?;
        writeln!(f, "Executions: {}", stats.executions)?;
        writeln!(f, "Rows fetched: {}", self.row_count)?;
        writeln!(f, "Times (seconds): {times}")?;
        writeln!(f, "Min time: {} seconds", stats.min_secs)?;
        writeln!(f, "Mean time: {} seconds", stats.mean_secs)?;
        writeln!(f, "Max time: {} seconds", stats.max_secs)?;
        writeln!(f, "Variance: {}", stats.variance)?;
        writeln!(f, "Std deviation: {}", stats.stddev)?;
        write!(f, "{RULE}")
    }
}

impl fmt::Display for BenchmarkReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for section in &self.queries {
            writeln!(f)?;
            writeln!(f, "{section}")?;
        }
        Ok(())
    }
}

/// Render captured rows for the print-mode side channel.
///
/// One line per row of `column: "value"` pairs joined by `;  `, each column
/// right-padded to the widest value seen for it in this result set so the
/// pairs line up. SQL NULL renders as `null`. The last column is never
/// padded.
pub fn render_rows(columns: &[String], rows: &[Vec<Option<String>>]) -> String {
    if columns.is_empty() {
        return String::new();
    }
    let mut widths = vec![0usize; columns.len() - 1];
    for row in rows {
        for (i, width) in widths.iter_mut().enumerate() {
            *width = (*width).max(cell(row, i).chars().count());
        }
    }
    let mut out = String::new();
    for row in rows {
        for (i, column) in columns.iter().enumerate() {
            if i > 0 {
                out.push_str(";  ");
                let pad = widths[i - 1].saturating_sub(cell(row, i - 1).chars().count());
                out.extend(std::iter::repeat(' ').take(pad));
            }
            out.push_str(column);
            out.push_str(": \"");
            out.push_str(cell(row, i));
            out.push('"');
        }
        out.push('\n');
    }
    out
}

fn cell(row: &[Option<String>], i: usize) -> &str {
    match row.get(i) {
        Some(Some(value)) => value,
        Some(None) => "null",
        None => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::Precision;

    fn report_for(elapsed_ms: &[u64], row_count: u64) -> QueryReport {
        QueryReport {
            query: "SELECT 1 FROM DUAL".into(),
            row_count,
            fetch_size: Some(1),
            statistics: QueryStatistics::from_elapsed(elapsed_ms, &Precision::default()),
        }
    }

    #[test]
    fn summary_block_lists_every_statistic() {
        let text = report_for(&[10, 20, 30], 1).to_string();
        assert!(text.contains("Query: SELECT 1 FROM DUAL"));
        assert!(text.contains("Executions: 3"));
        assert!(text.contains("Rows fetched: 1"));
        assert!(text.contains("Times (seconds): 0.010, 0.020, 0.030"));
        assert!(text.contains("Min time: 0.010 seconds"));
        assert!(text.contains("Mean time: 0.020 seconds"));
        assert!(text.contains("Max time: 0.030 seconds"));
        assert!(text.contains("Variance: 0.00010"));
        assert!(text.contains("Std deviation: 0.010"));
    }

    #[test]
    fn report_serializes_to_json() {
        let report = BenchmarkReport {
            queries: vec![report_for(&[10, 20, 30], 1)],
        };
        let json = serde_json::to_value(&report).unwrap();
        let section = &json["queries"][0];
        assert_eq!(section["query"], "SELECT 1 FROM DUAL");
        assert_eq!(section["statistics"]["mean_secs"], "0.020");
        assert_eq!(section["statistics"]["variance"], "0.00010");
    }

    #[test]
    fn rows_align_on_the_widest_value() {
        let columns = vec!["id".to_string(), "name".to_string()];
        let rows = vec![
            vec![Some("1".into()), Some("ada".into())],
            vec![Some("1234".into()), Some("grace".into())],
        ];
        let text = render_rows(&columns, &rows);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "id: \"1\";     name: \"ada\"");
        assert_eq!(lines[1], "id: \"1234\";  name: \"grace\"");
    }

    #[test]
    fn null_cells_render_as_null() {
        let columns = vec!["v".to_string()];
        let rows = vec![vec![None]];
        assert_eq!(render_rows(&columns, &rows), "v: \"null\"\n");
    }

    #[test]
    fn empty_metadata_renders_nothing() {
        assert_eq!(render_rows(&[], &[]), "");
    }
}
