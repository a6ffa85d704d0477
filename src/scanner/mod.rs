//! Line heuristics for pulling value tuples out of `INSERT INTO ... VALUES` lines.
//!
//! This is deliberately not a SQL parser. A line qualifies when it contains
//! the insert marker and an opening parenthesis; rows are whatever the
//! non-greedy `\((.*?)\)` pattern matches after the first `VALUES`. Known
//! consequences:
//!
//! - statements spanning several lines only yield the rows on the marker line
//! - a `)` inside a quoted value ends the row early
//! - a `,` inside a quoted value splits the field in two

use crate::document::RowTuple;
use once_cell::sync::Lazy;
use regex::Regex;

mod lines;

pub use lines::{decode_ignoring_invalid, DumpLines};

/// Substring that marks a data insertion line
pub const INSERT_MARKER: &str = "INSERT INTO";

/// Keyword the value-tuple section follows
pub const VALUES_KEYWORD: &str = "VALUES";

/// One parenthesized group, shortest match
static ROW_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\((.*?)\)").unwrap());

/// Check whether a line should be scanned for rows.
pub fn is_insert_line(line: &str) -> bool {
    line.contains(INSERT_MARKER) && line.contains('(')
}

/// Text between the first and second `VALUES` keyword, trimmed.
///
/// Returns `None` when the line has no `VALUES` at all.
pub fn values_section(line: &str) -> Option<&str> {
    line.split(VALUES_KEYWORD).nth(1).map(str::trim)
}

/// Extract every row tuple from a single dump line, in order.
///
/// Lines that fail [`is_insert_line`] or have no `VALUES` section yield
/// nothing.
pub fn extract_rows(line: &str) -> Vec<RowTuple> {
    if !is_insert_line(line) {
        return Vec::new();
    }

    let Some(section) = values_section(line) else {
        return Vec::new();
    };

    ROW_RE
        .captures_iter(section)
        .filter_map(|caps| caps.get(1))
        .map(|group| split_fields(group.as_str()))
        .collect()
}

/// Split the raw text of one group into field tokens.
///
/// Each token is whitespace-trimmed, then every leading and trailing `'` is
/// removed. An empty group produces a single empty token.
pub fn split_fields(raw: &str) -> RowTuple {
    raw.split(',')
        .map(|field| field.trim().trim_matches('\'').to_string())
        .collect()
}
