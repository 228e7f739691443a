//! Typed access to untyped result rows
//!
//! Rows arrive as `Vec<Option<CqlValue>>`. These helpers pull one column out
//! with the expected type and turn shape mismatches into
//! [`CassandraError::Decode`].

use std::collections::HashMap;

use scylla::value::{CqlValue, Row};

use super::error::{CassandraError, CassandraResult};

fn column<'a>(row: &'a Row, index: usize, name: &str) -> CassandraResult<Option<&'a CqlValue>> {
    row.columns
        .get(index)
        .map(Option::as_ref)
        .ok_or_else(|| CassandraError::Decode(format!("missing column '{}' at {}", name, index)))
}

fn as_text(value: &CqlValue) -> Option<&str> {
    match value {
        CqlValue::Text(s) | CqlValue::Ascii(s) => Some(s),
        _ => None,
    }
}

fn mismatch(name: &str, expected: &str, value: &CqlValue) -> CassandraError {
    CassandraError::Decode(format!(
        "column '{}' expected {}, got {:?}",
        name, expected, value
    ))
}

/// Non-null text column
pub fn text(row: &Row, index: usize, name: &str) -> CassandraResult<String> {
    match column(row, index, name)? {
        Some(value) => as_text(value)
            .map(str::to_string)
            .ok_or_else(|| mismatch(name, "text", value)),
        None => Err(CassandraError::Decode(format!("column '{}' is null", name))),
    }
}

/// Boolean column, null reads as `false`
pub fn boolean(row: &Row, index: usize, name: &str) -> CassandraResult<bool> {
    match column(row, index, name)? {
        Some(CqlValue::Boolean(b)) => Ok(*b),
        Some(value) => Err(mismatch(name, "boolean", value)),
        None => Ok(false),
    }
}

/// `map<text, text>` column, null reads as empty
pub fn text_map(row: &Row, index: usize, name: &str) -> CassandraResult<HashMap<String, String>> {
    match column(row, index, name)? {
        Some(CqlValue::Map(entries)) => entries
            .iter()
            .map(|(k, v)| match (as_text(k), as_text(v)) {
                (Some(k), Some(v)) => Ok((k.to_string(), v.to_string())),
                _ => Err(CassandraError::Decode(format!(
                    "column '{}' has a non-text map entry",
                    name
                ))),
            })
            .collect(),
        Some(value) => Err(mismatch(name, "map<text, text>", value)),
        None => Ok(HashMap::new()),
    }
}

/// `set<text>` or `list<text>` column in server order, null reads as empty
pub fn text_set(row: &Row, index: usize, name: &str) -> CassandraResult<Vec<String>> {
    match column(row, index, name)? {
        Some(CqlValue::Set(items)) | Some(CqlValue::List(items)) => items
            .iter()
            .map(|item| {
                as_text(item)
                    .map(str::to_string)
                    .ok_or_else(|| mismatch(name, "text element", item))
            })
            .collect(),
        Some(value) => Err(mismatch(name, "set<text>", value)),
        None => Ok(Vec::new()),
    }
}
