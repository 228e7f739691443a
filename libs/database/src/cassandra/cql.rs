//! Statement text and bound values
//!
//! CQL does not allow identifiers (keyspace, table, role names) to be bound
//! as parameters, so they are the one piece of caller input spliced into
//! statement text. [`quote_identifier`] is the only way that happens.

use scylla::value::CqlValue;

/// Quote a CQL identifier so it is read back as exactly `name`
///
/// Every `"` is doubled and the result is wrapped in `"`. The output is a
/// single identifier token whatever `name` contains (quotes, whitespace,
/// semicolons, reserved words). Quoted identifiers are case-sensitive.
pub fn quote_identifier(name: &str) -> String {
    let mut quoted = String::with_capacity(name.len() + 2);
    quoted.push('"');
    for c in name.chars() {
        if c == '"' {
            quoted.push('"');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

/// A statement plus the values bound to its `?` markers
#[derive(Debug, Clone, PartialEq)]
pub struct CqlStatement {
    pub cql: String,
    pub values: Vec<CqlValue>,
}

impl CqlStatement {
    pub fn new(cql: impl Into<String>) -> Self {
        Self {
            cql: cql.into(),
            values: Vec::new(),
        }
    }

    /// Bind the next `?` marker to a text value
    pub fn bind_text(mut self, value: impl Into<String>) -> Self {
        self.values.push(CqlValue::Text(value.into()));
        self
    }

    /// Bind the next `?` marker to a boolean value
    pub fn bind_bool(mut self, value: bool) -> Self {
        self.values.push(CqlValue::Boolean(value));
        self
    }
}

impl std::fmt::Display for CqlStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.cql)
    }
}
