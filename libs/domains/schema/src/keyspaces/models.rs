use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum::EnumString;
use validator::{Validate, ValidationError};

use crate::reconcile::{Drift, Managed};

/// Prefix the schema catalog puts in front of built-in strategy classes
const LOCATOR_PACKAGE: &str = "org.apache.cassandra.locator.";

/// Replication strategy classes a keyspace may be declared with
///
/// Parsing is a closed set: the class is rendered into statement text, so
/// only the named variants can ever reach the cluster. `Other` holds a class
/// read back from the catalog that this system does not manage; it never
/// parses from user input and fails validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum ReplicationStrategy {
    #[default]
    SimpleStrategy,
    NetworkTopologyStrategy,
    /// ScyllaDB only
    EverywhereStrategy,
    /// System keyspaces only; the cluster rejects it for user keyspaces
    LocalStrategy,
    #[strum(disabled)]
    Other(String),
}

impl ReplicationStrategy {
    /// Parse a class as stored in the schema catalog
    ///
    /// Accepts short names and `org.apache.cassandra.locator.`-qualified names.
    /// Anything else is kept verbatim as `Other`.
    pub fn parse_class(class: &str) -> Self {
        let short = class.strip_prefix(LOCATOR_PACKAGE).unwrap_or(class);
        Self::from_str(short).unwrap_or_else(|_| Self::Other(class.to_string()))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::SimpleStrategy => "SimpleStrategy",
            Self::NetworkTopologyStrategy => "NetworkTopologyStrategy",
            Self::EverywhereStrategy => "EverywhereStrategy",
            Self::LocalStrategy => "LocalStrategy",
            Self::Other(class) => class,
        }
    }
}

impl fmt::Display for ReplicationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ReplicationStrategy> for String {
    fn from(class: ReplicationStrategy) -> Self {
        match class {
            ReplicationStrategy::Other(class) => class,
            known => known.as_str().to_string(),
        }
    }
}

impl TryFrom<String> for ReplicationStrategy {
    type Error = strum::ParseError;

    fn try_from(class: String) -> Result<Self, Self::Error> {
        class.parse()
    }
}

fn known_replication_class(class: &ReplicationStrategy) -> Result<(), ValidationError> {
    match class {
        ReplicationStrategy::Other(_) => Err(ValidationError::new("replication_class")
            .with_message("replication class is not supported for managed keyspaces".into())),
        _ => Ok(()),
    }
}

fn default_durable_writes() -> bool {
    true
}

fn default_replication_factor() -> u32 {
    1
}

/// A keyspace as declared by the user and as read back from the cluster
///
/// `name` is the identity; renaming means dropping and recreating.
/// Omitted attributes take their defaults: durable writes on,
/// `SimpleStrategy`, replication factor 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Keyspace {
    #[validate(length(min = 1, message = "keyspace name must not be empty"))]
    pub name: String,

    #[serde(default = "default_durable_writes")]
    pub durable_writes: bool,

    #[serde(default)]
    #[validate(custom(function = "known_replication_class"))]
    pub replication_class: ReplicationStrategy,

    /// Reads as 0 when the catalog carries no single factor: no
    /// `replication_factor` entry and datacenters that disagree
    #[serde(default = "default_replication_factor")]
    #[validate(range(min = 1, max = 64, message = "replication factor must be between 1 and 64"))]
    pub replication_factor: u32,
}

impl Keyspace {
    /// A keyspace with default settings
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            durable_writes: default_durable_writes(),
            replication_class: ReplicationStrategy::default(),
            replication_factor: default_replication_factor(),
        }
    }

    pub fn with_replication(mut self, class: ReplicationStrategy, factor: u32) -> Self {
        self.replication_class = class;
        self.replication_factor = factor;
        self
    }

    pub fn with_durable_writes(mut self, durable_writes: bool) -> Self {
        self.durable_writes = durable_writes;
        self
    }
}

impl Managed for Keyspace {
    fn id(&self) -> &str {
        &self.name
    }

    fn drift_from(&self, actual: &Self) -> Vec<Drift> {
        // A factor of 0 was not read from the catalog, so there is nothing to compare.
        let factor = if actual.replication_factor == 0 {
            None
        } else {
            Drift::compare(
                "replication_factor",
                &self.replication_factor,
                &actual.replication_factor,
            )
        };

        [
            Drift::compare("durable_writes", &self.durable_writes, &actual.durable_writes),
            Drift::compare(
                "replication_class",
                &self.replication_class,
                &actual.replication_class,
            ),
            factor,
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}
