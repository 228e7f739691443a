//! Database library providing the Cassandra/ScyllaDB session layer
//!
//! This library owns everything that talks to the cluster: connection
//! configuration, session lifecycle, identifier quoting, statement values and
//! row decoding. Domain crates only see the [`cassandra::CqlSession`] trait.
//!
//! # Features
//!
//! - `cassandra` (default) - Cassandra/ScyllaDB support via the `scylla` driver
//! - `config` - `core_config::FromEnv` support for [`cassandra::ClusterConfig`]
//! - `mock` - exports `MockCqlSession` for unit tests in downstream crates
//! - `all` - `cassandra` + `config`
//!
//! # Example
//!
//! ```ignore
//! use database::cassandra::{self, ClusterConfig, CqlSession, CqlStatement};
//!
//! let config = ClusterConfig::new(vec!["127.0.0.1:9042"])
//!     .with_credentials("cassandra", "cassandra")
//!     .with_auth_keyspace("system");
//! let session = cassandra::connect(&config).await?;
//!
//! let rows = session
//!     .execute(CqlStatement::new("SELECT release_version FROM system.local"))
//!     .await?;
//!
//! session.close();
//! ```

// Always available modules
pub mod common;

#[cfg(feature = "cassandra")]
pub mod cassandra;

pub use common::{RetryConfig, retry, retry_when, retry_with_backoff};

#[cfg(feature = "cassandra")]
pub use cassandra::{CassandraError, CassandraResult};
