//! Cassandra/ScyllaDB session layer
//!
//! Uses the `scylla` driver, which speaks the native protocol to both Apache
//! Cassandra and ScyllaDB.
//!
//! # Example
//!
//! ```ignore
//! use database::cassandra::{ClusterConfig, CqlSession, CqlStatement, connect, quote_identifier};
//!
//! let config = ClusterConfig::new(vec!["127.0.0.1:9042"])
//!     .with_credentials("cassandra", "cassandra");
//! let session = connect(&config).await?;
//!
//! // Identifiers are quoted, values are bound
//! session
//!     .execute(CqlStatement::new(format!("DROP KEYSPACE {}", quote_identifier("ks1"))))
//!     .await?;
//!
//! session.close();
//! ```

mod config;
mod connector;
mod cql;
mod error;
mod health;
pub mod row;
mod session;

pub use config::{ClusterConfig, DEFAULT_AUTH_KEYSPACE, DEFAULT_PORT, with_default_port};
pub use connector::{connect, connect_with_retry};
pub use cql::{CqlStatement, quote_identifier};
pub use error::{CassandraError, CassandraResult};
pub use health::{
    ClusterInfo, HealthStatus, check_health, check_health_detailed, get_cluster_info,
};
pub use session::{ClusterSession, CqlSession};

#[cfg(any(test, feature = "mock"))]
pub use session::MockCqlSession;

// Re-export scylla types for convenience
pub use scylla::value::{CqlValue, Row};
