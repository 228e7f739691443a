//! Schema Domain
//!
//! Declarative management of keyspaces and roles on a Cassandra-protocol
//! cluster (ScyllaDB or Apache Cassandra). Each object kind is reconciled
//! independently against the live catalog; nothing is cached between calls.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │   Service   │  ← Lifecycle, plan/drift, identity checks
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← One statement per operation, row decoding
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Statements  │  ← Quoted identifiers, bound or typed values
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ CqlSession  │  ← database::cassandra
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use database::cassandra::{ClusterConfig, connect};
//! use domain_schema::{Keyspace, KeyspaceService, ScyllaKeyspaceRepository};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClusterConfig::new(vec!["127.0.0.1:9042"]);
//! let session = Arc::new(connect(&config).await?);
//!
//! let service = KeyspaceService::new(ScyllaKeyspaceRepository::new(session.clone()));
//! let state = service.reconcile(Keyspace::new("ks1")).await?;
//! println!("{} replicated {}x", state.id, state.value.replication_factor);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod keyspaces;
pub mod reconcile;
pub mod roles;

// Re-export commonly used types
pub use error::{SchemaError, SchemaResult};
pub use keyspaces::{
    Keyspace, KeyspaceRepository, KeyspaceService, ReplicationStrategy, ScyllaKeyspaceRepository,
};
pub use reconcile::{Drift, Managed, Plan, ResourceState};
pub use roles::{Role, RoleRepository, RoleService, ScyllaRoleRepository};
