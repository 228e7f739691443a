//! Keyspaces: declared in desired-state documents, read back from
//! `system_schema.keyspaces`

mod models;
mod repository;
mod service;
pub mod statements;

pub use models::{Keyspace, ReplicationStrategy};
pub use repository::{KeyspaceRepository, ScyllaKeyspaceRepository};
pub use service::KeyspaceService;

#[cfg(test)]
pub use repository::MockKeyspaceRepository;
