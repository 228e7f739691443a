use async_trait::async_trait;
use scylla::client::session::Session;
use scylla::value::Row;
use tracing::{debug, info, instrument};

use super::cql::CqlStatement;
use super::error::{CassandraError, CassandraResult};

/// The single I/O capability repositories depend on
///
/// Implemented by [`ClusterSession`]; unit tests substitute `MockCqlSession`
/// (enable the `mock` feature from other crates).
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait CqlSession: Send + Sync {
    /// Run one statement and return its rows (empty for DDL)
    async fn execute(&self, statement: CqlStatement) -> CassandraResult<Vec<Row>>;
}

/// An open, authenticated session to one configured set of contact points
///
/// Only [`super::connect`] creates one. Share it behind an `Arc` for
/// concurrent lifecycle calls; the driver's connection pool governs actual
/// parallelism. Release it with [`ClusterSession::close`].
pub struct ClusterSession {
    session: Session,
    contact_points: Vec<String>,
    auth_keyspace: String,
}

impl ClusterSession {
    pub(crate) fn new(session: Session, contact_points: Vec<String>, auth_keyspace: String) -> Self {
        Self {
            session,
            contact_points,
            auth_keyspace,
        }
    }

    /// Keyspace holding the `roles` table for this cluster
    pub fn auth_keyspace(&self) -> &str {
        &self.auth_keyspace
    }

    pub fn contact_points(&self) -> &[String] {
        &self.contact_points
    }

    /// Underlying driver session, for health probes
    pub fn driver(&self) -> &Session {
        &self.session
    }

    /// Release every connection held by this session
    ///
    /// Consumes the session, so it cannot be used or closed again. Call it on
    /// every exit path of the owning reconciliation; an `Arc` owner must
    /// unwrap first (see `Arc::into_inner`).
    pub fn close(self) {
        info!(contact_points = ?self.contact_points, "Closing cluster session");
        drop(self.session);
    }
}

impl std::fmt::Debug for ClusterSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClusterSession")
            .field("contact_points", &self.contact_points)
            .field("auth_keyspace", &self.auth_keyspace)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CqlSession for ClusterSession {
    #[instrument(skip_all, fields(cql = %statement.cql, bound = statement.values.len()))]
    async fn execute(&self, statement: CqlStatement) -> CassandraResult<Vec<Row>> {
        let result = self
            .session
            .query_unpaged(statement.cql, statement.values)
            .await?;

        if !result.is_rows() {
            debug!("Statement returned no rows");
            return Ok(Vec::new());
        }

        let rows_result = result
            .into_rows_result()
            .map_err(|e| CassandraError::Decode(e.to_string()))?;

        let rows = rows_result
            .rows::<Row>()
            .map_err(|e| CassandraError::Decode(e.to_string()))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| CassandraError::Decode(e.to_string()))?;

        debug!(rows = rows.len(), "Statement returned rows");
        Ok(rows)
    }
}
