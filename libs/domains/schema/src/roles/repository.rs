use async_trait::async_trait;
use database::cassandra::{CassandraResult, ClusterSession, CqlSession, Row, row};
use std::sync::Arc;
use tracing::{debug, info, instrument};
use validator::Validate;

use super::models::Role;
use super::statements;
use crate::error::{SchemaError, SchemaResult};

/// Repository trait for roles
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Read a role, including its memberships
    async fn get(&self, name: &str) -> SchemaResult<Role>;

    /// Create a role with the given flags
    async fn create(&self, role: &Role) -> SchemaResult<()>;

    /// Restate the login and superuser flags
    async fn update(&self, role: &Role) -> SchemaResult<()>;

    /// Drop a role
    async fn delete(&self, name: &str) -> SchemaResult<()>;
}

/// Role repository reading `<auth_keyspace>.roles`
#[derive(Clone)]
pub struct ScyllaRoleRepository {
    session: Arc<dyn CqlSession>,
    auth_keyspace: String,
}

impl ScyllaRoleRepository {
    pub fn new(session: Arc<dyn CqlSession>, auth_keyspace: impl Into<String>) -> Self {
        Self {
            session,
            auth_keyspace: auth_keyspace.into(),
        }
    }

    /// Use the auth keyspace the session was configured with
    pub fn for_cluster(session: Arc<ClusterSession>) -> Self {
        let auth_keyspace = session.auth_keyspace().to_string();
        Self::new(session, auth_keyspace)
    }
}

#[async_trait]
impl RoleRepository for ScyllaRoleRepository {
    #[instrument(skip(self), fields(auth_keyspace = %self.auth_keyspace))]
    async fn get(&self, name: &str) -> SchemaResult<Role> {
        let rows = self
            .session
            .execute(statements::select(&self.auth_keyspace, name))
            .await?;
        let Some(first) = rows.first() else {
            debug!("Role not in auth keyspace");
            return Err(SchemaError::NotFound(name.to_string()));
        };
        Ok(decode_role(first)?)
    }

    #[instrument(skip(self, role), fields(role = %role.role))]
    async fn create(&self, role: &Role) -> SchemaResult<()> {
        role.validate()?;
        self.session.execute(statements::create(role)).await?;
        info!(
            can_login = role.can_login,
            is_superuser = role.is_superuser,
            "Created role"
        );
        Ok(())
    }

    #[instrument(skip(self, role), fields(role = %role.role))]
    async fn update(&self, role: &Role) -> SchemaResult<()> {
        role.validate()?;
        self.session.execute(statements::alter(role)).await?;
        info!(
            can_login = role.can_login,
            is_superuser = role.is_superuser,
            "Altered role"
        );
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, name: &str) -> SchemaResult<()> {
        self.session.execute(statements::drop(name)).await?;
        info!("Dropped role");
        Ok(())
    }
}

fn decode_role(r: &Row) -> CassandraResult<Role> {
    Ok(Role {
        role: row::text(r, 0, "role")?,
        can_login: row::boolean(r, 1, "can_login")?,
        is_superuser: row::boolean(r, 2, "is_superuser")?,
        member_of: row::text_set(r, 3, "member_of")?,
    })
}
