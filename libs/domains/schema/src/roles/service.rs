use std::sync::Arc;
use tracing::{info, instrument};

use super::models::Role;
use super::repository::RoleRepository;
use crate::error::SchemaResult;
use crate::reconcile::{Plan, ResourceState, ensure_same_identity, found};

/// Role lifecycle, mirroring [`crate::keyspaces::KeyspaceService`]
#[derive(Clone)]
pub struct RoleService<R: RoleRepository> {
    repository: Arc<R>,
}

impl<R: RoleRepository> RoleService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    #[instrument(skip(self, desired), fields(role = %desired.role))]
    pub async fn create(&self, desired: Role) -> SchemaResult<ResourceState<Role>> {
        self.repository.create(&desired).await?;
        let current = self.repository.get(&desired.role).await?;
        Ok(ResourceState::applied(current))
    }

    /// `None` when the role was dropped outside this system
    #[instrument(skip(self))]
    pub async fn read(&self, name: &str) -> SchemaResult<Option<ResourceState<Role>>> {
        let current = found(self.repository.get(name).await)?;
        if current.is_none() {
            info!("Role no longer exists");
        }
        Ok(current.map(ResourceState::observed))
    }

    #[instrument(skip(self))]
    pub async fn import(&self, name: &str) -> SchemaResult<ResourceState<Role>> {
        let current = self.repository.get(name).await?;
        Ok(ResourceState::observed(current))
    }

    /// Only the flags change; memberships are reported as read back
    #[instrument(skip(self, desired), fields(role = %desired.role))]
    pub async fn update(&self, prior_name: &str, desired: Role) -> SchemaResult<ResourceState<Role>> {
        ensure_same_identity(prior_name, &desired.role)?;
        self.repository.update(&desired).await?;
        let current = self.repository.get(&desired.role).await?;
        Ok(ResourceState::applied(current))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, name: &str) -> SchemaResult<()> {
        self.repository.delete(name).await
    }

    #[instrument(skip(self, desired), fields(role = %desired.role))]
    pub async fn plan(&self, desired: Role) -> SchemaResult<Plan<Role>> {
        let current = found(self.repository.get(&desired.role).await)?;
        Ok(Plan::new(desired, current))
    }

    #[instrument(skip(self, desired), fields(role = %desired.role))]
    pub async fn reconcile(&self, desired: Role) -> SchemaResult<ResourceState<Role>> {
        match self.plan(desired).await? {
            Plan::Create { desired } => self.create(desired).await,
            Plan::Update { desired, drift, .. } => {
                info!(?drift, "Role drifted from desired state");
                let name = desired.role.clone();
                self.update(&name, desired).await
            }
            Plan::NoChange { current } => Ok(ResourceState::observed(current)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SchemaError;
    use crate::roles::repository::MockRoleRepository;

    #[tokio::test]
    async fn test_create_with_defaults() {
        let mut repo = MockRoleRepository::new();
        repo.expect_create()
            .withf(|r| !r.can_login && !r.is_superuser)
            .times(1)
            .returning(|_| Ok(()));
        repo.expect_get().returning(|name| Ok(Role::new(name)));

        let state = RoleService::new(repo).create(Role::new("r1")).await.unwrap();
        assert_eq!(state.id, "r1");
        assert!(!state.value.can_login);
        assert!(!state.value.is_superuser);
        assert!(state.value.member_of.is_empty());
    }

    #[tokio::test]
    async fn test_update_flag_only() {
        let mut repo = MockRoleRepository::new();
        repo.expect_update()
            .withf(|r| r.is_superuser && !r.can_login)
            .times(1)
            .returning(|_| Ok(()));
        repo.expect_get()
            .returning(|name| Ok(Role::new(name).with_superuser(true)));

        let state = RoleService::new(repo)
            .update("r1", Role::new("r1").with_superuser(true))
            .await
            .unwrap();
        assert!(state.value.is_superuser);
        assert!(!state.value.can_login);
    }

    #[tokio::test]
    async fn test_update_rejects_rename() {
        let mut repo = MockRoleRepository::new();
        repo.expect_update().never();

        let err = RoleService::new(repo)
            .update("r1", Role::new("r2"))
            .await
            .unwrap_err();
        assert!(matches!(err, SchemaError::IdentityChange { ref from, ref to } if from == "r1" && to == "r2"));
    }

    #[tokio::test]
    async fn test_read_missing_role() {
        let mut repo = MockRoleRepository::new();
        repo.expect_get()
            .returning(|name| Err(SchemaError::NotFound(name.to_string())));

        let service = RoleService::new(repo);
        assert!(service.read("ghost").await.unwrap().is_none());
        assert_eq!(service.import("ghost").await.unwrap_err().to_string(), "not found");
    }

    #[tokio::test]
    async fn test_reconcile_ignores_membership_differences() {
        let mut repo = MockRoleRepository::new();
        repo.expect_get().times(1).returning(|name| {
            let mut role = Role::new(name);
            role.member_of = vec!["readers".to_string()];
            Ok(role)
        });
        repo.expect_update().never();

        let state = RoleService::new(repo).reconcile(Role::new("r1")).await.unwrap();
        assert_eq!(state.value.member_of, vec!["readers"]);
    }

    #[tokio::test]
    async fn test_reconcile_updates_drifted_flags() {
        let mut repo = MockRoleRepository::new();
        let mut seq = mockall::Sequence::new();
        repo.expect_get()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|name| Ok(Role::new(name)));
        repo.expect_update()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        repo.expect_get()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|name| Ok(Role::new(name).with_login(true)));

        let state = RoleService::new(repo)
            .reconcile(Role::new("app").with_login(true))
            .await
            .unwrap();
        assert!(state.value.can_login);
        assert!(state.last_updated.is_some());
    }
}
