use std::sync::Arc;
use tracing::{info, instrument};

use super::models::Keyspace;
use super::repository::KeyspaceRepository;
use crate::error::SchemaResult;
use crate::reconcile::{Plan, ResourceState, ensure_same_identity, found};

/// Keyspace lifecycle: the create/read/update/delete contract the
/// orchestrator drives, plus planning and one-shot reconciliation
#[derive(Clone)]
pub struct KeyspaceService<R: KeyspaceRepository> {
    repository: Arc<R>,
}

impl<R: KeyspaceRepository> KeyspaceService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create the keyspace and return the state read back from the cluster
    #[instrument(skip(self, desired), fields(keyspace = %desired.name))]
    pub async fn create(&self, desired: Keyspace) -> SchemaResult<ResourceState<Keyspace>> {
        self.repository.create(&desired).await?;
        let current = self.repository.get(&desired.name).await?;
        Ok(ResourceState::applied(current))
    }

    /// Refresh state from the cluster
    ///
    /// `None` means the keyspace was removed outside this system.
    #[instrument(skip(self))]
    pub async fn read(&self, name: &str) -> SchemaResult<Option<ResourceState<Keyspace>>> {
        let current = found(self.repository.get(name).await)?;
        if current.is_none() {
            info!("Keyspace no longer exists");
        }
        Ok(current.map(ResourceState::observed))
    }

    /// Adopt an existing keyspace by name
    #[instrument(skip(self))]
    pub async fn import(&self, name: &str) -> SchemaResult<ResourceState<Keyspace>> {
        let current = self.repository.get(name).await?;
        Ok(ResourceState::observed(current))
    }

    /// Restate every mutable attribute of the keyspace identified by `prior_name`
    ///
    /// A different `desired.name` is rejected; renames are delete + create.
    #[instrument(skip(self, desired), fields(keyspace = %desired.name))]
    pub async fn update(
        &self,
        prior_name: &str,
        desired: Keyspace,
    ) -> SchemaResult<ResourceState<Keyspace>> {
        ensure_same_identity(prior_name, &desired.name)?;
        self.repository.update(&desired).await?;
        let current = self.repository.get(&desired.name).await?;
        Ok(ResourceState::applied(current))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, name: &str) -> SchemaResult<()> {
        self.repository.delete(name).await
    }

    /// Compare desired state with the cluster without changing anything
    #[instrument(skip(self, desired), fields(keyspace = %desired.name))]
    pub async fn plan(&self, desired: Keyspace) -> SchemaResult<Plan<Keyspace>> {
        let current = found(self.repository.get(&desired.name).await)?;
        Ok(Plan::new(desired, current))
    }

    /// Plan, then apply whatever transition the plan calls for
    #[instrument(skip(self, desired), fields(keyspace = %desired.name))]
    pub async fn reconcile(&self, desired: Keyspace) -> SchemaResult<ResourceState<Keyspace>> {
        match self.plan(desired).await? {
            Plan::Create { desired } => self.create(desired).await,
            Plan::Update { desired, drift, .. } => {
                info!(?drift, "Keyspace drifted from desired state");
                let name = desired.name.clone();
                self.update(&name, desired).await
            }
            Plan::NoChange { current } => Ok(ResourceState::observed(current)),
        }
    }
}
