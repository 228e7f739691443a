//! ScyllaDB test infrastructure
//!
//! Provides a `TestScylla` helper that starts a single-node ScyllaDB with
//! password authentication enabled, so role management works against it.

use std::sync::Arc;

use database::cassandra::{ClusterConfig, ClusterSession, connect};
use database::{RetryConfig, retry_with_backoff};
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::scylladb::ScyllaDB;

const CQL_PORT: u16 = 9042;

/// Superuser ScyllaDB creates when `PasswordAuthenticator` is enabled
pub const SUPERUSER: &str = "cassandra";

/// Roles table location on ScyllaDB 6 and later
pub const AUTH_KEYSPACE: &str = "system";

/// Test ScyllaDB wrapper that ensures proper cleanup
///
/// The container is stopped and removed when this struct is dropped.
///
/// # Example
///
/// ```no_run
/// use test_utils::TestScylla;
///
/// # async fn example() {
/// let scylla = TestScylla::new().await;
/// let session = scylla.session();
/// // Hand `session` to a repository
/// # }
/// ```
pub struct TestScylla {
    #[allow(dead_code)]
    container: ContainerAsync<ScyllaDB>,
    session: Arc<ClusterSession>,
    pub contact_point: String,
}

impl TestScylla {
    /// Start a container and open an authenticated session to it
    pub async fn new() -> Self {
        // 6.x keeps auth tables in `system` (auth v2)
        let image = ScyllaDB::default().with_tag("6.2").with_cmd([
            "--smp",
            "1",
            "--overprovisioned",
            "1",
            "--authenticator",
            "PasswordAuthenticator",
            "--authorizer",
            "CassandraAuthorizer",
        ]);

        let container = image
            .start()
            .await
            .expect("Failed to start ScyllaDB container");

        let host_port = container
            .get_host_port_ipv4(CQL_PORT)
            .await
            .expect("Failed to get ScyllaDB port");

        let contact_point = format!("127.0.0.1:{}", host_port);
        let config = Self::config_for(&contact_point);

        // The default superuser appears a few seconds after the CQL port opens,
        // so credential rejections are retried here too.
        let retry = RetryConfig::new()
            .with_max_retries(10)
            .with_initial_delay(500)
            .with_max_delay(5000);

        let session = retry_with_backoff(|| connect(&config), retry)
            .await
            .expect("Failed to connect to ScyllaDB");

        tracing::info!(port = host_port, "Test ScyllaDB ready");

        Self {
            container,
            session: Arc::new(session),
            contact_point,
        }
    }

    /// Shared session for repositories under test
    pub fn session(&self) -> Arc<ClusterSession> {
        self.session.clone()
    }

    /// Configuration matching the container, for opening extra sessions
    pub fn config(&self) -> ClusterConfig {
        Self::config_for(&self.contact_point)
    }

    fn config_for(contact_point: &str) -> ClusterConfig {
        ClusterConfig::new(vec![contact_point.to_string()])
            .with_credentials(SUPERUSER, SUPERUSER)
            .with_auth_keyspace(AUTH_KEYSPACE)
    }
}

impl Drop for TestScylla {
    fn drop(&mut self) {
        tracing::debug!("Cleaning up test ScyllaDB container");
    }
}
