use scylla::client::execution_profile::ExecutionProfile;
use scylla::client::session::Session;
use scylla::client::session_builder::SessionBuilder;
use scylla::policies::host_filter::AllowListHostFilter;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};

use super::config::ClusterConfig;
use super::error::{CassandraError, CassandraResult};
use super::session::ClusterSession;
use crate::common::{RetryConfig, retry_when};

/// Open a session to exactly the configured contact points
///
/// The driver is restricted to the given hosts (allow-list host filter) and
/// does not fetch schema metadata, so startup never depends on topology
/// gossip. Fails without retrying on an unresolvable host, a refused
/// connection or rejected credentials.
///
/// Each call creates an independent session; create at most one per
/// configuration.
///
/// # Example
/// ```ignore
/// use database::cassandra::{ClusterConfig, connect};
///
/// let config = ClusterConfig::new(vec!["127.0.0.1:9042"]).with_credentials("cassandra", "cassandra");
/// let session = connect(&config).await?;
/// ```
#[instrument(skip(config), fields(contact_points = ?config.contact_points))]
pub async fn connect(config: &ClusterConfig) -> CassandraResult<ClusterSession> {
    config.validate()?;
    info!("Connecting to cluster");

    let host_filter = AllowListHostFilter::new(config.contact_points.iter().map(String::as_str))
        .map_err(|e| {
            CassandraError::Configuration(format!("cannot resolve contact points: {}", e))
        })?;

    let profile = ExecutionProfile::builder()
        .request_timeout(Some(Duration::from_secs(config.request_timeout_secs)))
        .build();

    let mut builder = SessionBuilder::new()
        .known_nodes(&config.contact_points)
        .connection_timeout(Duration::from_secs(config.connect_timeout_secs))
        .host_filter(Arc::new(host_filter))
        .fetch_schema_metadata(false)
        .default_execution_profile_handle(profile.into_handle());

    if let Some((username, password)) = config.credentials() {
        builder = builder.user(username, password);
    }

    let session: Session = builder.build().await.inspect_err(|e| {
        warn!(error = %e, "Session creation failed");
    })?;

    info!(auth_keyspace = %config.auth_keyspace, "Connected to cluster");
    Ok(ClusterSession::new(
        session,
        config.contact_points.clone(),
        config.auth_keyspace.clone(),
    ))
}

/// Connect with exponential backoff
///
/// This is a caller policy (the session layer itself never retries). Useful
/// when the cluster may still be starting. Only connection failures are
/// retried; rejected credentials and configuration errors return at once.
/// `None` uses `RetryConfig::default()`.
///
/// # Example
/// ```ignore
/// use database::cassandra::{ClusterConfig, connect_with_retry};
/// use database::common::RetryConfig;
///
/// let config = ClusterConfig::new(vec!["127.0.0.1:9042"]);
/// let session = connect_with_retry(&config, Some(RetryConfig::new().with_max_retries(5))).await?;
/// ```
pub async fn connect_with_retry(
    config: &ClusterConfig,
    retry_config: Option<RetryConfig>,
) -> CassandraResult<ClusterSession> {
    // A bad configuration will not get better by waiting.
    config.validate()?;

    retry_when(
        || connect(config),
        retry_config.unwrap_or_default(),
        CassandraError::is_transient,
    )
    .await
}
