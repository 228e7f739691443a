use std::time::Instant;

use super::cql::CqlStatement;
use super::error::CassandraResult;
use super::row;
use super::session::CqlSession;

const LOCAL_VERSION_QUERY: &str = "SELECT release_version FROM system.local";

/// Health check status for the cluster
#[derive(Debug, Clone)]
pub struct HealthStatus {
    /// Whether the coordinator answered
    pub healthy: bool,
    /// Error details when unhealthy
    pub message: Option<String>,
    /// Round-trip time in milliseconds
    pub response_time_ms: u64,
    /// Release version reported by the coordinator
    pub version: Option<String>,
}

/// Check the cluster answers a trivial query
pub async fn check_health(session: &dyn CqlSession) -> bool {
    session
        .execute(CqlStatement::new(LOCAL_VERSION_QUERY))
        .await
        .is_ok()
}

/// Check the cluster with timing and version details
///
/// # Example
/// ```ignore
/// use database::cassandra::{connect, check_health_detailed};
///
/// let session = connect(&config).await?;
/// let status = check_health_detailed(&session).await;
/// if !status.healthy {
///     eprintln!("cluster unhealthy: {:?}", status.message);
/// }
/// ```
pub async fn check_health_detailed(session: &dyn CqlSession) -> HealthStatus {
    let start = Instant::now();
    let result = session.execute(CqlStatement::new(LOCAL_VERSION_QUERY)).await;
    let response_time_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(rows) => HealthStatus {
            healthy: true,
            message: None,
            response_time_ms,
            version: rows.first().and_then(|r| row::text(r, 0, "release_version").ok()),
        },
        Err(e) => HealthStatus {
            healthy: false,
            message: Some(e.to_string()),
            response_time_ms,
            version: None,
        },
    }
}

/// Identity of the coordinator node the session talks to
#[derive(Debug, Clone, Default)]
pub struct ClusterInfo {
    pub cluster_name: Option<String>,
    pub datacenter: Option<String>,
    pub rack: Option<String>,
    pub release_version: Option<String>,
}

pub async fn get_cluster_info(session: &dyn CqlSession) -> CassandraResult<ClusterInfo> {
    let rows = session
        .execute(CqlStatement::new(
            "SELECT cluster_name, data_center, rack, release_version FROM system.local",
        ))
        .await?;

    let Some(first) = rows.first() else {
        return Ok(ClusterInfo::default());
    };

    Ok(ClusterInfo {
        cluster_name: row::text(first, 0, "cluster_name").ok(),
        datacenter: row::text(first, 1, "data_center").ok(),
        rack: row::text(first, 2, "rack").ok(),
        release_version: row::text(first, 3, "release_version").ok(),
    })
}
