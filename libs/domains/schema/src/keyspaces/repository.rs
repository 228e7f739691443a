use async_trait::async_trait;
use database::cassandra::{CqlSession, Row, row};
use std::sync::Arc;
use tracing::{debug, info, instrument};
use validator::Validate;

use super::models::{Keyspace, ReplicationStrategy};
use super::statements;
use crate::error::{SchemaError, SchemaResult};

/// Repository trait for keyspaces
///
/// Every call is one round trip to the cluster; nothing is cached, so `get`
/// always reflects changes made outside this system.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyspaceRepository: Send + Sync {
    /// Read a keyspace from the schema catalog
    async fn get(&self, name: &str) -> SchemaResult<Keyspace>;

    /// Create a keyspace
    async fn create(&self, keyspace: &Keyspace) -> SchemaResult<()>;

    /// Restate replication and durability for an existing keyspace
    async fn update(&self, keyspace: &Keyspace) -> SchemaResult<()>;

    /// Drop a keyspace
    async fn delete(&self, name: &str) -> SchemaResult<()>;
}

/// Keyspace repository backed by a cluster session
#[derive(Clone)]
pub struct ScyllaKeyspaceRepository {
    session: Arc<dyn CqlSession>,
}

impl ScyllaKeyspaceRepository {
    pub fn new(session: Arc<dyn CqlSession>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl KeyspaceRepository for ScyllaKeyspaceRepository {
    #[instrument(skip(self))]
    async fn get(&self, name: &str) -> SchemaResult<Keyspace> {
        let rows = self.session.execute(statements::select(name)).await?;
        let Some(first) = rows.first() else {
            debug!("Keyspace not in schema catalog");
            return Err(SchemaError::NotFound(name.to_string()));
        };
        decode_keyspace(first)
    }

    #[instrument(skip(self, keyspace), fields(keyspace = %keyspace.name))]
    async fn create(&self, keyspace: &Keyspace) -> SchemaResult<()> {
        keyspace.validate()?;
        self.session.execute(statements::create(keyspace)).await?;
        info!(
            replication_class = %keyspace.replication_class,
            replication_factor = keyspace.replication_factor,
            "Created keyspace"
        );
        Ok(())
    }

    #[instrument(skip(self, keyspace), fields(keyspace = %keyspace.name))]
    async fn update(&self, keyspace: &Keyspace) -> SchemaResult<()> {
        keyspace.validate()?;
        self.session.execute(statements::alter(keyspace)).await?;
        info!(
            replication_class = %keyspace.replication_class,
            replication_factor = keyspace.replication_factor,
            durable_writes = keyspace.durable_writes,
            "Altered keyspace"
        );
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, name: &str) -> SchemaResult<()> {
        self.session.execute(statements::drop(name)).await?;
        info!("Dropped keyspace");
        Ok(())
    }
}

/// Decode `keyspace_name, durable_writes, replication`
fn decode_keyspace(r: &Row) -> SchemaResult<Keyspace> {
    let name = row::text(r, 0, "keyspace_name")?;
    let durable_writes = row::boolean(r, 1, "durable_writes")?;
    let replication = row::text_map(r, 2, "replication")?;

    let class = replication.get("class").map(String::as_str).unwrap_or_default();
    let replication_class = ReplicationStrategy::parse_class(class);

    let parse_factor = |key: &str, raw: &str| -> SchemaResult<u32> {
        raw.trim().parse().map_err(|_| {
            SchemaError::Decode(format!(
                "keyspace '{}' has non-numeric replication factor '{}' for '{}'",
                name, raw, key
            ))
        })
    };

    let replication_factor = match replication.get("replication_factor") {
        Some(raw) => parse_factor("replication_factor", raw)?,
        // The cluster expands a single factor into one entry per datacenter.
        None => {
            let mut per_dc = replication
                .iter()
                .filter(|(key, _)| key.as_str() != "class")
                .map(|(key, raw)| parse_factor(key, raw))
                .collect::<SchemaResult<Vec<u32>>>()?;
            per_dc.dedup();
            match per_dc.as_slice() {
                [factor] => *factor,
                _ => 0,
            }
        }
    };

    Ok(Keyspace {
        name,
        durable_writes,
        replication_class,
        replication_factor,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use database::cassandra::{CassandraError, CqlValue, MockCqlSession};

    fn keyspace_row(name: &str, durable: bool, replication: &[(&str, &str)]) -> Row {
        Row {
            columns: vec![
                Some(CqlValue::Text(name.to_string())),
                Some(CqlValue::Boolean(durable)),
                Some(CqlValue::Map(
                    replication
                        .iter()
                        .map(|(k, v)| (CqlValue::Text(k.to_string()), CqlValue::Text(v.to_string())))
                        .collect(),
                )),
            ],
        }
    }

    fn repository(session: MockCqlSession) -> ScyllaKeyspaceRepository {
        ScyllaKeyspaceRepository::new(Arc::new(session))
    }

    #[tokio::test]
    async fn test_get_decodes_catalog_row() {
        let mut session = MockCqlSession::new();
        session
            .expect_execute()
            .withf(|s| s.cql == statements::SELECT_KEYSPACE && s.values == vec![CqlValue::Text("ks1".to_string())])
            .times(1)
            .returning(|_| {
                Ok(vec![keyspace_row(
                    "ks1",
                    true,
                    &[
                        ("class", "org.apache.cassandra.locator.SimpleStrategy"),
                        ("replication_factor", "1"),
                    ],
                )])
            });

        let keyspace = repository(session).get("ks1").await.unwrap();
        assert_eq!(keyspace, Keyspace::new("ks1"));
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let mut session = MockCqlSession::new();
        session.expect_execute().returning(|_| Ok(vec![]));

        let err = repository(session).get("ks1").await.unwrap_err();
        assert!(matches!(err, SchemaError::NotFound(ref name) if name == "ks1"));
        assert_eq!(err.to_string(), "not found");
    }

    #[tokio::test]
    async fn test_get_uniform_datacenters_read_as_factor() {
        let mut session = MockCqlSession::new();
        session.expect_execute().returning(|_| {
            Ok(vec![keyspace_row(
                "ks_nts",
                true,
                &[
                    ("class", "org.apache.cassandra.locator.NetworkTopologyStrategy"),
                    ("datacenter1", "3"),
                    ("datacenter2", "3"),
                ],
            )])
        });

        let keyspace = repository(session).get("ks_nts").await.unwrap();
        assert_eq!(
            keyspace,
            Keyspace::new("ks_nts").with_replication(ReplicationStrategy::NetworkTopologyStrategy, 3)
        );
        assert!(keyspace.validate().is_ok());
    }

    #[tokio::test]
    async fn test_get_mixed_datacenters_read_zero() {
        let mut session = MockCqlSession::new();
        session.expect_execute().returning(|_| {
            Ok(vec![keyspace_row(
                "ks_multi_dc",
                true,
                &[
                    ("class", "org.apache.cassandra.locator.NetworkTopologyStrategy"),
                    ("dc1", "3"),
                    ("dc2", "2"),
                ],
            )])
        });

        let keyspace = repository(session).get("ks_multi_dc").await.unwrap();
        assert_eq!(keyspace.replication_class, ReplicationStrategy::NetworkTopologyStrategy);
        assert_eq!(keyspace.replication_factor, 0);
    }

    #[tokio::test]
    async fn test_get_without_datacenters_reads_zero() {
        let mut session = MockCqlSession::new();
        session.expect_execute().returning(|_| {
            Ok(vec![keyspace_row(
                "ks_everywhere",
                true,
                &[("class", "org.apache.cassandra.locator.EverywhereStrategy")],
            )])
        });

        let keyspace = repository(session).get("ks_everywhere").await.unwrap();
        assert_eq!(keyspace.replication_class, ReplicationStrategy::EverywhereStrategy);
        assert_eq!(keyspace.replication_factor, 0);
    }

    #[tokio::test]
    async fn test_get_unknown_class_is_readable() {
        let mut session = MockCqlSession::new();
        session.expect_execute().returning(|_| {
            Ok(vec![keyspace_row(
                "ks_custom",
                true,
                &[("class", "com.example.CustomStrategy"), ("replication_factor", "2")],
            )])
        });

        let keyspace = repository(session).get("ks_custom").await.unwrap();
        assert_eq!(
            keyspace.replication_class,
            ReplicationStrategy::Other("com.example.CustomStrategy".to_string())
        );
        assert_eq!(keyspace.replication_factor, 2);
    }

    #[tokio::test]
    async fn test_get_non_numeric_factor_is_decode_error() {
        let mut session = MockCqlSession::new();
        session.expect_execute().returning(|_| {
            Ok(vec![keyspace_row(
                "ks1",
                true,
                &[("class", "SimpleStrategy"), ("replication_factor", "three")],
            )])
        });

        let err = repository(session).get("ks1").await.unwrap_err();
        assert!(matches!(err, SchemaError::Decode(_)));
    }

    #[tokio::test]
    async fn test_get_is_repeatable() {
        let mut session = MockCqlSession::new();
        session.expect_execute().times(2).returning(|_| {
            Ok(vec![keyspace_row(
                "ks1",
                false,
                &[("class", "SimpleStrategy"), ("replication_factor", "2")],
            )])
        });

        let repo = repository(session);
        let first = repo.get("ks1").await.unwrap();
        let second = repo.get("ks1").await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_create_executes_quoted_statement() {
        let mut session = MockCqlSession::new();
        session
            .expect_execute()
            .withf(|s| s.cql.starts_with("CREATE KEYSPACE \"my\"\"ks\" WITH"))
            .times(1)
            .returning(|_| Ok(vec![]));

        repository(session)
            .create(&Keyspace::new("my\"ks"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_factor_without_round_trip() {
        let mut session = MockCqlSession::new();
        session.expect_execute().never();

        let keyspace = Keyspace::new("ks1").with_replication(ReplicationStrategy::SimpleStrategy, 0);
        let err = repository(session).create(&keyspace).await.unwrap_err();
        assert!(matches!(err, SchemaError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_rejects_other_class_without_round_trip() {
        let mut session = MockCqlSession::new();
        session.expect_execute().never();

        let keyspace = Keyspace::new("ks_custom")
            .with_replication(ReplicationStrategy::Other("com.example.CustomStrategy".to_string()), 2);
        let err = repository(session).update(&keyspace).await.unwrap_err();
        assert!(matches!(err, SchemaError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_surfaces_cluster_error() {
        let mut session = MockCqlSession::new();
        session
            .expect_execute()
            .withf(|s| s.cql.starts_with("ALTER KEYSPACE \"ks1\""))
            .returning(|_| Err(CassandraError::Decode("replication factor exceeds nodes".to_string())));

        let keyspace = Keyspace::new("ks1").with_replication(ReplicationStrategy::SimpleStrategy, 3);
        let err = repository(session).update(&keyspace).await.unwrap_err();
        assert!(matches!(err, SchemaError::Database(_)));
        assert!(err.to_string().contains("replication factor exceeds nodes"));
    }

    #[tokio::test]
    async fn test_delete_drops_quoted_name() {
        let mut session = MockCqlSession::new();
        session
            .expect_execute()
            .withf(|s| s.cql == "DROP KEYSPACE \"ks1\"")
            .times(1)
            .returning(|_| Ok(vec![]));

        repository(session).delete("ks1").await.unwrap();
    }
}
