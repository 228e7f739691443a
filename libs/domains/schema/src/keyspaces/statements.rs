//! CQL for keyspace lifecycle operations
//!
//! The name is always quoted. The replication class comes from a closed enum
//! and the factor and durable-writes flag are numbers and booleans, so no
//! free-form caller text is spliced into a statement. CQL has no bind markers
//! inside a `WITH replication = {...}` map, which is why these are rendered.

use database::cassandra::{CqlStatement, quote_identifier};

use super::models::Keyspace;

pub const SELECT_KEYSPACE: &str = "SELECT keyspace_name, durable_writes, replication \
     FROM system_schema.keyspaces WHERE keyspace_name = ?";

pub fn select(name: &str) -> CqlStatement {
    CqlStatement::new(SELECT_KEYSPACE).bind_text(name)
}

pub fn create(keyspace: &Keyspace) -> CqlStatement {
    CqlStatement::new(format!(
        "CREATE KEYSPACE {} WITH {}",
        quote_identifier(&keyspace.name),
        options(keyspace)
    ))
}

/// Restates every option; ALTER never patches a subset.
pub fn alter(keyspace: &Keyspace) -> CqlStatement {
    CqlStatement::new(format!(
        "ALTER KEYSPACE {} WITH {}",
        quote_identifier(&keyspace.name),
        options(keyspace)
    ))
}

pub fn drop(name: &str) -> CqlStatement {
    CqlStatement::new(format!("DROP KEYSPACE {}", quote_identifier(name)))
}

fn options(keyspace: &Keyspace) -> String {
    format!(
        "replication = {{'class': '{}', 'replication_factor': {}}} AND durable_writes = {}",
        keyspace.replication_class, keyspace.replication_factor, keyspace.durable_writes
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyspaces::models::ReplicationStrategy;
    use database::cassandra::CqlValue;

    #[test]
    fn test_select_binds_name() {
        let statement = select("ks1");
        assert_eq!(statement.cql, SELECT_KEYSPACE);
        assert_eq!(statement.values, vec![CqlValue::Text("ks1".to_string())]);
    }

    #[test]
    fn test_create_statement() {
        let statement = create(&Keyspace::new("ks1"));
        assert_eq!(
            statement.cql,
            "CREATE KEYSPACE \"ks1\" WITH replication = {'class': 'SimpleStrategy', \
             'replication_factor': 1} AND durable_writes = true"
        );
        assert!(statement.values.is_empty());
    }

    #[test]
    fn test_alter_restates_all_options() {
        let keyspace = Keyspace::new("ks1")
            .with_replication(ReplicationStrategy::NetworkTopologyStrategy, 3)
            .with_durable_writes(false);

        assert_eq!(
            alter(&keyspace).cql,
            "ALTER KEYSPACE \"ks1\" WITH replication = {'class': 'NetworkTopologyStrategy', \
             'replication_factor': 3} AND durable_writes = false"
        );
    }

    #[test]
    fn test_drop_quotes_hostile_name() {
        assert_eq!(
            drop("ks\"; DROP KEYSPACE prod; --").cql,
            "DROP KEYSPACE \"ks\"\"; DROP KEYSPACE prod; --\""
        );
    }
}
