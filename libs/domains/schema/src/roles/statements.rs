//! CQL for role lifecycle operations
//!
//! `LOGIN` and `SUPERUSER` only accept boolean literals, so the flags are
//! rendered from typed `bool`s; the name is quoted.

use database::cassandra::{CqlStatement, quote_identifier};

use super::models::Role;

/// Lookup against `<auth_keyspace>.roles`
pub fn select(auth_keyspace: &str, name: &str) -> CqlStatement {
    CqlStatement::new(format!(
        "SELECT role, can_login, is_superuser, member_of FROM {}.roles WHERE role = ?",
        quote_identifier(auth_keyspace)
    ))
    .bind_text(name)
}

pub fn create(role: &Role) -> CqlStatement {
    CqlStatement::new(format!("CREATE ROLE {} WITH {}", quote_identifier(&role.role), flags(role)))
}

/// Restates both flags; memberships are left alone.
pub fn alter(role: &Role) -> CqlStatement {
    CqlStatement::new(format!("ALTER ROLE {} WITH {}", quote_identifier(&role.role), flags(role)))
}

pub fn drop(name: &str) -> CqlStatement {
    CqlStatement::new(format!("DROP ROLE {}", quote_identifier(name)))
}

fn flags(role: &Role) -> String {
    format!("LOGIN = {} AND SUPERUSER = {}", role.can_login, role.is_superuser)
}

#[cfg(test)]
mod tests {
    use super::*;
    use database::cassandra::CqlValue;

    #[test]
    fn test_select_quotes_auth_keyspace_and_binds_name() {
        let statement = select("system_auth", "r1");
        assert_eq!(
            statement.cql,
            "SELECT role, can_login, is_superuser, member_of FROM \"system_auth\".roles WHERE role = ?"
        );
        assert_eq!(statement.values, vec![CqlValue::Text("r1".to_string())]);
    }

    #[test]
    fn test_create_renders_flags() {
        assert_eq!(
            create(&Role::new("r1")).cql,
            "CREATE ROLE \"r1\" WITH LOGIN = false AND SUPERUSER = false"
        );
        assert_eq!(
            create(&Role::new("app").with_login(true)).cql,
            "CREATE ROLE \"app\" WITH LOGIN = true AND SUPERUSER = false"
        );
    }

    #[test]
    fn test_alter_restates_both_flags() {
        let role = Role::new("r1").with_superuser(true);
        assert_eq!(
            alter(&role).cql,
            "ALTER ROLE \"r1\" WITH LOGIN = false AND SUPERUSER = true"
        );
    }

    #[test]
    fn test_drop_quotes_embedded_quote() {
        assert_eq!(drop("a\"b").cql, "DROP ROLE \"a\"\"b\"");
    }
}
