//! Connection settings for schema-ctl
//!
//! Environment variables (see `ClusterConfig::from_env`) are the base; flags
//! override them.

use clap::Args;
use core_config::FromEnv;
use database::cassandra::ClusterConfig;
use eyre::{Result, WrapErr};

#[derive(Debug, Clone, Default, Args)]
pub struct ConnectionArgs {
    /// Contact points (host[:port]); replaces CASSANDRA_CONTACT_POINTS
    #[arg(long, global = true, value_delimiter = ',')]
    pub contact_points: Vec<String>,

    #[arg(long, global = true, env = "CASSANDRA_USERNAME")]
    pub username: Option<String>,

    #[arg(long, global = true, env = "CASSANDRA_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Keyspace holding the roles table (`system` on ScyllaDB 6+)
    #[arg(long, global = true)]
    pub auth_keyspace: Option<String>,

    /// Retry session creation this many times with exponential backoff
    #[arg(long, global = true, default_value_t = 0)]
    pub connect_retries: u32,
}

/// Build the cluster configuration from the environment and flags
pub fn cluster_config(args: &ConnectionArgs) -> Result<ClusterConfig> {
    let mut config = if args.contact_points.is_empty() {
        ClusterConfig::from_env()
            .wrap_err("No contact points: pass --contact-points or set CASSANDRA_CONTACT_POINTS")?
    } else {
        ClusterConfig::new(args.contact_points.clone())
    };

    if let (Some(username), Some(password)) = (&args.username, &args.password) {
        config = config.with_credentials(username.clone(), password.clone());
    }
    if let Some(auth_keyspace) = &args.auth_keyspace {
        config = config.with_auth_keyspace(auth_keyspace.clone());
    }

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_replace_env_contact_points() {
        temp_env::with_var("CASSANDRA_CONTACT_POINTS", Some("10.0.0.1"), || {
            let args = ConnectionArgs {
                contact_points: vec!["10.0.0.2".to_string()],
                auth_keyspace: Some("system".to_string()),
                ..Default::default()
            };
            let config = cluster_config(&args).unwrap();
            assert_eq!(config.contact_points(), ["10.0.0.2:9042"]);
            assert_eq!(config.auth_keyspace, "system");
        });
    }

    #[test]
    fn test_env_is_the_base() {
        temp_env::with_vars(
            [
                ("CASSANDRA_CONTACT_POINTS", Some("10.0.0.1,10.0.0.2:9142")),
                ("CASSANDRA_AUTH_KEYSPACE", None),
            ],
            || {
                let config = cluster_config(&ConnectionArgs::default()).unwrap();
                assert_eq!(config.contact_points(), ["10.0.0.1:9042", "10.0.0.2:9142"]);
                assert_eq!(config.auth_keyspace, "system_auth");
            },
        );
    }

    #[test]
    fn test_credentials_need_both_parts() {
        let args = ConnectionArgs {
            contact_points: vec!["127.0.0.1".to_string()],
            username: Some("cassandra".to_string()),
            ..Default::default()
        };
        assert!(cluster_config(&args).unwrap().credentials().is_none());
    }

    #[test]
    fn test_missing_contact_points_is_an_error() {
        temp_env::with_vars_unset(["CASSANDRA_CONTACT_POINTS", "CASSANDRA_HOST"], || {
            assert!(cluster_config(&ConnectionArgs::default()).is_err());
        });
    }
}
