//! Subcommand handlers
//!
//! Each handler drives one service call and prints the outcome as JSON on
//! stdout; logs go to stderr.

use std::path::Path;
use std::sync::Arc;

use clap::{ArgAction, Args, Subcommand};
use database::cassandra::{ClusterSession, check_health_detailed, get_cluster_info};
use domain_schema::{
    Keyspace, KeyspaceService, ReplicationStrategy, Role, RoleService, ScyllaKeyspaceRepository,
    ScyllaRoleRepository,
};
use eyre::{Result, WrapErr};
use serde::Serialize;
use serde_json::json;
use tracing::info;

use crate::manifest::Manifest;

#[derive(Subcommand)]
pub enum KeyspaceAction {
    /// Show the live state of a keyspace
    Get { name: String },
    /// Create or update a keyspace to match the flags
    Apply(KeyspaceArgs),
    /// Show what `apply` would change
    Plan(KeyspaceArgs),
    /// Drop a keyspace and all of its data
    Delete { name: String },
}

#[derive(Args)]
pub struct KeyspaceArgs {
    name: String,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    durable_writes: bool,

    #[arg(long, default_value_t = ReplicationStrategy::SimpleStrategy)]
    replication_class: ReplicationStrategy,

    #[arg(long, default_value_t = 1)]
    replication_factor: u32,
}

impl From<KeyspaceArgs> for Keyspace {
    fn from(args: KeyspaceArgs) -> Self {
        Keyspace::new(args.name)
            .with_replication(args.replication_class, args.replication_factor)
            .with_durable_writes(args.durable_writes)
    }
}

#[derive(Subcommand)]
pub enum RoleAction {
    /// Show the live state of a role
    Get { name: String },
    /// Create or update a role to match the flags
    Apply(RoleArgs),
    /// Show what `apply` would change
    Plan(RoleArgs),
    /// Drop a role
    Delete { name: String },
}

#[derive(Args)]
pub struct RoleArgs {
    name: String,

    /// Allow the role to log in
    #[arg(long)]
    login: bool,

    #[arg(long)]
    superuser: bool,
}

impl From<RoleArgs> for Role {
    fn from(args: RoleArgs) -> Self {
        Role::new(args.name)
            .with_login(args.login)
            .with_superuser(args.superuser)
    }
}

#[derive(Serialize)]
struct Report<K, R> {
    keyspaces: Vec<K>,
    roles: Vec<R>,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn keyspaces(session: &Arc<ClusterSession>) -> KeyspaceService<ScyllaKeyspaceRepository> {
    KeyspaceService::new(ScyllaKeyspaceRepository::new(session.clone()))
}

fn roles(session: &Arc<ClusterSession>) -> RoleService<ScyllaRoleRepository> {
    RoleService::new(ScyllaRoleRepository::for_cluster(session.clone()))
}

pub async fn keyspace(session: &Arc<ClusterSession>, action: KeyspaceAction) -> Result<()> {
    let service = keyspaces(session);
    match action {
        KeyspaceAction::Get { name } => {
            let state = service
                .import(&name)
                .await
                .wrap_err_with(|| format!("keyspace '{}'", name))?;
            print_json(&state)
        }
        KeyspaceAction::Apply(args) => {
            let desired = Keyspace::from(args);
            let name = desired.name.clone();
            let state = service
                .reconcile(desired)
                .await
                .wrap_err_with(|| format!("Failed to apply keyspace '{}'", name))?;
            print_json(&state)
        }
        KeyspaceAction::Plan(args) => {
            let desired = Keyspace::from(args);
            let name = desired.name.clone();
            let plan = service
                .plan(desired)
                .await
                .wrap_err_with(|| format!("Failed to plan keyspace '{}'", name))?;
            print_json(&plan)
        }
        KeyspaceAction::Delete { name } => {
            service
                .delete(&name)
                .await
                .wrap_err_with(|| format!("Failed to drop keyspace '{}'", name))?;
            print_json(&json!({ "id": name, "deleted": true }))
        }
    }
}

pub async fn role(session: &Arc<ClusterSession>, action: RoleAction) -> Result<()> {
    let service = roles(session);
    match action {
        RoleAction::Get { name } => {
            let state = service
                .import(&name)
                .await
                .wrap_err_with(|| format!("role '{}'", name))?;
            print_json(&state)
        }
        RoleAction::Apply(args) => {
            let desired = Role::from(args);
            let name = desired.role.clone();
            let state = service
                .reconcile(desired)
                .await
                .wrap_err_with(|| format!("Failed to apply role '{}'", name))?;
            print_json(&state)
        }
        RoleAction::Plan(args) => {
            let desired = Role::from(args);
            let name = desired.role.clone();
            let plan = service
                .plan(desired)
                .await
                .wrap_err_with(|| format!("Failed to plan role '{}'", name))?;
            print_json(&plan)
        }
        RoleAction::Delete { name } => {
            service
                .delete(&name)
                .await
                .wrap_err_with(|| format!("Failed to drop role '{}'", name))?;
            print_json(&json!({ "id": name, "deleted": true }))
        }
    }
}

/// Reconcile (or only plan) every object in the manifest, keyspaces first
///
/// Stops at the first failure; objects already applied stay applied.
pub async fn apply_manifest(session: &Arc<ClusterSession>, path: &Path, dry_run: bool) -> Result<()> {
    let manifest = Manifest::load(path)?;
    info!(
        keyspaces = manifest.keyspaces.len(),
        roles = manifest.roles.len(),
        dry_run,
        "Loaded manifest"
    );

    let keyspace_service = keyspaces(session);
    let role_service = roles(session);

    if dry_run {
        let mut report = Report {
            keyspaces: Vec::new(),
            roles: Vec::new(),
        };
        for keyspace in manifest.keyspaces {
            let name = keyspace.name.clone();
            let plan = keyspace_service
                .plan(keyspace)
                .await
                .wrap_err_with(|| format!("Failed to plan keyspace '{}'", name))?;
            report.keyspaces.push(plan);
        }
        for role in manifest.roles {
            let name = role.role.clone();
            let plan = role_service
                .plan(role)
                .await
                .wrap_err_with(|| format!("Failed to plan role '{}'", name))?;
            report.roles.push(plan);
        }
        return print_json(&report);
    }

    let mut report = Report {
        keyspaces: Vec::new(),
        roles: Vec::new(),
    };
    for keyspace in manifest.keyspaces {
        let name = keyspace.name.clone();
        let state = keyspace_service
            .reconcile(keyspace)
            .await
            .wrap_err_with(|| format!("Failed to apply keyspace '{}'", name))?;
        report.keyspaces.push(state);
    }
    for role in manifest.roles {
        let name = role.role.clone();
        let state = role_service
            .reconcile(role)
            .await
            .wrap_err_with(|| format!("Failed to apply role '{}'", name))?;
        report.roles.push(state);
    }
    print_json(&report)
}

pub async fn health(session: &Arc<ClusterSession>) -> Result<()> {
    let status = check_health_detailed(&**session).await;
    let info = get_cluster_info(&**session).await.unwrap_or_default();

    print_json(&json!({
        "healthy": status.healthy,
        "message": status.message,
        "response_time_ms": status.response_time_ms,
        "version": status.version,
        "cluster_name": info.cluster_name,
        "datacenter": info.datacenter,
        "rack": info.rack,
        "contact_points": session.contact_points(),
    }))?;

    if !status.healthy {
        eyre::bail!("cluster is unhealthy");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Cli;
    use clap::Parser;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("schema-ctl").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_keyspace_apply_flags() {
        let cli = parse(&[
            "keyspace",
            "apply",
            "ks1",
            "--replication-class",
            "NetworkTopologyStrategy",
            "--replication-factor",
            "3",
            "--durable-writes",
            "false",
        ]);
        let crate::Commands::Keyspace {
            action: KeyspaceAction::Apply(args),
        } = cli.command
        else {
            panic!("expected keyspace apply");
        };

        let keyspace = Keyspace::from(args);
        assert_eq!(keyspace.replication_class, ReplicationStrategy::NetworkTopologyStrategy);
        assert_eq!(keyspace.replication_factor, 3);
        assert!(!keyspace.durable_writes);
    }

    #[test]
    fn test_keyspace_apply_defaults() {
        let cli = parse(&["keyspace", "plan", "ks1"]);
        let crate::Commands::Keyspace {
            action: KeyspaceAction::Plan(args),
        } = cli.command
        else {
            panic!("expected keyspace plan");
        };
        assert_eq!(Keyspace::from(args), Keyspace::new("ks1"));
    }

    #[test]
    fn test_unknown_replication_class_is_rejected() {
        let result = Cli::try_parse_from([
            "schema-ctl",
            "keyspace",
            "apply",
            "ks1",
            "--replication-class",
            "Custom",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_role_apply_flags() {
        let cli = parse(&["role", "apply", "r1", "--superuser", "--contact-points", "10.0.0.1"]);
        assert_eq!(cli.connection.contact_points, vec!["10.0.0.1"]);
        let crate::Commands::Role {
            action: RoleAction::Apply(args),
        } = cli.command
        else {
            panic!("expected role apply");
        };

        let role = Role::from(args);
        assert!(role.is_superuser);
        assert!(!role.can_login);
    }
}
