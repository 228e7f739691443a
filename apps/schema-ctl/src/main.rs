//! schema-ctl
//!
//! Reconciles keyspaces and roles on a ScyllaDB or Apache Cassandra cluster.
//! Connection settings come from `CASSANDRA_*` environment variables and can
//! be overridden with flags.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use core_config::Environment;
use core_config::tracing::{init_tracing, install_color_eyre};
use database::RetryConfig;
use database::cassandra::{ClusterSession, connect, connect_with_retry};
use eyre::{Result, WrapErr};
use tracing::{info, warn};

mod commands;
mod config;
mod manifest;

use commands::{KeyspaceAction, RoleAction};
use config::ConnectionArgs;

#[derive(Parser)]
#[command(name = "schema-ctl")]
#[command(about = "Reconcile keyspaces and roles on a Cassandra-protocol cluster")]
pub(crate) struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Manage a single keyspace
    Keyspace {
        #[command(subcommand)]
        action: KeyspaceAction,
    },

    /// Manage a single role
    Role {
        #[command(subcommand)]
        action: RoleAction,
    },

    /// Reconcile every keyspace and role declared in a JSON manifest
    Apply {
        #[arg(short, long)]
        file: PathBuf,

        /// Print the plan without changing anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Check the cluster answers queries
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    install_color_eyre();

    let environment = Environment::from_env();
    init_tracing(&environment);

    let cli = Cli::parse();
    let cluster = config::cluster_config(&cli.connection)?;

    info!(contact_points = ?cluster.contact_points, "Connecting to cluster...");
    let session = if cli.connection.connect_retries > 0 {
        let retry = RetryConfig::new().with_max_retries(cli.connection.connect_retries);
        connect_with_retry(&cluster, Some(retry)).await
    } else {
        connect(&cluster).await
    }
    .wrap_err("Cluster connection failed")?;

    let session = Arc::new(session);
    let result = run(cli.command, &session).await;

    // Handlers only borrow the session, so this is the last reference.
    match Arc::into_inner(session) {
        Some(session) => session.close(),
        None => warn!("Session still shared at exit, dropping instead of closing"),
    }

    result
}

async fn run(command: Commands, session: &Arc<ClusterSession>) -> Result<()> {
    match command {
        Commands::Keyspace { action } => commands::keyspace(session, action).await,
        Commands::Role { action } => commands::role(session, action).await,
        Commands::Apply { file, dry_run } => commands::apply_manifest(session, &file, dry_run).await,
        Commands::Health => commands::health(session).await,
    }
}
