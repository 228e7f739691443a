//! Desired-state manifest read by `schema-ctl apply`

use std::path::Path;

use domain_schema::{Keyspace, Role};
use eyre::{Result, WrapErr, bail};
use serde::Deserialize;

/// Every object the manifest declares
///
/// ```json
/// {
///   "keyspaces": [{ "name": "app", "replication_factor": 3 }],
///   "roles": [{ "role": "app_rw", "can_login": true }]
/// }
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub keyspaces: Vec<Keyspace>,

    #[serde(default)]
    pub roles: Vec<Role>,
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read manifest {}", path.display()))?;
        Self::parse(&raw).wrap_err_with(|| format!("Invalid manifest {}", path.display()))
    }

    pub fn parse(raw: &str) -> Result<Self> {
        let manifest: Manifest = serde_json::from_str(raw)?;
        manifest.check_unique()?;
        Ok(manifest)
    }

    /// Two entries with the same identity would fight each other
    fn check_unique(&self) -> Result<()> {
        let mut seen = std::collections::HashSet::new();
        for keyspace in &self.keyspaces {
            if !seen.insert(keyspace.name.as_str()) {
                bail!("keyspace '{}' is declared more than once", keyspace.name);
            }
        }
        seen.clear();
        for role in &self.roles {
            if !seen.insert(role.role.as_str()) {
                bail!("role '{}' is declared more than once", role.role);
            }
        }
        Ok(())
    }
}
