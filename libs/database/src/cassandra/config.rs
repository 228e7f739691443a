#[cfg(feature = "config")]
use core_config::{ConfigError, FromEnv, env_list, env_optional, env_or_default, env_parse};

use super::error::{CassandraError, CassandraResult};

/// Keyspace holding the role tables on most deployments
pub const DEFAULT_AUTH_KEYSPACE: &str = "system_auth";

/// Native protocol port appended to contact points given without one
pub const DEFAULT_PORT: u16 = 9042;

/// Not-yet-connected cluster configuration
///
/// Built once by the caller, handed to [`super::connect`]. Changing it after
/// a session exists has no effect on that session.
///
/// # Example
///
/// ```ignore
/// use database::cassandra::ClusterConfig;
///
/// let config = ClusterConfig::new(vec!["10.0.0.1:9042", "10.0.0.2"])
///     .with_credentials("cassandra", "cassandra")
///     .with_auth_keyspace("system");
/// ```
#[derive(Clone)]
pub struct ClusterConfig {
    /// Contact points (host:port pairs), tried in order
    pub contact_points: Vec<String>,

    /// Optional username for password authentication
    pub username: Option<String>,

    /// Optional password for password authentication
    pub password: Option<String>,

    /// Keyspace that holds the `roles` table
    pub auth_keyspace: String,

    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,

    /// Request timeout in seconds
    pub request_timeout_secs: u64,
}

impl ClusterConfig {
    /// Create a configuration for exactly these contact points
    ///
    /// Points without an explicit port get [`DEFAULT_PORT`].
    pub fn new<S: Into<String>>(contact_points: Vec<S>) -> Self {
        Self {
            contact_points: contact_points
                .into_iter()
                .map(|s| with_default_port(&s.into(), DEFAULT_PORT))
                .collect(),
            username: None,
            password: None,
            auth_keyspace: DEFAULT_AUTH_KEYSPACE.to_string(),
            connect_timeout_secs: 10,
            request_timeout_secs: 30,
        }
    }

    /// Attach password authentication
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Override the keyspace that holds role records
    pub fn with_auth_keyspace(mut self, keyspace: impl Into<String>) -> Self {
        self.auth_keyspace = keyspace.into();
        self
    }

    pub fn with_connect_timeout(mut self, secs: u64) -> Self {
        self.connect_timeout_secs = secs;
        self
    }

    pub fn with_request_timeout(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    pub fn contact_points(&self) -> &[String] {
        &self.contact_points
    }

    /// Username and password, only when both are present and non-empty
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => {
                Some((user, pass))
            }
            _ => None,
        }
    }

    /// Check the configuration can produce a session
    pub fn validate(&self) -> CassandraResult<()> {
        if self.contact_points.is_empty() {
            return Err(CassandraError::Configuration(
                "at least one contact point is required".to_string(),
            ));
        }
        if self.auth_keyspace.trim().is_empty() {
            return Err(CassandraError::Configuration(
                "auth keyspace name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

// Passwords stay out of logs.
impl std::fmt::Debug for ClusterConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClusterConfig")
            .field("contact_points", &self.contact_points)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("auth_keyspace", &self.auth_keyspace)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self::new(vec!["127.0.0.1:9042"])
    }
}

/// Append `port` to a contact point that does not carry one
///
/// Handles `host`, `host:port`, `[v6]`, `[v6]:port` and bare IPv6 addresses.
pub fn with_default_port(host: &str, port: u16) -> String {
    let host = host.trim();
    if let Some(rest) = host.strip_prefix('[') {
        return match rest.split_once(']') {
            Some((_, tail)) if tail.starts_with(':') => host.to_string(),
            _ => format!("{}:{}", host, port),
        };
    }
    match host.matches(':').count() {
        0 => format!("{}:{}", host, port),
        1 => host.to_string(),
        _ => format!("[{}]:{}", host, port),
    }
}

/// Load ClusterConfig from environment variables
///
/// Environment variables:
/// - `CASSANDRA_CONTACT_POINTS` - Comma-separated list of contact points
/// - `CASSANDRA_HOST` / `CASSANDRA_PORT` - Single host, used when
///   `CASSANDRA_CONTACT_POINTS` is unset (port default: 9042)
/// - `CASSANDRA_USERNAME` / `CASSANDRA_PASSWORD` (optional)
/// - `CASSANDRA_AUTH_KEYSPACE` (optional, default: system_auth)
/// - `CASSANDRA_CONNECT_TIMEOUT_SECS` (optional, default: 10)
/// - `CASSANDRA_REQUEST_TIMEOUT_SECS` (optional, default: 30)
#[cfg(feature = "config")]
impl FromEnv for ClusterConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let port: u16 = env_parse("CASSANDRA_PORT", DEFAULT_PORT)?;

        let mut hosts = env_list("CASSANDRA_CONTACT_POINTS");
        if hosts.is_empty()
            && let Some(host) = env_optional("CASSANDRA_HOST")
        {
            hosts.push(host);
        }
        if hosts.is_empty() {
            return Err(ConfigError::MissingEnvVar(
                "CASSANDRA_CONTACT_POINTS".to_string(),
            ));
        }

        let contact_points = hosts
            .iter()
            .map(|h| with_default_port(h, port))
            .collect();

        Ok(Self {
            contact_points,
            username: env_optional("CASSANDRA_USERNAME"),
            password: env_optional("CASSANDRA_PASSWORD"),
            auth_keyspace: env_or_default("CASSANDRA_AUTH_KEYSPACE", DEFAULT_AUTH_KEYSPACE),
            connect_timeout_secs: env_parse("CASSANDRA_CONNECT_TIMEOUT_SECS", 10)?,
            request_timeout_secs: env_parse("CASSANDRA_REQUEST_TIMEOUT_SECS", 30)?,
        })
    }
}
