use scylla::errors::{ExecutionError, NewSessionError};

/// Error type for Cassandra operations
///
/// Driver errors are wrapped, never reinterpreted, so their message reaches
/// the caller unchanged.
#[derive(Debug, thiserror::Error)]
pub enum CassandraError {
    /// Session creation failed: unresolvable host, refused connection or
    /// rejected credentials
    #[error("Connection failed: {0}")]
    Connection(#[from] NewSessionError),

    /// The configuration cannot produce a session
    #[error("Invalid cluster configuration: {0}")]
    Configuration(String),

    /// The cluster rejected or failed a statement
    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionError),

    /// A returned row did not have the expected shape
    #[error("Decode error: {0}")]
    Decode(String),
}

pub type CassandraResult<T> = Result<T, CassandraError>;

impl CassandraError {
    /// Whether reconnecting after a pause may succeed
    ///
    /// Only session creation failures qualify, and not when the cluster
    /// rejected the credentials.
    pub fn is_transient(&self) -> bool {
        match self {
            CassandraError::Connection(e) => !is_auth_failure(&e.to_string()),
            _ => false,
        }
    }
}

fn is_auth_failure(message: &str) -> bool {
    let message = message.to_ascii_lowercase();
    ["authenticat", "password", "credentials", "unauthorized"]
        .iter()
        .any(|fragment| message.contains(fragment))
}
