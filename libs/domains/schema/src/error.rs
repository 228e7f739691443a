use database::cassandra::CassandraError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    /// The object does not exist on the cluster. Displays exactly
    /// `not found`; the name is carried for the caller's context.
    #[error("not found")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    /// Identity attributes cannot be updated in place
    #[error("cannot rename '{from}' to '{to}' in place; delete and recreate instead")]
    IdentityChange { from: String, to: String },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error(transparent)]
    Database(#[from] CassandraError),
}

pub type SchemaResult<T> = Result<T, SchemaError>;

impl SchemaError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, SchemaError::NotFound(_))
    }
}

impl From<validator::ValidationErrors> for SchemaError {
    fn from(errors: validator::ValidationErrors) -> Self {
        SchemaError::Validation(errors.to_string())
    }
}
