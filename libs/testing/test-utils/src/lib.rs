//! Shared test utilities for domain testing
//!
//! - `TestScylla`: ScyllaDB container with password auth and automatic cleanup (feature: "scylla")
//! - `TestDataBuilder`: Deterministic, CQL-safe object names (always available)
//! - `assertions`: Custom assertion helpers (always available)
//!
//! # Features
//!
//! - `scylla`: Enables ScyllaDB test infrastructure
//! - `all`: Enables all database test infrastructure
//!
//! # Usage
//!
//! Add `features = ["scylla"]` to your dev-dependencies:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { workspace = true, features = ["scylla"] }
//! ```
//!
//! Then in your tests:
//!
//! ```rust,ignore
//! use test_utils::{TestDataBuilder, TestScylla};
//!
//! #[tokio::test]
//! async fn my_scylla_test() {
//!     let scylla = TestScylla::new().await;
//!     let builder = TestDataBuilder::from_test_name("my_scylla_test");
//!
//!     let session = scylla.session();
//!     let keyspace = builder.keyspace_name("main");
//! }
//! ```

#[cfg(feature = "scylla")]
mod scylla;

#[cfg(feature = "scylla")]
pub use scylla::{AUTH_KEYSPACE, SUPERUSER, TestScylla};

/// Builder for test data with deterministic names
///
/// Every test gets its own names, so tests sharing a container never collide.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    /// Create a new builder with a seed (for deterministic tests)
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Create from test name (generates seed from test name hash)
    ///
    /// # Example
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_create_keyspace");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Generate a unique name for testing
    ///
    /// Uses only lowercase letters, digits and `_`, so the result is also a
    /// valid unquoted CQL identifier.
    ///
    /// # Example
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::new(42);
    /// assert_eq!(builder.name("ks", "main"), "test_ks_42_main");
    /// ```
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test_{}_{}_{}", prefix, self.seed, suffix)
    }

    /// Keyspace names are capped at 48 characters by the cluster
    pub fn keyspace_name(&self, suffix: &str) -> String {
        let mut name = self.name("ks", suffix);
        name.truncate(48);
        name
    }

    pub fn role_name(&self, suffix: &str) -> String {
        self.name("role", suffix)
    }
}

/// Test assertion helpers
pub mod assertions {
    use std::fmt::Debug;

    /// Assert that an optional value is Some
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }

    /// Assert that a result failed and its message is exactly `expected`
    pub fn assert_err_message<T: Debug, E: ToString>(result: Result<T, E>, expected: &str, context: &str) {
        match result {
            Ok(value) => panic!("{}: expected error '{}', got Ok({:?})", context, expected, value),
            Err(e) => assert_eq!(e.to_string(), expected, "{}: unexpected error message", context),
        }
    }
}
