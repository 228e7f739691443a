//! Utilities shared by every connector

pub mod retry;

pub use retry::{RetryConfig, retry, retry_when, retry_with_backoff};
