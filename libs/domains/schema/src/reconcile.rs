//! Desired-vs-actual comparison shared by every managed object kind
//!
//! An object is in one of three states relative to its desired state:
//! absent, present and matching, or present and diverged. [`Plan`] names the
//! transition needed to reach "present and matching".

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{SchemaError, SchemaResult};

/// One attribute whose live value differs from the desired value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Drift {
    pub field: &'static str,
    pub desired: String,
    pub actual: String,
}

impl Drift {
    /// `Some` when the two values differ
    pub fn compare<T: PartialEq + ToString>(field: &'static str, desired: &T, actual: &T) -> Option<Self> {
        (desired != actual).then(|| Self {
            field,
            desired: desired.to_string(),
            actual: actual.to_string(),
        })
    }
}

/// A schema object managed by identity
pub trait Managed: Clone {
    /// Identity attribute (never changes after creation)
    fn id(&self) -> &str;

    /// Mutable attributes where `self` (desired) differs from `actual`
    fn drift_from(&self, actual: &Self) -> Vec<Drift>;
}

/// Transition needed to bring an object to its desired state
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Plan<T> {
    /// Absent on the cluster
    Create { desired: T },
    /// Present with diverged attributes
    Update {
        desired: T,
        current: T,
        drift: Vec<Drift>,
    },
    /// Present and matching
    NoChange { current: T },
}

impl<T: Managed> Plan<T> {
    pub fn new(desired: T, current: Option<T>) -> Self {
        match current {
            None => Plan::Create { desired },
            Some(current) => {
                let drift = desired.drift_from(&current);
                if drift.is_empty() {
                    Plan::NoChange { current }
                } else {
                    Plan::Update {
                        desired,
                        current,
                        drift,
                    }
                }
            }
        }
    }

    pub fn is_no_change(&self) -> bool {
        matches!(self, Plan::NoChange { .. })
    }
}

/// State handed back to the orchestrator for persistence
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceState<T> {
    /// Identity attribute, used as the import id
    pub id: String,
    /// Set when this call created or altered the object
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub value: T,
}

impl<T: Managed> ResourceState<T> {
    /// State after a create or update performed now
    pub fn applied(value: T) -> Self {
        Self {
            id: value.id().to_string(),
            last_updated: Some(Utc::now()),
            value,
        }
    }

    /// State observed by a read
    pub fn observed(value: T) -> Self {
        Self {
            id: value.id().to_string(),
            last_updated: None,
            value,
        }
    }
}

/// Map `NotFound` to `None`, keep every other error
pub fn found<T>(result: SchemaResult<T>) -> SchemaResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(SchemaError::NotFound(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Reject an update that would change the identity attribute
pub fn ensure_same_identity(prior_id: &str, desired_id: &str) -> SchemaResult<()> {
    if prior_id == desired_id {
        Ok(())
    } else {
        Err(SchemaError::IdentityChange {
            from: prior_id.to_string(),
            to: desired_id.to_string(),
        })
    }
}
