use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::reconcile::{Drift, Managed};

/// A role as declared by the user and as read back from the auth keyspace
///
/// `role` is the identity. Flags default to `false` when omitted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Validate)]
pub struct Role {
    #[validate(length(min = 1, message = "role name must not be empty"))]
    pub role: String,

    #[serde(default)]
    pub can_login: bool,

    #[serde(default)]
    pub is_superuser: bool,

    /// Roles granted to this role, in server order
    ///
    /// Derived: populated only when reading from the cluster. Never written
    /// by create or update, and ignored in desired-state input.
    #[serde(default, skip_deserializing)]
    pub member_of: Vec<String>,
}

impl Role {
    pub fn new(role: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            ..Default::default()
        }
    }

    pub fn with_login(mut self, can_login: bool) -> Self {
        self.can_login = can_login;
        self
    }

    pub fn with_superuser(mut self, is_superuser: bool) -> Self {
        self.is_superuser = is_superuser;
        self
    }
}

impl Managed for Role {
    fn id(&self) -> &str {
        &self.role
    }

    fn drift_from(&self, actual: &Self) -> Vec<Drift> {
        [
            Drift::compare("can_login", &self.can_login, &actual.can_login),
            Drift::compare("is_superuser", &self.is_superuser, &actual.is_superuser),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_deserializing() {
        let role: Role = serde_json::from_str(r#"{"role": "r1"}"#).unwrap();
        assert_eq!(role, Role::new("r1"));
        assert!(!role.can_login);
        assert!(!role.is_superuser);
        assert!(role.member_of.is_empty());
    }

    #[test]
    fn test_member_of_is_ignored_in_input() {
        let role: Role =
            serde_json::from_str(r#"{"role": "r1", "member_of": ["admins"]}"#).unwrap();
        assert!(role.member_of.is_empty());
    }

    #[test]
    fn test_member_of_never_drifts() {
        let desired = Role::new("r1");
        let mut actual = Role::new("r1");
        actual.member_of = vec!["admins".to_string()];
        assert!(desired.drift_from(&actual).is_empty());
    }

    #[test]
    fn test_drift_on_flags() {
        let desired = Role::new("r1").with_superuser(true);
        let drift = desired.drift_from(&Role::new("r1"));
        assert_eq!(drift.len(), 1);
        assert_eq!(drift[0].field, "is_superuser");
        assert_eq!(drift[0].desired, "true");
    }

    #[test]
    fn test_empty_name_is_invalid() {
        assert!(Role::new("").validate().is_err());
        assert!(Role::new("r1").validate().is_ok());
    }
}
