use serde::{Deserialize, Serialize};

use crate::access::Statements;

/// An authenticated identity as handed over by the session layer. Read-only
/// here: role labels and grants are owned by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub user_id: String,
    /// Role label, possibly comma-separated (`"user,support"`).
    #[serde(default)]
    pub role: Option<String>,
    /// Explicit per-resource grants on top of the role.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Statements>,
}

impl Principal {
    pub fn new(user_id: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            role: Some(role.into()),
            permissions: None,
        }
    }

    pub fn without_role(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            role: None,
            permissions: None,
        }
    }

    pub fn with_permissions(mut self, permissions: Statements) -> Self {
        self.permissions = Some(permissions);
        self
    }
}
