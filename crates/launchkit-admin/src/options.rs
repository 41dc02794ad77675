//! Admin configuration.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::access::{default_admin_roles, parse_roles, role_names, validate_roles, Role};
use crate::error::AuthError;
use crate::principal::Principal;

/// Admin options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminOptions {
    /// Role assumed for principals with no role label.
    #[serde(default = "default_role")]
    pub default_role: String,
    /// Roles with admin privileges.
    #[serde(default = "default_admin_role_names")]
    pub admin_roles: Vec<String>,
    /// User ids that are always permitted, whatever their role.
    #[serde(default)]
    pub admin_user_ids: Vec<String>,
    /// Whether admins may be impersonated.
    #[serde(default)]
    pub allow_impersonating_admins: bool,
    /// Role name → statements.
    #[serde(default = "default_admin_roles")]
    pub roles: HashMap<String, Role>,
}

fn default_role() -> String {
    "user".into()
}

fn default_admin_role_names() -> Vec<String> {
    vec!["admin".into()]
}

impl Default for AdminOptions {
    fn default() -> Self {
        Self {
            default_role: default_role(),
            admin_roles: default_admin_role_names(),
            admin_user_ids: vec![],
            allow_impersonating_admins: false,
            roles: default_admin_roles(),
        }
    }
}

impl AdminOptions {
    /// The principal's role label, or the default role.
    pub fn effective_role<'a>(&'a self, principal: &'a Principal) -> &'a str {
        principal.role.as_deref().unwrap_or(&self.default_role)
    }

    /// Admin by user id or by any admin role in the principal's label.
    pub fn is_admin(&self, principal: &Principal) -> bool {
        if self.admin_user_ids.iter().any(|id| *id == principal.user_id) {
            return true;
        }
        role_names(self.effective_role(principal))
            .any(|role| self.admin_roles.iter().any(|admin| admin == role))
    }

    /// Admins cannot be impersonated unless explicitly allowed.
    pub fn can_impersonate(&self, target: &Principal) -> bool {
        self.allow_impersonating_admins || !self.is_admin(target)
    }

    /// Validate a set-role payload (a role name or a list of them) against the
    /// configured roles and return the normalized label.
    pub fn parse_role_assignment(&self, value: &serde_json::Value) -> Result<String, AuthError> {
        let label = parse_roles(value).ok_or_else(|| AuthError::InvalidRole(value.to_string()))?;
        if !validate_roles(role_names(&label), &self.roles) {
            return Err(AuthError::InvalidRole(label));
        }
        Ok(label)
    }
}
