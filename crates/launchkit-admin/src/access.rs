// Role-based access control.
//
// A role is a set of statements: resource → allowed actions. A request names
// resources and the actions wanted on each; every requested action on a
// resource must be allowed for that resource to pass. `*` as an action allows
// every action on the resource, `*` as a resource covers resources with no
// statement of their own.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Statements: resource → list of allowed actions.
pub type Statements = HashMap<String, Vec<String>>;

pub const WILDCARD: &str = "*";

/// How results for multiple requested resources combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Connector {
    /// Every requested resource must pass.
    #[default]
    And,
    /// One passing resource is enough.
    Or,
}

/// Authorization result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizeResult {
    Success,
    Denied { error: String },
}

impl AuthorizeResult {
    pub fn is_success(&self) -> bool {
        matches!(self, AuthorizeResult::Success)
    }

    fn denied(error: impl Into<String>) -> Self {
        AuthorizeResult::Denied {
            error: error.into(),
        }
    }
}

/// A role with its associated statements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role {
    statements: Statements,
}

impl Role {
    pub fn new(statements: Statements) -> Self {
        Self { statements }
    }

    /// Build a role from `(resource, actions)` pairs.
    pub fn from_pairs(pairs: &[(&str, &[&str])]) -> Self {
        Self::new(statements(pairs))
    }

    pub fn statements(&self) -> &Statements {
        &self.statements
    }

    fn allowed_actions(&self, resource: &str) -> Option<&Vec<String>> {
        self.statements
            .get(resource)
            .or_else(|| self.statements.get(WILDCARD))
    }

    /// Whether every action in `actions` is allowed on `resource`.
    pub fn allows(&self, resource: &str, actions: &[String]) -> bool {
        let Some(allowed) = self.allowed_actions(resource) else {
            return false;
        };
        if allowed.iter().any(|a| a == WILDCARD) {
            return true;
        }
        actions.iter().all(|action| allowed.contains(action))
    }

    /// Check a multi-resource request. An empty request is never authorized.
    pub fn authorize(&self, request: &Statements, connector: Connector) -> AuthorizeResult {
        if request.is_empty() {
            return AuthorizeResult::denied("No permissions requested");
        }

        let mut denied = Vec::new();
        for (resource, actions) in request {
            if self.allows(resource, actions) {
                if connector == Connector::Or {
                    return AuthorizeResult::Success;
                }
            } else {
                denied.push(resource.as_str());
            }
        }

        match connector {
            Connector::And if denied.is_empty() => AuthorizeResult::Success,
            _ => {
                denied.sort_unstable();
                AuthorizeResult::denied(format!(
                    "unauthorized to access resource \"{}\"",
                    denied.join("\", \"")
                ))
            }
        }
    }
}

/// Build statements from `(resource, actions)` pairs.
pub fn statements(pairs: &[(&str, &[&str])]) -> Statements {
    pairs
        .iter()
        .map(|(resource, actions)| {
            (
                resource.to_string(),
                actions.iter().map(|a| a.to_string()).collect(),
            )
        })
        .collect()
}

/// Every statement the admin surface knows about.
pub fn default_admin_statements() -> Statements {
    statements(&[
        (
            "user",
            &[
                "create",
                "list",
                "get",
                "update",
                "delete",
                "set-role",
                "ban",
                "impersonate",
                "set-password",
            ],
        ),
        ("session", &["list", "revoke", "delete"]),
    ])
}

/// Default roles: `admin` gets every statement, `user` gets none.
pub fn default_admin_roles() -> HashMap<String, Role> {
    let mut roles = HashMap::new();
    roles.insert("admin".to_string(), Role::new(default_admin_statements()));
    roles.insert("user".to_string(), Role::default());
    roles
}

/// Split a comma-separated role label into trimmed role names.
pub fn role_names(role: &str) -> impl Iterator<Item = &str> {
    role.split(',').map(str::trim).filter(|r| !r.is_empty())
}

/// Normalize a role assignment (a string or an array of strings) to a
/// comma-separated label.
pub fn parse_roles(roles: &serde_json::Value) -> Option<String> {
    match roles {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        serde_json::Value::Array(arr) => {
            let names: Vec<&str> = arr.iter().filter_map(|v| v.as_str()).collect();
            if names.is_empty() {
                None
            } else {
                Some(names.join(","))
            }
        }
        _ => None,
    }
}

/// Whether every role name is configured.
pub fn validate_roles<'a>(
    role_names: impl IntoIterator<Item = &'a str>,
    configured: &HashMap<String, Role>,
) -> bool {
    role_names
        .into_iter()
        .all(|name| configured.contains_key(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(pairs: &[(&str, &[&str])]) -> Statements {
        statements(pairs)
    }

    #[test]
    fn test_admin_role_authorize() {
        let roles = default_admin_roles();
        let req = request(&[("user", &["ban", "impersonate"])]);
        assert!(roles["admin"].authorize(&req, Connector::And).is_success());
    }

    #[test]
    fn test_user_role_denied() {
        let roles = default_admin_roles();
        let req = request(&[("user", &["list"])]);
        assert_eq!(
            roles["user"].authorize(&req, Connector::And),
            AuthorizeResult::Denied {
                error: "unauthorized to access resource \"user\"".into()
            }
        );
    }

    #[test]
    fn test_all_actions_must_be_allowed() {
        let role = Role::from_pairs(&[("session", &["list"])]);
        assert!(role.allows("session", &["list".to_string()]));
        assert!(!role.allows("session", &["list".to_string(), "revoke".to_string()]));
    }

    #[test]
    fn test_or_connector() {
        let roles = default_admin_roles();
        let req = request(&[("user", &["create"]), ("billing", &["refund"])]);
        assert!(roles["admin"].authorize(&req, Connector::Or).is_success());
        assert!(!roles["admin"].authorize(&req, Connector::And).is_success());
    }

    #[test]
    fn test_wildcard_actions() {
        let role = Role::from_pairs(&[("user", &["*"])]);
        let req = request(&[("user", &["create", "delete"])]);
        assert!(role.authorize(&req, Connector::And).is_success());
        assert!(!role.authorize(&request(&[("session", &["list"])]), Connector::And).is_success());
    }

    #[test]
    fn test_wildcard_resource() {
        let role = Role::from_pairs(&[("*", &["list"])]);
        assert!(role.allows("session", &["list".to_string()]));
        assert!(!role.allows("session", &["revoke".to_string()]));
    }

    #[test]
    fn test_empty_request_denied() {
        let roles = default_admin_roles();
        assert!(!roles["admin"].authorize(&Statements::new(), Connector::Or).is_success());
    }

    #[test]
    fn test_role_names() {
        let names: Vec<&str> = role_names(" user , admin,,").collect();
        assert_eq!(names, ["user", "admin"]);
    }

    #[test]
    fn test_parse_roles() {
        assert_eq!(parse_roles(&serde_json::json!("admin")), Some("admin".into()));
        assert_eq!(
            parse_roles(&serde_json::json!(["admin", "user"])),
            Some("admin,user".into())
        );
        assert_eq!(parse_roles(&serde_json::json!([])), None);
        assert_eq!(parse_roles(&serde_json::json!(42)), None);
    }

    #[test]
    fn test_validate_roles() {
        let roles = default_admin_roles();
        assert!(validate_roles(["admin", "user"], &roles));
        assert!(!validate_roles(["admin", "superadmin"], &roles));
    }

    #[test]
    fn test_connector_serde() {
        assert_eq!(serde_json::to_string(&Connector::Or).unwrap(), "\"OR\"");
    }
}
