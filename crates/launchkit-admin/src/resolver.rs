//! Fail-closed permission resolution.
//!
//! Every named check goes through [`PermissionResolver::has_permission`] via
//! [`PERMISSION_TABLE`], so there is exactly one place where an authority
//! failure turns into "not permitted".

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::access::{Connector, Statements};
use crate::authority::{PermissionAuthority, PermissionQuery, Subject};
use crate::error::AuthError;
use crate::principal::Principal;

/// Named admin capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Shorthand {
    ManageUsers,
    BanUsers,
    ImpersonateUsers,
    ManageSessions,
}

impl Shorthand {
    pub const ALL: [Shorthand; 4] = [
        Shorthand::ManageUsers,
        Shorthand::BanUsers,
        Shorthand::ImpersonateUsers,
        Shorthand::ManageSessions,
    ];

    /// The `(resource, actions)` pair this capability stands for.
    pub fn rule(self) -> &'static PermissionRule {
        &PERMISSION_TABLE[self as usize]
    }
}

impl fmt::Display for Shorthand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ManageUsers => "manage-users",
            Self::BanUsers => "ban-users",
            Self::ImpersonateUsers => "impersonate-users",
            Self::ManageSessions => "manage-sessions",
        })
    }
}

/// One row of [`PERMISSION_TABLE`].
#[derive(Debug, PartialEq, Eq)]
pub struct PermissionRule {
    pub shorthand: Shorthand,
    pub resource: &'static str,
    pub actions: &'static [&'static str],
    /// Shown when the check refuses an authenticated principal.
    pub denied_message: &'static str,
}

/// Indexed by `Shorthand as usize`.
pub static PERMISSION_TABLE: [PermissionRule; 4] = [
    PermissionRule {
        shorthand: Shorthand::ManageUsers,
        resource: "user",
        actions: &["list", "create", "set-role"],
        denied_message: "You are not allowed to manage users",
    },
    PermissionRule {
        shorthand: Shorthand::BanUsers,
        resource: "user",
        actions: &["ban"],
        denied_message: "You are not allowed to ban users",
    },
    PermissionRule {
        shorthand: Shorthand::ImpersonateUsers,
        resource: "user",
        actions: &["impersonate"],
        denied_message: "You are not allowed to impersonate users",
    },
    PermissionRule {
        shorthand: Shorthand::ManageSessions,
        resource: "session",
        actions: &["list", "revoke"],
        denied_message: "You are not allowed to manage users sessions",
    },
];

/// Answers permission questions against an authority, never erroring.
#[derive(Debug, Clone)]
pub struct PermissionResolver<A> {
    authority: A,
}

impl<A: PermissionAuthority> PermissionResolver<A> {
    pub fn new(authority: A) -> Self {
        Self { authority }
    }

    pub fn authority(&self) -> &A {
        &self.authority
    }

    async fn query(&self, query: PermissionQuery) -> bool {
        match self.authority.check(&query).await {
            Ok(granted) => granted,
            Err(err) => {
                tracing::warn!(
                    subject = ?query.subject,
                    permissions = ?query.permissions,
                    error = %format!("{err:#}"),
                    "permission check failed, denying"
                );
                false
            }
        }
    }

    /// Whether `principal` may perform every one of `actions` on `resource`.
    pub async fn has_permission(
        &self,
        principal: &Principal,
        resource: &str,
        actions: &[&str],
    ) -> bool {
        self.query(PermissionQuery::for_user(principal, resource, actions))
            .await
    }

    /// Multi-resource form of [`has_permission`](Self::has_permission).
    pub async fn has_permissions(
        &self,
        principal: &Principal,
        permissions: Statements,
        connector: Connector,
    ) -> bool {
        self.query(PermissionQuery::new(
            Subject::User(principal.clone()),
            permissions,
            connector,
        ))
        .await
    }

    /// Whether a role label is generally allowed `actions` on `resource`.
    pub async fn role_has_permission(
        &self,
        role: &str,
        resource: &str,
        actions: &[&str],
    ) -> bool {
        self.query(PermissionQuery::for_role(role, resource, actions))
            .await
    }

    pub async fn allows(&self, principal: &Principal, shorthand: Shorthand) -> bool {
        let rule = shorthand.rule();
        self.has_permission(principal, rule.resource, rule.actions).await
    }

    pub async fn can_manage_users(&self, principal: &Principal) -> bool {
        self.allows(principal, Shorthand::ManageUsers).await
    }

    pub async fn can_ban_users(&self, principal: &Principal) -> bool {
        self.allows(principal, Shorthand::BanUsers).await
    }

    pub async fn can_impersonate_users(&self, principal: &Principal) -> bool {
        self.allows(principal, Shorthand::ImpersonateUsers).await
    }

    pub async fn can_manage_sessions(&self, principal: &Principal) -> bool {
        self.allows(principal, Shorthand::ManageSessions).await
    }

    /// Gate an operation: `Unauthenticated` without a principal,
    /// `PermissionDenied` when the check does not pass.
    pub async fn authorize(
        &self,
        principal: Option<&Principal>,
        shorthand: Shorthand,
    ) -> Result<(), AuthError> {
        let principal = principal.ok_or(AuthError::Unauthenticated)?;
        if self.allows(principal, shorthand).await {
            return Ok(());
        }
        tracing::debug!(user_id = %principal.user_id, %shorthand, "permission denied");
        Err(AuthError::PermissionDenied {
            message: shorthand.rule().denied_message.to_string(),
        })
    }
}
