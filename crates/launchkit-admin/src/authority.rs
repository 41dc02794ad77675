//! Permission authorities.
//!
//! An authority answers a single permission query. It may be local (role
//! statements from [`AdminOptions`]) or remote (an auth server reached over
//! HTTP). Any error it returns is opaque to callers: the resolver logs it and
//! treats the query as not permitted.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::access::{role_names, statements, Connector, Role, Statements};
use crate::options::AdminOptions;
use crate::principal::Principal;

// ─── Query ─────────────────────────────────────────────────────────

/// Who a permission query is about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subject {
    /// A concrete, server-trusted identity.
    User(Principal),
    /// A role label, independent of any user.
    Role(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionQuery {
    pub subject: Subject,
    pub permissions: Statements,
    /// How results for several requested resources combine.
    pub connector: Connector,
}

impl PermissionQuery {
    pub fn new(subject: Subject, permissions: Statements, connector: Connector) -> Self {
        Self {
            subject,
            permissions,
            connector,
        }
    }

    pub fn for_user(principal: &Principal, resource: &str, actions: &[&str]) -> Self {
        Self::new(
            Subject::User(principal.clone()),
            statements(&[(resource, actions)]),
            Connector::And,
        )
    }

    pub fn for_role(role: impl Into<String>, resource: &str, actions: &[&str]) -> Self {
        Self::new(
            Subject::Role(role.into()),
            statements(&[(resource, actions)]),
            Connector::And,
        )
    }
}

/// Something that can decide a [`PermissionQuery`].
#[async_trait]
pub trait PermissionAuthority: Send + Sync {
    async fn check(&self, query: &PermissionQuery) -> anyhow::Result<bool>;
}

// ─── Local ─────────────────────────────────────────────────────────

/// Decides queries from configured role statements.
///
/// The query passes when any one of the subject's roles authorizes it on its
/// own; a principal's explicit grants count as one more role. Admin user ids
/// pass everything.
#[derive(Debug, Clone, Default)]
pub struct LocalAuthority {
    options: AdminOptions,
}

impl LocalAuthority {
    pub fn new(options: AdminOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &AdminOptions {
        &self.options
    }

    fn role_authorizes(&self, label: &str, query: &PermissionQuery) -> bool {
        role_names(label).any(|name| match self.options.roles.get(name) {
            Some(role) => authorizes(role, query),
            None => {
                tracing::debug!(role = name, "ignoring unconfigured role");
                false
            }
        })
    }

    /// Synchronous form of [`PermissionAuthority::check`].
    pub fn evaluate(&self, query: &PermissionQuery) -> bool {
        match &query.subject {
            Subject::User(principal) => {
                if self.options.admin_user_ids.iter().any(|id| *id == principal.user_id) {
                    return true;
                }
                let granted = principal
                    .permissions
                    .as_ref()
                    .is_some_and(|grants| authorizes(&Role::new(grants.clone()), query));
                granted || self.role_authorizes(self.options.effective_role(principal), query)
            }
            Subject::Role(label) => self.role_authorizes(label, query),
        }
    }
}

fn authorizes(role: &Role, query: &PermissionQuery) -> bool {
    role.authorize(&query.permissions, query.connector).is_success()
}

#[async_trait]
impl PermissionAuthority for LocalAuthority {
    async fn check(&self, query: &PermissionQuery) -> anyhow::Result<bool> {
        Ok(self.evaluate(query))
    }
}

// ─── HTTP ──────────────────────────────────────────────────────────

/// Remote authority configuration.
#[derive(Debug, Clone)]
pub struct HttpAuthorityOptions {
    /// Base URL of the auth server, including any mount path
    /// (e.g. `https://my-app.com/api/auth`).
    pub base_url: String,

    /// Sent as `Authorization: Bearer <token>` when set.
    pub auth_token: Option<String>,

    /// Request timeout in seconds (default: 10).
    pub timeout_secs: u64,
}

impl Default for HttpAuthorityOptions {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            auth_token: None,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HasPermissionRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    permissions: &'a Statements,
    #[serde(skip_serializing_if = "is_and")]
    connector: Connector,
}

fn is_and(connector: &Connector) -> bool {
    *connector == Connector::And
}

impl<'a> From<&'a PermissionQuery> for HasPermissionRequest<'a> {
    fn from(query: &'a PermissionQuery) -> Self {
        let (user_id, role) = match &query.subject {
            Subject::User(principal) => (Some(principal.user_id.as_str()), None),
            Subject::Role(role) => (None, Some(role.as_str())),
        };
        Self {
            user_id,
            role,
            permissions: &query.permissions,
            connector: query.connector,
        }
    }
}

#[derive(Debug, Deserialize)]
struct HasPermissionResponse {
    #[serde(alias = "hasPermission")]
    success: bool,
}

/// Asks an auth server's `POST /admin/has-permission` endpoint.
#[derive(Debug, Clone)]
pub struct HttpAuthority {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpAuthority {
    pub fn new(options: HttpAuthorityOptions) -> Self {
        let mut headers = reqwest::header::HeaderMap::new();
        if let Some(ref token) = options.auth_token {
            if let Ok(val) = reqwest::header::HeaderValue::from_str(&format!("Bearer {token}")) {
                headers.insert(reqwest::header::AUTHORIZATION, val);
            }
        }

        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(options.timeout_secs))
            .default_headers(headers)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            http,
            endpoint: format!("{}/admin/has-permission", options.base_url.trim_end_matches('/')),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl PermissionAuthority for HttpAuthority {
    async fn check(&self, query: &PermissionQuery) -> anyhow::Result<bool> {
        use anyhow::Context;

        let resp = self
            .http
            .post(&self.endpoint)
            .json(&HasPermissionRequest::from(query))
            .send()
            .await
            .with_context(|| format!("permission request to {} failed", self.endpoint))?;

        let status = resp.status();
        let body = resp.text().await.context("failed to read permission response")?;
        decode_response(status, &body)
    }
}

/// Only a 2xx reply with a well-formed body counts as an answer.
fn decode_response(status: reqwest::StatusCode, body: &str) -> anyhow::Result<bool> {
    use anyhow::Context;

    if !status.is_success() {
        anyhow::bail!("permission authority returned {status}");
    }
    let body: HasPermissionResponse =
        serde_json::from_str(body).context("malformed permission response")?;
    Ok(body.success)
}
