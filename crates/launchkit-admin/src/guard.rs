use crate::error::AuthError;
use crate::options::AdminOptions;
use crate::principal::Principal;

/// Require an admin session with the default admin roles.
pub fn require_admin(principal: Option<Principal>) -> Result<Principal, AuthError> {
    require_admin_with(&AdminOptions::default(), principal)
}

/// Require an admin session. No session is `Unauthenticated`; a session
/// without an admin role is `AdminAccessRequired`. The principal is returned
/// unchanged on success.
pub fn require_admin_with(
    options: &AdminOptions,
    principal: Option<Principal>,
) -> Result<Principal, AuthError> {
    let principal = principal.ok_or(AuthError::Unauthenticated)?;
    if options.is_admin(&principal) {
        return Ok(principal);
    }
    tracing::debug!(user_id = %principal.user_id, role = ?principal.role, "admin access refused");
    Err(AuthError::AdminAccessRequired {
        role: principal.role,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_session() {
        assert_eq!(require_admin(None), Err(AuthError::Unauthenticated));
    }

    #[test]
    fn test_non_admin() {
        assert_eq!(
            require_admin(Some(Principal::new("u1", "user"))),
            Err(AuthError::AdminAccessRequired {
                role: Some("user".into())
            })
        );
        assert_eq!(
            require_admin(Some(Principal::without_role("u1"))),
            Err(AuthError::AdminAccessRequired { role: None })
        );
    }

    #[test]
    fn test_admin_returned_unchanged() {
        let admin = Principal::new("a1", "admin");
        assert_eq!(require_admin(Some(admin.clone())), Ok(admin));
    }

    #[test]
    fn test_custom_admin_roles() {
        let options = AdminOptions {
            admin_roles: vec!["owner".into()],
            ..Default::default()
        };
        assert!(require_admin_with(&options, Some(Principal::new("u1", "owner"))).is_ok());
        assert!(require_admin_with(&options, Some(Principal::new("u1", "admin"))).is_err());
    }
}
