//! # LaunchKit Admin
//!
//! Permission checks for privileged operations (managing users, banning,
//! impersonation, session management), independent of subscription state.
//!
//! Role statements live in [`AdminOptions`]. Queries go to a
//! [`PermissionAuthority`], either [`LocalAuthority`] or an auth server via
//! [`HttpAuthority`]; [`PermissionResolver`] wraps the authority and turns any
//! failure into "not permitted".
//!
//! ```rust,no_run
//! use launchkit_admin::{LocalAuthority, PermissionResolver, Principal};
//!
//! # async fn example() {
//! let resolver = PermissionResolver::new(LocalAuthority::default());
//! let principal = Principal::new("user-1", "admin");
//! assert!(resolver.can_ban_users(&principal).await);
//! # }
//! ```

pub mod access;
pub mod authority;
pub mod error;
pub mod guard;
pub mod options;
pub mod principal;
pub mod resolver;

pub use access::{Connector, Role, Statements};
pub use authority::{
    HttpAuthority, HttpAuthorityOptions, LocalAuthority, PermissionAuthority, PermissionQuery,
    Subject,
};
pub use error::AuthError;
pub use guard::{require_admin, require_admin_with};
pub use options::AdminOptions;
pub use principal::Principal;
pub use resolver::{PermissionResolver, PermissionRule, Shorthand, PERMISSION_TABLE};
