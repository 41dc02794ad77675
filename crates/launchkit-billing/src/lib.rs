//! # launchkit-billing
//!
//! Subscription state and entitlement engine.
//!
//! - [`catalog`]: ordered plan tiers
//! - [`status`]: status → display category and billing-date label
//! - [`actions`]: which management actions are valid right now
//! - [`presentation`]: human-readable rendering of the above
//! - [`entitlement`]: feature access derived from the subscription
//!
//! Everything here is pure and synchronous. The engine reads subscription
//! records; it never writes them or talks to the payment provider.

pub mod actions;
pub mod catalog;
pub mod config;
pub mod entitlement;
pub mod error;
pub mod presentation;
pub mod status;
pub mod types;

pub use actions::{ensure_permitted, resolve, resolve_actions, ActionAvailability, ManagementAction};
pub use catalog::PlanCatalog;
pub use config::BillingOptions;
pub use entitlement::{compute_entitlement, has_feature};
pub use error::BillingError;
pub use presentation::{BillingOverview, StatusBadge, SubscriptionSummary};
pub use status::{
    classify, classify_subscription, BillingDateLabel, StatusCategory, StatusClassification,
};
pub use types::*;
