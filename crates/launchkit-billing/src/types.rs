//! Billing types: plans, subscriptions, statuses, entitlements.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::BillingError;

/// Identity of a plan tier in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlanId(String);

impl PlanId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlanId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for PlanId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl PartialEq<&str> for PlanId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Subscription plan definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: PlanId,
    pub name: String,
    /// Monthly price in minor currency units (cents).
    pub monthly_price_cents: u64,
    #[serde(default)]
    pub features: Vec<String>,
    /// Payment-provider price id, when the plan is sold through checkout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_id: Option<String>,
}

impl Plan {
    pub fn new(id: &str, name: &str, monthly_price_cents: u64, features: &[&str]) -> Self {
        Self {
            id: PlanId::new(id),
            name: name.to_string(),
            monthly_price_cents,
            features: features.iter().map(|f| f.to_string()).collect(),
            price_id: None,
        }
    }

    pub fn with_price_id(mut self, price_id: impl Into<String>) -> Self {
        self.price_id = Some(price_id.into());
        self
    }
}

/// Subscription statuses reported by the payment provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    Trialing,
    PastDue,
    Canceled,
    Unpaid,
    Incomplete,
    IncompleteExpired,
}

impl SubscriptionStatus {
    pub const ALL: [SubscriptionStatus; 7] = [
        Self::Active,
        Self::Trialing,
        Self::PastDue,
        Self::Canceled,
        Self::Unpaid,
        Self::Incomplete,
        Self::IncompleteExpired,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Trialing => "trialing",
            Self::PastDue => "past_due",
            Self::Canceled => "canceled",
            Self::Unpaid => "unpaid",
            Self::Incomplete => "incomplete",
            Self::IncompleteExpired => "incomplete_expired",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Trialing => "Trialing",
            Self::PastDue => "Past Due",
            Self::Canceled => "Canceled",
            Self::Unpaid => "Unpaid",
            Self::Incomplete => "Incomplete",
            Self::IncompleteExpired => "Incomplete Expired",
        }
    }

    /// Active or trialing: the only states where `cancel_at_period_end` means anything.
    pub fn is_billable(&self) -> bool {
        matches!(self, Self::Active | Self::Trialing)
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubscriptionStatus {
    type Err = BillingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| BillingError::UnknownStatus(s.to_string()))
    }
}

/// One user's billing relationship, as last reported by the payment provider.
///
/// The engine never mutates this record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: String,
    pub user_id: String,
    pub plan: PlanId,
    pub status: SubscriptionStatus,
    #[serde(default)]
    pub current_period_start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub current_period_end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub trial_end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub cancel_at_period_end: bool,
}

impl Subscription {
    pub fn new(
        id: impl Into<String>,
        user_id: impl Into<String>,
        plan: impl Into<PlanId>,
        status: SubscriptionStatus,
    ) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            plan: plan.into(),
            status,
            current_period_start: None,
            current_period_end: None,
            trial_end: None,
            cancel_at_period_end: false,
        }
    }

    pub fn cancel_at_period_end(mut self, flag: bool) -> Self {
        self.cancel_at_period_end = flag;
        self
    }

    pub fn with_period_end(mut self, at: DateTime<Utc>) -> Self {
        self.current_period_end = Some(at);
        self
    }

    pub fn with_trial_end(mut self, at: DateTime<Utc>) -> Self {
        self.trial_end = Some(at);
        self
    }
}

/// Entitlement: computed access based on the subscription's plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entitlement {
    pub plan_id: PlanId,
    pub features: Vec<String>,
    pub is_active: bool,
    pub expires_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_str() {
        for status in SubscriptionStatus::ALL {
            assert_eq!(status.as_str().parse::<SubscriptionStatus>(), Ok(status));
        }
    }

    #[test]
    fn test_unknown_status_is_an_error() {
        let err = "paused".parse::<SubscriptionStatus>().unwrap_err();
        assert_eq!(err, BillingError::UnknownStatus("paused".into()));
    }

    #[test]
    fn test_status_serde_snake_case() {
        let json = serde_json::to_string(&SubscriptionStatus::IncompleteExpired).unwrap();
        assert_eq!(json, "\"incomplete_expired\"");
        assert!(serde_json::from_str::<SubscriptionStatus>("\"bogus\"").is_err());
    }

    #[test]
    fn test_plan_id_is_transparent() {
        let id = PlanId::new("pro");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"pro\"");
        assert_eq!(id, "pro");
    }

    #[test]
    fn test_subscription_deserializes_camel_case() {
        let sub: Subscription = serde_json::from_value(serde_json::json!({
            "id": "sub_1",
            "userId": "u1",
            "plan": "pro",
            "status": "active",
            "currentPeriodEnd": "2025-01-15T00:00:00Z",
            "cancelAtPeriodEnd": true
        }))
        .unwrap();
        assert_eq!(sub.plan, "pro");
        assert!(sub.cancel_at_period_end);
        assert!(sub.trial_end.is_none());
        assert!(sub.current_period_end.is_some());
    }
}
