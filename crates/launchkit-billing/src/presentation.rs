//! Display formatting for resolved subscription state.
//!
//! Renders only what the classifier and the action resolver already decided.
//! Dates are always formatted in UTC with a single en-US long form so server
//! and client output agree.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::actions::{resolve_actions, ActionAvailability};
use crate::catalog::PlanCatalog;
use crate::error::BillingError;
use crate::status::{billing_date, classify_subscription, StatusCategory, StatusClassification};
use crate::types::{PlanId, Subscription};

pub const DEFAULT_CURRENCY_SYMBOL: &str = "$";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeIcon {
    Checkmark,
    Clock,
    Warning,
    Cross,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeVariant {
    Success,
    Info,
    Warning,
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusBadge {
    pub label: String,
    pub icon: BadgeIcon,
    pub variant: BadgeVariant,
}

/// Badge for a classified status.
pub fn status_badge(classification: &StatusClassification) -> StatusBadge {
    let (icon, variant) = match classification.category {
        StatusCategory::Healthy => (BadgeIcon::Checkmark, BadgeVariant::Success),
        StatusCategory::Trial => (BadgeIcon::Clock, BadgeVariant::Info),
        StatusCategory::ScheduledCancellation | StatusCategory::PaymentProblem => {
            (BadgeIcon::Warning, BadgeVariant::Warning)
        }
        StatusCategory::Terminal => (BadgeIcon::Cross, BadgeVariant::Destructive),
    };
    StatusBadge {
        label: classification.badge_label().to_string(),
        icon,
        variant,
    }
}

/// `"pro"` → `"Pro Plan"`, `"team-plus"` → `"Team Plus Plan"`.
pub fn format_plan_title(plan: &PlanId) -> String {
    let name = plan
        .as_str()
        .split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ");
    format!("{name} Plan")
}

/// Fixed two-decimal price with thousands separators: `2999` → `"$29.99"`.
pub fn format_price(cents: u64, currency_symbol: &str) -> String {
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{currency_symbol}{grouped}.{:02}", cents % 100)
}

/// Long-form UTC date: `"January 15, 2025"`.
pub fn format_date(at: &DateTime<Utc>) -> String {
    at.format("%B %-d, %Y").to_string()
}

/// Rendered "Current Subscription" section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionSummary {
    pub plan_title: String,
    pub price: String,
    pub badge: StatusBadge,
    pub billing_date_label: String,
    pub billing_date: Option<String>,
    pub features: Vec<String>,
}

impl SubscriptionSummary {
    pub fn render(
        subscription: &Subscription,
        catalog: &PlanCatalog,
        currency_symbol: &str,
    ) -> Result<Self, BillingError> {
        let plan = catalog.get(&subscription.plan)?;
        let classification = classify_subscription(subscription);
        Ok(Self {
            plan_title: format_plan_title(&plan.id),
            price: format_price(plan.monthly_price_cents, currency_symbol),
            badge: status_badge(&classification),
            billing_date_label: classification.billing_date_label.to_string(),
            billing_date: billing_date(subscription, &classification).map(|at| format_date(&at)),
            features: plan.features.clone(),
        })
    }
}

/// Everything the billing page needs for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingOverview {
    pub availability: ActionAvailability,
    pub classification: Option<StatusClassification>,
    /// Absent when there is no subscription: no "Current Subscription" section.
    pub summary: Option<SubscriptionSummary>,
}

impl BillingOverview {
    pub fn build(
        subscription: Option<&Subscription>,
        catalog: &PlanCatalog,
        currency_symbol: &str,
    ) -> Result<Self, BillingError> {
        let availability = resolve_actions(catalog, subscription)?;
        let summary = subscription
            .map(|sub| SubscriptionSummary::render(sub, catalog, currency_symbol))
            .transpose()?;
        Ok(Self {
            availability,
            classification: subscription.map(classify_subscription),
            summary,
        })
    }
}
