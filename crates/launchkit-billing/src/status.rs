//! Subscription status classification.
//!
//! Maps a `(status, cancel_at_period_end)` pair to a display category and a
//! billing-date label. A scheduled cancellation always wins over plain
//! active/trialing, so a subscription that is about to end is never shown as
//! healthy.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Subscription, SubscriptionStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatusCategory {
    Healthy,
    ScheduledCancellation,
    Trial,
    PaymentProblem,
    Terminal,
}

impl StatusCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::ScheduledCancellation => "scheduled-cancellation",
            Self::Trial => "trial",
            Self::PaymentProblem => "payment-problem",
            Self::Terminal => "terminal",
        }
    }
}

impl fmt::Display for StatusCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Meaning of the date shown next to a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BillingDateLabel {
    NextBilling,
    ExpiresOn,
    TrialEnds,
    PaymentDue,
}

impl BillingDateLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NextBilling => "Next Billing",
            Self::ExpiresOn => "Expires On",
            Self::TrialEnds => "Trial Ends",
            Self::PaymentDue => "Payment Due",
        }
    }
}

impl fmt::Display for BillingDateLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of [`classify`], shared by the action resolver and the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusClassification {
    pub status: SubscriptionStatus,
    pub category: StatusCategory,
    pub billing_date_label: BillingDateLabel,
}

impl StatusClassification {
    /// Badge text for the status.
    pub fn badge_label(&self) -> &'static str {
        match self.category {
            StatusCategory::ScheduledCancellation => "Canceling",
            _ => self.status.display_name(),
        }
    }
}

/// Classify a status.
///
/// `cancel_at_period_end` is only honoured for active/trialing subscriptions.
/// On any other status the flag is an upstream inconsistency: it is logged and
/// ignored.
pub fn classify(status: SubscriptionStatus, cancel_at_period_end: bool) -> StatusClassification {
    use SubscriptionStatus::*;

    if cancel_at_period_end && !status.is_billable() {
        tracing::warn!(
            status = status.as_str(),
            "cancel_at_period_end set on a non-billable subscription; ignoring flag"
        );
    }

    let category = match status {
        Active | Trialing if cancel_at_period_end => StatusCategory::ScheduledCancellation,
        Active => StatusCategory::Healthy,
        Trialing => StatusCategory::Trial,
        PastDue | Unpaid | Incomplete => StatusCategory::PaymentProblem,
        Canceled | IncompleteExpired => StatusCategory::Terminal,
    };

    let billing_date_label = match category {
        StatusCategory::Healthy => BillingDateLabel::NextBilling,
        StatusCategory::ScheduledCancellation | StatusCategory::Terminal => {
            BillingDateLabel::ExpiresOn
        }
        StatusCategory::Trial => BillingDateLabel::TrialEnds,
        StatusCategory::PaymentProblem => BillingDateLabel::PaymentDue,
    };

    StatusClassification {
        status,
        category,
        billing_date_label,
    }
}

/// Classify a subscription record.
pub fn classify_subscription(subscription: &Subscription) -> StatusClassification {
    classify(subscription.status, subscription.cancel_at_period_end)
}

/// The date the billing-date label refers to.
///
/// Trials point at the trial end (falling back to the period end when the
/// provider did not send one); everything else points at the period end.
pub fn billing_date(
    subscription: &Subscription,
    classification: &StatusClassification,
) -> Option<DateTime<Utc>> {
    match classification.billing_date_label {
        BillingDateLabel::TrialEnds => subscription.trial_end.or(subscription.current_period_end),
        _ => subscription.current_period_end,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_active_is_healthy() {
        let c = classify(SubscriptionStatus::Active, false);
        assert_eq!(c.category, StatusCategory::Healthy);
        assert_eq!(c.billing_date_label.as_str(), "Next Billing");
    }

    #[test]
    fn test_cancel_flag_takes_precedence() {
        for status in [SubscriptionStatus::Active, SubscriptionStatus::Trialing] {
            let c = classify(status, true);
            assert_eq!(c.category, StatusCategory::ScheduledCancellation);
            assert_eq!(c.billing_date_label, BillingDateLabel::ExpiresOn);
            assert_eq!(c.badge_label(), "Canceling");
        }
    }

    #[test]
    fn test_trialing_is_trial() {
        let c = classify(SubscriptionStatus::Trialing, false);
        assert_eq!(c.category, StatusCategory::Trial);
        assert_eq!(c.billing_date_label.as_str(), "Trial Ends");
    }

    #[test]
    fn test_payment_problems() {
        for status in [
            SubscriptionStatus::PastDue,
            SubscriptionStatus::Unpaid,
            SubscriptionStatus::Incomplete,
        ] {
            let c = classify(status, false);
            assert_eq!(c.category, StatusCategory::PaymentProblem);
            assert_eq!(c.billing_date_label.as_str(), "Payment Due");
        }
    }

    #[test]
    fn test_terminal() {
        for status in [SubscriptionStatus::Canceled, SubscriptionStatus::IncompleteExpired] {
            let c = classify(status, false);
            assert_eq!(c.category, StatusCategory::Terminal);
            assert_eq!(c.billing_date_label.as_str(), "Expires On");
        }
    }

    #[test]
    fn test_canceled_ignores_inconsistent_flag() {
        assert_eq!(
            classify(SubscriptionStatus::Canceled, true),
            classify(SubscriptionStatus::Canceled, false)
        );
        assert_eq!(
            classify(SubscriptionStatus::PastDue, true).category,
            StatusCategory::PaymentProblem
        );
    }

    #[test]
    fn test_badge_label_uses_status_name() {
        assert_eq!(classify(SubscriptionStatus::PastDue, false).badge_label(), "Past Due");
        assert_eq!(classify(SubscriptionStatus::Active, false).badge_label(), "Active");
    }

    #[test]
    fn test_billing_date_for_trial_prefers_trial_end() {
        let period_end = Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap();
        let trial_end = Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap();
        let sub = Subscription::new("s1", "u1", "pro", SubscriptionStatus::Trialing)
            .with_period_end(period_end)
            .with_trial_end(trial_end);
        let c = classify_subscription(&sub);
        assert_eq!(billing_date(&sub, &c), Some(trial_end));

        let no_trial_end = Subscription::new("s2", "u1", "pro", SubscriptionStatus::Trialing)
            .with_period_end(period_end);
        assert_eq!(billing_date(&no_trial_end, &c), Some(period_end));
    }

    #[test]
    fn test_billing_date_missing() {
        let sub = Subscription::new("s1", "u1", "pro", SubscriptionStatus::Active);
        assert_eq!(billing_date(&sub, &classify_subscription(&sub)), None);
    }

    #[test]
    fn test_category_serializes_kebab_case() {
        let json = serde_json::to_string(&StatusCategory::ScheduledCancellation).unwrap();
        assert_eq!(json, "\"scheduled-cancellation\"");
    }
}
