//! Subscription management actions.
//!
//! Availability is a pure function of `(plan, status, cancel_at_period_end)`
//! and the catalog ordering. Nothing here calls the payment provider; callers
//! use the result to decide which buttons to render and whether to attempt a
//! billing mutation at all.
//!
//! | status                       | flag  | cancel | reactivate | up/downgrade |
//! |------------------------------|-------|--------|------------|--------------|
//! | active / trialing            | false | yes    | no         | yes          |
//! | active / trialing            | true  | no     | yes        | yes          |
//! | canceled, past_due, unpaid   | -     | no     | yes        | no           |
//! | incomplete(_expired)         | -     | no     | no         | no           |
//! | no subscription              | -     | no     | no         | no           |

use std::fmt;

use launchkit_core::Denial;
use serde::{Deserialize, Serialize};

use crate::catalog::PlanCatalog;
use crate::error::BillingError;
use crate::types::{PlanId, Subscription, SubscriptionStatus};

/// An action a user can take on their subscription.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "plan", rename_all = "kebab-case")]
pub enum ManagementAction {
    Cancel,
    Reactivate,
    Upgrade(PlanId),
    Downgrade(PlanId),
    ManageBilling,
}

impl fmt::Display for ManagementAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cancel => f.write_str("cancel"),
            Self::Reactivate => f.write_str("reactivate"),
            Self::Upgrade(plan) => write!(f, "upgrade to {plan}"),
            Self::Downgrade(plan) => write!(f, "downgrade to {plan}"),
            Self::ManageBilling => f.write_str("manage billing"),
        }
    }
}

/// Which management actions are valid right now. Derived, never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionAvailability {
    pub can_cancel: bool,
    pub can_reactivate: bool,
    pub upgrade_options: Vec<PlanId>,
    pub downgrade_options: Vec<PlanId>,
    /// Any existing subscription can open the billing portal.
    pub can_manage_billing: bool,
}

impl ActionAvailability {
    /// Availability when the user has no subscription record.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn permits(&self, action: &ManagementAction) -> bool {
        match action {
            ManagementAction::Cancel => self.can_cancel,
            ManagementAction::Reactivate => self.can_reactivate,
            ManagementAction::Upgrade(plan) => self.upgrade_options.contains(plan),
            ManagementAction::Downgrade(plan) => self.downgrade_options.contains(plan),
            ManagementAction::ManageBilling => self.can_manage_billing,
        }
    }

    /// Every permitted action, in display order.
    pub fn actions(&self) -> Vec<ManagementAction> {
        let mut actions = Vec::new();
        if self.can_cancel {
            actions.push(ManagementAction::Cancel);
        }
        if self.can_reactivate {
            actions.push(ManagementAction::Reactivate);
        }
        actions.extend(self.upgrade_options.iter().cloned().map(ManagementAction::Upgrade));
        actions.extend(self.downgrade_options.iter().cloned().map(ManagementAction::Downgrade));
        if self.can_manage_billing {
            actions.push(ManagementAction::ManageBilling);
        }
        actions
    }
}

/// Compute availability for an existing subscription's fields.
///
/// Fails on a plan id the catalog does not know, whatever the status.
pub fn resolve(
    catalog: &PlanCatalog,
    plan: &PlanId,
    status: SubscriptionStatus,
    cancel_at_period_end: bool,
) -> Result<ActionAvailability, BillingError> {
    use SubscriptionStatus::*;

    catalog.get(plan)?;

    let availability = match status {
        Active | Trialing => ActionAvailability {
            can_cancel: !cancel_at_period_end,
            can_reactivate: cancel_at_period_end,
            upgrade_options: catalog.above(plan)?,
            downgrade_options: catalog.below(plan)?,
            can_manage_billing: true,
        },
        Canceled | PastDue | Unpaid => ActionAvailability {
            can_reactivate: true,
            can_manage_billing: true,
            ..ActionAvailability::none()
        },
        Incomplete | IncompleteExpired => ActionAvailability {
            can_manage_billing: true,
            ..ActionAvailability::none()
        },
    };

    Ok(availability)
}

/// Compute availability for an optional subscription record.
pub fn resolve_actions(
    catalog: &PlanCatalog,
    subscription: Option<&Subscription>,
) -> Result<ActionAvailability, BillingError> {
    match subscription {
        Some(sub) => resolve(catalog, &sub.plan, sub.status, sub.cancel_at_period_end),
        None => Ok(ActionAvailability::none()),
    }
}

/// Check that `action` may be invoked, explaining the refusal otherwise.
pub fn ensure_permitted(
    subscription: Option<&Subscription>,
    availability: &ActionAvailability,
    action: &ManagementAction,
) -> Result<(), Denial> {
    if availability.permits(action) {
        return Ok(());
    }

    let Some(sub) = subscription else {
        tracing::debug!(%action, "action refused: no subscription");
        return Err(Denial::invalid_state(format!(
            "cannot {action}: there is no subscription"
        )));
    };

    let reason = match action {
        ManagementAction::Cancel if sub.status.is_billable() && sub.cancel_at_period_end => {
            "the subscription is already set to cancel at the end of the period".to_string()
        }
        ManagementAction::Reactivate if sub.status.is_billable() => {
            "the subscription is not scheduled for cancellation".to_string()
        }
        ManagementAction::Upgrade(plan) | ManagementAction::Downgrade(plan)
            if sub.status.is_billable() =>
        {
            format!("{plan} is not a valid target from the {} plan", sub.plan)
        }
        _ => format!("the subscription is {}", sub.status.display_name().to_lowercase()),
    };

    tracing::debug!(%action, status = sub.status.as_str(), %reason, "action refused");
    Err(Denial::invalid_state(format!("cannot {action}: {reason}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(v: &[PlanId]) -> Vec<&str> {
        v.iter().map(|p| p.as_str()).collect()
    }

    #[test]
    fn test_active_pro() {
        let catalog = PlanCatalog::standard();
        let a = resolve(&catalog, &"pro".into(), SubscriptionStatus::Active, false).unwrap();
        assert!(a.can_cancel);
        assert!(!a.can_reactivate);
        assert_eq!(ids(&a.upgrade_options), ["enterprise"]);
        assert_eq!(ids(&a.downgrade_options), ["basic"]);
        assert!(a.can_manage_billing);
    }

    #[test]
    fn test_scheduled_cancellation_keeps_plan_options() {
        let catalog = PlanCatalog::standard();
        let a =
            resolve(&catalog, &"enterprise".into(), SubscriptionStatus::Trialing, true).unwrap();
        assert!(!a.can_cancel);
        assert!(a.can_reactivate);
        assert!(a.upgrade_options.is_empty());
        assert_eq!(ids(&a.downgrade_options), ["basic", "pro"]);
    }

    #[test]
    fn test_recovery_states_only_reactivate() {
        let catalog = PlanCatalog::standard();
        for status in [
            SubscriptionStatus::Canceled,
            SubscriptionStatus::PastDue,
            SubscriptionStatus::Unpaid,
        ] {
            let a = resolve(&catalog, &"basic".into(), status, false).unwrap();
            assert!(!a.can_cancel);
            assert!(a.can_reactivate);
            assert!(a.upgrade_options.is_empty());
            assert!(a.downgrade_options.is_empty());
        }
    }

    #[test]
    fn test_incomplete_exposes_nothing() {
        let catalog = PlanCatalog::standard();
        for status in [SubscriptionStatus::Incomplete, SubscriptionStatus::IncompleteExpired] {
            let a = resolve(&catalog, &"pro".into(), status, false).unwrap();
            assert!(!a.can_cancel && !a.can_reactivate);
            assert!(a.upgrade_options.is_empty() && a.downgrade_options.is_empty());
        }
    }

    #[test]
    fn test_unknown_plan_fails_for_every_status() {
        let catalog = PlanCatalog::standard();
        for status in SubscriptionStatus::ALL {
            assert_eq!(
                resolve(&catalog, &"gold".into(), status, false),
                Err(BillingError::UnknownPlan("gold".into()))
            );
        }
    }

    #[test]
    fn test_no_subscription() {
        let a = resolve_actions(&PlanCatalog::standard(), None).unwrap();
        assert_eq!(a, ActionAvailability::none());
        assert!(a.actions().is_empty());
    }

    #[test]
    fn test_actions_listing() {
        let catalog = PlanCatalog::standard();
        let a = resolve(&catalog, &"pro".into(), SubscriptionStatus::Active, false).unwrap();
        assert_eq!(
            a.actions(),
            vec![
                ManagementAction::Cancel,
                ManagementAction::Upgrade("enterprise".into()),
                ManagementAction::Downgrade("basic".into()),
                ManagementAction::ManageBilling,
            ]
        );
    }

    #[test]
    fn test_permits() {
        let catalog = PlanCatalog::standard();
        let a = resolve(&catalog, &"basic".into(), SubscriptionStatus::Active, false).unwrap();
        assert!(a.permits(&ManagementAction::Upgrade("enterprise".into())));
        assert!(!a.permits(&ManagementAction::Downgrade("basic".into())));
        assert!(!a.permits(&ManagementAction::Upgrade("basic".into())));
        assert!(!a.permits(&ManagementAction::Reactivate));
    }

    #[test]
    fn test_ensure_permitted_explains_refusal() {
        let catalog = PlanCatalog::standard();
        let sub = Subscription::new("s1", "u1", "pro", SubscriptionStatus::Active)
            .cancel_at_period_end(true);
        let a = resolve_actions(&catalog, Some(&sub)).unwrap();

        assert!(ensure_permitted(Some(&sub), &a, &ManagementAction::Reactivate).is_ok());
        let denial = ensure_permitted(Some(&sub), &a, &ManagementAction::Cancel).unwrap_err();
        match denial {
            Denial::InvalidState { reason } => assert!(reason.contains("already set to cancel")),
            other => panic!("unexpected denial {other:?}"),
        }
    }

    #[test]
    fn test_ensure_permitted_past_due_upgrade() {
        let catalog = PlanCatalog::standard();
        let sub = Subscription::new("s1", "u1", "basic", SubscriptionStatus::PastDue);
        let a = resolve_actions(&catalog, Some(&sub)).unwrap();
        let denial =
            ensure_permitted(Some(&sub), &a, &ManagementAction::Upgrade("pro".into())).unwrap_err();
        assert_eq!(
            denial,
            Denial::invalid_state("cannot upgrade to pro: the subscription is past due")
        );
    }

    #[test]
    fn test_ensure_permitted_without_subscription() {
        let denial = ensure_permitted(
            None,
            &ActionAvailability::none(),
            &ManagementAction::ManageBilling,
        )
        .unwrap_err();
        assert_eq!(
            denial,
            Denial::invalid_state("cannot manage billing: there is no subscription")
        );
    }

    #[test]
    fn test_action_serde() {
        let json = serde_json::to_value(ManagementAction::Upgrade("pro".into())).unwrap();
        assert_eq!(json, serde_json::json!({"type": "upgrade", "plan": "pro"}));
        let json = serde_json::to_value(ManagementAction::Cancel).unwrap();
        assert_eq!(json, serde_json::json!({"type": "cancel"}));
    }
}
