//! Feature entitlements derived from the current subscription.

use crate::catalog::PlanCatalog;
use crate::error::BillingError;
use crate::status::{classify_subscription, StatusCategory};
use crate::types::{Entitlement, Subscription};

/// Build an entitlement from a subscription and its plan.
///
/// Access stays active through a scheduled cancellation until the period ends.
/// No subscription means no entitlement.
pub fn compute_entitlement(
    subscription: Option<&Subscription>,
    catalog: &PlanCatalog,
) -> Result<Option<Entitlement>, BillingError> {
    let Some(sub) = subscription else {
        return Ok(None);
    };
    let plan = catalog.get(&sub.plan)?;
    let is_active = matches!(
        classify_subscription(sub).category,
        StatusCategory::Healthy | StatusCategory::Trial | StatusCategory::ScheduledCancellation
    );

    Ok(Some(Entitlement {
        plan_id: plan.id.clone(),
        features: plan.features.clone(),
        is_active,
        expires_at: sub.current_period_end,
    }))
}

/// Whether `feature` is currently available to the subscription.
pub fn has_feature(
    subscription: Option<&Subscription>,
    catalog: &PlanCatalog,
    feature: &str,
) -> Result<bool, BillingError> {
    Ok(compute_entitlement(subscription, catalog)?
        .map(|e| e.is_active && e.features.iter().any(|f| f == feature))
        .unwrap_or(false))
}
