//! Ordered plan catalog.
//!
//! Tiers are stored lowest to highest; a plan's position is its rank. The
//! catalog is built once and passed to the resolvers, so tests can swap in a
//! different tier list.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::error::BillingError;
use crate::types::{Plan, PlanId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanCatalog {
    plans: Vec<Plan>,
}

impl PlanCatalog {
    /// Build a catalog from plans ordered lowest to highest.
    pub fn new(plans: Vec<Plan>) -> Result<Self, BillingError> {
        if plans.is_empty() {
            return Err(BillingError::EmptyCatalog);
        }
        let mut seen = HashSet::new();
        for plan in &plans {
            if !seen.insert(plan.id.as_str()) {
                return Err(BillingError::DuplicatePlan(plan.id.to_string()));
            }
        }
        Ok(Self { plans })
    }

    /// The built-in `basic < pro < enterprise` tiers.
    pub fn standard() -> Self {
        Self {
            plans: standard_plans(),
        }
    }

    pub fn get(&self, id: &PlanId) -> Result<&Plan, BillingError> {
        self.plans
            .iter()
            .find(|p| &p.id == id)
            .ok_or_else(|| BillingError::UnknownPlan(id.to_string()))
    }

    /// Rank of a plan: 0 for the lowest tier.
    pub fn position(&self, id: &PlanId) -> Result<usize, BillingError> {
        self.plans
            .iter()
            .position(|p| &p.id == id)
            .ok_or_else(|| BillingError::UnknownPlan(id.to_string()))
    }

    pub fn compare(&self, a: &PlanId, b: &PlanId) -> Result<Ordering, BillingError> {
        Ok(self.position(a)?.cmp(&self.position(b)?))
    }

    /// Tiers strictly above `id`, lowest first.
    pub fn above(&self, id: &PlanId) -> Result<Vec<PlanId>, BillingError> {
        let pos = self.position(id)?;
        Ok(self.plans[pos + 1..].iter().map(|p| p.id.clone()).collect())
    }

    /// Tiers strictly below `id`, lowest first.
    pub fn below(&self, id: &PlanId) -> Result<Vec<PlanId>, BillingError> {
        let pos = self.position(id)?;
        Ok(self.plans[..pos].iter().map(|p| p.id.clone()).collect())
    }

    pub fn lowest(&self) -> &Plan {
        &self.plans[0]
    }

    pub fn highest(&self) -> &Plan {
        &self.plans[self.plans.len() - 1]
    }

    /// Find a plan by its payment-provider price id.
    pub fn find_by_price(&self, price_id: &str) -> Option<&Plan> {
        self.plans
            .iter()
            .find(|p| p.price_id.as_deref() == Some(price_id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Plan> {
        self.plans.iter()
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }
}

impl Default for PlanCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

pub(crate) fn standard_plans() -> Vec<Plan> {
    vec![
        Plan::new(
            "basic",
            "Basic",
            999,
            &["Up to 3 projects", "Community support", "Basic analytics"],
        ),
        Plan::new(
            "pro",
            "Pro",
            2999,
            &[
                "Unlimited projects",
                "Priority email support",
                "Advanced analytics",
                "Team collaboration",
            ],
        ),
        Plan::new(
            "enterprise",
            "Enterprise",
            9999,
            &[
                "Everything in Pro",
                "Dedicated account manager",
                "SSO and audit logs",
                "Custom integrations",
                "99.9% uptime SLA",
            ],
        ),
    ]
}
