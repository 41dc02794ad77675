//! Billing configuration.

use serde::{Deserialize, Serialize};

use crate::catalog::{standard_plans, PlanCatalog};
use crate::error::BillingError;
use crate::presentation::DEFAULT_CURRENCY_SYMBOL;
use crate::types::Plan;

/// Billing configuration, usually loaded from JSON at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingOptions {
    /// Available subscription plans, lowest tier first.
    #[serde(default = "standard_plans")]
    pub plans: Vec<Plan>,
    /// Symbol prefixed to formatted prices.
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_currency_symbol() -> String {
    DEFAULT_CURRENCY_SYMBOL.to_string()
}

impl Default for BillingOptions {
    fn default() -> Self {
        Self {
            plans: standard_plans(),
            currency_symbol: default_currency_symbol(),
        }
    }
}

impl BillingOptions {
    pub fn from_json(json: &str) -> Result<Self, BillingError> {
        serde_json::from_str(json).map_err(|e| BillingError::InvalidConfig(e.to_string()))
    }

    /// Validate the plan list and build the catalog the resolvers consume.
    pub fn catalog(&self) -> Result<PlanCatalog, BillingError> {
        PlanCatalog::new(self.plans.clone())
    }
}
