//! Pricing result types
//!
//! Every computed price is advisory: `requires_admin_approval` is always set.
//! A [`PricingOutcome`] tells callers whether the price came from the full
//! pipeline or from Fallback Pricing.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Price recommendation for one service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingResult {
    /// Service the price was computed for
    pub service_name: String,

    /// Final price in credits, a multiple of 0.5
    pub recommended_price: Decimal,

    /// Named cost components
    pub cost_breakdown: BTreeMap<String, Decimal>,

    /// Confidence in the recommendation (0.0 - 1.0)
    pub confidence_level: f64,

    /// Human-readable explanation
    pub rationale: String,

    /// Always true; prices are applied only after admin review
    pub requires_admin_approval: bool,

    /// Capability-cost subset of `cost_breakdown`
    pub api_costs: BTreeMap<String, Decimal>,

    /// Demand multiplier that was applied
    pub demand_factor: Decimal,

    /// Category rules that fired, in application order
    pub applied_rules: Vec<String>,
}

impl PricingResult {
    /// Look up a breakdown component, zero when absent
    pub fn component(&self, name: &str) -> Decimal {
        self.cost_breakdown.get(name).copied().unwrap_or(Decimal::ZERO)
    }

    /// Sum of capability costs
    pub fn total_api_cost(&self) -> Decimal {
        self.api_costs.values().copied().sum()
    }
}

/// Result of a pricing calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PricingOutcome {
    /// Full pipeline completed
    Priced(PricingResult),
    /// Pipeline failed; deterministic low-confidence price
    Fallback { result: PricingResult, reason: String },
}

impl PricingOutcome {
    /// The price recommendation, whichever path produced it
    pub fn result(&self) -> &PricingResult {
        match self {
            PricingOutcome::Priced(result) => result,
            PricingOutcome::Fallback { result, .. } => result,
        }
    }

    pub fn into_result(self) -> PricingResult {
        match self {
            PricingOutcome::Priced(result) => result,
            PricingOutcome::Fallback { result, .. } => result,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, PricingOutcome::Fallback { .. })
    }

    /// Why Fallback Pricing was used
    pub fn fallback_reason(&self) -> Option<&str> {
        match self {
            PricingOutcome::Priced(_) => None,
            PricingOutcome::Fallback { reason, .. } => Some(reason),
        }
    }
}

/// How urgently a stored price should be reviewed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Low,
    Medium,
    High,
}

impl Urgency {
    /// Urgency from the gap between recommended and stored price
    pub fn from_gap(recommended: Decimal, current: Decimal) -> Self {
        let gap = (recommended - current).abs();
        if gap > Decimal::TWO {
            Urgency::High
        } else if gap > Decimal::ONE {
            Urgency::Medium
        } else {
            Urgency::Low
        }
    }
}

/// Service selected for batch recomputation, with its stored price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceListing {
    pub name: String,
    /// Price currently charged
    pub current_price: Decimal,
}

/// One row of the admin review list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceReview {
    pub service_name: String,
    pub outcome: PricingOutcome,
    pub current_price: Decimal,
    pub urgency: Urgency,
}

impl PriceReview {
    pub fn new(service_name: String, outcome: PricingOutcome, current_price: Decimal) -> Self {
        let urgency = Urgency::from_gap(outcome.result().recommended_price, current_price);
        Self {
            service_name,
            outcome,
            current_price,
            urgency,
        }
    }
}
