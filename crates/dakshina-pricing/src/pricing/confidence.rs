//! Confidence score and rationale
//!
//! Confidence is the unweighted mean of four signals: rate resolution, API
//! cost presence, demand stability and a knowledge-domain baseline.

use super::capability::{CapabilityCost, CostSource};
use super::category::AppliedRule;
use crate::policy::ConfidencePolicy;
use dakshina_common::ServiceConfiguration;
use rust_decimal::{Decimal, RoundingStrategy};

/// Inputs the generator reads from a completed pipeline run
#[derive(Debug)]
pub struct ConfidenceInputs<'a> {
    pub config: &'a ServiceConfiguration,
    pub capability_costs: &'a [CapabilityCost],
    pub total_api_cost: Decimal,
    pub base_price: Decimal,
    pub demand_factor: Decimal,
    pub applied_rules: &'a [AppliedRule],
}

/// Mean of the four confidence signals, in [0, 1]
pub fn confidence_score(policy: &ConfidencePolicy, inputs: &ConfidenceInputs<'_>) -> f64 {
    let rates = if inputs
        .capability_costs
        .iter()
        .all(|c| c.source == CostSource::RateTable)
    {
        policy.resolved_rates
    } else {
        policy.fallback_rates
    };

    let api = if inputs.total_api_cost > Decimal::ZERO {
        policy.api_cost_present
    } else {
        policy.api_cost_absent
    };

    let stable_band = policy.stable_band_low..=policy.stable_band_high;
    let demand = if stable_band.contains(&inputs.demand_factor) {
        policy.stable_demand
    } else {
        policy.volatile_demand
    };

    let domains = inputs.config.knowledge_domains.len() as f64;
    let baseline = (policy.domain_baseline + policy.per_domain * domains).min(policy.domain_cap);

    ((rates + api + demand + baseline) / 4.0).clamp(0.0, 1.0)
}

/// Short deterministic explanation of the price
pub fn rationale(policy: &ConfidencePolicy, inputs: &ConfidenceInputs<'_>) -> String {
    let mut parts = vec![format!("Base cost {} credits", money(inputs.base_price))];

    let api: Vec<String> = inputs
        .capability_costs
        .iter()
        .filter(|c| c.credits > Decimal::ZERO)
        .map(|c| format!("{} {}", c.capability, money(c.credits)))
        .collect();
    if !api.is_empty() {
        parts.push(format!("API costs: {}", api.join(", ")));
    }

    let mut features: Vec<&str> = inputs
        .capability_costs
        .iter()
        .map(|c| c.capability.key())
        .collect();
    if inputs.config.chart_generation {
        features.push("chart_generation");
    }
    if inputs.config.remedy_generation {
        features.push("remedy_generation");
    }
    if !features.is_empty() {
        parts.push(format!("Features: {}", features.join(", ")));
    }

    let deviation = inputs.demand_factor - Decimal::ONE;
    if deviation > policy.notable_demand_deviation {
        parts.push(format!("high demand (x{})", money(inputs.demand_factor)));
    } else if -deviation > policy.notable_demand_deviation {
        parts.push(format!("promotional pricing (x{})", money(inputs.demand_factor)));
    }

    if !inputs.applied_rules.is_empty() {
        let rules: Vec<String> = inputs
            .applied_rules
            .iter()
            .map(|r| format!("{} (x{})", r.name, r.multiplier.normalize()))
            .collect();
        parts.push(format!("Rules: {}", rules.join(", ")));
    }

    parts.join("; ")
}

fn money(value: Decimal) -> String {
    format!(
        "{:.2}",
        value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}
