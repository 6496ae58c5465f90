//! Pricing orchestrator
//!
//! Runs the stages as a straight line over fresh per-call data:
//!
//! ```text
//! START -> COSTING -> DEMAND -> BLEND -> ADJUST -> BOUND -> DONE
//!              \________\________\________\________\____-> FALLBACK
//! ```
//!
//! The engine is pure: it performs no I/O and holds no mutable state, so one
//! instance can serve any number of concurrent calls.

use super::blend::blend;
use super::bounds::{bound_price, round_to_increment};
use super::capability::enabled_capability_costs;
use super::category::apply_rules;
use super::confidence::{confidence_score, rationale, ConfidenceInputs};
use super::demand::demand_factor;
use super::operational::OperationalCost;
use super::{add, mul, settle, sub};
use crate::policy::PricingPolicy;
use dakshina_common::{
    ExternalRecommendation, PricingOutcome, PricingResult, RateTable, Result,
    ServiceConfiguration, UsageWindow,
};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::debug;

/// Pipeline stage, used in overflow errors and trace events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PricingStage {
    Costing,
    Demand,
    Blend,
    Adjust,
    Bound,
}

impl PricingStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PricingStage::Costing => "costing",
            PricingStage::Demand => "demand",
            PricingStage::Blend => "blend",
            PricingStage::Adjust => "adjust",
            PricingStage::Bound => "bound",
        }
    }
}

/// Everything one calculation reads besides the rate table
#[derive(Debug, Clone, PartialEq)]
pub struct PricingInputs {
    pub config: ServiceConfiguration,
    pub usage: UsageWindow,
    pub recommendation: Option<ExternalRecommendation>,
}

impl PricingInputs {
    pub fn new(config: ServiceConfiguration) -> Self {
        Self {
            config,
            usage: UsageWindow::default(),
            recommendation: None,
        }
    }

    pub fn with_usage(mut self, usage: UsageWindow) -> Self {
        self.usage = usage;
        self
    }

    pub fn with_recommendation(mut self, recommendation: ExternalRecommendation) -> Self {
        self.recommendation = Some(recommendation);
        self
    }
}

/// Deterministic multi-factor pricing engine
#[derive(Debug, Clone, Default)]
pub struct PricingEngine {
    policy: PricingPolicy,
}

impl PricingEngine {
    /// Create an engine; rejects an inconsistent policy
    pub fn new(policy: PricingPolicy) -> Result<Self> {
        policy.validate()?;
        Ok(Self { policy })
    }

    pub fn policy(&self) -> &PricingPolicy {
        &self.policy
    }

    /// Price one service against a rate table snapshot. Never fails.
    pub fn calculate(&self, inputs: &PricingInputs, rates: &RateTable) -> PricingOutcome {
        match self.run(inputs, rates) {
            Ok(result) => PricingOutcome::Priced(result),
            Err(err) => self.fallback(&inputs.config, err.to_string()),
        }
    }

    /// Fallback Pricing for `config`
    pub fn fallback(&self, config: &ServiceConfiguration, reason: String) -> PricingOutcome {
        let policy = &self.policy.fallback;
        let base = if config.base_credits > Decimal::ZERO {
            config.base_credits
        } else {
            self.policy.default_service.base_credits
        };

        let raw = base.checked_mul(policy.multiplier).unwrap_or(base);
        let rounded = round_to_increment(raw, self.policy.bounds.rounding_increment).unwrap_or(raw);
        // same floor and ceiling as a priced result
        let price = bound_price(&self.policy.bounds, base, rounded).unwrap_or(rounded.max(base));

        let cost_breakdown = BTreeMap::from([
            ("base_credits".to_string(), base),
            ("fallback_multiplier".to_string(), policy.multiplier),
        ]);

        let result = PricingResult {
            service_name: config.name.clone(),
            recommended_price: price,
            cost_breakdown,
            confidence_level: policy.confidence,
            rationale: format!("Fallback pricing applied: {reason}"),
            requires_admin_approval: true,
            api_costs: BTreeMap::new(),
            demand_factor: Decimal::ONE,
            applied_rules: Vec::new(),
        };
        PricingOutcome::Fallback { result, reason }
    }

    fn run(&self, inputs: &PricingInputs, rates: &RateTable) -> Result<PricingResult> {
        let config = &inputs.config;
        config.validate()?;
        let mut breakdown = BTreeMap::new();

        // COSTING
        let stage = PricingStage::Costing;
        let capability_costs = enabled_capability_costs(rates, config)?;
        let mut api_costs = BTreeMap::new();
        let mut total_api_cost = Decimal::ZERO;
        for cost in &capability_costs {
            api_costs.insert(cost.breakdown_key(), cost.credits);
            total_api_cost = add(total_api_cost, cost.credits, stage)?;
        }
        breakdown.extend(api_costs.clone());
        breakdown.insert("total_api_cost".to_string(), total_api_cost);

        let operational = OperationalCost::calculate(&self.policy.operational, config)?;
        for (name, value) in operational.components() {
            breakdown.insert(name.to_string(), value);
        }
        let total_operational_cost = operational.total()?;
        breakdown.insert("total_operational_cost".to_string(), total_operational_cost);

        let base_price = add(
            add(config.base_credits, total_api_cost, stage)?,
            total_operational_cost,
            stage,
        )?;
        breakdown.insert("base_credits".to_string(), config.base_credits);
        breakdown.insert("base_price".to_string(), base_price);
        debug!(
            service = %config.name,
            %total_api_cost,
            %total_operational_cost,
            %base_price,
            "costing done"
        );

        // DEMAND
        let factor = demand_factor(&self.policy.demand, inputs.usage)?;
        let demand_price = settle(mul(base_price, factor, PricingStage::Demand)?);
        breakdown.insert(
            "demand_adjustment".to_string(),
            sub(demand_price, base_price, PricingStage::Demand)?,
        );
        debug!(service = %config.name, %factor, %demand_price, "demand applied");

        // BLEND
        let blended = settle(blend(demand_price, inputs.recommendation.as_ref())?);
        breakdown.insert(
            "recommendation_adjustment".to_string(),
            sub(blended, demand_price, PricingStage::Blend)?,
        );

        // ADJUST
        let adjustment = apply_rules(&self.policy.category_rules, config, blended)?;
        let pre_bound_price = adjustment.price;
        breakdown.insert(
            "category_adjustment".to_string(),
            sub(pre_bound_price, blended, PricingStage::Adjust)?,
        );
        breakdown.insert("pre_bound_price".to_string(), pre_bound_price);
        debug!(
            service = %config.name,
            %blended,
            %pre_bound_price,
            rules = adjustment.applied.len(),
            "adjustments applied"
        );

        // BOUND
        let recommended_price =
            bound_price(&self.policy.bounds, config.base_credits, pre_bound_price)?;
        breakdown.insert(
            "bound_adjustment".to_string(),
            sub(recommended_price, pre_bound_price, PricingStage::Bound)?,
        );

        let signals = ConfidenceInputs {
            config,
            capability_costs: &capability_costs,
            total_api_cost,
            base_price,
            demand_factor: factor,
            applied_rules: &adjustment.applied,
        };
        let confidence_level = confidence_score(&self.policy.confidence, &signals);
        let rationale = rationale(&self.policy.confidence, &signals);
        debug!(service = %config.name, %recommended_price, confidence_level, "price computed");

        Ok(PricingResult {
            service_name: config.name.clone(),
            recommended_price,
            cost_breakdown: breakdown,
            confidence_level,
            rationale,
            requires_admin_approval: true,
            api_costs,
            demand_factor: factor,
            applied_rules: adjustment.applied.into_iter().map(|r| r.name).collect(),
        })
    }
}
