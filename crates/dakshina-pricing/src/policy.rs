//! Pricing policy
//!
//! Every heuristic figure the engine uses lives here as data: the demand
//! curve, operational unit costs, category rules, bounds, confidence signal
//! scores and fallback constants. `PricingPolicy::default()` carries the
//! production values; deployments override them through [`crate::config`].

use dakshina_common::{Capability, PricingError, ServiceConfiguration, ServiceTier};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// All tunable pricing figures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingPolicy {
    pub demand: DemandPolicy,
    pub operational: OperationalCosts,
    /// Category rules, applied in order
    pub category_rules: Vec<CategoryRule>,
    pub bounds: BoundsPolicy,
    pub confidence: ConfidencePolicy,
    pub fallback: FallbackPolicy,
    /// Configuration used when the catalog has no entry for a service
    pub default_service: DefaultService,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            demand: DemandPolicy::default(),
            operational: OperationalCosts::default(),
            category_rules: CategoryRule::defaults(),
            bounds: BoundsPolicy::default(),
            confidence: ConfidencePolicy::default(),
            fallback: FallbackPolicy::default(),
            default_service: DefaultService::default(),
        }
    }
}

impl PricingPolicy {
    /// Check the figures the engine relies on
    pub fn validate(&self) -> Result<(), PricingError> {
        let d = &self.demand;
        if d.floor < Decimal::ZERO || d.floor > d.ceiling {
            return Err(invalid(format!(
                "demand floor {} must be within [0, ceiling {}]",
                d.floor, d.ceiling
            )));
        }
        if d.slope < Decimal::ZERO {
            return Err(invalid(format!("demand slope {} must be non-negative", d.slope)));
        }

        let o = &self.operational;
        for (name, value) in [
            ("per_knowledge_domain", o.per_knowledge_domain),
            ("per_persona_mode", o.per_persona_mode),
            ("chart_generation", o.chart_generation),
            ("remedy_generation", o.remedy_generation),
            ("server_per_minute", o.server_per_minute),
            ("storage", o.storage),
            ("monitoring", o.monitoring),
        ] {
            if value < Decimal::ZERO {
                return Err(invalid(format!("operational cost {name} is negative: {value}")));
            }
        }

        for rule in &self.category_rules {
            if rule.multiplier < Decimal::ZERO {
                return Err(invalid(format!(
                    "category rule {} has negative multiplier {}",
                    rule.name, rule.multiplier
                )));
            }
        }

        if self.bounds.ceiling_multiplier < Decimal::ONE {
            return Err(invalid(format!(
                "ceiling multiplier {} must be at least 1",
                self.bounds.ceiling_multiplier
            )));
        }
        if self.bounds.rounding_increment <= Decimal::ZERO {
            return Err(invalid(format!(
                "rounding increment {} must be positive",
                self.bounds.rounding_increment
            )));
        }

        if self.fallback.multiplier < Decimal::ZERO {
            return Err(invalid(format!(
                "fallback multiplier {} is negative",
                self.fallback.multiplier
            )));
        }
        if !(0.0..=1.0).contains(&self.fallback.confidence) {
            return Err(invalid(format!(
                "fallback confidence {} outside [0, 1]",
                self.fallback.confidence
            )));
        }

        let c = &self.confidence;
        for (name, value) in [
            ("resolved_rates", c.resolved_rates),
            ("fallback_rates", c.fallback_rates),
            ("api_cost_present", c.api_cost_present),
            ("api_cost_absent", c.api_cost_absent),
            ("stable_demand", c.stable_demand),
            ("volatile_demand", c.volatile_demand),
            ("domain_baseline", c.domain_baseline),
            ("domain_cap", c.domain_cap),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(format!("confidence signal {name} outside [0, 1]: {value}")));
            }
        }

        let s = &self.default_service;
        if s.base_credits <= Decimal::ZERO || s.duration_minutes == 0 {
            return Err(invalid(
                "default service needs positive base credits and duration".to_string(),
            ));
        }
        Ok(())
    }
}

fn invalid(message: String) -> PricingError {
    PricingError::InvalidPolicy(message)
}

/// Demand curve: `clamp(intercept + slope * recent / previous, floor, ceiling)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemandPolicy {
    pub intercept: Decimal,
    pub slope: Decimal,
    pub floor: Decimal,
    pub ceiling: Decimal,
    /// Factor when there is activity but no previous-day baseline
    pub cold_start_factor: Decimal,
    /// Factor when both windows are empty
    pub idle_factor: Decimal,
}

impl Default for DemandPolicy {
    fn default() -> Self {
        Self {
            intercept: dec!(0.8),
            slope: dec!(0.6),
            floor: dec!(0.7),
            ceiling: dec!(1.5),
            cold_start_factor: dec!(1.2),
            idle_factor: Decimal::ONE,
        }
    }
}

/// Internal (non third-party) costs, in credits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperationalCosts {
    pub per_knowledge_domain: Decimal,
    pub per_persona_mode: Decimal,
    pub chart_generation: Decimal,
    pub remedy_generation: Decimal,
    pub server_per_minute: Decimal,
    pub storage: Decimal,
    pub monitoring: Decimal,
}

impl Default for OperationalCosts {
    fn default() -> Self {
        Self {
            per_knowledge_domain: dec!(0.3),
            per_persona_mode: Decimal::ZERO,
            chart_generation: dec!(1.5),
            remedy_generation: dec!(1.2),
            server_per_minute: dec!(0.05),
            storage: dec!(0.1),
            monitoring: dec!(0.05),
        }
    }
}

/// Named multiplicative rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub name: String,
    pub multiplier: Decimal,
    #[serde(default)]
    pub when: RuleCondition,
}

impl CategoryRule {
    pub fn new(name: impl Into<String>, multiplier: Decimal, when: RuleCondition) -> Self {
        Self {
            name: name.into(),
            multiplier,
            when,
        }
    }

    /// Production rule set, in application order
    pub fn defaults() -> Vec<CategoryRule> {
        vec![
            // subsidized community sessions
            CategoryRule::new(
                "donation_community",
                dec!(0.75),
                RuleCondition::category("satsang").with_donations(),
            ),
            CategoryRule::new(
                "premium_bundle",
                dec!(1.1),
                RuleCondition::category("comprehensive")
                    .with_capability(Capability::Interactive)
                    .with_chart()
                    .with_remedy(),
            ),
            // volume discount
            CategoryRule::new(
                "quick_horoscope",
                dec!(0.9),
                RuleCondition::category("horoscope").shorter_than(10),
            ),
            CategoryRule::new(
                "premium_interactive",
                dec!(1.3),
                RuleCondition::default()
                    .with_tier(ServiceTier::Premium)
                    .with_capability(Capability::Interactive),
            ),
        ]
    }
}

/// Conditions a service must meet for a rule to fire; unset fields match anything
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleCondition {
    /// Category, compared case-insensitively
    pub category: Option<String>,
    /// Capabilities that must all be enabled
    pub capabilities: BTreeSet<Capability>,
    pub requires_chart: bool,
    pub requires_remedy: bool,
    pub donation_enabled: Option<bool>,
    pub tier: Option<ServiceTier>,
    /// Duration must be strictly below this
    pub max_duration_minutes: Option<u32>,
}

impl RuleCondition {
    pub fn category(category: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            ..Self::default()
        }
    }

    pub fn with_capability(mut self, capability: Capability) -> Self {
        self.capabilities.insert(capability);
        self
    }

    pub fn with_chart(mut self) -> Self {
        self.requires_chart = true;
        self
    }

    pub fn with_remedy(mut self) -> Self {
        self.requires_remedy = true;
        self
    }

    pub fn with_donations(mut self) -> Self {
        self.donation_enabled = Some(true);
        self
    }

    pub fn with_tier(mut self, tier: ServiceTier) -> Self {
        self.tier = Some(tier);
        self
    }

    pub fn shorter_than(mut self, minutes: u32) -> Self {
        self.max_duration_minutes = Some(minutes);
        self
    }

    /// Whether `config` satisfies every set condition
    pub fn matches(&self, config: &ServiceConfiguration) -> bool {
        if let Some(category) = &self.category {
            if !category.eq_ignore_ascii_case(&config.category) {
                return false;
            }
        }
        if !self.capabilities.iter().all(|c| config.has(*c)) {
            return false;
        }
        if self.requires_chart && !config.chart_generation {
            return false;
        }
        if self.requires_remedy && !config.remedy_generation {
            return false;
        }
        if let Some(donations) = self.donation_enabled {
            if donations != config.donation_enabled {
                return false;
            }
        }
        if let Some(tier) = self.tier {
            if tier != config.tier {
                return false;
            }
        }
        if let Some(max) = self.max_duration_minutes {
            if config.duration_minutes >= max {
                return false;
            }
        }
        true
    }
}

/// Price floor/ceiling and rounding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundsPolicy {
    /// Ceiling as a multiple of base credits
    pub ceiling_multiplier: Decimal,
    pub rounding_increment: Decimal,
}

impl Default for BoundsPolicy {
    fn default() -> Self {
        Self {
            ceiling_multiplier: dec!(3),
            rounding_increment: dec!(0.5),
        }
    }
}

/// Scores for the four confidence signals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidencePolicy {
    /// Every enabled capability priced from the rate table
    pub resolved_rates: f64,
    /// At least one capability priced from a fallback constant
    pub fallback_rates: f64,
    pub api_cost_present: f64,
    pub api_cost_absent: f64,
    /// Demand factor inside the stable band
    pub stable_demand: f64,
    pub volatile_demand: f64,
    pub stable_band_low: Decimal,
    pub stable_band_high: Decimal,
    pub domain_baseline: f64,
    pub per_domain: f64,
    pub domain_cap: f64,
    /// Demand departure from 1.0 that earns a rationale note
    pub notable_demand_deviation: Decimal,
}

impl Default for ConfidencePolicy {
    fn default() -> Self {
        Self {
            resolved_rates: 1.0,
            fallback_rates: 0.5,
            api_cost_present: 0.9,
            api_cost_absent: 0.6,
            stable_demand: 0.9,
            volatile_demand: 0.7,
            stable_band_low: dec!(0.9),
            stable_band_high: dec!(1.1),
            domain_baseline: 0.7,
            per_domain: 0.05,
            domain_cap: 0.95,
            notable_demand_deviation: dec!(0.1),
        }
    }
}

/// Fallback Pricing constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackPolicy {
    /// Fallback price as a multiple of base credits
    pub multiplier: Decimal,
    pub confidence: f64,
}

impl Default for FallbackPolicy {
    fn default() -> Self {
        Self {
            multiplier: dec!(1.2),
            confidence: 0.3,
        }
    }
}

/// Minimal configuration for services the catalog does not know
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultService {
    pub category: String,
    pub duration_minutes: u32,
    pub base_credits: Decimal,
}

impl Default for DefaultService {
    fn default() -> Self {
        Self {
            category: "general".to_string(),
            duration_minutes: 15,
            base_credits: dec!(10),
        }
    }
}

impl DefaultService {
    /// Build the default configuration under `name`
    pub fn configuration(&self, name: &str) -> ServiceConfiguration {
        ServiceConfiguration::new(
            name,
            self.category.clone(),
            self.duration_minutes,
            self.base_credits,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_is_valid() {
        assert!(PricingPolicy::default().validate().is_ok());
    }

    #[test]
    fn test_default_rule_order() {
        let names: Vec<_> = CategoryRule::defaults().into_iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            vec![
                "donation_community",
                "premium_bundle",
                "quick_horoscope",
                "premium_interactive"
            ]
        );
    }

    #[test]
    fn test_negative_rule_multiplier_rejected() {
        let mut policy = PricingPolicy::default();
        policy.category_rules.push(CategoryRule::new(
            "broken",
            dec!(-0.5),
            RuleCondition::default(),
        ));
        assert!(matches!(policy.validate(), Err(PricingError::InvalidPolicy(_))));
    }

    #[test]
    fn test_zero_rounding_increment_rejected() {
        let mut policy = PricingPolicy::default();
        policy.bounds.rounding_increment = Decimal::ZERO;
        assert!(policy.validate().is_err());
    }

    #[test]
    fn test_condition_matching() {
        let condition = RuleCondition::category("Horoscope").shorter_than(10);
        let short = ServiceConfiguration::new("daily", "horoscope", 5, dec!(3));
        let long = ServiceConfiguration::new("weekly", "horoscope", 10, dec!(3));
        let other = ServiceConfiguration::new("tarot", "tarot", 5, dec!(3));
        assert!(condition.matches(&short));
        assert!(!condition.matches(&long));
        assert!(!condition.matches(&other));
    }

    #[test]
    fn test_condition_requires_all_capabilities() {
        let condition = RuleCondition::default()
            .with_capability(Capability::Voice)
            .with_capability(Capability::Video);
        let voice_only =
            ServiceConfiguration::new("a", "x", 10, dec!(5)).with_capability(Capability::Voice);
        let both = voice_only.clone().with_capability(Capability::Video);
        assert!(!condition.matches(&voice_only));
        assert!(condition.matches(&both));
    }

    #[test]
    fn test_partial_policy_deserializes_with_defaults() {
        let policy: PricingPolicy =
            serde_json::from_str(r#"{ "demand": { "ceiling": "1.4" } }"#).unwrap();
        assert_eq!(policy.demand.ceiling, dec!(1.4));
        assert_eq!(policy.demand.floor, dec!(0.7));
        assert_eq!(policy.category_rules.len(), 4);
    }

    #[test]
    fn test_default_service_configuration() {
        let config = DefaultService::default().configuration("unknown-service");
        assert_eq!(config.name, "unknown-service");
        assert_eq!(config.duration_minutes, 15);
        assert_eq!(config.base_credits, dec!(10));
        assert!(config.capabilities.is_empty());
    }
}
