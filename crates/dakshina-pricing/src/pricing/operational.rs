//! Operational cost calculator: internal costs driven by configuration complexity

use super::{add, mul, PricingStage};
use crate::policy::OperationalCosts;
use dakshina_common::{PricingError, ServiceConfiguration};
use rust_decimal::Decimal;

const STAGE: PricingStage = PricingStage::Costing;

/// Operational cost components, in credits
#[derive(Debug, Clone, PartialEq)]
pub struct OperationalCost {
    pub knowledge_domains: Decimal,
    pub persona_modes: Decimal,
    pub chart_generation: Decimal,
    pub remedy_generation: Decimal,
    pub server: Decimal,
    pub storage: Decimal,
    pub monitoring: Decimal,
}

impl OperationalCost {
    /// Compute every component for `config`
    pub fn calculate(
        costs: &OperationalCosts,
        config: &ServiceConfiguration,
    ) -> Result<Self, PricingError> {
        let domains = Decimal::from(config.knowledge_domains.len());
        let personas = Decimal::from(config.persona_modes.len());
        let minutes = Decimal::from(config.duration_minutes);

        Ok(Self {
            knowledge_domains: mul(costs.per_knowledge_domain, domains, STAGE)?,
            persona_modes: mul(costs.per_persona_mode, personas, STAGE)?,
            chart_generation: if config.chart_generation {
                costs.chart_generation
            } else {
                Decimal::ZERO
            },
            remedy_generation: if config.remedy_generation {
                costs.remedy_generation
            } else {
                Decimal::ZERO
            },
            server: mul(costs.server_per_minute, minutes, STAGE)?,
            storage: costs.storage,
            monitoring: costs.monitoring,
        })
    }

    /// Named components, in breakdown order
    pub fn components(&self) -> [(&'static str, Decimal); 7] {
        [
            ("knowledge_domain_cost", self.knowledge_domains),
            ("persona_mode_cost", self.persona_modes),
            ("chart_generation_cost", self.chart_generation),
            ("remedy_generation_cost", self.remedy_generation),
            ("server_cost", self.server),
            ("storage_cost", self.storage),
            ("monitoring_cost", self.monitoring),
        ]
    }

    pub fn total(&self) -> Result<Decimal, PricingError> {
        self.components()
            .into_iter()
            .try_fold(Decimal::ZERO, |acc, (_, value)| add(acc, value, STAGE))
    }
}
