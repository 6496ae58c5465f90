//! Capability cost calculator
//!
//! ```text
//! cost = (duration * cost_per_minute + units * cost_per_unit + setup_cost)
//!        * credits_per_currency_unit
//! units = per_minute * duration + per_session
//! ```
//!
//! A capability with no rate entry costs its fallback constant instead.

use super::{add, mul, settle, PricingStage};
use dakshina_common::{Capability, PricingError, RateEntry, RateTable, ServiceConfiguration};
use rust_decimal::Decimal;

const STAGE: PricingStage = PricingStage::Costing;

/// Where a capability cost came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CostSource {
    /// Priced from a rate table entry
    RateTable,
    /// Rate entry missing; fallback constant used
    Fallback,
}

/// Credit cost of one enabled capability
#[derive(Debug, Clone, PartialEq)]
pub struct CapabilityCost {
    pub capability: Capability,
    pub credits: Decimal,
    pub source: CostSource,
}

impl CapabilityCost {
    /// Breakdown key, e.g. `voice_cost`
    pub fn breakdown_key(&self) -> String {
        format!("{}_cost", self.capability.key())
    }
}

/// Cost of `capability` for one session of `config`
pub fn capability_cost(
    capability: Capability,
    rates: &RateTable,
    config: &ServiceConfiguration,
) -> Result<CapabilityCost, PricingError> {
    match rates.get(capability) {
        Some(entry) => {
            entry.validate(capability)?;
            let credits = priced(capability, entry, rates.conversion_for(entry), config)?;
            Ok(CapabilityCost {
                capability,
                credits: settle(credits),
                source: CostSource::RateTable,
            })
        }
        None => Ok(CapabilityCost {
            capability,
            credits: capability.fallback_credits(),
            source: CostSource::Fallback,
        }),
    }
}

fn priced(
    capability: Capability,
    entry: &RateEntry,
    conversion: Decimal,
    config: &ServiceConfiguration,
) -> Result<Decimal, PricingError> {
    let minutes = Decimal::from(config.duration_minutes);
    let profile = capability.usage_profile();

    let units = add(mul(profile.per_minute, minutes, STAGE)?, profile.per_session, STAGE)?;
    let time_cost = mul(minutes, entry.cost_per_minute, STAGE)?;
    let unit_cost = mul(units, entry.cost_per_unit, STAGE)?;
    let currency = add(add(time_cost, unit_cost, STAGE)?, entry.setup_cost, STAGE)?;

    if conversion < Decimal::ZERO {
        return Err(PricingError::InvalidRate {
            capability: capability.key().to_string(),
            field: "credits_per_currency_unit",
            value: conversion.to_string(),
        });
    }
    mul(currency, conversion, STAGE)
}

/// Costs of every enabled capability, in [`Capability::ALL`] order
pub fn enabled_capability_costs(
    rates: &RateTable,
    config: &ServiceConfiguration,
) -> Result<Vec<CapabilityCost>, PricingError> {
    Capability::ALL
        .into_iter()
        .filter(|c| config.has(*c))
        .map(|c| capability_cost(c, rates, config))
        .collect()
}
