//! Category adjuster: ordered multiplicative rules from the policy

use super::{mul, settle, PricingStage};
use crate::policy::CategoryRule;
use dakshina_common::{PricingError, ServiceConfiguration};
use rust_decimal::Decimal;

const STAGE: PricingStage = PricingStage::Adjust;

/// Price after category rules, with the rules that fired
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryAdjustment {
    pub price: Decimal,
    pub applied: Vec<AppliedRule>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppliedRule {
    pub name: String,
    pub multiplier: Decimal,
}

/// Apply every matching rule to `price`, in order
pub fn apply_rules(
    rules: &[CategoryRule],
    config: &ServiceConfiguration,
    price: Decimal,
) -> Result<CategoryAdjustment, PricingError> {
    let mut adjusted = price;
    let mut applied = Vec::new();

    for rule in rules.iter().filter(|r| r.when.matches(config)) {
        if rule.multiplier < Decimal::ZERO {
            return Err(PricingError::InvalidPolicy(format!(
                "category rule {} has negative multiplier {}",
                rule.name, rule.multiplier
            )));
        }
        adjusted = settle(mul(adjusted, rule.multiplier, STAGE)?);
        applied.push(AppliedRule {
            name: rule.name.clone(),
            multiplier: rule.multiplier,
        });
    }

    Ok(CategoryAdjustment {
        price: adjusted,
        applied,
    })
}
