//! Pricing pipeline
//!
//! Stages run in a fixed order:
//!
//! ```text
//! COSTING -> DEMAND -> BLEND -> ADJUST -> BOUND
//! ```
//!
//! Any stage error sends the [`PricingEngine`] to Fallback Pricing.

pub mod blend;
pub mod bounds;
pub mod capability;
pub mod category;
pub mod confidence;
pub mod demand;
pub mod engine;
pub mod operational;

pub use capability::{CapabilityCost, CostSource};
pub use engine::{PricingEngine, PricingInputs, PricingStage};
pub use operational::OperationalCost;

use dakshina_common::PricingError;
use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places kept between stages
pub(crate) const STAGE_PRECISION: u32 = 8;

/// Round a stage value to [`STAGE_PRECISION`]
pub(crate) fn settle(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(STAGE_PRECISION, RoundingStrategy::MidpointAwayFromZero)
}

pub(crate) fn add(a: Decimal, b: Decimal, stage: PricingStage) -> Result<Decimal, PricingError> {
    a.checked_add(b).ok_or(PricingError::Overflow { stage: stage.as_str() })
}

pub(crate) fn sub(a: Decimal, b: Decimal, stage: PricingStage) -> Result<Decimal, PricingError> {
    a.checked_sub(b).ok_or(PricingError::Overflow { stage: stage.as_str() })
}

pub(crate) fn mul(a: Decimal, b: Decimal, stage: PricingStage) -> Result<Decimal, PricingError> {
    a.checked_mul(b).ok_or(PricingError::Overflow { stage: stage.as_str() })
}

pub(crate) fn div(a: Decimal, b: Decimal, stage: PricingStage) -> Result<Decimal, PricingError> {
    a.checked_div(b).ok_or(PricingError::Overflow { stage: stage.as_str() })
}
