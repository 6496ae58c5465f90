//! Bounds & rounding stage
//!
//! Clamp into `[base_credits, ceiling_multiplier * base_credits]`, then round to
//! the nearest increment with midpoints away from zero. If rounding pushes the
//! price out of the clamp range it steps one increment back inside.

use super::{mul, PricingStage};
use crate::policy::BoundsPolicy;
use dakshina_common::PricingError;
use rust_decimal::{Decimal, RoundingStrategy};

const STAGE: PricingStage = PricingStage::Bound;

/// Round `price` to the nearest multiple of `increment`
pub fn round_to_increment(price: Decimal, increment: Decimal) -> Option<Decimal> {
    let steps = price
        .checked_div(increment)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    steps.checked_mul(increment)
}

/// Clamp and round `price` for a service with `base_credits`
pub fn bound_price(
    policy: &BoundsPolicy,
    base_credits: Decimal,
    price: Decimal,
) -> Result<Decimal, PricingError> {
    let floor = base_credits;
    let ceiling = mul(base_credits, policy.ceiling_multiplier, STAGE)?;
    let clamped = price.clamp(floor, ceiling);

    let increment = policy.rounding_increment;
    let rounded = round_to_increment(clamped, increment)
        .ok_or(PricingError::Overflow { stage: STAGE.as_str() })?;

    let stepped = if rounded < floor {
        rounded + increment
    } else if rounded > ceiling {
        rounded - increment
    } else {
        rounded
    };

    // no increment multiple inside a very narrow range
    if stepped < floor || stepped > ceiling {
        return Ok(clamped);
    }
    Ok(stepped)
}
