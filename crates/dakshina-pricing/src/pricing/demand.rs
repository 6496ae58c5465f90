//! Demand signal calculator
//!
//! ```text
//! previous == 0:  idle_factor if recent == 0, else cold_start_factor
//! otherwise:      clamp(intercept + slope * recent / previous, floor, ceiling)
//! ```

use super::{add, div, mul, settle, PricingStage};
use crate::policy::DemandPolicy;
use dakshina_common::{PricingError, UsageWindow};
use rust_decimal::Decimal;

const STAGE: PricingStage = PricingStage::Demand;

/// Bounded demand multiplier for a usage window
pub fn demand_factor(policy: &DemandPolicy, usage: UsageWindow) -> Result<Decimal, PricingError> {
    if usage.previous_count == 0 {
        return Ok(if usage.recent_count == 0 {
            policy.idle_factor
        } else {
            policy.cold_start_factor
        });
    }

    let ratio = div(
        Decimal::from(usage.recent_count),
        Decimal::from(usage.previous_count),
        STAGE,
    )?;
    let raw = add(policy.intercept, mul(policy.slope, settle(ratio), STAGE)?, STAGE)?;
    Ok(settle(raw).clamp(policy.floor, policy.ceiling))
}
