//! Recommendation blender: `base * (1 - c) + suggested * c`

use super::{add, mul, sub, PricingStage};
use dakshina_common::{ExternalRecommendation, PricingError};
use rust_decimal::Decimal;

const STAGE: PricingStage = PricingStage::Blend;

/// Confidence-weighted interpolation toward an external suggestion.
///
/// An absent recommendation, or one with a non-positive suggested price, leaves
/// `base` untouched.
pub fn blend(
    base: Decimal,
    recommendation: Option<&ExternalRecommendation>,
) -> Result<Decimal, PricingError> {
    let Some(rec) = recommendation.filter(|r| r.suggested_price > Decimal::ZERO) else {
        return Ok(base);
    };

    let weight = rec.weight();
    let kept = mul(base, sub(Decimal::ONE, weight, STAGE)?, STAGE)?;
    let adopted = mul(rec.suggested_price, weight, STAGE)?;
    add(kept, adopted, STAGE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_absent_recommendation() {
        assert_eq!(blend(dec!(14.2), None).unwrap(), dec!(14.2));
    }

    #[test]
    fn test_zero_suggestion_skipped() {
        let rec = ExternalRecommendation::new(Decimal::ZERO, dec!(0.9));
        assert_eq!(blend(dec!(14.2), Some(&rec)).unwrap(), dec!(14.2));
    }

    #[test]
    fn test_weighted_blend() {
        // 20 * 0.75 + 40 * 0.25
        let rec = ExternalRecommendation::new(dec!(40), dec!(0.25));
        assert_eq!(blend(dec!(20), Some(&rec)).unwrap(), dec!(25));
    }

    #[test]
    fn test_out_of_range_confidence_clamped() {
        let rec = ExternalRecommendation::new(dec!(40), dec!(1.7));
        assert_eq!(blend(dec!(20), Some(&rec)).unwrap(), dec!(40));
    }

    fn price() -> impl Strategy<Value = Decimal> {
        (1i64..10_000_000).prop_map(|cents| Decimal::new(cents, 4))
    }

    proptest! {
        #[test]
        fn prop_zero_confidence_keeps_base(base in price(), suggested in price()) {
            let rec = ExternalRecommendation::new(suggested, Decimal::ZERO);
            prop_assert_eq!(blend(base, Some(&rec)).unwrap(), base);
        }

        #[test]
        fn prop_full_confidence_adopts_suggestion(base in price(), suggested in price()) {
            let rec = ExternalRecommendation::new(suggested, Decimal::ONE);
            prop_assert_eq!(blend(base, Some(&rec)).unwrap(), suggested);
        }

        #[test]
        fn prop_blend_between_inputs(base in price(), suggested in price(), c in 0u32..=100) {
            let rec = ExternalRecommendation::new(suggested, Decimal::new(c.into(), 2));
            let blended = blend(base, Some(&rec)).unwrap();
            prop_assert!(blended >= base.min(suggested) && blended <= base.max(suggested));
        }
    }
}
