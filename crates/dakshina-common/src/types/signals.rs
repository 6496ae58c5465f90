//! Demand and recommendation signals supplied by collaborators

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Usage counts for the last day and the day before it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageWindow {
    /// Events in the last day
    pub recent_count: u64,
    /// Events in the day before that
    pub previous_count: u64,
}

impl UsageWindow {
    pub fn new(recent_count: u64, previous_count: u64) -> Self {
        Self {
            recent_count,
            previous_count,
        }
    }
}

/// Suggested price from the analytics component
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExternalRecommendation {
    /// Suggested price in credits
    pub suggested_price: Decimal,
    /// Weight of the suggestion, 0-1
    pub confidence: Decimal,
}

impl ExternalRecommendation {
    pub fn new(suggested_price: Decimal, confidence: Decimal) -> Self {
        Self {
            suggested_price,
            confidence,
        }
    }

    /// Confidence clamped into [0, 1]
    pub fn weight(&self) -> Decimal {
        self.confidence.clamp(Decimal::ZERO, Decimal::ONE)
    }
}
