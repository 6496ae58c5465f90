//! # Dakshina Common
//!
//! Shared types and errors for the Dakshina dynamic pricing engine.
//!
//! ## Core Types
//!
//! - [`ServiceConfiguration`]: feature configuration of a sellable service
//! - [`Capability`]: billable third-party capability (voice, video, ...)
//! - [`RateTable`]/[`RateEntry`]: admin-configured capability rates
//! - [`UsageWindow`]: recent vs. previous day usage counts
//! - [`ExternalRecommendation`]: optional analytics price suggestion
//! - [`PricingResult`]/[`PricingOutcome`]: advisory price and how it was produced
//! - [`PriceReview`]: batch review row with [`Urgency`]

pub mod error;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{DakshinaError, PricingError, Result, ValidationError};
pub use types::{
    pricing::{PriceReview, PricingOutcome, PricingResult, ServiceListing, Urgency},
    rates::{RateEntry, RateTable},
    service::{Capability, ServiceConfiguration, ServiceTier, UsageProfile},
    signals::{ExternalRecommendation, UsageWindow},
};

/// Dakshina version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Target pricing calculation latency in milliseconds
pub const TARGET_PRICING_LATENCY_MS: u64 = 5;
