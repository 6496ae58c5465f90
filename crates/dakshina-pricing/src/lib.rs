//! # Dakshina Pricing
//!
//! Dynamic multi-factor pricing for guidance services.
//!
//! ## Pricing Formula
//!
//! ```text
//! base     = base_credits + API costs + operational costs
//! price    = base * demand
//! price    = blend(price, recommendation)
//! price    = price * category multipliers
//! price    = round_half(clamp(price, B, 3B))
//! ```
//!
//! Where:
//! - API costs: per-capability rates converted to credits
//! - demand: bounded multiplier from recent vs previous usage
//! - recommendation: optional outside suggestion, weighted by its confidence
//! - B: the service's configured base credits
//!
//! Every result requires admin approval before it is charged.

pub mod collaborators;
pub mod config;
pub mod metrics;
pub mod policy;
pub mod pricing;
pub mod rates;
pub mod service;

pub use collaborators::{InMemoryCollaborators, RecommendationSource, ServiceCatalog, UsageSource};
pub use crate::config::PricingConfig;
pub use metrics::PricingMetrics;
pub use policy::PricingPolicy;
pub use pricing::{PricingEngine, PricingInputs};
pub use rates::RateTableStore;
pub use service::PricingService;
