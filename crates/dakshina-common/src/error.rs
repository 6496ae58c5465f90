//! Error types for the Dakshina pricing system
//!
//! Provides a unified error type and domain-specific error variants

use thiserror::Error;

/// Result type alias using DakshinaError
pub type Result<T> = std::result::Result<T, DakshinaError>;

/// Unified error type for Dakshina operations
#[derive(Debug, Error)]
pub enum DakshinaError {
    // Pricing errors
    #[error("Pricing error: {0}")]
    Pricing(#[from] PricingError),

    // Input validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Collaborator lookup errors (catalog, usage, recommendations)
    #[error("Collaborator error: {0}")]
    Collaborator(String),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    // Rate table and other file storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    // Metrics registration errors
    #[error("Metrics error: {0}")]
    Metrics(String),
}

/// Service configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Service name must not be empty")]
    EmptyName,

    #[error("Base credits must be positive for service {service}: got {value}")]
    NonPositiveBaseCredits { service: String, value: String },

    #[error("Duration must be positive for service {service}")]
    ZeroDuration { service: String },
}

/// Pricing calculation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    #[error("Pricing calculation overflow in {stage}")]
    Overflow { stage: &'static str },

    #[error("Invalid rate for {capability}: {field} must be non-negative, got {value}")]
    InvalidRate {
        capability: String,
        field: &'static str,
        value: String,
    },

    #[error("Invalid pricing policy: {0}")]
    InvalidPolicy(String),
}

impl From<serde_json::Error> for DakshinaError {
    fn from(err: serde_json::Error) -> Self {
        DakshinaError::Serialization(err.to_string())
    }
}
