//! Core data types for the Dakshina pricing engine

pub mod pricing;
pub mod rates;
pub mod service;
pub mod signals;
