//! Collaborators the pricing service reads from
//!
//! The engine never calls these directly. [`crate::service::PricingService`]
//! resolves them into a `PricingInputs` value before each calculation.

use async_trait::async_trait;
use dakshina_common::{
    ExternalRecommendation, Result, ServiceConfiguration, ServiceListing, UsageWindow,
};
use dashmap::DashMap;
use rust_decimal::Decimal;

/// Admin-managed service catalog
#[async_trait]
pub trait ServiceCatalog: Send + Sync {
    /// Look up a service by name or display name
    async fn get_service_configuration(&self, name: &str) -> Result<Option<ServiceConfiguration>>;

    /// Services opted into dynamic pricing, with their current prices
    async fn dynamic_pricing_services(&self) -> Result<Vec<ServiceListing>>;
}

/// Booking counts for the demand signal
#[async_trait]
pub trait UsageSource: Send + Sync {
    async fn get_usage_window(&self, name: &str) -> Result<Option<UsageWindow>>;
}

/// Optional outside price suggestion
#[async_trait]
pub trait RecommendationSource: Send + Sync {
    async fn get_external_recommendation(&self, name: &str)
        -> Result<Option<ExternalRecommendation>>;
}

#[derive(Debug, Clone)]
struct CatalogEntry {
    config: ServiceConfiguration,
    current_price: Decimal,
}

/// In-memory implementation of all three collaborators
#[derive(Debug, Default)]
pub struct InMemoryCollaborators {
    services: DashMap<String, CatalogEntry>,
    usage: DashMap<String, UsageWindow>,
    recommendations: DashMap<String, ExternalRecommendation>,
}

impl InMemoryCollaborators {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a service, priced at `current_price` today
    pub fn upsert_service(&self, config: ServiceConfiguration, current_price: Decimal) {
        self.services.insert(
            config.name.clone(),
            CatalogEntry {
                config,
                current_price,
            },
        );
    }

    pub fn remove_service(&self, name: &str) -> bool {
        self.services.remove(name).is_some()
    }

    /// Update the stored price after an admin approves a recommendation
    pub fn set_current_price(&self, name: &str, price: Decimal) -> bool {
        match self.services.get_mut(name) {
            Some(mut entry) => {
                entry.current_price = price;
                true
            }
            None => false,
        }
    }

    pub fn record_usage(&self, name: impl Into<String>, window: UsageWindow) {
        self.usage.insert(name.into(), window);
    }

    pub fn set_recommendation(
        &self,
        name: impl Into<String>,
        recommendation: ExternalRecommendation,
    ) {
        self.recommendations.insert(name.into(), recommendation);
    }

    pub fn service_count(&self) -> usize {
        self.services.len()
    }
}

#[async_trait]
impl ServiceCatalog for InMemoryCollaborators {
    async fn get_service_configuration(&self, name: &str) -> Result<Option<ServiceConfiguration>> {
        if let Some(entry) = self.services.get(name) {
            return Ok(Some(entry.config.clone()));
        }
        Ok(self
            .services
            .iter()
            .find(|entry| entry.config.matches_name(name))
            .map(|entry| entry.config.clone()))
    }

    async fn dynamic_pricing_services(&self) -> Result<Vec<ServiceListing>> {
        let mut listings: Vec<ServiceListing> = self
            .services
            .iter()
            .filter(|entry| entry.config.dynamic_pricing_enabled)
            .map(|entry| ServiceListing {
                name: entry.config.name.clone(),
                current_price: entry.current_price,
            })
            .collect();
        // DashMap iteration order is unspecified
        listings.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(listings)
    }
}

#[async_trait]
impl UsageSource for InMemoryCollaborators {
    async fn get_usage_window(&self, name: &str) -> Result<Option<UsageWindow>> {
        Ok(self.usage.get(name).map(|w| *w))
    }
}

#[async_trait]
impl RecommendationSource for InMemoryCollaborators {
    async fn get_external_recommendation(
        &self,
        name: &str,
    ) -> Result<Option<ExternalRecommendation>> {
        Ok(self.recommendations.get(name).map(|r| *r))
    }
}
