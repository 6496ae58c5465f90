//! Pricing service
//!
//! Resolves collaborator data into [`PricingInputs`], runs the engine against
//! the current rate snapshot and records metrics. Collaborator failures are
//! degraded here so the engine only ever sees plain values.

use crate::collaborators::{RecommendationSource, ServiceCatalog, UsageSource};
use crate::config::PricingConfig;
use crate::metrics::PricingMetrics;
use crate::pricing::{PricingEngine, PricingInputs};
use crate::rates::RateTableStore;
use dakshina_common::{
    PriceReview, PricingOutcome, Result, ServiceConfiguration, TARGET_PRICING_LATENCY_MS,
};
use futures::stream::{self, StreamExt};
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Pricing service over a catalog, usage and recommendation collaborators
pub struct PricingService {
    engine: PricingEngine,
    catalog: Arc<dyn ServiceCatalog>,
    usage: Arc<dyn UsageSource>,
    recommendations: Arc<dyn RecommendationSource>,
    rates: Arc<RateTableStore>,
    metrics: PricingMetrics,
    batch_concurrency: usize,
}

impl PricingService {
    pub fn new(
        config: &PricingConfig,
        catalog: Arc<dyn ServiceCatalog>,
        usage: Arc<dyn UsageSource>,
        recommendations: Arc<dyn RecommendationSource>,
        rates: Arc<RateTableStore>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            engine: PricingEngine::new(config.policy.clone())?,
            catalog,
            usage,
            recommendations,
            rates,
            metrics: PricingMetrics::new()?,
            batch_concurrency: config.batch_concurrency.max(1),
        })
    }

    pub fn engine(&self) -> &PricingEngine {
        &self.engine
    }

    pub fn metrics(&self) -> &PricingMetrics {
        &self.metrics
    }

    pub fn rates(&self) -> &Arc<RateTableStore> {
        &self.rates
    }

    /// Recommend a price for one service. Never fails.
    #[instrument(skip(self))]
    pub async fn calculate_price(&self, service_name: &str) -> PricingOutcome {
        let start = Instant::now();
        let outcome = self.price(service_name).await;
        let elapsed = start.elapsed();

        self.metrics.observe(&outcome, elapsed);
        match &outcome {
            PricingOutcome::Priced(result) => {
                debug!(
                    recommended_price = %result.recommended_price,
                    confidence = result.confidence_level,
                    "Price calculated"
                );
            }
            PricingOutcome::Fallback { result, reason } => {
                warn!(
                    recommended_price = %result.recommended_price,
                    %reason,
                    "Fallback pricing applied"
                );
            }
        }
        if elapsed.as_millis() > u128::from(TARGET_PRICING_LATENCY_MS) {
            warn!(
                elapsed_ms = elapsed.as_millis() as u64,
                target_ms = TARGET_PRICING_LATENCY_MS,
                "Price calculation exceeded latency target"
            );
        }
        outcome
    }

    async fn price(&self, service_name: &str) -> PricingOutcome {
        let config = match self.catalog.get_service_configuration(service_name).await {
            Ok(Some(config)) => config,
            Ok(None) => {
                debug!("Service not in catalog, using default configuration");
                self.engine.policy().default_service.configuration(service_name)
            }
            Err(err) => {
                let config = ServiceConfiguration::new(service_name, "", 0, Decimal::ZERO);
                return self
                    .engine
                    .fallback(&config, format!("configuration lookup failed: {err}"));
            }
        };

        let usage = match self.usage.get_usage_window(&config.name).await {
            Ok(window) => window.unwrap_or_default(),
            Err(err) => {
                warn!(error = %err, "Usage lookup failed, assuming no usage");
                Default::default()
            }
        };

        let recommendation = match self
            .recommendations
            .get_external_recommendation(&config.name)
            .await
        {
            Ok(recommendation) => recommendation,
            Err(err) => {
                warn!(error = %err, "Recommendation lookup failed, ignoring it");
                None
            }
        };

        let mut inputs = PricingInputs::new(config).with_usage(usage);
        if let Some(recommendation) = recommendation {
            inputs = inputs.with_recommendation(recommendation);
        }

        let rates = self.rates.snapshot();
        self.engine.calculate(&inputs, &rates)
    }

    /// Price every dynamic-pricing service for admin review, in catalog order
    #[instrument(skip(self))]
    pub async fn calculate_all_dynamic_prices(&self) -> Result<Vec<PriceReview>> {
        let listings = self.catalog.dynamic_pricing_services().await?;
        let count = listings.len();

        let reviews: Vec<PriceReview> = stream::iter(listings)
            .map(|listing| async move {
                let outcome = self.calculate_price(&listing.name).await;
                PriceReview::new(listing.name, outcome, listing.current_price)
            })
            .buffered(self.batch_concurrency)
            .collect()
            .await;

        let fallbacks = reviews.iter().filter(|r| r.outcome.is_fallback()).count();
        info!(services = count, fallbacks, "Dynamic prices calculated");
        Ok(reviews)
    }
}
