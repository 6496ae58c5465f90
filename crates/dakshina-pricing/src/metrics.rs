//! Prometheus metrics for pricing calculations

use dakshina_common::{DakshinaError, PricingOutcome, Result};
use prometheus::{Histogram, HistogramOpts, IntCounter, Registry};
use std::time::Duration;

/// Counters and latency histogram updated by the pricing service
#[derive(Clone)]
pub struct PricingMetrics {
    pub calculations_total: IntCounter,
    pub fallbacks_total: IntCounter,
    pub duration_seconds: Histogram,
}

impl PricingMetrics {
    pub fn new() -> Result<Self> {
        Ok(Self {
            calculations_total: IntCounter::new(
                "dakshina_pricing_calculations_total",
                "Total price calculations",
            )
            .map_err(metrics_error)?,
            fallbacks_total: IntCounter::new(
                "dakshina_pricing_fallbacks_total",
                "Calculations that ended in fallback pricing",
            )
            .map_err(metrics_error)?,
            duration_seconds: Histogram::with_opts(
                HistogramOpts::new(
                    "dakshina_pricing_duration_seconds",
                    "Price calculation duration",
                )
                .buckets(vec![0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.5]),
            )
            .map_err(metrics_error)?,
        })
    }

    pub fn register(&self, registry: &Registry) -> Result<()> {
        registry
            .register(Box::new(self.calculations_total.clone()))
            .map_err(metrics_error)?;
        registry
            .register(Box::new(self.fallbacks_total.clone()))
            .map_err(metrics_error)?;
        registry
            .register(Box::new(self.duration_seconds.clone()))
            .map_err(metrics_error)?;
        Ok(())
    }

    /// Record one finished calculation
    pub fn observe(&self, outcome: &PricingOutcome, elapsed: Duration) {
        self.calculations_total.inc();
        if outcome.is_fallback() {
            self.fallbacks_total.inc();
        }
        self.duration_seconds.observe(elapsed.as_secs_f64());
    }
}

fn metrics_error(err: prometheus::Error) -> DakshinaError {
    DakshinaError::Metrics(err.to_string())
}
