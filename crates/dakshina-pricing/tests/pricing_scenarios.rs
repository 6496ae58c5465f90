//! End-to-end pricing scenarios
//!
//! Exercises the service against in-memory collaborators:
//! - catalog lookup, demand and recommendation signals
//! - price bounds and half-unit rounding
//! - fallback totality
//! - batch review ordering and urgency

use dakshina_common::{
    Capability, ExternalRecommendation, PricingOutcome, RateTable, ServiceConfiguration,
    ServiceTier, Urgency, UsageWindow,
};
use dakshina_pricing::{
    InMemoryCollaborators, PricingConfig, PricingEngine, PricingInputs, PricingService,
    RateTableStore,
};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

fn service(store: Arc<InMemoryCollaborators>, rates: RateTable) -> PricingService {
    PricingService::new(
        &PricingConfig::default(),
        store.clone(),
        store.clone(),
        store,
        Arc::new(RateTableStore::new(rates).unwrap()),
    )
    .unwrap()
}

fn assert_half_unit(price: Decimal) {
    assert!((price * dec!(2)).fract().is_zero(), "{price} is not a half unit");
}

#[tokio::test]
async fn test_minimal_service_priced_near_base() {
    let store = Arc::new(InMemoryCollaborators::new());
    store.upsert_service(
        ServiceConfiguration::new("daily-horoscope", "general", 15, dec!(10)),
        dec!(10),
    );
    let service = service(store, RateTable::default());

    let outcome = service.calculate_price("daily-horoscope").await;
    assert!(!outcome.is_fallback());

    let result = outcome.result();
    assert!(result.recommended_price >= dec!(10));
    assert!(result.recommended_price <= dec!(30));
    assert_eq!(result.total_api_cost(), Decimal::ZERO);
    assert_eq!(result.component("total_api_cost"), Decimal::ZERO);
    assert!(result.requires_admin_approval);
    assert_half_unit(result.recommended_price);
}

#[tokio::test]
async fn test_media_heavy_service_capped_at_ceiling() {
    let store = Arc::new(InMemoryCollaborators::new());
    store.upsert_service(
        ServiceConfiguration::new("live-reading", "general", 30, dec!(15))
            .with_capability(Capability::Voice)
            .with_capability(Capability::Video)
            .with_capability(Capability::Interactive),
        dec!(30),
    );
    store.record_usage("live-reading", UsageWindow::new(20, 10));
    let service = service(store, RateTable::default());

    let result = service.calculate_price("live-reading").await.into_result();

    assert_eq!(result.demand_factor, dec!(1.5));
    assert_eq!(result.recommended_price, dec!(45));
    assert_eq!(result.api_costs.len(), 3);
    assert_eq!(result.total_api_cost(), result.component("total_api_cost"));
    assert!(result.component("bound_adjustment") < Decimal::ZERO);
    assert!(result.rationale.contains("high demand"));
}

#[tokio::test]
async fn test_recommendation_pulls_price_toward_suggestion() {
    let store = Arc::new(InMemoryCollaborators::new());
    let config = ServiceConfiguration::new("tarot-spread", "tarot", 20, dec!(10));
    store.upsert_service(config, dec!(12));
    let plain = service(store.clone(), RateTable::default())
        .calculate_price("tarot-spread")
        .await
        .into_result();

    store.set_recommendation(
        "tarot-spread",
        ExternalRecommendation::new(dec!(25), dec!(0.5)),
    );
    let blended = service(store, RateTable::default())
        .calculate_price("tarot-spread")
        .await
        .into_result();

    assert!(blended.recommended_price > plain.recommended_price);
    assert!(blended.component("recommendation_adjustment") > Decimal::ZERO);
    assert_eq!(plain.component("recommendation_adjustment"), Decimal::ZERO);
}

#[tokio::test]
async fn test_display_name_lookup() {
    let store = Arc::new(InMemoryCollaborators::new());
    store.upsert_service(
        ServiceConfiguration::new("satsang-weekly", "satsang", 60, dec!(5))
            .with_display_name("Weekly Satsang")
            .with_donations(),
        dec!(5),
    );
    let service = service(store, RateTable::default());

    let result = service.calculate_price("weekly satsang").await.into_result();
    assert_eq!(result.service_name, "satsang-weekly");
    assert_eq!(result.applied_rules, vec!["donation_community".to_string()]);
}

#[tokio::test]
async fn test_admin_rate_table_loaded_from_json() {
    let rates = RateTable::from_json_str(
        r#"{
            "credits_per_currency_unit": "20",
            "entries": {
                "voice": { "cost_per_unit": "0.00003" }
            }
        }"#,
    )
    .unwrap();

    let store = Arc::new(InMemoryCollaborators::new());
    store.upsert_service(
        ServiceConfiguration::new("voice-reading", "general", 30, dec!(15))
            .with_capability(Capability::Voice),
        dec!(20),
    );
    let service = service(store, rates);

    let result = service.calculate_price("voice-reading").await.into_result();
    // 22500 chars * 0.00003 * 20
    assert_eq!(result.component("voice_cost"), dec!(13.5));
}

#[tokio::test]
async fn test_fallback_is_total_and_low_confidence() {
    let store = Arc::new(InMemoryCollaborators::new());
    store.upsert_service(
        ServiceConfiguration::new("misconfigured", "general", 0, dec!(20)),
        dec!(20),
    );
    let service = service(store, RateTable::default());

    let outcome = service.calculate_price("misconfigured").await;
    assert!(outcome.is_fallback());

    let result = outcome.result();
    assert_eq!(result.confidence_level, 0.3);
    assert_eq!(result.recommended_price, dec!(24));
    assert!(result.requires_admin_approval);
    assert_eq!(result.component("fallback_multiplier"), dec!(1.2));

    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["status"], "fallback");
    let back: PricingOutcome = serde_json::from_value(json).unwrap();
    assert_eq!(back, outcome);
}

#[tokio::test]
async fn test_batch_review_urgency() {
    let store = Arc::new(InMemoryCollaborators::new());
    store.upsert_service(
        ServiceConfiguration::new("deep-dive", "comprehensive", 45, dec!(25))
            .with_capability(Capability::Interactive)
            .with_chart_generation()
            .with_remedy_generation()
            .with_tier(ServiceTier::Premium)
            .with_dynamic_pricing(),
        dec!(25),
    );
    store.upsert_service(
        ServiceConfiguration::new("daily-horoscope", "general", 15, dec!(10))
            .with_dynamic_pricing(),
        dec!(11),
    );
    store.upsert_service(
        ServiceConfiguration::new("static-service", "general", 15, dec!(10)),
        dec!(10),
    );
    let service = service(store, RateTable::default());

    let reviews = service.calculate_all_dynamic_prices().await.unwrap();
    assert_eq!(reviews.len(), 2);
    assert_eq!(reviews[0].service_name, "daily-horoscope");
    assert_eq!(reviews[0].urgency, Urgency::Low);
    assert_eq!(reviews[1].service_name, "deep-dive");
    assert_eq!(reviews[1].urgency, Urgency::High);
    assert!(reviews.iter().all(|r| r.outcome.result().requires_admin_approval));
}

#[tokio::test]
async fn test_repeated_calculation_is_identical() {
    let store = Arc::new(InMemoryCollaborators::new());
    store.upsert_service(
        ServiceConfiguration::new("vedic", "comprehensive", 30, dec!(15))
            .with_capability(Capability::Voice)
            .with_capability(Capability::LanguageModel)
            .with_knowledge_domain("jyotish"),
        dec!(30),
    );
    store.record_usage("vedic", UsageWindow::new(7, 9));
    store.set_recommendation("vedic", ExternalRecommendation::new(dec!(33), dec!(0.2)));
    let service = service(store, RateTable::default());

    let first = service.calculate_price("vedic").await;
    let second = service.calculate_price("vedic").await;
    assert_eq!(first, second);
}

fn arb_config() -> impl Strategy<Value = ServiceConfiguration> {
    (
        1i64..20_000,
        1u32..240,
        prop::collection::vec(prop::sample::select(Capability::ALL.to_vec()), 0..4),
        any::<bool>(),
        any::<bool>(),
        prop::sample::select(vec!["general", "satsang", "horoscope", "comprehensive"]),
        0usize..6,
        any::<bool>(),
    )
        .prop_map(
            |(base_cents, minutes, caps, chart, remedy, category, domains, premium)| {
                let mut config = ServiceConfiguration::new(
                    "generated",
                    category,
                    minutes,
                    Decimal::new(base_cents, 2),
                );
                for cap in caps {
                    config = config.with_capability(cap);
                }
                if chart {
                    config = config.with_chart_generation();
                }
                if remedy {
                    config = config.with_remedy_generation().with_donations();
                }
                for i in 0..domains {
                    config = config.with_knowledge_domain(format!("domain-{i}"));
                }
                if premium {
                    config = config.with_tier(ServiceTier::Premium);
                }
                config
            },
        )
}

proptest! {
    #[test]
    fn prop_price_bounded_and_rounded(
        config in arb_config(),
        recent in 0u64..500,
        previous in 0u64..500,
        suggestion in 0i64..100_000,
        confidence in 0i64..=100,
    ) {
        let base = config.base_credits;
        let inputs = PricingInputs::new(config)
            .with_usage(UsageWindow::new(recent, previous))
            .with_recommendation(ExternalRecommendation::new(
                Decimal::new(suggestion, 2),
                Decimal::new(confidence, 2),
            ));
        let engine = PricingEngine::default();
        let outcome = engine.calculate(&inputs, &RateTable::default());

        prop_assert!(!outcome.is_fallback());
        let result = outcome.result();
        prop_assert!(result.recommended_price >= base);
        prop_assert!(result.recommended_price <= base * dec!(3));
        // a half-unit step always fits once the range is at least 0.5 wide
        if base >= dec!(0.25) {
            prop_assert!((result.recommended_price * dec!(2)).fract().is_zero());
        }
        prop_assert!((0.0..=1.0).contains(&result.confidence_level));
        prop_assert!(result.requires_admin_approval);
        prop_assert_eq!(
            result.recommended_price,
            result.component("pre_bound_price") + result.component("bound_adjustment")
        );

        let again = engine.calculate(&inputs, &RateTable::default());
        prop_assert_eq!(&outcome, &again);
    }

    #[test]
    fn prop_fallback_always_produces_a_price(
        base_cents in -10_000i64..10_000,
        minutes in 0u32..3,
    ) {
        let base = Decimal::new(base_cents, 2);
        let config = ServiceConfiguration::new("edge", "general", minutes, base);
        let outcome = PricingEngine::default()
            .calculate(&PricingInputs::new(config), &RateTable::default());
        let result = outcome.result();

        prop_assert!(result.requires_admin_approval);
        if base_cents > 0 {
            prop_assert!(result.recommended_price >= base);
            prop_assert!(result.recommended_price <= base * dec!(3));
        } else {
            // default base 10 * 1.2
            prop_assert_eq!(result.recommended_price, dec!(12));
        }
        if outcome.is_fallback() {
            prop_assert_eq!(result.confidence_level, 0.3);
        }
    }
}
