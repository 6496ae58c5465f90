//! Service configuration types
//!
//! A [`ServiceConfiguration`] describes one sellable reading or session: which
//! third-party capabilities it uses, how long it runs and how complex it is.
//! Tag lists only matter by their count.

use crate::error::ValidationError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Billable third-party capability of a service
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Voice synthesis, billed per character
    Voice,
    /// Video synthesis, billed per rendered second
    Video,
    /// Interactive streaming, billed per participant
    Interactive,
    /// Language-model usage, billed per thousand tokens
    LanguageModel,
}

/// Expected unit consumption of a capability for one session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsageProfile {
    /// Units consumed per minute of session
    pub per_minute: Decimal,
    /// Units consumed once per session
    pub per_session: Decimal,
}

impl Capability {
    /// Every capability kind, in pricing order
    pub const ALL: [Capability; 4] = [
        Capability::Voice,
        Capability::Video,
        Capability::Interactive,
        Capability::LanguageModel,
    ];

    /// Rate table / breakdown key
    pub fn key(&self) -> &'static str {
        match self {
            Capability::Voice => "voice",
            Capability::Video => "video",
            Capability::Interactive => "interactive",
            Capability::LanguageModel => "language_model",
        }
    }

    /// Unit consumption used to price `cost_per_unit`
    pub fn usage_profile(&self) -> UsageProfile {
        match self {
            // ~150 spoken words per minute
            Capability::Voice => UsageProfile {
                per_minute: dec!(750),
                per_session: Decimal::ZERO,
            },
            Capability::Video => UsageProfile {
                per_minute: dec!(60),
                per_session: Decimal::ZERO,
            },
            // host + seeker
            Capability::Interactive => UsageProfile {
                per_minute: Decimal::ZERO,
                per_session: dec!(2),
            },
            Capability::LanguageModel => UsageProfile {
                per_minute: dec!(1.5),
                per_session: Decimal::ZERO,
            },
        }
    }

    /// Conservative credit cost used when the rate table has no entry
    pub fn fallback_credits(&self) -> Decimal {
        match self {
            Capability::Voice => dec!(2.5),
            Capability::Video => dec!(5.0),
            Capability::Interactive => dec!(3.0),
            Capability::LanguageModel => dec!(1.0),
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Service tier, used by premium category rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceTier {
    Basic,
    #[default]
    Standard,
    Premium,
}

/// Feature configuration of a single service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfiguration {
    /// Unique service name
    pub name: String,

    /// Optional name shown to seekers
    #[serde(default)]
    pub display_name: Option<String>,

    /// Category tag (e.g., "satsang", "comprehensive", "horoscope")
    pub category: String,

    /// Enabled third-party capabilities
    #[serde(default)]
    pub capabilities: BTreeSet<Capability>,

    /// Birth-chart generation enabled
    #[serde(default)]
    pub chart_generation: bool,

    /// Remedy generation enabled
    #[serde(default)]
    pub remedy_generation: bool,

    /// Knowledge-domain tags (count drives cost)
    #[serde(default)]
    pub knowledge_domains: Vec<String>,

    /// Persona-mode tags (count drives cost)
    #[serde(default)]
    pub persona_modes: Vec<String>,

    /// Session length in minutes
    pub duration_minutes: u32,

    /// Credit floor for this service
    pub base_credits: Decimal,

    /// Donation-based community session
    #[serde(default)]
    pub donation_enabled: bool,

    #[serde(default)]
    pub tier: ServiceTier,

    /// Included in batch recomputation
    #[serde(default)]
    pub dynamic_pricing_enabled: bool,
}

impl ServiceConfiguration {
    /// Create a configuration with no capabilities enabled
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        duration_minutes: u32,
        base_credits: Decimal,
    ) -> Self {
        Self {
            name: name.into(),
            display_name: None,
            category: category.into(),
            capabilities: BTreeSet::new(),
            chart_generation: false,
            remedy_generation: false,
            knowledge_domains: Vec::new(),
            persona_modes: Vec::new(),
            duration_minutes,
            base_credits,
            donation_enabled: false,
            tier: ServiceTier::default(),
            dynamic_pricing_enabled: false,
        }
    }

    /// Set display name
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// Enable a capability
    pub fn with_capability(mut self, capability: Capability) -> Self {
        self.capabilities.insert(capability);
        self
    }

    /// Enable chart generation
    pub fn with_chart_generation(mut self) -> Self {
        self.chart_generation = true;
        self
    }

    /// Enable remedy generation
    pub fn with_remedy_generation(mut self) -> Self {
        self.remedy_generation = true;
        self
    }

    /// Add a knowledge-domain tag
    pub fn with_knowledge_domain(mut self, domain: impl Into<String>) -> Self {
        self.knowledge_domains.push(domain.into());
        self
    }

    /// Add a persona-mode tag
    pub fn with_persona_mode(mut self, mode: impl Into<String>) -> Self {
        self.persona_modes.push(mode.into());
        self
    }

    /// Mark as donation-based
    pub fn with_donations(mut self) -> Self {
        self.donation_enabled = true;
        self
    }

    /// Set service tier
    pub fn with_tier(mut self, tier: ServiceTier) -> Self {
        self.tier = tier;
        self
    }

    /// Opt into batch recomputation
    pub fn with_dynamic_pricing(mut self) -> Self {
        self.dynamic_pricing_enabled = true;
        self
    }

    /// Whether a capability is enabled
    pub fn has(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    /// Whether `name` matches this service by name or display name
    pub fn matches_name(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
            || self
                .display_name
                .as_deref()
                .is_some_and(|d| d.eq_ignore_ascii_case(name))
    }

    /// Check `base_credits > 0` and `duration_minutes > 0`
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if self.base_credits <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveBaseCredits {
                service: self.name.clone(),
                value: self.base_credits.to_string(),
            });
        }
        if self.duration_minutes == 0 {
            return Err(ValidationError::ZeroDuration {
                service: self.name.clone(),
            });
        }
        Ok(())
    }
}
