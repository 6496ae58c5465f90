//! Rate table - admin-configured third-party unit costs
//!
//! Rates are expressed in currency units and converted to credits with
//! `credits_per_currency_unit`. A table is never mutated in place; reloads
//! build a new table and swap it in whole.

use super::service::Capability;
use crate::error::{DakshinaError, PricingError, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Cost figures for one capability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateEntry {
    /// Cost per session minute
    #[serde(default)]
    pub cost_per_minute: Decimal,
    /// Cost per capability unit (character, second, participant, 1k tokens)
    #[serde(default)]
    pub cost_per_unit: Decimal,
    /// One-off cost per session
    #[serde(default)]
    pub setup_cost: Decimal,
    /// Overrides the table-wide conversion factor
    #[serde(default)]
    pub credits_per_currency_unit: Option<Decimal>,
}

impl RateEntry {
    pub fn new(cost_per_minute: Decimal, cost_per_unit: Decimal, setup_cost: Decimal) -> Self {
        Self {
            cost_per_minute,
            cost_per_unit,
            setup_cost,
            credits_per_currency_unit: None,
        }
    }

    /// Set a per-entry conversion factor
    pub fn with_conversion(mut self, credits_per_currency_unit: Decimal) -> Self {
        self.credits_per_currency_unit = Some(credits_per_currency_unit);
        self
    }

    /// Reject negative figures
    pub fn validate(&self, capability: Capability) -> std::result::Result<(), PricingError> {
        let fields = [
            ("cost_per_minute", Some(self.cost_per_minute)),
            ("cost_per_unit", Some(self.cost_per_unit)),
            ("setup_cost", Some(self.setup_cost)),
            ("credits_per_currency_unit", self.credits_per_currency_unit),
        ];
        for (field, value) in fields {
            if let Some(value) = value {
                if value < Decimal::ZERO {
                    return Err(PricingError::InvalidRate {
                        capability: capability.key().to_string(),
                        field,
                        value: value.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Immutable snapshot of all capability rates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    /// Credits charged per currency unit of third-party cost
    #[serde(default = "RateTable::default_conversion")]
    pub credits_per_currency_unit: Decimal,
    /// Rate entries by capability
    #[serde(default)]
    pub entries: BTreeMap<Capability, RateEntry>,
}

impl RateTable {
    /// Default conversion: 10 credits per currency unit
    pub const DEFAULT_CREDITS_PER_CURRENCY_UNIT: Decimal = dec!(10);

    fn default_conversion() -> Decimal {
        Self::DEFAULT_CREDITS_PER_CURRENCY_UNIT
    }

    /// A table with no entries; every capability prices at its fallback
    pub fn empty() -> Self {
        Self {
            credits_per_currency_unit: Self::DEFAULT_CREDITS_PER_CURRENCY_UNIT,
            entries: BTreeMap::new(),
        }
    }

    /// Add or replace an entry
    pub fn with_entry(mut self, capability: Capability, entry: RateEntry) -> Self {
        self.entries.insert(capability, entry);
        self
    }

    /// Set the table-wide conversion factor
    pub fn with_conversion(mut self, credits_per_currency_unit: Decimal) -> Self {
        self.credits_per_currency_unit = credits_per_currency_unit;
        self
    }

    /// Look up the entry for a capability
    pub fn get(&self, capability: Capability) -> Option<&RateEntry> {
        self.entries.get(&capability)
    }

    /// Conversion factor that applies to `entry`
    pub fn conversion_for(&self, entry: &RateEntry) -> Decimal {
        entry
            .credits_per_currency_unit
            .unwrap_or(self.credits_per_currency_unit)
    }

    /// Reject negative figures anywhere in the table
    pub fn validate(&self) -> std::result::Result<(), PricingError> {
        if self.credits_per_currency_unit < Decimal::ZERO {
            return Err(PricingError::InvalidRate {
                capability: "table".to_string(),
                field: "credits_per_currency_unit",
                value: self.credits_per_currency_unit.to_string(),
            });
        }
        for (capability, entry) in &self.entries {
            entry.validate(*capability)?;
        }
        Ok(())
    }

    /// Parse and validate a JSON rate table
    pub fn from_json_str(json: &str) -> Result<Self> {
        let table: RateTable = serde_json::from_str(json)?;
        table.validate()?;
        Ok(table)
    }

    /// Read, parse and validate a JSON rate table file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            DakshinaError::Storage(format!("Failed to read rate table {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&content)
    }
}

impl Default for RateTable {
    /// Reference vendor rates, in USD
    fn default() -> Self {
        Self::empty()
            // $0.30 per 10k characters
            .with_entry(
                Capability::Voice,
                RateEntry::new(Decimal::ZERO, dec!(0.00003), Decimal::ZERO),
            )
            .with_entry(
                Capability::Video,
                RateEntry::new(dec!(0.20), dec!(0.002), dec!(0.10)),
            )
            .with_entry(
                Capability::Interactive,
                RateEntry::new(dec!(0.004), dec!(0.01), dec!(0.05)),
            )
            // $0.002 per 1k tokens
            .with_entry(
                Capability::LanguageModel,
                RateEntry::new(Decimal::ZERO, dec!(0.002), Decimal::ZERO),
            )
    }
}
