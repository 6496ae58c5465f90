//! Rate table snapshot store
//!
//! Readers take an `Arc` to the current table without locking. Reloads
//! validate a complete new table and swap the pointer, so a reader sees either
//! the old or the new snapshot.

use crate::config::PricingConfig;
use arc_swap::ArcSwap;
use dakshina_common::{RateTable, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument};

pub struct RateTableStore {
    current: ArcSwap<RateTable>,
}

impl RateTableStore {
    /// Create a store holding `table`, after validating it
    pub fn new(table: RateTable) -> Result<Self> {
        table.validate()?;
        Ok(Self {
            current: ArcSwap::from_pointee(table),
        })
    }

    /// Store seeded from `rates_path`, or the built-in table when it is unset
    pub fn from_config(config: &PricingConfig) -> Result<Self> {
        match &config.rates_path {
            Some(path) => {
                let table = RateTable::from_json_file(path)?;
                info!(%path, entries = table.entries.len(), "Rate table loaded");
                Self::new(table)
            }
            None => Ok(Self::default()),
        }
    }

    /// Current snapshot
    pub fn snapshot(&self) -> Arc<RateTable> {
        self.current.load_full()
    }

    /// Replace the whole table; an invalid table leaves the old one in place
    #[instrument(skip(self, table), fields(entries = table.entries.len()))]
    pub fn replace(&self, table: RateTable) -> Result<()> {
        table.validate()?;
        self.current.store(Arc::new(table));
        info!("Rate table replaced");
        Ok(())
    }

    /// Load a JSON rate table file and swap it in
    pub fn reload_from_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let table = RateTable::from_json_file(path)?;
        self.replace(table)
    }
}

impl Default for RateTableStore {
    fn default() -> Self {
        Self {
            current: ArcSwap::from_pointee(RateTable::default()),
        }
    }
}
