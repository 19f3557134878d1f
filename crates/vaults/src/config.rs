//! Deployment address book, loaded from TOML.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::context::{Address, ContractRegistry};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse address book: {0}")]
    Parse(#[from] toml::de::Error),
}

/// On-disk shape of the deployment address book.
#[derive(Debug, Clone, Deserialize)]
pub struct AddressBook {
    pub chain_id: u64,
    pub vat: Address,
    pub cdp_manager: Address,
    pub spot: Address,
    pub jug: Address,
    pub cat: Address,
    /// Collateral price feed per ilk.
    #[serde(default)]
    pub price_feeds: HashMap<String, Address>,
}

impl AddressBook {
    /// Load the address book from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&raw)
    }

    /// Parse the address book from TOML text.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn registry(&self) -> ContractRegistry {
        ContractRegistry {
            vat: self.vat,
            cdp_manager: self.cdp_manager,
            spot: self.spot,
            jug: self.jug,
            cat: self.cat,
            price_feeds: self.price_feeds.clone(),
        }
    }
}
