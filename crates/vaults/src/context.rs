use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::calls::Callable;
use crate::errors::{CallError, Result};
use crate::transport::Transport;

/// A 20-byte account or contract address, lowercase hex on the wire.
#[derive(Clone, Copy, PartialEq, Eq, Hash, serde::Deserialize)]
#[serde(try_from = "String")]
pub struct Address(pub [u8; 20]);

impl Address {
    pub const ZERO: Address = Address([0u8; 20]);

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl FromStr for Address {
    type Err = CallError;

    fn from_str(s: &str) -> Result<Self> {
        let raw = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(raw).map_err(|_| CallError::InvalidAddress(s.to_owned()))?;
        let bytes: [u8; 20] = bytes
            .try_into()
            .map_err(|_| CallError::InvalidAddress(s.to_owned()))?;
        Ok(Address(bytes))
    }
}

impl TryFrom<String> for Address {
    type Error = CallError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

/// The core contracts every deployment carries at a fixed address.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CoreContract {
    Vat,
    CdpManager,
    Spot,
    Jug,
    Cat,
}

/// Deployed contract addresses for one chain.
#[derive(Clone, Debug)]
pub struct ContractRegistry {
    pub vat: Address,
    pub cdp_manager: Address,
    pub spot: Address,
    pub jug: Address,
    pub cat: Address,
    /// Collateral price feed per ilk ("ETH-A" → its feed address).
    pub price_feeds: HashMap<String, Address>,
}

impl ContractRegistry {
    pub fn address_of(&self, contract: CoreContract) -> Address {
        match contract {
            CoreContract::Vat => self.vat,
            CoreContract::CdpManager => self.cdp_manager,
            CoreContract::Spot => self.spot,
            CoreContract::Jug => self.jug,
            CoreContract::Cat => self.cat,
        }
    }

    pub fn price_feed(&self, ilk: &str) -> Result<Address> {
        self.price_feeds
            .get(ilk)
            .copied()
            .ok_or_else(|| CallError::UnknownContract(format!("price feed for {ilk}")))
    }
}

/// An active, address-bound chain connection.
///
/// Passed explicitly to every stream constructor — there is no ambient
/// context. The connection layer emits a fresh value on every change that
/// should re-run dependent reads (a new block, a reconnected account);
/// connection loss is modeled by the context stream simply not emitting.
#[derive(Clone)]
pub struct ContextConnected {
    pub chain_id: u64,
    pub block_number: u64,
    /// The connected account; drives the vault `controller` flag.
    pub account: Address,
    pub contracts: Arc<ContractRegistry>,
    pub transport: Arc<dyn Transport>,
}

impl ContextConnected {
    pub(crate) fn callable(&self, contract: CoreContract, method: &'static str) -> Callable {
        Callable {
            address: self.contracts.address_of(contract),
            method,
        }
    }

    pub(crate) fn price_feed_callable(&self, ilk: &str, method: &'static str) -> Result<Callable> {
        Ok(Callable {
            address: self.contracts.price_feed(ilk)?,
            method,
        })
    }
}

impl fmt::Debug for ContextConnected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextConnected")
            .field("chain_id", &self.chain_id)
            .field("block_number", &self.block_number)
            .field("account", &self.account)
            .finish_non_exhaustive()
    }
}
