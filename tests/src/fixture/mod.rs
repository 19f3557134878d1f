//! Scripted transport and context plumbing shared by the integration tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use primitive_types::U256;

use library::math::units::{rad, ray, wad};
use observable::Subject;
use vaults::calls::encode_ilk;
use vaults::context::{Address, ContextConnected, ContractRegistry};
use vaults::errors::CallError;
use vaults::transport::{CallArg, CallValue, Transport, TransportError};
use vaults::DependencyStream;

pub const fn addr(last: u8) -> Address {
    let mut bytes = [0u8; 20];
    bytes[19] = last;
    Address(bytes)
}

pub const VAT: Address = addr(0x0a);
pub const CDP_MANAGER: Address = addr(0x0b);
pub const SPOT: Address = addr(0x0c);
pub const JUG: Address = addr(0x0d);
pub const CAT: Address = addr(0x0e);
pub const ETH_PIP: Address = addr(0x0f);
pub const ACCOUNT: Address = addr(0x21);
pub const URN: Address = addr(0x42);

pub fn test_registry() -> ContractRegistry {
    ContractRegistry {
        vat: VAT,
        cdp_manager: CDP_MANAGER,
        spot: SPOT,
        jug: JUG,
        cat: CAT,
        price_feeds: HashMap::from([("ETH-A".to_owned(), ETH_PIP)]),
    }
}

/// One scripted outcome for a `(contract, method)` pair.
#[derive(Clone, Debug)]
pub enum Scripted {
    Value(CallValue),
    /// Transport succeeds but carries no value.
    Empty,
    /// Transport-level failure (network error or revert).
    Fail(&'static str),
}

type Key = (Address, &'static str);

/// Transport double driven by per-call response queues. Responses are
/// consumed in order; the last one sticks, so re-reads on later blocks
/// keep resolving. Optional per-call latency makes slow/fast races
/// reproducible.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<HashMap<Key, VecDeque<Scripted>>>,
    delays: Mutex<HashMap<Key, Duration>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn script(&self, target: Address, method: &'static str, result: Scripted) {
        self.responses
            .lock()
            .unwrap()
            .entry((target, method))
            .or_default()
            .push_back(result);
    }

    pub fn delay(&self, target: Address, method: &'static str, delay: Duration) {
        self.delays.lock().unwrap().insert((target, method), delay);
    }

    /// Drop everything scripted for one call so it can be re-scripted.
    pub fn clear(&self, target: Address, method: &'static str) {
        self.responses.lock().unwrap().remove(&(target, method));
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn call(
        &self,
        target: Address,
        method: &'static str,
        _args: &[CallArg],
    ) -> Result<Option<CallValue>, TransportError> {
        let delay = self.delays.lock().unwrap().get(&(target, method)).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let scripted = {
            let mut responses = self.responses.lock().unwrap();
            match responses.get_mut(&(target, method)) {
                None => None,
                Some(queue) => {
                    let next = queue.pop_front();
                    if let (Some(next), true) = (&next, queue.is_empty()) {
                        queue.push_back(next.clone());
                    }
                    next
                }
            }
        };

        match scripted {
            None => Err(TransportError::Rpc(format!(
                "unscripted call: {method} on {target}"
            ))),
            Some(Scripted::Value(value)) => Ok(Some(value)),
            Some(Scripted::Empty) => Ok(None),
            Some(Scripted::Fail(reason)) => Err(TransportError::Rpc(reason.to_owned())),
        }
    }
}

/// A connected chain double: a scripted transport plus a context subject
/// that re-emits on every simulated block.
pub struct TestChain {
    pub transport: Arc<MockTransport>,
    pub context: Subject<ContextConnected, CallError>,
    registry: Arc<ContractRegistry>,
    block: u64,
}

impl TestChain {
    pub fn new() -> Self {
        TestChain {
            transport: MockTransport::new(),
            context: Subject::new(),
            registry: Arc::new(test_registry()),
            block: 0,
        }
    }

    /// Emit the first connected context.
    pub fn connect(&mut self) {
        self.next_block();
    }

    /// Advance one block and re-emit the context.
    pub fn next_block(&mut self) {
        self.block += 1;
        self.context.next(ContextConnected {
            chain_id: 1,
            block_number: self.block,
            account: ACCOUNT,
            contracts: self.registry.clone(),
            transport: self.transport.clone(),
        });
    }

    /// Connection loss: the context stream stops emitting.
    pub fn disconnect(&self) {
        self.context.complete();
    }

    pub fn context_stream(&self) -> DependencyStream<ContextConnected> {
        Arc::new(self.context.clone())
    }
}

impl Default for TestChain {
    fn default() -> Self {
        Self::new()
    }
}

pub fn uint(value: U256) -> Scripted {
    Scripted::Value(CallValue::Uint(value))
}

pub fn eth_price() -> U256 {
    wad() * 2500u64
}

pub fn eth_a_rate() -> U256 {
    // 1.05 ray
    U256::exp10(25) * 105u64
}

pub fn eth_a_mat() -> U256 {
    // 1.5 ray
    U256::exp10(26) * 15u64
}

pub fn eth_a_spot() -> U256 {
    // price / mat = 2500 / 1.5, in ray
    ray() * 2500u64 * 2u64 / 3u64
}

/// Script the complete happy-path read set for vault #1 on ETH-A:
/// urn {collateral: 10, normalizedDebt: 10}, rate 1.05, price 2500.
pub fn script_eth_a_vault(transport: &MockTransport) {
    transport.script(
        CDP_MANAGER,
        "urns",
        Scripted::Value(CallValue::Address(URN)),
    );
    transport.script(
        CDP_MANAGER,
        "ilks",
        Scripted::Value(CallValue::Bytes32(encode_ilk("ETH-A"))),
    );
    transport.script(
        CDP_MANAGER,
        "owns",
        Scripted::Value(CallValue::Address(ACCOUNT)),
    );

    transport.script(VAT, "urns", urn_contents(wad() * 10u64, wad() * 10u64));
    transport.script(
        VAT,
        "ilks",
        Scripted::Value(CallValue::Tuple(vec![
            CallValue::Uint(wad() * 1_000u64),       // Art
            CallValue::Uint(eth_a_rate()),           // rate
            CallValue::Uint(eth_a_spot()),           // spot
            CallValue::Uint(rad() * 10_000_000u64),  // line
            CallValue::Uint(rad() * 100u64),         // dust
        ])),
    );
    transport.script(VAT, "gem", uint(U256::zero()));

    transport.script(
        SPOT,
        "ilks",
        Scripted::Value(CallValue::Tuple(vec![
            CallValue::Address(ETH_PIP),
            CallValue::Uint(eth_a_mat()),
        ])),
    );
    transport.script(
        JUG,
        "ilks",
        Scripted::Value(CallValue::Tuple(vec![
            CallValue::Uint(ray()),                  // duty: no fee
            CallValue::Uint(U256::from(1_700_000_000u64)), // rho
        ])),
    );
    transport.script(
        CAT,
        "ilks",
        Scripted::Value(CallValue::Tuple(vec![
            CallValue::Address(addr(0x30)),          // flip
            CallValue::Uint(U256::exp10(25) * 113u64), // chop: 13% penalty
            CallValue::Uint(U256::zero()),           // lump
        ])),
    );

    transport.script(ETH_PIP, "peek", peek_result(eth_price(), true));
}

pub fn urn_contents(collateral: U256, normalized_debt: U256) -> Scripted {
    Scripted::Value(CallValue::Tuple(vec![
        CallValue::Uint(collateral),
        CallValue::Uint(normalized_debt),
    ]))
}

pub fn peek_result(price: U256, has: bool) -> Scripted {
    Scripted::Value(CallValue::Tuple(vec![
        CallValue::Bytes32(price.to_big_endian()),
        CallValue::Bool(has),
    ]))
}
