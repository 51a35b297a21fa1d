//! The test chain contracts are deployed into.
//!
//! Fixtures never reach for a global provider: every operation takes the
//! chain explicitly, so tests can swap the RPC-backed [`RpcChain`] for the
//! [`InMemoryChain`] double and assert on what was sent.

use alloy_primitives::{Address, B256, Bytes};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

mod memory;
mod rpc;

pub use memory::{ChainCall, InMemoryChain};
pub use rpc::RpcChain;

/// A submitted contract creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    /// Address the contract is created at, derived from the deployer and
    /// its nonce.
    pub address: Address,
    pub tx_hash: B256,
}

/// Control surface of a dev chain simulator.
#[async_trait]
pub trait TestChain: Send + Sync {
    /// Account contract creations are sent from.
    fn deployer(&self) -> Address;

    /// Toggles mining every submitted transaction into its own block.
    ///
    /// This is a setting of the whole chain, not of the caller.
    async fn set_automine(&self, enabled: bool) -> Result<()>;

    /// Submits a contract creation with the given init code.
    async fn deploy(&self, init_code: Bytes) -> Result<Deployment>;

    /// Resolves once `deployment` is mined, failing if it reverted.
    async fn wait_deployed(&self, deployment: &Deployment) -> Result<()>;
}
