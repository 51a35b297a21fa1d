use std::collections::{HashMap, HashSet};

use alloy_primitives::{Address, B256, Bytes, keccak256};
use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;

use super::{Deployment, TestChain};
use crate::{
    accounts::dev_deployer,
    error::{Error, Result},
};

/// A call made against an [`InMemoryChain`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainCall {
    SetAutomine(bool),
    Deploy { address: Address, init_code: Bytes },
    WaitDeployed(B256),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TxStatus {
    Pending,
    Mined,
    Reverted,
}

#[derive(Debug)]
struct Transaction {
    address: Address,
    init_code: Bytes,
    reverts: bool,
    status: TxStatus,
}

#[derive(Debug, Default)]
struct State {
    automine: bool,
    nonce: u64,
    block_number: u64,
    deployments: usize,
    reverting: HashSet<usize>,
    pending: Vec<B256>,
    transactions: HashMap<B256, Transaction>,
    code: HashMap<Address, Bytes>,
    calls: Vec<ChainCall>,
}

impl State {
    fn include(&mut self, tx_hash: B256) -> TxStatus {
        let Some(tx) = self.transactions.get_mut(&tx_hash) else {
            return TxStatus::Pending;
        };
        tx.status = if tx.reverts {
            TxStatus::Reverted
        } else {
            self.code.insert(tx.address, tx.init_code.clone());
            TxStatus::Mined
        };
        tx.status
    }
}

/// Chain simulator double that keeps its state in memory.
///
/// Contract creations are recorded, not executed: the "code" stored at a
/// created address is the init code it was deployed with. Automining starts
/// disabled, transactions then stay pending until [`InMemoryChain::mine`].
/// Waiting on a pending transaction fails with [`Error::NotMined`] instead of
/// blocking.
#[derive(Debug)]
pub struct InMemoryChain {
    deployer: Address,
    state: Mutex<State>,
}

impl InMemoryChain {
    pub fn new(deployer: Address) -> Self {
        Self {
            deployer,
            state: Mutex::default(),
        }
    }

    /// Makes the `index`-th contract creation (zero based) revert when mined.
    pub fn revert_deployment(&self, index: usize) {
        self.state.lock().reverting.insert(index);
    }

    pub fn automine(&self) -> bool {
        self.state.lock().automine
    }

    pub fn block_number(&self) -> u64 {
        self.state.lock().block_number
    }

    /// Init code a successful creation left at `address`.
    pub fn code_at(&self, address: Address) -> Option<Bytes> {
        self.state.lock().code.get(&address).cloned()
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<ChainCall> {
        self.state.lock().calls.clone()
    }

    /// Mines all pending transactions into a single block and returns its
    /// number.
    pub fn mine(&self) -> u64 {
        let mut state = self.state.lock();
        state.block_number += 1;
        for tx_hash in std::mem::take(&mut state.pending) {
            state.include(tx_hash);
        }
        state.block_number
    }

    fn tx_hash(&self, nonce: u64) -> B256 {
        let mut buf = Vec::with_capacity(20 + 8);
        buf.extend_from_slice(self.deployer.as_slice());
        buf.extend_from_slice(&nonce.to_be_bytes());
        keccak256(&buf)
    }
}

impl Default for InMemoryChain {
    fn default() -> Self {
        Self::new(dev_deployer().address)
    }
}

#[async_trait]
impl TestChain for InMemoryChain {
    fn deployer(&self) -> Address {
        self.deployer
    }

    async fn set_automine(&self, enabled: bool) -> Result<()> {
        let mut state = self.state.lock();
        state.calls.push(ChainCall::SetAutomine(enabled));
        state.automine = enabled;
        Ok(())
    }

    async fn deploy(&self, init_code: Bytes) -> Result<Deployment> {
        let mut state = self.state.lock();

        let nonce = state.nonce;
        state.nonce += 1;
        let index = state.deployments;
        state.deployments += 1;

        let address = self.deployer.create(nonce);
        let tx_hash = self.tx_hash(nonce);
        let reverts = init_code.is_empty() || state.reverting.contains(&index);

        state.calls.push(ChainCall::Deploy {
            address,
            init_code: init_code.clone(),
        });
        state.transactions.insert(
            tx_hash,
            Transaction {
                address,
                init_code,
                reverts,
                status: TxStatus::Pending,
            },
        );

        if state.automine {
            state.block_number += 1;
            if state.include(tx_hash) == TxStatus::Reverted {
                return Err(Error::Reverted { tx_hash });
            }
        } else {
            state.pending.push(tx_hash);
        }

        debug!(%address, %tx_hash, nonce, "submitted contract creation");
        Ok(Deployment { address, tx_hash })
    }

    async fn wait_deployed(&self, deployment: &Deployment) -> Result<()> {
        let mut state = self.state.lock();
        let tx_hash = deployment.tx_hash;
        state.calls.push(ChainCall::WaitDeployed(tx_hash));

        match state.transactions.get(&tx_hash).map(|tx| tx.status) {
            Some(TxStatus::Mined) => Ok(()),
            Some(TxStatus::Reverted) => Err(Error::Reverted { tx_hash }),
            Some(TxStatus::Pending) => Err(Error::NotMined { tx_hash }),
            None => Err(Error::UnknownTransaction { tx_hash }),
        }
    }
}
