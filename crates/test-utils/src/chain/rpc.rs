use alloy::{
    network::{EthereumWallet, ReceiptResponse, TransactionBuilder},
    providers::{DynProvider, PendingTransactionBuilder, Provider, ProviderBuilder},
    rpc::types::TransactionRequest,
    signers::local::PrivateKeySigner,
};
use alloy_primitives::{Address, Bytes};
use async_trait::async_trait;
use tracing::{debug, info};

use super::{Deployment, TestChain};
use crate::error::{Error, Result};

/// A dev chain reached over JSON-RPC, deploying from a local key.
#[derive(Clone)]
pub struct RpcChain {
    provider: DynProvider,
    deployer: Address,
}

impl std::fmt::Debug for RpcChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcChain")
            .field("deployer", &self.deployer)
            .finish_non_exhaustive()
    }
}

impl RpcChain {
    /// Connects to `rpc_url`, signing deployments with `signer`.
    pub async fn connect(rpc_url: &str, signer: PrivateKeySigner) -> Result<Self> {
        let deployer = signer.address();
        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect(rpc_url)
            .await?
            .erased();

        info!(rpc_url, %deployer, "connected to test chain");
        Ok(Self { provider, deployer })
    }

    pub fn provider(&self) -> &DynProvider {
        &self.provider
    }
}

#[async_trait]
impl TestChain for RpcChain {
    fn deployer(&self) -> Address {
        self.deployer
    }

    async fn set_automine(&self, enabled: bool) -> Result<()> {
        let _: serde_json::Value = self
            .provider
            .raw_request("evm_setAutomine".into(), (enabled,))
            .await?;
        debug!(enabled, "set automine");
        Ok(())
    }

    async fn deploy(&self, init_code: Bytes) -> Result<Deployment> {
        let nonce = self
            .provider
            .get_transaction_count(self.deployer)
            .pending()
            .await?;

        let tx = TransactionRequest::default()
            .with_from(self.deployer)
            .with_nonce(nonce)
            .with_deploy_code(init_code);
        let pending = self.provider.send_transaction(tx).await?;

        let deployment = Deployment {
            address: self.deployer.create(nonce),
            tx_hash: *pending.tx_hash(),
        };
        debug!(
            address = %deployment.address,
            tx_hash = %deployment.tx_hash,
            nonce,
            "submitted contract creation"
        );
        Ok(deployment)
    }

    async fn wait_deployed(&self, deployment: &Deployment) -> Result<()> {
        let tx_hash = deployment.tx_hash;
        let receipt = PendingTransactionBuilder::new(self.provider.root().clone(), tx_hash)
            .get_receipt()
            .await?;

        if !receipt.status() {
            return Err(Error::Reverted { tx_hash });
        }
        match receipt.contract_address() {
            Some(actual) if actual == deployment.address => {
                debug!(address = %actual, block = ?receipt.block_number(), "contract deployed");
                Ok(())
            }
            Some(actual) => Err(Error::UnexpectedContractAddress {
                tx_hash,
                expected: deployment.address,
                actual,
            }),
            None => Err(Error::MissingContractAddress { tx_hash }),
        }
    }
}
