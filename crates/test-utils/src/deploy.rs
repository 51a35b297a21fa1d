//! Deploys the contracts the bridge tests run against.

use alloy_primitives::{Address, B256, U256};
use alloy_sol_types::{SolType, sol_data};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    artifact::{ArtifactSource, ContractArtifact, GRAVITY, TEST_ERC20, TEST_ERC20_WNOM},
    chain::{Deployment, TestChain},
    checkpoint::{GravityId, Valset},
    error::Result,
    validators::{SignerIdentity, signer_addresses},
};

/// `Gravity` constructor arguments:
/// `(bytes32 gravityId, address[] validators, uint256[] powers, address wnomAddress)`.
type GravityConstructor = (
    sol_data::FixedBytes<32>,
    sol_data::Array<sol_data::Address>,
    sol_data::Array<sol_data::Uint<256>>,
    sol_data::Address,
);

/// A deployed contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractHandle {
    /// Artifact the contract was deployed from.
    pub name: String,
    pub address: Address,
    pub tx_hash: B256,
}

impl ContractHandle {
    fn new(name: &str, deployment: Deployment) -> Self {
        Self {
            name: name.to_string(),
            address: deployment.address,
            tx_hash: deployment.tx_hash,
        }
    }

    pub fn deployment(&self) -> Deployment {
        Deployment {
            address: self.address,
            tx_hash: self.tx_hash,
        }
    }
}

/// Contracts of a fresh bridge deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GravityDeployment {
    pub gravity: ContractHandle,
    pub test_erc20: ContractHandle,
    /// Checkpoint of the validator set the bridge was constructed with.
    pub checkpoint: B256,
    pub test_erc20_wnom: ContractHandle,
}

/// ABI-encodes the `Gravity` constructor arguments.
pub fn encode_gravity_constructor(
    gravity_id: GravityId,
    validators: &[Address],
    powers: &[u64],
    wnom: Address,
) -> Vec<u8> {
    let powers: Vec<U256> = powers.iter().copied().map(U256::from).collect();
    let args = (gravity_id.as_b256(), validators.to_vec(), powers, wnom);
    GravityConstructor::abi_encode_params(&args)
}

async fn deploy_artifact<C>(
    chain: &C,
    artifact: &ContractArtifact,
    constructor_args: &[u8],
) -> Result<ContractHandle>
where
    C: TestChain + ?Sized,
{
    let deployment = chain.deploy(artifact.init_code(constructor_args)).await?;
    info!(
        name = %artifact.name,
        address = %deployment.address,
        tx_hash = %deployment.tx_hash,
        "deployed contract"
    );
    Ok(ContractHandle::new(&artifact.name, deployment))
}

/// Deploys `TestERC20A`, `TestERC20WNOM` and a `Gravity` bridge whose
/// genesis validator set is `validators` with `powers`.
///
/// Turns automining on for the whole chain first. `validators` and `powers`
/// are expected to have equal lengths; this is not checked here. The first
/// failing step aborts the deployment and contracts created before it stay
/// on the chain. Every call creates fresh contracts.
pub async fn deploy_contracts<C, A, S>(
    chain: &C,
    artifacts: &A,
    gravity_id: Option<GravityId>,
    validators: &[S],
    powers: &[u64],
) -> Result<GravityDeployment>
where
    C: TestChain + ?Sized,
    A: ArtifactSource + ?Sized,
    S: SignerIdentity,
{
    let gravity_id = gravity_id.unwrap_or_default();

    chain.set_automine(true).await?;
    debug!("enabled automine");

    let test_erc20 = deploy_artifact(chain, &artifacts.artifact(TEST_ERC20)?, &[]).await?;
    let test_erc20_wnom =
        deploy_artifact(chain, &artifacts.artifact(TEST_ERC20_WNOM)?, &[]).await?;

    let gravity_artifact = artifacts.artifact(GRAVITY)?;

    let addresses = signer_addresses(validators);
    let valset = Valset::genesis(addresses, powers.to_vec());
    let checkpoint = valset.checkpoint(gravity_id);
    debug!(%gravity_id, %checkpoint, validators = valset.validators.len(), "computed checkpoint");

    let args = encode_gravity_constructor(
        gravity_id,
        &valset.validators,
        &valset.powers,
        test_erc20_wnom.address,
    );
    let gravity = deploy_artifact(chain, &gravity_artifact, &args).await?;
    chain.wait_deployed(&gravity.deployment()).await?;

    Ok(GravityDeployment {
        gravity,
        test_erc20,
        checkpoint,
        test_erc20_wnom,
    })
}
