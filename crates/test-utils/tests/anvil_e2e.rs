//! End-to-end deployment against a local anvil.
//!
//! Requires `anvil` on `PATH`. Run with `cargo test -- --ignored`. Set
//! `GRAVITY_ARTIFACTS_DIR` to a compiled contracts directory to also deploy
//! the real contracts.

use std::{
    process::{Child, Command, Stdio},
    time::Duration,
};

use alloy::providers::{Provider, ProviderBuilder};
use alloy_primitives::Bytes;
use gravity_test_utils::{
    Error, RpcChain, TestChain,
    accounts::{dev_accounts, dev_deployer},
    artifact::{ArtifactDir, ArtifactSet, GRAVITY, TEST_ERC20, TEST_ERC20_WNOM},
    deploy_contracts,
};

/// Init code deploying the one-byte runtime `STOP`. Anything appended to it
/// is ignored, so it stands in for every contract.
const STUB_INIT_CODE: [u8; 13] = [
    0x60, 0x01, 0x60, 0x0c, 0x60, 0x00, 0x39, 0x60, 0x01, 0x60, 0x00, 0xf3, 0x00,
];

/// Anvil instance wrapper with automatic cleanup.
struct AnvilInstance {
    child: Child,
    rpc_url: String,
}

impl AnvilInstance {
    async fn start() -> eyre::Result<Self> {
        let port = portpicker::pick_unused_port().expect("no free port");

        let child = Command::new("anvil")
            .args(["--port", &port.to_string(), "--no-mining"])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let rpc_url = format!("http://127.0.0.1:{port}");

        // Wait for anvil to be ready
        tokio::time::sleep(Duration::from_secs(2)).await;

        let provider = ProviderBuilder::new().connect_http(rpc_url.parse()?);
        let block = provider.get_block_number().await?;
        tracing::info!(port, block, "anvil started");

        Ok(Self { child, rpc_url })
    }
}

impl Drop for AnvilInstance {
    fn drop(&mut self) {
        let _ = self.child.kill();
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter("anvil_e2e=debug,gravity_test_utils=debug")
        .try_init()
        .ok();
}

#[tokio::test]
#[ignore = "requires anvil"]
async fn test_deploy_stub_contracts() -> eyre::Result<()> {
    init_tracing();
    let anvil = AnvilInstance::start().await?;
    let chain = RpcChain::connect(&anvil.rpc_url, dev_deployer().signer).await?;

    let artifacts = ArtifactSet::new()
        .with(TEST_ERC20, STUB_INIT_CODE.to_vec())
        .with(TEST_ERC20_WNOM, STUB_INIT_CODE.to_vec())
        .with(GRAVITY, STUB_INIT_CODE.to_vec());
    let validators: Vec<_> = dev_accounts().into_iter().take(3).collect();
    let powers = vec![1_500_000_000, 1_000_000_000, 1_000_000_000];

    // started with --no-mining, so this only completes if automine was turned on
    let deployment = deploy_contracts(&chain, &artifacts, None, &validators, &powers).await?;
    tracing::info!(?deployment, "deployed");

    for handle in [
        &deployment.test_erc20,
        &deployment.test_erc20_wnom,
        &deployment.gravity,
    ] {
        let code = chain.provider().get_code_at(handle.address).await?;
        assert_eq!(
            code,
            Bytes::from_static(&[0x00]),
            "{} not deployed",
            handle.name
        );
    }

    let again = deploy_contracts(&chain, &artifacts, None, &validators, &powers).await?;
    assert_ne!(again.gravity.address, deployment.gravity.address);
    assert_eq!(again.checkpoint, deployment.checkpoint);
    Ok(())
}

#[tokio::test]
#[ignore = "requires anvil"]
async fn test_reverting_creation_is_reported() -> eyre::Result<()> {
    init_tracing();
    let anvil = AnvilInstance::start().await?;
    let chain = RpcChain::connect(&anvil.rpc_url, dev_deployer().signer).await?;
    chain.set_automine(true).await?;

    // PUSH1 0 PUSH1 0 REVERT
    let init_code = Bytes::from_static(&[0x60, 0x00, 0x60, 0x00, 0xfd]);
    let result = match chain.deploy(init_code).await {
        Ok(deployment) => chain.wait_deployed(&deployment).await,
        Err(err) => Err(err),
    };

    // either gas estimation rejects the creation, or it is mined and reverts
    match result {
        Err(Error::Rpc(err)) => assert!(err.as_error_resp().is_some(), "{err}"),
        Err(Error::Reverted { .. }) => {}
        other => panic!("expected a revert, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
#[ignore = "requires anvil and compiled contracts"]
async fn test_deploy_compiled_contracts() -> eyre::Result<()> {
    init_tracing();
    let Ok(dir) = std::env::var("GRAVITY_ARTIFACTS_DIR") else {
        tracing::warn!("GRAVITY_ARTIFACTS_DIR not set, skipping");
        return Ok(());
    };

    let anvil = AnvilInstance::start().await?;
    let chain = RpcChain::connect(&anvil.rpc_url, dev_deployer().signer).await?;
    let validators: Vec<_> = dev_accounts().into_iter().take(4).collect();
    let powers = vec![1_073_741_823; validators.len()];

    let deployment =
        deploy_contracts(&chain, &ArtifactDir::new(dir), None, &validators, &powers).await?;

    let code = chain.provider().get_code_at(deployment.gravity.address).await?;
    assert!(!code.is_empty());
    Ok(())
}
