//! Fixture configuration read from TOML.
//!
//! ```toml
//! rpc_url = "http://127.0.0.1:8545"
//! artifacts_dir = "artifacts/contracts"
//! gravity_id = "foo"
//! validators = 4
//! power = 1073741823
//! ```

use std::path::{Path, PathBuf};

use alloy::signers::local::{LocalSignerError, PrivateKeySigner};
use alloy_primitives::B256;
use serde::{Deserialize, Serialize};

use crate::{
    accounts::{DEV_PRIVATE_KEYS, TestAccount, dev_accounts, dev_deployer},
    checkpoint::GravityId,
};

/// Default JSON-RPC endpoint of a local anvil or hardhat node.
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";

/// Power given to each validator by default. Four validators at this power
/// clear the bridge's two-thirds threshold of `u32::MAX`.
pub const DEFAULT_POWER: u64 = 1_073_741_823;

const DEFAULT_VALIDATORS: usize = 4;

/// Settings for deploying the bridge fixtures against a live chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixtureConfig {
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,

    /// Directory holding the compiled `TestERC20A`, `TestERC20WNOM` and
    /// `Gravity` artifacts.
    pub artifacts_dir: PathBuf,

    /// Gravity id as text; `"foo"` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gravity_id: Option<String>,

    /// Number of dev accounts used as the genesis validators.
    #[serde(default = "default_validators")]
    pub validators: usize,

    #[serde(default = "default_power")]
    pub power: u64,

    /// Deployer key; dev account 0 when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key: Option<B256>,
}

fn default_rpc_url() -> String {
    DEFAULT_RPC_URL.to_string()
}

const fn default_validators() -> usize {
    DEFAULT_VALIDATORS
}

const fn default_power() -> u64 {
    DEFAULT_POWER
}

impl FixtureConfig {
    /// Config with defaults for everything but the artifacts directory.
    pub fn new(artifacts_dir: impl Into<PathBuf>) -> Self {
        Self {
            rpc_url: default_rpc_url(),
            artifacts_dir: artifacts_dir.into(),
            gravity_id: None,
            validators: DEFAULT_VALIDATORS,
            power: DEFAULT_POWER,
            private_key: None,
        }
    }

    /// Parses [`FixtureConfig`] from a toml formatted file at `path`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let file_contents = std::fs::read_to_string(path)?;
        let this = toml::from_str(&file_contents)?;
        Ok(this)
    }

    /// The configured gravity id, `None` meaning the default.
    pub fn gravity_id(&self) -> Result<Option<GravityId>, Error> {
        self.gravity_id
            .as_deref()
            .map(GravityId::new)
            .transpose()
            .map_err(Error::GravityId)
    }

    pub fn deployer(&self) -> Result<PrivateKeySigner, Error> {
        match &self.private_key {
            Some(key) => Ok(PrivateKeySigner::from_bytes(key).map_err(LocalSignerError::from)?),
            None => Ok(dev_deployer().signer),
        }
    }

    /// The first `validators` dev accounts with `power` each.
    pub fn validator_set(&self) -> Result<(Vec<TestAccount>, Vec<u64>), Error> {
        if self.validators > DEV_PRIVATE_KEYS.len() {
            return Err(Error::TooManyValidators {
                requested: self.validators,
                available: DEV_PRIVATE_KEYS.len(),
            });
        }
        let accounts: Vec<_> = dev_accounts().into_iter().take(self.validators).collect();
        let powers = vec![self.power; accounts.len()];
        Ok((accounts, powers))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to open file for reading")]
    OpenFile(#[from] std::io::Error),
    #[error("failed parsing file contents")]
    Parse(#[from] toml::de::Error),
    #[error("invalid gravity id")]
    GravityId(#[source] crate::Error),
    #[error("invalid deployer private key")]
    PrivateKey(#[from] LocalSignerError),
    #[error("requested {requested} validators but only {available} dev accounts exist")]
    TooManyValidators { requested: usize, available: usize },
}
