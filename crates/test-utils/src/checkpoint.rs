//! Validator set checkpoints.
//!
//! The bridge stores a single hash committing to its current validator set
//! and checks every update and batch against it. The encoding here must stay
//! byte-for-byte identical to `makeCheckpoint` in the `Gravity` contract.

use std::{fmt, str::FromStr};

use alloy_primitives::{Address, B256, U256, keccak256};
use alloy_sol_types::{SolType, sol_data};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Gravity id used when a test does not pick one.
pub const DEFAULT_GRAVITY_ID: &str = "foo";

/// `bytes32("checkpoint")`, the method name mixed into every checkpoint.
pub const CHECKPOINT_METHOD_NAME: B256 = string_to_bytes32(b"checkpoint");

/// `abi.encode` layout of a checkpoint preimage:
/// `(gravityId, methodName, valsetNonce, validators, powers, rewardAmount, rewardToken)`.
type CheckpointPreimage = (
    sol_data::FixedBytes<32>,
    sol_data::FixedBytes<32>,
    sol_data::Uint<256>,
    sol_data::Array<sol_data::Address>,
    sol_data::Array<sol_data::Uint<256>>,
    sol_data::Uint<256>,
    sol_data::Address,
);

const fn string_to_bytes32(s: &[u8]) -> B256 {
    let mut out = [0u8; 32];
    let mut i = 0;
    while i < s.len() {
        out[i] = s[i];
        i += 1;
    }
    B256::new(out)
}

/// The `bytes32` domain identifier separating bridge deployments.
///
/// Built from text the same way ethers' `formatBytes32String` does: UTF-8
/// bytes, right-padded with zeros, with at least one trailing zero byte.
/// Text containing NUL is rejected since it could not be told apart from the
/// padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GravityId(B256);

impl GravityId {
    /// Maximum length of the text form in bytes.
    pub const MAX_LEN: usize = 31;

    /// Encodes `id` as a gravity id.
    pub fn new(id: &str) -> Result<Self> {
        if id.len() > Self::MAX_LEN {
            return Err(Error::GravityIdTooLong(id.len()));
        }
        if id.contains('\0') {
            return Err(Error::GravityIdContainsNul);
        }
        Ok(Self(string_to_bytes32(id.as_bytes())))
    }

    /// Wraps an already encoded gravity id.
    pub const fn from_bytes(bytes: B256) -> Self {
        Self(bytes)
    }

    pub const fn as_b256(&self) -> B256 {
        self.0
    }
}

impl Default for GravityId {
    fn default() -> Self {
        Self(string_to_bytes32(DEFAULT_GRAVITY_ID.as_bytes()))
    }
}

impl FromStr for GravityId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl fmt::Display for GravityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let padding = self.0.iter().rev().take_while(|b| **b == 0).count();
        match std::str::from_utf8(&self.0[..32 - padding]) {
            Ok(text) => f.write_str(text),
            Err(_) => write!(f, "{}", self.0),
        }
    }
}

impl From<GravityId> for B256 {
    fn from(id: GravityId) -> Self {
        id.0
    }
}

/// A validator set as the bridge commits to it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Valset {
    pub validators: Vec<Address>,
    pub powers: Vec<u64>,
    pub valset_nonce: u64,
    pub reward_amount: U256,
    pub reward_token: Address,
}

impl Valset {
    /// The set a freshly deployed bridge starts from: nonce zero and no
    /// reward.
    pub fn genesis(validators: Vec<Address>, powers: Vec<u64>) -> Self {
        Self {
            validators,
            powers,
            ..Default::default()
        }
    }

    /// Powers widened to the `uint256` the contract stores.
    pub fn powers_u256(&self) -> Vec<U256> {
        self.powers.iter().copied().map(U256::from).collect()
    }

    /// Hash committing to this set under `gravity_id`.
    pub fn checkpoint(&self, gravity_id: GravityId) -> B256 {
        let preimage = CheckpointPreimage::abi_encode_params(&(
            gravity_id.as_b256(),
            CHECKPOINT_METHOD_NAME,
            U256::from(self.valset_nonce),
            self.validators.clone(),
            self.powers_u256(),
            self.reward_amount,
            self.reward_token,
        ));
        keccak256(preimage)
    }
}

/// Computes the checkpoint for a validator set.
pub fn make_checkpoint(
    validators: &[Address],
    powers: &[u64],
    valset_nonce: u64,
    reward_amount: U256,
    reward_token: Address,
    gravity_id: GravityId,
) -> B256 {
    Valset {
        validators: validators.to_vec(),
        powers: powers.to_vec(),
        valset_nonce,
        reward_amount,
        reward_token,
    }
    .checkpoint(gravity_id)
}
