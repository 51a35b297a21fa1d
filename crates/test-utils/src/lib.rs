//! Gravity bridge test fixtures
//!
//! Deploys the contracts the bridge test suite runs against and provides the
//! validator-set helpers those tests share.
//!
//! ## Components
//!
//! - **deploy**: deploys `TestERC20A`, `TestERC20WNOM` and `Gravity`
//! - **checkpoint**: gravity id, validator sets and checkpoint hashing
//! - **validators**: signer identities and the validator sorter
//! - **chain**: the test chain seam, backed by RPC or held in memory
//! - **artifact**: compiled contract lookup by name
//! - **signature**: validator signatures over 32-byte hashes
//! - **accounts**: well-known dev chain accounts
//! - **config**: fixture configuration
//! - **error**: error types

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

pub mod accounts;
pub mod artifact;
pub mod chain;
pub mod checkpoint;
pub mod config;
pub mod deploy;
pub mod error;
pub mod signature;
pub mod validators;

pub use chain::{InMemoryChain, RpcChain, TestChain};
pub use checkpoint::{GravityId, Valset, make_checkpoint};
pub use deploy::{GravityDeployment, deploy_contracts};
pub use error::{Error, Result};
pub use validators::{SignerIdentity, signer_addresses, sort_validators, sort_validators_in_place};
