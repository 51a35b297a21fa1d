use std::path::PathBuf;

use alloy_primitives::{Address, B256};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("contract artifact `{0}` not found")]
    ArtifactNotFound(String),

    #[error("failed reading contract artifact `{}`", path.display())]
    ReadArtifact {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed parsing contract artifact `{}`", path.display())]
    ParseArtifact {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("contract artifact `{name}` contains invalid bytecode hex")]
    InvalidBytecode {
        name: String,
        #[source]
        source: const_hex::FromHexError,
    },

    #[error("contract artifact `{0}` has no deployable bytecode")]
    EmptyBytecode(String),

    #[error("gravity id must fit in 31 bytes, got {0}")]
    GravityIdTooLong(usize),

    #[error("gravity id must not contain NUL bytes")]
    GravityIdContainsNul,

    #[error("deployment transaction {tx_hash} reverted")]
    Reverted { tx_hash: B256 },

    #[error("deployment transaction {tx_hash} has not been mined")]
    NotMined { tx_hash: B256 },

    #[error("unknown deployment transaction {tx_hash}")]
    UnknownTransaction { tx_hash: B256 },

    #[error("receipt for {tx_hash} reports no contract address")]
    MissingContractAddress { tx_hash: B256 },

    #[error("contract from {tx_hash} created at {actual}, expected {expected}")]
    UnexpectedContractAddress {
        tx_hash: B256,
        expected: Address,
        actual: Address,
    },

    #[error("signature recovery id must be 27 or 28, got {0}")]
    InvalidRecoveryId(u8),

    #[error("rpc request failed")]
    Rpc(#[from] alloy::transports::TransportError),

    #[error("failed waiting for transaction")]
    PendingTransaction(#[from] alloy::providers::PendingTransactionError),

    #[error("failed signing message")]
    Signer(#[from] alloy::signers::Error),

    #[error("invalid validator signature")]
    Signature(#[from] alloy_primitives::SignatureError),
}
