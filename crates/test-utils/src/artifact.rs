//! Compiled contract lookup by name.
//!
//! Hardhat writes `artifacts/contracts/<Name>.sol/<Name>.json` with the
//! creation code under `bytecode`; Foundry writes `out/<Name>.sol/<Name>.json`
//! with it under `bytecode.object`. [`ArtifactDir`] reads either.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use alloy_primitives::Bytes;
use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};

/// Plain ERC20 token used as the bridged asset in tests.
pub const TEST_ERC20: &str = "TestERC20A";

/// Wrapped native token handed to the bridge constructor.
pub const TEST_ERC20_WNOM: &str = "TestERC20WNOM";

/// The bridge contract.
pub const GRAVITY: &str = "Gravity";

/// Creation code of a compiled contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractArtifact {
    pub name: String,
    pub bytecode: Bytes,
}

impl ContractArtifact {
    pub fn new(name: impl Into<String>, bytecode: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            bytecode: bytecode.into(),
        }
    }

    /// Creation code followed by ABI-encoded constructor arguments.
    pub fn init_code(&self, constructor_args: &[u8]) -> Bytes {
        let mut code = Vec::with_capacity(self.bytecode.len() + constructor_args.len());
        code.extend_from_slice(&self.bytecode);
        code.extend_from_slice(constructor_args);
        code.into()
    }
}

/// Resolves a contract name to its compiled artifact.
pub trait ArtifactSource: Send + Sync {
    fn artifact(&self, name: &str) -> Result<ContractArtifact>;
}

/// Artifacts held in memory.
#[derive(Debug, Clone, Default)]
pub struct ArtifactSet {
    artifacts: HashMap<String, Bytes>,
}

impl ArtifactSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, bytecode: impl Into<Bytes>) {
        self.artifacts.insert(name.into(), bytecode.into());
    }

    pub fn with(mut self, name: impl Into<String>, bytecode: impl Into<Bytes>) -> Self {
        self.insert(name, bytecode);
        self
    }
}

impl ArtifactSource for ArtifactSet {
    fn artifact(&self, name: &str) -> Result<ContractArtifact> {
        let bytecode = self
            .artifacts
            .get(name)
            .ok_or_else(|| Error::ArtifactNotFound(name.to_string()))?;
        if bytecode.is_empty() {
            return Err(Error::EmptyBytecode(name.to_string()));
        }
        Ok(ContractArtifact::new(name, bytecode.clone()))
    }
}

/// Artifacts read from a Hardhat or Foundry output directory.
#[derive(Debug, Clone)]
pub struct ArtifactDir {
    root: PathBuf,
}

#[derive(Deserialize)]
struct RawArtifact {
    bytecode: RawBytecode,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawBytecode {
    Hex(String),
    Object { object: String },
}

impl RawBytecode {
    fn as_hex(&self) -> &str {
        match self {
            Self::Hex(hex) | Self::Object { object: hex } => hex.as_str(),
        }
    }
}

impl ArtifactDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn locate(&self, name: &str) -> Option<PathBuf> {
        let file = format!("{name}.json");
        let nested = self.root.join(format!("{name}.sol")).join(&file);
        [nested, self.root.join(file)]
            .into_iter()
            .find(|path| path.is_file())
    }
}

impl ArtifactSource for ArtifactDir {
    fn artifact(&self, name: &str) -> Result<ContractArtifact> {
        let path = self
            .locate(name)
            .ok_or_else(|| Error::ArtifactNotFound(name.to_string()))?;

        let contents = std::fs::read_to_string(&path).map_err(|source| Error::ReadArtifact {
            path: path.clone(),
            source,
        })?;
        let raw: RawArtifact =
            serde_json::from_str(&contents).map_err(|source| Error::ParseArtifact {
                path: path.clone(),
                source,
            })?;

        let bytecode = const_hex::decode(raw.bytecode.as_hex().trim()).map_err(|source| {
            Error::InvalidBytecode {
                name: name.to_string(),
                source,
            }
        })?;
        if bytecode.is_empty() {
            return Err(Error::EmptyBytecode(name.to_string()));
        }

        debug!(name, path = %path.display(), len = bytecode.len(), "loaded contract artifact");
        Ok(ContractArtifact::new(name, bytecode))
    }
}
