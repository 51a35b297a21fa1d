//! Validator signatures over bridge hashes.
//!
//! Validators sign the 32-byte hash as an EIP-191 personal message, which is
//! what the bridge's `verifySig` checks with `ecrecover`.

use alloy::signers::SignerSync;
use alloy_primitives::{Address, B256, Signature, U256};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Signature in the `(v, r, s)` layout of the bridge's `Signature` struct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValSignature {
    pub v: u8,
    pub r: B256,
    pub s: B256,
}

impl ValSignature {
    fn from_signature(signature: &Signature) -> Self {
        Self {
            v: 27 + u8::from(signature.v()),
            r: B256::from(signature.r().to_be_bytes::<32>()),
            s: B256::from(signature.s().to_be_bytes::<32>()),
        }
    }

    /// Recovers the address that signed `hash`.
    pub fn recover(&self, hash: B256) -> Result<Address> {
        let y_parity = match self.v {
            27 => false,
            28 => true,
            v => return Err(Error::InvalidRecoveryId(v)),
        };
        let signature = Signature::new(
            U256::from_be_bytes(self.r.0),
            U256::from_be_bytes(self.s.0),
            y_parity,
        );
        Ok(signature.recover_address_from_msg(hash.as_slice())?)
    }
}

/// How [`sign_hash`] produces signatures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SigningOptions {
    /// Replace the first signature's `v` with `0` so the bridge rejects it.
    pub corrupt_sig: bool,
}

/// Signs `hash` with every signer, in order.
pub fn sign_hash<S>(signers: &[S], hash: B256, options: SigningOptions) -> Result<Vec<ValSignature>>
where
    S: SignerSync,
{
    let mut signatures = signers
        .iter()
        .map(|signer| {
            let signature = signer.sign_message_sync(hash.as_slice())?;
            Ok(ValSignature::from_signature(&signature))
        })
        .collect::<Result<Vec<_>>>()?;

    if options.corrupt_sig
        && let Some(first) = signatures.first_mut()
    {
        first.v = 0;
    }
    Ok(signatures)
}

#[cfg(test)]
mod tests {
    use alloy::signers::local::PrivateKeySigner;

    use super::*;
    use crate::accounts::dev_accounts;

    fn signers() -> Vec<PrivateKeySigner> {
        dev_accounts()
            .into_iter()
            .map(|a| a.signer)
            .take(3)
            .collect()
    }

    #[test]
    fn test_signatures_recover_to_signers() {
        let hash = B256::repeat_byte(0xab);
        let signers = signers();
        let signatures = sign_hash(&signers, hash, SigningOptions::default()).unwrap();

        assert_eq!(signatures.len(), signers.len());
        for (signature, signer) in signatures.iter().zip(&signers) {
            assert!(signature.v == 27 || signature.v == 28);
            assert_eq!(signature.recover(hash).unwrap(), signer.address());
        }
    }

    #[test]
    fn test_signature_is_bound_to_hash() {
        let signers = signers();
        let hash = B256::repeat_byte(0x01);
        let signatures = sign_hash(&signers[..1], hash, SigningOptions::default()).unwrap();

        let recovered = signatures[0].recover(B256::repeat_byte(0x02)).unwrap();
        assert_ne!(recovered, signers[0].address());
    }

    #[test]
    fn test_corrupt_sig_only_touches_first() {
        let hash = B256::repeat_byte(0xcd);
        let signers = signers();
        let clean = sign_hash(&signers, hash, SigningOptions::default()).unwrap();
        let corrupt = sign_hash(&signers, hash, SigningOptions { corrupt_sig: true }).unwrap();

        assert_eq!(corrupt[0].v, 0);
        assert_eq!(corrupt[0].r, clean[0].r);
        assert_eq!(&corrupt[1..], &clean[1..]);
        assert!(matches!(
            corrupt[0].recover(hash),
            Err(Error::InvalidRecoveryId(0))
        ));
    }

    #[test]
    fn test_corrupt_sig_without_signers() {
        let signers: Vec<PrivateKeySigner> = Vec::new();
        let signatures =
            sign_hash(&signers, B256::ZERO, SigningOptions { corrupt_sig: true }).unwrap();
        assert!(signatures.is_empty());
    }
}
