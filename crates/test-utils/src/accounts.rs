//! Pre-funded accounts of anvil and hardhat dev chains.

use alloy::signers::local::PrivateKeySigner;
use alloy_primitives::Address;

use crate::validators::SignerIdentity;

/// Chain id of anvil and hardhat dev chains.
pub const DEV_CHAIN_ID: u64 = 31337;

/// Private keys of the first five accounts of the dev chain mnemonic
/// (`test test test test test test test test test test test junk`).
pub const DEV_PRIVATE_KEYS: [&str; 5] = [
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
    "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d",
    "0x5de4111afa1a4b94908f83103eb1f1706367c2e68ca870fc3fb9a804cdab365a",
    "0x7c852118294e51e653712a81e05800f419141751be58f605c371e15141b007a6",
    "0x47e179ec197488593b187f80a00eb0da91f1b9d0b13f8733639f19c30a34926a",
];

/// A dev chain account with its signing key.
#[derive(Debug, Clone)]
pub struct TestAccount {
    pub address: Address,
    pub signer: PrivateKeySigner,
}

impl TestAccount {
    fn from_key(key: &str) -> Self {
        // keys are compile-time constants
        let signer: PrivateKeySigner = key.parse().expect("valid dev private key");
        Self {
            address: signer.address(),
            signer,
        }
    }
}

impl SignerIdentity for TestAccount {
    fn address(&self) -> Address {
        self.address
    }
}

/// All dev accounts, in derivation order.
pub fn dev_accounts() -> Vec<TestAccount> {
    DEV_PRIVATE_KEYS
        .iter()
        .map(|k| TestAccount::from_key(k))
        .collect()
}

/// The account dev chains deploy from by default (index 0).
pub fn dev_deployer() -> TestAccount {
    TestAccount::from_key(DEV_PRIVATE_KEYS[0])
}

#[cfg(test)]
mod tests {
    use alloy_primitives::address;

    use super::*;

    #[test]
    fn test_dev_accounts_valid() {
        let accounts = dev_accounts();
        assert_eq!(accounts.len(), 5);

        for account in &accounts {
            assert_eq!(account.address, account.signer.address());
            assert!(!account.address.is_zero());
        }

        for i in 0..accounts.len() {
            for j in (i + 1)..accounts.len() {
                assert_ne!(
                    accounts[i].address, accounts[j].address,
                    "duplicate address"
                );
            }
        }
    }

    #[test]
    fn test_dev_deployer_address() {
        assert_eq!(
            dev_deployer().address,
            address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266")
        );
        assert_eq!(
            dev_accounts()[1].address,
            address!("70997970C51812dc3A010C7d01b50e0d17dc79C8")
        );
    }
}
