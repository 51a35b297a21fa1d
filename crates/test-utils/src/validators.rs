//! Signer identities and validator ordering.
//!
//! The bridge expects validator sets ordered by address. Tests build their
//! sets from whatever signers they hold, so the helpers here work over any
//! [`SignerIdentity`].

use alloy::signers::local::PrivateKeySigner;
use alloy_primitives::Address;

/// An account that can sign on behalf of a validator.
pub trait SignerIdentity {
    /// The account's address.
    fn address(&self) -> Address;

    /// Key the validator sorter orders by: the lowercase, `0x`-prefixed hex
    /// address.
    fn sort_key(&self) -> String {
        const_hex::encode_prefixed(self.address())
    }
}

impl SignerIdentity for Address {
    fn address(&self) -> Address {
        *self
    }
}

impl SignerIdentity for PrivateKeySigner {
    fn address(&self) -> Address {
        PrivateKeySigner::address(self)
    }
}

impl<T: SignerIdentity + ?Sized> SignerIdentity for &T {
    fn address(&self) -> Address {
        (**self).address()
    }

    fn sort_key(&self) -> String {
        (**self).sort_key()
    }
}

/// Resolves the address of every signer, preserving order.
pub fn signer_addresses<S: SignerIdentity>(signers: &[S]) -> Vec<Address> {
    signers.iter().map(SignerIdentity::address).collect()
}

/// Sorts `validators` in place by ascending lowercase address.
///
/// Insertion sort: each element is held and its greater left neighbours are
/// shifted one slot right before it is dropped into the gap. Elements with
/// equal addresses never pass each other, so the sort is stable.
///
/// Returns the number of positions elements were shifted by, which is zero
/// for input that is already sorted.
pub fn sort_validators_in_place<S: SignerIdentity>(validators: &mut [S]) -> usize {
    let mut shifted = 0;
    for i in 1..validators.len() {
        let held = validators[i].sort_key();
        let mut j = i;
        while j > 0 && validators[j - 1].sort_key() > held {
            j -= 1;
        }
        if j < i {
            validators[j..=i].rotate_right(1);
            shifted += i - j;
        }
    }
    shifted
}

/// Returns a sorted copy of `validators`, leaving the input untouched.
///
/// See [`sort_validators_in_place`] for the ordering.
pub fn sort_validators<S: SignerIdentity + Clone>(validators: &[S]) -> Vec<S> {
    let mut sorted = validators.to_vec();
    sort_validators_in_place(&mut sorted);
    sorted
}
