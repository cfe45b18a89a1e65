//! Off-chain helpers standing in for the relayer and the decryption oracle.
//!
//! They read the engine's storage directly, so they must run inside the
//! externalities of the chain they serve (tests, dev tooling).

use crate::{
    decryption_digest, digest, input_binding, Allowed, Cleartexts, Config, Error,
    PubliclyDecryptable, EXTERNAL_DOMAIN,
};
use confidential_staking_primitives::{DecryptionProof, Handle, InputProof};
use frame_support::{ensure, pallet_prelude::DispatchError};
use parity_scale_codec::Encode;
use sp_core::{ed25519, Pair};

/// Encrypt `value` for `user` calling `contract`.
///
/// `salt` distinguishes repeated encryptions of the same value; every
/// external input can only be imported once.
pub fn encrypt_input<T: Config>(
    value: u64,
    salt: u64,
    contract: &T::AccountId,
    user: &T::AccountId,
) -> (Handle, InputProof) {
    let input = digest(EXTERNAL_DOMAIN, &(contract, user, value, salt).encode());
    let mut proof = value.to_le_bytes().to_vec();
    proof.extend_from_slice(&input_binding(&input, contract, user, value));
    (input, InputProof::truncate_from(proof))
}

/// Decrypt publicly decryptable `handles` and sign the result with `oracle`.
pub fn public_decrypt<T: Config>(
    handles: &[Handle],
    oracle: &ed25519::Pair,
) -> Result<(Vec<u64>, DecryptionProof), DispatchError> {
    let clear_values = handles
        .iter()
        .map(|handle| -> Result<u64, Error<T>> {
            ensure!(
                PubliclyDecryptable::<T>::contains_key(handle),
                Error::<T>::NotPubliclyDecryptable
            );
            Cleartexts::<T>::get(handle).ok_or(Error::<T>::UnknownHandle)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let signature = oracle.sign(&decryption_digest(handles, &clear_values));
    let signature: &[u8] = signature.as_ref();
    let proof = DecryptionProof::truncate_from(signature.to_vec());
    Ok((clear_values, proof))
}

/// Decrypt `handle` on behalf of `who`, honouring the ACL.
pub fn user_decrypt<T: Config>(handle: &Handle, who: &T::AccountId) -> Result<u64, DispatchError> {
    ensure!(
        Allowed::<T>::contains_key(handle, who),
        Error::<T>::NotAllowed
    );
    Cleartexts::<T>::get(handle).ok_or_else(|| Error::<T>::UnknownHandle.into())
}

/// Raw public key to register with `set_oracle_key` or genesis.
pub fn oracle_key(oracle: &ed25519::Pair) -> [u8; 32] {
    let mut key = [0u8; 32];
    key.copy_from_slice(oracle.public().as_ref());
    key
}
