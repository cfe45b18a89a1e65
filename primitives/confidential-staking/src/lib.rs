//! Types and traits for confidential staking crates
#![cfg_attr(not(feature = "std"), no_std)]

use frame_support::{pallet_prelude::*, BoundedVec};
use sp_std::prelude::*;

/// Opaque ciphertext handle issued by the encrypted-value engine.
/// The ledger never interprets these bytes; it only stores and compares them.
pub type Handle = [u8; 32];

/// Proof blob accompanying an externally encrypted input.
pub type MaxProofLen = ConstU32<8192>;
pub type InputProof = BoundedVec<u8, MaxProofLen>;

/// Proof blob published by the decryption oracle for a set of handles.
pub type MaxDecryptionProofLen = ConstU32<1024>;
pub type DecryptionProof = BoundedVec<u8, MaxDecryptionProofLen>;

/// Homomorphic arithmetic and access control over encrypted `u64` values.
///
/// Implementations own ciphertext semantics. Callers only ever hold handles.
pub trait EncryptedValueEngine<AccountId> {
    /// Trivially encrypt a public value into a fresh handle.
    fn encrypt(value: u64) -> Result<Handle, DispatchError>;

    /// Encrypted `lhs + rhs` (wrapping, as FHE arithmetic is).
    fn add(lhs: &Handle, rhs: &Handle) -> Result<Handle, DispatchError>;

    /// Encrypted checked decrease of `balance` by `amount`.
    ///
    /// Returns `(new_balance, decreased_by)`. When `amount` exceeds `balance`
    /// the balance is left untouched and `decreased_by` encrypts zero, so the
    /// outcome never leaks whether the plaintext was sufficient.
    fn checked_decrease(balance: &Handle, amount: &Handle)
        -> Result<(Handle, Handle), DispatchError>;

    /// Validate an externally encrypted input bound to (`contract`, `user`)
    /// and import it as a native handle.
    fn verify_input(
        input: &Handle,
        proof: &InputProof,
        contract: &AccountId,
        user: &AccountId,
    ) -> Result<Handle, DispatchError>;

    /// Grant `who` permission to operate on and decrypt `handle`.
    fn allow(handle: &Handle, who: &AccountId) -> Result<(), DispatchError>;

    fn is_allowed(handle: &Handle, who: &AccountId) -> bool;

    /// Irrevocably mark `handle` as decryptable by anyone.
    fn make_publicly_decryptable(handle: &Handle) -> Result<(), DispatchError>;

    fn is_publicly_decryptable(handle: &Handle) -> bool;
}

/// Abstract decryption-proof boundary. Implement in the runtime.
pub trait DecryptionVerifier {
    /// True iff `proof` attests that `handles[i]` decrypts to `clear_values[i]`
    /// for every `i`, and for exactly this set of handles.
    fn verify(handles: &[Handle], clear_values: &[u64], proof: &[u8]) -> bool;
}

/// Rejects every proof. Useful for runtimes that have not wired an oracle yet.
impl DecryptionVerifier for () {
    fn verify(_handles: &[Handle], _clear_values: &[u64], _proof: &[u8]) -> bool {
        false
    }
}

/// Trait so other pallets can stake and unstake without extrinsics.
pub trait ConfidentialStaking<AccountId, Balance> {
    /// Lock `amount` of the public currency and mint encrypted units.
    /// Returns the handle of the minted delta.
    fn stake(who: &AccountId, amount: Balance) -> Result<Handle, DispatchError>;

    /// Burn an externally encrypted amount and register a pending withdrawal.
    /// Returns the burnt-amount handle to be decrypted by the oracle.
    fn request_unstake(
        who: &AccountId,
        encrypted_amount: Handle,
        input_proof: InputProof,
    ) -> Result<Handle, DispatchError>;

    /// Same as `request_unstake` for a handle `who` is already allowed on.
    fn request_unstake_handle(who: &AccountId, amount: Handle) -> Result<Handle, DispatchError>;

    /// Verify the decryption of a pending withdrawal and pay its recipient.
    /// Returns the recipient and the released amount.
    fn finalize_unstake(
        handle: Handle,
        clear_value: u64,
        proof: DecryptionProof,
    ) -> Result<(AccountId, Balance), DispatchError>;

    fn confidential_balance_of(who: &AccountId) -> Option<Handle>;
}

/// Metadata of the confidential token (names, symbols, etc.).
pub trait TokenMetadata {
    fn name() -> Vec<u8>;
    fn symbol() -> Vec<u8>;
    fn contract_uri() -> Vec<u8>;
}

impl TokenMetadata for () {
    fn name() -> Vec<u8> {
        Vec::new()
    }
    fn symbol() -> Vec<u8> {
        Vec::new()
    }
    fn contract_uri() -> Vec<u8> {
        Vec::new()
    }
}
