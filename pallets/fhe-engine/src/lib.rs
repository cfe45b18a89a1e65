//! **pallet-fhe-engine**
//!
//! Cleartext encrypted-value engine backing `pallet-confidential-staking` in
//! development and test runtimes. It plays the part of an FHE coprocessor and
//! of the decryption oracle's on-chain verifier:
//! - handles are 32-byte identifiers derived from a monotonically increasing
//!   nonce and mapped to cleartext `u64` values kept in storage,
//! - an ACL records which accounts may operate on and decrypt each handle,
//! - handles can be irrevocably marked publicly decryptable,
//! - externally encrypted inputs carry a proof binding them to a
//!   (contract, user) pair and can be imported exactly once,
//! - public decryptions are attested by an ed25519 signature of the oracle
//!   key, checked by the `DecryptionVerifier` impl.
//!
//! Nothing stored here is confidential. Production runtimes plug a real
//! coprocessor in behind the same `EncryptedValueEngine` and
//! `DecryptionVerifier` traits.
//!
//! Handles are never freed: `Cleartexts` and `Allowed` only grow, and a handle
//! superseded by a newer balance stays readable by the accounts allowed on it.

#![cfg_attr(not(feature = "std"), no_std)]

pub use pallet::*;

#[cfg(feature = "runtime-benchmarks")]
mod benchmarking;
#[cfg(feature = "std")]
pub mod client;
#[cfg(test)]
mod mock;
pub mod weights;

use blake2::{digest::consts::U32, Blake2b, Digest};
use confidential_staking_primitives::{
    DecryptionVerifier, EncryptedValueEngine, Handle, InputProof,
};
use frame_support::pallet_prelude::*;
use frame_system::pallet_prelude::*;
use parity_scale_codec::Encode;
use sp_core::ed25519;
use sp_std::prelude::*;
pub use weights::WeightInfo;

pub const LOG_TARGET: &str = "runtime::fhe-engine";

const HANDLE_DOMAIN: &[u8] = b"fhe/handle";
const EXTERNAL_DOMAIN: &[u8] = b"fhe/external";
const INPUT_DOMAIN: &[u8] = b"fhe/input";
const DECRYPT_DOMAIN: &[u8] = b"fhe/decrypt";

/// Input proof layout: cleartext (u64 LE) || binding digest (32 bytes).
pub const INPUT_PROOF_LEN: usize = 8 + 32;

type Blake2b256 = Blake2b<U32>;

fn digest(domain: &[u8], payload: &[u8]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    hasher.update(domain);
    hasher.update(payload);
    hasher.finalize().into()
}

/// Handle issued for the `nonce`-th allocation.
pub fn derive_handle(nonce: u64) -> Handle {
    digest(HANDLE_DOMAIN, &nonce.to_le_bytes())
}

/// Digest binding an external input to its contract, user and cleartext.
pub fn input_binding<AccountId: Encode>(
    input: &Handle,
    contract: &AccountId,
    user: &AccountId,
    value: u64,
) -> [u8; 32] {
    digest(INPUT_DOMAIN, &(input, contract, user, value).encode())
}

/// Message signed by the decryption oracle for a public decryption.
pub fn decryption_digest(handles: &[Handle], clear_values: &[u64]) -> [u8; 32] {
    digest(DECRYPT_DOMAIN, &(handles, clear_values).encode())
}

#[frame_support::pallet]
pub mod pallet {
    use super::*;

    #[pallet::config]
    pub trait Config: frame_system::Config {
        type RuntimeEvent: From<Event<Self>> + IsType<<Self as frame_system::Config>::RuntimeEvent>;

        type WeightInfo: WeightInfo;
    }

    #[pallet::pallet]
    pub struct Pallet<T>(_);

    /// Nonce of the next handle allocation.
    #[pallet::storage]
    pub type NextHandleNonce<T: Config> = StorageValue<_, u64, ValueQuery>;

    /// Cleartext behind every issued handle.
    #[pallet::storage]
    pub type Cleartexts<T: Config> = StorageMap<_, Blake2_128Concat, Handle, u64, OptionQuery>;

    /// ACL: accounts allowed to operate on and decrypt a handle.
    #[pallet::storage]
    pub type Allowed<T: Config> = StorageDoubleMap<
        _,
        Blake2_128Concat,
        Handle,
        Blake2_128Concat,
        T::AccountId,
        (),
        OptionQuery,
    >;

    #[pallet::storage]
    pub type PubliclyDecryptable<T: Config> =
        StorageMap<_, Blake2_128Concat, Handle, (), OptionQuery>;

    /// External inputs already imported -> native handle they produced.
    #[pallet::storage]
    pub type ImportedInputs<T: Config> =
        StorageMap<_, Blake2_128Concat, Handle, Handle, OptionQuery>;

    /// ed25519 public key of the decryption oracle.
    #[pallet::storage]
    pub type OracleKey<T: Config> = StorageValue<_, [u8; 32], OptionQuery>;

    #[pallet::genesis_config]
    #[derive(frame_support::DefaultNoBound)]
    pub struct GenesisConfig<T: Config> {
        pub oracle_key: Option<[u8; 32]>,
        #[serde(skip)]
        pub _config: sp_std::marker::PhantomData<T>,
    }

    #[pallet::genesis_build]
    impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
        fn build(&self) {
            if let Some(key) = self.oracle_key {
                OracleKey::<T>::put(key);
            }
        }
    }

    #[pallet::event]
    #[pallet::generate_deposit(pub(super) fn deposit_event)]
    pub enum Event<T: Config> {
        HandleAllowed { handle: Handle, who: T::AccountId },
        /// Anyone may now request the decryption of `handle`.
        MadePubliclyDecryptable { handle: Handle },
        OracleKeySet { key: [u8; 32] },
    }

    #[pallet::error]
    pub enum Error<T> {
        /// Handle was never issued by this engine.
        UnknownHandle,
        /// Caller is not in the ACL of the handle.
        NotAllowed,
        /// Input proof is malformed or bound to another contract/user/value.
        InvalidInputProof,
        /// External input was already imported once.
        InputAlreadyImported,
        NotPubliclyDecryptable,
        OracleKeyNotSet,
        /// Every handle nonce has been issued.
        HandlesExhausted,
    }

    #[pallet::call]
    impl<T: Config> Pallet<T> {
        /// Rotate the decryption oracle key.
        #[pallet::call_index(0)]
        #[pallet::weight(T::WeightInfo::set_oracle_key())]
        pub fn set_oracle_key(origin: OriginFor<T>, key: [u8; 32]) -> DispatchResult {
            ensure_root(origin)?;
            OracleKey::<T>::put(key);
            Self::deposit_event(Event::OracleKeySet { key });
            Ok(())
        }

        /// Share access to `handle` with `who`. Caller must already be allowed.
        #[pallet::call_index(1)]
        #[pallet::weight(T::WeightInfo::allow())]
        pub fn allow(origin: OriginFor<T>, handle: Handle, who: T::AccountId) -> DispatchResult {
            let caller = ensure_signed(origin)?;
            ensure!(
                Allowed::<T>::contains_key(handle, &caller),
                Error::<T>::NotAllowed
            );
            Self::do_allow(&handle, &who)
        }

        /// Mark `handle` publicly decryptable. Caller must be allowed on it.
        #[pallet::call_index(2)]
        #[pallet::weight(T::WeightInfo::make_publicly_decryptable())]
        pub fn make_publicly_decryptable(origin: OriginFor<T>, handle: Handle) -> DispatchResult {
            let caller = ensure_signed(origin)?;
            ensure!(
                Allowed::<T>::contains_key(handle, &caller),
                Error::<T>::NotAllowed
            );
            Self::do_make_publicly_decryptable(&handle)
        }
    }

    impl<T: Config> Pallet<T> {
        /// Nonce the next allocated handle will be derived from.
        pub fn next_nonce() -> u64 {
            NextHandleNonce::<T>::get()
        }

        /// Issue a fresh handle for `value`. Fails once the nonce space is used
        /// up so that no live handle is ever re-derived.
        pub(crate) fn new_handle(value: u64) -> Result<Handle, DispatchError> {
            let nonce = NextHandleNonce::<T>::try_mutate(|next| -> Result<u64, DispatchError> {
                let current = *next;
                *next = current.checked_add(1).ok_or(Error::<T>::HandlesExhausted)?;
                Ok(current)
            })?;
            let handle = derive_handle(nonce);
            Cleartexts::<T>::insert(handle, value);
            Ok(handle)
        }

        pub(crate) fn cleartext(handle: &Handle) -> Result<u64, DispatchError> {
            Cleartexts::<T>::get(handle).ok_or_else(|| Error::<T>::UnknownHandle.into())
        }

        pub(crate) fn do_allow(handle: &Handle, who: &T::AccountId) -> DispatchResult {
            ensure!(
                Cleartexts::<T>::contains_key(handle),
                Error::<T>::UnknownHandle
            );
            if !Allowed::<T>::contains_key(handle, who) {
                Allowed::<T>::insert(handle, who, ());
                Self::deposit_event(Event::HandleAllowed {
                    handle: *handle,
                    who: who.clone(),
                });
            }
            Ok(())
        }

        pub(crate) fn do_make_publicly_decryptable(handle: &Handle) -> DispatchResult {
            ensure!(
                Cleartexts::<T>::contains_key(handle),
                Error::<T>::UnknownHandle
            );
            if !PubliclyDecryptable::<T>::contains_key(handle) {
                PubliclyDecryptable::<T>::insert(handle, ());
                Self::deposit_event(Event::MadePubliclyDecryptable { handle: *handle });
            }
            Ok(())
        }
    }

    // ------------ EncryptedValueEngine (cleartext backend) ------------

    impl<T: Config> EncryptedValueEngine<T::AccountId> for Pallet<T> {
        fn encrypt(value: u64) -> Result<Handle, DispatchError> {
            Self::new_handle(value)
        }

        fn add(lhs: &Handle, rhs: &Handle) -> Result<Handle, DispatchError> {
            let sum = Self::cleartext(lhs)?.wrapping_add(Self::cleartext(rhs)?);
            Self::new_handle(sum)
        }

        fn checked_decrease(
            balance: &Handle,
            amount: &Handle,
        ) -> Result<(Handle, Handle), DispatchError> {
            let current = Self::cleartext(balance)?;
            let requested = Self::cleartext(amount)?;
            let decreased_by = if requested <= current { requested } else { 0 };
            // The decrease handle is allocated first.
            let decreased = Self::new_handle(decreased_by)?;
            let remaining = Self::new_handle(current - decreased_by)?;
            Ok((remaining, decreased))
        }

        fn verify_input(
            input: &Handle,
            proof: &InputProof,
            contract: &T::AccountId,
            user: &T::AccountId,
        ) -> Result<Handle, DispatchError> {
            if proof.len() != INPUT_PROOF_LEN {
                log::warn!(
                    target: LOG_TARGET,
                    "input proof for {:?} has length {}, expected {}",
                    input,
                    proof.len(),
                    INPUT_PROOF_LEN,
                );
                return Err(Error::<T>::InvalidInputProof.into());
            }
            let mut raw = [0u8; 8];
            raw.copy_from_slice(&proof[..8]);
            let value = u64::from_le_bytes(raw);

            let binding = input_binding(input, contract, user, value);
            if proof[8..] != binding[..] {
                log::warn!(
                    target: LOG_TARGET,
                    "input {:?} is not bound to contract {:?} and user {:?}",
                    input,
                    contract,
                    user,
                );
                return Err(Error::<T>::InvalidInputProof.into());
            }
            ensure!(
                !ImportedInputs::<T>::contains_key(input),
                Error::<T>::InputAlreadyImported
            );

            let handle = Self::new_handle(value)?;
            ImportedInputs::<T>::insert(input, handle);
            Ok(handle)
        }

        fn allow(handle: &Handle, who: &T::AccountId) -> Result<(), DispatchError> {
            Self::do_allow(handle, who)
        }

        fn is_allowed(handle: &Handle, who: &T::AccountId) -> bool {
            Allowed::<T>::contains_key(handle, who)
        }

        fn make_publicly_decryptable(handle: &Handle) -> Result<(), DispatchError> {
            Self::do_make_publicly_decryptable(handle)
        }

        fn is_publicly_decryptable(handle: &Handle) -> bool {
            PubliclyDecryptable::<T>::contains_key(handle)
        }
    }

    // ------------ DecryptionVerifier (oracle signature) ------------

    impl<T: Config> DecryptionVerifier for Pallet<T> {
        fn verify(handles: &[Handle], clear_values: &[u64], proof: &[u8]) -> bool {
            if handles.is_empty() || handles.len() != clear_values.len() {
                return false;
            }
            if !handles
                .iter()
                .all(|handle| PubliclyDecryptable::<T>::contains_key(handle))
            {
                return false;
            }
            let Some(key) = OracleKey::<T>::get() else {
                log::warn!(target: LOG_TARGET, "decryption proof checked without an oracle key");
                return false;
            };
            let Ok(raw) = <[u8; 64]>::try_from(proof) else {
                return false;
            };
            sp_io::crypto::ed25519_verify(
                &ed25519::Signature::from_raw(raw),
                &decryption_digest(handles, clear_values),
                &ed25519::Public::from_raw(key),
            )
        }
    }
}
