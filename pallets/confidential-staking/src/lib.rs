//! **pallet-confidential-staking**
//!
//! Confidential staking vault. Stakers lock the native currency into this
//! pallet's custody account and receive an *encrypted* balance of staking
//! units (`StakeUnitScale` base units of the currency per unit). Withdrawal is
//! a two-phase, proof-gated flow:
//! 1) `request_unstake` burns an encrypted amount from the caller's balance,
//!    marks the burnt-amount handle publicly decryptable and registers a
//!    pending withdrawal keyed by that handle;
//! 2) once the decryption oracle has published the clear value and a proof,
//!    anyone may call `finalize_unstake`: the pending entry is removed, the
//!    proof is verified and the registered recipient is paid.
//!
//! The pallet never sees plaintext balances. Homomorphic arithmetic and ACLs
//! are delegated to `Config::Engine`, decryption proofs to `Config::Verifier`.
//! The minted amount of a stake is public (it equals the locked currency);
//! an unstaked amount becomes public only when it is finalized.
//!
//! Every dispatchable runs in its own storage layer: a failing payout rolls
//! back the removal of the pending entry, which stays finalizable.

#![cfg_attr(not(feature = "std"), no_std)]

pub use pallet::*;

#[cfg(feature = "runtime-benchmarks")]
mod benchmarking;
#[cfg(test)]
mod mock;
pub mod weights;

use confidential_staking_primitives::{
    ConfidentialStaking, DecryptionProof, DecryptionVerifier, EncryptedValueEngine, Handle,
    InputProof, TokenMetadata,
};
use frame_support::{
    pallet_prelude::*,
    storage::with_storage_layer,
    traits::{
        fungible::{Inspect, Mutate},
        tokens::Preservation,
    },
    PalletId,
};
use frame_system::pallet_prelude::*;
use sp_runtime::{
    traits::{AccountIdConversion, CheckedMul, Zero},
    ArithmeticError,
};
use sp_std::prelude::*;
pub use weights::WeightInfo;

pub const LOG_TARGET: &str = "runtime::confidential-staking";

pub type BalanceOf<T> =
    <<T as Config>::Currency as Inspect<<T as frame_system::Config>::AccountId>>::Balance;

#[frame_support::pallet]
pub mod pallet {
    use super::*;

    #[pallet::config]
    pub trait Config: frame_system::Config {
        type RuntimeEvent: From<Event<Self>> + IsType<<Self as frame_system::Config>::RuntimeEvent>;

        /// Public currency locked by stakers and paid out on withdrawal.
        type Currency: Mutate<Self::AccountId>;

        /// Encrypted-value engine (encrypt/add/decrease, ACL, public decryption).
        type Engine: EncryptedValueEngine<Self::AccountId>;

        /// Decryption oracle proof verifier.
        type Verifier: DecryptionVerifier;

        /// Name, symbol and URI of the confidential staking token.
        type Metadata: TokenMetadata;

        /// PalletId used to derive the custody account holding staked funds.
        #[pallet::constant]
        type PalletId: Get<PalletId>;

        /// Base units of `Currency` per encrypted staking unit.
        #[pallet::constant]
        type StakeUnitScale: Get<BalanceOf<Self>>;

        /// Decimals of the confidential staking token.
        #[pallet::constant]
        type Decimals: Get<u8>;

        type WeightInfo: WeightInfo;
    }

    #[pallet::pallet]
    pub struct Pallet<T>(_);

    /// Encrypted staking balance of each account.
    #[pallet::storage]
    pub type ConfidentialBalances<T: Config> =
        StorageMap<_, Blake2_128Concat, T::AccountId, Handle, OptionQuery>;

    /// Encrypted sum of all balances.
    #[pallet::storage]
    pub type ConfidentialTotalSupply<T: Config> = StorageValue<_, Handle, OptionQuery>;

    /// Pending withdrawals: burnt-amount handle -> recipient.
    #[pallet::storage]
    pub type PendingUnstakes<T: Config> =
        StorageMap<_, Blake2_128Concat, Handle, T::AccountId, OptionQuery>;

    // --------------------------- Events / Errors --------------------------------------

    #[pallet::event]
    #[pallet::generate_deposit(pub(super) fn deposit_event)]
    pub enum Event<T: Config> {
        /// Currency was locked and the matching units minted. The minted delta
        /// is public; the resulting balance is not.
        Staked {
            staker: T::AccountId,
            amount: BalanceOf<T>,
            units: u64,
            encrypted_amount: Handle,
        },
        /// An encrypted amount was burnt and awaits public decryption.
        UnstakeRequested { staker: T::AccountId, handle: Handle },
        /// A pending withdrawal was verified and paid out.
        UnstakeFinalized {
            recipient: T::AccountId,
            units: u64,
            amount: BalanceOf<T>,
        },
    }

    #[pallet::error]
    pub enum Error<T> {
        /// Stake amount is zero, not a multiple of the unit scale, or exceeds
        /// `u64::MAX` units.
        InvalidStakeAmount,
        /// Caller is not allowed on the handle it tried to unstake.
        UnauthorizedHandle,
        /// Caller has never staked.
        NoBalance,
        /// Handle is unknown at finalization or already pending at request.
        InvalidUnstakeRequest,
        /// Decryption proof does not attest the claimed clear value.
        InvalidDecryptionProof,
        /// Payout from the custody account failed.
        TransferFailed,
    }

    #[pallet::hooks]
    impl<T: Config> Hooks<BlockNumberFor<T>> for Pallet<T> {
        /// Custody only ever holds whole units: with a unit of at least the
        /// existential deposit it is never reaped while it backs a balance.
        fn integrity_test() {
            assert!(
                !T::StakeUnitScale::get().is_zero(),
                "StakeUnitScale must be non-zero"
            );
            assert!(
                T::StakeUnitScale::get() >= T::Currency::minimum_balance(),
                "StakeUnitScale must be at least the currency's existential deposit"
            );
        }

        #[cfg(feature = "try-runtime")]
        fn try_state(_n: BlockNumberFor<T>) -> Result<(), sp_runtime::TryRuntimeError> {
            Self::do_try_state()
        }
    }

    // --------------------------- Calls -------------------------------------------------

    #[pallet::call]
    impl<T: Config> Pallet<T> {
        /// Lock `amount` of the public currency and mint `amount / StakeUnitScale`
        /// encrypted units to the caller.
        #[pallet::call_index(0)]
        #[pallet::weight(T::WeightInfo::stake())]
        pub fn stake(origin: OriginFor<T>, #[pallet::compact] amount: BalanceOf<T>) -> DispatchResult {
            let who = ensure_signed(origin)?;
            Self::do_stake(&who, amount)?;
            Ok(())
        }

        /// Request a withdrawal of an amount encrypted client-side.
        ///
        /// `input_proof` must bind `encrypted_amount` to this pallet's custody
        /// account and the caller.
        #[pallet::call_index(1)]
        #[pallet::weight(T::WeightInfo::request_unstake())]
        pub fn request_unstake(
            origin: OriginFor<T>,
            encrypted_amount: Handle,
            input_proof: InputProof,
        ) -> DispatchResult {
            let who = ensure_signed(origin)?;
            Self::do_request_unstake_external(&who, &encrypted_amount, &input_proof)?;
            Ok(())
        }

        /// Request a withdrawal of an amount the caller already holds a handle to.
        #[pallet::call_index(2)]
        #[pallet::weight(T::WeightInfo::request_unstake_handle())]
        pub fn request_unstake_handle(origin: OriginFor<T>, amount: Handle) -> DispatchResult {
            let who = ensure_signed(origin)?;
            Self::do_request_unstake_handle(&who, amount)?;
            Ok(())
        }

        /// Pay out a pending withdrawal once its clear value has been published.
        ///
        /// Callable by anyone holding the proof; funds always go to the account
        /// that requested the withdrawal.
        #[pallet::call_index(3)]
        #[pallet::weight(T::WeightInfo::finalize_unstake())]
        pub fn finalize_unstake(
            origin: OriginFor<T>,
            handle: Handle,
            clear_value: u64,
            proof: DecryptionProof,
        ) -> DispatchResult {
            let caller = ensure_signed(origin)?;
            log::debug!(
                target: LOG_TARGET,
                "finalize of {:?} submitted by {:?}",
                handle,
                caller,
            );
            Self::do_finalize_unstake(handle, clear_value, &proof)?;
            Ok(())
        }
    }

    // --------------------------- Helpers ----------------------------------------------

    impl<T: Config> Pallet<T> {
        /// Account holding all staked currency.
        #[inline]
        pub fn custody_account() -> T::AccountId {
            T::PalletId::get().into_account_truncating()
        }

        pub fn stake_unit_scale() -> BalanceOf<T> {
            T::StakeUnitScale::get()
        }

        pub fn confidential_balance_of(who: &T::AccountId) -> Option<Handle> {
            ConfidentialBalances::<T>::get(who)
        }

        pub fn confidential_total_supply() -> Option<Handle> {
            ConfidentialTotalSupply::<T>::get()
        }

        /// Recipient registered for a pending withdrawal.
        pub fn pending_unstake(handle: &Handle) -> Option<T::AccountId> {
            PendingUnstakes::<T>::get(handle)
        }

        pub fn name() -> Vec<u8> {
            T::Metadata::name()
        }

        pub fn symbol() -> Vec<u8> {
            T::Metadata::symbol()
        }

        pub fn contract_uri() -> Vec<u8> {
            T::Metadata::contract_uri()
        }

        pub fn decimals() -> u8 {
            T::Decimals::get()
        }

        /// Units minted for `amount`, or `None` if `amount` is zero, not an
        /// exact multiple of the scale, or above `u64::MAX` units.
        pub fn units_from_amount(amount: BalanceOf<T>) -> Option<u64> {
            let scale = T::StakeUnitScale::get();
            if amount.is_zero() || scale.is_zero() || !(amount % scale).is_zero() {
                return None;
            }
            (amount / scale).try_into().ok()
        }

        /// Currency released for `units`, or `None` on overflow.
        pub fn amount_from_units(units: u64) -> Option<BalanceOf<T>> {
            BalanceOf::<T>::try_from(units)
                .ok()?
                .checked_mul(&T::StakeUnitScale::get())
        }

        pub fn do_stake(who: &T::AccountId, amount: BalanceOf<T>) -> Result<Handle, DispatchError> {
            let Some(units) = Self::units_from_amount(amount) else {
                log::warn!(
                    target: LOG_TARGET,
                    "rejected stake of {:?} by {:?}: not a non-zero multiple of {:?} within u64 units",
                    amount,
                    who,
                    T::StakeUnitScale::get(),
                );
                return Err(Error::<T>::InvalidStakeAmount.into());
            };

            T::Currency::transfer(who, &Self::custody_account(), amount, Preservation::Expendable)?;

            let minted = T::Engine::encrypt(units)?;
            Self::mint(who, &minted)?;
            T::Engine::allow(&minted, who)?;

            log::debug!(target: LOG_TARGET, "{:?} staked {:?} ({} units)", who, amount, units);
            Self::deposit_event(Event::Staked {
                staker: who.clone(),
                amount,
                units,
                encrypted_amount: minted,
            });
            Ok(minted)
        }

        /// Import an externally encrypted amount, then burn and register it.
        pub fn do_request_unstake_external(
            who: &T::AccountId,
            encrypted_amount: &Handle,
            input_proof: &InputProof,
        ) -> Result<Handle, DispatchError> {
            let custody = Self::custody_account();
            let amount = T::Engine::verify_input(encrypted_amount, input_proof, &custody, who)?;
            T::Engine::allow(&amount, &custody)?;
            Self::do_request_unstake(who, amount)
        }

        /// Burn and register an amount `who` already holds a handle to.
        pub fn do_request_unstake_handle(
            who: &T::AccountId,
            amount: Handle,
        ) -> Result<Handle, DispatchError> {
            if !T::Engine::is_allowed(&amount, who) {
                log::warn!(
                    target: LOG_TARGET,
                    "{:?} is not allowed on handle {:?}",
                    who,
                    amount,
                );
                return Err(Error::<T>::UnauthorizedHandle.into());
            }
            Self::do_request_unstake(who, amount)
        }

        /// Burn `amount` from `who` and register the burnt handle as pending.
        fn do_request_unstake(who: &T::AccountId, amount: Handle) -> Result<Handle, DispatchError> {
            let burnt = Self::burn(who, &amount)?;
            T::Engine::make_publicly_decryptable(&burnt)?;

            if PendingUnstakes::<T>::contains_key(burnt) {
                log::warn!(
                    target: LOG_TARGET,
                    "burnt handle {:?} of {:?} is already pending",
                    burnt,
                    who,
                );
                return Err(Error::<T>::InvalidUnstakeRequest.into());
            }
            PendingUnstakes::<T>::insert(burnt, who.clone());

            log::debug!(target: LOG_TARGET, "{:?} requested unstake of {:?}", who, burnt);
            Self::deposit_event(Event::UnstakeRequested {
                staker: who.clone(),
                handle: burnt,
            });
            Ok(burnt)
        }

        /// Remove the pending entry for `handle`, verify the decryption and pay
        /// the registered recipient. Returns the recipient and the paid amount.
        ///
        /// Callers outside a dispatchable must run this in a storage layer.
        pub fn do_finalize_unstake(
            handle: Handle,
            clear_value: u64,
            proof: &[u8],
        ) -> Result<(T::AccountId, BalanceOf<T>), DispatchError> {
            // State is cleared before any value leaves custody.
            let Some(recipient) = PendingUnstakes::<T>::take(handle) else {
                log::warn!(target: LOG_TARGET, "finalize of unknown handle {:?}", handle);
                return Err(Error::<T>::InvalidUnstakeRequest.into());
            };

            if !T::Verifier::verify(&[handle], &[clear_value], proof) {
                log::warn!(
                    target: LOG_TARGET,
                    "decryption proof rejected for {:?} claiming {}",
                    handle,
                    clear_value,
                );
                return Err(Error::<T>::InvalidDecryptionProof.into());
            }

            let amount = Self::amount_from_units(clear_value).ok_or(ArithmeticError::Overflow)?;
            if !amount.is_zero() {
                T::Currency::transfer(
                    &Self::custody_account(),
                    &recipient,
                    amount,
                    Preservation::Expendable,
                )
                .map_err(|e| {
                    log::warn!(
                        target: LOG_TARGET,
                        "payout of {:?} to {:?} for {:?} failed: {:?}",
                        amount,
                        recipient,
                        handle,
                        e,
                    );
                    Error::<T>::TransferFailed
                })?;
            }

            log::debug!(
                target: LOG_TARGET,
                "unstake {:?} finalized: {} units to {:?}",
                handle,
                clear_value,
                recipient,
            );
            Self::deposit_event(Event::UnstakeFinalized {
                recipient: recipient.clone(),
                units: clear_value,
                amount,
            });
            Ok((recipient, amount))
        }

        /// Add `delta` to the balance of `to` and to the total supply.
        fn mint(to: &T::AccountId, delta: &Handle) -> DispatchResult {
            let custody = Self::custody_account();

            let balance = match ConfidentialBalances::<T>::get(to) {
                Some(current) => T::Engine::add(&current, delta)?,
                None => *delta,
            };
            T::Engine::allow(&balance, &custody)?;
            T::Engine::allow(&balance, to)?;
            ConfidentialBalances::<T>::insert(to, balance);

            let supply = match ConfidentialTotalSupply::<T>::get() {
                Some(current) => T::Engine::add(&current, delta)?,
                None => *delta,
            };
            T::Engine::allow(&supply, &custody)?;
            ConfidentialTotalSupply::<T>::put(supply);
            Ok(())
        }

        /// Decrease the balance of `from` and the total supply by `amount`.
        /// Returns the handle of the amount actually burnt (zero on insufficient
        /// balance).
        fn burn(from: &T::AccountId, amount: &Handle) -> Result<Handle, DispatchError> {
            let custody = Self::custody_account();
            let current = ConfidentialBalances::<T>::get(from).ok_or(Error::<T>::NoBalance)?;

            let (balance, burnt) = T::Engine::checked_decrease(&current, amount)?;
            T::Engine::allow(&balance, &custody)?;
            T::Engine::allow(&balance, from)?;
            T::Engine::allow(&burnt, &custody)?;
            T::Engine::allow(&burnt, from)?;
            ConfidentialBalances::<T>::insert(from, balance);

            if let Some(current) = ConfidentialTotalSupply::<T>::get() {
                let (supply, _) = T::Engine::checked_decrease(&current, &burnt)?;
                T::Engine::allow(&supply, &custody)?;
                ConfidentialTotalSupply::<T>::put(supply);
            }
            Ok(burnt)
        }

        /// Every pending withdrawal must be decryptable by the oracle.
        #[cfg(any(feature = "try-runtime", test))]
        pub fn do_try_state() -> Result<(), DispatchError> {
            for (handle, _) in PendingUnstakes::<T>::iter() {
                ensure!(
                    T::Engine::is_publicly_decryptable(&handle),
                    "pending unstake handle is not publicly decryptable"
                );
            }
            Ok(())
        }
    }

    // ------------ ConfidentialStaking (pallet-to-pallet) ------------

    impl<T: Config> ConfidentialStaking<T::AccountId, BalanceOf<T>> for Pallet<T> {
        fn stake(who: &T::AccountId, amount: BalanceOf<T>) -> Result<Handle, DispatchError> {
            with_storage_layer(|| Self::do_stake(who, amount))
        }

        fn request_unstake(
            who: &T::AccountId,
            encrypted_amount: Handle,
            input_proof: InputProof,
        ) -> Result<Handle, DispatchError> {
            with_storage_layer(|| {
                Self::do_request_unstake_external(who, &encrypted_amount, &input_proof)
            })
        }

        fn request_unstake_handle(who: &T::AccountId, amount: Handle) -> Result<Handle, DispatchError> {
            with_storage_layer(|| Self::do_request_unstake_handle(who, amount))
        }

        fn finalize_unstake(
            handle: Handle,
            clear_value: u64,
            proof: DecryptionProof,
        ) -> Result<(T::AccountId, BalanceOf<T>), DispatchError> {
            with_storage_layer(|| Self::do_finalize_unstake(handle, clear_value, &proof))
        }

        fn confidential_balance_of(who: &T::AccountId) -> Option<Handle> {
            ConfidentialBalances::<T>::get(who)
        }
    }
}
