//! Benchmarking for `pallet-confidential-staking`.

use super::*;
use frame_benchmarking::v2::*;
use frame_support::traits::fungible::Mutate;
use frame_system::RawOrigin;

/// Give `who` enough currency to stake `units` and stay alive.
fn fund<T: Config>(who: &T::AccountId, units: u32) -> BalanceOf<T> {
    let amount = T::StakeUnitScale::get() * BalanceOf::<T>::from(units);
    let _ = T::Currency::set_balance(who, amount + amount + T::Currency::minimum_balance());
    amount
}

#[benchmarks]
mod benchmarks {
    use super::*;

    #[benchmark]
    fn stake() {
        let caller: T::AccountId = whitelisted_caller();
        let amount = fund::<T>(&caller, 1_000);
        // Existing balance so the add path is measured.
        Pallet::<T>::do_stake(&caller, amount).expect("first stake succeeds");

        #[extrinsic_call]
        stake(RawOrigin::Signed(caller.clone()), amount);

        assert!(ConfidentialBalances::<T>::contains_key(&caller));
    }

    #[benchmark]
    fn request_unstake_handle() {
        let caller: T::AccountId = whitelisted_caller();
        let amount = fund::<T>(&caller, 1_000);
        let minted = Pallet::<T>::do_stake(&caller, amount).expect("stake succeeds");

        #[extrinsic_call]
        request_unstake_handle(RawOrigin::Signed(caller), minted);

        assert_eq!(PendingUnstakes::<T>::iter().count(), 1);
    }

    // NOTE: request_unstake and finalize_unstake benchmarks are omitted because
    // they need an input proof and a decryption proof produced off-chain by the
    // engine client and the oracle. Their weights are the handle variant plus
    // the engine's input import, and a signature check plus one transfer.

    impl_benchmark_test_suite!(Pallet, crate::mock::new_test_ext(), crate::mock::Runtime);
}
