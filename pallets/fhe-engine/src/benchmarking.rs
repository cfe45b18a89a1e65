//! Benchmarking setup for pallet-fhe-engine

use super::*;
use frame_benchmarking::v2::*;
use frame_system::RawOrigin;

/// Issue a handle and put `who` in its ACL.
fn setup_allowed_handle<T: Config>(who: &T::AccountId) -> Handle {
    let handle = Pallet::<T>::new_handle(1_000).expect("nonce space available");
    Allowed::<T>::insert(handle, who, ());
    handle
}

#[benchmarks]
mod benchmarks {
    use super::*;

    #[benchmark]
    fn set_oracle_key() {
        #[extrinsic_call]
        set_oracle_key(RawOrigin::Root, [7u8; 32]);

        assert_eq!(OracleKey::<T>::get(), Some([7u8; 32]));
    }

    #[benchmark]
    fn allow() {
        let caller: T::AccountId = whitelisted_caller();
        let delegate: T::AccountId = account("delegate", 0, 0);
        let handle = setup_allowed_handle::<T>(&caller);

        #[extrinsic_call]
        allow(RawOrigin::Signed(caller), handle, delegate.clone());

        assert!(Allowed::<T>::contains_key(handle, &delegate));
    }

    #[benchmark]
    fn make_publicly_decryptable() {
        let caller: T::AccountId = whitelisted_caller();
        let handle = setup_allowed_handle::<T>(&caller);

        #[extrinsic_call]
        make_publicly_decryptable(RawOrigin::Signed(caller), handle);

        assert!(PubliclyDecryptable::<T>::contains_key(handle));
    }

    impl_benchmark_test_suite!(Pallet, crate::mock::new_test_ext(), crate::mock::Runtime);
}
