//! Weights for `pallet-confidential-staking`.
//!
//! Engine calls are counted as storage accesses of the cleartext engine.

#![allow(unused_parens)]
#![allow(unused_imports)]

use core::marker::PhantomData;
use frame_support::{
    traits::Get,
    weights::{constants::RocksDbWeight, Weight},
};

pub trait WeightInfo {
    fn stake() -> Weight;
    fn request_unstake() -> Weight;
    fn request_unstake_handle() -> Weight;
    fn finalize_unstake() -> Weight;
}

pub struct SubstrateWeight<T>(PhantomData<T>);
impl<T: frame_system::Config> WeightInfo for SubstrateWeight<T> {
    /// Storage: `System::Account` (r:2 w:2), `ConfidentialStaking::ConfidentialBalances` (r:1 w:1),
    /// `ConfidentialStaking::ConfidentialTotalSupply` (r:1 w:1), engine (r:6 w:8)
    fn stake() -> Weight {
        Weight::from_parts(68_000_000, 6_196)
            .saturating_add(T::DbWeight::get().reads(10_u64))
            .saturating_add(T::DbWeight::get().writes(12_u64))
    }
    /// Storage: engine input import (r:2 w:3) plus `request_unstake_handle`
    fn request_unstake() -> Weight {
        Weight::from_parts(84_000_000, 6_196)
            .saturating_add(T::DbWeight::get().reads(14_u64))
            .saturating_add(T::DbWeight::get().writes(17_u64))
    }
    /// Storage: `ConfidentialStaking::ConfidentialBalances` (r:1 w:1),
    /// `ConfidentialStaking::ConfidentialTotalSupply` (r:1 w:1),
    /// `ConfidentialStaking::PendingUnstakes` (r:1 w:1), engine (r:9 w:11)
    fn request_unstake_handle() -> Weight {
        Weight::from_parts(71_000_000, 3_593)
            .saturating_add(T::DbWeight::get().reads(12_u64))
            .saturating_add(T::DbWeight::get().writes(14_u64))
    }
    /// Storage: `ConfidentialStaking::PendingUnstakes` (r:1 w:1), `FheEngine::OracleKey` (r:1),
    /// `FheEngine::PubliclyDecryptable` (r:1), `System::Account` (r:2 w:2)
    fn finalize_unstake() -> Weight {
        Weight::from_parts(95_000_000, 6_196)
            .saturating_add(T::DbWeight::get().reads(5_u64))
            .saturating_add(T::DbWeight::get().writes(3_u64))
    }
}

impl WeightInfo for () {
    fn stake() -> Weight {
        Weight::from_parts(68_000_000, 6_196)
            .saturating_add(RocksDbWeight::get().reads(10_u64))
            .saturating_add(RocksDbWeight::get().writes(12_u64))
    }
    fn request_unstake() -> Weight {
        Weight::from_parts(84_000_000, 6_196)
            .saturating_add(RocksDbWeight::get().reads(14_u64))
            .saturating_add(RocksDbWeight::get().writes(17_u64))
    }
    fn request_unstake_handle() -> Weight {
        Weight::from_parts(71_000_000, 3_593)
            .saturating_add(RocksDbWeight::get().reads(12_u64))
            .saturating_add(RocksDbWeight::get().writes(14_u64))
    }
    fn finalize_unstake() -> Weight {
        Weight::from_parts(95_000_000, 6_196)
            .saturating_add(RocksDbWeight::get().reads(5_u64))
            .saturating_add(RocksDbWeight::get().writes(3_u64))
    }
}
