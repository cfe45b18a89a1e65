//! Weights for `pallet-fhe-engine`.

#![allow(unused_parens)]
#![allow(unused_imports)]

use core::marker::PhantomData;
use frame_support::{
    traits::Get,
    weights::{constants::RocksDbWeight, Weight},
};

pub trait WeightInfo {
    fn set_oracle_key() -> Weight;
    fn allow() -> Weight;
    fn make_publicly_decryptable() -> Weight;
}

pub struct SubstrateWeight<T>(PhantomData<T>);
impl<T: frame_system::Config> WeightInfo for SubstrateWeight<T> {
    /// Storage: `FheEngine::OracleKey` (w:1)
    fn set_oracle_key() -> Weight {
        Weight::from_parts(7_000_000, 0).saturating_add(T::DbWeight::get().writes(1_u64))
    }
    /// Storage: `FheEngine::Allowed` (r:2 w:1), `FheEngine::Cleartexts` (r:1)
    fn allow() -> Weight {
        Weight::from_parts(16_000_000, 3_593)
            .saturating_add(T::DbWeight::get().reads(3_u64))
            .saturating_add(T::DbWeight::get().writes(1_u64))
    }
    /// Storage: `FheEngine::Allowed` (r:1), `FheEngine::Cleartexts` (r:1),
    /// `FheEngine::PubliclyDecryptable` (r:1 w:1)
    fn make_publicly_decryptable() -> Weight {
        Weight::from_parts(15_000_000, 3_593)
            .saturating_add(T::DbWeight::get().reads(3_u64))
            .saturating_add(T::DbWeight::get().writes(1_u64))
    }
}

impl WeightInfo for () {
    fn set_oracle_key() -> Weight {
        Weight::from_parts(7_000_000, 0).saturating_add(RocksDbWeight::get().writes(1_u64))
    }
    fn allow() -> Weight {
        Weight::from_parts(16_000_000, 3_593)
            .saturating_add(RocksDbWeight::get().reads(3_u64))
            .saturating_add(RocksDbWeight::get().writes(1_u64))
    }
    fn make_publicly_decryptable() -> Weight {
        Weight::from_parts(15_000_000, 3_593)
            .saturating_add(RocksDbWeight::get().reads(3_u64))
            .saturating_add(RocksDbWeight::get().writes(1_u64))
    }
}
