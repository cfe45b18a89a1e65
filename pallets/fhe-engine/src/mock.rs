use crate::pallet as pallet_fhe_engine;
use frame_support::{construct_runtime, derive_impl};
use sp_core::{ed25519, Pair};
use sp_runtime::BuildStorage;

pub type AccountId = u64;
pub const ALICE: AccountId = 1;
pub const BOB: AccountId = 2;
/// Stands in for the contract (pallet account) an input is bound to.
pub const CONTRACT: AccountId = 99;

#[derive_impl(frame_system::config_preludes::TestDefaultConfig)]
impl frame_system::Config for Runtime {
    type Block = frame_system::mocking::MockBlock<Runtime>;
}

impl pallet_fhe_engine::Config for Runtime {
    type RuntimeEvent = RuntimeEvent;
    type WeightInfo = ();
}

construct_runtime!(
    pub enum Runtime {
        System: frame_system,
        FheEngine: pallet_fhe_engine,
    }
);

/// Deterministic decryption oracle key pair.
pub fn oracle() -> ed25519::Pair {
    ed25519::Pair::from_seed(&[42u8; 32])
}

// Build a fresh externalities for each test.
pub fn new_test_ext() -> sp_io::TestExternalities {
    let mut t = frame_system::GenesisConfig::<Runtime>::default()
        .build_storage()
        .unwrap();
    pallet_fhe_engine::GenesisConfig::<Runtime> {
        oracle_key: Some(crate::client::oracle_key(&oracle())),
        ..Default::default()
    }
    .assimilate_storage(&mut t)
    .unwrap();
    let mut ext = sp_io::TestExternalities::new(t);
    ext.execute_with(|| System::set_block_number(1));
    ext
}
