use crate::pallet as pallet_confidential_staking;
use confidential_staking_primitives::TokenMetadata;
use frame_support::{
    PalletId, construct_runtime, derive_impl, parameter_types,
    traits::ConstU8,
};
use sp_core::{ed25519, Pair};
use sp_runtime::BuildStorage;

pub type AccountId = u64;
pub type Balance = u128;
pub const ALICE: AccountId = 1;
pub const BOB: AccountId = 2;
pub const CHARLIE: AccountId = 3;

/// Base units per staking unit.
pub const UNIT: Balance = 1_000_000_000_000;
pub const INITIAL_BALANCE: Balance = 10_000_000_000_000_000_000;

#[derive_impl(frame_system::config_preludes::TestDefaultConfig)]
impl frame_system::Config for Runtime {
    type Block = frame_system::mocking::MockBlock<Runtime>;
    type AccountData = pallet_balances::AccountData<Balance>;
}

parameter_types! {
    pub static ExistentialDeposit: Balance = 1;
}

impl pallet_balances::Config for Runtime {
    type MaxReserves = ();
    type ReserveIdentifier = [u8; 8];
    type MaxLocks = ();
    type Balance = Balance;
    type RuntimeEvent = RuntimeEvent;
    type DustRemoval = ();
    type ExistentialDeposit = ExistentialDeposit;
    type AccountStore = System;
    type WeightInfo = ();
    type RuntimeHoldReason = ();
    type FreezeIdentifier = ();
    type MaxFreezes = ();
    type RuntimeFreezeReason = ();
    type DoneSlashHandler = ();
}

impl pallet_fhe_engine::Config for Runtime {
    type RuntimeEvent = RuntimeEvent;
    type WeightInfo = ();
}

pub struct StakedTokenMetadata;
impl TokenMetadata for StakedTokenMetadata {
    fn name() -> Vec<u8> {
        b"Confidential Staked Token".to_vec()
    }
    fn symbol() -> Vec<u8> {
        b"cSTK".to_vec()
    }
    fn contract_uri() -> Vec<u8> {
        b"ipfs://confidential-staking".to_vec()
    }
}

parameter_types! {
    pub const StakingPalletId: PalletId = PalletId(*b"CfStake_");
    pub const StakeUnitScale: Balance = UNIT;
}

impl pallet_confidential_staking::Config for Runtime {
    type RuntimeEvent = RuntimeEvent;
    type Currency = Balances;
    type Engine = FheEngine;
    type Verifier = FheEngine;
    type Metadata = StakedTokenMetadata;
    type PalletId = StakingPalletId;
    type StakeUnitScale = StakeUnitScale;
    type Decimals = ConstU8<6>;
    type WeightInfo = ();
}

construct_runtime!(
    pub enum Runtime {
        System: frame_system,
        Balances: pallet_balances,
        FheEngine: pallet_fhe_engine,
        ConfidentialStaking: pallet_confidential_staking,
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
    pallet_balances::GenesisConfig::<Runtime> {
        balances: vec![
            (ALICE, INITIAL_BALANCE),
            (BOB, INITIAL_BALANCE),
            (CHARLIE, INITIAL_BALANCE),
        ],
        ..Default::default()
    }
    .assimilate_storage(&mut t)
    .unwrap();
    pallet_fhe_engine::GenesisConfig::<Runtime> {
        oracle_key: Some(pallet_fhe_engine::client::oracle_key(&oracle())),
        ..Default::default()
    }
    .assimilate_storage(&mut t)
    .unwrap();
    let mut ext = sp_io::TestExternalities::new(t);
    ext.execute_with(|| System::set_block_number(1));
    ext
}
