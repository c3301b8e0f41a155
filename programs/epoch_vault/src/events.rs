//! Events emitted for off-chain indexers.

use anchor_lang::prelude::*;

#[event]
pub struct StakeRequested {
    pub pool: Pubkey,
    pub user: Pubkey,
    pub amount: u64,
    pub credited: u64,
    pub epoch: u64,
    pub timestamp: i64,
}

#[event]
pub struct WithdrawRequested {
    pub pool: Pubkey,
    pub user: Pubkey,
    pub amount: u64,
    pub epoch: u64,
    pub timestamp: i64,
}

#[event]
pub struct RequestsSettled {
    pub pool: Pubkey,
    pub epoch: u64,
    pub is_stake: bool,
    pub settled: u32,
    pub skipped: u32,
}

#[event]
pub struct Withdrawn {
    pub pool: Pubkey,
    pub user: Pubkey,
    pub principal: u64,
    pub fee: u64,
    pub reward: u64,
}

#[event]
pub struct EpochAdvanced {
    pub treasury: Pubkey,
    pub epoch: u64,
    pub timestamp: i64,
}

#[event]
pub struct Converted {
    pub pool: Pubkey,
    pub is_buy: bool,
    pub amount_in: u64,
    pub amount_out: u64,
    pub recipient: Pubkey,
}

#[event]
pub struct RewardAllocated {
    pub pool: Pubkey,
    pub amount: u64,
    pub acc_reward_per_share: u128,
}
