//! Admin instruction handlers.
//!
//! Owner-level pool configuration, governance capacity updates, and
//! governance hand-over.
//!
//! ## Security Guarantees
//! - Pool setters require signer == pool.owner
//! - `update_capacity` requires signer == treasury.governance
//! - `transfer_governance` requires signer == treasury.owner
//! - Parameter bounds checking

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::VaultError;
use crate::state::{StakingPool, Treasury};

/// Accounts required for pool owner operations.
#[derive(Accounts)]
pub struct PoolAdmin<'info> {
    /// The pool owner.
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [STAKING_POOL_SEED, staking_pool.treasury.as_ref(), &[staking_pool.tranche_id]],
        bump = staking_pool.bump,
        has_one = owner @ VaultError::NotOwner
    )]
    pub staking_pool: Account<'info, StakingPool>,
}

/// Accounts required for governance pool operations.
#[derive(Accounts)]
pub struct GovernancePool<'info> {
    pub governance: Signer<'info>,

    #[account(
        seeds = [TREASURY_SEED, treasury.base_mint.as_ref()],
        bump = treasury.bump,
        has_one = governance @ VaultError::NotGovernance
    )]
    pub treasury: Account<'info, Treasury>,

    #[account(
        mut,
        seeds = [STAKING_POOL_SEED, treasury.key().as_ref(), &[staking_pool.tranche_id]],
        bump = staking_pool.bump,
        has_one = treasury @ VaultError::TreasuryMismatch,
        constraint = treasury.administers(&staking_pool.key()) @ VaultError::TreasuryMismatch
    )]
    pub staking_pool: Account<'info, StakingPool>,
}

/// Accounts required for treasury owner operations.
#[derive(Accounts)]
pub struct TreasuryAdmin<'info> {
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [TREASURY_SEED, treasury.base_mint.as_ref()],
        bump = treasury.bump,
        has_one = owner @ VaultError::NotOwner
    )]
    pub treasury: Account<'info, Treasury>,
}

/// Set the lockup, in epochs, between stake settlement and a withdraw request.
pub fn set_lock_up_handler(ctx: Context<PoolAdmin>, lock_up: u64) -> Result<()> {
    let pool = &mut ctx.accounts.staking_pool;
    let old = pool.lock_up;
    pool.lock_up = lock_up;
    pool.last_updated = Clock::get()?.unix_timestamp;

    msg!("Lockup updated: {} -> {} epochs", old, lock_up);
    Ok(())
}

/// Set the pool capacity (owner).
pub fn set_capacity_handler(ctx: Context<PoolAdmin>, capacity: u64) -> Result<()> {
    let pool = &mut ctx.accounts.staking_pool;
    let old = pool.capacity;
    pool.capacity = capacity;
    pool.last_updated = Clock::get()?.unix_timestamp;

    msg!("Capacity updated: {} -> {}", old, capacity);
    Ok(())
}

/// Set the pool capacity (governance).
///
/// A capacity below the current committed supply only blocks new stakes.
pub fn update_capacity_handler(ctx: Context<GovernancePool>, capacity: u64) -> Result<()> {
    let pool = &mut ctx.accounts.staking_pool;
    let old = pool.capacity;
    pool.capacity = capacity;
    pool.last_updated = Clock::get()?.unix_timestamp;

    msg!("Capacity updated by governance: {} -> {}", old, capacity);
    msg!(
        "Committed supply: {}",
        pool.total_supply_wait.saturating_add(pool.total_supply_staked)
    );
    Ok(())
}

/// Pause or resume new requests. Settlement, withdraw and claim stay open.
pub fn set_paused_handler(ctx: Context<PoolAdmin>, paused: bool) -> Result<()> {
    let pool = &mut ctx.accounts.staking_pool;
    let previous_state = pool.paused;
    pool.paused = paused;
    pool.last_updated = Clock::get()?.unix_timestamp;

    msg!(
        "Pool {} (was {})",
        if paused { "PAUSED" } else { "RESUMED" },
        if previous_state { "paused" } else { "active" }
    );
    Ok(())
}

/// Adjust the three haircuts. Queued requests keep their already-applied cuts.
pub fn set_fees_handler(
    ctx: Context<PoolAdmin>,
    fee: u16,
    glp_in_fee: u16,
    glp_out_fee: u16,
) -> Result<()> {
    let pool = &mut ctx.accounts.staking_pool;

    msg!(
        "Adjusting fees - Old: fee={}bp, in={}bp, out={}bp",
        pool.fee,
        pool.glp_in_fee,
        pool.glp_out_fee
    );

    pool.set_fees(fee, glp_in_fee, glp_out_fee)?;
    pool.last_updated = Clock::get()?.unix_timestamp;

    msg!(
        "New fees - fee={}bp, in={}bp, out={}bp",
        fee,
        glp_in_fee,
        glp_out_fee
    );
    Ok(())
}

pub fn set_request_limits_handler(
    ctx: Context<PoolAdmin>,
    gas_threshold: u64,
    minimum_request: u64,
) -> Result<()> {
    let pool = &mut ctx.accounts.staking_pool;
    pool.gas_threshold = gas_threshold;
    pool.minimum_request = minimum_request;
    pool.last_updated = Clock::get()?.unix_timestamp;

    msg!(
        "Request limits - gas threshold: {} lamports, minimum request: {}",
        gas_threshold,
        minimum_request
    );
    Ok(())
}

pub fn set_fee_to_handler(ctx: Context<PoolAdmin>, fee_to: Pubkey) -> Result<()> {
    require!(
        fee_to != Pubkey::default(),
        VaultError::FeeRecipientMismatch
    );

    let pool = &mut ctx.accounts.staking_pool;
    let old = pool.fee_to;
    pool.fee_to = fee_to;
    pool.last_updated = Clock::get()?.unix_timestamp;

    msg!("Fee recipient: {} -> {}", old, fee_to);
    Ok(())
}

/// Hand governance to a new key.
pub fn transfer_governance_handler(
    ctx: Context<TreasuryAdmin>,
    new_governance: Pubkey,
) -> Result<()> {
    require!(
        new_governance != Pubkey::default(),
        VaultError::InvalidAuthority
    );

    let treasury = &mut ctx.accounts.treasury;
    let old = treasury.governance;
    treasury.governance = new_governance;

    msg!("Governance transferred: {} -> {}", old, new_governance);
    Ok(())
}
