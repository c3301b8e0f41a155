//! Initialize pool instruction handler.
//!
//! Creates one risk tranche under a treasury, with its base and yield vaults.
//!
//! ## Security Guarantees
//! - Only the treasury owner can add tranches
//! - Both vaults are PDAs whose authority is the pool PDA
//! - Base mint is locked to the treasury's mint

use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::constants::*;
use crate::error::VaultError;
use crate::state::{PoolConfig, StakingPool, Treasury};

#[derive(Accounts)]
#[instruction(tranche_id: u8)]
pub struct InitializePool<'info> {
    #[account(mut)]
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [TREASURY_SEED, treasury.base_mint.as_ref()],
        bump = treasury.bump,
        has_one = owner @ VaultError::NotOwner,
        has_one = base_mint @ VaultError::MintMismatch
    )]
    pub treasury: Account<'info, Treasury>,

    #[account(
        init,
        payer = owner,
        space = StakingPool::LEN,
        seeds = [STAKING_POOL_SEED, treasury.key().as_ref(), &[tranche_id]],
        bump
    )]
    pub staking_pool: Account<'info, StakingPool>,

    pub base_mint: Account<'info, Mint>,

    /// Mint of the external yield asset.
    pub yield_mint: Account<'info, Mint>,

    #[account(
        init,
        payer = owner,
        seeds = [POOL_VAULT_SEED, staking_pool.key().as_ref()],
        bump,
        token::mint = base_mint,
        token::authority = staking_pool
    )]
    pub base_vault: Account<'info, TokenAccount>,

    #[account(
        init,
        payer = owner,
        seeds = [YIELD_VAULT_SEED, staking_pool.key().as_ref()],
        bump,
        token::mint = yield_mint,
        token::authority = staking_pool
    )]
    pub yield_vault: Account<'info, TokenAccount>,

    pub system_program: Program<'info, System>,
    pub token_program: Program<'info, Token>,
    pub rent: Sysvar<'info, Rent>,
}

/// Initialize a staking pool.
///
/// # Arguments
/// * `tranche_id` - Tranche index, part of the pool PDA seeds
/// * `config` - Fees, limits and haircut timing for this tranche
pub fn handler(ctx: Context<InitializePool>, tranche_id: u8, config: PoolConfig) -> Result<()> {
    require!(
        ctx.accounts.yield_mint.key() != ctx.accounts.base_mint.key(),
        VaultError::MintMismatch
    );

    let pool_key = ctx.accounts.staking_pool.key();
    ctx.accounts.treasury.register_pool(pool_key)?;

    let pool = &mut ctx.accounts.staking_pool;
    let clock = Clock::get()?;

    pool.apply_config(&config)?;
    pool.treasury = ctx.accounts.treasury.key();
    pool.owner = ctx.accounts.owner.key();
    pool.base_mint = ctx.accounts.base_mint.key();
    pool.yield_mint = ctx.accounts.yield_mint.key();
    pool.base_vault = ctx.accounts.base_vault.key();
    pool.yield_vault = ctx.accounts.yield_vault.key();
    pool.tranche_id = tranche_id;
    pool.paused = false;
    pool.created_at = clock.unix_timestamp;
    pool.last_updated = clock.unix_timestamp;
    pool.bump = ctx.bumps.staking_pool;
    pool.base_vault_bump = ctx.bumps.base_vault;
    pool.yield_vault_bump = ctx.bumps.yield_vault;

    msg!("Staking pool {} initialized (tranche {})", pool_key, tranche_id);
    msg!(
        "Fees - fee: {}bp, in: {}bp, out: {}bp, haircut timing: {:?}",
        config.fee,
        config.glp_in_fee,
        config.glp_out_fee,
        config.stake_haircut
    );
    msg!(
        "Capacity: {}, minimum request: {}, lockup: {} epochs",
        config.capacity,
        config.minimum_request,
        config.lock_up
    );

    Ok(())
}
