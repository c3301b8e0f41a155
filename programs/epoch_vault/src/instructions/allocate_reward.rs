//! Allocate reward instruction handler.
//!
//! Moves reward from the treasury vault into a pool and credits it pro rata to
//! the pool's staked supply.

use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::*;
use crate::error::VaultError;
use crate::events::RewardAllocated;
use crate::state::{StakingPool, Treasury};

#[derive(Accounts)]
pub struct AllocateReward<'info> {
    pub governance: Signer<'info>,

    #[account(
        mut,
        seeds = [TREASURY_SEED, treasury.base_mint.as_ref()],
        bump = treasury.bump,
        has_one = governance @ VaultError::NotGovernance,
        has_one = treasury_vault @ VaultError::VaultMismatch
    )]
    pub treasury: Account<'info, Treasury>,

    #[account(
        mut,
        seeds = [STAKING_POOL_SEED, treasury.key().as_ref(), &[staking_pool.tranche_id]],
        bump = staking_pool.bump,
        has_one = treasury @ VaultError::TreasuryMismatch,
        constraint = treasury.administers(&staking_pool.key()) @ VaultError::TreasuryMismatch,
        has_one = base_vault @ VaultError::VaultMismatch
    )]
    pub staking_pool: Account<'info, StakingPool>,

    #[account(mut)]
    pub treasury_vault: Account<'info, TokenAccount>,

    #[account(mut)]
    pub base_vault: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

pub fn handler(ctx: Context<AllocateReward>, amount: u64) -> Result<()> {
    require!(
        ctx.accounts.treasury_vault.amount >= amount,
        VaultError::InsufficientFunds
    );

    ctx.accounts.staking_pool.credit_reward(amount)?;
    ctx.accounts.treasury.record_reward(amount)?;

    let treasury = &ctx.accounts.treasury;
    let base_mint = treasury.base_mint;
    let seeds = &[TREASURY_SEED, base_mint.as_ref(), &[treasury.bump]];
    let signer_seeds = &[&seeds[..]];

    let cpi_accounts = Transfer {
        from: ctx.accounts.treasury_vault.to_account_info(),
        to: ctx.accounts.base_vault.to_account_info(),
        authority: ctx.accounts.treasury.to_account_info(),
    };
    let cpi_program = ctx.accounts.token_program.to_account_info();
    token::transfer(
        CpiContext::new_with_signer(cpi_program, cpi_accounts, signer_seeds),
        amount,
    )?;

    let pool = &ctx.accounts.staking_pool;
    msg!("Allocated {} reward to pool {}", amount, pool.key());
    msg!("Reward reserve: {}", pool.reward_reserve);

    emit!(RewardAllocated {
        pool: pool.key(),
        amount,
        acc_reward_per_share: pool.acc_reward_per_share,
    });

    Ok(())
}
