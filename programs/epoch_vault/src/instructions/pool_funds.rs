//! Pool fund movement instruction handlers.
//!
//! ## Security Guarantees
//! - Governance only
//! - Amount bounded by the source vault balance

use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::*;
use crate::error::VaultError;
use crate::state::{StakingPool, Treasury};

/// Accounts for moving treasury funds into a pool.
#[derive(Accounts)]
pub struct SendPoolFunds<'info> {
    pub governance: Signer<'info>,

    #[account(
        seeds = [TREASURY_SEED, treasury.base_mint.as_ref()],
        bump = treasury.bump,
        has_one = governance @ VaultError::NotGovernance,
        has_one = treasury_vault @ VaultError::VaultMismatch
    )]
    pub treasury: Account<'info, Treasury>,

    #[account(
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

/// Accounts for paying pool funds out to an arbitrary recipient.
#[derive(Accounts)]
pub struct WithdrawPoolFunds<'info> {
    pub governance: Signer<'info>,

    #[account(
        seeds = [TREASURY_SEED, treasury.base_mint.as_ref()],
        bump = treasury.bump,
        has_one = governance @ VaultError::NotGovernance
    )]
    pub treasury: Account<'info, Treasury>,

    #[account(
        seeds = [STAKING_POOL_SEED, treasury.key().as_ref(), &[staking_pool.tranche_id]],
        bump = staking_pool.bump,
        has_one = treasury @ VaultError::TreasuryMismatch,
        constraint = treasury.administers(&staking_pool.key()) @ VaultError::TreasuryMismatch,
        has_one = base_vault @ VaultError::VaultMismatch
    )]
    pub staking_pool: Account<'info, StakingPool>,

    #[account(mut)]
    pub base_vault: Account<'info, TokenAccount>,

    #[account(
        mut,
        constraint = recipient.mint == staking_pool.base_mint @ VaultError::MintMismatch
    )]
    pub recipient: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

/// Move `amount` base tokens from the treasury vault into the pool vault.
pub fn send_handler(ctx: Context<SendPoolFunds>, amount: u64) -> Result<()> {
    require!(amount > 0, VaultError::ZeroAmount);
    require!(
        ctx.accounts.treasury_vault.amount >= amount,
        VaultError::InsufficientFunds
    );

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

    msg!(
        "Sent {} from treasury to pool {}",
        amount,
        ctx.accounts.staking_pool.key()
    );

    Ok(())
}

/// Move `amount` base tokens from the pool vault to `recipient`.
pub fn withdraw_handler(ctx: Context<WithdrawPoolFunds>, amount: u64) -> Result<()> {
    require!(amount > 0, VaultError::ZeroAmount);
    require!(
        ctx.accounts.base_vault.amount >= amount,
        VaultError::InsufficientFunds
    );

    let pool = &ctx.accounts.staking_pool;
    let treasury_key = pool.treasury;
    let seeds = &[
        STAKING_POOL_SEED,
        treasury_key.as_ref(),
        &[pool.tranche_id],
        &[pool.bump],
    ];
    let signer_seeds = &[&seeds[..]];

    let cpi_accounts = Transfer {
        from: ctx.accounts.base_vault.to_account_info(),
        to: ctx.accounts.recipient.to_account_info(),
        authority: ctx.accounts.staking_pool.to_account_info(),
    };
    let cpi_program = ctx.accounts.token_program.to_account_info();
    token::transfer(
        CpiContext::new_with_signer(cpi_program, cpi_accounts, signer_seeds),
        amount,
    )?;

    msg!(
        "Withdrew {} from pool {} to {}",
        amount,
        ctx.accounts.staking_pool.key(),
        ctx.accounts.recipient.key()
    );

    Ok(())
}
