//! Claim reward instruction handler.
//!
//! Pays accrued reward without touching staked or withdrawable principal.

use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::*;
use crate::error::VaultError;
use crate::state::{StakingPool, UserRecord};

#[derive(Accounts)]
pub struct ClaimReward<'info> {
    #[account(mut)]
    pub user: Signer<'info>,

    #[account(
        mut,
        seeds = [STAKING_POOL_SEED, staking_pool.treasury.as_ref(), &[staking_pool.tranche_id]],
        bump = staking_pool.bump,
        has_one = base_vault @ VaultError::VaultMismatch
    )]
    pub staking_pool: Account<'info, StakingPool>,

    #[account(
        mut,
        seeds = [USER_RECORD_SEED, staking_pool.key().as_ref(), user.key().as_ref()],
        bump = user_record.bump,
        constraint = user_record.owner == user.key() @ VaultError::NotRecordOwner
    )]
    pub user_record: Account<'info, UserRecord>,

    #[account(
        mut,
        constraint = user_token_account.mint == staking_pool.base_mint @ VaultError::MintMismatch,
        constraint = user_token_account.owner == user.key()
    )]
    pub user_token_account: Account<'info, TokenAccount>,

    #[account(mut)]
    pub base_vault: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

pub fn handler(ctx: Context<ClaimReward>) -> Result<()> {
    let clock = Clock::get()?;

    let reward = {
        let pool = &mut ctx.accounts.staking_pool;
        let record = &mut ctx.accounts.user_record;
        pool.record_claim(record, clock.unix_timestamp)?
    };
    require!(
        ctx.accounts.base_vault.amount >= reward,
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
        to: ctx.accounts.user_token_account.to_account_info(),
        authority: ctx.accounts.staking_pool.to_account_info(),
    };
    let cpi_program = ctx.accounts.token_program.to_account_info();
    token::transfer(
        CpiContext::new_with_signer(cpi_program, cpi_accounts, signer_seeds),
        reward,
    )?;

    msg!("Claimed {} reward tokens", reward);
    msg!(
        "Total rewards claimed by user: {}",
        ctx.accounts.user_record.total_rewards_claimed
    );

    Ok(())
}
