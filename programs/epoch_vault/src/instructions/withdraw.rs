//! Withdraw instruction handler.
//!
//! Pays out settled withdrawable balance, net of the pool fee, together with
//! all accrued reward.

use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::*;
use crate::error::VaultError;
use crate::events::Withdrawn;
use crate::state::{StakingPool, UserRecord};

#[derive(Accounts)]
pub struct Withdraw<'info> {
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
        constraint = user_record.owner == user.key() @ VaultError::NotRecordOwner,
        constraint = user_record.pool == staking_pool.key() @ VaultError::PoolMismatch
    )]
    pub user_record: Account<'info, UserRecord>,

    #[account(
        mut,
        constraint = user_token_account.mint == staking_pool.base_mint @ VaultError::MintMismatch,
        constraint = user_token_account.owner == user.key()
    )]
    pub user_token_account: Account<'info, TokenAccount>,

    /// Fee sink, a base-mint account owned by `fee_to`.
    #[account(
        mut,
        constraint = fee_token_account.mint == staking_pool.base_mint @ VaultError::MintMismatch,
        constraint = fee_token_account.owner == staking_pool.fee_to @ VaultError::FeeRecipientMismatch
    )]
    pub fee_token_account: Account<'info, TokenAccount>,

    #[account(mut)]
    pub base_vault: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

/// Withdraw settled balance.
///
/// # Arguments
/// * `amount` - Withdrawable balance to claim; zero claims reward only
pub fn handler(ctx: Context<Withdraw>, amount: u64) -> Result<()> {
    let clock = Clock::get()?;

    let payout = {
        let pool = &mut ctx.accounts.staking_pool;
        let record = &mut ctx.accounts.user_record;
        pool.record_withdraw(record, amount, clock.unix_timestamp)?
    };
    let to_user = payout.to_user()?;
    let total_out = to_user
        .checked_add(payout.fee)
        .ok_or(VaultError::MathOverflow)?;
    require!(
        ctx.accounts.base_vault.amount >= total_out,
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

    if to_user > 0 {
        let cpi_accounts = Transfer {
            from: ctx.accounts.base_vault.to_account_info(),
            to: ctx.accounts.user_token_account.to_account_info(),
            authority: ctx.accounts.staking_pool.to_account_info(),
        };
        let cpi_program = ctx.accounts.token_program.to_account_info();
        token::transfer(
            CpiContext::new_with_signer(cpi_program, cpi_accounts, signer_seeds),
            to_user,
        )?;
    }

    if payout.fee > 0 {
        let cpi_accounts = Transfer {
            from: ctx.accounts.base_vault.to_account_info(),
            to: ctx.accounts.fee_token_account.to_account_info(),
            authority: ctx.accounts.staking_pool.to_account_info(),
        };
        let cpi_program = ctx.accounts.token_program.to_account_info();
        token::transfer(
            CpiContext::new_with_signer(cpi_program, cpi_accounts, signer_seeds),
            payout.fee,
        )?;
    }

    msg!(
        "Withdrew {} (principal {}, fee {}, reward {})",
        amount,
        payout.principal,
        payout.fee,
        payout.reward
    );
    msg!("Remaining withdrawable: {}", ctx.accounts.user_record.balance_withdraw);

    emit!(Withdrawn {
        pool: ctx.accounts.staking_pool.key(),
        user: ctx.accounts.user.key(),
        principal: payout.principal,
        fee: payout.fee,
        reward: payout.reward,
    });

    Ok(())
}
