//! Withdraw request instruction handler.
//!
//! Moves staked principal into the withdraw queue. Tokens stay in the pool
//! until governance converts and settles the request.

use anchor_lang::prelude::*;
use anchor_lang::system_program;

use crate::constants::*;
use crate::error::VaultError;
use crate::events::WithdrawRequested;
use crate::state::{StakingPool, Treasury, UserRecord};

#[derive(Accounts)]
pub struct WithdrawRequest<'info> {
    #[account(mut)]
    pub user: Signer<'info>,

    pub treasury: Account<'info, Treasury>,

    #[account(
        mut,
        seeds = [STAKING_POOL_SEED, treasury.key().as_ref(), &[staking_pool.tranche_id]],
        bump = staking_pool.bump,
        has_one = treasury @ VaultError::TreasuryMismatch
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
        address = staking_pool.fee_to @ VaultError::FeeRecipientMismatch
    )]
    pub fee_to: SystemAccount<'info>,

    pub system_program: Program<'info, System>,
}

/// Request withdrawal of staked principal.
///
/// # Arguments
/// * `amount` - Staked principal to move into the withdraw queue
/// * `fee_payment` - Lamports forwarded to `fee_to`, at least `gas_threshold`
pub fn handler(ctx: Context<WithdrawRequest>, amount: u64, fee_payment: u64) -> Result<()> {
    let clock = Clock::get()?;
    let epoch = ctx.accounts.treasury.epoch;

    ctx.accounts.staking_pool.check_fee_payment(fee_payment)?;

    {
        let pool = &mut ctx.accounts.staking_pool;
        let record = &mut ctx.accounts.user_record;
        pool.record_withdraw_request(record, amount, epoch, clock.unix_timestamp)?;
    }

    if fee_payment > 0 {
        let fee_accounts = system_program::Transfer {
            from: ctx.accounts.user.to_account_info(),
            to: ctx.accounts.fee_to.to_account_info(),
        };
        system_program::transfer(
            CpiContext::new(ctx.accounts.system_program.to_account_info(), fee_accounts),
            fee_payment,
        )?;
    }

    let record = &ctx.accounts.user_record;
    msg!("Withdraw request of {} queued at epoch {}", amount, epoch);
    msg!("Remaining staked: {}", record.balance_staked);

    emit!(WithdrawRequested {
        pool: ctx.accounts.staking_pool.key(),
        user: ctx.accounts.user.key(),
        amount,
        epoch,
        timestamp: clock.unix_timestamp,
    });

    Ok(())
}
