//! Stake instruction handler.
//!
//! Queues base tokens for the next settlement. Nothing is staked until
//! governance settles the request in a later epoch.

use anchor_lang::prelude::*;
use anchor_lang::system_program;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::*;
use crate::error::VaultError;
use crate::events::StakeRequested;
use crate::state::{StakingPool, Treasury, UserRecord};

/// Accounts required for staking.
#[derive(Accounts)]
pub struct Stake<'info> {
    /// The user staking tokens.
    #[account(mut)]
    pub user: Signer<'info>,

    /// Source of the current epoch.
    pub treasury: Account<'info, Treasury>,

    #[account(
        mut,
        seeds = [STAKING_POOL_SEED, treasury.key().as_ref(), &[staking_pool.tranche_id]],
        bump = staking_pool.bump,
        has_one = treasury @ VaultError::TreasuryMismatch,
        has_one = base_vault @ VaultError::VaultMismatch
    )]
    pub staking_pool: Account<'info, StakingPool>,

    /// User's record (created on first stake).
    #[account(
        init_if_needed,
        payer = user,
        space = UserRecord::LEN,
        seeds = [USER_RECORD_SEED, staking_pool.key().as_ref(), user.key().as_ref()],
        bump
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

    /// Receives the operational fee in lamports.
    #[account(
        mut,
        address = staking_pool.fee_to @ VaultError::FeeRecipientMismatch
    )]
    pub fee_to: SystemAccount<'info>,

    pub system_program: Program<'info, System>,
    pub token_program: Program<'info, Token>,
    pub rent: Sysvar<'info, Rent>,
}

/// Stake tokens into the pool's wait queue.
///
/// # Arguments
/// * `amount` - Gross amount of base tokens to stake
/// * `fee_payment` - Lamports forwarded to `fee_to`, at least `gas_threshold`
pub fn handler(ctx: Context<Stake>, amount: u64, fee_payment: u64) -> Result<()> {
    let clock = Clock::get()?;
    let epoch = ctx.accounts.treasury.epoch;
    let pool_key = ctx.accounts.staking_pool.key();
    let user_key = ctx.accounts.user.key();

    ctx.accounts.staking_pool.check_fee_payment(fee_payment)?;

    let credited = {
        let pool = &mut ctx.accounts.staking_pool;
        let record = &mut ctx.accounts.user_record;

        // First stake: bind the freshly created record
        if record.owner == Pubkey::default() {
            record.owner = user_key;
            record.pool = pool_key;
            record.bump = ctx.bumps.user_record;
        }

        pool.record_stake(record, amount, epoch, clock.unix_timestamp)?
    };

    // Transfer tokens from user to the pool vault
    let cpi_accounts = Transfer {
        from: ctx.accounts.user_token_account.to_account_info(),
        to: ctx.accounts.base_vault.to_account_info(),
        authority: ctx.accounts.user.to_account_info(),
    };
    let cpi_program = ctx.accounts.token_program.to_account_info();
    token::transfer(CpiContext::new(cpi_program, cpi_accounts), amount)?;

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
    msg!("Stake of {} queued, {} credited at epoch {}", amount, credited, epoch);
    msg!("Balance wait: {}", record.balance_wait);

    emit!(StakeRequested {
        pool: pool_key,
        user: user_key,
        amount,
        credited,
        epoch,
        timestamp: clock.unix_timestamp,
    });

    Ok(())
}
