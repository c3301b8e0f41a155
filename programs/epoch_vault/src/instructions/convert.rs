//! Conversion instruction handlers (`buy_yield` / `sell_yield`).
//!
//! Governance converts pooled principal into the yield asset and back through
//! the configured venue program. The pool PDA signs for its vault.
//!
//! ## Security Guarantees
//! - Venue program id must match the one stored on the treasury
//! - Output is re-measured on the recipient after the call; less than
//!   `min_out` fails the whole instruction
//! - Ledger bookkeeping is written only after the venue call has returned

use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::constants::*;
use crate::error::VaultError;
use crate::events::Converted;
use crate::state::{StakingPool, Treasury};
use crate::venue::{self, Direction, VenueAccounts};

#[derive(Accounts)]
pub struct Convert<'info> {
    pub governance: Signer<'info>,

    #[account(
        mut,
        seeds = [TREASURY_SEED, treasury.base_mint.as_ref()],
        bump = treasury.bump,
        has_one = governance @ VaultError::NotGovernance,
        has_one = venue_program @ VaultError::VenueMismatch
    )]
    pub treasury: Account<'info, Treasury>,

    #[account(
        mut,
        seeds = [STAKING_POOL_SEED, treasury.key().as_ref(), &[staking_pool.tranche_id]],
        bump = staking_pool.bump,
        has_one = treasury @ VaultError::TreasuryMismatch,
        constraint = treasury.administers(&staking_pool.key()) @ VaultError::TreasuryMismatch,
        has_one = base_vault @ VaultError::VaultMismatch,
        has_one = yield_vault @ VaultError::VaultMismatch
    )]
    pub staking_pool: Account<'info, StakingPool>,

    #[account(mut)]
    pub base_vault: Account<'info, TokenAccount>,

    #[account(mut)]
    pub yield_vault: Account<'info, TokenAccount>,

    /// Receives the venue output: yield-mint account on buy, base-mint on sell.
    #[account(mut)]
    pub recipient: Account<'info, TokenAccount>,

    /// CHECK: Matched against treasury.venue_program via has_one
    #[account(executable)]
    pub venue_program: UncheckedAccount<'info>,

    pub token_program: Program<'info, Token>,
}

pub fn buy_handler<'info>(
    ctx: Context<'_, '_, 'info, 'info, Convert<'info>>,
    amount_in: u64,
    min_out: u64,
) -> Result<()> {
    convert(ctx, Direction::Buy, amount_in, min_out)
}

pub fn sell_handler<'info>(
    ctx: Context<'_, '_, 'info, 'info, Convert<'info>>,
    amount_in: u64,
    min_out: u64,
) -> Result<()> {
    convert(ctx, Direction::Sell, amount_in, min_out)
}

/// Derives `(spent, amount_out)` from vault and recipient balances measured
/// around the venue call.
pub fn measure_conversion(
    source_before: u64,
    source_after: u64,
    recipient_before: u64,
    recipient_after: u64,
    amount_in: u64,
    min_out: u64,
) -> Result<(u64, u64)> {
    let spent = source_before
        .checked_sub(source_after)
        .ok_or(VaultError::MathUnderflow)?;
    require!(spent <= amount_in, VaultError::ConversionOverspent);

    let amount_out = recipient_after
        .checked_sub(recipient_before)
        .ok_or(VaultError::MathUnderflow)?;
    require!(amount_out >= min_out, VaultError::SlippageExceeded);

    Ok((spent, amount_out))
}

fn convert<'info>(
    ctx: Context<'_, '_, 'info, 'info, Convert<'info>>,
    direction: Direction,
    amount_in: u64,
    min_out: u64,
) -> Result<()> {
    require!(amount_in > 0, VaultError::ZeroAmount);

    let (source_balance, output_mint) = match direction {
        Direction::Buy => (
            ctx.accounts.base_vault.amount,
            ctx.accounts.staking_pool.yield_mint,
        ),
        Direction::Sell => (
            ctx.accounts.yield_vault.amount,
            ctx.accounts.staking_pool.base_mint,
        ),
    };
    require!(source_balance >= amount_in, VaultError::InsufficientFunds);
    require_keys_eq!(
        ctx.accounts.recipient.mint,
        output_mint,
        VaultError::MintMismatch
    );
    let recipient_before = ctx.accounts.recipient.amount;

    // === VENUE CALL ===

    let pool = &ctx.accounts.staking_pool;
    let treasury_key = pool.treasury;
    let seeds = &[
        STAKING_POOL_SEED,
        treasury_key.as_ref(),
        &[pool.tranche_id],
        &[pool.bump],
    ];
    let signer_seeds = &[&seeds[..]];

    let authority = ctx.accounts.staking_pool.to_account_info();
    let source = match direction {
        Direction::Buy => ctx.accounts.base_vault.to_account_info(),
        Direction::Sell => ctx.accounts.yield_vault.to_account_info(),
    };
    let destination = ctx.accounts.recipient.to_account_info();
    let venue_program = ctx.accounts.venue_program.to_account_info();
    let token_program = ctx.accounts.token_program.to_account_info();

    venue::convert(
        VenueAccounts {
            venue_program: &venue_program,
            authority: &authority,
            source: &source,
            destination: &destination,
            token_program: &token_program,
            extra: ctx.remaining_accounts,
        },
        direction,
        amount_in,
        min_out,
        signer_seeds,
    )?;

    // === POST-CALL MEASUREMENT ===

    ctx.accounts.base_vault.reload()?;
    ctx.accounts.yield_vault.reload()?;
    ctx.accounts.recipient.reload()?;

    let source_after = match direction {
        Direction::Buy => ctx.accounts.base_vault.amount,
        Direction::Sell => ctx.accounts.yield_vault.amount,
    };
    let (spent, amount_out) = measure_conversion(
        source_balance,
        source_after,
        recipient_before,
        ctx.accounts.recipient.amount,
        amount_in,
        min_out,
    )?;

    // === BOOKKEEPING ===

    match direction {
        Direction::Buy => {
            ctx.accounts.staking_pool.record_buy(spent, amount_out)?;
            ctx.accounts.treasury.record_buy(spent, amount_out)?;
        }
        Direction::Sell => {
            ctx.accounts.staking_pool.record_sell(spent, amount_out)?;
            ctx.accounts.treasury.record_sell(spent, amount_out)?;
        }
    }

    msg!(
        "{:?}: spent {} for {} (min {})",
        direction,
        spent,
        amount_out,
        min_out
    );
    msg!("Recipient: {}", ctx.accounts.recipient.key());

    emit!(Converted {
        pool: ctx.accounts.staking_pool.key(),
        is_buy: direction == Direction::Buy,
        amount_in: spent,
        amount_out,
        recipient: ctx.accounts.recipient.key(),
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_vault_err<T: std::fmt::Debug>(result: Result<T>, expected: VaultError) {
        match result.unwrap_err() {
            anchor_lang::error::Error::AnchorError(err) => {
                assert_eq!(err.error_code_number, u32::from(expected))
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn output_equal_to_minimum_passes() {
        let (spent, out) = measure_conversion(1_000, 0, 50, 1_000, 1_000, 950).unwrap();
        assert_eq!(spent, 1_000);
        assert_eq!(out, 950);
    }

    #[test]
    fn partial_spend_reports_measured_amount() {
        let (spent, out) = measure_conversion(1_000, 400, 0, 590, 1_000, 500).unwrap();
        assert_eq!(spent, 600);
        assert_eq!(out, 590);
    }

    #[test]
    fn output_one_below_minimum_fails() {
        assert_vault_err(
            measure_conversion(1_000, 0, 50, 999, 1_000, 950),
            VaultError::SlippageExceeded,
        );
    }

    #[test]
    fn venue_taking_more_than_amount_in_fails() {
        assert_vault_err(
            measure_conversion(1_001, 0, 0, 2_000, 1_000, 0),
            VaultError::ConversionOverspent,
        );
    }

    #[test]
    fn shrinking_balances_fail() {
        assert_vault_err(
            measure_conversion(1_000, 0, 500, 499, 1_000, 0),
            VaultError::MathUnderflow,
        );
        assert_vault_err(
            measure_conversion(1_000, 1_001, 0, 10, 1_000, 0),
            VaultError::MathUnderflow,
        );
    }
}
