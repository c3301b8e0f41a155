//! Update epoch instruction handler.
//!
//! Epochs are operator-driven ticks: governance advances the counter once the
//! conversions for the closing epoch have executed.

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::VaultError;
use crate::events::EpochAdvanced;
use crate::state::Treasury;

#[derive(Accounts)]
pub struct UpdateEpoch<'info> {
    pub governance: Signer<'info>,

    #[account(
        mut,
        seeds = [TREASURY_SEED, treasury.base_mint.as_ref()],
        bump = treasury.bump,
        has_one = governance @ VaultError::NotGovernance
    )]
    pub treasury: Account<'info, Treasury>,
}

pub fn handler(ctx: Context<UpdateEpoch>) -> Result<()> {
    let clock = Clock::get()?;
    let treasury = &mut ctx.accounts.treasury;

    let epoch = treasury.advance_epoch(clock.unix_timestamp)?;

    msg!("Epoch advanced to {}", epoch);

    emit!(EpochAdvanced {
        treasury: treasury.key(),
        epoch,
        timestamp: clock.unix_timestamp,
    });

    Ok(())
}
