//! Initialize treasury instruction handler.
//!
//! Creates the treasury for one base mint. The PDA is derived from the mint,
//! so a second initialization for the same mint fails at account creation.

use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::constants::*;
use crate::error::VaultError;
use crate::state::Treasury;

/// Accounts required for treasury initialization.
#[derive(Accounts)]
pub struct InitializeTreasury<'info> {
    /// Becomes the treasury owner (pool creation and configuration).
    #[account(mut)]
    pub owner: Signer<'info>,

    #[account(
        init,
        payer = owner,
        space = Treasury::LEN,
        seeds = [TREASURY_SEED, base_mint.key().as_ref()],
        bump
    )]
    pub treasury: Account<'info, Treasury>,

    pub base_mint: Account<'info, Mint>,

    /// Token vault holding treasury funds, authority is the treasury PDA.
    #[account(
        init,
        payer = owner,
        seeds = [TREASURY_VAULT_SEED, treasury.key().as_ref()],
        bump,
        token::mint = base_mint,
        token::authority = treasury
    )]
    pub treasury_vault: Account<'info, TokenAccount>,

    pub system_program: Program<'info, System>,
    pub token_program: Program<'info, Token>,
    pub rent: Sysvar<'info, Rent>,
}

/// Initialize a treasury.
///
/// # Arguments
/// * `governance` - Key allowed to run epochs, settlement and fund movements
/// * `venue_program` - Program id of the conversion venue
pub fn handler(
    ctx: Context<InitializeTreasury>,
    governance: Pubkey,
    venue_program: Pubkey,
) -> Result<()> {
    require!(governance != Pubkey::default(), VaultError::InvalidAuthority);
    require!(
        venue_program != Pubkey::default(),
        VaultError::VenueMismatch
    );

    let treasury = &mut ctx.accounts.treasury;
    let clock = Clock::get()?;

    treasury.owner = ctx.accounts.owner.key();
    treasury.governance = governance;
    treasury.base_mint = ctx.accounts.base_mint.key();
    treasury.treasury_vault = ctx.accounts.treasury_vault.key();
    treasury.venue_program = venue_program;
    treasury.epoch = 0;
    treasury.last_epoch_at = clock.unix_timestamp;
    treasury.pools = Vec::new();
    treasury.created_at = clock.unix_timestamp;
    treasury.bump = ctx.bumps.treasury;
    treasury.vault_bump = ctx.bumps.treasury_vault;

    msg!("Treasury initialized");
    msg!("Owner: {}", treasury.owner);
    msg!("Governance: {}", governance);
    msg!("Base mint: {}", treasury.base_mint);
    msg!("Venue: {}", venue_program);

    Ok(())
}
