//! Treasury fund instruction handlers.
//!
//! Moves base tokens between the governance key and the treasury vault.

use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::*;
use crate::error::VaultError;
use crate::state::Treasury;

#[derive(Accounts)]
pub struct TreasuryFunds<'info> {
    pub governance: Signer<'info>,

    #[account(
        seeds = [TREASURY_SEED, treasury.base_mint.as_ref()],
        bump = treasury.bump,
        has_one = governance @ VaultError::NotGovernance,
        has_one = treasury_vault @ VaultError::VaultMismatch
    )]
    pub treasury: Account<'info, Treasury>,

    #[account(mut)]
    pub treasury_vault: Account<'info, TokenAccount>,

    /// Governance's base-mint token account.
    #[account(
        mut,
        constraint = governance_token_account.mint == treasury.base_mint @ VaultError::MintMismatch,
        constraint = governance_token_account.owner == governance.key()
    )]
    pub governance_token_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

/// Deposit `amount` from governance into the treasury vault.
pub fn deposit_handler(ctx: Context<TreasuryFunds>, amount: u64) -> Result<()> {
    require!(amount > 0, VaultError::ZeroAmount);

    let cpi_accounts = Transfer {
        from: ctx.accounts.governance_token_account.to_account_info(),
        to: ctx.accounts.treasury_vault.to_account_info(),
        authority: ctx.accounts.governance.to_account_info(),
    };
    let cpi_program = ctx.accounts.token_program.to_account_info();
    token::transfer(CpiContext::new(cpi_program, cpi_accounts), amount)?;

    ctx.accounts.treasury_vault.reload()?;
    msg!("Treasury funded with {} tokens", amount);
    msg!("New treasury balance: {}", ctx.accounts.treasury_vault.amount);

    Ok(())
}

/// Withdraw `amount` from the treasury vault back to governance.
pub fn withdraw_handler(ctx: Context<TreasuryFunds>, amount: u64) -> Result<()> {
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
        to: ctx.accounts.governance_token_account.to_account_info(),
        authority: ctx.accounts.treasury.to_account_info(),
    };
    let cpi_program = ctx.accounts.token_program.to_account_info();
    token::transfer(
        CpiContext::new_with_signer(cpi_program, cpi_accounts, signer_seeds),
        amount,
    )?;

    ctx.accounts.treasury_vault.reload()?;
    msg!("Treasury paid out {} tokens", amount);
    msg!("New treasury balance: {}", ctx.accounts.treasury_vault.amount);

    Ok(())
}
