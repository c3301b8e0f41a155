//! Read-only reward query, returned through program return data.

use anchor_lang::prelude::*;

use crate::error::VaultError;
use crate::state::{StakingPool, UserRecord};

#[derive(Accounts)]
pub struct Earned<'info> {
    pub staking_pool: Account<'info, StakingPool>,

    #[account(
        constraint = user_record.pool == staking_pool.key() @ VaultError::PoolMismatch
    )]
    pub user_record: Account<'info, UserRecord>,
}

pub fn handler(ctx: Context<Earned>) -> Result<u64> {
    let earned = ctx.accounts.staking_pool.earned(&ctx.accounts.user_record)?;
    msg!("Earned: {}", earned);
    Ok(earned)
}
