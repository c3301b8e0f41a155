use anchor_lang::prelude::*;

use crate::constants::MAX_POOLS;
use crate::error::VaultError;

#[account]
#[derive(Default)]
pub struct Treasury {
    pub owner: Pubkey,
    pub governance: Pubkey,
    pub base_mint: Pubkey,
    pub treasury_vault: Pubkey,
    pub venue_program: Pubkey,

    pub epoch: u64,
    pub last_epoch_at: i64,

    pub pools: Vec<Pubkey>,

    pub total_base_converted_in: u64,
    pub total_yield_received: u64,
    pub total_yield_converted_out: u64,
    pub total_base_received: u64,
    pub total_rewards_allocated: u64,

    pub created_at: i64,

    pub vault_bump: u8,
    pub bump: u8,
}

impl Treasury {
    pub const LEN: usize = 8
        + (32 * 5)
        + 8 + 8
        + (4 + 32 * MAX_POOLS)
        + (8 * 5)
        + 8
        + 2;

    /// Advances the epoch by exactly one and returns the new value.
    pub fn advance_epoch(&mut self, now: i64) -> Result<u64> {
        self.epoch = self.epoch.checked_add(1).ok_or(VaultError::MathOverflow)?;
        self.last_epoch_at = now;
        Ok(self.epoch)
    }

    pub fn register_pool(&mut self, pool: Pubkey) -> Result<()> {
        require!(self.pools.len() < MAX_POOLS, VaultError::TooManyPools);
        self.pools.push(pool);
        Ok(())
    }

    pub fn administers(&self, pool: &Pubkey) -> bool {
        self.pools.contains(pool)
    }

    pub fn record_buy(&mut self, base_spent: u64, yield_out: u64) -> Result<()> {
        self.total_base_converted_in = self
            .total_base_converted_in
            .checked_add(base_spent)
            .ok_or(VaultError::MathOverflow)?;
        self.total_yield_received = self
            .total_yield_received
            .checked_add(yield_out)
            .ok_or(VaultError::MathOverflow)?;
        Ok(())
    }

    pub fn record_sell(&mut self, yield_spent: u64, base_out: u64) -> Result<()> {
        self.total_yield_converted_out = self
            .total_yield_converted_out
            .checked_add(yield_spent)
            .ok_or(VaultError::MathOverflow)?;
        self.total_base_received = self
            .total_base_received
            .checked_add(base_out)
            .ok_or(VaultError::MathOverflow)?;
        Ok(())
    }

    pub fn record_reward(&mut self, amount: u64) -> Result<()> {
        self.total_rewards_allocated = self
            .total_rewards_allocated
            .checked_add(amount)
            .ok_or(VaultError::MathOverflow)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_advances_by_one() {
        let mut treasury = Treasury::default();
        assert_eq!(treasury.advance_epoch(10).unwrap(), 1);
        assert_eq!(treasury.advance_epoch(20).unwrap(), 2);
        assert_eq!(treasury.last_epoch_at, 20);
    }

    #[test]
    fn pool_registry_is_bounded() {
        let mut treasury = Treasury::default();
        for _ in 0..MAX_POOLS {
            treasury.register_pool(Pubkey::new_unique()).unwrap();
        }
        assert!(treasury.register_pool(Pubkey::new_unique()).is_err());
        let first = treasury.pools[0];
        assert!(treasury.administers(&first));
        assert!(!treasury.administers(&Pubkey::new_unique()));
    }
}
