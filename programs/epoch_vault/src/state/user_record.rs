use anchor_lang::prelude::*;

use crate::constants::PRECISION;
use crate::error::VaultError;

/// A queued stake or withdraw request awaiting batch settlement.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Request {
    pub amount: u64,
    pub request_epoch: u64,
    pub request_timestamp: i64,
}

impl Request {
    pub const LEN: usize = 8 + 8 + 8;

    pub fn is_empty(&self) -> bool {
        self.amount == 0
    }

    /// Only requests from a strictly earlier epoch settle.
    pub fn is_settleable(&self, epoch: u64) -> bool {
        self.amount > 0 && self.request_epoch < epoch
    }

    /// New amounts may join an empty request or one opened this epoch.
    pub fn can_accrue(&self, epoch: u64) -> bool {
        self.is_empty() || self.request_epoch == epoch
    }

    /// Returns the request after adding `amount`; `self` is left untouched.
    pub fn accrued(&self, amount: u64, epoch: u64, now: i64) -> Result<Request> {
        if self.is_empty() {
            return Ok(Request {
                amount,
                request_epoch: epoch,
                request_timestamp: now,
            });
        }
        Ok(Request {
            amount: self
                .amount
                .checked_add(amount)
                .ok_or(VaultError::MathOverflow)?,
            ..*self
        })
    }
}

#[account]
#[derive(Default)]
pub struct UserRecord {
    pub owner: Pubkey,
    pub pool: Pubkey,

    pub balance_wait: u64,
    pub balance_staked: u64,
    pub balance_withdraw: u64,
    pub balance_reward: u64,

    pub reward_per_share_paid: u128,

    pub stake_request: Request,
    pub withdraw_request: Request,

    pub last_staked_epoch: u64,
    pub total_rewards_claimed: u64,

    pub bump: u8,
}

impl UserRecord {
    pub const LEN: usize = 8
        + (32 * 2)
        + (8 * 4)
        + 16
        + (Request::LEN * 2)
        + (8 * 2)
        + 1;

    /// Reward accrued on `balance_staked` since the last snapshot.
    pub fn pending_reward(&self, acc_reward_per_share: u128) -> Result<u64> {
        let delta = acc_reward_per_share
            .checked_sub(self.reward_per_share_paid)
            .ok_or(VaultError::MathUnderflow)?;
        let reward = (self.balance_staked as u128)
            .checked_mul(delta)
            .ok_or(VaultError::MathOverflow)?
            / PRECISION;
        u64::try_from(reward).map_err(|_| error!(VaultError::MathOverflow))
    }

    /// Moves pending reward into `balance_reward` and snapshots the accumulator.
    ///
    /// Must run before any change to `balance_staked`.
    pub fn sync_reward(&mut self, acc_reward_per_share: u128) -> Result<()> {
        let pending = self.pending_reward(acc_reward_per_share)?;
        self.balance_reward = self
            .balance_reward
            .checked_add(pending)
            .ok_or(VaultError::MathOverflow)?;
        self.reward_per_share_paid = acc_reward_per_share;
        Ok(())
    }

    pub fn is_lock_up_elapsed(&self, epoch: u64, lock_up: u64) -> bool {
        epoch.saturating_sub(self.last_staked_epoch) >= lock_up
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_settles_only_after_its_epoch() {
        let request = Request {
            amount: 10,
            request_epoch: 3,
            request_timestamp: 0,
        };
        assert!(!request.is_settleable(3));
        assert!(request.is_settleable(4));
        assert!(!Request::default().is_settleable(10));
    }

    #[test]
    fn accrue_pins_first_epoch_and_timestamp() {
        let first = Request::default().accrued(5, 2, 100).unwrap();
        assert_eq!(first.request_epoch, 2);
        assert_eq!(first.request_timestamp, 100);

        let second = first.accrued(7, 2, 200).unwrap();
        assert_eq!(second.amount, 12);
        assert_eq!(second.request_timestamp, 100);
    }

    #[test]
    fn stale_request_cannot_accrue() {
        let request = Request {
            amount: 1,
            request_epoch: 1,
            request_timestamp: 0,
        };
        assert!(request.can_accrue(1));
        assert!(!request.can_accrue(2));
    }

    #[test]
    fn sync_reward_materializes_pending() {
        let mut record = UserRecord {
            balance_staked: 50,
            ..Default::default()
        };
        let acc = 2 * PRECISION;
        assert_eq!(record.pending_reward(acc).unwrap(), 100);

        record.sync_reward(acc).unwrap();
        assert_eq!(record.balance_reward, 100);
        assert_eq!(record.pending_reward(acc).unwrap(), 0);
    }

    #[test]
    fn lock_up_counts_epochs_since_last_stake() {
        let record = UserRecord {
            last_staked_epoch: 4,
            ..Default::default()
        };
        assert!(!record.is_lock_up_elapsed(5, 2));
        assert!(record.is_lock_up_elapsed(6, 2));
        assert!(record.is_lock_up_elapsed(4, 0));
    }
}
