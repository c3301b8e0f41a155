//! Staking pool ledger.
//!
//! Every balance movement of a tranche goes through the methods below. Each
//! method validates and computes the new values first and only then writes, so
//! a rejected call leaves both the pool and the record untouched.

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::VaultError;
use crate::state::UserRecord;

/// When the stake-side haircuts (`fee`, `glp_in_fee`) are deducted.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HaircutTiming {
    /// Net amount is queued; `balance_wait` already excludes the haircut.
    #[default]
    AtRequest,
    /// Gross amount is queued; the haircut is taken when the stake settles.
    AtSettlement,
}

/// Per-tranche configuration supplied at pool initialization.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct PoolConfig {
    pub fee: u16,
    pub glp_in_fee: u16,
    pub glp_out_fee: u16,
    pub gas_threshold: u64,
    pub minimum_request: u64,
    pub lock_up: u64,
    pub capacity: u64,
    pub fee_to: Pubkey,
    pub stake_haircut: HaircutTiming,
}

impl PoolConfig {
    pub fn validate(&self) -> Result<()> {
        validate_fees(self.fee, self.glp_in_fee, self.glp_out_fee)?;
        require!(
            self.fee_to != Pubkey::default(),
            VaultError::FeeRecipientMismatch
        );
        Ok(())
    }
}

fn validate_fees(fee: u16, glp_in_fee: u16, glp_out_fee: u16) -> Result<()> {
    require!(fee <= MAX_FEE_BPS, VaultError::FeeTooHigh);
    require!(glp_in_fee <= MAX_FEE_BPS, VaultError::FeeTooHigh);
    require!(glp_out_fee <= MAX_FEE_BPS, VaultError::FeeTooHigh);
    Ok(())
}

/// Token split of a `withdraw` call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Payout {
    /// Principal paid to the caller, net of `fee`.
    pub principal: u64,
    /// Principal haircut paid to the fee sink.
    pub fee: u64,
    /// Accrued reward paid to the caller.
    pub reward: u64,
}

impl Payout {
    pub fn to_user(&self) -> Result<u64> {
        Ok(self
            .principal
            .checked_add(self.reward)
            .ok_or(VaultError::MathOverflow)?)
    }
}

#[account]
#[derive(Default)]
pub struct StakingPool {
    pub treasury: Pubkey,
    pub owner: Pubkey,
    pub base_mint: Pubkey,
    pub yield_mint: Pubkey,
    pub base_vault: Pubkey,
    pub yield_vault: Pubkey,
    pub fee_to: Pubkey,

    pub tranche_id: u8,
    pub stake_haircut: HaircutTiming,

    pub fee: u16,
    pub glp_in_fee: u16,
    pub glp_out_fee: u16,

    pub gas_threshold: u64,
    pub minimum_request: u64,
    pub lock_up: u64,
    pub capacity: u64,

    pub total_supply_wait: u64,
    pub total_supply_staked: u64,
    pub total_withdraw_requested: u64,
    pub total_supply_withdraw: u64,
    pub reward_reserve: u64,
    /// Lifetime total of retained haircuts, never decremented.
    pub total_fees_retained: u64,
    pub total_rewards_allocated: u64,

    pub acc_reward_per_share: u128,

    pub base_converted_in: u64,
    pub yield_received: u64,
    pub yield_converted_out: u64,
    pub base_received: u64,

    pub paused: bool,

    pub last_updated: i64,
    pub created_at: i64,

    pub base_vault_bump: u8,
    pub yield_vault_bump: u8,
    pub bump: u8,
}

impl StakingPool {
    pub const LEN: usize = 8
        + (32 * 7)
        + 1 + 1
        + (2 * 3)
        + (8 * 4)
        + (8 * 7)
        + 16
        + (8 * 4)
        + 1
        + (8 * 2)
        + 3;

    pub fn apply_config(&mut self, config: &PoolConfig) -> Result<()> {
        config.validate()?;
        self.fee = config.fee;
        self.glp_in_fee = config.glp_in_fee;
        self.glp_out_fee = config.glp_out_fee;
        self.gas_threshold = config.gas_threshold;
        self.minimum_request = config.minimum_request;
        self.lock_up = config.lock_up;
        self.capacity = config.capacity;
        self.fee_to = config.fee_to;
        self.stake_haircut = config.stake_haircut;
        Ok(())
    }

    pub fn set_fees(&mut self, fee: u16, glp_in_fee: u16, glp_out_fee: u16) -> Result<()> {
        validate_fees(fee, glp_in_fee, glp_out_fee)?;
        self.fee = fee;
        self.glp_in_fee = glp_in_fee;
        self.glp_out_fee = glp_out_fee;
        Ok(())
    }

    pub fn check_fee_payment(&self, fee_payment: u64) -> Result<()> {
        require!(
            fee_payment >= self.gas_threshold,
            VaultError::FeePaymentTooLow
        );
        Ok(())
    }

    /// Splits a gross stake into `(net, haircut)`: `fee` first, then `glp_in_fee`
    /// on what remains. Both parts round down.
    pub fn stake_haircut(&self, amount: u64) -> Result<(u64, u64)> {
        let fee_part = bps_of(amount, self.fee).ok_or(VaultError::MathOverflow)?;
        let after_fee = amount - fee_part;
        let in_part = bps_of(after_fee, self.glp_in_fee).ok_or(VaultError::MathOverflow)?;
        let net = after_fee - in_part;
        Ok((net, amount - net))
    }

    /// Queues a stake of `amount` base tokens (already transferred in).
    ///
    /// Returns the amount credited to `balance_wait`.
    pub fn record_stake(
        &mut self,
        user: &mut UserRecord,
        amount: u64,
        epoch: u64,
        now: i64,
    ) -> Result<u64> {
        require!(!self.paused, VaultError::PoolPaused);
        require!(amount > 0, VaultError::ZeroAmount);
        require!(
            amount >= self.minimum_request,
            VaultError::BelowMinimumRequest
        );

        let committed = self
            .total_supply_wait
            .checked_add(self.total_supply_staked)
            .and_then(|total| total.checked_add(amount))
            .ok_or(VaultError::MathOverflow)?;
        require!(committed <= self.capacity, VaultError::CapacityExceeded);

        require!(
            user.stake_request.can_accrue(epoch),
            VaultError::PendingStakeNotSettled
        );

        let (queued, haircut) = match self.stake_haircut {
            HaircutTiming::AtRequest => self.stake_haircut(amount)?,
            HaircutTiming::AtSettlement => (amount, 0),
        };
        require!(queued > 0, VaultError::ZeroAmount);

        let request = user.stake_request.accrued(queued, epoch, now)?;
        let balance_wait = user
            .balance_wait
            .checked_add(queued)
            .ok_or(VaultError::MathOverflow)?;
        let total_supply_wait = self
            .total_supply_wait
            .checked_add(queued)
            .ok_or(VaultError::MathOverflow)?;
        let total_fees_retained = self
            .total_fees_retained
            .checked_add(haircut)
            .ok_or(VaultError::MathOverflow)?;

        user.stake_request = request;
        user.balance_wait = balance_wait;
        self.total_supply_wait = total_supply_wait;
        self.total_fees_retained = total_fees_retained;
        self.last_updated = now;

        Ok(queued)
    }

    /// Moves `amount` of staked principal into the withdraw queue.
    pub fn record_withdraw_request(
        &mut self,
        user: &mut UserRecord,
        amount: u64,
        epoch: u64,
        now: i64,
    ) -> Result<()> {
        require!(!self.paused, VaultError::PoolPaused);
        require!(amount > 0, VaultError::ZeroAmount);
        require!(
            amount <= user.balance_staked,
            VaultError::InsufficientStakedBalance
        );
        require!(
            amount >= self.minimum_request || amount == user.balance_staked,
            VaultError::BelowMinimumRequest
        );
        require!(
            user.is_lock_up_elapsed(epoch, self.lock_up),
            VaultError::LockUpNotElapsed
        );
        require!(
            user.withdraw_request.can_accrue(epoch),
            VaultError::PendingWithdrawNotSettled
        );

        let request = user.withdraw_request.accrued(amount, epoch, now)?;
        let total_withdraw_requested = self
            .total_withdraw_requested
            .checked_add(amount)
            .ok_or(VaultError::MathOverflow)?;
        let total_supply_staked = self
            .total_supply_staked
            .checked_sub(amount)
            .ok_or(VaultError::MathUnderflow)?;

        user.sync_reward(self.acc_reward_per_share)?;
        user.balance_staked -= amount;
        user.withdraw_request = request;
        self.total_supply_staked = total_supply_staked;
        self.total_withdraw_requested = total_withdraw_requested;
        self.last_updated = now;

        Ok(())
    }

    /// Settles the record's stake request if it predates `epoch`.
    ///
    /// Returns `false` (and writes nothing) for empty or current-epoch requests.
    pub fn settle_stake(&mut self, user: &mut UserRecord, epoch: u64) -> Result<bool> {
        if !user.stake_request.is_settleable(epoch) {
            return Ok(false);
        }
        let amount = user.stake_request.amount;
        let (credited, haircut) = match self.stake_haircut {
            HaircutTiming::AtRequest => (amount, 0),
            HaircutTiming::AtSettlement => self.stake_haircut(amount)?,
        };

        let balance_wait = user
            .balance_wait
            .checked_sub(amount)
            .ok_or(VaultError::MathUnderflow)?;
        let total_supply_wait = self
            .total_supply_wait
            .checked_sub(amount)
            .ok_or(VaultError::MathUnderflow)?;
        let balance_staked = user
            .balance_staked
            .checked_add(credited)
            .ok_or(VaultError::MathOverflow)?;
        let total_supply_staked = self
            .total_supply_staked
            .checked_add(credited)
            .ok_or(VaultError::MathOverflow)?;
        let total_fees_retained = self
            .total_fees_retained
            .checked_add(haircut)
            .ok_or(VaultError::MathOverflow)?;

        user.sync_reward(self.acc_reward_per_share)?;
        user.balance_wait = balance_wait;
        user.balance_staked = balance_staked;
        user.stake_request = Default::default();
        user.last_staked_epoch = epoch;
        self.total_supply_wait = total_supply_wait;
        self.total_supply_staked = total_supply_staked;
        self.total_fees_retained = total_fees_retained;

        Ok(true)
    }

    /// Settles the record's withdraw request if it predates `epoch`, applying
    /// `glp_out_fee`.
    pub fn settle_withdraw(&mut self, user: &mut UserRecord, epoch: u64) -> Result<bool> {
        if !user.withdraw_request.is_settleable(epoch) {
            return Ok(false);
        }
        let amount = user.withdraw_request.amount;
        let out_fee = bps_of(amount, self.glp_out_fee).ok_or(VaultError::MathOverflow)?;
        let net = amount - out_fee;

        let balance_withdraw = user
            .balance_withdraw
            .checked_add(net)
            .ok_or(VaultError::MathOverflow)?;
        let total_supply_withdraw = self
            .total_supply_withdraw
            .checked_add(net)
            .ok_or(VaultError::MathOverflow)?;
        let total_withdraw_requested = self
            .total_withdraw_requested
            .checked_sub(amount)
            .ok_or(VaultError::MathUnderflow)?;
        let total_fees_retained = self
            .total_fees_retained
            .checked_add(out_fee)
            .ok_or(VaultError::MathOverflow)?;

        user.balance_withdraw = balance_withdraw;
        user.withdraw_request = Default::default();
        self.total_supply_withdraw = total_supply_withdraw;
        self.total_withdraw_requested = total_withdraw_requested;
        self.total_fees_retained = total_fees_retained;

        Ok(true)
    }

    /// Distributes `amount` of reward pro rata over the current staked supply.
    pub fn credit_reward(&mut self, amount: u64) -> Result<()> {
        require!(amount > 0, VaultError::ZeroAmount);
        require!(self.total_supply_staked > 0, VaultError::NoStakedSupply);

        let increment = (amount as u128)
            .checked_mul(PRECISION)
            .ok_or(VaultError::MathOverflow)?
            / self.total_supply_staked as u128;
        // Dust that cannot move the accumulator is rejected.
        require!(increment > 0, VaultError::ZeroAmount);
        let acc_reward_per_share = self
            .acc_reward_per_share
            .checked_add(increment)
            .ok_or(VaultError::MathOverflow)?;
        let reward_reserve = self
            .reward_reserve
            .checked_add(amount)
            .ok_or(VaultError::MathOverflow)?;
        let total_rewards_allocated = self
            .total_rewards_allocated
            .checked_add(amount)
            .ok_or(VaultError::MathOverflow)?;

        self.acc_reward_per_share = acc_reward_per_share;
        self.reward_reserve = reward_reserve;
        self.total_rewards_allocated = total_rewards_allocated;
        Ok(())
    }

    /// Unclaimed reward of `user`, including the part not yet materialized.
    pub fn earned(&self, user: &UserRecord) -> Result<u64> {
        let pending = user.pending_reward(self.acc_reward_per_share)?;
        Ok(user
            .balance_reward
            .checked_add(pending)
            .ok_or(VaultError::MathOverflow)?)
    }

    /// Debits `amount` of settled withdrawable balance plus all accrued reward.
    ///
    /// `amount` may be zero only when there is reward to pay.
    pub fn record_withdraw(&mut self, user: &mut UserRecord, amount: u64, now: i64) -> Result<Payout> {
        let reward = self.earned(user)?;
        require!(amount > 0 || reward > 0, VaultError::ZeroAmount);
        require!(
            amount <= user.balance_withdraw,
            VaultError::InsufficientWithdrawBalance
        );

        let fee = bps_of(amount, self.fee).ok_or(VaultError::MathOverflow)?;
        let payout = Payout {
            principal: amount - fee,
            fee,
            reward,
        };
        let total_supply_withdraw = self
            .total_supply_withdraw
            .checked_sub(amount)
            .ok_or(VaultError::MathUnderflow)?;

        self.pay_reward(user, reward)?;
        user.balance_withdraw -= amount;
        self.total_supply_withdraw = total_supply_withdraw;
        self.last_updated = now;

        Ok(payout)
    }

    /// Pays out all accrued reward without touching principal.
    pub fn record_claim(&mut self, user: &mut UserRecord, now: i64) -> Result<u64> {
        let reward = self.earned(user)?;
        require!(reward > 0, VaultError::NoRewardsAvailable);

        self.pay_reward(user, reward)?;
        self.last_updated = now;
        Ok(reward)
    }

    fn pay_reward(&mut self, user: &mut UserRecord, reward: u64) -> Result<()> {
        let reward_reserve = self
            .reward_reserve
            .checked_sub(reward)
            .ok_or(VaultError::MathUnderflow)?;
        let total_rewards_claimed = user
            .total_rewards_claimed
            .checked_add(reward)
            .ok_or(VaultError::MathOverflow)?;

        user.sync_reward(self.acc_reward_per_share)?;
        user.balance_reward = 0;
        user.total_rewards_claimed = total_rewards_claimed;
        self.reward_reserve = reward_reserve;
        Ok(())
    }

    pub fn record_buy(&mut self, base_spent: u64, yield_out: u64) -> Result<()> {
        self.base_converted_in = self
            .base_converted_in
            .checked_add(base_spent)
            .ok_or(VaultError::MathOverflow)?;
        self.yield_received = self
            .yield_received
            .checked_add(yield_out)
            .ok_or(VaultError::MathOverflow)?;
        Ok(())
    }

    pub fn record_sell(&mut self, yield_spent: u64, base_out: u64) -> Result<()> {
        self.yield_converted_out = self
            .yield_converted_out
            .checked_add(yield_spent)
            .ok_or(VaultError::MathOverflow)?;
        self.base_received = self
            .base_received
            .checked_add(base_out)
            .ok_or(VaultError::MathOverflow)?;
        Ok(())
    }
}
