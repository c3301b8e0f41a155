//! # Epoch Vault Program
//!
//! Epoch-batched yield vault accounting. Users queue stake and withdraw
//! requests against a staking pool; governance settles the queues once per
//! epoch, converts pooled base tokens into the yield token through an
//! external venue, and allocates rewards pro rata to staked balances.
//!
//! ## Components
//! - **Treasury**: epoch clock, governance authority, base-token reserve
//!   and the registry of staking pools.
//! - **StakingPool**: per-tranche ledger with wait, staked and withdraw
//!   buckets plus a reward-per-share accumulator.
//! - **UserRecord**: per-user balances and at most one pending request of
//!   each kind.
//!
//! ## Features
//! - Requests become settleable only once the epoch has advanced past them
//! - Batch settlement is idempotent per user and per epoch
//! - Basis-point haircuts on stake, conversion in and withdraw out
//! - Capacity limit and lamport micro-fee on every request
//! - Safe math with overflow protection

use anchor_lang::prelude::*;

declare_id!("Fg6PaFpoGXkYsidMpWTK6W2BeZ7FEfcYkg476zPFsLnS");

pub mod constants;
pub mod error;
pub mod events;
pub mod instructions;
pub mod state;
pub mod venue;

use instructions::*;
use state::PoolConfig;

#[program]
pub mod epoch_vault {
    use super::*;

    /// Creates the treasury for a base mint and starts the epoch clock at 0.
    ///
    /// # Arguments
    /// * `ctx` - The context containing all accounts needed for initialization
    /// * `governance` - Key allowed to settle, convert and allocate
    /// * `venue_program` - External swap program used by buy/sell
    ///
    /// # Errors
    /// Returns an error if either key is the default pubkey.
    pub fn initialize_treasury(
        ctx: Context<InitializeTreasury>,
        governance: Pubkey,
        venue_program: Pubkey,
    ) -> Result<()> {
        instructions::initialize_treasury::handler(ctx, governance, venue_program)
    }

    /// Creates a staking pool for a tranche and registers it with the treasury.
    ///
    /// # Arguments
    /// * `ctx` - The context containing all accounts needed for initialization
    /// * `tranche_id` - Tranche identifier, also a PDA seed
    /// * `config` - Fees, limits, capacity and fee recipient
    ///
    /// # Errors
    /// Returns an error if:
    /// - Caller is not the treasury owner
    /// - A fee exceeds the maximum
    /// - The treasury already holds the maximum number of pools
    pub fn initialize_pool(
        ctx: Context<InitializePool>,
        tranche_id: u8,
        config: PoolConfig,
    ) -> Result<()> {
        instructions::initialize_pool::handler(ctx, tranche_id, config)
    }

    /// Queues a stake request for the current epoch.
    ///
    /// # Arguments
    /// * `ctx` - The context containing all accounts needed for staking
    /// * `amount` - Base tokens to deposit
    /// * `fee_payment` - Lamports forwarded to the fee recipient
    ///
    /// # Errors
    /// Returns an error if:
    /// - The pool is paused
    /// - Amount is below the minimum request
    /// - The fee payment is below the gas threshold
    /// - The deposit would exceed capacity
    pub fn stake(ctx: Context<Stake>, amount: u64, fee_payment: u64) -> Result<()> {
        instructions::stake::handler(ctx, amount, fee_payment)
    }

    /// Queues a withdraw request against the staked balance.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The pool is paused
    /// - Amount is below the minimum request or above the staked balance
    /// - The fee payment is below the gas threshold
    /// - The lockup has not elapsed
    pub fn withdraw_request(
        ctx: Context<WithdrawRequest>,
        amount: u64,
        fee_payment: u64,
    ) -> Result<()> {
        instructions::withdraw_request::handler(ctx, amount, fee_payment)
    }

    /// Pays out settled withdraw balance plus all pending reward.
    ///
    /// # Errors
    /// Returns an error if amount exceeds the withdrawable balance, or if
    /// amount is zero and there is no pending reward.
    pub fn withdraw(ctx: Context<Withdraw>, amount: u64) -> Result<()> {
        instructions::withdraw::handler(ctx, amount)
    }

    /// Claims pending reward without touching principal.
    pub fn claim_reward(ctx: Context<ClaimReward>) -> Result<()> {
        instructions::claim_reward::handler(ctx)
    }

    /// Returns the caller's claimable reward as return data.
    pub fn earned(ctx: Context<Earned>) -> Result<u64> {
        instructions::earned::handler(ctx)
    }

    /// Advances the treasury epoch by one.
    ///
    /// # Errors
    /// Returns an error if caller is not governance.
    pub fn update_epoch(ctx: Context<UpdateEpoch>) -> Result<()> {
        instructions::update_epoch::handler(ctx)
    }

    /// Settles queued stake requests. User records are passed as remaining
    /// accounts; records with nothing settleable are skipped.
    pub fn handle_stake_request<'info>(
        ctx: Context<'_, '_, 'info, 'info, HandleRequests<'info>>,
    ) -> Result<()> {
        instructions::handle_requests::handle_stake_request_handler(ctx)
    }

    /// Settles queued withdraw requests. User records are passed as
    /// remaining accounts.
    pub fn handle_withdraw_request<'info>(
        ctx: Context<'_, '_, 'info, 'info, HandleRequests<'info>>,
    ) -> Result<()> {
        instructions::handle_requests::handle_withdraw_request_handler(ctx)
    }

    /// Converts pool base tokens into the yield token through the venue.
    ///
    /// # Arguments
    /// * `amount_in` - Base tokens to spend
    /// * `min_out` - Minimum yield tokens accepted
    ///
    /// # Errors
    /// Returns an error if caller is not governance or the venue returns
    /// less than `min_out`.
    pub fn buy_yield<'info>(
        ctx: Context<'_, '_, 'info, 'info, Convert<'info>>,
        amount_in: u64,
        min_out: u64,
    ) -> Result<()> {
        instructions::convert::buy_handler(ctx, amount_in, min_out)
    }

    /// Converts pool yield tokens back into the base token through the venue.
    pub fn sell_yield<'info>(
        ctx: Context<'_, '_, 'info, 'info, Convert<'info>>,
        amount_in: u64,
        min_out: u64,
    ) -> Result<()> {
        instructions::convert::sell_handler(ctx, amount_in, min_out)
    }

    /// Moves base tokens from the treasury vault into a pool vault.
    pub fn send_pool_funds(ctx: Context<SendPoolFunds>, amount: u64) -> Result<()> {
        instructions::pool_funds::send_handler(ctx, amount)
    }

    /// Moves base tokens out of a pool vault to a governance-chosen account.
    pub fn withdraw_pool_funds(ctx: Context<WithdrawPoolFunds>, amount: u64) -> Result<()> {
        instructions::pool_funds::withdraw_handler(ctx, amount)
    }

    /// Moves reward from the treasury vault into a pool and credits it to
    /// staked users pro rata.
    ///
    /// # Errors
    /// Returns an error if:
    /// - Caller is not governance
    /// - The pool has no staked supply
    /// - The treasury vault holds less than `amount`
    pub fn allocate_reward(ctx: Context<AllocateReward>, amount: u64) -> Result<()> {
        instructions::allocate_reward::handler(ctx, amount)
    }

    /// Deposits base tokens from governance into the treasury vault.
    pub fn treasury_deposit(ctx: Context<TreasuryFunds>, amount: u64) -> Result<()> {
        instructions::treasury_funds::deposit_handler(ctx, amount)
    }

    /// Withdraws base tokens from the treasury vault to governance.
    pub fn treasury_withdraw(ctx: Context<TreasuryFunds>, amount: u64) -> Result<()> {
        instructions::treasury_funds::withdraw_handler(ctx, amount)
    }

    /// Owner function to set the lockup, in epochs.
    pub fn set_lock_up(ctx: Context<PoolAdmin>, lock_up: u64) -> Result<()> {
        instructions::admin::set_lock_up_handler(ctx, lock_up)
    }

    /// Owner function to set the pool capacity.
    pub fn set_capacity(ctx: Context<PoolAdmin>, capacity: u64) -> Result<()> {
        instructions::admin::set_capacity_handler(ctx, capacity)
    }

    /// Governance function to set the pool capacity.
    pub fn update_capacity(ctx: Context<GovernancePool>, capacity: u64) -> Result<()> {
        instructions::admin::update_capacity_handler(ctx, capacity)
    }

    /// Owner function to pause or unpause new requests.
    ///
    /// # Errors
    /// Returns an error if caller is not the pool owner.
    pub fn set_paused(ctx: Context<PoolAdmin>, paused: bool) -> Result<()> {
        instructions::admin::set_paused_handler(ctx, paused)
    }

    /// Owner function to adjust the three haircuts.
    ///
    /// # Arguments
    /// * `fee` - Withdraw payout fee (basis points)
    /// * `glp_in_fee` - Haircut on stake (basis points)
    /// * `glp_out_fee` - Haircut on withdraw request (basis points)
    ///
    /// # Errors
    /// Returns an error if:
    /// - Caller is not the pool owner
    /// - Any fee exceeds the maximum
    pub fn set_fees(
        ctx: Context<PoolAdmin>,
        fee: u16,
        glp_in_fee: u16,
        glp_out_fee: u16,
    ) -> Result<()> {
        instructions::admin::set_fees_handler(ctx, fee, glp_in_fee, glp_out_fee)
    }

    /// Owner function to set the lamport gas threshold and minimum request.
    pub fn set_request_limits(
        ctx: Context<PoolAdmin>,
        gas_threshold: u64,
        minimum_request: u64,
    ) -> Result<()> {
        instructions::admin::set_request_limits_handler(ctx, gas_threshold, minimum_request)
    }

    /// Owner function to change the fee recipient.
    pub fn set_fee_to(ctx: Context<PoolAdmin>, fee_to: Pubkey) -> Result<()> {
        instructions::admin::set_fee_to_handler(ctx, fee_to)
    }

    /// Owner function to hand governance to a new key.
    ///
    /// # Errors
    /// Returns an error if:
    /// - Caller is not the treasury owner
    /// - New governance is the default pubkey
    pub fn transfer_governance(
        ctx: Context<TreasuryAdmin>,
        new_governance: Pubkey,
    ) -> Result<()> {
        instructions::admin::transfer_governance_handler(ctx, new_governance)
    }
}
