//! Error types for the Epoch Vault program.
//!
//! ## Error Code Groups
//! - 6000-6005: Input validation errors
//! - 6006-6013: State/balance errors
//! - 6014-6016: Epoch/lock errors
//! - 6017-6018: Math/overflow errors
//! - 6019-6022: Authorization errors
//! - 6023-6028: Account validation errors

use anchor_lang::prelude::*;

/// Custom error codes for the Epoch Vault program.
///
/// Error codes start at 6000 (Anchor's custom error offset).
#[error_code]
pub enum VaultError {
    // ========== Input Validation Errors (6000-6005) ==========

    /// [6000] Operations on this pool are paused by its owner.
    #[msg("Pool is currently paused")]
    PoolPaused,

    /// [6001] Amount must be non-zero.
    #[msg("Amount must be greater than zero")]
    ZeroAmount,

    /// [6002] Request is smaller than the pool's minimum request.
    #[msg("Amount is below the pool minimum request")]
    BelowMinimumRequest,

    /// [6003] Attached operational fee is below the pool's gas threshold.
    #[msg("Fee payment is below the gas threshold")]
    FeePaymentTooLow,

    /// [6004] A configured haircut exceeds MAX_FEE_BPS.
    #[msg("Fee exceeds maximum allowed value of 1000 basis points (10%)")]
    FeeTooHigh,

    /// [6005] Treasury already administers MAX_POOLS pools.
    #[msg("Treasury pool limit reached")]
    TooManyPools,

    // ========== State/Balance Errors (6006-6013) ==========

    /// [6006] Stake would push the pool over its capacity.
    #[msg("Stake would exceed pool capacity")]
    CapacityExceeded,

    /// [6007] Not enough staked principal for the withdraw request.
    #[msg("Insufficient staked balance for this operation")]
    InsufficientStakedBalance,

    /// [6008] Not enough settled withdrawable balance.
    #[msg("Insufficient withdrawable balance")]
    InsufficientWithdrawBalance,

    /// [6009] Nothing to claim.
    #[msg("No rewards available to claim")]
    NoRewardsAvailable,

    /// [6010] Source token account cannot cover the transfer.
    #[msg("Insufficient funds in source account")]
    InsufficientFunds,

    /// [6011] Reward cannot be credited while nothing is staked.
    #[msg("Cannot credit reward while total staked supply is zero")]
    NoStakedSupply,

    /// [6012] Venue returned less than the caller's minimum output.
    #[msg("Conversion output below minimum")]
    SlippageExceeded,

    /// [6013] Venue pulled more than the requested input.
    #[msg("Conversion spent more than the requested input")]
    ConversionOverspent,

    // ========== Epoch/Lock Errors (6014-6016) ==========

    /// [6014] A stake request from an earlier epoch is still unsettled.
    #[msg("Previous stake request has not been settled")]
    PendingStakeNotSettled,

    /// [6015] A withdraw request from an earlier epoch is still unsettled.
    #[msg("Previous withdraw request has not been settled")]
    PendingWithdrawNotSettled,

    /// [6016] Staked principal is still inside its lockup window.
    #[msg("Lockup has not elapsed - cannot request withdrawal yet")]
    LockUpNotElapsed,

    // ========== Math/Overflow Errors (6017-6018) ==========

    /// [6017] Arithmetic overflow occurred during calculation.
    #[msg("Arithmetic overflow occurred during calculation")]
    MathOverflow,

    /// [6018] Arithmetic underflow occurred during calculation.
    #[msg("Arithmetic underflow occurred during calculation")]
    MathUnderflow,

    // ========== Authorization Errors (6019-6022) ==========

    /// [6019] Caller is not the treasury governance.
    #[msg("Unauthorized: caller is not governance")]
    NotGovernance,

    /// [6020] Caller is not the owner.
    #[msg("Unauthorized: caller is not the owner")]
    NotOwner,

    /// [6021] Signer does not own this user record.
    #[msg("Unauthorized: signer does not own this record")]
    NotRecordOwner,

    /// [6022] New authority is the zero address.
    #[msg("Authority must not be the default pubkey")]
    InvalidAuthority,

    // ========== Account Validation Errors (6023-6028) ==========

    /// [6023] Token account mint does not match the expected mint.
    #[msg("Token mint mismatch")]
    MintMismatch,

    /// [6024] Vault address does not match the one stored on the pool.
    #[msg("Vault address mismatch")]
    VaultMismatch,

    /// [6025] Pool is not administered by this treasury.
    #[msg("Pool does not belong to this treasury")]
    TreasuryMismatch,

    /// [6026] User record does not belong to this pool.
    #[msg("User record does not belong to this pool")]
    PoolMismatch,

    /// [6027] Fee recipient does not match pool.fee_to.
    #[msg("Fee recipient mismatch")]
    FeeRecipientMismatch,

    /// [6028] Venue program does not match treasury.venue_program.
    #[msg("Conversion venue mismatch")]
    VenueMismatch,
}
