//! Program constants for the Epoch Vault program.
//!
//! PDA seeds, basis-point math, and the bounds applied to pool configuration.

/// Seed for deriving the treasury PDA
pub const TREASURY_SEED: &[u8] = b"treasury";

/// Seed for deriving the treasury token vault PDA
pub const TREASURY_VAULT_SEED: &[u8] = b"treasury_vault";

/// Seed for deriving staking pool PDAs (one per tranche)
pub const STAKING_POOL_SEED: &[u8] = b"staking_pool";

/// Seed for deriving a pool's base-asset vault PDA
pub const POOL_VAULT_SEED: &[u8] = b"pool_vault";

/// Seed for deriving a pool's yield-asset vault PDA
pub const YIELD_VAULT_SEED: &[u8] = b"yield_vault";

/// Seed for deriving per-account user record PDAs
pub const USER_RECORD_SEED: &[u8] = b"user_record";

/// Basis points denominator (100% = 10000 basis points)
pub const BASIS_POINTS_DENOMINATOR: u64 = 10_000;

/// Maximum for any single haircut (10% = 1000 basis points)
pub const MAX_FEE_BPS: u16 = 1_000;

/// Precision multiplier for the reward-per-share accumulator
pub const PRECISION: u128 = 1_000_000_000_000; // 10^12

/// Maximum number of tranches a treasury administers
pub const MAX_POOLS: usize = 4;

/// Computes `amount * bps / 10000`, rounded down.
pub fn bps_of(amount: u64, bps: u16) -> Option<u64> {
    let part = (amount as u128)
        .checked_mul(bps as u128)?
        .checked_div(BASIS_POINTS_DENOMINATOR as u128)?;
    u64::try_from(part).ok()
}
