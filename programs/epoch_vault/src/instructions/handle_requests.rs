//! Batch settlement instruction handlers.
//!
//! Governance settles queued stake or withdraw requests for a list of user
//! records passed as remaining accounts.
//!
//! ## Batch Semantics
//! - Requests from the current epoch are skipped, never settled
//! - Entries that are not writable user records of this pool are skipped
//! - Each record is written back before the next entry is read, so repeated
//!   and duplicate entries are no-ops

use anchor_lang::prelude::*;
use anchor_lang::AccountsExit;

use crate::constants::*;
use crate::error::VaultError;
use crate::events::RequestsSettled;
use crate::state::{StakingPool, Treasury, UserRecord};

#[derive(Accounts)]
pub struct HandleRequests<'info> {
    pub governance: Signer<'info>,

    #[account(
        seeds = [TREASURY_SEED, treasury.base_mint.as_ref()],
        bump = treasury.bump,
        has_one = governance @ VaultError::NotGovernance
    )]
    pub treasury: Account<'info, Treasury>,

    #[account(
        mut,
        seeds = [STAKING_POOL_SEED, treasury.key().as_ref(), &[staking_pool.tranche_id]],
        bump = staking_pool.bump,
        has_one = treasury @ VaultError::TreasuryMismatch,
        constraint = treasury.administers(&staking_pool.key()) @ VaultError::TreasuryMismatch
    )]
    pub staking_pool: Account<'info, StakingPool>,
}

type Settle = fn(&mut StakingPool, &mut UserRecord, u64) -> Result<bool>;

pub fn handle_stake_request_handler<'info>(
    ctx: Context<'_, '_, 'info, 'info, HandleRequests<'info>>,
) -> Result<()> {
    settle_batch(ctx, true, StakingPool::settle_stake)
}

pub fn handle_withdraw_request_handler<'info>(
    ctx: Context<'_, '_, 'info, 'info, HandleRequests<'info>>,
) -> Result<()> {
    settle_batch(ctx, false, StakingPool::settle_withdraw)
}

/// Outcome of one remaining-account entry in a settlement batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum BatchEntry {
    Settled,
    NotWritable,
    NotRecord,
    OtherPool,
    NotDue,
}

/// Settles a single batch entry and writes the record back when it changed.
pub(crate) fn settle_entry<'info>(
    pool: &mut StakingPool,
    pool_key: &Pubkey,
    info: &'info AccountInfo<'info>,
    epoch: u64,
    settle: Settle,
    program_id: &Pubkey,
) -> Result<BatchEntry> {
    if !info.is_writable {
        return Ok(BatchEntry::NotWritable);
    }
    let mut record = match Account::<UserRecord>::try_from(info) {
        Ok(record) => record,
        Err(_) => return Ok(BatchEntry::NotRecord),
    };
    if record.pool != *pool_key {
        return Ok(BatchEntry::OtherPool);
    }
    if !settle(pool, &mut *record, epoch)? {
        return Ok(BatchEntry::NotDue);
    }
    record.exit(program_id)?;
    Ok(BatchEntry::Settled)
}

fn settle_batch<'info>(
    ctx: Context<'_, '_, 'info, 'info, HandleRequests<'info>>,
    is_stake: bool,
    settle: Settle,
) -> Result<()> {
    let epoch = ctx.accounts.treasury.epoch;
    let pool_key = ctx.accounts.staking_pool.key();
    let pool: &mut StakingPool = &mut ctx.accounts.staking_pool;

    let mut settled: u32 = 0;
    let mut skipped: u32 = 0;

    for info in ctx.remaining_accounts.iter() {
        match settle_entry(pool, &pool_key, info, epoch, settle, ctx.program_id)? {
            BatchEntry::Settled => settled += 1,
            outcome => {
                msg!("Skipping {}: {:?}", info.key(), outcome);
                skipped += 1;
            }
        }
    }

    msg!(
        "Settled {} {} requests at epoch {} ({} skipped)",
        settled,
        if is_stake { "stake" } else { "withdraw" },
        epoch,
        skipped
    );
    msg!(
        "Pool totals - wait: {}, staked: {}, withdrawable: {}",
        pool.total_supply_wait,
        pool.total_supply_staked,
        pool.total_supply_withdraw
    );

    emit!(RequestsSettled {
        pool: pool_key,
        epoch,
        is_stake,
        settled,
        skipped,
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Request;

    const LAMPORTS: u64 = 1_000_000;

    fn record_data(pool: Pubkey) -> Vec<u8> {
        let record = UserRecord {
            owner: Pubkey::new_unique(),
            pool,
            balance_wait: 100,
            stake_request: Request {
                amount: 100,
                request_epoch: 0,
                request_timestamp: 0,
            },
            ..Default::default()
        };
        let mut data = Vec::with_capacity(UserRecord::LEN);
        record.try_serialize(&mut data).unwrap();
        data.resize(UserRecord::LEN, 0);
        data
    }

    fn read_record(info: &AccountInfo) -> UserRecord {
        let data = info.try_borrow_data().unwrap();
        UserRecord::try_deserialize(&mut &data[..]).unwrap()
    }

    #[test]
    fn mixed_batch_settles_only_valid_entries() {
        let program_id = crate::ID;
        let pool_key = Pubkey::new_unique();
        let mut pool = StakingPool {
            total_supply_wait: 300,
            ..Default::default()
        };

        let (k0, k1, k2, k3) = (
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            Pubkey::new_unique(),
        );
        let (mut l0, mut l1, mut l2, mut l3) = (LAMPORTS, LAMPORTS, LAMPORTS, LAMPORTS);
        let mut d0 = record_data(pool_key);
        let mut d1 = record_data(Pubkey::new_unique());
        let mut d2 = record_data(pool_key);
        let mut d3 = vec![7u8; UserRecord::LEN];

        let due = AccountInfo::new(&k0, false, true, &mut l0, &mut d0, &program_id, false, 0);
        let other_pool = AccountInfo::new(&k1, false, true, &mut l1, &mut d1, &program_id, false, 0);
        let read_only = AccountInfo::new(&k2, false, false, &mut l2, &mut d2, &program_id, false, 0);
        let not_record = AccountInfo::new(&k3, false, true, &mut l3, &mut d3, &program_id, false, 0);

        let entries = vec![
            due.clone(),
            other_pool,
            read_only,
            not_record,
            due.clone(),
        ];
        let outcomes: Vec<BatchEntry> = entries
            .iter()
            .map(|info| {
                settle_entry(
                    &mut pool,
                    &pool_key,
                    info,
                    1,
                    StakingPool::settle_stake,
                    &program_id,
                )
                .unwrap()
            })
            .collect();

        assert_eq!(
            outcomes,
            vec![
                BatchEntry::Settled,
                BatchEntry::OtherPool,
                BatchEntry::NotWritable,
                BatchEntry::NotRecord,
                BatchEntry::NotDue,
            ]
        );
        let settled = outcomes.iter().filter(|o| **o == BatchEntry::Settled).count();
        assert_eq!(settled, 1);
        assert_eq!(outcomes.len() - settled, 4);

        let record = read_record(&due);
        assert_eq!(record.balance_wait, 0);
        assert_eq!(record.balance_staked, 100);
        assert!(record.stake_request.is_empty());
        assert_eq!(pool.total_supply_wait, 200);
        assert_eq!(pool.total_supply_staked, 100);

        let untouched = read_record(&entries[2]);
        assert_eq!(untouched.balance_wait, 100);
        assert_eq!(untouched.balance_staked, 0);
        assert_eq!(read_record(&entries[1]).stake_request.amount, 100);
    }

    #[test]
    fn current_epoch_entry_is_left_queued() {
        let program_id = crate::ID;
        let pool_key = Pubkey::new_unique();
        let mut pool = StakingPool {
            total_supply_wait: 100,
            ..Default::default()
        };

        let key = Pubkey::new_unique();
        let mut lamports = LAMPORTS;
        let mut data = record_data(pool_key);
        let info = AccountInfo::new(&key, false, true, &mut lamports, &mut data, &program_id, false, 0);
        let entries = vec![info];

        let outcome = settle_entry(
            &mut pool,
            &pool_key,
            &entries[0],
            0,
            StakingPool::settle_stake,
            &program_id,
        )
        .unwrap();
        assert_eq!(outcome, BatchEntry::NotDue);
        assert_eq!(read_record(&entries[0]).balance_wait, 100);
        assert_eq!(pool.total_supply_wait, 100);
    }
}
