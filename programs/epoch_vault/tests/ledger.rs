//! Multi-account ledger scenarios driven through the pool and treasury
//! state methods, the same calls the instruction handlers make.

use anchor_lang::prelude::Pubkey;
use epoch_vault::error::VaultError;
use epoch_vault::state::{HaircutTiming, StakingPool, Treasury, UserRecord};

const FEE: u16 = 300;

struct Harness {
    treasury: Treasury,
    pool: StakingPool,
    users: Vec<UserRecord>,
    now: i64,
}

impl Harness {
    fn new(users: usize) -> Self {
        let pool_key = Pubkey::new_unique();
        let mut treasury = Treasury::default();
        treasury.register_pool(pool_key).unwrap();

        let pool = StakingPool {
            fee: FEE,
            capacity: 10_000_000,
            fee_to: Pubkey::new_unique(),
            ..Default::default()
        };
        let users = (0..users)
            .map(|_| UserRecord {
                owner: Pubkey::new_unique(),
                pool: pool_key,
                ..Default::default()
            })
            .collect();

        Self {
            treasury,
            pool,
            users,
            now: 1_700_000_000,
        }
    }

    fn epoch(&self) -> u64 {
        self.treasury.epoch
    }

    fn advance(&mut self) {
        self.now += 3_600;
        self.treasury.advance_epoch(self.now).unwrap();
    }

    fn stake(&mut self, user: usize, amount: u64) -> u64 {
        let epoch = self.epoch();
        self.pool
            .record_stake(&mut self.users[user], amount, epoch, self.now)
            .unwrap()
    }

    fn withdraw_request(&mut self, user: usize, amount: u64) {
        let epoch = self.epoch();
        self.pool
            .record_withdraw_request(&mut self.users[user], amount, epoch, self.now)
            .unwrap();
    }

    /// Settles stake requests for `batch`, which may repeat entries.
    fn settle_stakes(&mut self, batch: &[usize]) -> usize {
        let epoch = self.epoch();
        batch
            .iter()
            .filter(|&&i| self.pool.settle_stake(&mut self.users[i], epoch).unwrap())
            .count()
    }

    fn settle_withdraws(&mut self, batch: &[usize]) -> usize {
        let epoch = self.epoch();
        batch
            .iter()
            .filter(|&&i| self.pool.settle_withdraw(&mut self.users[i], epoch).unwrap())
            .count()
    }

    fn assert_conserved(&self) {
        let sum = |f: fn(&UserRecord) -> u64| self.users.iter().map(f).sum::<u64>();
        assert_eq!(sum(|u| u.balance_wait), self.pool.total_supply_wait);
        assert_eq!(sum(|u| u.balance_staked), self.pool.total_supply_staked);
        assert_eq!(sum(|u| u.balance_withdraw), self.pool.total_supply_withdraw);
        assert_eq!(
            sum(|u| u.withdraw_request.amount),
            self.pool.total_withdraw_requested
        );
    }
}

fn error_code(err: anchor_lang::error::Error) -> u32 {
    match err {
        anchor_lang::error::Error::AnchorError(err) => err.error_code_number,
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn stake_settles_after_epoch_advance() {
    let mut h = Harness::new(1);

    assert_eq!(h.stake(0, 100), 97);
    assert_eq!(h.users[0].balance_wait, 97);

    // Same epoch: nothing settles.
    assert_eq!(h.settle_stakes(&[0]), 0);
    assert_eq!(h.users[0].balance_staked, 0);

    h.advance();
    assert_eq!(h.settle_stakes(&[0]), 1);
    assert_eq!(h.users[0].balance_wait, 0);
    assert_eq!(h.users[0].balance_staked, 97);
    h.assert_conserved();
}

#[test]
fn withdraw_flow_after_settlement() {
    let mut h = Harness::new(1);
    h.pool.glp_out_fee = 100;
    h.stake(0, 100);
    h.advance();
    h.settle_stakes(&[0]);

    h.withdraw_request(0, 60);
    assert_eq!(h.users[0].balance_staked, 37);
    h.assert_conserved();

    h.advance();
    assert_eq!(h.settle_withdraws(&[0]), 1);
    assert!(h.users[0].withdraw_request.is_empty());
    // 1% of 60 rounds down to nothing
    assert_eq!(h.users[0].balance_withdraw, 60);
    h.assert_conserved();

    let now = h.now;
    let payout = h.pool.record_withdraw(&mut h.users[0], 40, now).unwrap();
    assert_eq!(payout.principal, 39);
    assert_eq!(payout.fee, 1);
    assert_eq!(h.users[0].balance_withdraw, 20);
    h.assert_conserved();
}

#[test]
fn duplicate_batch_entries_settle_once() {
    let mut h = Harness::new(3);
    h.stake(0, 1_000);
    h.stake(1, 2_000);
    h.advance();
    h.stake(2, 500);

    // User 2 staked in the current epoch and must be left queued.
    assert_eq!(h.settle_stakes(&[0, 1, 0, 2, 1, 1]), 2);
    assert_eq!(h.users[0].balance_staked, 970);
    assert_eq!(h.users[1].balance_staked, 1_940);
    assert_eq!(h.users[2].balance_wait, 485);
    h.assert_conserved();

    // Re-running the whole batch in the same epoch is a no-op.
    assert_eq!(h.settle_stakes(&[0, 1, 2]), 0);
    h.assert_conserved();

    h.advance();
    assert_eq!(h.settle_stakes(&[2, 2]), 1);
    assert_eq!(h.pool.total_supply_staked, 970 + 1_940 + 485);
    h.assert_conserved();
}

#[test]
fn second_stake_before_settlement_rejected() {
    let mut h = Harness::new(1);
    h.stake(0, 100);
    h.advance();

    let epoch = h.epoch();
    let err = h
        .pool
        .record_stake(&mut h.users[0], 100, epoch, h.now)
        .unwrap_err();
    assert_eq!(error_code(err), u32::from(VaultError::PendingStakeNotSettled));

    h.settle_stakes(&[0]);
    h.stake(0, 100);
    assert_eq!(h.users[0].balance_wait, 97);
    assert_eq!(h.users[0].balance_staked, 97);
    h.assert_conserved();
}

#[test]
fn rewards_follow_staked_share_across_epochs() {
    let mut h = Harness::new(2);
    h.pool.fee = 0;
    h.stake(0, 600);
    h.advance();
    h.settle_stakes(&[0]);

    h.pool.credit_reward(60).unwrap();
    h.treasury.record_reward(60).unwrap();

    // User 1 joins later and only shares rewards credited after settling.
    h.stake(1, 200);
    h.advance();
    h.settle_stakes(&[1]);
    h.pool.credit_reward(80).unwrap();
    h.treasury.record_reward(80).unwrap();

    assert_eq!(h.pool.earned(&h.users[0]).unwrap(), 60 + 60);
    assert_eq!(h.pool.earned(&h.users[1]).unwrap(), 20);
    assert_eq!(h.treasury.total_rewards_allocated, 140);

    let now = h.now;
    assert_eq!(h.pool.record_claim(&mut h.users[1], now).unwrap(), 20);
    assert_eq!(h.pool.earned(&h.users[1]).unwrap(), 0);
    assert_eq!(h.users[1].total_rewards_claimed, 20);
    assert_eq!(h.pool.reward_reserve, 120);
    h.assert_conserved();
}

#[test]
fn settlement_timing_queues_gross_amount() {
    let mut h = Harness::new(2);
    h.pool.stake_haircut = HaircutTiming::AtSettlement;

    assert_eq!(h.stake(0, 100), 100);
    assert_eq!(h.stake(1, 1_000), 1_000);
    assert_eq!(h.pool.total_supply_wait, 1_100);
    h.assert_conserved();

    h.advance();
    h.settle_stakes(&[0, 1]);
    assert_eq!(h.users[0].balance_staked, 97);
    assert_eq!(h.users[1].balance_staked, 970);
    assert_eq!(h.pool.total_fees_retained, 33);
    h.assert_conserved();
}

#[test]
fn paused_pool_still_settles() {
    let mut h = Harness::new(1);
    h.stake(0, 100);
    h.pool.paused = true;
    h.advance();

    assert_eq!(h.settle_stakes(&[0]), 1);

    let epoch = h.epoch();
    let err = h
        .pool
        .record_withdraw_request(&mut h.users[0], 10, epoch, h.now)
        .unwrap_err();
    assert_eq!(error_code(err), u32::from(VaultError::PoolPaused));
    h.assert_conserved();
}

#[test]
fn conversion_totals_accumulate() {
    let mut h = Harness::new(0);
    h.pool.record_buy(1_000, 950).unwrap();
    h.treasury.record_buy(1_000, 950).unwrap();
    h.pool.record_sell(400, 410).unwrap();
    h.treasury.record_sell(400, 410).unwrap();

    assert_eq!(h.pool.base_converted_in, 1_000);
    assert_eq!(h.pool.yield_received, 950);
    assert_eq!(h.treasury.total_yield_converted_out, 400);
    assert_eq!(h.treasury.total_base_received, 410);
}
