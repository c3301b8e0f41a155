//! Cross-program call into the external conversion venue.
//!
//! The venue exposes two Anchor-style instructions, `buy` and `sell`, each
//! taking `(amount_in: u64, min_out: u64)` and the accounts
//! `[authority, source, destination, token_program, ..extra]`. The venue must
//! fail when it cannot deliver `min_out`; callers re-check the destination
//! balance after the call returns.

use anchor_lang::prelude::*;
use anchor_lang::solana_program::hash::hash;
use anchor_lang::solana_program::instruction::{AccountMeta, Instruction};
use anchor_lang::solana_program::program::invoke_signed;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Base asset in, yield asset out.
    Buy,
    /// Yield asset in, base asset out.
    Sell,
}

impl Direction {
    fn name(&self) -> &'static str {
        match self {
            Direction::Buy => "buy",
            Direction::Sell => "sell",
        }
    }

    /// First 8 bytes of `sha256("global:<name>")`.
    pub fn sighash(&self) -> [u8; 8] {
        let preimage = format!("global:{}", self.name());
        let mut out = [0u8; 8];
        out.copy_from_slice(&hash(preimage.as_bytes()).to_bytes()[..8]);
        out
    }
}

pub fn instruction_data(direction: Direction, amount_in: u64, min_out: u64) -> Vec<u8> {
    let mut data = Vec::with_capacity(24);
    data.extend_from_slice(&direction.sighash());
    data.extend_from_slice(&amount_in.to_le_bytes());
    data.extend_from_slice(&min_out.to_le_bytes());
    data
}

/// Accounts handed to the venue.
pub struct VenueAccounts<'a, 'info> {
    pub venue_program: &'a AccountInfo<'info>,
    pub authority: &'a AccountInfo<'info>,
    pub source: &'a AccountInfo<'info>,
    pub destination: &'a AccountInfo<'info>,
    pub token_program: &'a AccountInfo<'info>,
    pub extra: &'a [AccountInfo<'info>],
}

/// Invokes the venue with `authority` signing through `signer_seeds`.
pub fn convert(
    accounts: VenueAccounts<'_, '_>,
    direction: Direction,
    amount_in: u64,
    min_out: u64,
    signer_seeds: &[&[&[u8]]],
) -> Result<()> {
    let mut metas = vec![
        AccountMeta::new_readonly(accounts.authority.key(), true),
        AccountMeta::new(accounts.source.key(), false),
        AccountMeta::new(accounts.destination.key(), false),
        AccountMeta::new_readonly(accounts.token_program.key(), false),
    ];
    let mut infos = vec![
        accounts.authority.clone(),
        accounts.source.clone(),
        accounts.destination.clone(),
        accounts.token_program.clone(),
    ];
    for extra in accounts.extra {
        metas.push(if extra.is_writable {
            AccountMeta::new(extra.key(), extra.is_signer)
        } else {
            AccountMeta::new_readonly(extra.key(), extra.is_signer)
        });
        infos.push(extra.clone());
    }
    infos.push(accounts.venue_program.clone());

    let ix = Instruction {
        program_id: accounts.venue_program.key(),
        accounts: metas,
        data: instruction_data(direction, amount_in, min_out),
    };
    invoke_signed(&ix, &infos, signer_seeds)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instruction_data_layout() {
        let data = instruction_data(Direction::Sell, 7, 5);
        assert_eq!(data.len(), 24);
        assert_eq!(&data[..8], &Direction::Sell.sighash());
        assert_eq!(&data[8..16], &7u64.to_le_bytes());
        assert_eq!(&data[16..], &5u64.to_le_bytes());
        assert_ne!(Direction::Buy.sighash(), Direction::Sell.sighash());
    }
}
