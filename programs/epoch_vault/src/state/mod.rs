//! State structures for the Epoch Vault program.
//!
//! This module defines all account structures used to store program state.

pub mod staking_pool;
pub mod treasury;
pub mod user_record;

pub use staking_pool::*;
pub use treasury::*;
pub use user_record::*;
