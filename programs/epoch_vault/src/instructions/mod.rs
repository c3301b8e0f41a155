//! Instruction handlers for the Epoch Vault program.
//!
//! This module contains all instruction implementations.

pub mod admin;
pub mod allocate_reward;
pub mod claim_reward;
pub mod convert;
pub mod earned;
pub mod handle_requests;
pub mod initialize_pool;
pub mod initialize_treasury;
pub mod pool_funds;
pub mod stake;
pub mod treasury_funds;
pub mod update_epoch;
pub mod withdraw;
pub mod withdraw_request;

pub use admin::*;
pub use allocate_reward::*;
pub use claim_reward::*;
pub use convert::*;
pub use earned::*;
pub use handle_requests::*;
pub use initialize_pool::*;
pub use initialize_treasury::*;
pub use pool_funds::*;
pub use stake::*;
pub use treasury_funds::*;
pub use update_epoch::*;
pub use withdraw::*;
pub use withdraw_request::*;
