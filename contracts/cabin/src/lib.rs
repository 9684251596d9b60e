pub mod asset;
pub mod contract;
mod error;
pub mod msg;
pub mod state;

mod mock;

pub use crate::error::ContractError;
