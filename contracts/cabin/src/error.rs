use cosmwasm_std::{StdError, Timestamp};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("Unauthorized")]
    Unauthorized {},

    #[error("Invalid amount: send exactly the amount to lock")]
    InvalidAmount {},

    #[error("Duration must be greater than zero")]
    InvalidDuration {},

    #[error("Duration is higher than max lock time {max}")]
    DurationTooLong { max: u64 },

    #[error("Retreat {id} not found")]
    NotFound { id: u64 },

    #[error("Retreat is locked until {return_time}")]
    StillLocked { return_time: Timestamp },

    #[error("Retreat {id} already returned")]
    AlreadyWithdrawn { id: u64 },

    #[error("Token transfer failed: {reason}")]
    TransferFailed { reason: String },

    #[error("Invalid config: {reason}")]
    InvalidConfig { reason: String },
}
