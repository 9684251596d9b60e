use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Timestamp, Uint128};
use cw20::Cw20ReceiveMsg;

use crate::asset::Asset;

#[cw_serde]
pub struct InstantiateMsg {
    /// Native coin accepted by RetreatWithNative
    pub native_denom: String,
    /// Max lock time in seconds
    pub max_lock_time: Option<u64>,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Lock the attached native coins for `duration` seconds.
    /// If `amount` is set it must match the attached funds.
    RetreatWithNative {
        duration: u64,
        amount: Option<Uint128>,
    },
    /// Pull `amount` cw20 tokens from the sender (requires a previous allowance)
    /// and lock them for `duration` seconds
    RetreatWithToken {
        token: String,
        amount: Uint128,
        duration: u64,
    },
    /// Release a retreat to its owner once the return time is reached
    ReturnToSociety { id: u64 },
    /// This accepts a properly-encoded ReceiveMsg from a cw20 contract
    Receive(Cw20ReceiveMsg),
}

#[cw_serde]
pub enum ReceiveMsg {
    Retreat { duration: u64 },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(ConfigResponse)]
    Config {},
    /// Returns the retreat info
    #[returns(RetreatResponse)]
    Retreat { id: u64 },
    /// Seconds left until the retreat can return, 0 if matured or inactive
    #[returns(TimeUntilReturnResponse)]
    TimeUntilReturn { id: u64 },
    #[returns(CanReturnResponse)]
    CanReturn { id: u64 },
    #[returns(CountResponse)]
    ActiveRetreats {},
    #[returns(CountResponse)]
    TotalRetreats {},
    /// Returns the retreats of an owner, ordered by id. Supports pagination.
    #[returns(RetreatsResponse)]
    RetreatsByOwner {
        owner: String,
        start_after: Option<u64>,
        limit: Option<u32>,
    },
}

#[cw_serde]
pub struct ConfigResponse {
    pub native_denom: String,
    pub max_lock_time: Option<u64>,
}

#[cw_serde]
pub struct RetreatResponse {
    pub id: u64,
    pub owner: Addr,
    pub asset: Asset,
    pub amount: Uint128,
    pub return_time: Timestamp,
    pub active: bool,
}

#[cw_serde]
pub struct TimeUntilReturnResponse {
    pub seconds: u64,
}

#[cw_serde]
pub struct CanReturnResponse {
    pub can_return: bool,
}

#[cw_serde]
pub struct CountResponse {
    pub count: u64,
}

#[cw_serde]
pub struct RetreatsResponse {
    pub retreats: Vec<RetreatResponse>,
}
