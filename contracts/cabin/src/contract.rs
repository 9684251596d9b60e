use cosmwasm_std::{
    entry_point, from_binary, to_binary, Addr, Binary, Deps, DepsMut, Env, MessageInfo, Order,
    Response, StdError, StdResult, Storage, Timestamp, Uint128, WasmMsg,
};

use crate::asset::{must_pay_native, Asset};
use crate::error::ContractError;
use crate::msg::{
    CanReturnResponse, ConfigResponse, CountResponse, ExecuteMsg, InstantiateMsg, QueryMsg,
    ReceiveMsg, RetreatResponse, RetreatsResponse, TimeUntilReturnResponse,
};
use crate::state::{Config, Counters, Retreat, CONFIG, COUNTERS, OWNER_RETREATS, RETREATS};

use cw2::set_contract_version;
use cw20::{AllowanceResponse, BalanceResponse, Cw20ExecuteMsg, Cw20QueryMsg, Cw20ReceiveMsg};
use cw_storage_plus::Bound;

// version info for migration info
const CONTRACT_NAME: &str = "crates.io:cw-cabin";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_LIMIT: u32 = 10;
const MAX_LIMIT: u32 = 30;

// return times must fit in a nanosecond Timestamp
const MAX_RETURN_SECONDS: u64 = u64::MAX / 1_000_000_000 - 1;

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    if msg.native_denom.is_empty() {
        return Err(ContractError::InvalidConfig {
            reason: "native_denom is empty".into(),
        });
    }
    if msg.max_lock_time == Some(0) {
        return Err(ContractError::InvalidConfig {
            reason: "max_lock_time must be greater than zero".into(),
        });
    }

    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let config = Config {
        native_denom: msg.native_denom,
        max_lock_time: msg.max_lock_time,
    };
    CONFIG.save(deps.storage, &config)?;
    COUNTERS.save(deps.storage, &Counters::default())?;

    let res = Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("native_denom", config.native_denom);
    Ok(res)
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::RetreatWithNative { duration, amount } => {
            try_retreat_native(deps, env, info, duration, amount)
        }
        ExecuteMsg::RetreatWithToken {
            token,
            amount,
            duration,
        } => try_retreat_token(deps, env, info, token, amount, duration),
        ExecuteMsg::ReturnToSociety { id } => try_return(deps, env, info, id),
        ExecuteMsg::Receive(msg) => try_receive(deps, env, info, msg),
    }
}

pub fn try_retreat_native(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    duration: u64,
    amount: Option<Uint128>,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    let paid =
        must_pay_native(&info.funds, &config.native_denom).ok_or(ContractError::InvalidAmount {})?;
    if amount.map_or(false, |amount| amount != paid) {
        return Err(ContractError::InvalidAmount {});
    }

    let retreat = new_retreat(&config, &env, info.sender, Asset::Native, paid, duration)?;
    let id = save_retreat(deps.storage, &retreat)?;

    Ok(retreat_response("retreat", id, &retreat))
}

pub fn try_retreat_token(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    token: String,
    amount: Uint128,
    duration: u64,
) -> Result<Response, ContractError> {
    if !info.funds.is_empty() {
        return Err(ContractError::InvalidAmount {});
    }

    let config = CONFIG.load(deps.storage)?;
    let token = deps.api.addr_validate(&token)?;
    let retreat = new_retreat(
        &config,
        &env,
        info.sender,
        Asset::Token(token.clone()),
        amount,
        duration,
    )?;

    // funds must be pullable before anything is recorded
    verify_pull(deps.as_ref(), &env, &token, &retreat.owner, amount)?;
    let id = save_retreat(deps.storage, &retreat)?;

    // the transfer runs in the same transaction, a failure reverts the retreat
    let pull = WasmMsg::Execute {
        contract_addr: token.into(),
        msg: to_binary(&Cw20ExecuteMsg::TransferFrom {
            owner: retreat.owner.to_string(),
            recipient: env.contract.address.into(),
            amount,
        })?,
        funds: vec![],
    };

    Ok(retreat_response("retreat", id, &retreat).add_message(pull))
}

pub fn try_receive(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    wrapper: Cw20ReceiveMsg,
) -> Result<Response, ContractError> {
    if !info.funds.is_empty() {
        return Err(ContractError::InvalidAmount {});
    }

    let msg: ReceiveMsg = from_binary(&wrapper.msg)?;
    let owner = deps.api.addr_validate(&wrapper.sender)?;
    match msg {
        ReceiveMsg::Retreat { duration } => {
            let config = CONFIG.load(deps.storage)?;
            // the cw20 contract (sender) already moved the tokens to us
            let retreat = new_retreat(
                &config,
                &env,
                owner,
                Asset::Token(info.sender),
                wrapper.amount,
                duration,
            )?;
            let id = save_retreat(deps.storage, &retreat)?;
            Ok(retreat_response("retreat", id, &retreat))
        }
    }
}

pub fn try_return(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    id: u64,
) -> Result<Response, ContractError> {
    let mut retreat = load_retreat(deps.storage, id)?;

    if !retreat.active {
        return Err(ContractError::AlreadyWithdrawn { id });
    }
    if info.sender != retreat.owner {
        return Err(ContractError::Unauthorized {});
    }
    if env.block.time < retreat.return_time {
        return Err(ContractError::StillLocked {
            return_time: retreat.return_time,
        });
    }

    // flip state first, funds leave only through the returned message
    retreat.active = false;
    RETREATS.save(deps.storage, id, &retreat)?;
    COUNTERS.update(deps.storage, |mut counters| -> StdResult<_> {
        counters.active = counters
            .active
            .checked_sub(1)
            .ok_or_else(|| StdError::generic_err("active retreats underflow"))?;
        Ok(counters)
    })?;

    let config = CONFIG.load(deps.storage)?;
    let release = retreat
        .asset
        .transfer_msg(&config.native_denom, &retreat.owner, retreat.amount)?;

    Ok(retreat_response("return_to_society", id, &retreat).add_message(release))
}

fn new_retreat(
    config: &Config,
    env: &Env,
    owner: Addr,
    asset: Asset,
    amount: Uint128,
    duration: u64,
) -> Result<Retreat, ContractError> {
    if amount.is_zero() {
        return Err(ContractError::InvalidAmount {});
    }

    Ok(Retreat {
        owner,
        asset,
        amount,
        create: env.block.time,
        return_time: return_time(config, env.block.time, duration)?,
        active: true,
    })
}

fn return_time(config: &Config, now: Timestamp, duration: u64) -> Result<Timestamp, ContractError> {
    if duration == 0 {
        return Err(ContractError::InvalidDuration {});
    }
    if let Some(max) = config.max_lock_time {
        if duration > max {
            return Err(ContractError::DurationTooLong { max });
        }
    }

    match now.seconds().checked_add(duration) {
        Some(seconds) if seconds <= MAX_RETURN_SECONDS => Ok(now.plus_seconds(duration)),
        _ => Err(ContractError::InvalidDuration {}),
    }
}

/// Stores a new retreat under the next id and bumps both counters.
fn save_retreat(storage: &mut dyn Storage, retreat: &Retreat) -> Result<u64, ContractError> {
    let mut counters = COUNTERS.load(storage)?;
    let id = counters.next_id;

    // try to store it, fail if the id was already in use
    RETREATS.update(storage, id, |existing| match existing {
        None => Ok(retreat.clone()),
        Some(_) => Err(StdError::generic_err(format!("retreat id {} in use", id))),
    })?;
    OWNER_RETREATS.save(storage, (&retreat.owner, id), &())?;

    counters.next_id += 1;
    counters.active += 1;
    COUNTERS.save(storage, &counters)?;

    Ok(id)
}

fn verify_pull(
    deps: Deps,
    env: &Env,
    token: &Addr,
    owner: &Addr,
    amount: Uint128,
) -> Result<(), ContractError> {
    let transfer_failed = |reason: String| ContractError::TransferFailed { reason };

    let allowance: AllowanceResponse = deps
        .querier
        .query_wasm_smart(
            token,
            &Cw20QueryMsg::Allowance {
                owner: owner.into(),
                spender: env.contract.address.to_string(),
            },
        )
        .map_err(|e| transfer_failed(e.to_string()))?;
    if allowance.expires.is_expired(&env.block) {
        return Err(transfer_failed("allowance expired".into()));
    }
    if allowance.allowance < amount {
        return Err(transfer_failed(format!(
            "allowance {} is lower than {}",
            allowance.allowance, amount
        )));
    }

    let balance: BalanceResponse = deps
        .querier
        .query_wasm_smart(
            token,
            &Cw20QueryMsg::Balance {
                address: owner.into(),
            },
        )
        .map_err(|e| transfer_failed(e.to_string()))?;
    if balance.balance < amount {
        return Err(transfer_failed(format!(
            "balance {} is lower than {}",
            balance.balance, amount
        )));
    }

    Ok(())
}

fn retreat_response(action: &str, id: u64, retreat: &Retreat) -> Response {
    Response::new()
        .add_attribute("action", action)
        .add_attribute("retreat_id", id.to_string())
        .add_attribute("owner", &retreat.owner)
        .add_attribute("asset", retreat.asset.to_string())
        .add_attribute("amount", retreat.amount)
        .add_attribute("return_time", retreat.return_time.to_string())
}

fn load_retreat(storage: &dyn Storage, id: u64) -> Result<Retreat, ContractError> {
    RETREATS
        .may_load(storage, id)?
        .ok_or(ContractError::NotFound { id })
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> Result<Binary, ContractError> {
    let res = match msg {
        QueryMsg::Config {} => to_binary(&query_config(deps)?),
        QueryMsg::Retreat { id } => to_binary(&query_retreat(deps, id)?),
        QueryMsg::TimeUntilReturn { id } => to_binary(&query_time_until_return(deps, env, id)?),
        QueryMsg::CanReturn { id } => to_binary(&query_can_return(deps, env, id)?),
        QueryMsg::ActiveRetreats {} => to_binary(&CountResponse {
            count: COUNTERS.load(deps.storage)?.active,
        }),
        QueryMsg::TotalRetreats {} => to_binary(&CountResponse {
            count: COUNTERS.load(deps.storage)?.next_id,
        }),
        QueryMsg::RetreatsByOwner {
            owner,
            start_after,
            limit,
        } => to_binary(&query_retreats_by_owner(deps, owner, start_after, limit)?),
    };
    Ok(res?)
}

fn query_config(deps: Deps) -> StdResult<ConfigResponse> {
    let config = CONFIG.load(deps.storage)?;
    Ok(ConfigResponse {
        native_denom: config.native_denom,
        max_lock_time: config.max_lock_time,
    })
}

fn query_retreat(deps: Deps, id: u64) -> Result<RetreatResponse, ContractError> {
    let retreat = load_retreat(deps.storage, id)?;
    Ok(to_retreat_info(id, retreat))
}

fn query_time_until_return(
    deps: Deps,
    env: Env,
    id: u64,
) -> Result<TimeUntilReturnResponse, ContractError> {
    let retreat = load_retreat(deps.storage, id)?;
    let seconds = if retreat.active {
        retreat.time_until_return(env.block.time)
    } else {
        0
    };
    Ok(TimeUntilReturnResponse { seconds })
}

fn query_can_return(deps: Deps, env: Env, id: u64) -> Result<CanReturnResponse, ContractError> {
    let retreat = load_retreat(deps.storage, id)?;
    Ok(CanReturnResponse {
        can_return: retreat.can_return(env.block.time),
    })
}

fn query_retreats_by_owner(
    deps: Deps,
    owner: String,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> StdResult<RetreatsResponse> {
    let owner_addr = deps.api.addr_validate(&owner)?;
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let start = start_after.map(Bound::exclusive);

    let retreats: StdResult<Vec<_>> = OWNER_RETREATS
        .prefix(&owner_addr)
        .keys(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|id| {
            let id = id?;
            let retreat = RETREATS.load(deps.storage, id)?;
            Ok(to_retreat_info(id, retreat))
        })
        .collect();

    Ok(RetreatsResponse {
        retreats: retreats?,
    })
}

fn to_retreat_info(id: u64, retreat: Retreat) -> RetreatResponse {
    RetreatResponse {
        id,
        owner: retreat.owner,
        asset: retreat.asset,
        amount: retreat.amount,
        return_time: retreat.return_time,
        active: retreat.active,
    }
}
