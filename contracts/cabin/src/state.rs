use cosmwasm_schema::cw_serde;

use crate::asset::Asset;
use cosmwasm_std::{Addr, Timestamp, Uint128};
use cw_storage_plus::{Item, Map};

#[cw_serde]
pub struct Config {
    pub native_denom: String,
    /// Max lock time in seconds, unbounded when unset
    pub max_lock_time: Option<u64>,
}

/// Ledger counters, updated in the same call as the retreat they count.
#[cw_serde]
#[derive(Default)]
pub struct Counters {
    /// Next retreat id, also the number of retreats ever created
    pub next_id: u64,
    pub active: u64,
}

#[cw_serde]
pub struct Retreat {
    pub owner: Addr,
    pub asset: Asset,
    pub amount: Uint128,
    pub create: Timestamp,
    pub return_time: Timestamp,
    pub active: bool,
}

impl Retreat {
    pub fn can_return(&self, now: Timestamp) -> bool {
        self.active && now >= self.return_time
    }

    /// Seconds left until the return time, rounded up so that it only
    /// reaches zero once the retreat can return.
    pub fn time_until_return(&self, now: Timestamp) -> u64 {
        let nanos = self.return_time.nanos().saturating_sub(now.nanos());
        nanos / NANOS_PER_SECOND + u64::from(nanos % NANOS_PER_SECOND != 0)
    }
}

const NANOS_PER_SECOND: u64 = 1_000_000_000;

pub const CONFIG: Item<Config> = Item::new("config");
pub const COUNTERS: Item<Counters> = Item::new("counters");
pub const RETREATS: Map<u64, Retreat> = Map::new("retreats");
/// Retreat ids by owner, for listing
pub const OWNER_RETREATS: Map<(&Addr, u64), ()> = Map::new("owner_retreats");
