#![cfg(test)]

use std::marker::PhantomData;

use cosmwasm_std::testing::{MockApi, MockStorage};
use cosmwasm_std::{
    from_binary, from_slice, to_binary, Empty, OwnedDeps, Querier, QuerierResult, QueryRequest,
    SystemError, SystemResult, Uint128, WasmQuery,
};
use cw20::{AllowanceResponse, BalanceResponse, Cw20QueryMsg, Expiration};

/// Dependencies whose querier answers as the cw20 contract `token`.
pub fn mock_dependencies_cw20(
    token: &str,
    allowance: Uint128,
    balance: Uint128,
) -> OwnedDeps<MockStorage, MockApi, Cw20Querier> {
    OwnedDeps {
        storage: MockStorage::default(),
        api: MockApi::default(),
        querier: Cw20Querier {
            token: token.to_owned(),
            allowance,
            balance,
            expires: Expiration::Never {},
        },
        custom_query_type: PhantomData,
    }
}

pub struct Cw20Querier {
    pub token: String,
    pub allowance: Uint128,
    pub balance: Uint128,
    pub expires: Expiration,
}

impl Querier for Cw20Querier {
    fn raw_query(&self, bin_request: &[u8]) -> QuerierResult {
        let request: QueryRequest<Empty> = match from_slice(bin_request) {
            Ok(v) => v,
            Err(e) => {
                return SystemResult::Err(SystemError::InvalidRequest {
                    error: format!("Parsing query request: {}", e),
                    request: bin_request.into(),
                })
            }
        };

        let (contract_addr, msg) = match request {
            QueryRequest::Wasm(WasmQuery::Smart { contract_addr, msg }) => (contract_addr, msg),
            _ => {
                return SystemResult::Err(SystemError::UnsupportedRequest {
                    kind: "only wasm smart queries".into(),
                })
            }
        };
        if contract_addr != self.token {
            return SystemResult::Err(SystemError::NoSuchContract {
                addr: contract_addr,
            });
        }

        match from_binary(&msg) {
            Ok(Cw20QueryMsg::Allowance { .. }) => {
                let res = AllowanceResponse {
                    allowance: self.allowance,
                    expires: self.expires,
                };
                SystemResult::Ok(to_binary(&res).into())
            }
            Ok(Cw20QueryMsg::Balance { .. }) => {
                let res = BalanceResponse {
                    balance: self.balance,
                };
                SystemResult::Ok(to_binary(&res).into())
            }
            _ => SystemResult::Err(SystemError::UnsupportedRequest {
                kind: "cw20 query".into(),
            }),
        }
    }
}
