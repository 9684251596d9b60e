use std::fmt;

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{to_binary, Addr, BankMsg, Coin, CosmosMsg, StdResult, Uint128, WasmMsg};
use cw20::Cw20ExecuteMsg;

/// Asset held by a retreat. Native coins use the denom configured for the
/// contract instance, tokens are cw20 contracts.
#[cw_serde]
pub enum Asset {
    Native,
    Token(Addr),
}

impl Asset {
    pub fn is_native(&self) -> bool {
        matches!(self, Asset::Native)
    }

    /// Message that moves `amount` of this asset from the vault to `to`.
    pub fn transfer_msg(&self, native_denom: &str, to: &Addr, amount: Uint128) -> StdResult<CosmosMsg> {
        let msg = match self {
            Asset::Native => BankMsg::Send {
                to_address: to.into(),
                amount: vec![Coin {
                    denom: native_denom.to_owned(),
                    amount,
                }],
            }
            .into(),
            Asset::Token(address) => WasmMsg::Execute {
                contract_addr: address.to_string(),
                msg: to_binary(&Cw20ExecuteMsg::Transfer {
                    recipient: to.into(),
                    amount,
                })?,
                funds: vec![],
            }
            .into(),
        };
        Ok(msg)
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Asset::Native => write!(f, "native"),
            Asset::Token(address) => write!(f, "cw20:{}", address),
        }
    }
}

/// Amount of `denom` attached to the call. Exactly one coin of that denom is
/// accepted; anything else would leave unaccounted funds in the vault.
pub fn must_pay_native(funds: &[Coin], denom: &str) -> Option<Uint128> {
    match funds {
        [coin] if coin.denom == denom && !coin.amount.is_zero() => Some(coin.amount),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmwasm_std::{coin, coins};

    #[test]
    fn native_payment() {
        assert_eq!(Some(Uint128::new(5)), must_pay_native(&coins(5, "ujuno"), "ujuno"));
        assert_eq!(None, must_pay_native(&[], "ujuno"));
        assert_eq!(None, must_pay_native(&coins(0, "ujuno"), "ujuno"));
        assert_eq!(None, must_pay_native(&coins(5, "uatom"), "ujuno"));
        assert_eq!(
            None,
            must_pay_native(&[coin(5, "ujuno"), coin(1, "uatom")], "ujuno")
        );
    }

    #[test]
    fn transfer_messages() {
        let to = Addr::unchecked("owner");
        let msg = Asset::Native
            .transfer_msg("ujuno", &to, Uint128::new(7))
            .unwrap();
        assert_eq!(
            msg,
            CosmosMsg::Bank(BankMsg::Send {
                to_address: "owner".into(),
                amount: coins(7, "ujuno"),
            })
        );

        let token = Asset::Token(Addr::unchecked("token"));
        let msg = token.transfer_msg("ujuno", &to, Uint128::new(7)).unwrap();
        assert_eq!(
            msg,
            CosmosMsg::Wasm(WasmMsg::Execute {
                contract_addr: "token".into(),
                msg: to_binary(&Cw20ExecuteMsg::Transfer {
                    recipient: "owner".into(),
                    amount: Uint128::new(7),
                })
                .unwrap(),
                funds: vec![],
            })
        );
        assert_eq!("cw20:token", token.to_string());
    }
}
