//! Named views over Morpho read calls
//!
//! Integers are rendered as decimal strings so values beyond 2^53 survive a
//! trip through JSON untouched.

use crate::abi::{IMorpho, MarketParams};
use crate::{Error, Result};
use alloy::primitives::{Address, Bytes};
use alloy::sol_types::SolCall;
use serde::Serialize;

const WORD: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub supply_shares: String,
    pub borrow_shares: String,
    pub collateral: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketInfo {
    pub total_supply_assets: String,
    pub total_supply_shares: String,
    pub total_borrow_assets: String,
    pub total_borrow_shares: String,
    pub last_update: String,
    pub fee: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketParamsView {
    pub loan_token: Address,
    pub collateral_token: Address,
    pub oracle: Address,
    pub irm: Address,
    pub lltv: String,
}

impl From<&MarketParams> for MarketParamsView {
    fn from(params: &MarketParams) -> Self {
        Self {
            loan_token: params.loanToken,
            collateral_token: params.collateralToken,
            oracle: params.oracle,
            irm: params.irm,
            lltv: params.lltv.to_string(),
        }
    }
}

/// Reject return data that is not exactly `words` ABI words long
fn expect_words(what: &'static str, data: &Bytes, words: usize) -> Result<()> {
    if data.len() != words * WORD {
        return Err(Error::decode(
            what,
            format!("expected {} bytes of return data, got {}", words * WORD, data.len()),
        ));
    }
    Ok(())
}

pub fn position(data: &Bytes) -> Result<Position> {
    expect_words("Morpho position", data, 3)?;
    let ret = IMorpho::positionCall::abi_decode_returns(data)
        .map_err(|e| Error::decode("Morpho position", e.to_string()))?;
    Ok(Position {
        supply_shares: ret.supplyShares.to_string(),
        borrow_shares: ret.borrowShares.to_string(),
        collateral: ret.collateral.to_string(),
    })
}

pub fn market(data: &Bytes) -> Result<MarketInfo> {
    expect_words("Morpho market", data, 6)?;
    let ret = IMorpho::marketCall::abi_decode_returns(data)
        .map_err(|e| Error::decode("Morpho market", e.to_string()))?;
    Ok(MarketInfo {
        total_supply_assets: ret.totalSupplyAssets.to_string(),
        total_supply_shares: ret.totalSupplyShares.to_string(),
        total_borrow_assets: ret.totalBorrowAssets.to_string(),
        total_borrow_shares: ret.totalBorrowShares.to_string(),
        last_update: ret.lastUpdate.to_string(),
        fee: ret.fee.to_string(),
    })
}

pub fn market_params(data: &Bytes) -> Result<MarketParams> {
    expect_words("Morpho market params", data, 5)?;
    let ret = IMorpho::idToMarketParamsCall::abi_decode_returns(data)
        .map_err(|e| Error::decode("Morpho market params", e.to_string()))?;
    Ok(MarketParams {
        loanToken: ret.loanToken,
        collateralToken: ret.collateralToken,
        oracle: ret.oracle,
        irm: ret.irm,
        lltv: ret.lltv,
    })
}
