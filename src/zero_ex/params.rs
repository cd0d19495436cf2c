//! Tool parameters for the 0x price and swap tools

use crate::validate;
use crate::Result;
use alloy::primitives::{Address, U256};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, TS)]
#[ts(export)]
pub struct GetPriceParameters {
    /// The chain ID to get the price on
    pub chain_id: u64,
    /// Address of the token to sell
    pub sell_token: String,
    /// Address of the token to buy
    pub buy_token: String,
    /// Amount of `sell_token` to sell, in base units, as a positive integer
    pub sell_amount: String,
    /// Maximum acceptable slippage of the buy token in basis points.
    /// 0 tolerates no slippage; when omitted the API default (100) applies.
    #[serde(default)]
    pub slippage_bps: Option<i64>,
}

/// Validated swap request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapRequest {
    pub chain_id: u64,
    pub sell_token: Address,
    pub buy_token: Address,
    pub sell_amount: U256,
    /// Wallet that will execute the swap; also sent as `txOrigin`
    pub taker: Address,
    pub slippage_bps: Option<u16>,
}

impl GetPriceParameters {
    pub fn validate(&self, taker: Address) -> Result<SwapRequest> {
        Ok(SwapRequest {
            chain_id: validate::chain_id("chain_id", self.chain_id)?,
            sell_token: validate::address("sell_token", &self.sell_token)?,
            buy_token: validate::address("buy_token", &self.buy_token)?,
            sell_amount: validate::positive_amount("sell_amount", &self.sell_amount)?,
            taker,
            slippage_bps: validate::slippage_bps(self.slippage_bps)?,
        })
    }
}
