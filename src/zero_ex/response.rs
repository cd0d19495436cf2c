//! Typed views over 0x responses
//!
//! Only the fields the swap flow acts on are decoded; callers of the price
//! tool get the full JSON body.

use crate::{Error, Result};
use alloy::primitives::{Address, Bytes, U256};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::str::FromStr;

#[derive(Debug, Clone, Deserialize)]
pub struct PriceResponse {
    #[serde(default)]
    pub issues: Issues,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Issues {
    /// Present when the taker has not granted the spender enough allowance
    #[serde(default)]
    pub allowance: Option<AllowanceIssue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AllowanceIssue {
    pub spender: Address,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuoteResponse {
    pub transaction: QuoteTransaction,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuoteTransaction {
    pub to: Address,
    pub data: Bytes,
    #[serde(default)]
    pub value: Option<String>,
}

impl QuoteTransaction {
    /// Native value to attach, defaulting to zero
    pub fn value(&self) -> Result<U256> {
        match self.value.as_deref() {
            None | Some("") => Ok(U256::ZERO),
            Some(raw) => U256::from_str(raw)
                .map_err(|e| Error::decode("0x quote transaction value", e.to_string())),
        }
    }
}

pub fn decode<T: DeserializeOwned>(what: &'static str, value: &Value) -> Result<T> {
    T::deserialize(value).map_err(|e| Error::decode(what, e.to_string()))
}
