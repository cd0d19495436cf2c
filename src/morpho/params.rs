//! Tool parameters for the Morpho Blue tools
//!
//! Amounts are base-unit decimal strings. `on_behalf` and `receiver` default to
//! the connected wallet; `shares` defaults to 0.

use crate::validate;
use crate::Result;
use alloy::primitives::{Address, B256, U256};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, TS)]
#[ts(export)]
pub struct SupplyParameters {
    /// The market ID to supply to
    pub market_id: String,
    /// Amount of loan token to supply, in base units (0 to supply by shares)
    pub assets: String,
    /// Amount of shares to mint instead of supplying by assets
    #[serde(default)]
    pub shares: Option<String>,
    /// Account credited with the supply
    #[serde(default)]
    pub on_behalf: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, TS)]
#[ts(export)]
pub struct WithdrawParameters {
    /// The market ID to withdraw from
    pub market_id: String,
    /// Amount of loan token to withdraw, in base units (0 to withdraw by shares)
    pub assets: String,
    /// Amount of supply shares to burn instead of withdrawing by assets
    #[serde(default)]
    pub shares: Option<String>,
    /// Account whose supply is withdrawn
    #[serde(default)]
    pub on_behalf: Option<String>,
    /// Account receiving the withdrawn tokens
    #[serde(default)]
    pub receiver: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, TS)]
#[ts(export)]
pub struct BorrowParameters {
    /// The market ID to borrow from
    pub market_id: String,
    /// Amount of loan token to borrow, in base units (0 to borrow by shares)
    pub assets: String,
    /// Amount of borrow shares to mint instead of borrowing by assets
    #[serde(default)]
    pub shares: Option<String>,
    /// Account the debt is assigned to
    #[serde(default)]
    pub on_behalf: Option<String>,
    /// Account receiving the borrowed tokens
    #[serde(default)]
    pub receiver: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, TS)]
#[ts(export)]
pub struct RepayParameters {
    /// The market ID to repay to
    pub market_id: String,
    /// Amount of loan token to repay, in base units (0 to repay by shares)
    pub assets: String,
    /// Amount of borrow shares to burn instead of repaying by assets
    #[serde(default)]
    pub shares: Option<String>,
    /// Account whose debt is repaid
    #[serde(default)]
    pub on_behalf: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, TS)]
#[ts(export)]
pub struct SupplyCollateralParameters {
    /// The market ID to supply collateral to
    pub market_id: String,
    /// Amount of collateral token to supply, in base units
    pub assets: String,
    /// Account credited with the collateral
    #[serde(default)]
    pub on_behalf: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, TS)]
#[ts(export)]
pub struct WithdrawCollateralParameters {
    /// The market ID to withdraw collateral from
    pub market_id: String,
    /// Amount of collateral token to withdraw, in base units
    pub assets: String,
    /// Account whose collateral is withdrawn
    #[serde(default)]
    pub on_behalf: Option<String>,
    /// Account receiving the collateral
    #[serde(default)]
    pub receiver: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, TS)]
#[ts(export)]
pub struct MarketPositionParameters {
    /// The market ID to get the position for
    pub market_id: String,
    /// The user address to get the position for
    pub user: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, TS)]
#[ts(export)]
pub struct MarketInfoParameters {
    /// The market ID to get info for
    pub market_id: String,
}

/// Validated arguments of a lending write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LendingRequest {
    pub market_id: B256,
    pub assets: U256,
    pub shares: U256,
    pub on_behalf: Address,
    pub receiver: Address,
}

impl LendingRequest {
    fn by_assets_or_shares(
        market_id: &str,
        assets: &str,
        shares: Option<&str>,
        on_behalf: Option<&str>,
        receiver: Option<&str>,
        caller: Address,
    ) -> Result<Self> {
        let market_id = validate::market_id(market_id)?;
        let (assets, shares) = validate::assets_or_shares(assets, shares)?;
        Ok(Self {
            market_id,
            assets,
            shares,
            on_behalf: validate::optional_address("on_behalf", on_behalf)?.unwrap_or(caller),
            receiver: validate::optional_address("receiver", receiver)?.unwrap_or(caller),
        })
    }

    fn collateral(
        market_id: &str,
        assets: &str,
        on_behalf: Option<&str>,
        receiver: Option<&str>,
        caller: Address,
    ) -> Result<Self> {
        Ok(Self {
            market_id: validate::market_id(market_id)?,
            assets: validate::positive_amount("assets", assets)?,
            shares: U256::ZERO,
            on_behalf: validate::optional_address("on_behalf", on_behalf)?.unwrap_or(caller),
            receiver: validate::optional_address("receiver", receiver)?.unwrap_or(caller),
        })
    }
}

impl SupplyParameters {
    pub fn validate(&self, caller: Address) -> Result<LendingRequest> {
        LendingRequest::by_assets_or_shares(
            &self.market_id,
            &self.assets,
            self.shares.as_deref(),
            self.on_behalf.as_deref(),
            None,
            caller,
        )
    }
}

impl WithdrawParameters {
    pub fn validate(&self, caller: Address) -> Result<LendingRequest> {
        LendingRequest::by_assets_or_shares(
            &self.market_id,
            &self.assets,
            self.shares.as_deref(),
            self.on_behalf.as_deref(),
            self.receiver.as_deref(),
            caller,
        )
    }
}

impl BorrowParameters {
    pub fn validate(&self, caller: Address) -> Result<LendingRequest> {
        LendingRequest::by_assets_or_shares(
            &self.market_id,
            &self.assets,
            self.shares.as_deref(),
            self.on_behalf.as_deref(),
            self.receiver.as_deref(),
            caller,
        )
    }
}

impl RepayParameters {
    pub fn validate(&self, caller: Address) -> Result<LendingRequest> {
        LendingRequest::by_assets_or_shares(
            &self.market_id,
            &self.assets,
            self.shares.as_deref(),
            self.on_behalf.as_deref(),
            None,
            caller,
        )
    }
}

impl SupplyCollateralParameters {
    pub fn validate(&self, caller: Address) -> Result<LendingRequest> {
        LendingRequest::collateral(
            &self.market_id,
            &self.assets,
            self.on_behalf.as_deref(),
            None,
            caller,
        )
    }
}

impl WithdrawCollateralParameters {
    pub fn validate(&self, caller: Address) -> Result<LendingRequest> {
        LendingRequest::collateral(
            &self.market_id,
            &self.assets,
            self.on_behalf.as_deref(),
            self.receiver.as_deref(),
            caller,
        )
    }
}

impl MarketPositionParameters {
    pub fn validate(&self) -> Result<(B256, Address)> {
        Ok((
            validate::market_id(&self.market_id)?,
            validate::address("user", &self.user)?,
        ))
    }
}

impl MarketInfoParameters {
    pub fn validate(&self) -> Result<B256> {
        validate::market_id(&self.market_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use alloy::primitives::address;

    const CALLER: Address = address!("f39fd6e51aad88f6f4ce6ab8827279cfffb92266");

    fn market() -> String {
        format!("0x{}", "11".repeat(32))
    }

    #[test]
    fn supply_defaults_shares_and_on_behalf() {
        let request = SupplyParameters {
            market_id: market(),
            assets: "1000000".to_string(),
            shares: None,
            on_behalf: None,
        }
        .validate(CALLER)
        .unwrap();

        assert_eq!(request.market_id, B256::repeat_byte(0x11));
        assert_eq!(request.assets, U256::from(1_000_000));
        assert_eq!(request.shares, U256::ZERO);
        assert_eq!(request.on_behalf, CALLER);
    }

    #[test]
    fn withdraw_by_shares_with_explicit_receiver() {
        let receiver = address!("70997970c51812dc3a010c7d01b50e0d17dc79c8");
        let request = WithdrawParameters {
            market_id: market(),
            assets: "0".to_string(),
            shares: Some("250".to_string()),
            on_behalf: None,
            receiver: Some(receiver.to_string()),
        }
        .validate(CALLER)
        .unwrap();

        assert_eq!(request.assets, U256::ZERO);
        assert_eq!(request.shares, U256::from(250));
        assert_eq!(request.on_behalf, CALLER);
        assert_eq!(request.receiver, receiver);
    }

    #[test]
    fn collateral_rejects_zero_assets() {
        let err = SupplyCollateralParameters {
            market_id: market(),
            assets: "0".to_string(),
            on_behalf: None,
        }
        .validate(CALLER)
        .unwrap_err();
        assert!(matches!(err, Error::Validation { field: "assets", .. }));
    }

    #[test]
    fn malformed_on_behalf_is_named() {
        let err = RepayParameters {
            market_id: market(),
            assets: "1".to_string(),
            shares: None,
            on_behalf: Some("alice".to_string()),
        }
        .validate(CALLER)
        .unwrap_err();
        assert!(matches!(err, Error::Validation { field: "on_behalf", .. }));
    }

    #[test]
    fn position_requires_user_address() {
        let err = MarketPositionParameters {
            market_id: market(),
            user: "0x123".to_string(),
        }
        .validate()
        .unwrap_err();
        assert!(matches!(err, Error::Validation { field: "user", .. }));
    }

    #[test]
    fn deserializes_supply_without_optionals() {
        let parsed: SupplyParameters = serde_json::from_value(serde_json::json!({
            "market_id": market(),
            "assets": "5"
        }))
        .unwrap();
        assert!(parsed.shares.is_none());
        assert!(parsed.on_behalf.is_none());
    }
}
