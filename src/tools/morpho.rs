//! Morpho Blue tools

use super::{DynTool, MorphoBundle, Tool};
use crate::morpho::{
    BorrowParameters, MarketInfo, MarketInfoParameters, MarketParamsView,
    MarketPositionParameters, MorphoService, Position, RepayParameters,
    SupplyCollateralParameters, SupplyParameters, WithdrawCollateralParameters,
    WithdrawParameters,
};
use crate::wallet::EvmWalletClient;
use crate::Result;
use alloy::primitives::TxHash;
use async_trait::async_trait;
use std::sync::Arc;

/// Morpho adapter bound to a wallet
#[derive(Clone)]
pub struct MorphoPlugin {
    service: Arc<MorphoService>,
    wallet: Arc<dyn EvmWalletClient>,
}

impl MorphoPlugin {
    pub fn new(service: MorphoService, wallet: Arc<dyn EvmWalletClient>) -> Self {
        Self {
            service: Arc::new(service),
            wallet,
        }
    }

    /// Chains with a known Morpho deployment
    pub fn supports_chain(&self, chain_id: u64) -> bool {
        self.service.supports_chain(chain_id)
    }

    pub fn tools(&self) -> Vec<Box<dyn DynTool>> {
        vec![
            Box::new(MorphoSupplyTool::from(self)),
            Box::new(MorphoWithdrawTool::from(self)),
            Box::new(MorphoBorrowTool::from(self)),
            Box::new(MorphoRepayTool::from(self)),
            Box::new(MorphoSupplyCollateralTool::from(self)),
            Box::new(MorphoWithdrawCollateralTool::from(self)),
            Box::new(MorphoGetPositionTool::from(self)),
            Box::new(MorphoGetMarketInfoTool::from(self)),
            Box::new(MorphoGetMarketParamsTool::from(self)),
        ]
    }
}

/// Declares a tool that forwards its input to one `MorphoService` method
macro_rules! morpho_tool {
    ($tool:ident, $name:literal, $input:ty, $output:ty, $method:ident, $description:literal) => {
        pub struct $tool {
            service: Arc<MorphoService>,
            wallet: Arc<dyn EvmWalletClient>,
        }

        impl From<&MorphoPlugin> for $tool {
            fn from(plugin: &MorphoPlugin) -> Self {
                Self {
                    service: Arc::clone(&plugin.service),
                    wallet: Arc::clone(&plugin.wallet),
                }
            }
        }

        #[async_trait]
        impl Tool for $tool {
            type Bundle = MorphoBundle;
            const LOCAL_NAME: &'static str = $name;
            type Input = $input;
            type Output = $output;

            fn description(&self) -> &'static str {
                $description
            }

            async fn execute(&self, args: Self::Input) -> Result<Self::Output> {
                self.service.$method(self.wallet.as_ref(), &args).await
            }
        }
    };
}

morpho_tool!(
    MorphoSupplyTool,
    "morpho_supply",
    SupplyParameters,
    TxHash,
    supply,
    "Supply loan tokens to a Morpho Blue market. Pass assets, or assets=0 with \
     shares. Returns the transaction hash."
);

morpho_tool!(
    MorphoWithdrawTool,
    "morpho_withdraw",
    WithdrawParameters,
    TxHash,
    withdraw,
    "Withdraw supplied loan tokens from a Morpho Blue market. Pass assets, or \
     assets=0 with shares. Returns the transaction hash."
);

morpho_tool!(
    MorphoBorrowTool,
    "morpho_borrow",
    BorrowParameters,
    TxHash,
    borrow,
    "Borrow loan tokens from a Morpho Blue market against supplied collateral. \
     Returns the transaction hash."
);

morpho_tool!(
    MorphoRepayTool,
    "morpho_repay",
    RepayParameters,
    TxHash,
    repay,
    "Repay borrowed loan tokens to a Morpho Blue market. Pass assets, or \
     assets=0 with shares. Returns the transaction hash."
);

morpho_tool!(
    MorphoSupplyCollateralTool,
    "morpho_supply_collateral",
    SupplyCollateralParameters,
    TxHash,
    supply_collateral,
    "Supply collateral tokens to a Morpho Blue market. Returns the transaction hash."
);

morpho_tool!(
    MorphoWithdrawCollateralTool,
    "morpho_withdraw_collateral",
    WithdrawCollateralParameters,
    TxHash,
    withdraw_collateral,
    "Withdraw collateral tokens from a Morpho Blue market. Returns the transaction hash."
);

morpho_tool!(
    MorphoGetPositionTool,
    "morpho_get_position",
    MarketPositionParameters,
    Position,
    get_position,
    "Get a user's supply shares, borrow shares and collateral in a Morpho Blue market."
);

morpho_tool!(
    MorphoGetMarketInfoTool,
    "morpho_get_market_info",
    MarketInfoParameters,
    MarketInfo,
    get_market_info,
    "Get total supply and borrow assets and shares, last update time and fee of a \
     Morpho Blue market."
);

morpho_tool!(
    MorphoGetMarketParamsTool,
    "morpho_get_market_params",
    MarketInfoParameters,
    MarketParamsView,
    get_market_params,
    "Get the loan token, collateral token, oracle, IRM and LLTV of a Morpho Blue market."
);
