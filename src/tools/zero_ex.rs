//! 0x price and swap tools

use super::{DynTool, Tool, ZeroExBundle};
use crate::wallet::EvmWalletClient;
use crate::zero_ex::{GetPriceParameters, SwapApi, SwapOutcome, ZeroExClient, ZeroExService};
use crate::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// 0x adapter bound to a wallet
///
/// 0x itself rejects chains it does not serve, so every EVM chain is accepted
/// here.
pub struct ZeroExPlugin<A = ZeroExClient> {
    service: Arc<ZeroExService<A>>,
    wallet: Arc<dyn EvmWalletClient>,
}

impl<A: SwapApi + 'static> ZeroExPlugin<A> {
    pub fn new(service: ZeroExService<A>, wallet: Arc<dyn EvmWalletClient>) -> Self {
        Self {
            service: Arc::new(service),
            wallet,
        }
    }

    pub fn supports_chain(&self, _chain_id: u64) -> bool {
        true
    }

    pub fn get_price_tool(&self) -> ZeroExGetPriceTool<A> {
        ZeroExGetPriceTool {
            service: Arc::clone(&self.service),
            wallet: Arc::clone(&self.wallet),
        }
    }

    pub fn swap_tool(&self) -> ZeroExSwapTool<A> {
        ZeroExSwapTool {
            service: Arc::clone(&self.service),
            wallet: Arc::clone(&self.wallet),
        }
    }

    pub fn tools(&self) -> Vec<Box<dyn DynTool>> {
        vec![Box::new(self.get_price_tool()), Box::new(self.swap_tool())]
    }
}

pub struct ZeroExGetPriceTool<A = ZeroExClient> {
    service: Arc<ZeroExService<A>>,
    wallet: Arc<dyn EvmWalletClient>,
}

#[async_trait]
impl<A: SwapApi + 'static> Tool for ZeroExGetPriceTool<A> {
    type Bundle = ZeroExBundle;
    const LOCAL_NAME: &'static str = "0x_get_price";
    type Input = GetPriceParameters;
    type Output = Value;

    fn description(&self) -> &'static str {
        "Get a price for a swap from the 0x API. The connected wallet is used as \
         the taker. Amounts are in base units of the sell token."
    }

    async fn execute(&self, args: Self::Input) -> Result<Self::Output> {
        self.service.get_price(self.wallet.as_ref(), &args).await
    }
}

pub struct ZeroExSwapTool<A = ZeroExClient> {
    service: Arc<ZeroExService<A>>,
    wallet: Arc<dyn EvmWalletClient>,
}

#[async_trait]
impl<A: SwapApi + 'static> Tool for ZeroExSwapTool<A> {
    type Bundle = ZeroExBundle;
    const LOCAL_NAME: &'static str = "0x_swap";
    type Input = GetPriceParameters;
    type Output = SwapOutcome;

    fn description(&self) -> &'static str {
        "Swap tokens through the 0x API. Approves the 0x allowance holder for the \
         sell token first if needed, then signs and broadcasts the quoted \
         transaction. Returns the transaction hash."
    }

    async fn execute(&self, args: Self::Input) -> Result<Self::Output> {
        self.service.swap(self.wallet.as_ref(), &args).await
    }
}
