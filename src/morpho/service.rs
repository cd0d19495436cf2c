//! Morpho Blue lending operations
//!
//! Every write resolves the market id to its parameters with
//! `idToMarketParams` and then issues one call against the same contract.
//! Parameters are looked up fresh on each call.

use super::decode::{self, MarketInfo, MarketParamsView, Position};
use super::deployments::MorphoDeployments;
use super::params::{
    BorrowParameters, LendingRequest, MarketInfoParameters, MarketPositionParameters,
    RepayParameters, SupplyCollateralParameters, SupplyParameters, WithdrawCollateralParameters,
    WithdrawParameters,
};
use crate::abi::{IMorpho, MarketParams};
use crate::wallet::{ContractCall, EvmWalletClient};
use crate::{Error, Result};
use alloy::primitives::{Address, Bytes, TxHash, B256};
use alloy::sol_types::SolCall;
use tracing::{debug, info};

#[derive(Debug, Clone, Default)]
pub struct MorphoService {
    deployments: MorphoDeployments,
}

impl MorphoService {
    pub fn new(deployments: MorphoDeployments) -> Self {
        Self { deployments }
    }

    pub fn supports_chain(&self, chain_id: u64) -> bool {
        self.deployments.supports(chain_id)
    }

    fn morpho_for<W: EvmWalletClient + ?Sized>(&self, wallet: &W) -> Result<Address> {
        self.deployments.address_for(wallet.chain_id())
    }

    async fn read<W, C>(
        &self,
        wallet: &W,
        morpho: Address,
        call: &C,
        operation: &str,
    ) -> Result<Bytes>
    where
        W: EvmWalletClient + ?Sized,
        C: SolCall,
    {
        wallet
            .read(ContractCall::new(morpho, call))
            .await
            .map_err(|e| Error::chain_call(operation, e))
    }

    async fn lookup_params<W: EvmWalletClient + ?Sized>(
        &self,
        wallet: &W,
        morpho: Address,
        market_id: B256,
    ) -> Result<MarketParams> {
        let call = IMorpho::idToMarketParamsCall { id: market_id };
        let data = self
            .read(wallet, morpho, &call, "get market params from Morpho")
            .await?;
        let params = decode::market_params(&data)?;
        debug!(
            %market_id,
            loan_token = %params.loanToken,
            collateral_token = %params.collateralToken,
            lltv = %params.lltv,
            "Resolved market params"
        );
        Ok(params)
    }

    /// Resolve market params then send the call built from them
    async fn write<W, C, F>(
        &self,
        wallet: &W,
        request: &LendingRequest,
        operation: &'static str,
        build: F,
    ) -> Result<TxHash>
    where
        W: EvmWalletClient + ?Sized,
        C: SolCall,
        F: FnOnce(MarketParams) -> C,
    {
        let morpho = self.morpho_for(wallet)?;
        let params = self
            .lookup_params(wallet, morpho, request.market_id)
            .await
            .map_err(|e| match e {
                Error::ChainCall { source, .. } => Error::chain_call(operation, source),
                other => other,
            })?;

        let call = build(params);
        let hash = wallet
            .send_transaction(ContractCall::new(morpho, &call))
            .await
            .map_err(|e| Error::chain_call(operation, e))?;

        info!(
            operation,
            market_id = %request.market_id,
            assets = %request.assets,
            shares = %request.shares,
            %hash,
            "Morpho transaction accepted"
        );
        Ok(hash)
    }

    pub async fn supply<W: EvmWalletClient + ?Sized>(
        &self,
        wallet: &W,
        params: &SupplyParameters,
    ) -> Result<TxHash> {
        let request = params.validate(wallet.address())?;
        self.write(wallet, &request, "supply to Morpho", |market_params| {
            IMorpho::supplyCall {
                marketParams: market_params,
                assets: request.assets,
                shares: request.shares,
                onBehalf: request.on_behalf,
                data: Bytes::new(),
            }
        })
        .await
    }

    pub async fn withdraw<W: EvmWalletClient + ?Sized>(
        &self,
        wallet: &W,
        params: &WithdrawParameters,
    ) -> Result<TxHash> {
        let request = params.validate(wallet.address())?;
        self.write(wallet, &request, "withdraw from Morpho", |market_params| {
            IMorpho::withdrawCall {
                marketParams: market_params,
                assets: request.assets,
                shares: request.shares,
                onBehalf: request.on_behalf,
                receiver: request.receiver,
            }
        })
        .await
    }

    pub async fn borrow<W: EvmWalletClient + ?Sized>(
        &self,
        wallet: &W,
        params: &BorrowParameters,
    ) -> Result<TxHash> {
        let request = params.validate(wallet.address())?;
        self.write(wallet, &request, "borrow from Morpho", |market_params| {
            IMorpho::borrowCall {
                marketParams: market_params,
                assets: request.assets,
                shares: request.shares,
                onBehalf: request.on_behalf,
                receiver: request.receiver,
            }
        })
        .await
    }

    pub async fn repay<W: EvmWalletClient + ?Sized>(
        &self,
        wallet: &W,
        params: &RepayParameters,
    ) -> Result<TxHash> {
        let request = params.validate(wallet.address())?;
        self.write(wallet, &request, "repay to Morpho", |market_params| {
            IMorpho::repayCall {
                marketParams: market_params,
                assets: request.assets,
                shares: request.shares,
                onBehalf: request.on_behalf,
                data: Bytes::new(),
            }
        })
        .await
    }

    pub async fn supply_collateral<W: EvmWalletClient + ?Sized>(
        &self,
        wallet: &W,
        params: &SupplyCollateralParameters,
    ) -> Result<TxHash> {
        let request = params.validate(wallet.address())?;
        self.write(
            wallet,
            &request,
            "supply collateral to Morpho",
            |market_params| IMorpho::supplyCollateralCall {
                marketParams: market_params,
                assets: request.assets,
                onBehalf: request.on_behalf,
                data: Bytes::new(),
            },
        )
        .await
    }

    pub async fn withdraw_collateral<W: EvmWalletClient + ?Sized>(
        &self,
        wallet: &W,
        params: &WithdrawCollateralParameters,
    ) -> Result<TxHash> {
        let request = params.validate(wallet.address())?;
        self.write(
            wallet,
            &request,
            "withdraw collateral from Morpho",
            |market_params| IMorpho::withdrawCollateralCall {
                marketParams: market_params,
                assets: request.assets,
                onBehalf: request.on_behalf,
                receiver: request.receiver,
            },
        )
        .await
    }

    pub async fn get_position<W: EvmWalletClient + ?Sized>(
        &self,
        wallet: &W,
        params: &MarketPositionParameters,
    ) -> Result<Position> {
        let (id, user) = params.validate()?;
        let morpho = self.morpho_for(wallet)?;
        let data = self
            .read(
                wallet,
                morpho,
                &IMorpho::positionCall { id, user },
                "get position from Morpho",
            )
            .await?;
        decode::position(&data)
    }

    pub async fn get_market_info<W: EvmWalletClient + ?Sized>(
        &self,
        wallet: &W,
        params: &MarketInfoParameters,
    ) -> Result<MarketInfo> {
        let id = params.validate()?;
        let morpho = self.morpho_for(wallet)?;
        let data = self
            .read(
                wallet,
                morpho,
                &IMorpho::marketCall { id },
                "get market info from Morpho",
            )
            .await?;
        decode::market(&data)
    }

    pub async fn get_market_params<W: EvmWalletClient + ?Sized>(
        &self,
        wallet: &W,
        params: &MarketInfoParameters,
    ) -> Result<MarketParamsView> {
        let id = params.validate()?;
        let morpho = self.morpho_for(wallet)?;
        let params = self.lookup_params(wallet, morpho, id).await?;
        Ok(MarketParamsView::from(&params))
    }
}
