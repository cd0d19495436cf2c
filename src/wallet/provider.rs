//! alloy-backed wallet client
//!
//! Reads go through `eth_call`; writes are prepared, signed locally by the
//! [`SecureWallet`] and broadcast as raw transactions.

use super::{ContractCall, EvmWalletClient, SecureWallet, WalletError};
use alloy::network::{ReceiptResponse, TransactionBuilder};
use alloy::primitives::{Address, Bytes, TxHash};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;
use std::sync::Arc;

fn rpc_error(e: impl std::fmt::Display) -> WalletError {
    WalletError::Rpc(e.to_string())
}

/// [`EvmWalletClient`] over an HTTP JSON-RPC provider
pub struct ProviderWalletClient {
    provider: DynProvider,
    chain_id: u64,
    address: Address,
    wallet: Option<Arc<SecureWallet>>,
}

impl ProviderWalletClient {
    /// Connect to `rpc_url` and ask the node which chain it serves
    ///
    /// Without a wallet the client is read-only and acts as the zero address
    /// until [`with_address`](Self::with_address) is used.
    pub async fn connect(
        rpc_url: &str,
        wallet: Option<Arc<SecureWallet>>,
    ) -> Result<Self, WalletError> {
        let url: url::Url = rpc_url
            .parse()
            .map_err(|e: url::ParseError| WalletError::InvalidUrl(e.to_string()))?;

        let provider = ProviderBuilder::new().connect_http(url).erased();
        let chain_id = provider.get_chain_id().await.map_err(rpc_error)?;

        let address = wallet
            .as_ref()
            .map(|w| w.address())
            .unwrap_or(Address::ZERO);

        tracing::debug!(chain_id, %address, signing = wallet.is_some(), "Connected wallet client");

        Ok(Self {
            provider,
            chain_id,
            address,
            wallet,
        })
    }

    /// Act as `address` for reads (read-only clients only)
    pub fn with_address(mut self, address: Address) -> Self {
        if self.wallet.is_none() {
            self.address = address;
        }
        self
    }

    fn signer(&self) -> Result<&SecureWallet, WalletError> {
        self.wallet.as_deref().ok_or(WalletError::NoAccount)
    }
}

#[async_trait]
impl EvmWalletClient for ProviderWalletClient {
    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    fn address(&self) -> Address {
        self.address
    }

    fn has_account(&self) -> bool {
        self.wallet.is_some()
    }

    async fn send_transaction(&self, call: ContractCall) -> Result<TxHash, WalletError> {
        let signer = self.signer()?;

        let tx = TransactionRequest::default()
            .with_from(self.address)
            .with_to(call.to)
            .with_input(call.data)
            .with_value(call.value);

        let tx = self.prepare_transaction_request(tx).await?;
        let raw = signer.sign_request(tx).await?;

        let pending = self
            .provider
            .send_raw_transaction(&raw)
            .await
            .map_err(rpc_error)?;
        let receipt = pending.get_receipt().await.map_err(rpc_error)?;

        if !receipt.status() {
            return Err(WalletError::Reverted {
                hash: receipt.transaction_hash,
            });
        }

        Ok(receipt.transaction_hash)
    }

    async fn read(&self, call: ContractCall) -> Result<Bytes, WalletError> {
        let tx = TransactionRequest::default()
            .with_from(self.address)
            .with_to(call.to)
            .with_input(call.data);

        self.provider.call(tx).await.map_err(rpc_error)
    }

    async fn prepare_transaction_request(
        &self,
        mut tx: TransactionRequest,
    ) -> Result<TransactionRequest, WalletError> {
        let from = tx.from.unwrap_or(self.address);
        tx.set_from(from);
        tx.set_chain_id(self.chain_id);

        if tx.nonce.is_none() {
            let nonce = self
                .provider
                .get_transaction_count(from)
                .pending()
                .await
                .map_err(rpc_error)?;
            tx.set_nonce(nonce);
        }

        if tx.max_fee_per_gas.is_none() {
            let fees = self
                .provider
                .estimate_eip1559_fees()
                .await
                .map_err(rpc_error)?;
            tx.set_max_fee_per_gas(fees.max_fee_per_gas);
            tx.set_max_priority_fee_per_gas(fees.max_priority_fee_per_gas);
        }

        if tx.gas.is_none() {
            let gas = self
                .provider
                .estimate_gas(tx.clone())
                .await
                .map_err(rpc_error)?;
            tx.set_gas_limit(gas);
        }

        Ok(tx)
    }

    async fn sign_transaction(&self, tx: TransactionRequest) -> Result<Bytes, WalletError> {
        self.signer()?.sign_request(tx).await
    }

    async fn send_raw_transaction(&self, raw: Bytes) -> Result<TxHash, WalletError> {
        let pending = self
            .provider
            .send_raw_transaction(&raw)
            .await
            .map_err(rpc_error)?;

        Ok(*pending.tx_hash())
    }
}

impl std::fmt::Debug for ProviderWalletClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderWalletClient")
            .field("chain_id", &self.chain_id)
            .field("address", &self.address)
            .field("signing", &self.wallet.is_some())
            .finish()
    }
}
