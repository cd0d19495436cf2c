//! Wallet and chain client abstraction
//!
//! The plugins never talk to an RPC node or hold a key directly. Every chain
//! interaction goes through [`EvmWalletClient`], which lets the orchestrators
//! be driven by an alloy provider in production and by an in-memory fake in
//! tests.

mod provider;
mod signer;
#[cfg(test)]
pub(crate) mod testing;

pub use provider::ProviderWalletClient;
pub use signer::SecureWallet;

use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::rpc::types::TransactionRequest;
use alloy::sol_types::SolCall;
use async_trait::async_trait;

/// Errors raised by the wallet/chain collaborator
#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    #[error("No account connected")]
    NoAccount,

    #[error("Invalid private key: {0}")]
    InvalidKey(String),

    #[error("Invalid RPC URL: {0}")]
    InvalidUrl(String),

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Signing failed: {0}")]
    Signing(String),

    #[error("Transaction {hash} reverted")]
    Reverted { hash: TxHash },
}

/// An ABI-encoded call against a contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractCall {
    pub to: Address,
    pub data: Bytes,
    pub value: U256,
}

impl ContractCall {
    /// Encode a typed `sol!` call for the contract at `to`
    pub fn new<C: SolCall>(to: Address, call: &C) -> Self {
        Self {
            to,
            data: call.abi_encode().into(),
            value: U256::ZERO,
        }
    }

    /// Four-byte function selector of the encoded call
    pub fn selector(&self) -> Option<[u8; 4]> {
        self.data.get(..4).and_then(|s| s.try_into().ok())
    }
}

/// Narrow interface onto a connected EVM wallet
#[async_trait]
pub trait EvmWalletClient: Send + Sync {
    /// Chain the client is connected to
    fn chain_id(&self) -> u64;

    /// Address transactions are sent from (and reads are made as)
    fn address(&self) -> Address;

    /// Whether a signing credential is connected
    fn has_account(&self) -> bool;

    /// Sign and submit a contract call, returning once the network has
    /// accepted it
    async fn send_transaction(&self, call: ContractCall) -> Result<TxHash, WalletError>;

    /// `eth_call` a contract, returning the raw return data
    async fn read(&self, call: ContractCall) -> Result<Bytes, WalletError>;

    /// Fill in nonce, fees, chain id and (if absent) gas limit
    async fn prepare_transaction_request(
        &self,
        tx: TransactionRequest,
    ) -> Result<TransactionRequest, WalletError>;

    /// Sign a prepared request, returning the EIP-2718 encoded transaction
    async fn sign_transaction(&self, tx: TransactionRequest) -> Result<Bytes, WalletError>;

    /// Broadcast an already signed transaction
    async fn send_raw_transaction(&self, raw: Bytes) -> Result<TxHash, WalletError>;
}
