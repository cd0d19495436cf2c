//! 0x price lookup and swap execution
//!
//! A swap runs strictly in sequence, each step consuming the previous one's
//! output:
//!
//! ```text
//! PRICED -> (ALLOWANCE_OK | NEEDS_APPROVAL -> APPROVED) -> QUOTED -> SIGNED -> BROADCAST
//! ```
//!
//! Any failure aborts the swap. An approval that already landed is left in
//! place; retrying is up to the caller.

use super::client::{SwapApi, ZeroExClient};
use super::params::{GetPriceParameters, SwapRequest};
use super::query::{Endpoint, ReferrerConfig, ZeroExRequest};
use super::response::{decode, PriceResponse, QuoteResponse};
use crate::abi::IERC20;
use crate::wallet::{ContractCall, EvmWalletClient, WalletError};
use crate::{Error, Result};
use alloy::network::TransactionBuilder;
use alloy::primitives::{TxHash, U256};
use alloy::rpc::types::TransactionRequest;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use tracing::{debug, info};

/// Gas limit attached to every swap transaction
pub const SWAP_GAS_LIMIT: u64 = 500_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapStage {
    Priced,
    NeedsApproval,
    Approved,
    Quoted,
    Signed,
    Broadcast,
}

impl fmt::Display for SwapStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SwapStage::Priced => "priced",
            SwapStage::NeedsApproval => "needs_approval",
            SwapStage::Approved => "approved",
            SwapStage::Quoted => "quoted",
            SwapStage::Signed => "signed",
            SwapStage::Broadcast => "broadcast",
        };
        f.write_str(name)
    }
}

/// Result of a broadcast swap
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwapOutcome {
    pub transaction_hash: TxHash,
    /// Set when an allowance approval had to be sent first
    pub approval_hash: Option<TxHash>,
}

pub struct ZeroExService<A = ZeroExClient> {
    api: A,
    referrer: ReferrerConfig,
}

impl<A: SwapApi> ZeroExService<A> {
    pub fn new(api: A, referrer: ReferrerConfig) -> Self {
        Self { api, referrer }
    }

    fn request(&self, endpoint: Endpoint, swap: &SwapRequest) -> ZeroExRequest {
        ZeroExRequest::new(endpoint, swap, &self.referrer)
    }

    /// Indicative price for selling `sell_amount` of `sell_token`
    ///
    /// The wallet's address is sent as taker and tx origin. The 0x response
    /// body is returned untouched.
    pub async fn get_price<W>(&self, wallet: &W, params: &GetPriceParameters) -> Result<Value>
    where
        W: EvmWalletClient + ?Sized,
    {
        let swap = params.validate(wallet.address())?;
        self.api.fetch(&self.request(Endpoint::Price, &swap)).await
    }

    /// Execute a swap from the wallet, approving the 0x spender if needed
    pub async fn swap<W>(&self, wallet: &W, params: &GetPriceParameters) -> Result<SwapOutcome>
    where
        W: EvmWalletClient + ?Sized,
    {
        let swap = params.validate(wallet.address())?;
        if wallet.chain_id() != swap.chain_id {
            return Err(Error::validation(
                "chain_id",
                format!(
                    "wallet is connected to chain {}, not {}",
                    wallet.chain_id(),
                    swap.chain_id
                ),
            ));
        }
        if !wallet.has_account() {
            return Err(Error::MissingAccount);
        }

        let price_body = self.api.fetch(&self.request(Endpoint::Price, &swap)).await?;
        let price: PriceResponse = decode("0x price response", &price_body)?;
        info!(
            stage = %SwapStage::Priced,
            sell_token = %swap.sell_token,
            buy_token = %swap.buy_token,
            sell_amount = %swap.sell_amount,
            "Fetched swap price"
        );

        let approval_hash = match price.issues.allowance {
            Some(issue) => {
                info!(
                    stage = %SwapStage::NeedsApproval,
                    spender = %issue.spender,
                    token = %swap.sell_token,
                    "Sending approval"
                );
                let approve = IERC20::approveCall {
                    spender: issue.spender,
                    amount: U256::MAX,
                };
                let hash = wallet
                    .send_transaction(ContractCall::new(swap.sell_token, &approve))
                    .await
                    .map_err(|e| wallet_error("approve 0x allowance", e))?;
                info!(stage = %SwapStage::Approved, %hash, "Approval accepted");
                Some(hash)
            }
            None => None,
        };

        let quote_body = self.api.fetch(&self.request(Endpoint::Quote, &swap)).await?;
        let quote: QuoteResponse = decode("0x quote response", &quote_body)?;
        let transaction = quote.transaction;
        let value = transaction.value()?;
        info!(
            stage = %SwapStage::Quoted,
            to = %transaction.to,
            %value,
            data_len = transaction.data.len(),
            "Received executable quote"
        );

        let request = TransactionRequest::default()
            .with_from(wallet.address())
            .with_to(transaction.to)
            .with_value(value)
            .with_input(transaction.data)
            .with_gas_limit(SWAP_GAS_LIMIT);

        let prepared = wallet
            .prepare_transaction_request(request)
            .await
            .map_err(|e| Error::chain_call("prepare 0x swap transaction", e))?;
        debug!(nonce = ?prepared.nonce, chain_id = ?prepared.chain_id, "Prepared swap transaction");

        let signed = wallet
            .sign_transaction(prepared)
            .await
            .map_err(|e| wallet_error("sign 0x swap transaction", e))?;
        info!(stage = %SwapStage::Signed, raw_len = signed.len(), "Signed swap transaction");

        let transaction_hash = wallet
            .send_raw_transaction(signed)
            .await
            .map_err(|e| Error::chain_call("broadcast 0x swap transaction", e))?;
        info!(stage = %SwapStage::Broadcast, hash = %transaction_hash, "Swap broadcast");

        Ok(SwapOutcome {
            transaction_hash,
            approval_hash,
        })
    }
}

/// A signer that disappeared mid-swap is reported like one that was never there
fn wallet_error(operation: &str, e: WalletError) -> Error {
    match e {
        WalletError::NoAccount => Error::MissingAccount,
        e => Error::chain_call(operation, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::testing::{entries, journal, Journal, RecordingWallet, WalletCall};
    use alloy::primitives::{address, Address, B256};
    use alloy::sol_types::SolCall;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    const SELL: Address = address!("833589fcd6edb6e08f4c7c32d4f71b54bda02913");
    const BUY: Address = address!("4200000000000000000000000000000000000006");
    const TAKER: Address = address!("f39fd6e51aad88f6f4ce6ab8827279cfffb92266");
    const SPENDER: Address = address!("0000000000001ff3684f28c67538d4d072c22734");
    const SETTLER: Address = address!("5418226af9c8d5d287a78fbbbcd337b86ec07d61");

    /// Canned 0x responses, recording every request
    struct FakeSwapApi {
        price: Value,
        quote: Result<Value>,
        requests: Mutex<Vec<ZeroExRequest>>,
        journal: Journal,
    }

    impl FakeSwapApi {
        fn new(price: Value, journal: Journal) -> Self {
            Self {
                price,
                quote: Ok(json!({
                    "transaction": {
                        "to": SETTLER.to_string(),
                        "data": "0xc0ffee",
                        "value": "0",
                        "gas": "288079"
                    }
                })),
                requests: Mutex::new(Vec::new()),
                journal,
            }
        }

        fn requests(&self) -> Vec<ZeroExRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SwapApi for FakeSwapApi {
        async fn fetch(&self, request: &ZeroExRequest) -> Result<Value> {
            self.requests.lock().unwrap().push(request.clone());
            self.journal
                .lock()
                .unwrap()
                .push(request.endpoint.to_string());
            match request.endpoint {
                Endpoint::Price => Ok(self.price.clone()),
                Endpoint::Quote => match &self.quote {
                    Ok(v) => Ok(v.clone()),
                    Err(_) => Err(Error::UpstreamHttp {
                        url: "https://api.0x.org/swap/allowance-holder/quote".to_string(),
                        status: 500,
                        body: "upstream down".to_string(),
                    }),
                },
            }
        }
    }

    fn no_allowance_issue() -> Value {
        json!({ "buyAmount": "1", "issues": { "allowance": null } })
    }

    fn allowance_issue() -> Value {
        json!({
            "buyAmount": "1",
            "issues": { "allowance": { "actual": "0", "spender": SPENDER.to_string() } }
        })
    }

    fn params() -> GetPriceParameters {
        GetPriceParameters {
            chain_id: 8453,
            sell_token: SELL.to_string(),
            buy_token: BUY.to_string(),
            sell_amount: "500".to_string(),
            slippage_bps: None,
        }
    }

    fn referrer() -> ReferrerConfig {
        ReferrerConfig::WithReferrer {
            swap_fee_bps: 30,
            swap_fee_recipient: address!("70997970c51812dc3a010c7d01b50e0d17dc79c8"),
        }
    }

    #[tokio::test]
    async fn get_price_sends_wallet_as_taker() {
        let log = journal();
        let service = ZeroExService::new(
            FakeSwapApi::new(no_allowance_issue(), log.clone()),
            ReferrerConfig::NoReferrer,
        );
        let wallet = RecordingWallet::new(8453, TAKER);

        let body = service.get_price(&wallet, &params()).await.unwrap();
        assert_eq!(body["buyAmount"], "1");

        let requests = service.api.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].endpoint, Endpoint::Price);
        assert_eq!(requests[0].get("chainId"), Some("8453"));
        assert_eq!(requests[0].get("taker"), Some(TAKER.to_string().as_str()));
        assert_eq!(requests[0].get("txOrigin"), Some(TAKER.to_string().as_str()));
        assert!(wallet.calls().is_empty());
    }

    #[tokio::test]
    async fn get_price_rejects_bad_input_before_any_request() {
        let log = journal();
        let service = ZeroExService::new(
            FakeSwapApi::new(no_allowance_issue(), log.clone()),
            ReferrerConfig::NoReferrer,
        );
        let wallet = RecordingWallet::new(8453, TAKER);

        let bad = GetPriceParameters {
            sell_amount: "0".to_string(),
            ..params()
        };
        let err = service.get_price(&wallet, &bad).await.unwrap_err();

        assert!(matches!(err, Error::Validation { field: "sell_amount", .. }));
        assert!(entries(&log).is_empty());
    }

    #[tokio::test]
    async fn swap_without_allowance_issue_never_approves() {
        let log = journal();
        let service = ZeroExService::new(
            FakeSwapApi::new(no_allowance_issue(), log.clone()),
            ReferrerConfig::NoReferrer,
        );
        let wallet = RecordingWallet::new(8453, TAKER).with_journal(log.clone());

        let outcome = service.swap(&wallet, &params()).await.unwrap();

        assert!(wallet.sent().is_empty());
        assert_eq!(outcome.approval_hash, None);
        assert_eq!(outcome.transaction_hash, B256::repeat_byte(0xbb));
        assert_eq!(
            entries(&log),
            vec!["price", "quote", "prepare", "sign", "broadcast"]
        );
    }

    #[tokio::test]
    async fn swap_approves_spender_once_before_quoting() {
        let log = journal();
        let service = ZeroExService::new(
            FakeSwapApi::new(allowance_issue(), log.clone()),
            ReferrerConfig::NoReferrer,
        );
        let wallet = RecordingWallet::new(8453, TAKER).with_journal(log.clone());

        let outcome = service.swap(&wallet, &params()).await.unwrap();

        let sent = wallet.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, SELL);
        let approve = IERC20::approveCall::abi_decode(&sent[0].data).unwrap();
        assert_eq!(approve.spender, SPENDER);
        assert_eq!(approve.amount, U256::MAX);

        assert_eq!(outcome.approval_hash, Some(B256::repeat_byte(0xaa)));
        assert_eq!(
            entries(&log),
            vec!["price", "send", "quote", "prepare", "sign", "broadcast"]
        );
    }

    #[tokio::test]
    async fn price_and_quote_requests_carry_identical_fields() {
        let log = journal();
        let service = ZeroExService::new(FakeSwapApi::new(allowance_issue(), log.clone()), referrer());
        let wallet = RecordingWallet::new(8453, TAKER);

        let with_slippage = GetPriceParameters {
            slippage_bps: Some(25),
            ..params()
        };
        service.swap(&wallet, &with_slippage).await.unwrap();

        let requests = service.api.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].endpoint, Endpoint::Price);
        assert_eq!(requests[1].endpoint, Endpoint::Quote);
        assert_eq!(requests[0].params, requests[1].params);
        assert_eq!(requests[1].get("swapFeeBps"), Some("30"));
        assert_eq!(requests[1].get("swapFeeToken"), Some(SELL.to_string().as_str()));
    }

    #[tokio::test]
    async fn swap_builds_transaction_from_quote_with_fixed_gas() {
        let log = journal();
        let service = ZeroExService::new(
            FakeSwapApi::new(no_allowance_issue(), log.clone()),
            ReferrerConfig::NoReferrer,
        );
        let wallet = RecordingWallet::new(8453, TAKER);

        service.swap(&wallet, &params()).await.unwrap();

        let prepared = wallet
            .calls()
            .into_iter()
            .find_map(|c| match c {
                WalletCall::Prepare(tx) => Some(tx),
                _ => None,
            })
            .expect("transaction was prepared");

        assert_eq!(prepared.gas, Some(SWAP_GAS_LIMIT));
        assert_eq!(prepared.to, Some(SETTLER.into()));
        assert_eq!(prepared.value, Some(U256::ZERO));
        assert_eq!(
            prepared.input.input().map(|b| b.to_vec()),
            Some(vec![0xc0, 0xff, 0xee])
        );
    }

    #[tokio::test]
    async fn swap_without_account_fails_before_any_call() {
        let log = journal();
        let service = ZeroExService::new(
            FakeSwapApi::new(no_allowance_issue(), log.clone()),
            ReferrerConfig::NoReferrer,
        );
        let wallet = RecordingWallet::new(8453, TAKER)
            .without_account()
            .with_journal(log.clone());

        let err = service.swap(&wallet, &params()).await.unwrap_err();

        assert!(matches!(err, Error::MissingAccount));
        assert!(entries(&log).is_empty());
    }

    #[tokio::test]
    async fn keyless_wallet_needing_approval_reports_missing_account() {
        let log = journal();
        let service = ZeroExService::new(
            FakeSwapApi::new(allowance_issue(), log.clone()),
            ReferrerConfig::NoReferrer,
        );
        let wallet = RecordingWallet::new(8453, TAKER)
            .without_account()
            .with_journal(log.clone());

        let err = service.swap(&wallet, &params()).await.unwrap_err();

        assert!(matches!(err, Error::MissingAccount));
        assert!(wallet.sent().is_empty());
        assert!(entries(&log).is_empty());
    }

    #[tokio::test]
    async fn signer_lost_at_approval_reports_missing_account() {
        let log = journal();
        let service = ZeroExService::new(
            FakeSwapApi::new(allowance_issue(), log.clone()),
            ReferrerConfig::NoReferrer,
        );
        let wallet = RecordingWallet::new(8453, TAKER)
            .rejecting_signer()
            .with_journal(log.clone());

        let err = service.swap(&wallet, &params()).await.unwrap_err();

        assert!(matches!(err, Error::MissingAccount));
        assert_eq!(entries(&log), vec!["price", "send"]);
    }

    #[tokio::test]
    async fn failed_approval_aborts_before_quote() {
        let log = journal();
        let service = ZeroExService::new(
            FakeSwapApi::new(allowance_issue(), log.clone()),
            ReferrerConfig::NoReferrer,
        );
        let wallet = RecordingWallet::new(8453, TAKER)
            .failing_sends("insufficient funds for gas")
            .with_journal(log.clone());

        let err = service.swap(&wallet, &params()).await.unwrap_err();

        assert!(err.to_string().starts_with("Failed to approve 0x allowance"));
        assert_eq!(entries(&log), vec!["price", "send"]);
    }

    #[tokio::test]
    async fn failed_quote_keeps_approval_and_surfaces_upstream_error() {
        let log = journal();
        let mut api = FakeSwapApi::new(allowance_issue(), log.clone());
        api.quote = Err(Error::Config("unused".to_string()));
        let service = ZeroExService::new(api, ReferrerConfig::NoReferrer);
        let wallet = RecordingWallet::new(8453, TAKER).with_journal(log.clone());

        let err = service.swap(&wallet, &params()).await.unwrap_err();

        assert!(matches!(err, Error::UpstreamHttp { status: 500, .. }));
        assert_eq!(wallet.sent().len(), 1);
        assert_eq!(entries(&log), vec!["price", "send", "quote"]);
    }

    #[tokio::test]
    async fn swap_rejects_wallet_on_other_chain() {
        let log = journal();
        let service = ZeroExService::new(
            FakeSwapApi::new(no_allowance_issue(), log.clone()),
            ReferrerConfig::NoReferrer,
        );
        let wallet = RecordingWallet::new(1, TAKER).with_journal(log.clone());

        let err = service.swap(&wallet, &params()).await.unwrap_err();

        assert!(matches!(err, Error::Validation { field: "chain_id", .. }));
        assert!(entries(&log).is_empty());
    }
}
