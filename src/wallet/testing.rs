//! In-memory wallet used by orchestrator tests

use super::{ContractCall, EvmWalletClient, WalletError};
use alloy::primitives::{Address, Bytes, TxHash, B256};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Ordered log of labelled external calls, shared between fakes
pub(crate) type Journal = Arc<Mutex<Vec<String>>>;

pub(crate) fn journal() -> Journal {
    Arc::new(Mutex::new(Vec::new()))
}

pub(crate) fn entries(journal: &Journal) -> Vec<String> {
    journal.lock().unwrap().clone()
}

#[derive(Debug, Clone)]
pub(crate) enum WalletCall {
    Send(ContractCall),
    Read(ContractCall),
    Prepare(TransactionRequest),
    Sign(TransactionRequest),
    SendRaw(Bytes),
}

/// Records every call and answers reads from canned responses keyed by selector
pub(crate) struct RecordingWallet {
    pub chain_id: u64,
    pub address: Address,
    pub has_account: bool,
    reads: HashMap<[u8; 4], Bytes>,
    fail_sends: Option<String>,
    no_signer: bool,
    fail_reads: Option<String>,
    calls: Mutex<Vec<WalletCall>>,
    journal: Journal,
}

impl RecordingWallet {
    pub fn new(chain_id: u64, address: Address) -> Self {
        Self {
            chain_id,
            address,
            has_account: true,
            reads: HashMap::new(),
            fail_sends: None,
            no_signer: false,
            fail_reads: None,
            calls: Mutex::new(Vec::new()),
            journal: journal(),
        }
    }

    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = journal;
        self
    }

    pub fn without_account(mut self) -> Self {
        self.has_account = false;
        self
    }

    pub fn with_read(mut self, selector: [u8; 4], response: impl Into<Bytes>) -> Self {
        self.reads.insert(selector, response.into());
        self
    }

    pub fn failing_sends(mut self, reason: &str) -> Self {
        self.fail_sends = Some(reason.to_string());
        self
    }

    /// Report an account but fail every signing call with `NoAccount`
    pub fn rejecting_signer(mut self) -> Self {
        self.no_signer = true;
        self
    }

    pub fn failing_reads(mut self, reason: &str) -> Self {
        self.fail_reads = Some(reason.to_string());
        self
    }

    pub fn calls(&self) -> Vec<WalletCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn sent(&self) -> Vec<ContractCall> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                WalletCall::Send(call) => Some(call),
                _ => None,
            })
            .collect()
    }

    fn record(&self, label: &str, call: WalletCall) {
        self.calls.lock().unwrap().push(call);
        self.journal.lock().unwrap().push(label.to_string());
    }
}

#[async_trait]
impl EvmWalletClient for RecordingWallet {
    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    fn address(&self) -> Address {
        self.address
    }

    fn has_account(&self) -> bool {
        self.has_account
    }

    async fn send_transaction(&self, call: ContractCall) -> Result<TxHash, WalletError> {
        self.record("send", WalletCall::Send(call));
        if self.no_signer {
            return Err(WalletError::NoAccount);
        }
        if let Some(reason) = &self.fail_sends {
            return Err(WalletError::Rpc(reason.clone()));
        }
        Ok(B256::repeat_byte(0xaa))
    }

    async fn read(&self, call: ContractCall) -> Result<Bytes, WalletError> {
        self.record("read", WalletCall::Read(call.clone()));
        if let Some(reason) = &self.fail_reads {
            return Err(WalletError::Rpc(reason.clone()));
        }
        call.selector()
            .and_then(|s| self.reads.get(&s).cloned())
            .ok_or_else(|| WalletError::Rpc("execution reverted".to_string()))
    }

    async fn prepare_transaction_request(
        &self,
        mut tx: TransactionRequest,
    ) -> Result<TransactionRequest, WalletError> {
        self.record("prepare", WalletCall::Prepare(tx.clone()));
        tx.from = Some(self.address);
        tx.nonce = Some(7);
        tx.chain_id = Some(self.chain_id);
        Ok(tx)
    }

    async fn sign_transaction(&self, tx: TransactionRequest) -> Result<Bytes, WalletError> {
        self.record("sign", WalletCall::Sign(tx));
        if self.no_signer {
            return Err(WalletError::NoAccount);
        }
        Ok(Bytes::from_static(&[0x02, 0x01]))
    }

    async fn send_raw_transaction(&self, raw: Bytes) -> Result<TxHash, WalletError> {
        self.record("broadcast", WalletCall::SendRaw(raw));
        Ok(B256::repeat_byte(0xbb))
    }
}
