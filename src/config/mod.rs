//! Configuration for the DeFi agent plugins
//!
//! Non-secret settings come from an optional JSON file; secrets (API key,
//! private key, RPC credentials) only ever come from the environment.

pub mod rpc;

use crate::morpho::MorphoDeployments;
use crate::zero_ex::{ReferrerConfig, DEFAULT_BASE_URL};
use crate::{Error, Result};
use alloy::primitives::Address;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

pub use rpc::RpcConfig;

/// 0x API key environment variable name
pub const ZEROEX_API_KEY_ENV: &str = "ZEROEX_API_KEY";

/// Wallet private key environment variable name
pub const PRIVATE_KEY_ENV: &str = "PRIVATE_KEY";

/// Largest fee 0x accepts, in basis points
const MAX_SWAP_FEE_BPS: u16 = 10_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferrerSettings {
    /// Integrator fee charged on the sell token
    pub swap_fee_bps: u16,
    /// Account receiving the fee
    pub swap_fee_recipient: Address,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZeroExSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub referrer: Option<ReferrerSettings>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for ZeroExSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            referrer: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MorphoSettings {
    /// Extra or replacement deployments, merged over the built-in table
    #[serde(default)]
    pub deployments: BTreeMap<u64, Address>,
}

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub zero_ex: ZeroExSettings,
    #[serde(default)]
    pub morpho: MorphoSettings,
}

impl Config {
    /// Read a JSON config file
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Cannot read {}: {}", path.display(), e)))?;
        let config: Config = serde_json::from_str(&raw)
            .map_err(|e| Error::Config(format!("Invalid config {}: {}", path.display(), e)))?;
        config.referrer_config()?;
        Ok(config)
    }

    /// Load `path` if given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn referrer_config(&self) -> Result<ReferrerConfig> {
        match &self.zero_ex.referrer {
            None => Ok(ReferrerConfig::NoReferrer),
            Some(r) if r.swap_fee_bps > MAX_SWAP_FEE_BPS => Err(Error::Config(format!(
                "swap_fee_bps {} exceeds {}",
                r.swap_fee_bps, MAX_SWAP_FEE_BPS
            ))),
            Some(r) => Ok(ReferrerConfig::WithReferrer {
                swap_fee_bps: r.swap_fee_bps,
                swap_fee_recipient: r.swap_fee_recipient,
            }),
        }
    }

    pub fn morpho_deployments(&self) -> MorphoDeployments {
        MorphoDeployments::with_overrides(self.morpho.deployments.clone())
    }
}

/// Read the 0x API key from the environment
pub fn api_key_from_env() -> Result<SecretString> {
    match std::env::var(ZEROEX_API_KEY_ENV) {
        Ok(key) if !key.trim().is_empty() => Ok(SecretString::from(key)),
        _ => Err(Error::Config(format!("{} is not set", ZEROEX_API_KEY_ENV))),
    }
}
