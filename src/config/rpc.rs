//! RPC endpoint configuration
//!
//! Resolution order for each chain:
//! 1. Per-chain env var (`ETH_RPC_URL`, `BASE_RPC_URL`, ...)
//! 2. `ALCHEMY_API_KEY`, which builds URLs for every known chain
//! 3. Public RPC fallback (rate limited, testing only)
//!
//! ```bash
//! export BASE_RPC_URL="https://base-mainnet.g.alchemy.com/v2/YOUR_KEY"
//! # or
//! export ALCHEMY_API_KEY="YOUR_KEY"
//! ```

use std::collections::BTreeMap;

/// Chain ID constants
pub mod chains {
    pub const ETHEREUM: u64 = 1;
    pub const BASE: u64 = 8453;
    pub const ARBITRUM: u64 = 42161;
    pub const BASE_SEPOLIA: u64 = 84532;
}

pub const ALCHEMY_API_KEY_ENV: &str = "ALCHEMY_API_KEY";

struct KnownChain {
    id: u64,
    name: &'static str,
    env_var: &'static str,
    alchemy_network: &'static str,
    public_rpc: &'static str,
}

const KNOWN_CHAINS: [KnownChain; 4] = [
    KnownChain {
        id: chains::ETHEREUM,
        name: "ethereum",
        env_var: "ETH_RPC_URL",
        alchemy_network: "eth-mainnet",
        public_rpc: "https://eth.llamarpc.com",
    },
    KnownChain {
        id: chains::BASE,
        name: "base",
        env_var: "BASE_RPC_URL",
        alchemy_network: "base-mainnet",
        public_rpc: "https://mainnet.base.org",
    },
    KnownChain {
        id: chains::ARBITRUM,
        name: "arbitrum",
        env_var: "ARBITRUM_RPC_URL",
        alchemy_network: "arb-mainnet",
        public_rpc: "https://arb1.arbitrum.io/rpc",
    },
    KnownChain {
        id: chains::BASE_SEPOLIA,
        name: "base-sepolia",
        env_var: "BASE_SEPOLIA_RPC_URL",
        alchemy_network: "base-sepolia",
        public_rpc: "https://sepolia.base.org",
    },
];

/// Look up a chain id by name (`base`, `ethereum`, ...) or numeric id
pub fn chain_id_from_name(name: &str) -> Option<u64> {
    let name = name.trim().to_ascii_lowercase();
    if let Ok(id) = name.parse::<u64>() {
        return Some(id);
    }
    match name.as_str() {
        "mainnet" | "eth" => Some(chains::ETHEREUM),
        "arb" => Some(chains::ARBITRUM),
        _ => KNOWN_CHAINS.iter().find(|c| c.name == name).map(|c| c.id),
    }
}

/// RPC URLs indexed by chain ID
#[derive(Debug, Clone)]
pub struct RpcConfig {
    urls: BTreeMap<u64, String>,
}

impl RpcConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve URLs with `lookup` standing in for the process environment
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let alchemy_key = lookup(ALCHEMY_API_KEY_ENV).filter(|k| !k.is_empty());
        let mut urls = BTreeMap::new();

        for chain in &KNOWN_CHAINS {
            let url = if let Some(url) = lookup(chain.env_var).filter(|u| !u.is_empty()) {
                tracing::debug!(chain = chain.name, "Using {}", chain.env_var);
                url
            } else if let Some(key) = &alchemy_key {
                format!("https://{}.g.alchemy.com/v2/{}", chain.alchemy_network, key)
            } else {
                tracing::warn!(
                    chain = chain.name,
                    "No RPC configured, using public RPC (rate limited)"
                );
                chain.public_rpc.to_string()
            };
            urls.insert(chain.id, url);
        }

        Self { urls }
    }

    pub fn get(&self, chain_id: u64) -> Option<&str> {
        self.urls.get(&chain_id).map(|s| s.as_str())
    }
}
