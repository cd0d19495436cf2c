//! DeFi agent plugins
//!
//! Tool adapters that let an agent:
//! - price and execute token swaps through the 0x API
//! - supply, withdraw, borrow and repay on Morpho Blue markets
//!
//! # Security Model
//!
//! - Private keys never leave the wallet module
//! - The 0x API key is held as a secret and never logged
//! - Every tool validates its input before touching the network

pub mod abi;
pub mod config;
pub mod morpho;
pub mod tools;
pub mod validate;
pub mod wallet;
pub mod zero_ex;

mod error;

pub use config::{Config, RpcConfig, PRIVATE_KEY_ENV, ZEROEX_API_KEY_ENV};
pub use error::{Error, Result};
pub use morpho::{MorphoDeployments, MorphoService};
pub use tools::{DynTool, MorphoPlugin, Tool, ToolDescriptor, ZeroExPlugin};
pub use wallet::{EvmWalletClient, ProviderWalletClient, SecureWallet, WalletError};
pub use zero_ex::{ReferrerConfig, ZeroExClient, ZeroExService};
