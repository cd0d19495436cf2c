//! 0x swap API adapter
//!
//! Prices and executes swaps through the allowance-holder endpoints of the 0x
//! v2 API. Optionally charges an integrator fee on every swap.

pub mod client;
pub mod params;
pub mod query;
pub mod response;
pub mod service;

pub use client::{SwapApi, ZeroExClient, DEFAULT_BASE_URL};
pub use params::{GetPriceParameters, SwapRequest};
pub use query::{Endpoint, ReferrerConfig, ZeroExRequest};
pub use service::{SwapOutcome, SwapStage, ZeroExService, SWAP_GAS_LIMIT};
