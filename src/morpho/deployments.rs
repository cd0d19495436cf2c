//! Where Morpho Blue is deployed

use crate::{Error, Result};
use alloy::primitives::{address, Address};
use std::collections::BTreeMap;

/// Canonical Morpho Blue singleton, deployed at the same address on every
/// chain listed in [`MorphoDeployments::default`]
pub const MORPHO_BLUE: Address = address!("bbbbbbbbbb9cc5e90e3b3af64bdaf62c37eeffcb");

/// Immutable chain id -> Morpho contract table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MorphoDeployments {
    addresses: BTreeMap<u64, Address>,
}

impl Default for MorphoDeployments {
    fn default() -> Self {
        let addresses = [
            (1, MORPHO_BLUE),     // Ethereum
            (8453, MORPHO_BLUE),  // Base
            (84532, MORPHO_BLUE), // Base Sepolia
        ]
        .into_iter()
        .collect();
        Self { addresses }
    }
}

impl MorphoDeployments {
    /// Defaults with `overrides` layered on top
    pub fn with_overrides(overrides: impl IntoIterator<Item = (u64, Address)>) -> Self {
        let mut deployments = Self::default();
        deployments.addresses.extend(overrides);
        deployments
    }

    pub fn address_for(&self, chain_id: u64) -> Result<Address> {
        self.addresses
            .get(&chain_id)
            .copied()
            .ok_or(Error::UnsupportedChain(chain_id))
    }

    pub fn supports(&self, chain_id: u64) -> bool {
        self.addresses.contains_key(&chain_id)
    }
}
