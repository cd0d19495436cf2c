//! Translation of swap requests into 0x query parameters
//!
//! The price and quote endpoints take exactly the same parameters, so both are
//! built by [`ZeroExRequest::new`]; only the path differs.

use super::params::SwapRequest;
use alloy::primitives::Address;
use std::fmt;

/// Integrator fee charged on every swap, fixed for the lifetime of the plugin
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ReferrerConfig {
    #[default]
    NoReferrer,
    WithReferrer {
        swap_fee_bps: u16,
        swap_fee_recipient: Address,
    },
}

/// 0x allowance-holder endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Indicative price; never returns a transaction
    Price,
    /// Firm quote with an executable transaction payload
    Quote,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Price => "swap/allowance-holder/price",
            Endpoint::Quote => "swap/allowance-holder/quote",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Price => f.write_str("price"),
            Endpoint::Quote => f.write_str("quote"),
        }
    }
}

/// Query parameters in the order they are sent
pub type QueryParams = Vec<(&'static str, String)>;

/// A fully translated request against one endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZeroExRequest {
    pub endpoint: Endpoint,
    pub params: QueryParams,
}

impl ZeroExRequest {
    pub fn new(endpoint: Endpoint, request: &SwapRequest, referrer: &ReferrerConfig) -> Self {
        Self {
            endpoint,
            params: query_params(request, referrer),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }
}

fn query_params(request: &SwapRequest, referrer: &ReferrerConfig) -> QueryParams {
    let (fee_bps, fee_token, fee_recipient) = match referrer {
        ReferrerConfig::NoReferrer => (None, None, None),
        ReferrerConfig::WithReferrer {
            swap_fee_bps,
            swap_fee_recipient,
        } => (
            Some(swap_fee_bps.to_string()),
            Some(request.sell_token.to_string()),
            Some(swap_fee_recipient.to_string()),
        ),
    };

    let fields = [
        ("chainId", Some(request.chain_id.to_string())),
        ("sellToken", Some(request.sell_token.to_string())),
        ("buyToken", Some(request.buy_token.to_string())),
        ("sellAmount", Some(request.sell_amount.to_string())),
        ("taker", Some(request.taker.to_string())),
        ("txOrigin", Some(request.taker.to_string())),
        ("slippageBps", request.slippage_bps.map(|bps| bps.to_string())),
        ("swapFeeBps", fee_bps),
        ("swapFeeToken", fee_token),
        ("swapFeeRecipient", fee_recipient),
    ];

    fields
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key, v)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{address, U256};

    const T1: Address = address!("833589fcd6edb6e08f4c7c32d4f71b54bda02913");
    const T2: Address = address!("4200000000000000000000000000000000000006");
    const TAKER: Address = address!("f39fd6e51aad88f6f4ce6ab8827279cfffb92266");
    const RECIPIENT: Address = address!("70997970c51812dc3a010c7d01b50e0d17dc79c8");

    fn request(slippage_bps: Option<u16>) -> SwapRequest {
        SwapRequest {
            chain_id: 8453,
            sell_token: T1,
            buy_token: T2,
            sell_amount: U256::from(500),
            taker: TAKER,
            slippage_bps,
        }
    }

    fn referrer() -> ReferrerConfig {
        ReferrerConfig::WithReferrer {
            swap_fee_bps: 30,
            swap_fee_recipient: RECIPIENT,
        }
    }

    #[test]
    fn no_referrer_query_matches_price_scenario() {
        let req = ZeroExRequest::new(Endpoint::Price, &request(None), &ReferrerConfig::NoReferrer);

        let expected: QueryParams = vec![
            ("chainId", "8453".to_string()),
            ("sellToken", T1.to_string()),
            ("buyToken", T2.to_string()),
            ("sellAmount", "500".to_string()),
            ("taker", TAKER.to_string()),
            ("txOrigin", TAKER.to_string()),
        ];
        assert_eq!(req.params, expected);
    }

    #[test]
    fn no_referrer_never_sends_fee_keys() {
        for slippage in [None, Some(0), Some(50)] {
            for endpoint in [Endpoint::Price, Endpoint::Quote] {
                let req = ZeroExRequest::new(endpoint, &request(slippage), &ReferrerConfig::NoReferrer);
                assert!(req.params.iter().all(|(k, _)| !k.starts_with("swapFee")));
            }
        }
    }

    #[test]
    fn referrer_injects_three_fee_fields() {
        let req = ZeroExRequest::new(Endpoint::Quote, &request(None), &referrer());

        assert_eq!(req.get("swapFeeBps"), Some("30"));
        assert_eq!(req.get("swapFeeToken"), Some(T1.to_string().as_str()));
        assert_eq!(req.get("swapFeeRecipient"), Some(RECIPIENT.to_string().as_str()));
        assert_eq!(
            req.params.iter().filter(|(k, _)| k.starts_with("swapFee")).count(),
            3
        );
    }

    #[test]
    fn zero_slippage_is_sent_and_absent_slippage_is_dropped() {
        let zero = ZeroExRequest::new(Endpoint::Price, &request(Some(0)), &referrer());
        assert_eq!(zero.get("slippageBps"), Some("0"));

        let absent = ZeroExRequest::new(Endpoint::Price, &request(None), &referrer());
        assert_eq!(absent.get("slippageBps"), None);
        assert!(absent.params.iter().all(|(_, v)| !v.is_empty()));
    }

    #[test]
    fn price_and_quote_differ_only_in_path() {
        let req = request(Some(75));
        let price = ZeroExRequest::new(Endpoint::Price, &req, &referrer());
        let quote = ZeroExRequest::new(Endpoint::Quote, &req, &referrer());

        assert_eq!(price.params, quote.params);
        assert_ne!(price.endpoint.path(), quote.endpoint.path());
    }
}
