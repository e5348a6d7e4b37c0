//! Well-known wrapped-native tokens.
//!
//! Convenience table only; every API in this crate accepts an arbitrary
//! wrapped token, so unlisted chains simply supply their own.

use alloy_primitives::address;
use lazy_static::lazy_static;
use std::collections::HashMap;

use crate::currency::{ChainId, Token};

lazy_static! {
    static ref WRAPPED_NATIVE: HashMap<ChainId, Token> = {
        let mut map = HashMap::new();
        map.insert(
            1,
            Token::new(
                1,
                address!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"),
                18,
                "WETH",
                "Wrapped Ether",
            ),
        );
        map.insert(
            10,
            Token::new(
                10,
                address!("4200000000000000000000000000000000000006"),
                18,
                "WETH",
                "Wrapped Ether",
            ),
        );
        map.insert(
            8453,
            Token::new(
                8453,
                address!("4200000000000000000000000000000000000006"),
                18,
                "WETH",
                "Wrapped Ether",
            ),
        );
        map.insert(
            42161,
            Token::new(
                42161,
                address!("82aF49447D8a07e3bd95BD0d56f35241523fBab1"),
                18,
                "WETH",
                "Wrapped Ether",
            ),
        );
        map
    };
}

/// The canonical wrapped-native token for a chain, if known.
pub fn wrapped_native(chain_id: ChainId) -> Option<&'static Token> {
    WRAPPED_NATIVE.get(&chain_id)
}
