use alloy::primitives::{Address, B256};
use std::str::FromStr;

use crate::{Error, Result};

pub fn parse_address(input: &str) -> Result<Address> {
    Address::from_str(input.trim()).map_err(|_| Error::InvalidAddress {
        input: input.to_string(),
    })
}

/// Left-pads a 20-byte address with zeros to the 32-byte peer/recipient form.
pub fn address_to_peer(address: Address) -> B256 {
    address.into_word()
}

pub fn to_peer_format(input: &str) -> Result<B256> {
    parse_address(input).map(address_to_peer)
}
