//! Type-3 executor options, as consumed by the messaging endpoint.

use alloy::primitives::Bytes;

pub const OPTIONS_TYPE_3: u16 = 3;
pub const EXECUTOR_WORKER_ID: u8 = 1;
pub const OPTION_TYPE_LZRECEIVE: u8 = 1;

/// Message type of a plain OFT send (no compose)
pub const SEND_MSG_TYPE: u16 = 1;
pub const DEFAULT_LZ_RECEIVE_GAS: u128 = 200_000;

/// Options payload requesting `gas` units for `lzReceive` on the destination, with no native drop.
pub fn executor_lz_receive_option(gas: u128) -> Bytes {
    let option = gas.to_be_bytes();
    // option type byte + option body
    let option_len = (1 + option.len()) as u16;

    let mut encoded = Vec::with_capacity(2 + 1 + 2 + option_len as usize);
    encoded.extend_from_slice(&OPTIONS_TYPE_3.to_be_bytes());
    encoded.push(EXECUTOR_WORKER_ID);
    encoded.extend_from_slice(&option_len.to_be_bytes());
    encoded.push(OPTION_TYPE_LZRECEIVE);
    encoded.extend_from_slice(&option);
    encoded.into()
}

pub fn default_enforced_options() -> Bytes {
    executor_lz_receive_option(DEFAULT_LZ_RECEIVE_GAS)
}
