use alloy::{
    primitives::{keccak256, Address, Bytes, B256, U256},
    sol_types::SolValue,
};

/// Salt shared by every chain of one deployment: `keccak256(name ":" symbol)`.
///
/// Identical bytecode, constructor arguments, factory and salt yield the same
/// address on every chain.
pub fn deployment_salt(token_name: &str, token_symbol: &str) -> B256 {
    keccak256(format!("{token_name}:{token_symbol}").as_bytes())
}

/// ABI-encoded OFT constructor arguments `(name, symbol, initialSupply, lzEndpoint, delegate)`.
pub fn constructor_args(
    token_name: &str,
    token_symbol: &str,
    initial_supply: U256,
    endpoint: Address,
    owner: Address,
) -> Vec<u8> {
    (
        token_name.to_string(),
        token_symbol.to_string(),
        initial_supply,
        endpoint,
        owner,
    )
        .abi_encode_params()
}

pub fn init_code(bytecode: &[u8], constructor_args: &[u8]) -> Bytes {
    let mut code = Vec::with_capacity(bytecode.len() + constructor_args.len());
    code.extend_from_slice(bytecode);
    code.extend_from_slice(constructor_args);
    code.into()
}

/// Address the factory will assign to `init_code` under `salt`.
pub fn predict_address(factory: Address, salt: B256, init_code: &[u8]) -> Address {
    factory.create2_from_code(salt, init_code)
}
