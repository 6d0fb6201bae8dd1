use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

/// Connection parameters for one chain, keyed by `name` in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    pub name: String,
    pub rpc_url: String,
    pub chain_id: u64,
    /// Messaging-protocol endpoint contract on this chain
    pub endpoint_address: Address,
    /// Messaging-protocol endpoint id, distinct from `chain_id`
    pub eid: u32,
    /// Deterministic-deployment factory; deployments to this chain are refused without one
    #[serde(default)]
    pub factory_address: Option<Address>,
}
